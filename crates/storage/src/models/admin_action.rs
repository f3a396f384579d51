use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdminAction {
    pub id: Uuid,
    pub action: String,
    pub target_id: Option<Uuid>,
    pub details: Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
