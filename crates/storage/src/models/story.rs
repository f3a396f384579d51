use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A published story. `likes_count` is maintained by the voting flow.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Story {
    pub id: Uuid,
    pub user_id: Uuid,
    pub likes_count: i32,
    pub contest_id: Option<Uuid>,
    pub published_at: DateTime<Utc>,
}
