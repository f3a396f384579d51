use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::error::Result;
use crate::models::AdminAction;

pub struct AdminActionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminActionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn record(
        &self,
        action: &str,
        target_id: Option<Uuid>,
        details: &serde_json::Value,
    ) -> Result<AdminAction> {
        let row = sqlx::query_as::<_, AdminAction>(
            r#"
            INSERT INTO admin_actions (action, target_id, details)
            VALUES ($1, $2, $3)
            RETURNING id, action, target_id, details, created_at
            "#,
        )
        .bind(action)
        .bind(target_id)
        .bind(Json(details))
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }
}
