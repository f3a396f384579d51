use sqlx::PgPool;
use uuid::Uuid;

use crate::repository::admin_action::AdminActionRepository;

/// Records an admin action without letting a failure reach the caller.
pub async fn record_best_effort(
    pool: &PgPool,
    action: &str,
    target_id: Option<Uuid>,
    details: serde_json::Value,
) {
    let repo = AdminActionRepository::new(pool);
    if let Err(e) = repo.record(action, target_id, &details).await {
        tracing::warn!(action, ?target_id, "Could not record admin action: {}", e);
    }
}
