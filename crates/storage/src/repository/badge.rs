use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::traits::SupporterBadges;

pub const KOFI_SUPPORTER_BADGE: &str = "kofi_supporter";

pub struct BadgeRepository {
    pool: PgPool,
}

impl BadgeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn holders(&self, badge_id: &str, user_ids: &[Uuid]) -> Result<HashSet<Uuid>> {
        let holders: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT user_id
            FROM user_badges
            WHERE badge_id = $1 AND user_id = ANY($2)
            "#,
        )
        .bind(badge_id)
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(holders.into_iter().collect())
    }
}

#[async_trait]
impl SupporterBadges for BadgeRepository {
    async fn supporters(&self, user_ids: &[Uuid]) -> Result<HashSet<Uuid>> {
        self.holders(KOFI_SUPPORTER_BADGE, user_ids).await
    }
}
