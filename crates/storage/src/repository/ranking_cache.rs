use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::{CachedRanking, RankingMetadata};
use crate::traits::RankingCache;

/// Read-only view of the ranking snapshot refreshed by admins.
pub struct RankingCacheRepository {
    pool: PgPool,
}

impl RankingCacheRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RankingCache for RankingCacheRepository {
    async fn cached_rows(&self) -> Result<Vec<CachedRanking>> {
        let rows = sqlx::query_as::<_, CachedRanking>(
            r#"
            SELECT user_id, user_name, position, total_karma, total_stories,
                   contest_wins, votes_given, comments_given, comments_received
            FROM cached_rankings
            ORDER BY position ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn last_admin_update(&self) -> Result<Option<RankingMetadata>> {
        let meta = sqlx::query_as::<_, RankingMetadata>(
            r#"
            SELECT last_updated, contest_period, total_users, updated_by_admin
            FROM ranking_metadata
            WHERE updated_by_admin = true
            ORDER BY last_updated DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(meta)
    }
}
