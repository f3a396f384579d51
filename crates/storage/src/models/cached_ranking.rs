use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// One row of the precomputed ranking snapshot.
///
/// `user_id` is text: rows are written by an external job and are not
/// guaranteed to hold valid ids.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CachedRanking {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub position: i32,
    pub total_karma: i32,
    pub total_stories: i32,
    pub contest_wins: i32,
    pub votes_given: i32,
    pub comments_given: i32,
    pub comments_received: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RankingMetadata {
    pub last_updated: DateTime<Utc>,
    pub contest_period: Option<String>,
    pub total_users: i32,
    pub updated_by_admin: bool,
}
