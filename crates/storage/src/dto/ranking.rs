use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Where a ranking came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RankingSource {
    Cache,
    Live,
    /// Both the snapshot and the live computation failed.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct KarmaRankingEntry {
    pub position: i64,
    pub user_id: String,
    pub author: String,
    pub total_karma: i64,
    pub monthly_karma: i64,
    pub total_stories: i64,
    pub contest_wins: i64,
    pub votes_given: i64,
    pub comments_given: i64,
    pub comments_received: i64,
    pub is_kofi_supporter: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct KarmaRanking {
    pub entries: Vec<KarmaRankingEntry>,
    pub source: RankingSource,
    pub last_updated: Option<DateTime<Utc>>,
}

impl KarmaRanking {
    pub fn unavailable() -> Self {
        Self {
            entries: Vec::new(),
            source: RankingSource::Unavailable,
            last_updated: None,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct KarmaRankingQuery {
    /// Number of "load more" steps already taken by the reader.
    #[serde(default)]
    pub loads: u32,
}

impl KarmaRankingQuery {
    pub fn validate(&self) -> Result<(), String> {
        if self.loads > 200 {
            return Err("loads must be <= 200".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct KarmaRankingResponse {
    pub data: Vec<KarmaRankingEntry>,
    pub total_users: usize,
    pub shown: usize,
    pub has_more: bool,
    pub can_show_less: bool,
    pub source: RankingSource,
    pub last_updated: Option<DateTime<Utc>>,
}
