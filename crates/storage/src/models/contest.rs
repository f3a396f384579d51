use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle phase of a writing contest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContestStatus {
    Submission,
    Voting,
    Results,
    #[serde(other)]
    Unknown,
}

impl ContestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submission => "submission",
            Self::Voting => "voting",
            Self::Results => "results",
            Self::Unknown => "unknown",
        }
    }
}

impl From<String> for ContestStatus {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "submission" => Self::Submission,
            "voting" => Self::Voting,
            "results" => Self::Results,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Contest {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub month: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ContestStatus,
    pub min_words: i32,
    pub max_words: i32,
    pub submission_deadline: Option<DateTime<Utc>>,
    pub voting_deadline: Option<DateTime<Utc>>,
    pub finalized_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Contest {
    /// Whether like counts of this contest's stories may be shown.
    ///
    /// Counts are public once results are out. During voting they are only
    /// visible while the site-wide phase is also voting, so that a contest
    /// lingering in `voting` cannot leak counts into a later phase.
    pub fn likes_revealed(&self, current_phase: Option<ContestStatus>) -> bool {
        match self.status {
            ContestStatus::Results => true,
            ContestStatus::Voting => current_phase == Some(ContestStatus::Voting),
            _ => false,
        }
    }

    fn is_open(&self) -> bool {
        matches!(self.status, ContestStatus::Submission | ContestStatus::Voting)
    }

    fn still_running(&self, now: DateTime<Utc>) -> bool {
        self.voting_deadline.is_none_or(|deadline| deadline > now)
    }

    /// Picks the contest whose status defines the site-wide phase.
    ///
    /// Only `submission` and `voting` contests are candidates. Among those
    /// whose voting deadline is still ahead, the nearest deadline wins, so a
    /// contest left in `voting` past its deadline yields to the next one. A
    /// lone lingering contest is still current. With nothing open, the newest
    /// finished contest is used.
    pub fn current(contests: &[Contest], now: DateTime<Utc>) -> Option<&Contest> {
        let running = contests
            .iter()
            .filter(|c| c.is_open() && c.still_running(now))
            .min_by(|a, b| match (a.voting_deadline, b.voting_deadline) {
                (Some(x), Some(y)) => x.cmp(&y).then_with(|| b.created_at.cmp(&a.created_at)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => b.created_at.cmp(&a.created_at),
            });

        running
            .or_else(|| {
                contests
                    .iter()
                    .filter(|c| c.is_open())
                    .max_by_key(|c| c.created_at)
            })
            .or_else(|| {
                contests
                    .iter()
                    .filter(|c| c.status == ContestStatus::Results)
                    .max_by_key(|c| c.created_at)
            })
    }
}
