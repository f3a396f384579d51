use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PollStatus {
    Active,
    Closed,
    Converted,
    #[serde(other)]
    Unknown,
}

impl PollStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Closed => "closed",
            Self::Converted => "converted",
            Self::Unknown => "unknown",
        }
    }
}

impl From<String> for PollStatus {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "active" => Self::Active,
            "closed" => Self::Closed,
            "converted" => Self::Converted,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Poll {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: PollStatus,
    pub voting_deadline: Option<DateTime<Utc>>,
    pub converted_contest_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PollOption {
    pub id: Uuid,
    pub poll_id: Uuid,
    pub option_title: String,
    pub option_description: Option<String>,
    pub vote_count: i32,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}
