use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Contest, Poll, PollOption};

/// Request payload for creating a new poll
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePollRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title must be between 1 and 255 characters"
    ))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub voting_deadline: Option<DateTime<Utc>>,

    #[validate(length(min = 2, message = "A poll needs at least 2 options"), nested)]
    pub options: Vec<CreatePollOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePollOption {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 255, message = "Option title must be at most 255 characters")
    )]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Admin-supplied contest fields for a poll conversion.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ConvertPollRequest {
    #[validate(length(max = 100))]
    pub category: Option<String>,

    #[validate(length(max = 100))]
    pub month: Option<String>,

    #[validate(range(min = 1, max = 100000, message = "min_words must be between 1 and 100000"))]
    #[serde(default = "default_min_words")]
    pub min_words: i32,

    #[validate(range(min = 1, max = 100000, message = "max_words must be between 1 and 100000"))]
    #[serde(default = "default_max_words")]
    pub max_words: i32,

    pub submission_deadline: DateTime<Utc>,

    pub voting_deadline: DateTime<Utc>,
}

fn default_min_words() -> i32 {
    100
}

fn default_max_words() -> i32 {
    1000
}

fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut err = validator::ValidationError::new("blank");
        err.message = Some("Option title cannot be empty".into());
        return Err(err);
    }
    Ok(())
}

impl ConvertPollRequest {
    /// Additional validation that requires multiple fields
    pub fn validate_schedule(&self) -> Result<(), &'static str> {
        if self.max_words < self.min_words {
            return Err("max_words must be greater than or equal to min_words");
        }

        if self.voting_deadline <= self.submission_deadline {
            return Err("Voting deadline must be after the submission deadline");
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PollDetailResponse {
    pub poll: Poll,
    pub options: Vec<PollOption>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PollConversionResponse {
    pub poll_id: Uuid,
    pub winning_option: PollOption,
    pub contest: Contest,
}
