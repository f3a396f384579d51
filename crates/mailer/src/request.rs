use serde::{Deserialize, Serialize};
use storage::models::NotificationCategory;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{MailerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EmailType {
    NewContest,
    Reminder,
    VotingStarted,
    Results,
    /// Admin-written subject and body.
    Manual,
}

impl EmailType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewContest => "new_contest",
            Self::Reminder => "reminder",
            Self::VotingStarted => "voting_started",
            Self::Results => "results",
            Self::Manual => "manual",
        }
    }

    pub fn needs_contest(&self) -> bool {
        !matches!(self, Self::Manual)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmailRequest {
    pub email_type: EmailType,
    pub contest_id: Option<Uuid>,
    /// Route everything to the admin inbox instead of real recipients.
    #[serde(default)]
    pub test_mode: bool,
    pub category: Option<NotificationCategory>,
    pub subject: Option<String>,
    pub html: Option<String>,
    pub text: Option<String>,
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl EmailRequest {
    /// Template mail goes to contest subscribers unless told otherwise;
    /// manual mail to general subscribers.
    pub fn category(&self) -> NotificationCategory {
        self.category.unwrap_or(match self.email_type {
            EmailType::Manual => NotificationCategory::General,
            _ => NotificationCategory::Contest,
        })
    }

    pub fn validate(&self) -> Result<()> {
        match self.email_type {
            EmailType::Manual => {
                if !filled(&self.subject) {
                    return Err(MailerError::ValidationError(
                        "Manual emails need a subject".to_string(),
                    ));
                }
                if !filled(&self.html) {
                    return Err(MailerError::ValidationError(
                        "Manual emails need an HTML body".to_string(),
                    ));
                }
            }
            kind => {
                if self.contest_id.is_none() {
                    return Err(MailerError::ValidationError(format!(
                        "{} emails need a contest_id",
                        kind.as_str()
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Result of a dispatch. Failures are reported here, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DispatchOutcome {
    pub success: bool,
    pub sent_count: usize,
    pub recipients: usize,
    pub test_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DispatchOutcome {
    pub fn failed(error: impl ToString, test_mode: bool) -> Self {
        Self {
            success: false,
            sent_count: 0,
            recipients: 0,
            test_mode,
            error: Some(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email_type: EmailType) -> EmailRequest {
        EmailRequest {
            email_type,
            contest_id: None,
            test_mode: false,
            category: None,
            subject: None,
            html: None,
            text: None,
        }
    }

    #[test]
    fn test_default_categories() {
        assert_eq!(request(EmailType::Reminder).category(), NotificationCategory::Contest);
        assert_eq!(request(EmailType::Manual).category(), NotificationCategory::General);

        let mut essential = request(EmailType::Manual);
        essential.category = Some(NotificationCategory::Essential);
        assert_eq!(essential.category(), NotificationCategory::Essential);
    }

    #[test]
    fn test_template_needs_contest() {
        assert!(request(EmailType::Results).validate().is_err());

        let mut req = request(EmailType::Results);
        req.contest_id = Some(Uuid::new_v4());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_manual_needs_subject_and_html() {
        let mut req = request(EmailType::Manual);
        req.subject = Some("Novedades".to_string());
        assert!(req.validate().is_err());

        req.html = Some("  ".to_string());
        assert!(req.validate().is_err());

        req.html = Some("<p>Hola</p>".to_string());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_request_wire_format() {
        let req: EmailRequest = serde_json::from_value(serde_json::json!({
            "email_type": "voting_started",
            "contest_id": "00000000-0000-0000-0000-000000000001",
            "category": "essential"
        }))
        .unwrap();
        assert_eq!(req.email_type, EmailType::VotingStarted);
        assert!(!req.test_mode);
        assert_eq!(req.category(), NotificationCategory::Essential);
    }
}
