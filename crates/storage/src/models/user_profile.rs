use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Shown when no display name can be resolved for a user.
pub const ANONYMOUS_AUTHOR: &str = "Usuario Anónimo";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub contest_notifications: bool,
    pub general_notifications: bool,
}

/// Which preference a mailing respects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    /// Users who opted into contest notifications.
    Contest,
    /// Users who opted into general notifications.
    General,
    /// Every user with a valid email, regardless of preferences.
    Essential,
}

impl NotificationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contest => "contest",
            Self::General => "general",
            Self::Essential => "essential",
        }
    }
}

/// Loose syntactic check; deliverability is the provider's problem.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}
