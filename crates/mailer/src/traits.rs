use async_trait::async_trait;
use serde::Serialize;
use storage::models::NotificationCategory;
use storage::repository::profile::ProfileRepository;

use crate::Result;

/// One message as handed to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Sends every message of the batch, returning how many were accepted.
    async fn send_batch(&self, messages: &[OutgoingEmail]) -> Result<usize>;

    fn name(&self) -> &'static str;
}

#[async_trait]
pub trait RecipientDirectory: Send + Sync {
    async fn recipients(&self, category: NotificationCategory) -> Vec<String>;
}

#[async_trait]
impl RecipientDirectory for ProfileRepository {
    async fn recipients(&self, category: NotificationCategory) -> Vec<String> {
        self.notification_recipients(category).await
    }
}
