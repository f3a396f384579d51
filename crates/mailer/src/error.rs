use thiserror::Error;

pub type Result<T> = std::result::Result<T, MailerError>;

#[derive(Error, Debug)]
pub enum MailerError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Email provider rejected the request ({status}): {body}")]
    ProviderError { status: u16, body: String },

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::error::StorageError),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Email provider is not configured")]
    NotConfigured,
}
