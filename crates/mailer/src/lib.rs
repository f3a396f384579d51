pub mod dispatch;
pub mod error;
pub mod request;
pub mod resend;
pub mod templates;
pub mod traits;

pub use dispatch::{Mailer, MailerConfig, TEST_MODE_RECIPIENT};
pub use error::{MailerError, Result};
pub use request::{DispatchOutcome, EmailRequest, EmailType};
pub use resend::ResendClient;
pub use traits::{EmailTransport, OutgoingEmail, RecipientDirectory};
