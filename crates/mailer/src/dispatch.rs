use std::sync::Arc;

use storage::models::Contest;

use crate::request::{DispatchOutcome, EmailRequest, EmailType};
use crate::templates::{self, EmailContent};
use crate::traits::{EmailTransport, OutgoingEmail, RecipientDirectory};
use crate::{MailerError, Result};

/// Every test-mode mail goes here, whatever the computed recipients are.
pub const TEST_MODE_RECIPIENT: &str = "admin@letranido.com";

/// Provider limit for a single batch call.
pub const MAX_BATCH_SIZE: usize = 100;

#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub from: String,
    pub site_url: String,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            from: "Letranido <noreply@letranido.com>".to_string(),
            site_url: "https://letranido.com".to_string(),
        }
    }
}

pub struct Mailer {
    transport: Option<Arc<dyn EmailTransport>>,
    directory: Arc<dyn RecipientDirectory>,
    config: MailerConfig,
}

impl Mailer {
    pub fn new(
        transport: Option<Arc<dyn EmailTransport>>,
        directory: Arc<dyn RecipientDirectory>,
        config: MailerConfig,
    ) -> Self {
        Self {
            transport,
            directory,
            config,
        }
    }

    /// Renders, addresses and sends one mailing.
    ///
    /// `contest` must be the contest named by the request for template mail.
    /// Errors are folded into the outcome.
    pub async fn dispatch(&self, request: &EmailRequest, contest: Option<&Contest>) -> DispatchOutcome {
        match self.try_dispatch(request, contest).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(
                    email_type = request.email_type.as_str(),
                    test_mode = request.test_mode,
                    "Email dispatch failed: {}",
                    e
                );
                DispatchOutcome::failed(e, request.test_mode)
            }
        }
    }

    async fn try_dispatch(
        &self,
        request: &EmailRequest,
        contest: Option<&Contest>,
    ) -> Result<DispatchOutcome> {
        request.validate()?;
        let content = self.content(request, contest)?;
        let transport = self.transport.as_ref().ok_or(MailerError::NotConfigured)?;

        let recipients = if request.test_mode {
            vec![TEST_MODE_RECIPIENT.to_string()]
        } else {
            self.directory.recipients(request.category()).await
        };

        if recipients.is_empty() {
            return Err(MailerError::ValidationError(format!(
                "No recipients for category '{}'",
                request.category().as_str()
            )));
        }

        tracing::info!(
            email_type = request.email_type.as_str(),
            recipients = recipients.len(),
            test_mode = request.test_mode,
            "Sending '{}' via {}",
            content.subject,
            transport.name()
        );

        let messages: Vec<OutgoingEmail> = recipients
            .iter()
            .map(|to| OutgoingEmail {
                from: self.config.from.clone(),
                to: vec![to.clone()],
                subject: content.subject.clone(),
                html: content.html.clone(),
                text: Some(content.text.clone()).filter(|t| !t.is_empty()),
            })
            .collect();

        let mut sent = 0;
        for batch in messages.chunks(MAX_BATCH_SIZE) {
            match transport.send_batch(batch).await {
                Ok(accepted) => sent += accepted,
                Err(e) => {
                    tracing::error!("Batch failed after {} of {} emails: {}", sent, messages.len(), e);
                    return Ok(DispatchOutcome {
                        success: false,
                        sent_count: sent,
                        recipients: recipients.len(),
                        test_mode: request.test_mode,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        Ok(DispatchOutcome {
            success: true,
            sent_count: sent,
            recipients: recipients.len(),
            test_mode: request.test_mode,
            error: None,
        })
    }

    fn content(&self, request: &EmailRequest, contest: Option<&Contest>) -> Result<EmailContent> {
        if request.email_type == EmailType::Manual {
            return Ok(EmailContent {
                subject: request.subject.clone().unwrap_or_default().trim().to_string(),
                html: request.html.clone().unwrap_or_default(),
                text: request.text.clone().unwrap_or_default(),
            });
        }

        let contest = contest
            .filter(|c| Some(c.id) == request.contest_id)
            .ok_or_else(|| MailerError::ValidationError("Contest not found".to_string()))?;

        templates::render(request.email_type, contest, &self.config.site_url)
            .ok_or_else(|| MailerError::ValidationError("No template for email type".to_string()))
    }
}
