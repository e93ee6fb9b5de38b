//! Outbound mail — the one place that talks to the SMTP relay.
//!
//! The submit handler depends on the `ResumeMailer` trait, carried in
//! `AppState` as `Arc<dyn ResumeMailer>`, so tests can swap the transport
//! for a mock. Production uses `SmtpMailer` over lettre's async transport.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Body, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::config::Config;

/// Transport-level timeout for one SMTP conversation. A hung relay fails the
/// request instead of pinning it open.
const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// One file to attach: the name shown to the recipient and the local path it
/// is read from at send time.
#[derive(Debug, Clone)]
pub struct AttachmentSpec {
    pub filename: String,
    pub path: PathBuf,
}

#[derive(Debug, Error)]
pub enum SendError {
    #[error("invalid recipient address '{address}': {reason}")]
    InvalidRecipient { address: String, reason: String },

    #[error("could not read attachment {path}: {source}")]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build message: {0}")]
    Compose(String),

    #[error("SMTP transport failed: {0}")]
    Transport(String),
}

/// Sends one message with attachments to one recipient. No retries: retry
/// policy, if any, belongs to the caller.
#[async_trait]
pub trait ResumeMailer: Send + Sync {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
        attachments: &[AttachmentSpec],
    ) -> Result<(), SendError>;
}

/// `ResumeMailer` over an authenticated SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let from: Mailbox = config
            .email_user
            .parse()
            .with_context(|| format!("EMAIL_USER '{}' is not a valid mailbox", config.email_user))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .with_context(|| format!("building SMTP transport for {}", config.smtp_host))?
            .credentials(Credentials::new(
                config.email_user.clone(),
                config.email_pass.clone(),
            ))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl ResumeMailer for SmtpMailer {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
        attachments: &[AttachmentSpec],
    ) -> Result<(), SendError> {
        let to: Mailbox = recipient
            .parse()
            .map_err(|e: lettre::address::AddressError| SendError::InvalidRecipient {
                address: recipient.to_string(),
                reason: e.to_string(),
            })?;

        // All attachments are read up front: a missing file fails the send
        // before anything reaches the relay. No partial sends.
        let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(body.to_string()));
        for spec in attachments {
            let bytes =
                tokio::fs::read(&spec.path)
                    .await
                    .map_err(|source| SendError::Attachment {
                        path: spec.path.clone(),
                        source,
                    })?;
            let mime = mime_guess::from_path(&spec.path).first_or_octet_stream();
            let content_type =
                ContentType::parse(mime.as_ref()).map_err(|e| SendError::Compose(e.to_string()))?;
            parts = parts
                .singlepart(Attachment::new(spec.filename.clone()).body(Body::new(bytes), content_type));
        }

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .multipart(parts)
            .map_err(|e| SendError::Compose(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;

        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            email_user: "sender@example.com".to_string(),
            email_pass: "secret".to_string(),
            smtp_host: "smtp.example.com".to_string(),
            port: 3000,
            rust_log: "info".to_string(),
        }
    }

    #[test]
    fn test_new_rejects_invalid_sender() {
        let mut config = test_config();
        config.email_user = "not an address".to_string();
        assert!(SmtpMailer::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_invalid_recipient_fails_before_transport() {
        let mailer = SmtpMailer::new(&test_config()).unwrap();
        let err = mailer.send("not an address", "s", "b", &[]).await;
        assert!(matches!(err, Err(SendError::InvalidRecipient { .. })));
    }

    #[tokio::test]
    async fn test_missing_attachment_fails_before_transport() {
        let mailer = SmtpMailer::new(&test_config()).unwrap();
        let attachments = [AttachmentSpec {
            filename: "resume1.pdf".to_string(),
            path: PathBuf::from("/definitely/not/here/resume1.pdf"),
        }];
        let err = mailer
            .send("jo@acme.com", "s", "b", &attachments)
            .await;
        match err {
            Err(SendError::Attachment { path, .. }) => {
                assert!(path.ends_with("resume1.pdf"));
            }
            other => panic!("expected attachment error, got {other:?}"),
        }
    }
}
