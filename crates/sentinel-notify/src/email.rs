//! SMTP email channel
//!
//! Delivers reminder mail over implicit TLS on the standard smtps port
//! (465), authenticated with the sender mailbox credentials from the run's
//! [`NotifierConfig`]. Also carries the post-campaign summary report back
//! to the sender mailbox.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::debug;

use sentinel_core::{Channel, DeliveryError, Notifier, NotifierConfig, ReminderNote};

use crate::message;

/// Email adapter for the [`Notifier`] port.
#[derive(Debug, Default)]
pub struct SmtpNotifier;

impl SmtpNotifier {
    /// Create the email adapter.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    async fn send(
        &self,
        note: &ReminderNote,
        config: &NotifierConfig,
    ) -> Result<(), DeliveryError> {
        deliver(
            config,
            &note.contact,
            &message::email_subject(note),
            message::email_body(note),
        )
    }
}

/// Send the campaign summary report to the sender mailbox itself.
pub fn send_summary(config: &NotifierConfig, notes: &[ReminderNote]) -> Result<(), DeliveryError> {
    deliver(
        config,
        &config.email_user,
        &message::summary_subject(notes.len()),
        message::summary_body(notes),
    )
}

fn deliver(
    config: &NotifierConfig,
    to: &str,
    subject: &str,
    body: String,
) -> Result<(), DeliveryError> {
    if !config.email_configured() {
        return Err(DeliveryError::Auth("no mailbox credentials".into()));
    }

    let from = config
        .email_user
        .parse()
        .map_err(|_| DeliveryError::InvalidRecipient(config.email_user.clone()))?;
    let to = to
        .parse()
        .map_err(|_| DeliveryError::InvalidRecipient(to.to_string()))?;

    let email = Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body)
        .map_err(|e| DeliveryError::Transport(e.to_string()))?;

    let transport = SmtpTransport::relay(&config.smtp_host)
        .map_err(|e| DeliveryError::Transport(e.to_string()))?
        .credentials(Credentials::new(
            config.email_user.clone(),
            config.email_pass.clone(),
        ))
        .build();

    transport.send(&email).map_err(|e| {
        if e.is_timeout() {
            DeliveryError::Timeout
        } else if e.is_permanent() {
            DeliveryError::Auth(e.to_string())
        } else {
            DeliveryError::Transport(e.to_string())
        }
    })?;

    debug!(subject, "email submitted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn note(contact: &str) -> ReminderNote {
        ReminderNote {
            customer: "Globex".into(),
            subscription: "CloudSuite".into(),
            contract_term: "1 Year".into(),
            billing_cycle: "monthly".into(),
            quantity: dec!(2),
            unit_amount: dec!(50),
            total_due: dec!(100),
            renewal: None,
            contact: contact.into(),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_mailbox_is_auth_error() {
        let result = SmtpNotifier::new()
            .send(&note("ap@globex.example"), &NotifierConfig::default())
            .await;
        assert!(matches!(result, Err(DeliveryError::Auth(_))));
    }

    #[tokio::test]
    async fn test_unparseable_recipient_is_invalid() {
        let config = NotifierConfig {
            email_user: "billing@example.com".into(),
            email_pass: "secret".into(),
            ..Default::default()
        };
        let result = SmtpNotifier::new().send(&note("not an@address @"), &config).await;
        assert!(matches!(result, Err(DeliveryError::InvalidRecipient(_))));
    }
}
