//! Telegram bot channel
//!
//! Posts the reminder alert to the configured chat through the Bot API
//! `sendMessage` endpoint, with Markdown formatting and a 5 second client
//! timeout so an unreachable endpoint cannot stall the campaign.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::debug;

use sentinel_core::{Channel, DeliveryError, Notifier, NotifierConfig, ReminderNote};

use crate::message;

const BOT_API: &str = "https://api.telegram.org";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Telegram adapter for the [`Notifier`] port.
pub struct TelegramNotifier {
    client: Client,
}

impl TelegramNotifier {
    /// Create the Telegram adapter with its bounded-timeout HTTP client.
    pub fn new() -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn channel(&self) -> Channel {
        Channel::Telegram
    }

    async fn send(
        &self,
        note: &ReminderNote,
        config: &NotifierConfig,
    ) -> Result<(), DeliveryError> {
        if !config.telegram_configured() {
            return Err(DeliveryError::Auth("no bot token or chat id".into()));
        }

        let url = format!("{BOT_API}/bot{}/sendMessage", config.tg_token.trim());
        let payload = json!({
            "chat_id": config.tg_chat_id,
            "text": message::telegram_text(note),
            "parse_mode": "Markdown",
        });

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DeliveryError::Timeout
                } else {
                    DeliveryError::Transport(e.to_string())
                }
            })?;

        match response.status() {
            status if status.is_success() => {
                debug!(customer = %note.customer, "telegram alert posted");
                Ok(())
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(DeliveryError::Auth(format!("bot api responded {}", response.status())))
            }
            status => Err(DeliveryError::Transport(format!("bot api responded {status}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_unconfigured_bot_is_auth_error() {
        let note = ReminderNote {
            customer: "Globex".into(),
            subscription: "CloudSuite".into(),
            contract_term: "1 Year".into(),
            billing_cycle: "daily".into(),
            quantity: dec!(1),
            unit_amount: dec!(10),
            total_due: dec!(10),
            renewal: None,
            contact: "ap@globex.example".into(),
        };

        let result = TelegramNotifier::new()
            .unwrap()
            .send(&note, &NotifierConfig::default())
            .await;
        assert!(matches!(result, Err(DeliveryError::Auth(_))));
    }
}
