//! License Sentinel Engine - Unattended Poller
//!
//! Scans the subscription spreadsheet on a fixed interval and runs the
//! same campaign core as the CLI. Environment:
//!
//! - `SENTINEL_DATA` — spreadsheet path (default `data.xlsx`)
//! - `SENTINEL_CONFIG` — settings file (default `~/.sentinel/config.toml`)
//! - `SENTINEL_INTERVAL_SECS` — poll interval (default 10)
//! - `SENTINEL_CHANNELS` — `email`, `telegram` or `both` (default `both`)
//!
//! The campaign is awaited inline in the tick loop, so a slow pass delays
//! the next tick instead of overlapping it. An in-memory ledger keeps a
//! short interval from re-notifying the same billing cycle while the
//! process lives.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use sentinel_core::{
    workbook, CampaignError, Channel, ChannelSelection, MemoryLedger, NotificationDispatcher,
    NotifierConfig, ReminderCampaign,
};
use sentinel_notify::standard_notifiers;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("License Sentinel engine v{}", env!("CARGO_PKG_VERSION"));

    let data_path = PathBuf::from(
        std::env::var("SENTINEL_DATA").unwrap_or_else(|_| "data.xlsx".into()),
    );
    let config_path = std::env::var("SENTINEL_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".sentinel")
                .join("config.toml")
        });
    let interval_secs: u64 = std::env::var("SENTINEL_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);
    let selection = match std::env::var("SENTINEL_CHANNELS").as_deref() {
        Ok("email") => ChannelSelection::EmailOnly,
        Ok("telegram") => ChannelSelection::TelegramOnly,
        _ => ChannelSelection::Both,
    };

    info!(
        data = %data_path.display(),
        config = %config_path.display(),
        interval_secs,
        "engine configured"
    );

    let campaign = ReminderCampaign::new(NotificationDispatcher::new(standard_notifiers()?))
        .with_ledger(Arc::new(MemoryLedger::new()));

    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        // Settings are reloaded fresh each pass so edits land without a
        // restart.
        let config = match NotifierConfig::load(&config_path) {
            Ok(config) => config,
            Err(CampaignError::ConfigMissing) => {
                warn!("waiting for configuration, skipping scan");
                continue;
            }
            Err(e) => {
                error!(error = %e, "failed to load configuration");
                continue;
            }
        };

        let set = match workbook::load_records(&data_path) {
            Ok(set) => set,
            Err(e) => {
                error!(error = %e, "failed to load spreadsheet");
                continue;
            }
        };

        let today = Local::now().date_naive();
        match campaign.run(&set, today, &config, selection).await {
            Ok(result) => info!(
                due = result.due,
                suppressed = result.suppressed,
                email_sent = result.sent(Channel::Email),
                email_failed = result.failed(Channel::Email),
                telegram_sent = result.sent(Channel::Telegram),
                telegram_failed = result.failed(Channel::Telegram),
                "scan complete"
            ),
            Err(e) => error!(error = %e, "campaign run failed"),
        }
    }
}
