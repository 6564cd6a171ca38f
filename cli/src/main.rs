//! License Sentinel CLI
//!
//! Interactive trigger for the reminder campaign core.
//!
//! # Usage
//!
//! ```bash
//! sentinel validate --file data.xlsx
//! sentinel due --file data.xlsx --date 2024-05-15
//! sentinel run --file data.xlsx --channel both --summary
//! sentinel config set --email-user billing@example.com --email-pass <app-password>
//! sentinel config show
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use sentinel_core::ChannelSelection;

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "sentinel")]
#[command(version = "0.1.0")]
#[command(about = "License management billing reminders", long_about = None)]
struct Cli {
    /// Notification settings file (default: ~/.sentinel/config.toml)
    #[arg(long, env = "SENTINEL_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    format: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a subscription spreadsheet against the required schema
    Validate {
        /// Spreadsheet to check
        #[arg(long, short)]
        file: PathBuf,
    },
    /// Preview which records are due for a reminder
    Due {
        /// Spreadsheet to evaluate
        #[arg(long, short)]
        file: PathBuf,
        /// Evaluation date, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Run one reminder campaign pass
    Run {
        /// Spreadsheet to evaluate
        #[arg(long, short)]
        file: PathBuf,
        /// Channels to drive
        #[arg(long, default_value = "both")]
        channel: ChannelArg,
        /// Evaluation date, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Evaluate and report without dispatching anything
        #[arg(long)]
        dry_run: bool,
        /// Email the pending report to the sender mailbox afterwards
        #[arg(long)]
        summary: bool,
    },
    /// Manage notification settings
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Save notification settings (only the given fields are changed)
    Set {
        /// Sender mailbox address
        #[arg(long)]
        email_user: Option<String>,
        /// Sender mailbox app password
        #[arg(long)]
        email_pass: Option<String>,
        /// SMTP submission host
        #[arg(long)]
        smtp_host: Option<String>,
        /// Telegram bot token
        #[arg(long)]
        tg_token: Option<String>,
        /// Telegram chat id
        #[arg(long)]
        tg_chat_id: Option<String>,
    },
    /// Show current settings with secrets masked
    Show,
}

/// Channel selection flag.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ChannelArg {
    /// Email only
    Email,
    /// Telegram only
    Telegram,
    /// Both channels
    Both,
}

impl From<ChannelArg> for ChannelSelection {
    fn from(arg: ChannelArg) -> Self {
        match arg {
            ChannelArg::Email => ChannelSelection::EmailOnly,
            ChannelArg::Telegram => ChannelSelection::TelegramOnly,
            ChannelArg::Both => ChannelSelection::Both,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(commands::default_config_path);

    let result = match cli.command {
        Commands::Validate { file } => commands::validate::handle(&file, cli.format),
        Commands::Due { file, date } => commands::due::handle(&file, date, cli.format),
        Commands::Run {
            file,
            channel,
            date,
            dry_run,
            summary,
        } => {
            commands::run::handle(
                &file,
                channel.into(),
                date,
                dry_run,
                summary,
                &config_path,
                cli.format,
            )
            .await
        }
        Commands::Config { action } => commands::config::handle(action, &config_path),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
