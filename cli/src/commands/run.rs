//! Manual campaign run

use std::path::Path;

use chrono::{Local, NaiveDate};
use colored::Colorize;
use sentinel_core::{
    campaign, workbook, CampaignResult, Channel, ChannelSelection, DeliveryError,
    NotificationDispatcher, NotifierConfig, ReminderCampaign, ReminderNote,
};
use sentinel_notify::{send_summary, standard_notifiers};
use serde::Serialize;
use tabled::Tabled;

use crate::output::OutputFormat;

use super::due::DueRow;

#[derive(Serialize, Tabled)]
struct RunRow {
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Subscription")]
    subscription: String,
    #[tabled(rename = "Total Due")]
    total: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Telegram")]
    telegram: String,
}

pub async fn handle(
    file: &Path,
    selection: ChannelSelection,
    date: Option<NaiveDate>,
    dry_run: bool,
    summary: bool,
    config_path: &Path,
    format: OutputFormat,
) -> Result<(), String> {
    let today = date.unwrap_or_else(|| Local::now().date_naive());
    let set = workbook::load_records(file).map_err(|e| e.to_string())?;

    if dry_run {
        let due = campaign::due_records(&set, today).map_err(|e| e.to_string())?;
        let rows: Vec<DueRow> = due.iter().map(DueRow::from_record).collect();
        format.print(&rows);
        println!(
            "{} {} record(s) would be notified on {}",
            "dry run:".yellow().bold(),
            due.len(),
            today
        );
        return Ok(());
    }

    let config = NotifierConfig::load(config_path).map_err(|e| e.to_string())?;
    let notifiers = standard_notifiers().map_err(|e| e.to_string())?;

    // A manual run always sends; suppression is the unattended engine's
    // concern.
    let reminder = ReminderCampaign::new(NotificationDispatcher::new(notifiers));
    let result = reminder
        .run(&set, today, &config, selection)
        .await
        .map_err(|e| e.to_string())?;

    print_result(&result, format);

    if summary {
        let due = campaign::due_records(&set, today).map_err(|e| e.to_string())?;
        let notes: Vec<ReminderNote> = due.iter().map(ReminderNote::from_record).collect();
        match send_summary(&config, &notes) {
            Ok(()) => println!("summary report emailed to {}", config.email_user),
            Err(DeliveryError::Auth(_)) => {
                eprintln!("{} summary skipped, mailbox not configured", "note:".yellow())
            }
            Err(e) => eprintln!("{} summary failed: {e}", "warning:".yellow()),
        }
    }

    Ok(())
}

fn print_result(result: &CampaignResult, format: OutputFormat) {
    let rows: Vec<RunRow> = result
        .dispatches
        .iter()
        .map(|d| {
            let outcome = |channel: Channel| -> String {
                d.outcomes
                    .iter()
                    .find(|o| o.channel == channel)
                    .map(|o| match &o.result {
                        Ok(()) => "sent".green().to_string(),
                        Err(e) => format!("{}", e).red().to_string(),
                    })
                    .unwrap_or_else(|| "-".into())
            };
            RunRow {
                customer: d.customer.clone(),
                subscription: d.subscription.clone(),
                total: format!("${}", sentinel_notify::message::format_money(d.total_due)),
                email: outcome(Channel::Email),
                telegram: outcome(Channel::Telegram),
            }
        })
        .collect();

    format.print(&rows);
    println!(
        "evaluated {} active record(s), {} due | email {}/{} | telegram {}/{}",
        result.evaluated,
        result.due,
        result.sent(Channel::Email),
        result.sent(Channel::Email) + result.failed(Channel::Email),
        result.sent(Channel::Telegram),
        result.sent(Channel::Telegram) + result.failed(Channel::Telegram),
    );
}
