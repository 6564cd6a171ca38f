//! Message composition
//!
//! Pure text rendering for every outbound body: the reminder email, the
//! Telegram alert and the campaign summary report. Kept free of transport
//! concerns so the layouts are unit-testable.

use rust_decimal::Decimal;
use sentinel_core::ReminderNote;

/// Format a monetary amount with thousands separators and two decimal
/// places, e.g. `1,250.50`.
pub fn format_money(amount: Decimal) -> String {
    let raw = format!("{:.2}", amount.round_dp(2));
    let (int_part, frac_part) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{sign}{grouped}.{frac_part}")
}

/// Subject line for a reminder email.
pub fn email_subject(note: &ReminderNote) -> String {
    format!("Invoice Reminder: {} - {}", note.customer, note.subscription)
}

/// Plain-text body for a reminder email.
pub fn email_body(note: &ReminderNote) -> String {
    let renewal = note
        .renewal
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".into());

    format!(
        "Dear {customer} Team,\n\
         \n\
         This is an automated billing reminder for your active subscription.\n\
         \n\
         DETAILS:\n\
         --------------------------------------------------\n\
         Product:        {subscription}\n\
         Contract Type:  {contract}\n\
         Billing Cycle:  {cycle}\n\
         Quantity:       {quantity}\n\
         Unit Price:     ${unit}\n\
         TOTAL DUE:      ${total}\n\
         --------------------------------------------------\n\
         Next Renewal:   {renewal}\n\
         \n\
         Please ensure payment is processed to avoid service interruption.\n\
         \n\
         Best regards,\n\
         Billing Department\n",
        customer = note.customer,
        subscription = note.subscription,
        contract = note.contract_term,
        cycle = note.billing_cycle,
        quantity = note.quantity,
        unit = format_money(note.unit_amount),
        total = format_money(note.total_due),
        renewal = renewal,
    )
}

/// Markdown body for the Telegram alert.
pub fn telegram_text(note: &ReminderNote) -> String {
    format!(
        "\u{1F4B3} *Auto-Billing Alert*\n\
         \u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\n\
         *Customer:* {customer}\n\
         *Total Due:* ${total}\n\
         *Frequency:* {frequency}",
        customer = note.customer,
        total = format_money(note.total_due),
        frequency = capitalize(note.billing_cycle.trim()),
    )
}

/// Subject line for the post-campaign summary report.
pub fn summary_subject(items: usize) -> String {
    format!("Summary: Pending Invoice Report ({items} items)")
}

/// Plain-text body for the summary report sent back to the sender mailbox.
pub fn summary_body(notes: &[ReminderNote]) -> String {
    let mut lines = String::new();
    let mut total = Decimal::ZERO;
    for note in notes {
        let renewal = note
            .renewal
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into());
        lines.push_str(&format!(
            "- {}: ${} (Renewal: {})\n",
            note.customer,
            format_money(note.total_due),
            renewal
        ));
        total += note.total_due;
    }

    format!(
        "Hello,\n\
         \n\
         The reminder campaign has finished.\n\
         Below is the list of clients currently due:\n\
         \n\
         {lines}\
         \n\
         Total Due Amount: ${total}\n\
         \n\
         This is an automated report from License Sentinel.\n",
        lines = lines,
        total = format_money(total),
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
