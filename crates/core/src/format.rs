use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::{calendar::CalendarWindow, error::Result, types::RunningCount};

const MIN_COLUMN_WIDTH: usize = 20;

pub fn total_deploys(counts: &RunningCount) -> u64 {
    counts.values().sum()
}

/// `Nov 2015` for `2015/11`; anything unparsable is echoed back.
pub fn friendly_month(calendar_month: &str) -> String {
    CalendarWindow::parse(calendar_month)
        .map(|window| window.label())
        .unwrap_or_else(|_| calendar_month.to_string())
}

/// Format deploy counts as a table sorted by deployment name
pub fn format_counts_table(counts: &RunningCount, calendar_month: &str) -> String {
    let sorted: BTreeMap<_, _> = counts.iter().collect();
    let label = friendly_month(calendar_month);
    let width = sorted
        .keys()
        .map(|name| name.len())
        .chain([label.len(), MIN_COLUMN_WIDTH])
        .max()
        .unwrap_or(MIN_COLUMN_WIDTH);
    let rule = format!("{} | {}\n", "-".repeat(width), "-".repeat(MIN_COLUMN_WIDTH));

    let mut output = String::new();
    output.push_str(&format!("{:<width$} | {}\n", "Deployment", "Count"));
    output.push_str(&rule);
    for (name, count) in &sorted {
        output.push_str(&format!("{:<width$} | {} deploys\n", name, count));
    }
    output.push_str(&rule);
    output.push_str(&format!(
        "{:<width$} | {} total deploys\n",
        label,
        total_deploys(counts)
    ));

    output
}

/// Compact JSON object, keys sorted
pub fn format_counts_json(counts: &RunningCount) -> Result<String> {
    let sorted: BTreeMap<_, _> = counts.iter().collect();
    Ok(serde_json::to_string(&sorted)?)
}

pub fn format_transition(release: &str, version: &str, at: DateTime<Utc>) -> String {
    format!(
        "{release}/{version} first deployed at {}",
        at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

pub fn format_transition_json(release: &str, version: &str, at: DateTime<Utc>) -> Result<String> {
    Ok(serde_json::to_string(&serde_json::json!({
        "release": release,
        "version": version,
        "timestamp": at.to_rfc3339_opts(SecondsFormat::Secs, true),
    }))?)
}
