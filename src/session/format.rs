use chrono::{DateTime, Utc};

/// Render a second count as `MM:SS`
///
/// Minutes are not wrapped into hours: one hour renders as `60:00`.
pub fn format_clock(seconds: u32) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}", mins, secs)
}

/// Render how long ago `sent_at` was, relative to `now`
pub fn format_relative(sent_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(sent_at);

    if diff.num_seconds() < 60 {
        return "Just now".to_string();
    }

    if diff.num_minutes() < 60 {
        return format!("{}m ago", diff.num_minutes());
    }

    if diff.num_hours() < 24 {
        return format!("{}h ago", diff.num_hours());
    }

    format!("{}d ago", diff.num_days())
}
