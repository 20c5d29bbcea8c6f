//! Wall clock and countdown formatting.

use chrono::{DateTime, TimeZone};

/// 24-hour wall clock, `HH:MM` or `HH:MM:SS`.
pub fn format_clock<Tz: TimeZone>(time: &DateTime<Tz>, show_seconds: bool) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if show_seconds {
        time.format("%H:%M:%S").to_string()
    } else {
        time.format("%H:%M").to_string()
    }
}

/// `MM:SS` countdown. Minutes are not wrapped into hours.
pub fn format_countdown(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
