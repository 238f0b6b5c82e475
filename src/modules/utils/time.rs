use chrono::{DateTime, Local, TimeZone};

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current server-local time, formatted the way log entries store it
pub fn current_local_time() -> String {
    format_local(&Local::now())
}

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS`
pub fn format_local<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format(DISPLAY_FORMAT).to_string()
}
