//! Timestamp utilities

use chrono::{DateTime, Local, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Today's date in local time, formatted the way the dive log stores it
pub fn log_date() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Current local time, formatted the way the dive log stores it
pub fn log_time() -> String {
    Local::now().format("%H:%M").to_string()
}
