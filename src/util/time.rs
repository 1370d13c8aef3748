use std::time::{SystemTime, UNIX_EPOCH};

/// seconds since unix epoch
pub fn now_secs() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs(),
        // clock before epoch, treat as zero
        Err(_) => 0,
    }
}

/// format epoch seconds as HH:MM (utc)
pub fn format_hhmm(ts_secs: u64) -> String {
    let day_secs = ts_secs % 86400;
    format!("{:02}:{:02}", day_secs / 3600, (day_secs % 3600) / 60)
}

/// format epoch seconds as HH:MM:SS (utc)
pub fn format_hhmmss(ts_secs: u64) -> String {
    let day_secs = ts_secs % 86400;
    format!("{:02}:{:02}:{:02}", day_secs / 3600, (day_secs % 3600) / 60, day_secs % 60)
}
