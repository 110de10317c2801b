use crate::error::{CoreError, Result};
use jiff::{SignedDuration, Timestamp};

/// Returns `at + minutes`.
pub fn add_minutes(at: Timestamp, minutes: u32) -> Result<Timestamp> {
    at.checked_add(SignedDuration::from_mins(i64::from(minutes)))
        .map_err(|e| CoreError::TimeOverflow(e.to_string()))
}

/// An instant at or past `expires_at` is expired.
pub fn is_expired(expires_at: Timestamp, now: Timestamp) -> bool {
    now >= expires_at
}

/// Human-readable time left until `expires_at`, e.g. `1d 2h remaining`.
pub fn format_time_remaining(expires_at: Timestamp, now: Timestamp) -> String {
    let diff_ms = expires_at.as_millisecond() - now.as_millisecond();
    if diff_ms <= 0 {
        return "Expired".to_string();
    }

    let minutes = diff_ms / 60_000;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d {}h remaining", days, hours % 24)
    } else if hours > 0 {
        format!("{}h {}m remaining", hours, minutes % 60)
    } else {
        format!("{}m remaining", minutes)
    }
}
