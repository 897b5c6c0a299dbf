use tracing::warn;

use crate::models::slot::{parse_date, SlotKey};

/// Shown in place of a date that cannot be parsed.
pub const INVALID_DATE_PLACEHOLDER: &str = "Invalid date";

const LONG_DATE_FORMAT: &str = "%A, %B %-d, %Y";

/// Render a `yyyy-MM-dd` date for people, e.g. `Saturday, June 1, 2024`.
pub fn format_slot_date(raw: &str) -> String {
    match parse_date(raw) {
        Ok(date) => date.format(LONG_DATE_FORMAT).to_string(),
        Err(e) => {
            warn!("cannot display date: {e}");
            INVALID_DATE_PLACEHOLDER.to_string()
        }
    }
}

pub fn describe_slot(key: &SlotKey) -> String {
    format!("{}, {}", key.date.format(LONG_DATE_FORMAT), key.slot)
}
