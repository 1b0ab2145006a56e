use crate::error::{PalmError, Result};
use chrono::Month;

/// Calendar order used by every monthly chart axis.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Reject months outside 1..=12.
pub fn validate_month(month: u32) -> Result<()> {
    PalmError::check_range("month", i64::from(month), 1, 12)
}

/// Three-letter month label ("Jan".."Dec") for a 1-based month number.
pub fn month_abbr(month: u32) -> Result<&'static str> {
    validate_month(month)?;
    let month = u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(|| PalmError::InvalidFormat(format!("month {month}")))?;
    Ok(MONTH_ABBREVIATIONS[month.number_from_month() as usize - 1])
}
