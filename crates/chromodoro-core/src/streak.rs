//! Consecutive-day streak arithmetic.
//!
//! The streak counts calendar days on which the app was opened, not
//! 24-hour windows: opening at 23:59 and again at 00:01 counts as two
//! consecutive days.

use chrono::{DateTime, Utc};

/// Compute the updated streak given the previous open date.
///
/// - never opened before: the streak starts at 1
/// - same calendar day: unchanged
/// - exactly one day later: incremented
/// - anything else (a gap, or a clock that went backwards): reset to 1
pub fn advance(current: u32, last_open: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u32 {
    let Some(last) = last_open else {
        return 1;
    };
    match (now.date_naive() - last.date_naive()).num_days() {
        0 => current,
        1 => current + 1,
        _ => 1,
    }
}
