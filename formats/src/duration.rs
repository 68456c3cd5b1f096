//! Flight duration from takeoff and landing times.
//!
//! Only the time of day is used.  A landing earlier than the takeoff is taken as landing
//! the following day, so flights over 24h can not be represented.
//!
use chrono::{NaiveDateTime, TimeDelta};

/// Elapsed minutes between takeoff and landing, `None` if either is missing.
///
pub fn duration_minutes(
    takeoff: Option<NaiveDateTime>,
    landing: Option<NaiveDateTime>,
) -> Option<i64> {
    let (takeoff, landing) = (takeoff?.time(), landing?.time());

    let mut elapsed = landing.signed_duration_since(takeoff);
    if elapsed < TimeDelta::zero() {
        elapsed = elapsed + TimeDelta::days(1);
    }
    Some(elapsed.num_minutes())
}
