//! Coded dates and times.
//!
//! Dates come as `DDMMYY` (`DOF/` in SHR) or already as `YYYY-MM-DD`, times as `HHMM` or
//! `HH:MM:SS`.  Times carry no date of their own, they are anchored on [`ANCHOR_DATE`] so
//! that durations can be computed on them.
//!
//! Two-digit years are always taken in the 2000s.
//!
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use nom::{
    branch::alt,
    character::complete::char,
    combinator::{all_consuming, map},
    sequence::{preceded, tuple},
    IResult,
};

use crate::common::{four_digits, two_digits};

/// Placeholder date all decoded times are anchored on.
///
pub const ANCHOR_DATE: (i32, u32, u32) = (2024, 1, 1);

/// `DDMMYY`, returns (year, month, day)
///
fn short_date(input: &str) -> IResult<&str, (i32, u32, u32)> {
    map(
        tuple((two_digits, two_digits, two_digits)),
        |(d, m, y)| (2000 + y as i32, m, d),
    )(input)
}

/// `YYYY-MM-DD`
///
fn iso_date(input: &str) -> IResult<&str, (i32, u32, u32)> {
    map(
        tuple((
            four_digits,
            preceded(char('-'), two_digits),
            preceded(char('-'), two_digits),
        )),
        |(y, m, d)| (y as i32, m, d),
    )(input)
}

/// `HHMM`, returns (hour, minute, second)
///
fn short_time(input: &str) -> IResult<&str, (u32, u32, u32)> {
    map(tuple((two_digits, two_digits)), |(h, m)| (h, m, 0))(input)
}

/// `HH:MM:SS`
///
fn long_time(input: &str) -> IResult<&str, (u32, u32, u32)> {
    tuple((
        two_digits,
        preceded(char(':'), two_digits),
        preceded(char(':'), two_digits),
    ))(input)
}

/// Decode a `DDMMYY` or `YYYY-MM-DD` date.
///
/// Impossible calendar dates (like 31 April) are rejected.
///
pub fn decode_date(token: &str) -> Option<NaiveDate> {
    let (_, (y, m, d)) = all_consuming(alt((short_date, iso_date)))(token).ok()?;
    NaiveDate::from_ymd_opt(y, m, d)
}

/// Decode a `HHMM` or `HH:MM:SS` time into a timestamp on [`ANCHOR_DATE`].
///
pub fn decode_time(token: &str) -> Option<NaiveDateTime> {
    let (_, (h, m, s)) = all_consuming(alt((short_time, long_time)))(token).ok()?;
    let tod = NaiveTime::from_hms_opt(h, m, s)?;
    let (y, mo, d) = ANCHOR_DATE;
    Some(NaiveDate::from_ymd_opt(y, mo, d)?.and_time(tod))
}
