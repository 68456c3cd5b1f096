//! DEP and ARR reports.
//!
//! Both are line-oriented, with one `-KEY VALUE` pair per line:
//!
//! ```text
//! (DEP-ZZZZZ
//! -SID 7771444381
//! -ATD 0705
//! -ADEPTZ 5957N02905E
//! -REG 00724)
//! ```
//!
//! Keys are case-insensitive.  Only the time & coordinates keys of each kind are decoded, the
//! others are kept as-is under `<kind>_<key>` so nothing is lost.
//!
use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use nom::{
    bytes::complete::take_till1,
    character::complete::{char, multispace0, multispace1},
    combinator::rest,
    sequence::{pair, preceded, separated_pair},
    IResult,
};
use serde::{Deserialize, Serialize};
use strum::EnumString;
use tracing::trace;

use crate::{decode_time, CodedPoint};

/// Which report we are looking at.
///
#[derive(
    Copy, Clone, Debug, Deserialize, PartialEq, Eq, Serialize, strum::Display, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// Departure
    Dep,
    /// Arrival
    Arr,
}

impl ReportKind {
    /// Key holding the actual time
    ///
    pub fn time_key(&self) -> &'static str {
        match self {
            ReportKind::Dep => "atd",
            ReportKind::Arr => "ata",
        }
    }

    /// Key holding the coded coordinates
    ///
    pub fn coords_key(&self) -> &'static str {
        match self {
            ReportKind::Dep => "adeptz",
            ReportKind::Arr => "adarrz",
        }
    }
}

/// Fields extracted from a DEP or ARR report.
///
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Report {
    pub kind: ReportKind,
    /// `ATD` or `ATA`
    pub time: Option<NaiveDateTime>,
    /// `ADEPTZ` or `ADARRZ`
    pub position: Option<CodedPoint>,
    /// Everything else, keys are `<kind>_<key>`
    pub extras: BTreeMap<String, String>,
}

impl Report {
    pub fn new(kind: ReportKind) -> Self {
        Report {
            kind,
            time: None,
            position: None,
            extras: BTreeMap::new(),
        }
    }
}

/// `-KEY VALUE`, whitespace allowed after the dash.
///
fn data_line(input: &str) -> IResult<&str, (&str, &str)> {
    preceded(
        pair(char('-'), multispace0),
        separated_pair(take_till1(|c: char| c.is_whitespace()), multispace1, rest),
    )(input)
}

/// Extract the fields of a DEP or ARR report.  Lines not in the `-KEY VALUE` shape are
/// ignored and the last occurrence of a key wins.
///
#[tracing::instrument(skip(text))]
pub fn parse_report(kind: ReportKind, text: &str) -> Report {
    text.lines()
        .filter_map(|line| data_line(line.trim()).ok().map(|(_, kv)| kv))
        .fold(Report::new(kind), |mut report, (key, value)| {
            let key = key.to_lowercase();
            let value = value.trim();
            trace!("{kind}: {key}={value}");

            if key == kind.time_key() {
                report.time = decode_time(value);
            } else if key == kind.coords_key() {
                report.position = Some(CodedPoint::from(value));
            } else {
                report.extras.insert(format!("{kind}_{key}"), value.to_string());
            }
            report
        })
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("-ATD 0705", ("ATD", "0705"))]
    #[case("- ATD 0705", ("ATD", "0705"))]
    #[case("-ADEPTZ   5957N02905E", ("ADEPTZ", "5957N02905E"))]
    #[case("-REG 00724 00725", ("REG", "00724 00725"))]
    fn test_data_line(#[case] line: &str, #[case] kv: (&str, &str)) {
        let (_, r) = data_line(line).unwrap();
        assert_eq!(kv, r);
    }

    #[rstest]
    #[case("ATD 0705")]
    #[case("-ATD")]
    #[case("-")]
    #[case("")]
    fn test_data_line_bad(#[case] line: &str) {
        assert!(data_line(line).is_err());
    }

    #[test]
    fn test_parse_dep() {
        let text = "(DEP-ZZZZZ\n-SID 7771444381\n-ATD 0705\n-ADEPTZ 5957N02905E\n-REG 00724)";
        let r = parse_report(ReportKind::Dep, text);

        let t = r.time.unwrap();
        assert_eq!((7, 5), (t.hour(), t.minute()));

        let pos = r.position.unwrap();
        assert_eq!("5957N02905E", pos.text);
        assert!(pos.point.is_some());

        assert_eq!(Some("7771444381"), r.extras.get("dep_sid").map(String::as_str));
        assert_eq!(Some("00724)"), r.extras.get("dep_reg").map(String::as_str));
        assert_eq!(2, r.extras.len());
    }

    #[test]
    fn test_parse_arr_case_insensitive() {
        let text = "-ata 1530\r\n-AdArRz 5545N03737E\r\n";
        let r = parse_report(ReportKind::Arr, text);

        let t = r.time.unwrap();
        assert_eq!((15, 30), (t.hour(), t.minute()));
        assert_eq!("5545N03737E", r.position.unwrap().text);
        assert!(r.extras.is_empty());
    }

    #[test]
    fn test_parse_report_foreign_keys() {
        // ATD means nothing in an ARR report
        let r = parse_report(ReportKind::Arr, "-ATD 0705\n-ATA 0800");
        assert_eq!(Some("0705"), r.extras.get("arr_atd").map(String::as_str));
        assert!(r.time.is_some());
    }

    #[test]
    fn test_parse_report_malformed() {
        let r = parse_report(ReportKind::Dep, "-ATD 07h05\n-ADEPTZ somewhere\nrandom text\n-ALONE");
        assert_eq!(None, r.time);
        let pos = r.position.unwrap();
        assert_eq!("somewhere", pos.text);
        assert_eq!(None, pos.point);
        assert!(r.extras.is_empty());
    }

    #[test]
    fn test_parse_report_last_wins() {
        let r = parse_report(ReportKind::Dep, "-ATD 0705\n-ATD 0810\n-OPR A\n-OPR B");
        assert_eq!(8, r.time.unwrap().hour());
        assert_eq!(Some("B"), r.extras.get("dep_opr").map(String::as_str));
    }

    #[test]
    fn test_report_kind() {
        assert_eq!("dep", ReportKind::Dep.to_string());
        assert_eq!(ReportKind::Arr, "ARR".parse::<ReportKind>().unwrap());
    }
}
