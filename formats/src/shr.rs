//! SHR messages, the flight plan header.
//!
//! The message is free text with slash-delimited markers, none of which is mandatory and
//! which can come in any order:
//!
//! ```text
//! (SHR-ZZZZZ
//! -ZZZZ0705
//! -M0000/M0005 /ZONA R0,5 5957N02905E/
//! -ZZZZ0900
//! -DEP/5957N02905E DEST/5957N02905E DOF/240101 OPR/ACME +79991234567
//! TYP/BLA RMK/WR655 SID/7771444381)
//! ```
//!
//! Extraction is driven by [`RULES`], one entry per field.  For each rule, every occurrence
//! of the anchor is tried from left to right and the first one where the parser succeeds
//! gives the value.
//!
//! NOTE: `RMK/` runs until the next `SID/`, even though `SID/` usually comes *before* the
//! remarks.  In that case the remarks run to the end of the text.
//!
use chrono::{NaiveDate, NaiveDateTime};
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_until, take_while1, take_while_m_n},
    character::complete::{char, digit1, satisfy},
    combinator::{eof, peek, recognize, rest, verify},
    sequence::{pair, preceded, terminated},
    IResult,
};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{decode_date, decode_time, CodedPoint};

/// Fields we extract from an SHR message.
///
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Shr {
    /// `SID/`
    pub flight_number: Option<String>,
    /// `OPR/`
    pub operator_name: Option<String>,
    /// `+7XXXXXXXXXX`
    pub operator_phone: Option<String>,
    /// `TYP/`
    pub aircraft_type: Option<String>,
    /// `DEP/`
    pub takeoff: Option<CodedPoint>,
    /// `DOF/`
    pub flight_date: Option<NaiveDate>,
    /// `-ZZZZHHMM`
    pub takeoff_time: Option<NaiveDateTime>,
    /// `RMK/`
    pub remarks: Option<String>,
}

/// Field set by a given rule.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ShrField {
    FlightNumber,
    OperatorName,
    OperatorPhone,
    AircraftType,
    Takeoff,
    FlightDate,
    Remarks,
    TakeoffTime,
}

/// Capture parser, called on the text starting at the anchor.
///
type Capture = fn(&str) -> IResult<&str, &str>;

/// One extraction rule.
///
pub struct Rule {
    /// Fixed prefix of what we are looking for
    pub anchor: &'static str,
    /// Where the value goes
    pub field: ShrField,
    capture: Capture,
}

impl Rule {
    /// Returns the first value captured in `text`.
    ///
    pub fn find<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.match_indices(self.anchor)
            .find_map(|(i, _)| (self.capture)(&text[i..]).ok().map(|(_, v)| v))
    }
}

pub const RULES: [Rule; 8] = [
    Rule {
        anchor: "SID/",
        field: ShrField::FlightNumber,
        capture: flight_number,
    },
    Rule {
        anchor: "OPR/",
        field: ShrField::OperatorName,
        capture: operator,
    },
    Rule {
        anchor: "+7",
        field: ShrField::OperatorPhone,
        capture: phone,
    },
    Rule {
        anchor: "TYP/",
        field: ShrField::AircraftType,
        capture: aircraft_type,
    },
    Rule {
        anchor: "DEP/",
        field: ShrField::Takeoff,
        capture: departure,
    },
    Rule {
        anchor: "DOF/",
        field: ShrField::FlightDate,
        capture: date_of_flight,
    },
    Rule {
        anchor: "RMK/",
        field: ShrField::Remarks,
        capture: remarks,
    },
    Rule {
        anchor: "-",
        field: ShrField::TakeoffTime,
        capture: time_group,
    },
];

/// `SID/1234`
fn flight_number(input: &str) -> IResult<&str, &str> {
    preceded(tag("SID/"), digit1)(input)
}

/// `OPR/ACME +7...`, stops before `+<digit>` or at the end
fn operator(input: &str) -> IResult<&str, &str> {
    let next_phone = recognize(pair(char('+'), satisfy(|c| c.is_ascii_digit())));
    preceded(tag("OPR/"), terminated(is_not("+"), alt((peek(next_phone), eof))))(input)
}

/// `+79991234567`
fn phone(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        tag("+7"),
        take_while_m_n(10, 10, |c: char| c.is_ascii_digit()),
    ))(input)
}

/// `TYP/BLA`
fn aircraft_type(input: &str) -> IResult<&str, &str> {
    preceded(tag("TYP/"), take_while1(|c: char| c.is_ascii_uppercase()))(input)
}

/// `DEP/5957N02905E`
fn departure(input: &str) -> IResult<&str, &str> {
    preceded(
        tag("DEP/"),
        take_while1(|c: char| c.is_ascii_uppercase() || c.is_ascii_digit()),
    )(input)
}

/// `DOF/240101`
fn date_of_flight(input: &str) -> IResult<&str, &str> {
    preceded(tag("DOF/"), digit1)(input)
}

/// `RMK/...` up to `SID/` or the end
fn remarks(input: &str) -> IResult<&str, &str> {
    preceded(
        tag("RMK/"),
        verify(alt((take_until("SID/"), rest)), |s: &str| !s.is_empty()),
    )(input)
}

/// `-ZZZZ0705`, we only keep the time
fn time_group(input: &str) -> IResult<&str, &str> {
    preceded(
        pair(
            char('-'),
            take_while_m_n(4, 4, |c: char| c.is_ascii_uppercase()),
        ),
        take_while_m_n(4, 4, |c: char| c.is_ascii_digit()),
    )(input)
}

#[inline]
fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

impl Shr {
    /// Store a captured value, decoding it when needed.
    ///
    fn set(&mut self, field: ShrField, value: &str) {
        match field {
            ShrField::FlightNumber => self.flight_number = Some(value.to_string()),
            ShrField::OperatorName => self.operator_name = non_empty(value),
            ShrField::OperatorPhone => self.operator_phone = Some(value.to_string()),
            ShrField::AircraftType => self.aircraft_type = Some(value.to_string()),
            ShrField::Takeoff => self.takeoff = Some(CodedPoint::from(value)),
            ShrField::FlightDate => self.flight_date = decode_date(value),
            ShrField::Remarks => self.remarks = non_empty(value),
            ShrField::TakeoffTime => self.takeoff_time = decode_time(value),
        }
    }
}

/// Extract all known fields from an SHR message.
///
#[tracing::instrument(skip(text))]
pub fn parse_shr(text: &str) -> Shr {
    RULES.iter().fold(Shr::default(), |mut shr, rule| {
        if let Some(value) = rule.find(text) {
            trace!("{}={}", rule.field, value);
            shr.set(rule.field, value);
        }
        shr
    })
}
