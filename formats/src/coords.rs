//! Coded coordinates as found in SHR and DEP/ARR messages.
//!
//! The encoding is fixed-width degrees & minutes with hemisphere letters and no separators:
//!
//! ```text
//! 5957N02905E
//! ^^         latitude degrees
//!   ^^       latitude minutes
//!     ^      N or S
//!      ^^^   longitude degrees
//!         ^^ longitude minutes
//!           ^ E or W
//! ```
//!
//! There are no seconds in this encoding.
//!
use nom::{
    character::complete::one_of,
    combinator::all_consuming,
    sequence::tuple,
    IResult,
};
use serde::{Deserialize, Serialize};

use crate::common::{three_digits, two_digits};

/// A position in decimal degrees, WGS84, longitude first.
///
#[derive(Copy, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct GeoPoint {
    /// Longitude in degrees
    pub longitude: f64,
    /// Latitude in degrees
    pub latitude: f64,
}

impl GeoPoint {
    /// Encode back into the `DDMM[NS]DDDMM[EW]` form, minutes are rounded.
    ///
    pub fn to_code(&self) -> String {
        let (lat_d, lat_m) = split_degrees(self.latitude);
        let (lon_d, lon_m) = split_degrees(self.longitude);
        let ns = if self.latitude < 0. { 'S' } else { 'N' };
        let ew = if self.longitude < 0. { 'W' } else { 'E' };
        format!("{lat_d:02}{lat_m:02}{ns}{lon_d:03}{lon_m:02}{ew}")
    }

    /// Well-known text form, the way spatial databases want it.
    ///
    pub fn to_wkt(&self) -> String {
        format!("POINT({} {})", self.longitude, self.latitude)
    }
}

#[inline]
fn split_degrees(v: f64) -> (u32, u32) {
    let total = (v.abs() * 60.).round() as u32;
    (total / 60, total % 60)
}

/// A coordinate token as found in the message, with its decoded value if any.
///
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CodedPoint {
    /// Original text
    pub text: String,
    /// Decoded position, `None` when the text is not a valid coded coordinate
    pub point: Option<GeoPoint>,
}

impl From<&str> for CodedPoint {
    fn from(text: &str) -> Self {
        CodedPoint {
            text: text.to_string(),
            point: decode_coords(text),
        }
    }
}

type Raw = (u32, u32, char, u32, u32, char);

fn coded_point(input: &str) -> IResult<&str, Raw> {
    tuple((
        two_digits,
        two_digits,
        one_of("NS"),
        three_digits,
        two_digits,
        one_of("EW"),
    ))(input)
}

/// Decode a `DDMM[NS]DDDMM[EW]` token.
///
/// Anything not matching the exact shape or out of the WGS84 range gives `None`.  Minutes
/// are not bounded, `5960N` is just latitude 60.
///
pub fn decode_coords(token: &str) -> Option<GeoPoint> {
    let (_, (lat_d, lat_m, ns, lon_d, lon_m, ew)) = all_consuming(coded_point)(token).ok()?;

    let mut latitude = lat_d as f64 + lat_m as f64 / 60.;
    let mut longitude = lon_d as f64 + lon_m as f64 / 60.;
    if latitude > 90. || longitude > 180. {
        return None;
    }

    if ns == 'S' {
        latitude = -latitude;
    }
    if ew == 'W' {
        longitude = -longitude;
    }
    Some(GeoPoint {
        longitude,
        latitude,
    })
}
