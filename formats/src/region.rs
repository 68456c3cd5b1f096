//! Coarse region classification.
//!
//! This is a bounding-box heuristic over a handful of one-degree boxes, not a geocoder: any
//! point outside of these is `Undetermined`.
//!
use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::GeoPoint;

/// Region labels, as stored downstream.
///
#[derive(
    Copy,
    Clone,
    Debug,
    Deserialize,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    strum::Display,
    EnumString,
    strum::VariantNames,
)]
pub enum Region {
    #[serde(rename = "Центральный федеральный округ")]
    #[strum(serialize = "Центральный федеральный округ")]
    Central,
    #[serde(rename = "Северо-Западный федеральный округ")]
    #[strum(serialize = "Северо-Западный федеральный округ")]
    NorthWestern,
    #[serde(rename = "Южный федеральный округ")]
    #[strum(serialize = "Южный федеральный округ")]
    Southern,
    #[serde(rename = "Не определен")]
    #[strum(serialize = "Не определен")]
    Undetermined,
}

/// Bounding box, min inclusive and max exclusive.
///
#[derive(Debug)]
pub struct BB {
    /// Longitude - X0
    pub min_lon: f64,
    /// Latitude - Y0
    pub min_lat: f64,
    /// Longitude - X1
    pub max_lon: f64,
    /// Latitude - Y1
    pub max_lat: f64,
}

impl BB {
    #[inline]
    pub fn contains(&self, p: &GeoPoint) -> bool {
        (self.min_lon..self.max_lon).contains(&p.longitude)
            && (self.min_lat..self.max_lat).contains(&p.latitude)
    }
}

/// Checked in order, first match wins.
///
const REGIONS: [(Region, BB); 3] = [
    (
        Region::Central,
        BB {
            min_lon: 37.,
            min_lat: 55.,
            max_lon: 38.,
            max_lat: 56.,
        },
    ),
    (
        Region::NorthWestern,
        BB {
            min_lon: 29.,
            min_lat: 59.,
            max_lon: 30.,
            max_lat: 60.,
        },
    ),
    (
        Region::Southern,
        BB {
            min_lon: 43.,
            min_lat: 44.,
            max_lon: 44.,
            max_lat: 45.,
        },
    ),
];

/// Classify a point, `None` gives `None`.
///
pub fn classify(point: Option<GeoPoint>) -> Option<Region> {
    let point = point?;
    let region = REGIONS
        .iter()
        .find(|(_, bb)| bb.contains(&point))
        .map(|(r, _)| *r)
        .unwrap_or(Region::Undetermined);
    Some(region)
}
