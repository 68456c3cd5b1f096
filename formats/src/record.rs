//! The normalized flight record, what we hand over downstream.
//!

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::{GeoPoint, Region};

/// Snapshot of the SHR message with the identification fields.
///
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ShrSnapshot {
    pub original_text: Option<String>,
    pub flight_number: Option<String>,
    pub operator_name: Option<String>,
    pub aircraft_type: Option<String>,
}

/// Snapshot of a DEP or ARR report, only the text.
///
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ReportSnapshot {
    pub original_text: Option<String>,
}

/// One normalized flight, built once from a row through `NormalizedRecordBuilder`.
///
/// Times are anchored on a placeholder date (see `decode_time`), only their time of day
/// is meaningful.
///
#[derive(Builder, Clone, Debug, Deserialize, PartialEq, Serialize)]
#[builder(pattern = "owned", setter(into))]
pub struct NormalizedRecord {
    /// Row in the source file
    pub row_number: usize,
    #[builder(default)]
    pub center_code: Option<String>,
    #[builder(default)]
    pub flight_number: Option<String>,
    #[builder(default)]
    pub aircraft_type: Option<String>,
    #[builder(default)]
    pub operator_name: Option<String>,
    #[builder(default)]
    pub operator_phone: Option<String>,
    #[builder(default)]
    pub flight_date: Option<NaiveDate>,
    #[builder(default)]
    pub takeoff_time: Option<NaiveDateTime>,
    #[builder(default)]
    pub landing_time: Option<NaiveDateTime>,
    #[builder(default)]
    pub takeoff_coords: Option<GeoPoint>,
    #[builder(default)]
    pub landing_coords: Option<GeoPoint>,
    #[builder(default)]
    pub takeoff_coords_text: Option<String>,
    #[builder(default)]
    pub landing_coords_text: Option<String>,
    #[builder(default)]
    pub region_takeoff: Option<Region>,
    #[builder(default)]
    pub region_landing: Option<Region>,
    #[builder(default)]
    pub flight_duration_minutes: Option<i64>,
    #[builder(default)]
    pub remarks: Option<String>,
    /// Uninterpreted DEP/ARR keys, as `dep_<key>` and `arr_<key>`
    #[builder(default)]
    pub extras: BTreeMap<String, String>,
    #[builder(default)]
    pub raw_shr_data: ShrSnapshot,
    #[builder(default)]
    pub raw_dep_data: ReportSnapshot,
    #[builder(default)]
    pub raw_arr_data: ReportSnapshot,
}

impl NormalizedRecord {
    pub fn builder() -> NormalizedRecordBuilder {
        NormalizedRecordBuilder::default()
    }

    /// A record is worth keeping only if something identifies it.
    ///
    pub fn is_identified(&self) -> bool {
        self.center_code.is_some()
            || self.flight_number.is_some()
            || self.operator_name.is_some()
            || self.aircraft_type.is_some()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_builder_needs_row_number() {
        assert!(NormalizedRecord::builder().build().is_err());
    }

    #[test]
    fn test_builder_defaults() {
        let r = NormalizedRecord::builder().row_number(1usize).build().unwrap();
        assert_eq!(1, r.row_number);
        assert!(r.extras.is_empty());
        assert_eq!(ShrSnapshot::default(), r.raw_shr_data);
        assert!(!r.is_identified());
    }

    #[rstest]
    #[case(Some("ZZ"), None, None, None)]
    #[case(None, Some("1234"), None, None)]
    #[case(None, None, Some("ACME"), None)]
    #[case(None, None, None, Some("BLA"))]
    fn test_is_identified(
        #[case] center: Option<&str>,
        #[case] number: Option<&str>,
        #[case] operator: Option<&str>,
        #[case] typ: Option<&str>,
    ) {
        let r = NormalizedRecord::builder()
            .row_number(1usize)
            .center_code(center.map(String::from))
            .flight_number(number.map(String::from))
            .operator_name(operator.map(String::from))
            .aircraft_type(typ.map(String::from))
            .build()
            .unwrap();
        assert!(r.is_identified());
    }

    #[test]
    fn test_snapshot_json() {
        let s = ShrSnapshot {
            original_text: Some("SID/1".into()),
            flight_number: Some("1".into()),
            ..ShrSnapshot::default()
        };
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!("SID/1", json["original_text"]);
        assert!(json["operator_name"].is_null());
    }
}
