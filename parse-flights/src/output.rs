//! Output sinks for normalized records.
//!
//! - `ndjson`: one JSON document per record, as-is.
//! - `csv`: one flat row per record, points as WKT and nested data as JSON strings, the way
//!   it is loaded into a database table.
//!
use std::io::Write;

use clap::ValueEnum;
use eyre::Result;
use serde::{Deserialize, Serialize};
use strum::EnumString;
use tracing::trace;

use flightmsg_formats::{FlightSink, NormalizedRecord, Region};

/// Supported output formats.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[derive(Deserialize, Serialize, strum::Display, EnumString, ValueEnum)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Newline-delimited JSON
    Ndjson,
    /// Flat CSV with a header
    Csv,
}

/// JSON lines.
///
pub struct NdjsonSink<W: Write> {
    out: W,
}

impl<W: Write> NdjsonSink<W> {
    pub fn new(out: W) -> Self {
        NdjsonSink { out }
    }
}

impl<W: Write> FlightSink for NdjsonSink<W> {
    fn write(&mut self, record: NormalizedRecord) -> Result<()> {
        serde_json::to_writer(&mut self.out, &record)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Flat version of `NormalizedRecord`, one column per field.
///
#[derive(Debug, Serialize)]
struct FlatRecord {
    row_number: usize,
    center_code: Option<String>,
    flight_number: Option<String>,
    aircraft_type: Option<String>,
    operator_name: Option<String>,
    operator_phone: Option<String>,
    flight_date: Option<String>,
    takeoff_time: Option<String>,
    landing_time: Option<String>,
    takeoff_coords: Option<String>,
    landing_coords: Option<String>,
    takeoff_coords_text: Option<String>,
    landing_coords_text: Option<String>,
    region_takeoff: Option<Region>,
    region_landing: Option<Region>,
    flight_duration_minutes: Option<i64>,
    remarks: Option<String>,
    extras: String,
    raw_shr_data: String,
    raw_dep_data: String,
    raw_arr_data: String,
}

impl FlatRecord {
    fn flatten(r: NormalizedRecord) -> Result<Self> {
        Ok(FlatRecord {
            extras: serde_json::to_string(&r.extras)?,
            raw_shr_data: serde_json::to_string(&r.raw_shr_data)?,
            raw_dep_data: serde_json::to_string(&r.raw_dep_data)?,
            raw_arr_data: serde_json::to_string(&r.raw_arr_data)?,
            row_number: r.row_number,
            center_code: r.center_code,
            flight_number: r.flight_number,
            aircraft_type: r.aircraft_type,
            operator_name: r.operator_name,
            operator_phone: r.operator_phone,
            flight_date: r.flight_date.map(|d| d.format("%Y-%m-%d").to_string()),
            takeoff_time: r.takeoff_time.map(|t| t.format("%H:%M:%S").to_string()),
            landing_time: r.landing_time.map(|t| t.format("%H:%M:%S").to_string()),
            takeoff_coords: r.takeoff_coords.map(|p| p.to_wkt()),
            landing_coords: r.landing_coords.map(|p| p.to_wkt()),
            takeoff_coords_text: r.takeoff_coords_text,
            landing_coords_text: r.landing_coords_text,
            region_takeoff: r.region_takeoff,
            region_landing: r.region_landing,
            flight_duration_minutes: r.flight_duration_minutes,
            remarks: r.remarks,
        })
    }
}

/// Flat CSV, header written with the first record.
///
pub struct CsvSink<W: Write> {
    wtr: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(out: W) -> Self {
        CsvSink {
            wtr: csv::Writer::from_writer(out),
        }
    }
}

impl<W: Write> FlightSink for CsvSink<W> {
    fn write(&mut self, record: NormalizedRecord) -> Result<()> {
        trace!("row {}", record.row_number);
        self.wtr.serialize(FlatRecord::flatten(record)?)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.wtr.flush()?;
        Ok(())
    }
}

/// Returns the sink for `format` writing into `out`.
///
pub fn make_sink<'a, W: Write + 'a>(format: OutputFormat, out: W) -> Box<dyn FlightSink + 'a> {
    match format {
        OutputFormat::Ndjson => Box::new(NdjsonSink::new(out)),
        OutputFormat::Csv => Box::new(CsvSink::new(out)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;
    use rstest::rstest;

    use flightmsg_formats::{decode_coords, decode_time, ShrSnapshot};

    use super::*;

    fn record() -> NormalizedRecord {
        NormalizedRecord::builder()
            .row_number(4usize)
            .center_code(Some("ZZ".to_string()))
            .flight_number(Some("1234".to_string()))
            .flight_date(NaiveDate::from_ymd_opt(2024, 5, 1))
            .takeoff_time(decode_time("0705"))
            .takeoff_coords(decode_coords("5957N02905E"))
            .region_takeoff(Some(Region::NorthWestern))
            .extras(BTreeMap::from([("dep_reg".to_string(), "00724".to_string())]))
            .raw_shr_data(ShrSnapshot {
                original_text: Some("SID/1234".to_string()),
                flight_number: Some("1234".to_string()),
                ..ShrSnapshot::default()
            })
            .build()
            .unwrap()
    }

    #[rstest]
    #[case("ndjson", OutputFormat::Ndjson)]
    #[case("CSV", OutputFormat::Csv)]
    fn test_output_format(#[case] s: &str, #[case] f: OutputFormat) {
        assert_eq!(f, s.parse::<OutputFormat>().unwrap());
    }

    #[test]
    fn test_ndjson() {
        let mut buf = vec![];
        {
            let mut sink = NdjsonSink::new(&mut buf);
            sink.write(record()).unwrap();
            sink.write(record()).unwrap();
            sink.finish().unwrap();
        }
        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(2, lines.len());

        let back: NormalizedRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(record(), back);
        assert!(lines[0].contains("Северо-Западный федеральный округ"));
    }

    #[test]
    fn test_csv() {
        let mut buf = vec![];
        {
            let mut sink = CsvSink::new(&mut buf);
            sink.write(record()).unwrap();
            sink.finish().unwrap();
        }
        let out = String::from_utf8(buf).unwrap();
        let mut rdr = csv::Reader::from_reader(out.as_bytes());

        let headers = rdr.headers().unwrap().clone();
        assert_eq!(Some("row_number"), headers.get(0));
        assert_eq!(21, headers.len());

        let rec = rdr.records().next().unwrap().unwrap();
        let col = |name: &str| {
            let i = headers.iter().position(|h| h == name).unwrap();
            rec.get(i).unwrap().to_string()
        };
        assert_eq!("4", col("row_number"));
        assert_eq!("2024-05-01", col("flight_date"));
        assert_eq!("07:05:00", col("takeoff_time"));
        assert_eq!("", col("landing_time"));
        assert!(col("takeoff_coords").starts_with("POINT(29.08"));
        assert_eq!("Северо-Западный федеральный округ", col("region_takeoff"));
        assert_eq!(r#"{"dep_reg":"00724"}"#, col("extras"));
        assert_eq!(r#"{"original_text":null}"#, col("raw_arr_data"));
    }
}
