//! Run statistics, rendered with `tabled`.
//!
use std::collections::BTreeMap;

use eyre::Result;
use tabled::builder::Builder;
use tabled::settings::Style;

use flightmsg_formats::{FlightSink, NormalizedRecord, Region, RunSummary};

/// Counts flights per takeoff region and aircraft type, records are not kept.
///
#[derive(Debug, Default)]
pub struct StatsSink {
    /// Flights per takeoff region, `None` when there was no position
    pub regions: BTreeMap<Option<Region>, usize>,
    /// Flights per aircraft type
    pub types: BTreeMap<String, usize>,
    /// Total flight time in minutes, for flights with a duration
    pub minutes: i64,
    pub with_duration: usize,
}

impl FlightSink for StatsSink {
    fn write(&mut self, record: NormalizedRecord) -> Result<()> {
        *self.regions.entry(record.region_takeoff).or_default() += 1;
        if let Some(t) = record.aircraft_type {
            *self.types.entry(t).or_default() += 1;
        }
        if let Some(d) = record.flight_duration_minutes {
            self.minutes += d;
            self.with_duration += 1;
        }
        Ok(())
    }
}

impl StatsSink {
    /// Regions sorted by decreasing count, then by name.
    ///
    pub fn top_regions(&self, n: usize) -> Vec<(String, usize)> {
        let all = self.regions.iter().map(|(r, c)| {
            let name = r.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string());
            (name, *c)
        });
        top(all, n)
    }

    /// Aircraft types sorted by decreasing count, then by name.
    ///
    pub fn top_types(&self, n: usize) -> Vec<(String, usize)> {
        top(self.types.iter().map(|(t, c)| (t.clone(), *c)), n)
    }

    pub fn average_duration(&self) -> Option<i64> {
        (self.with_duration > 0).then(|| self.minutes / self.with_duration as i64)
    }
}

fn top(all: impl Iterator<Item = (String, usize)>, n: usize) -> Vec<(String, usize)> {
    let mut all: Vec<_> = all.collect();
    all.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    all.truncate(n);
    all
}

/// Run summary as a table.
///
pub fn summary_table(summary: &RunSummary) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Rows", "Count"]);
    builder.push_record(["seen".to_string(), summary.rows_seen.to_string()]);
    builder.push_record(["emitted".to_string(), summary.rows_emitted.to_string()]);
    builder.push_record(["skipped (empty)".to_string(), summary.rows_skipped_empty.to_string()]);
    builder.push_record(["skipped (error)".to_string(), summary.rows_skipped_error.to_string()]);

    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}

/// Two-column table with a header.
///
pub fn count_table(name: &str, rows: &[(String, usize)]) -> String {
    let mut builder = Builder::default();
    builder.push_record([name, "Flights"]);
    rows.iter().for_each(|(k, c)| {
        builder.push_record([k.clone(), c.to_string()]);
    });

    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        n: usize,
        region: Option<Region>,
        typ: Option<&str>,
        d: Option<i64>,
    ) -> NormalizedRecord {
        NormalizedRecord::builder()
            .row_number(n)
            .region_takeoff(region)
            .aircraft_type(typ.map(String::from))
            .flight_duration_minutes(d)
            .build()
            .unwrap()
    }

    fn sink() -> StatsSink {
        let mut s = StatsSink::default();
        s.write(record(1, Some(Region::Central), Some("BLA"), Some(30))).unwrap();
        s.write(record(2, Some(Region::Central), Some("BEE"), None)).unwrap();
        s.write(record(3, Some(Region::Undetermined), Some("BLA"), Some(90))).unwrap();
        s.write(record(4, None, None, None)).unwrap();
        s
    }

    #[test]
    fn test_top_regions() {
        let s = sink();
        let top = s.top_regions(2);
        assert_eq!(2, top.len());
        assert_eq!(("Центральный федеральный округ".to_string(), 2), top[0]);
        // ties are by name, "-" sorts first
        assert_eq!(("-".to_string(), 1), top[1]);
    }

    #[test]
    fn test_top_types() {
        let s = sink();
        assert_eq!(
            vec![("BLA".to_string(), 2), ("BEE".to_string(), 1)],
            s.top_types(10)
        );
        assert_eq!(Some(60), s.average_duration());
        assert_eq!(None, StatsSink::default().average_duration());
    }

    #[test]
    fn test_tables() {
        let summary = RunSummary {
            rows_seen: 5,
            rows_emitted: 4,
            rows_skipped_empty: 1,
            rows_skipped_error: 0,
        };
        let t = summary_table(&summary);
        assert!(t.contains("skipped (empty)"));
        assert!(t.contains("emitted"));

        let t = count_table("Type", &sink().top_types(10));
        assert!(t.contains("Type"));
        assert!(t.contains("BLA"));
    }
}
