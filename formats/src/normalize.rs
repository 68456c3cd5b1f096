//! Row normalization.
//!
//! One `RawRow` in, at most one `NormalizedRecord` out.  The three messages are extracted
//! independently, merged, enriched with the duration and the regions and finally checked
//! against the retention rule.
//!
//! Nothing here is fatal: a message that cannot be extracted costs its fields, a row that
//! cannot be assembled costs the row, and both end up as diagnostics.  Only a failing
//! `FlightSink` stops a run.
//!
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use eyre::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::{
    classify, duration_minutes, CodedPoint, Diagnostic, DiagnosticSink, Extract, FlightSink,
    MessageParser, NormalizedRecord, NormalizedRecordBuilderError, RawRow, Report, ReportKind,
    ReportSnapshot, RunSummary, Severity, Shr, ShrSnapshot, Stage, MAX_MESSAGE_LEN,
};

/// Knobs for a run.
///
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Longest message text accepted
    pub max_message_len: usize,
    /// Empty rows reported as diagnostics, the rest are only counted
    pub max_empty_reports: usize,
    /// Log progress every N rows, 0 to disable
    pub progress_every: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        NormalizerConfig {
            max_message_len: MAX_MESSAGE_LEN,
            max_empty_reports: 5,
            progress_every: 5_000,
        }
    }
}

/// Why a whole row was lost.
///
#[derive(Debug, Error)]
pub enum RowError {
    #[error("row processing panicked: {0}")]
    Panic(String),
    #[error("can not build record: {0}")]
    Build(#[from] NormalizedRecordBuilderError),
}

/// What became of a row.
///
#[derive(Debug)]
pub enum RowOutcome {
    Emitted(NormalizedRecord),
    /// Nothing to identify the flight with
    Empty,
    Failed(RowError),
}

/// The row normalizer, generic over the message extractor.
///
pub struct Normalizer<E: Extract = MessageParser> {
    extractor: E,
    diag: Arc<dyn DiagnosticSink>,
    config: NormalizerConfig,
}

impl Normalizer<MessageParser> {
    pub fn new(config: NormalizerConfig, diag: Arc<dyn DiagnosticSink>) -> Self {
        let extractor = MessageParser::new(config.max_message_len);
        Normalizer {
            extractor,
            diag,
            config,
        }
    }
}

impl<E: Extract> Normalizer<E> {
    pub fn with_extractor(
        extractor: E,
        config: NormalizerConfig,
        diag: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Normalizer {
            extractor,
            diag,
            config,
        }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    fn warn(&self, row_number: usize, stage: Stage, message: &str) {
        self.diag
            .report(Diagnostic::new(row_number, stage, Severity::Warning, message));
    }

    fn extract_shr(&self, row: &RawRow) -> Shr {
        let Some(text) = row.shr_text.as_deref() else {
            return Shr::default();
        };
        self.extractor.shr(text).unwrap_or_else(|e| {
            self.warn(row.row_number, Stage::Shr, &e.to_string());
            Shr::default()
        })
    }

    fn extract_report(&self, row: &RawRow, kind: ReportKind, text: Option<&str>) -> Report {
        let Some(text) = text else {
            return Report::new(kind);
        };
        self.extractor.report(kind, text).unwrap_or_else(|e| {
            self.warn(row.row_number, kind.into(), &e.to_string());
            Report::new(kind)
        })
    }

    /// Build the record for one row, `None` if nothing identifies it.
    ///
    fn assemble(&self, row: &RawRow) -> Result<Option<NormalizedRecord>, RowError> {
        let shr = self.extract_shr(row);
        let dep = self.extract_report(row, ReportKind::Dep, row.dep_text.as_deref());
        let arr = self.extract_report(row, ReportKind::Arr, row.arr_text.as_deref());

        let takeoff = pick(dep.position.as_ref(), shr.takeoff.as_ref());
        let takeoff_coords = takeoff.and_then(|p| p.point);
        let takeoff_coords_text = takeoff.map(|p| p.text.clone());
        let takeoff_time = dep.time.or(shr.takeoff_time);

        let landing_coords = arr.position.as_ref().and_then(|p| p.point);
        let landing_coords_text = arr.position.as_ref().map(|p| p.text.clone());
        let landing_time = arr.time;

        let mut extras = dep.extras;
        extras.extend(arr.extras);

        let raw_shr_data = ShrSnapshot {
            original_text: row.shr_text.clone(),
            flight_number: shr.flight_number.clone(),
            operator_name: shr.operator_name.clone(),
            aircraft_type: shr.aircraft_type.clone(),
        };

        let record = NormalizedRecord::builder()
            .row_number(row.row_number)
            .center_code(row.center_code.clone())
            .flight_number(shr.flight_number)
            .aircraft_type(shr.aircraft_type)
            .operator_name(shr.operator_name)
            .operator_phone(shr.operator_phone)
            .flight_date(shr.flight_date)
            .takeoff_time(takeoff_time)
            .landing_time(landing_time)
            .takeoff_coords(takeoff_coords)
            .landing_coords(landing_coords)
            .takeoff_coords_text(takeoff_coords_text)
            .landing_coords_text(landing_coords_text)
            .region_takeoff(classify(takeoff_coords))
            .region_landing(classify(landing_coords))
            .flight_duration_minutes(duration_minutes(takeoff_time, landing_time))
            .remarks(shr.remarks)
            .extras(extras)
            .raw_shr_data(raw_shr_data)
            .raw_dep_data(ReportSnapshot {
                original_text: row.dep_text.clone(),
            })
            .raw_arr_data(ReportSnapshot {
                original_text: row.arr_text.clone(),
            })
            .build()?;

        trace!("row {}: {:?}", row.row_number, record);
        Ok(record.is_identified().then_some(record))
    }

    /// Process one row.  Whatever happens inside stays inside, including panics.
    ///
    pub fn process(&self, row: &RawRow) -> RowOutcome {
        match catch_unwind(AssertUnwindSafe(|| self.assemble(row))) {
            Ok(Ok(Some(record))) => RowOutcome::Emitted(record),
            Ok(Ok(None)) => RowOutcome::Empty,
            Ok(Err(e)) => RowOutcome::Failed(e),
            Err(payload) => RowOutcome::Failed(RowError::Panic(panic_message(payload))),
        }
    }

    /// Normalize `rows` one after the other, streaming records into `sink`.
    ///
    pub fn run<I, S>(&self, rows: I, sink: &mut S) -> Result<RunSummary>
    where
        I: IntoIterator<Item = RawRow>,
        S: FlightSink + ?Sized,
    {
        self.try_run(rows.into_iter().map(Ok), sink)
    }

    /// Same as `run` over a fallible source: the first source error stops the run and is
    /// returned, `sink.finish()` is not called.
    ///
    #[tracing::instrument(skip_all)]
    pub fn try_run<I, S>(&self, rows: I, sink: &mut S) -> Result<RunSummary>
    where
        I: IntoIterator<Item = Result<RawRow>>,
        S: FlightSink + ?Sized,
    {
        let mut summary = RunSummary::default();
        for row in rows {
            let row = row?;
            let outcome = self.process(&row);
            self.account(&mut summary, row.row_number, outcome, sink)?;
        }
        self.finish(summary, sink)
    }

    /// Same as `run` but rows are processed on the rayon pool.  Records reach `sink` in
    /// input order.
    ///
    #[tracing::instrument(skip_all)]
    pub fn run_parallel<S>(&self, rows: Vec<RawRow>, sink: &mut S) -> Result<RunSummary>
    where
        S: FlightSink + ?Sized,
    {
        debug!("{} rows on {} threads", rows.len(), rayon::current_num_threads());
        let outcomes: Vec<(usize, RowOutcome)> = rows
            .par_iter()
            .map(|row| (row.row_number, self.process(row)))
            .collect();

        let mut summary = RunSummary::default();
        for (row_number, outcome) in outcomes {
            self.account(&mut summary, row_number, outcome, sink)?;
        }
        self.finish(summary, sink)
    }

    /// Fold one outcome into the counters, the only place where they are touched.
    ///
    fn account<S>(
        &self,
        summary: &mut RunSummary,
        row_number: usize,
        outcome: RowOutcome,
        sink: &mut S,
    ) -> Result<()>
    where
        S: FlightSink + ?Sized,
    {
        summary.rows_seen += 1;
        match outcome {
            RowOutcome::Emitted(record) => {
                sink.write(record)?;
                summary.rows_emitted += 1;
            }
            RowOutcome::Empty => {
                summary.rows_skipped_empty += 1;
                if summary.rows_skipped_empty <= self.config.max_empty_reports {
                    self.diag.report(Diagnostic::new(
                        row_number,
                        Stage::Normalize,
                        Severity::Info,
                        "no identifying field, row skipped",
                    ));
                }
            }
            RowOutcome::Failed(e) => {
                summary.rows_skipped_error += 1;
                self.diag.report(Diagnostic::new(
                    row_number,
                    Stage::Normalize,
                    Severity::Error,
                    &e.to_string(),
                ));
            }
        }

        let every = self.config.progress_every;
        if every > 0 && summary.rows_seen % every == 0 {
            info!("{} rows processed, {} emitted", summary.rows_seen, summary.rows_emitted);
        }
        Ok(())
    }

    fn finish<S>(&self, summary: RunSummary, sink: &mut S) -> Result<RunSummary>
    where
        S: FlightSink + ?Sized,
    {
        sink.finish()?;
        self.diag.summary(&summary);
        Ok(summary)
    }
}

/// Prefer the point that actually decoded, `primary` first.  If neither did, keep whatever
/// text we have.
///
fn pick<'a>(
    primary: Option<&'a CodedPoint>,
    fallback: Option<&'a CodedPoint>,
) -> Option<&'a CodedPoint> {
    match (primary, fallback) {
        (Some(p), _) if p.point.is_some() => Some(p),
        (_, Some(f)) if f.point.is_some() => Some(f),
        (p, f) => p.or(f),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
