//! Diagnostics emitted while processing rows.
//!
//! Nothing in the normalizer ever stops a run, every problem ends up here as a `Diagnostic`
//! and the caller decides what to do with it.
//!
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use strum::EnumString;
use tracing::{error, info, warn};

use crate::ReportKind;

/// Where did it happen?
///
#[derive(
    Copy, Clone, Debug, Deserialize, PartialEq, Eq, Serialize, strum::Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Shr,
    Dep,
    Arr,
    /// Assembling the record itself
    Normalize,
}

impl From<ReportKind> for Stage {
    fn from(kind: ReportKind) -> Self {
        match kind {
            ReportKind::Dep => Stage::Dep,
            ReportKind::Arr => Stage::Arr,
        }
    }
}

#[derive(
    Copy, Clone, Debug, Deserialize, PartialEq, Eq, PartialOrd, Ord, Serialize, strum::Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Skipped row, nothing wrong with it
    Info,
    /// One message lost, the row survived
    Warning,
    /// Row lost
    Error,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Diagnostic {
    pub row_number: usize,
    pub stage: Stage,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn new(row_number: usize, stage: Stage, severity: Severity, message: &str) -> Self {
        Diagnostic {
            row_number,
            stage,
            severity,
            message: message.to_string(),
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {} [{}] {}", self.row_number, self.stage, self.message)
    }
}

/// Counters for a whole run.
///
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RunSummary {
    pub rows_seen: usize,
    pub rows_emitted: usize,
    pub rows_skipped_empty: usize,
    pub rows_skipped_error: usize,
}

impl RunSummary {
    /// Every row seen is accounted for exactly once.
    ///
    pub fn is_balanced(&self) -> bool {
        self.rows_seen == self.rows_emitted + self.rows_skipped_empty + self.rows_skipped_error
    }
}

/// Receives diagnostics from the normalizer, possibly from several threads.
///
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diag: Diagnostic);
    /// Called once at the end of a run
    fn summary(&self, _summary: &RunSummary) {}
}

/// Default sink, everything goes to the log.
///
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, diag: Diagnostic) {
        match diag.severity {
            Severity::Info => info!("{diag}"),
            Severity::Warning => warn!("{diag}"),
            Severity::Error => error!("{diag}"),
        }
    }

    fn summary(&self, summary: &RunSummary) {
        info!(
            "{} rows seen, {} emitted, {} empty, {} in error",
            summary.rows_seen,
            summary.rows_emitted,
            summary.rows_skipped_empty,
            summary.rows_skipped_error
        );
    }
}

/// Keeps everything, mostly for tests and for the `stats` command.
///
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Diagnostic>>,
    last: Mutex<Option<RunSummary>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Diagnostic> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn last_summary(&self) -> Option<RunSummary> {
        *self.last.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, diag: Diagnostic) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(diag);
    }

    fn summary(&self, summary: &RunSummary) {
        *self.last.lock().unwrap_or_else(|e| e.into_inner()) = Some(*summary);
    }
}
