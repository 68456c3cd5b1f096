//! Configuration for `parse-flights`.
//!
//! Loaded from `-c <file>` or `$HOME/.config/flightmsg/parse-flights.hcl`, everything has a
//! default so the file is optional:
//!
//! ```hcl
//! version = 1
//!
//! has_headers = false
//! delimiter = ","
//! format = "ndjson"
//! parallel = false
//!
//! progress_every = 5000
//! max_empty_reports = 5
//! max_message_len = 32767
//! ```
//!
use eyre::Result;
use serde::{Deserialize, Serialize};

use flightmsg_common::Versioned;
use flightmsg_formats::{NormalizerConfig, MAX_MESSAGE_LEN};

use crate::error::Status;
use crate::output::OutputFormat;

/// Default configuration filename
pub const CONFIG: &str = "parse-flights.hcl";

/// Current version
const CVERSION: usize = 1;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Config file versioning
    pub version: usize,
    /// First line of the input is a header
    pub has_headers: bool,
    /// CSV field delimiter
    pub delimiter: String,
    /// Default output format
    pub format: OutputFormat,
    /// Process rows on all cores
    pub parallel: bool,
    pub progress_every: usize,
    pub max_empty_reports: usize,
    pub max_message_len: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        let norm = NormalizerConfig::default();
        ParseConfig {
            version: CVERSION,
            has_headers: false,
            delimiter: ",".to_string(),
            format: OutputFormat::Ndjson,
            parallel: false,
            progress_every: norm.progress_every,
            max_empty_reports: norm.max_empty_reports,
            max_message_len: MAX_MESSAGE_LEN,
        }
    }
}

impl Versioned for ParseConfig {
    const VERSION: usize = CVERSION;

    fn version(&self) -> usize {
        self.version
    }
}

impl ParseConfig {
    /// Settings for the normalizer
    ///
    pub fn normalizer(&self) -> NormalizerConfig {
        NormalizerConfig {
            max_message_len: self.max_message_len,
            max_empty_reports: self.max_empty_reports,
            progress_every: self.progress_every,
        }
    }
}

/// Check that the delimiter is a single ASCII character.
///
pub fn delimiter(s: &str) -> Result<u8> {
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(Status::BadDelimiter(s.to_string()).into()),
    }
}
