//! Flight message formats
//!
//! This crate extracts flight movements from the free-text messages of the flight plan
//! workflow:
//!
//! - `SHR`, the flight plan header, with its slash-delimited markers,
//! - `DEP` and `ARR`, the departure & arrival reports, one `-KEY VALUE` per line.
//!
//! The codecs (coordinates, dates & times) are pure functions returning `None` on anything
//! they do not understand.  On top of them, the `Normalizer` turns one raw row into one
//! `NormalizedRecord`, reporting problems to a `DiagnosticSink` instead of failing.
//!

pub use coords::*;
pub use diag::*;
pub use duration::*;
pub use extract::*;
pub use normalize::*;
pub use raw::*;
pub use record::*;
pub use region::*;
pub use report::*;
pub use shr::*;
pub use sink::*;
pub use temporal::*;

mod common;
mod coords;
mod diag;
mod duration;
mod extract;
mod normalize;
mod raw;
mod record;
mod region;
mod report;
mod shr;
mod sink;
mod temporal;

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
///
pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}
