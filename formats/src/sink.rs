//! Downstream side: where normalized records go.
//!

use eyre::Result;

use crate::NormalizedRecord;

/// Consumer of normalized records.  Storage details (schema, batching, encoding) are up to
/// the implementation.
///
pub trait FlightSink {
    /// Take one record
    fn write(&mut self, record: NormalizedRecord) -> Result<()>;

    /// Called once at the end of a run
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl FlightSink for Vec<NormalizedRecord> {
    fn write(&mut self, record: NormalizedRecord) -> Result<()> {
        self.push(record);
        Ok(())
    }
}
