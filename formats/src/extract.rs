//! Message-level extraction.
//!
//! `Extract` is the seam between the normalizer and the message parsers.  A failure here only
//! loses the fields of that one message, the rest of the row goes on.
//!
use thiserror::Error;

use crate::{parse_report, parse_shr, Report, ReportKind, Shr};

/// Longest message we accept, the spreadsheet cell limit.
///
pub const MAX_MESSAGE_LEN: usize = 32_767;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("message too long ({len} > {max} chars)")]
    Oversized { len: usize, max: usize },
    #[error("NUL byte at position {pos}")]
    NulByte { pos: usize },
}

/// Turn message texts into typed fields.
///
pub trait Extract: Send + Sync {
    /// Flight plan header
    fn shr(&self, text: &str) -> Result<Shr, ExtractError>;
    /// DEP or ARR report
    fn report(&self, kind: ReportKind, text: &str) -> Result<Report, ExtractError>;
}

/// Default extractor, sanity checks then runs the parsers.
///
#[derive(Clone, Debug)]
pub struct MessageParser {
    max_len: usize,
}

impl Default for MessageParser {
    fn default() -> Self {
        MessageParser {
            max_len: MAX_MESSAGE_LEN,
        }
    }
}

impl MessageParser {
    pub fn new(max_len: usize) -> Self {
        MessageParser { max_len }
    }

    fn check(&self, text: &str) -> Result<(), ExtractError> {
        if let Some(pos) = text.find('\0') {
            return Err(ExtractError::NulByte { pos });
        }
        let len = text.chars().count();
        if len > self.max_len {
            return Err(ExtractError::Oversized {
                len,
                max: self.max_len,
            });
        }
        Ok(())
    }
}

impl Extract for MessageParser {
    fn shr(&self, text: &str) -> Result<Shr, ExtractError> {
        self.check(text)?;
        Ok(parse_shr(text))
    }

    fn report(&self, kind: ReportKind, text: &str) -> Result<Report, ExtractError> {
        self.check(text)?;
        Ok(parse_report(kind, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_parser_ok() {
        let p = MessageParser::default();
        let shr = p.shr("SID/1234 TYP/BLA").unwrap();
        assert_eq!(Some("1234"), shr.flight_number.as_deref());

        let dep = p.report(ReportKind::Dep, "-ATD 0705").unwrap();
        assert!(dep.time.is_some());
    }

    #[test]
    fn test_message_parser_oversized() {
        let p = MessageParser::new(8);
        assert_eq!(
            Err(ExtractError::Oversized { len: 16, max: 8 }),
            p.shr("SID/1234 TYP/BLA")
        );
        // chars, not bytes
        assert!(p.shr("ПОЛЕТ").is_ok());
    }

    #[test]
    fn test_message_parser_nul() {
        let p = MessageParser::default();
        assert_eq!(
            Err(ExtractError::NulByte { pos: 4 }),
            p.report(ReportKind::Arr, "-ATA\0 0705")
        );
    }
}
