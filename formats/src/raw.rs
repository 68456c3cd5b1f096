//! Input rows as handed over by the reader.
//!

use serde::{Deserialize, Serialize};

/// One row of the tabular source.  Blank cells are `None`, never `""`, the others are kept
/// untouched.
///
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RawRow {
    /// 1-based row number in the source
    pub row_number: usize,
    /// Code of the originating center
    pub center_code: Option<String>,
    /// SHR message
    pub shr_text: Option<String>,
    /// DEP report
    pub dep_text: Option<String>,
    /// ARR report
    pub arr_text: Option<String>,
}

/// Cell as-is, blank (empty or only whitespace) is `None`.
///
#[inline]
pub fn cell<S: AsRef<str>>(s: Option<S>) -> Option<String> {
    s.and_then(|s| {
        let s = s.as_ref();
        (!s.trim().is_empty()).then(|| s.to_string())
    })
}

impl RawRow {
    /// Build a row from up to four cells, in source order; missing cells are `None`.
    ///
    pub fn from_cells<S: AsRef<str>>(row_number: usize, cells: &[S]) -> Self {
        let at = |i: usize| cell(cells.get(i));
        RawRow {
            row_number,
            center_code: at(0),
            shr_text: at(1),
            dep_text: at(2),
            arr_text: at(3),
        }
    }
}
