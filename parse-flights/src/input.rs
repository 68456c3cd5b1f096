//! Reading raw rows from a CSV export.
//!
//! Columns are, in order: center code, SHR, DEP and ARR.  Rows can be shorter (missing
//! cells are empty), extra columns are ignored.  Invalid UTF-8 is replaced, not rejected.
//!
use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use eyre::{Result, WrapErr};
use tracing::debug;

use flightmsg_formats::RawRow;

use crate::error::Status;

/// Row source over any reader.
///
pub struct RowReader<R: Read> {
    rdr: csv::Reader<R>,
}

impl<R: Read> RowReader<R> {
    pub fn new(input: R, has_headers: bool, delimiter: u8) -> Self {
        let rdr = ReaderBuilder::new()
            .has_headers(has_headers)
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(input);
        RowReader { rdr }
    }

    /// All data rows, numbered from 1.  CSV and I/O errors are passed along, the caller
    /// decides whether to stop.
    ///
    pub fn rows(self) -> impl Iterator<Item = Result<RawRow>> {
        self.rdr
            .into_byte_records()
            .enumerate()
            .map(|(i, rec)| {
                let rec = rec.wrap_err_with(|| format!("can not read row {}", i + 1))?;
                let cells: Vec<Cow<'_, str>> = rec.iter().map(String::from_utf8_lossy).collect();
                Ok(RawRow::from_cells(i + 1, &cells))
            })
    }
}

/// Open the input file.
///
#[tracing::instrument]
pub fn open_input(path: &Path, has_headers: bool, delimiter: u8) -> Result<RowReader<File>> {
    let fh = File::open(path).map_err(|source| Status::NoInput {
        path: path.to_string_lossy().to_string(),
        source,
    })?;
    debug!("reading {path:?}");
    Ok(RowReader::new(fh, has_headers, delimiter))
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;

    use flightmsg_formats::{MemorySink, NormalizedRecord, Normalizer, NormalizerConfig};

    use super::*;

    /// Serves `data` once, then fails.
    struct Broken {
        data: &'static [u8],
    }

    impl Read for Broken {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() {
                return Err(io::Error::new(io::ErrorKind::Other, "disk gone"));
            }
            let n = self.data.read(buf)?;
            Ok(n)
        }
    }

    #[test]
    fn test_rows() {
        let data = "ZZ,SID/1,-ATD 0705,-ATA 0800\n,,,\nYY,\"SID/2\nTYP/BLA\"\n";
        let rows: Vec<RawRow> = RowReader::new(data.as_bytes(), false, b',')
            .rows()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(3, rows.len());
        assert_eq!(1, rows[0].row_number);
        assert_eq!(Some("-ATA 0800"), rows[0].arr_text.as_deref());

        assert_eq!(RawRow { row_number: 2, ..RawRow::default() }, rows[1]);

        assert_eq!(3, rows[2].row_number);
        assert_eq!(Some("SID/2\nTYP/BLA"), rows[2].shr_text.as_deref());
        assert_eq!(None, rows[2].dep_text);
    }

    #[test]
    fn test_rows_headers_delimiter() {
        let data = "center;shr;dep;arr\nZZ;SID/1;;\n";
        let rows: Vec<RawRow> = RowReader::new(data.as_bytes(), true, b';').rows().collect::<Result<_>>().unwrap();

        assert_eq!(1, rows.len());
        assert_eq!(1, rows[0].row_number);
        assert_eq!(Some("ZZ"), rows[0].center_code.as_deref());
        assert_eq!(None, rows[0].dep_text);
    }

    #[test]
    fn test_rows_bad_utf8() {
        let data: &[u8] = b"Z\xffZ,SID/1\n";
        let rows: Vec<RawRow> = RowReader::new(data, false, b',')
            .rows()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(Some("Z\u{fffd}Z"), rows[0].center_code.as_deref());
    }

    #[test]
    fn test_open_missing() {
        let Err(err) = open_input(Path::new("/nonexistent/rows.csv"), false, b',') else {
            panic!("should not open");
        };
        match err.downcast_ref::<Status>() {
            Some(Status::NoInput { path, source }) => {
                assert_eq!("/nonexistent/rows.csv", path);
                assert_eq!(io::ErrorKind::NotFound, source.kind());
            }
            other => panic!("bad error {other:?}"),
        }
    }

    #[test]
    fn test_rows_read_error() {
        let input = Broken {
            data: b"ZZ,SID/1\nYY,SID/2\n",
        };
        let rows: Vec<Result<RawRow>> = RowReader::new(input, false, b',')
            .rows()
            .take(3)
            .collect();

        assert_eq!(3, rows.len());
        assert_eq!(Some("ZZ"), rows[0].as_ref().unwrap().center_code.as_deref());
        assert_eq!(2, rows[1].as_ref().unwrap().row_number);
        let err = rows[2].as_ref().unwrap_err();
        assert!(format!("{err:#}").contains("disk gone"));
    }

    #[test]
    fn test_read_error_fails_run() {
        let input = Broken {
            data: b"ZZ,SID/1\nYY,SID/2\n",
        };
        let rows = RowReader::new(input, false, b',').rows();
        let mut out: Vec<NormalizedRecord> = vec![];
        let norm = Normalizer::new(NormalizerConfig::default(), Arc::new(MemorySink::new()));
        let res = norm.try_run(rows, &mut out);

        assert!(res.is_err());
        assert_eq!(2, out.len());
    }
}
