use std::fs::File;
use std::io::{self, BufWriter, Write};

use eyre::Result;
use tracing::info;

use flightmsg_formats::RunSummary;

use crate::cli::ConvertOpts;
use crate::cmds::{normalizer, open_rows};
use crate::config::ParseConfig;
use crate::output::make_sink;
use crate::stats::summary_table;

/// Read, normalise and write all flights.  The summary goes to stderr so that stdout can
/// be used for the records.
///
#[tracing::instrument(skip(cfg))]
pub fn convert(cfg: &ParseConfig, opts: &ConvertOpts) -> Result<RunSummary> {
    let rows = open_rows(cfg, &opts.input)?;
    let format = opts.format.unwrap_or(cfg.format);

    let out: Box<dyn Write> = match &opts.output {
        Some(fname) => {
            info!("writing {format} into {fname:?}");
            Box::new(BufWriter::new(File::create(fname)?))
        }
        None => Box::new(BufWriter::new(io::stdout())),
    };
    let mut sink = make_sink(format, out);

    let norm = normalizer(cfg);
    let summary = if opts.parallel || cfg.parallel {
        let rows = rows.rows().collect::<Result<Vec<_>>>()?;
        norm.run_parallel(rows, sink.as_mut())?
    } else {
        norm.try_run(rows.rows(), sink.as_mut())?
    };

    eprintln!("{}", summary_table(&summary));
    Ok(summary)
}
