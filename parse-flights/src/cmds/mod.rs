//! This is the main driver module for all the different commands.
//!

use std::sync::Arc;

use eyre::Result;
use tracing::info;

pub use analyse::*;
pub use convert::*;

use flightmsg_formats::{LogSink, Normalizer};

use crate::cli::{InputOpts, Opts, SubCommand};
use crate::config::{delimiter, ParseConfig};
use crate::input::{open_input, RowReader};

mod analyse;
mod convert;

#[tracing::instrument(skip(cfg))]
pub fn handle_cmds(cfg: &ParseConfig, opts: &Opts) -> Result<()> {
    match &opts.subcmd {
        SubCommand::Convert(copts) => {
            let summary = convert(cfg, copts)?;
            info!("{} flights written", summary.rows_emitted);
        }
        SubCommand::Stats(sopts) => {
            analyse(cfg, sopts)?;
        }
        // Done already.
        //
        SubCommand::Version => (),
    }
    Ok(())
}

/// Open the input, CLI flags win over the configuration.
///
fn open_rows(cfg: &ParseConfig, opts: &InputOpts) -> Result<RowReader<std::fs::File>> {
    let delim = delimiter(opts.delimiter.as_deref().unwrap_or(&cfg.delimiter))?;
    open_input(&opts.input, opts.headers || cfg.has_headers, delim)
}

/// Normalizer reporting through the logs.
///
fn normalizer(cfg: &ParseConfig) -> Normalizer {
    Normalizer::new(cfg.normalizer(), Arc::new(LogSink))
}
