//! Extract flights from SHR/DEP/ARR message exports and normalise them.
//!
//! The input is a CSV file with one row per flight and four columns: center code, SHR, DEP and
//! ARR messages.  Each row is run through the normalizer from `flightmsg-formats`, records are
//! written as NDJSON or flat CSV.
//!

use clap::{crate_authors, crate_version, Parser};
use eyre::Result;
use tracing::{info, trace};

use flightmsg_common::{init_logging, ConfigFile};

use crate::cli::{Opts, SubCommand};
use crate::cmds::handle_cmds;
use crate::config::{ParseConfig, CONFIG};

mod cli;
mod cmds;
mod config;
mod error;
mod input;
mod output;
mod stats;

/// Binary name, using a different binary name
pub const NAME: &str = env!("CARGO_BIN_NAME");
/// Binary version
pub const VERSION: &str = crate_version!();
/// Authors
pub const AUTHORS: &str = crate_authors!();

fn main() -> Result<()> {
    let opts = Opts::parse();

    // Initialise logging early
    //
    init_logging(NAME, opts.tree, opts.log_file.clone(), opts.verbose)?;
    trace!("Logging initialised.");

    if let SubCommand::Version = opts.subcmd {
        println!(
            "{} v{} by {}\n{}\n{}",
            NAME,
            VERSION,
            AUTHORS,
            flightmsg_common::version(),
            flightmsg_formats::version()
        );
        return Ok(());
    }

    info!("Loading config…");
    let cfg = ConfigFile::<ParseConfig>::load(CONFIG, opts.config.as_deref())?.into_inner();
    trace!("{:?}", cfg);

    handle_cmds(&cfg, &opts)
}
