use std::path::PathBuf;

use clap::{crate_authors, crate_description, crate_name, crate_version, Args, Parser};

use crate::output::OutputFormat;

/// CLI options
#[derive(Debug, Parser)]
#[command(disable_version_flag = true)]
#[clap(name = crate_name!(), about = crate_description!())]
#[clap(version = crate_version!(), author = crate_authors!())]
pub struct Opts {
    /// configuration file.
    #[clap(short = 'c', long)]
    pub config: Option<String>,
    /// Verbose mode.
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// Hierarchical output for the logs.
    #[clap(long)]
    pub tree: bool,
    /// Also log into hourly files named after this.
    #[clap(long)]
    pub log_file: Option<String>,
    /// Sub-commands (see below).
    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

#[derive(Debug, Parser)]
pub enum SubCommand {
    /// Normalise all rows and write the flights.
    Convert(ConvertOpts),
    /// Normalise all rows and display statistics.
    Stats(StatsOpts),
    /// List all package versions.
    Version,
}

/// Where and how to read the rows.
#[derive(Debug, Args)]
pub struct InputOpts {
    /// CSV file with center, SHR, DEP & ARR columns.
    #[clap(short = 'i', long)]
    pub input: PathBuf,
    /// First line is a header.
    #[clap(long)]
    pub headers: bool,
    /// Field delimiter.
    #[clap(short = 'd', long)]
    pub delimiter: Option<String>,
}

#[derive(Debug, Parser)]
pub struct ConvertOpts {
    #[clap(flatten)]
    pub input: InputOpts,
    /// Output file (default is stdout).
    #[clap(short = 'o', long)]
    pub output: Option<PathBuf>,
    /// Output format.
    #[clap(short = 'F', long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Use all cores.
    #[clap(short = 'P', long)]
    pub parallel: bool,
}

#[derive(Debug, Parser)]
pub struct StatsOpts {
    #[clap(flatten)]
    pub input: InputOpts,
    /// How many entries in each table.
    #[clap(short = 'n', long, default_value = "10")]
    pub top: usize,
}
