use eyre::Result;

use crate::cli::StatsOpts;
use crate::cmds::{normalizer, open_rows};
use crate::config::ParseConfig;
use crate::stats::{count_table, summary_table, StatsSink};

/// Normalise everything and display the summary and the top regions & aircraft types.
///
#[tracing::instrument(skip(cfg))]
pub fn analyse(cfg: &ParseConfig, opts: &StatsOpts) -> Result<()> {
    let rows = open_rows(cfg, &opts.input)?;

    let mut stats = StatsSink::default();
    let summary = normalizer(cfg).try_run(rows.rows(), &mut stats)?;

    println!("{}", summary_table(&summary));
    println!("{}", count_table("Takeoff region", &stats.top_regions(opts.top)));
    println!("{}", count_table("Aircraft type", &stats.top_types(opts.top)));
    if let Some(avg) = stats.average_duration() {
        println!("Average flight duration: {avg} mn");
    }
    Ok(())
}
