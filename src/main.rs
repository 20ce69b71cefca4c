// Miner Stats - Free and Open Source Software Statement
//
// File: src/main.rs
// Version: 2.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// Entry point: load the configuration, open the statistics store and run
// every configured benchmark in turn. Any fatal error exits non-zero.

use anyhow::Context;
use clap::Parser;
use log::info;
use miner_stats::{
    BenchmarkRunner, Config, RunOptions, Store, core::types::Args, logging,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose, args.log_file.as_deref())?;

    let config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config file {}", args.config.display()))?;
    let store = Store::open(&config.database).context("Unable to open the statistics store")?;

    let runner = BenchmarkRunner::new(&store, &config, RunOptions::from(&args));
    let report = runner.run().await?;

    for software in &report.software {
        info!(
            "🧾 {}: {} algorithms, {} statistics",
            software.name, software.algorithms_benchmarked, software.statistics_written
        );
    }
    info!("Operations complete.");
    Ok(())
}
