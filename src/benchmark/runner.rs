// Miner Stats - Free and Open Source Software Statement
//
// This project, miner-stats, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/benchmark/runner.rs
// Version: 2.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the benchmark driver. For every configured program it
// synchronizes the reference tables, then runs the program once per pool
// algorithm it supports, parses the hashrate lines and stores one statistic
// per retained line. Everything is sequential: parallel runs would share the
// hardware and falsify each other's figures.

use crate::Result;
use crate::benchmark::invocation::{Invocation, PoolArgs};
use crate::benchmark::parser::{HashSample, StatMatcher};
use crate::benchmark::supervisor::Supervisor;
use crate::config::{Config, SoftwareConfig};
use crate::core::types::{Args, Miner, MiningSoftware, MiningSoftwareAlgorithm, NewMiningStatistic};
use crate::store::Store;
use crate::utils::format::FormatUtils;
use chrono::{Local, Utc};
use log::{debug, info};
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

const LOG_TARGET: &str = "miner_stats::runner";

/// Which parts of the configuration to act on
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Synchronize reference data without launching anything
    pub sync_only: bool,
    /// Benchmark only these software blocks; empty means all
    pub software: Vec<String>,
}

impl RunOptions {
    pub fn wants(&self, name: &str) -> bool {
        !self.sync_only && (self.software.is_empty() || self.software.iter().any(|s| s == name))
    }
}

impl From<&Args> for RunOptions {
    fn from(args: &Args) -> Self {
        Self {
            sync_only: args.sync_only,
            software: args.software.clone(),
        }
    }
}

/// Outcome for one software block
#[derive(Debug, Clone, PartialEq)]
pub struct SoftwareReport {
    pub name: String,
    pub software_id: i64,
    pub algorithms_benchmarked: usize,
    pub statistics_written: usize,
}

/// Outcome of a whole run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub miner: Miner,
    pub software: Vec<SoftwareReport>,
}

impl RunReport {
    pub fn statistics_written(&self) -> usize {
        self.software.iter().map(|s| s.statistics_written).sum()
    }
}

/// Main benchmark driver
pub struct BenchmarkRunner<'a> {
    store: &'a Store,
    config: &'a Config,
    options: RunOptions,
}

impl<'a> BenchmarkRunner<'a> {
    pub fn new(store: &'a Store, config: &'a Config, options: RunOptions) -> Self {
        Self {
            store,
            config,
            options,
        }
    }

    pub async fn run(&self) -> Result<RunReport> {
        info!(target: LOG_TARGET, "📋 Creating records required for calculations...");
        let miner = self.store.ensure_miner(&self.config.resolve_miner_name()?)?;

        let mut report = RunReport {
            miner: miner.clone(),
            software: Vec::with_capacity(self.config.software.len()),
        };
        for cfg in &self.config.software {
            report.software.push(self.run_software(&miner, cfg).await?);
        }

        info!(target: LOG_TARGET,
            "✅ Statistics stored: {} rows across {} programs",
            report.statistics_written(),
            report.software.len()
        );
        Ok(report)
    }

    async fn run_software(&self, miner: &Miner, cfg: &SoftwareConfig) -> Result<SoftwareReport> {
        let software = self.store.sync_software(cfg)?;
        let mut summary = SoftwareReport {
            name: software.name.clone(),
            software_id: software.id,
            algorithms_benchmarked: 0,
            statistics_written: 0,
        };

        if !cfg.should_benchmark() {
            debug!(target: LOG_TARGET, "{}: no filePath, references only", cfg.name);
            return Ok(summary);
        }
        self.store.record_install_path(miner.id, software.id, &cfg.file_path)?;

        if !self.options.wants(&cfg.name) {
            info!(target: LOG_TARGET, "⏭️ Skipping benchmarks for {}", cfg.name);
            return Ok(summary);
        }

        let algorithms = self.store.benchmark_algorithms(software.id)?;
        info!(target: LOG_TARGET,
            "🧪 Beginning mining statistic calculations for {} ({} algorithms)...",
            software.name,
            algorithms.len()
        );
        for algo in &algorithms {
            summary.statistics_written +=
                self.benchmark_algorithm(miner, &software, cfg, algo).await?;
            summary.algorithms_benchmarked += 1;
        }
        Ok(summary)
    }

    async fn benchmark_algorithm(
        &self,
        miner: &Miner,
        software: &MiningSoftware,
        cfg: &SoftwareConfig,
        algo: &MiningSoftwareAlgorithm,
    ) -> Result<usize> {
        info!(target: LOG_TARGET,
            "🚀 Starting statistics for {} / {}...",
            software.name, algo.name
        );

        let pool = if cfg.connect_for_assessment {
            Some(PoolArgs {
                url: self.store.select_pool_url(algo.algorithm_id)?,
                wallet: self.config.wallet.clone(),
                password: cfg.password.clone(),
            })
        } else {
            None
        };
        let invocation = Invocation::build(
            Path::new(&cfg.file_path),
            software,
            algo,
            pool.as_ref(),
            &self.config.log_directory,
            &Local::now(),
        );
        debug!(target: LOG_TARGET, "Output file: {}", invocation.log_path.display());

        let mut supervisor = Supervisor::new();
        let log = supervisor
            .run(&invocation, Duration::from_secs(u64::from(cfg.stat_wait_time)))
            .await?;
        let matcher = StatMatcher {
            search_phrase: &cfg.stat_search_phrase,
            skip_lines: cfg.skip_lines,
            skip_tokens: cfg.skip_tokens,
        };
        let samples = matcher.parse_output(BufReader::new(log))?;
        supervisor.finish();

        for sample in &samples {
            info!(target: LOG_TARGET,
                "Calculated {:.3} {} ({:.6}). Storing...",
                sample.work_per_second, sample.unit, sample.mh_factor
            );
            self.store.insert_statistic(&NewMiningStatistic {
                algorithm_id: algo.algorithm_id,
                miner_id: miner.id,
                mining_software_id: software.id,
                work_per_second: sample.work_per_second,
                mh_factor: sample.mh_factor,
                instant: Utc::now(),
            })?;
        }

        info!(target: LOG_TARGET,
            "📊 {} / {}: {} samples, average {}",
            software.name,
            algo.name,
            samples.len(),
            average(&samples).map_or_else(|| "n/a".to_string(), FormatUtils::format_megahashes)
        );
        Ok(samples.len())
    }
}

fn average(samples: &[HashSample]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().map(HashSample::megahashes).sum::<f64>() / samples.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_run_options_filters() {
        let args = Args::parse_from(["minerstats", "--software", "ccminer"]);
        let options = RunOptions::from(&args);
        assert!(options.wants("ccminer"));
        assert!(!options.wants("cpuminer-opt"));

        let sync_only = RunOptions::from(&Args::parse_from(["minerstats", "--sync-only"]));
        assert!(!sync_only.wants("ccminer"));

        assert!(RunOptions::default().wants("anything"));
    }

    #[test]
    fn test_average() {
        let sample = |v: f64, f: f64| HashSample {
            work_per_second: v,
            unit: String::new(),
            mh_factor: f,
        };
        assert_eq!(average(&[]), None);
        let avg = average(&[sample(1.0, 1.0), sample(3000.0, 0.001)]).unwrap();
        assert!((avg - 2.0).abs() < 1e-9);
    }
}

// Changelog:
// - v2.0.0 (2025-07-02): Rebuilt as a driver for external mining programs.
//   - Replaced in-process hashing threads with one supervised child process
//     per (software, algorithm) pair.
//   - Reference data and each measurement commit in their own transaction so
//     a late failure keeps earlier work.
// - v1.0.29 (2025-06-23): Fixed benchmark duration logic.
