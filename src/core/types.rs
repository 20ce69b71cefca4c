// Miner Stats - Free and Open Source Software Statement
//
// This project, miner-stats, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/types.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines core data structures for the benchmark harness, located in
// the core subdirectory. It includes the command-line arguments and the row
// types read from and written to the statistics store.
//
// Tree Location:
// - src/core/types.rs (core data structures)
// - Depends on: clap, chrono

use chrono::{DateTime, Utc};
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the benchmark harness
#[derive(Parser, Debug)]
#[command(
    name = "minerstats",
    author = "Miner Stats Team",
    version,
    about = "Benchmarks external mining software against every pool algorithm it supports",
    long_about = "Miner Stats launches each configured mining program once per supported\n\
                  algorithm, lets it run for the configured wait time, parses the hashrate\n\
                  from its output and stores the normalized figure (MH/s factor) in the\n\
                  statistics database.\n\n\
                  Only algorithms that have at least one pool in the database are measured, so a\n\
                  pool statistics collection must have been run first.\n\n\
                  Examples:\n\
                    Full run:  minerstats --config MinerStats.toml\n\
                    Sync only: minerstats --config MinerStats.toml --sync-only\n\
                    One miner: minerstats --software cpuminer-opt --verbose"
)]
pub struct Args {
    /// Path to the TOML configuration file
    #[arg(
        short,
        long,
        default_value = "MinerStats.toml",
        value_name = "PATH",
        help = "Configuration file"
    )]
    pub config: PathBuf,

    /// Synchronize reference data only; no miner is launched
    #[arg(long, default_value = "false", help = "Only synchronize software and algorithm mappings")]
    pub sync_only: bool,

    /// Restrict benchmarking to the named software blocks (repeatable).
    /// All blocks are still synchronized.
    #[arg(long = "software", value_name = "NAME", help = "Benchmark only this software")]
    pub software: Vec<String>,

    /// Enable debug logging
    #[arg(short, long, default_value = "false", help = "Enable debug output")]
    pub verbose: bool,

    /// Also write the harness log to this file
    #[arg(long, value_name = "PATH", help = "Write harness log output to a file")]
    pub log_file: Option<PathBuf>,
}

/// A piece of mining hardware
#[derive(Debug, Clone, PartialEq)]
pub struct Miner {
    pub id: i64,
    pub name: String,
}

/// A mining program and the parameters used to drive it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MiningSoftware {
    pub id: i64,
    pub name: String,
    pub website: String,
    pub algo_param: String,
    pub pool_param: String,
    pub wallet_param: String,
    pub password_param: String,
    /// Native log flag; empty when the program can only write to stdout
    pub file_param: String,
    pub benchmark_param: String,
    pub other_params: String,
    pub skip_lines: u8,
}

impl MiningSoftware {
    pub fn logs_natively(&self) -> bool {
        !self.file_param.is_empty()
    }
}

/// A proof-of-work algorithm as known to the pools
#[derive(Debug, Clone, PartialEq)]
pub struct Algorithm {
    pub id: i64,
    pub name: String,
}

/// A pool endpoint serving one algorithm
#[derive(Debug, Clone, PartialEq)]
pub struct Pool {
    pub id: i64,
    pub host: String,
    pub port: u16,
    pub algorithm_id: i64,
}

impl Pool {
    pub fn stratum_url(&self) -> String {
        format!("stratum+tcp://{}:{}", self.host, self.port)
    }
}

/// Bridge row: maps the miner's name for an algorithm to the pool-side algorithm
#[derive(Debug, Clone, PartialEq)]
pub struct MiningSoftwareAlgorithm {
    pub id: i64,
    pub mining_software_id: i64,
    pub algorithm_id: i64,
    /// The name the mining program expects after its algorithm flag
    pub name: String,
    pub extra_params: String,
}

/// Install location of a mining program on a given miner
#[derive(Debug, Clone, PartialEq)]
pub struct MinerMiningSoftware {
    pub id: i64,
    pub miner_id: i64,
    pub mining_software_id: i64,
    pub file_path: String,
}

/// A stored hashrate measurement
#[derive(Debug, Clone, PartialEq)]
pub struct MiningStatistic {
    pub id: i64,
    pub algorithm_id: i64,
    pub miner_id: i64,
    pub mining_software_id: i64,
    pub work_per_second: f64,
    pub mh_factor: f64,
    pub instant: DateTime<Utc>,
}

impl MiningStatistic {
    /// The measurement expressed in MH/s
    pub fn megahashes(&self) -> f64 {
        self.work_per_second * self.mh_factor
    }
}

/// A measurement about to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewMiningStatistic {
    pub algorithm_id: i64,
    pub miner_id: i64,
    pub mining_software_id: i64,
    pub work_per_second: f64,
    pub mh_factor: f64,
    pub instant: DateTime<Utc>,
}


// Changelog:
// - v1.1.0 (2025-07-02): Replaced mining job and share types with store rows.
//   - Args now points at a configuration file instead of a wallet and pool.
//   - Added row types for miners, software, algorithms, pools, bridge rows,
//     install paths and statistics.
// - v1.0.0 (2025-06-14): Extracted from monolithic main.rs.
