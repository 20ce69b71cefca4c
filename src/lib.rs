// Miner Stats - Free and Open Source Software Statement
//
// This project, miner-stats, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/lib.rs
// Version: 2.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file serves as the main library entry point for the benchmark harness,
// located at the root of the source tree. It exports all public modules and
// types that the binary and the integration tests use.
//
// Tree Location:
// - src/lib.rs (root library file)
// - Exports modules: benchmark, config, core, error, logging, store, utils

pub mod benchmark;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod store;
pub mod utils;

// Re-export commonly used types at the crate root for convenience
pub use crate::benchmark::runner::{BenchmarkRunner, RunOptions, RunReport};
pub use crate::config::{AlgoConfig, Config, SoftwareConfig};
pub use crate::error::StatsError;
pub use crate::store::Store;

pub type Result<T> = std::result::Result<T, StatsError>;

// Changelog:
// - v2.0.0 (2025-07-02): Library root for the external miner benchmark harness.
//   - Dropped core hashing, miner, pool and help modules.
//   - Added config, error, logging and store modules.
//   - Result now carries StatsError instead of a boxed error.
// - v1.0.0 (2025-06-14): Initial modular breakout from monolithic main.rs.
