// Miner Stats - Free and Open Source Software Statement
//
// This project, miner-stats, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/benchmark/mod.rs
// Version: 2.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file declares the benchmark module, which drives external mining
// programs: building their command line, supervising the child process,
// parsing hashrate output and handing samples to the store.
//
// Tree Location:
// - src/benchmark/mod.rs (benchmark module entry point)
// - Submodules: invocation, supervisor, parser, runner

pub mod invocation;
pub mod parser;
pub mod runner;
pub mod supervisor;

// Re-export key benchmark types and functions
pub use invocation::{Invocation, PoolArgs, log_file_name};
pub use parser::{HashSample, StatMatcher};
pub use runner::{BenchmarkRunner, RunOptions, RunReport, SoftwareReport};
pub use supervisor::{Phase, Supervisor};

// Changelog:
// - v2.0.0 (2025-07-02): Replaced static jobs and profiler with the external
//   miner pipeline (invocation, supervisor, parser, runner).
// - v1.0.0 (2025-06-14): Initial benchmark module creation.
