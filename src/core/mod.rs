// Miner Stats - Free and Open Source Software Statement
//
// This project, miner-stats, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/mod.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the module declaration for the core functionality of the
// benchmark harness, located in the core subdirectory. It declares submodules
// and re-exports key types for use throughout the project.

pub mod types;
pub mod units;

// Re-export the most commonly used items
pub use types::{
    Algorithm, Args, Miner, MinerMiningSoftware, MiningSoftware, MiningSoftwareAlgorithm,
    MiningStatistic, NewMiningStatistic, Pool,
};
pub use units::{HashUnit, mh_factor};

// Changelog:
// - v1.1.0 (2025-07-02): Swapped hashing kernels for store types and units.
// - v1.0.1 (2025-06-16): Added simple SHA-256 support.
