// Miner Stats - Free and Open Source Software Statement
//
// This project, miner-stats, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/error.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines the error type shared by every module of the benchmark
// harness. Each variant maps to one failure policy of the driver.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Invalid configuration: {message}")]
    ConfigInvalid { message: String },

    #[error("Unable to open statistics store at {path:?}")]
    StoreUnreachable {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error(
        "No algorithms exist in the algorithm table. Run a pool statistics collection \
         before calculating miner statistics. Only pool algorithms are measured to avoid \
         wasting time on statistics nobody can use."
    )]
    ReferenceDataMissing,

    #[error("No pool serves algorithm {algorithm}; this software requires a pool URL")]
    NoPoolForAlgorithm { algorithm: String },

    #[error("Unable to start mining software {path:?}")]
    MinerLaunchFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid hash unit \"{unit}\"; check the statSearchPhrase setting")]
    UnitUnknown { unit: String },

    #[error("Issue storing {what}")]
    WriteFailed {
        what: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Miner did not produce its log file {path:?}")]
    LogUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO operation failed on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read miner output")]
    OutputRead {
        #[from]
        source: std::io::Error,
    },

    #[error("Statistics store query failed")]
    Store {
        #[from]
        source: rusqlite::Error,
    },

    #[error("Benchmark interrupted by operator")]
    Interrupted,
}

impl StatsError {
    pub fn config(message: impl Into<String>) -> Self {
        StatsError::ConfigInvalid {
            message: message.into(),
        }
    }

    pub fn write_failed(what: impl Into<String>, source: rusqlite::Error) -> Self {
        StatsError::WriteFailed {
            what: what.into(),
            source,
        }
    }
}

// Changelog:
// - v1.0.0 (2025-07-02): Initial error type for the benchmark harness.
