// Miner Stats - Free and Open Source Software Statement
//
// This project, miner-stats, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/benchmark/invocation.rs
// Version: 1.0.1
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file assembles the command line for one (software, algorithm) run and
// names the log file the run's output lands in.
//
// Tree Location:
// - src/benchmark/invocation.rs (argument vector and log file naming)
// - Depends on: chrono, core::types

use crate::core::types::{MiningSoftware, MiningSoftwareAlgorithm};
use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Pool arguments for software that cannot benchmark offline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolArgs {
    /// stratum+tcp://host:port
    pub url: String,
    pub wallet: Option<String>,
    pub password: Option<String>,
}

/// Everything needed to launch one benchmark
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub program: PathBuf,
    /// Full argument vector; argv[0] is the software name
    pub argv: Vec<String>,
    pub log_path: PathBuf,
    /// The program writes `log_path` itself instead of us capturing stdout
    pub native_log: bool,
}

impl Invocation {
    pub fn build<Tz>(
        program: &Path,
        software: &MiningSoftware,
        algo: &MiningSoftwareAlgorithm,
        pool: Option<&PoolArgs>,
        log_directory: &Path,
        now: &DateTime<Tz>,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let log_path = log_directory.join(log_file_name(&software.name, &algo.name, now));

        let mut argv = vec![
            software.name.clone(),
            software.algo_param.clone(),
            algo.name.clone(),
        ];
        argv.extend(split_params(&software.benchmark_param));
        argv.extend(split_params(&software.other_params));

        if let Some(pool) = pool {
            argv.push(software.pool_param.clone());
            argv.push(pool.url.clone());
            if !software.wallet_param.is_empty() {
                if let Some(wallet) = &pool.wallet {
                    argv.push(software.wallet_param.clone());
                    argv.push(wallet.clone());
                }
            }
            if !software.password_param.is_empty() {
                if let Some(password) = &pool.password {
                    argv.push(software.password_param.clone());
                    argv.push(password.clone());
                }
            }
        }

        argv.extend(split_params(&algo.extra_params));

        let native_log = software.logs_natively();
        if native_log {
            argv.push(software.file_param.clone());
            argv.push(log_path.to_string_lossy().into_owned());
        }

        Self {
            program: program.to_path_buf(),
            argv,
            log_path,
            native_log,
        }
    }

    /// Arguments after argv[0]
    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or_default()
    }

    pub fn display_name(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or_default()
    }
}

/// Split a parameter string on spaces, dropping empty pieces
pub fn split_params(params: &str) -> impl Iterator<Item = String> + '_ {
    params
        .split(' ')
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
}

/// `<software>-<algorithm>-<YYYYMMDDhhmmss>.txt`; path separators in the
/// algorithm name (e.g. "cryptonight/r") are stripped
pub fn log_file_name<Tz>(software: &str, algorithm: &str, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let sanitized: String = algorithm
        .chars()
        .filter(|c| *c != '/' && *c != '\\')
        .collect();
    format!("{}-{}-{}.txt", software, sanitized, now.format("%Y%m%d%H%M%S"))
}


// Changelog:
// - v1.0.1 (2025-07-05): Pool arguments only when connectForAssessment is set.
//   - Previously any non-empty pool flag forced a pool connection.
// - v1.0.0 (2025-07-02): Initial argument builder.
