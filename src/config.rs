// Miner Stats - Free and Open Source Software Statement
//
// This project, miner-stats, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/config.rs
// Version: 1.0.1
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file loads and validates the harness configuration (MinerStats.toml):
// the statistics database, the hardware identity and one block per mining
// program with the algorithms it supports.
//
// Tree Location:
// - src/config.rs (configuration file)
// - Depends on: serde, toml, sysinfo

use crate::error::StatsError;
use crate::Result;
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use sysinfo::System;

const LOG_TARGET: &str = "miner_stats::config";

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Path of the SQLite statistics database
    pub database: String,
    /// Name of the mining hardware; defaults to the host name
    #[serde(default)]
    pub miner_name: Option<String>,
    /// Wallet passed to pools by software that must connect to benchmark
    #[serde(default)]
    pub wallet: Option<String>,
    /// Directory receiving the miner log files
    #[serde(default = "default_log_directory")]
    pub log_directory: PathBuf,
    pub software: Vec<SoftwareConfig>,

    // Server connection keys shared with the pool collector's config file.
    // The embedded store reads none of them.
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<toml::Value>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

/// One mining program
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct SoftwareConfig {
    pub name: String,
    pub release_website: String,
    /// Executable path; empty means synchronize references only
    pub file_path: String,
    pub algo_param: String,
    /// Some programs cannot benchmark offline and must mine against a pool
    pub connect_for_assessment: bool,
    pub pool_param: String,
    pub password_param: String,
    pub password: Option<String>,
    pub wallet_param: String,
    /// Native log flag, if the program can write its own log file
    pub file_param: String,
    pub benchmark_param: String,
    pub other_params: String,
    /// Single token that precedes the hashrate in the program's output
    pub stat_search_phrase: String,
    /// Seconds to let the program run before reading its output
    pub stat_wait_time: u16,
    /// Matches with an ordinal below this are treated as warm-up
    pub skip_lines: u8,
    /// Tokens between the value and its unit
    pub skip_tokens: u8,
    pub algo: Vec<AlgoConfig>,
}

/// Maps the program's algorithm name to the pool's algorithm name
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct AlgoConfig {
    pub miner_name: String,
    /// Name in the algorithm table; empty means use `miner_name`
    pub pool_name: String,
    pub extra_params: String,
}

fn default_log_directory() -> PathBuf {
    PathBuf::from(".")
}

impl AlgoConfig {
    /// The name looked up in the algorithm table
    pub fn lookup_name(&self) -> &str {
        if self.pool_name.is_empty() {
            &self.miner_name
        } else {
            &self.pool_name
        }
    }
}

impl SoftwareConfig {
    pub fn should_benchmark(&self) -> bool {
        !self.file_path.is_empty()
    }

    fn validate(&self, wallet: Option<&str>) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(StatsError::config("software block without a name"));
        }
        if self.algo_param.is_empty() {
            return Err(StatsError::config(format!("{}: algoParam is required", self.name)));
        }
        if self.algo.is_empty() {
            return Err(StatsError::config(format!(
                "{}: at least one algo block is required",
                self.name
            )));
        }
        if let Some(algo) = self.algo.iter().find(|a| a.miner_name.is_empty()) {
            return Err(StatsError::config(format!(
                "{}: algo block with poolName \"{}\" has no minerName",
                self.name, algo.pool_name
            )));
        }

        if self.should_benchmark() {
            if self.stat_search_phrase.is_empty() {
                return Err(StatsError::config(format!(
                    "{}: statSearchPhrase is required when filePath is set",
                    self.name
                )));
            }
            if self.stat_search_phrase.contains(' ') {
                return Err(StatsError::config(format!(
                    "{}: statSearchPhrase \"{}\" must be a single token",
                    self.name, self.stat_search_phrase
                )));
            }
            if self.stat_wait_time == 0 {
                return Err(StatsError::config(format!(
                    "{}: statWaitTime must be greater than 0 seconds",
                    self.name
                )));
            }
        }

        if self.connect_for_assessment {
            if self.pool_param.is_empty() {
                return Err(StatsError::config(format!(
                    "{}: connectForAssessment requires poolParam",
                    self.name
                )));
            }
            if !self.wallet_param.is_empty() && wallet.is_none_or(str::is_empty) {
                return Err(StatsError::config(format!(
                    "{}: walletParam is set but no wallet is configured",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

impl Config {
    /// Read, parse and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            StatsError::config(format!("Failed to load config file {}: {}", path.display(), e))
        })?;
        let config = Self::parse(&text)?;
        debug!(target: LOG_TARGET,
            "Loaded {} software blocks from {}",
            config.software.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn parse(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)
            .map_err(|e| StatsError::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        let ignored = config.ignored_server_keys();
        if !ignored.is_empty() {
            warn!(target: LOG_TARGET,
                "Ignoring {} in config; statistics are stored in {}",
                ignored.join(", "),
                config.database
            );
        }
        Ok(config)
    }

    /// Server connection keys present in the file that the embedded store ignores
    pub fn ignored_server_keys(&self) -> Vec<&'static str> {
        [
            ("host", self.host.is_some()),
            ("port", self.port.is_some()),
            ("user", self.user.is_some()),
            ("password", self.password.is_some()),
            ("timezone", self.timezone.is_some()),
        ]
        .into_iter()
        .filter_map(|(key, present)| present.then_some(key))
        .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.is_empty() {
            return Err(StatsError::config("database is required"));
        }
        if self.software.is_empty() {
            return Err(StatsError::config("at least one software block is required"));
        }
        let mut names = HashSet::new();
        for software in &self.software {
            if !names.insert(software.name.as_str()) {
                return Err(StatsError::config(format!(
                    "software \"{}\" is configured more than once",
                    software.name
                )));
            }
            software.validate(self.wallet.as_deref())?;
        }
        Ok(())
    }

    /// The configured hardware name, falling back to the host name
    pub fn resolve_miner_name(&self) -> Result<String> {
        match self.miner_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Ok(name.to_string()),
            _ => System::host_name()
                .filter(|name| !name.is_empty())
                .ok_or_else(|| {
                    StatsError::config("minerName is not set and the host name is unavailable")
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
database = "stats.db"
minerName = "rig-01"
wallet = "DWALLETADDRESS"

[[software]]
name = "cpuminer-opt"
releaseWebsite = "https://github.com/JayDDee/cpuminer-opt/releases"
filePath = "/opt/cpuminer/cpuminer"
algoParam = "-a"
otherParams = "-t 4"
statSearchPhrase = "Total:"
statWaitTime = 120
skipLines = 5

[[software.algo]]
minerName = "lyra2rev2"
poolName = "lyra2v2"

[[software.algo]]
minerName = "sha256d"

[[software]]
name = "wildrig"
algoParam = "--algo"
connectForAssessment = true
poolParam = "--url"
walletParam = "--user"

[[software.algo]]
minerName = "x16r"
extraParams = "--opencl-threads 2"
"#;

    #[test]
    fn test_parse_sample() {
        let config = Config::parse(SAMPLE).expect("sample should parse");
        assert_eq!(config.database, "stats.db");
        assert_eq!(config.log_directory, PathBuf::from("."));
        assert_eq!(config.software.len(), 2);

        let cpuminer = &config.software[0];
        assert_eq!(cpuminer.name, "cpuminer-opt");
        assert!(cpuminer.should_benchmark());
        assert_eq!(cpuminer.skip_lines, 5);
        assert_eq!(cpuminer.skip_tokens, 0);
        assert_eq!(cpuminer.algo[0].lookup_name(), "lyra2v2");
        assert_eq!(cpuminer.algo[1].lookup_name(), "sha256d");

        let wildrig = &config.software[1];
        assert!(!wildrig.should_benchmark());
        assert!(wildrig.connect_for_assessment);
        assert_eq!(wildrig.algo[0].extra_params, "--opencl-threads 2");
    }

    #[test]
    fn test_configured_miner_name_wins() {
        let config = Config::parse(SAMPLE).unwrap();
        assert_eq!(config.resolve_miner_name().unwrap(), "rig-01");
    }

    #[test]
    fn test_wallet_required_for_wallet_param() {
        let text = SAMPLE.replace("wallet = \"DWALLETADDRESS\"", "");
        let err = Config::parse(&text).unwrap_err();
        assert!(matches!(
            err,
            StatsError::ConfigInvalid { ref message } if message.contains("wallet")
        ));
    }

    #[test]
    fn test_search_phrase_required_when_benchmarking() {
        let text = SAMPLE.replace("statSearchPhrase = \"Total:\"", "");
        assert!(matches!(Config::parse(&text), Err(StatsError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_multi_token_search_phrase_rejected() {
        let text = SAMPLE.replace("\"Total:\"", "\"Total speed:\"");
        assert!(matches!(Config::parse(&text), Err(StatsError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_duplicate_software_rejected() {
        let text = SAMPLE.replace("name = \"wildrig\"", "name = \"cpuminer-opt\"");
        assert!(matches!(Config::parse(&text), Err(StatsError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let text = format!("databse = \"typo.db\"\n{}", SAMPLE);
        assert!(matches!(Config::parse(&text), Err(StatsError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_server_keys_accepted_and_ignored() {
        let text = format!(
            "host = \"db.local\"\nport = 5432\nuser = \"stats\"\npassword = \"secret\"\n\
             timezone = \"UTC\"\n{}",
            SAMPLE
        );
        let config = Config::parse(&text).unwrap();
        assert_eq!(config.database, "stats.db");
        assert_eq!(config.host.as_deref(), Some("db.local"));
        assert_eq!(
            config.ignored_server_keys(),
            vec!["host", "port", "user", "password", "timezone"]
        );

        let quoted_port = format!("port = \"5432\"\n{}", SAMPLE);
        assert_eq!(Config::parse(&quoted_port).unwrap().ignored_server_keys(), vec!["port"]);
        assert!(Config::parse(SAMPLE).unwrap().ignored_server_keys().is_empty());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(Config::parse("software = ["), Err(StatsError::ConfigInvalid { .. })));
    }
}

// Changelog:
// - v1.0.1 (2025-07-08): Accept host, port, user, password and timezone so a
//   config shared with the pool collector loads; they are logged and ignored.
// - v1.0.0 (2025-07-02): Initial configuration loader.
//   - TOML replaces command-line wallet and pool arguments.
//   - minerName falls back to the host name reported by sysinfo.
