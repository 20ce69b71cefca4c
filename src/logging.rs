// Miner Stats - Free and Open Source Software Statement
//
// This project, miner-stats, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/logging.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// log4rs setup for the binary: console output always, plus an optional log
// file. Miner output never goes through here; it lands in per-run log files.

use anyhow::Context;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::Path;

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l})} {t} - {m}{n}";

/// Build the log4rs configuration
pub fn build_config(verbose: bool, log_file: Option<&Path>) -> anyhow::Result<Config> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let console = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build();
    let mut builder =
        Config::builder().appender(Appender::builder().build("console", Box::new(console)));
    let mut root = Root::builder().appender("console");

    if let Some(path) = log_file {
        let file = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(PATTERN)))
            .build(path)
            .with_context(|| format!("Unable to open log file {}", path.display()))?;
        builder = builder.appender(Appender::builder().build("file", Box::new(file)));
        root = root.appender("file");
    }

    builder
        .build(root.build(level))
        .context("Invalid logging configuration")
}

/// Install the global logger
pub fn init(verbose: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let config = build_config(verbose, log_file)?;
    log4rs::init_config(config).context("Logger already initialized")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_console_only() {
        let config = build_config(false, None).unwrap();
        assert_eq!(config.appenders().len(), 1);
        assert_eq!(config.root().level(), LevelFilter::Info);
    }

    #[test]
    fn test_with_file() {
        let dir = tempdir().unwrap();
        let config = build_config(true, Some(&dir.path().join("minerstats.log"))).unwrap();
        assert_eq!(config.appenders().len(), 2);
        assert_eq!(config.root().level(), LevelFilter::Debug);
    }
}
