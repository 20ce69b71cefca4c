// Miner Stats - Free and Open Source Software Statement
//
// This project, miner-stats, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/utils/format.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file provides formatting helpers for hashrates in log output. Stored
// values stay in the miner's own unit; these helpers only render them.
//
// Tree Location:
// - src/utils/format.rs (formatting utilities)
// - Depends on: std

/// Utility functions for formatting benchmark statistics
pub struct FormatUtils;

impl FormatUtils {
    /// Format hashrate in appropriate units (H/s up to PH/s)
    pub fn format_hashrate(hashrate: f64) -> String {
        if hashrate >= 1_000_000_000_000_000.0 {
            format!("{:.2} PH/s", hashrate / 1_000_000_000_000_000.0)
        } else if hashrate >= 1_000_000_000_000.0 {
            format!("{:.2} TH/s", hashrate / 1_000_000_000_000.0)
        } else if hashrate >= 1_000_000_000.0 {
            format!("{:.2} GH/s", hashrate / 1_000_000_000.0)
        } else if hashrate >= 1_000_000.0 {
            format!("{:.2} MH/s", hashrate / 1_000_000.0)
        } else if hashrate >= 1_000.0 {
            format!("{:.2} KH/s", hashrate / 1_000.0)
        } else {
            format!("{:.2} H/s", hashrate)
        }
    }

    /// Format a value already normalized to MH/s
    pub fn format_megahashes(megahashes: f64) -> String {
        Self::format_hashrate(megahashes * 1_000_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hashrate() {
        assert_eq!(FormatUtils::format_hashrate(45.9), "45.90 H/s");
        assert_eq!(FormatUtils::format_hashrate(4_000.0), "4.00 KH/s");
        assert_eq!(FormatUtils::format_hashrate(2_500_000_000.0), "2.50 GH/s");
        assert_eq!(FormatUtils::format_hashrate(110e12), "110.00 TH/s");
    }

    #[test]
    fn test_format_megahashes() {
        assert_eq!(FormatUtils::format_megahashes(0.0000459), "45.90 H/s");
        assert_eq!(FormatUtils::format_megahashes(1.0), "1.00 MH/s");
        assert_eq!(FormatUtils::format_megahashes(3_000_000_000.0), "3.00 PH/s");
    }
}

// Changelog:
// - v1.1.0 (2025-07-02): Added TH/s and PH/s and MH/s-normalized input.
//   - Dropped duration and share-count helpers along with the TUI stats.
// - v1.0.0 (2025-06-14): Extracted from monolithic main.rs.
