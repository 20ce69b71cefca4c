// Miner Stats - Free and Open Source Software Statement
//
// This project, miner-stats, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/units.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file maps the hashrate unit printed by a mining program to the factor
// that converts it to MH/s.
//
// Tree Location:
// - src/core/units.rs (hash unit normalization)
// - Depends on: error

use crate::error::StatsError;

/// Hashrate units understood by the harness, most specific first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashUnit {
    PetaHash,
    TeraHash,
    GigaHash,
    MegaHash,
    KiloHash,
    Hash,
}

impl HashUnit {
    /// Match order matters: "h/s" is a substring of every other unit.
    pub const ALL: [HashUnit; 6] = [
        HashUnit::PetaHash,
        HashUnit::TeraHash,
        HashUnit::GigaHash,
        HashUnit::MegaHash,
        HashUnit::KiloHash,
        HashUnit::Hash,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            HashUnit::PetaHash => "ph/s",
            HashUnit::TeraHash => "th/s",
            HashUnit::GigaHash => "gh/s",
            HashUnit::MegaHash => "mh/s",
            HashUnit::KiloHash => "kh/s",
            HashUnit::Hash => "h/s",
        }
    }

    /// Multiply a value in this unit by the factor to get MH/s
    pub const fn mh_factor(&self) -> f64 {
        match self {
            HashUnit::PetaHash => 1_000_000_000.0,
            HashUnit::TeraHash => 1_000_000.0,
            HashUnit::GigaHash => 1_000.0,
            HashUnit::MegaHash => 1.0,
            HashUnit::KiloHash => 0.001,
            HashUnit::Hash => 0.000_001,
        }
    }

    /// Case-insensitive substring match on a unit token, e.g. "KH/s," or "MH/s)"
    pub fn detect(token: &str) -> Option<HashUnit> {
        let lower = token.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|unit| lower.contains(unit.as_str()))
    }
}

/// Resolve the MH/s factor for a unit token or fail with `UnitUnknown`
pub fn mh_factor(token: &str) -> Result<f64, StatsError> {
    HashUnit::detect(token)
        .map(|unit| unit.mh_factor())
        .ok_or_else(|| StatsError::UnitUnknown {
            unit: token.to_lowercase(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_table() {
        assert_eq!(mh_factor("ph/s").unwrap(), 1_000_000_000.0);
        assert_eq!(mh_factor("th/s").unwrap(), 1_000_000.0);
        assert_eq!(mh_factor("gh/s").unwrap(), 1_000.0);
        assert_eq!(mh_factor("mh/s").unwrap(), 1.0);
        assert_eq!(mh_factor("kh/s").unwrap(), 0.001);
        assert_eq!(mh_factor("h/s").unwrap(), 0.000_001);
    }

    #[test]
    fn test_uppercase_and_decorated_tokens() {
        assert_eq!(HashUnit::detect("MH/s"), Some(HashUnit::MegaHash));
        assert_eq!(HashUnit::detect("KH/S,"), Some(HashUnit::KiloHash));
        assert_eq!(HashUnit::detect("H/s"), Some(HashUnit::Hash));
        assert_eq!(HashUnit::detect("(GH/s)"), Some(HashUnit::GigaHash));
    }

    #[test]
    fn test_adjacent_units_differ_by_a_thousand() {
        // H/s * 1e6 == MH/s, and each neighbour is 1000x the next one down
        let hashes = mh_factor("H/s").unwrap();
        assert!((hashes * 1_000_000.0 - mh_factor("MH/s").unwrap()).abs() < 1e-12);
        for pair in HashUnit::ALL.windows(2) {
            let ratio = pair[0].mh_factor() / pair[1].mh_factor();
            assert!((ratio - 1_000.0).abs() < 1e-6, "{:?} / {:?} = {}", pair[0], pair[1], ratio);
        }
    }

    #[test]
    fn test_every_factor_is_positive() {
        assert!(HashUnit::ALL.iter().all(|unit| unit.mh_factor() > 0.0));
    }

    #[test]
    fn test_unknown_unit_is_rejected() {
        let err = mh_factor("Sol/s").unwrap_err();
        assert!(matches!(err, StatsError::UnitUnknown { ref unit } if unit == "sol/s"));
        assert!(mh_factor("45.9").is_err());
    }
}

// Changelog:
// - v1.0.0 (2025-07-02): Initial unit normalization table.
