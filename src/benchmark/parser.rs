// Miner Stats - Free and Open Source Software Statement
//
// This project, miner-stats, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/benchmark/parser.rs
// Version: 1.0.2
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file extracts hashrate samples from a miner's textual output. A line
// is a candidate when it contains the search phrase; the phrase must then
// appear as a whole space-separated token, followed by the value and, after
// `skip_tokens` further tokens, the unit.
//
// Known limitation: output that glues the phrase to its value
// ("Total:45.9 h/s") never matches.
//
// Tree Location:
// - src/benchmark/parser.rs (hashrate output parser)
// - Depends on: core::units

use crate::core::units::mh_factor;
use crate::Result;
use log::{debug, warn};
use std::io::BufRead;

const LOG_TARGET: &str = "miner_stats::parser";

/// How to find the hashrate in a program's output
#[derive(Debug, Clone, Copy)]
pub struct StatMatcher<'a> {
    pub search_phrase: &'a str,
    /// Candidate lines with an ordinal below this are warm-up
    pub skip_lines: u8,
    pub skip_tokens: u8,
}

/// One retained hashrate line
#[derive(Debug, Clone, PartialEq)]
pub struct HashSample {
    pub work_per_second: f64,
    pub unit: String,
    pub mh_factor: f64,
}

impl HashSample {
    pub fn megahashes(&self) -> f64 {
        self.work_per_second * self.mh_factor
    }
}

impl StatMatcher<'_> {
    /// Locate the value and unit tokens in a line, if the line has them
    pub fn tokens<'l>(&self, line: &'l str) -> Option<(&'l str, &'l str)> {
        let pieces: Vec<&str> = line.split(' ').collect();
        let index = pieces.iter().position(|piece| *piece == self.search_phrase)?;
        let value = *pieces.get(index + 1)?;
        let unit = *pieces.get(index + 2 + self.skip_tokens as usize)?;
        Some((value, unit))
    }

    /// Parse one line into a sample. A malformed value is recorded as 0.
    pub fn parse_line(&self, line: &str) -> Result<Option<HashSample>> {
        let Some((value, unit)) = self.tokens(line) else {
            debug!(target: LOG_TARGET, "Phrase is not a whole token in: {}", line);
            return Ok(None);
        };

        let work_per_second = value.parse::<f64>().unwrap_or_else(|_| {
            warn!(target: LOG_TARGET, "Unparseable hashrate value \"{}\", recording 0", value);
            0.0
        });
        let factor = mh_factor(unit)?;

        Ok(Some(HashSample {
            work_per_second,
            unit: unit.to_string(),
            mh_factor: factor,
        }))
    }

    /// Scan the whole output. Lines are counted when they contain the phrase;
    /// a line is kept once the count reaches `skip_lines`.
    pub fn parse_output<R: BufRead>(&self, mut reader: R) -> Result<Vec<HashSample>> {
        let mut samples = Vec::new();
        let mut lines_found: u32 = 0;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let text = String::from_utf8_lossy(&buf);
            let line = text.trim_end_matches(['\n', '\r']);

            if !line.contains(self.search_phrase) {
                continue;
            }
            lines_found += 1;
            if lines_found < u32::from(self.skip_lines) {
                continue;
            }
            if let Some(sample) = self.parse_line(line)? {
                samples.push(sample);
            }
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatsError;
    use std::io::Cursor;

    fn matcher(phrase: &str, skip_lines: u8, skip_tokens: u8) -> StatMatcher<'_> {
        StatMatcher {
            search_phrase: phrase,
            skip_lines,
            skip_tokens,
        }
    }

    fn ok_samples(m: &StatMatcher<'_>, text: &str) -> Vec<HashSample> {
        m.parse_output(Cursor::new(text.as_bytes().to_vec())).unwrap()
    }

    #[test]
    fn test_simple_line() {
        let sample = matcher("Total:", 0, 0)
            .parse_line("[2025-07-04 13:05:09] Total: 45.9 h/s")
            .unwrap()
            .unwrap();
        assert_eq!(sample.work_per_second, 45.9);
        assert_eq!(sample.unit, "h/s");
        assert_eq!(sample.mh_factor, 0.000_001);
    }

    #[test]
    fn test_skip_tokens() {
        let sample = matcher("HS:", 0, 2)
            .parse_line("HS: 1234 1000 444 H/s")
            .unwrap()
            .unwrap();
        assert_eq!(sample.work_per_second, 1234.0);
        assert_eq!(sample.mh_factor, 0.000_001);
    }

    #[test]
    fn test_phrase_must_be_whole_token() {
        let m = matcher("Total:", 0, 0);
        assert_eq!(m.parse_line("GrandTotal: 45.9 h/s").unwrap(), None);
        assert_eq!(m.parse_line("Total:45.9 h/s").unwrap(), None);
    }

    #[test]
    fn test_short_line_ignored() {
        assert_eq!(matcher("Total:", 0, 0).parse_line("Total: 45.9").unwrap(), None);
        assert_eq!(matcher("HS:", 0, 2).parse_line("HS: 1 2 H/s").unwrap(), None);
    }

    #[test]
    fn test_malformed_value_recorded_as_zero() {
        let sample = matcher("Total:", 0, 0)
            .parse_line("Total: n/a kH/s")
            .unwrap()
            .unwrap();
        assert_eq!(sample.work_per_second, 0.0);
        assert_eq!(sample.mh_factor, 0.001);
    }

    #[test]
    fn test_unknown_unit_is_error() {
        let err = matcher("Total:", 0, 0)
            .parse_line("Total: 45.9 Sol/s")
            .unwrap_err();
        assert!(matches!(err, StatsError::UnitUnknown { .. }));
    }

    #[test]
    fn test_skip_lines_counts_from_one() {
        let text = "Total: 1 h/s\n".repeat(5);
        // skip_lines = 1 keeps every line
        assert_eq!(ok_samples(&matcher("Total:", 1, 0), &text).len(), 5);
        // skip_lines = 0 also keeps every line
        assert_eq!(ok_samples(&matcher("Total:", 0, 0), &text).len(), 5);

        let seven = "Total: 2 MH/s\n".repeat(7);
        assert_eq!(ok_samples(&matcher("Total:", 5, 0), &seven).len(), 3);
        assert_eq!(ok_samples(&matcher("Total:", 8, 0), &seven).len(), 0);
    }

    #[test]
    fn test_output_with_noise_and_crlf() {
        let text = "cpuminer-opt 3.24\r\n\
                    Total: 10 kH/s\r\n\
                    accepted 1/1\r\n\
                    Total: 12.5 kH/s\r\n";
        let samples = ok_samples(&matcher("Total:", 2, 0), text);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].work_per_second, 12.5);
        assert_eq!(samples[0].unit, "kH/s");
        assert!((samples[0].megahashes() - 0.0125).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_utf8_does_not_abort() {
        let mut bytes = b"\xff\xfe garbage\n".to_vec();
        bytes.extend_from_slice(b"Total: 3 GH/s\n");
        let samples = matcher("Total:", 0, 0)
            .parse_output(Cursor::new(bytes))
            .unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].mh_factor, 1_000.0);
    }

    #[test]
    fn test_bad_unit_aborts_scan() {
        let text = "Total: 1 h/s\nTotal: 1 parsecs\n";
        let result = matcher("Total:", 0, 0).parse_output(Cursor::new(text.as_bytes().to_vec()));
        assert!(matches!(result, Err(StatsError::UnitUnknown { .. })));
    }
}

// Changelog:
// - v1.0.2 (2025-07-06): Added skipTokens for programs printing extra columns.
// - v1.0.1 (2025-07-04): Lossy UTF-8 decoding so colour codes or stray bytes
//   in miner output do not abort the scan.
// - v1.0.0 (2025-07-02): Initial output parser.
