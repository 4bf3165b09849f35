use crate::errors::{BenchlensError, BenchlensResult};
use std::io::BufRead;

/// Series labels for the three cache levels, in level order.
pub const LEVEL_LABELS: [&str; 3] = ["LV0", "LV1", "LV2"];

/// Per-level cache miss counts parsed from one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheMissSample {
    counts: [u64; 3],
}

impl CacheMissSample {
    pub fn new(counts: [u64; 3]) -> CacheMissSample {
        CacheMissSample { counts }
    }

    /// Miss count for one cache level (0, 1 or 2).
    pub fn level(&self, level: usize) -> u64 {
        self.counts[level]
    }

    pub fn counts(&self) -> [u64; 3] {
        self.counts
    }

    /// Parse one input line. Only the first three whitespace separated
    /// integers count; extra tokens on the line are discarded. `line_num` is
    /// 1-based and used for error reporting only.
    fn parse(line: &str, line_num: usize) -> BenchlensResult<CacheMissSample> {
        let mut counts = [0u64; 3];
        let mut tokens = line.split_whitespace();
        for (i, slot) in counts.iter_mut().enumerate() {
            let token = tokens.next().ok_or(BenchlensError::NotEnoughCounts {
                line: line_num,
                found: i,
            })?;
            *slot = token.parse().map_err(|_| BenchlensError::BadCount {
                line: line_num,
                token: token.to_string(),
            })?;
        }
        Ok(CacheMissSample { counts })
    }
}

/// Read per-level miss counts, one sample per line, until end of input.
///
/// A malformed line fails the whole read instead of being skipped; skipping
/// would silently shift the line-to-sample correspondence on the x axis.
pub fn read_samples<R: BufRead>(reader: R) -> BenchlensResult<Vec<CacheMissSample>> {
    let mut samples = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        samples.push(CacheMissSample::parse(&line, i + 1)?);
    }
    Ok(samples)
}
