//! Predicate-indexed line elimination.
//!
//! "Remove the n-th line satisfying P", where P is a blank-line test or a
//! regex over the trimmed line content. The match ordinal n starts at 0
//! and advances once per produced candidate, and every round re-scans the
//! original, unmodified seed — so each round's candidate is "the seed
//! minus its n-th match", independent of whether the driver kept any
//! earlier candidate. Once fewer than n+1 lines match, the strategy is
//! exhausted.

use camino::Utf8Path;
use fs_err as fs;
use regex::bytes::Regex;
use whittle_protocol::{Round, Strategy};
use whittle_seed::Seed;

/// The line test. Lines are trimmed of ASCII whitespace (terminator
/// included) before testing.
#[derive(Debug, Clone)]
pub enum LinePredicate {
    /// The trimmed line is empty.
    Blank,
    /// The trimmed line matches the regex.
    Matches(Regex),
}

impl LinePredicate {
    pub fn matches(&self, line: &[u8]) -> bool {
        let trimmed = line.trim_ascii();
        match self {
            LinePredicate::Blank => trimmed.is_empty(),
            LinePredicate::Matches(re) => re.is_match(trimmed),
        }
    }
}

/// The strategy: round n removes the n-th matching line of the seed.
pub struct NthMatch {
    seed: Seed,
    predicate: LinePredicate,
    ordinal: usize,
}

impl NthMatch {
    pub fn new(seed: Seed, predicate: LinePredicate) -> Self {
        NthMatch {
            seed,
            predicate,
            ordinal: 0,
        }
    }

    /// Line index of the current ordinal's match, if enough lines match.
    fn nth_matching_line(&self) -> Option<usize> {
        let mut seen = 0;
        for idx in 0..self.seed.line_count() {
            if self.predicate.matches(self.seed.line(idx)) {
                if seen == self.ordinal {
                    return Some(idx);
                }
                seen += 1;
            }
        }
        None
    }
}

impl Strategy for NthMatch {
    fn next_candidate(&mut self, dest: &Utf8Path) -> anyhow::Result<Round> {
        let Some(line) = self.nth_matching_line() else {
            return Ok(Round::Exhausted);
        };
        fs::write(dest, self.seed.without_lines(line, 1))?;
        self.ordinal += 1;
        Ok(Round::Produced)
    }
}
