//! Balanced-bracket span removal.
//!
//! Scans the raw seed for nested balanced ranges of one bracket type and
//! offers, per discovered pair, up to two candidates: the whole span with
//! delimiters, then the interior alone (skipped when the interior is
//! empty).
//!
//! Two finders produce the same pair sequence. [`find_next_pair`] rescans
//! from just past the previous pair's opening index, so pairs nested
//! inside an already-found outer pair are discovered on later calls; the
//! overlap re-scanning makes it O(n²) in the worst case. [`matched_pairs`]
//! is the stack-based O(n) equivalent used by the reducer binaries.

use camino::Utf8Path;
use fs_err as fs;
use std::ops::Range;
use whittle_protocol::{Round, Strategy};
use whittle_seed::Seed;

/// The bracket type a reducer invocation works on. Exactly one is active
/// per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    Angle,
    Curly,
    Paren,
    Square,
}

impl Bracket {
    /// Open and close bytes.
    pub fn bytes(self) -> (u8, u8) {
        match self {
            Bracket::Angle => (b'<', b'>'),
            Bracket::Curly => (b'{', b'}'),
            Bracket::Paren => (b'(', b')'),
            Bracket::Square => (b'[', b']'),
        }
    }
}

/// Find the next balanced pair at or after `start`.
///
/// The first open byte encountered becomes the candidate opening index;
/// depth rises on opens and falls on closes only while positive. When
/// depth returns to zero the pair is complete. Returns `None` when no open
/// byte remains or the text ends before depth returns to zero.
pub fn find_next_pair(text: &[u8], bracket: Bracket, start: usize) -> Option<(usize, usize)> {
    let (open, close) = bracket.bytes();
    let mut opening = None;
    let mut depth = 0usize;
    for (i, &b) in text.iter().enumerate().skip(start) {
        if b == open {
            if opening.is_none() {
                opening = Some(i);
            }
            depth += 1;
        } else if b == close && depth > 0 {
            depth -= 1;
            if depth == 0 {
                if let Some(o) = opening {
                    return Some((o, i));
                }
            }
        }
    }
    None
}

/// All pairs the rescanning finder would discover, in one linear pass.
///
/// Pairs come out ordered by opening index. Rescanning stops for good when
/// a scan runs out of text with depth still positive, which happens
/// exactly at the first unmatched open byte; everything at or after that
/// index is therefore dropped here too.
pub fn matched_pairs(text: &[u8], bracket: Bracket) -> Vec<(usize, usize)> {
    let (open, close) = bracket.bytes();
    let mut stack = Vec::new();
    let mut pairs = Vec::new();
    for (i, &b) in text.iter().enumerate() {
        if b == open {
            stack.push(i);
        } else if b == close {
            if let Some(o) = stack.pop() {
                pairs.push((o, i));
            }
        }
    }
    pairs.sort_unstable();
    if let Some(&first_unmatched) = stack.first() {
        pairs.retain(|&(o, _)| o < first_unmatched);
    }
    pairs
}

/// Iterator over pairs via the rescanning finder, resuming each search
/// just past the previous pair's opening index.
pub struct RescanPairs<'a> {
    text: &'a [u8],
    bracket: Bracket,
    cursor: usize,
}

impl<'a> RescanPairs<'a> {
    pub fn new(text: &'a [u8], bracket: Bracket) -> Self {
        RescanPairs {
            text,
            bracket,
            cursor: 0,
        }
    }
}

impl Iterator for RescanPairs<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        let (open, close) = find_next_pair(self.text, self.bracket, self.cursor)?;
        self.cursor = open + 1;
        Some((open, close))
    }
}

/// The balanced-bracket strategy: per pair, the whole-span elision first,
/// then the interior-only elision unless the delimiters are adjacent.
pub struct BalancedSpans {
    seed: Seed,
    elisions: Vec<Range<usize>>,
    cursor: usize,
}

impl BalancedSpans {
    pub fn new(seed: Seed, bracket: Bracket) -> Self {
        let mut elisions = Vec::new();
        for (open, close) in matched_pairs(seed.bytes(), bracket) {
            elisions.push(open..close + 1);
            if open + 1 < close {
                elisions.push(open + 1..close);
            }
        }
        BalancedSpans {
            seed,
            elisions,
            cursor: 0,
        }
    }
}

impl Strategy for BalancedSpans {
    fn next_candidate(&mut self, dest: &Utf8Path) -> anyhow::Result<Round> {
        let Some(range) = self.elisions.get(self.cursor).cloned() else {
            return Ok(Round::Exhausted);
        };
        fs::write(dest, self.seed.without_byte_range(range))?;
        self.cursor += 1;
        Ok(Round::Produced)
    }
}
