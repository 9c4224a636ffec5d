//! Seed test-case access for whittle reducers.
//!
//! A [`Seed`] is read from disk exactly once and never modified. Reducer
//! strategies derive candidates from it by eliding a contiguous range of
//! lines or bytes; everything outside the elided range is preserved
//! verbatim and in order, so the retained content always byte-matches the
//! seed minus the range.
//!
//! Lines keep their original terminators. A line runs up to and including
//! its `\n` (a `\r\n` terminator belongs to its line), and trailing bytes
//! with no terminator still form a final line.

use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::ops::Range;
use thiserror::Error;

/// Errors reading a seed test case.
///
/// Seed reads are not locally recoverable: a failure here means the
/// environment is broken (path, permissions, disk), not the strategy.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("read seed: {0}")]
    Io(#[from] std::io::Error),
}

/// The immutable input being reduced.
///
/// Owned by one strategy instance for the whole process lifetime.
#[derive(Debug, Clone)]
pub struct Seed {
    path: Utf8PathBuf,
    bytes: Vec<u8>,
    lines: Vec<Range<usize>>,
}

impl Seed {
    /// Read the file at `path` once and index its lines.
    pub fn read(path: &Utf8Path) -> Result<Self, SeedError> {
        let bytes = fs::read(path)?;
        let lines = split_lines(&bytes);
        Ok(Seed {
            path: path.to_owned(),
            bytes,
            lines,
        })
    }

    /// Build a seed from in-memory content. The path is only used for
    /// diagnostics.
    pub fn from_bytes(path: impl Into<Utf8PathBuf>, bytes: Vec<u8>) -> Self {
        let lines = split_lines(&bytes);
        Seed {
            path: path.into(),
            bytes,
            lines,
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The `idx`-th line, terminator included.
    pub fn line(&self, idx: usize) -> &[u8] {
        &self.bytes[self.lines[idx].clone()]
    }

    /// Byte ranges of every line, in order.
    pub fn line_ranges(&self) -> &[Range<usize>] {
        &self.lines
    }

    /// A full copy with lines `[start, start + count)` elided.
    ///
    /// Out-of-range portions of the window are ignored, so a window that
    /// hangs off the end simply elides fewer lines.
    pub fn without_lines(&self, start: usize, count: usize) -> Vec<u8> {
        let end = start.saturating_add(count);
        let mut out = Vec::with_capacity(self.bytes.len());
        for (idx, range) in self.lines.iter().enumerate() {
            if idx >= start && idx < end {
                continue;
            }
            out.extend_from_slice(&self.bytes[range.clone()]);
        }
        out
    }

    /// A full copy with the byte range elided.
    pub fn without_byte_range(&self, range: Range<usize>) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.bytes.len() - range.len());
        out.extend_from_slice(&self.bytes[..range.start]);
        out.extend_from_slice(&self.bytes[range.end..]);
        out
    }
}

/// Split `bytes` into per-line byte ranges, terminators included.
fn split_lines(bytes: &[u8]) -> Vec<Range<usize>> {
    let mut lines = Vec::new();
    let mut start = 0;
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'\n' {
            lines.push(start..i + 1);
            start = i + 1;
        }
    }
    if start < bytes.len() {
        lines.push(start..bytes.len());
    }
    lines
}
