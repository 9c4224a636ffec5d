//! Chunk-removal reduction: the delta-debugging schedule.
//!
//! Candidates elide a contiguous run of lines ("chunk") from the seed.
//! Chunk sizes start at the seed's line count and are repeatedly
//! floor-halved down to a minimum (default 1); for each size every start
//! offset is tried in order. Trying large removals first converges quickly
//! on inputs with big irrelevant regions, and the final size-1 sweep
//! subsumes plain single-line deletion.

use camino::Utf8Path;
use fs_err as fs;
use tracing::debug;
use whittle_protocol::{Round, Strategy};
use whittle_seed::Seed;

/// Decreasing chunk sizes: `max`, then floor-halves, stopping once the
/// next value would fall below `min` (the boundary value equal to `min` is
/// included). Empty when `max < min` or `min == 0`.
pub fn chunk_sizes(min: usize, max: usize) -> impl Iterator<Item = usize> {
    let mut next = if min == 0 || max < min { None } else { Some(max) };
    std::iter::from_fn(move || {
        let size = next?;
        let halved = size / 2;
        next = (halved >= min).then_some(halved);
        Some(size)
    })
}

/// The chunk-removal strategy.
///
/// The `(size, offset)` cursor is monotonic: it never resets, and it
/// advances exactly once per produced candidate.
pub struct Chunks {
    seed: Seed,
    min_chunk: usize,
    cursor: Option<Cursor>,
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    size: usize,
    offset: usize,
}

impl Chunks {
    /// Full schedule: sizes from the seed's line count down to 1.
    pub fn new(seed: Seed) -> Self {
        let max = seed.line_count();
        Self::with_limits(seed, 1, max)
    }

    /// Single-line removal only, the standalone `lines` reducer.
    pub fn single_lines(seed: Seed) -> Self {
        Self::with_limits(seed, 1, 1)
    }

    /// Custom bounds. Yields no candidates when the seed is empty, when
    /// `max_chunk < min_chunk`, or when `min_chunk` is 0.
    pub fn with_limits(seed: Seed, min_chunk: usize, max_chunk: usize) -> Self {
        let n = seed.line_count();
        let mut sizes = chunk_sizes(min_chunk, max_chunk);
        // The first size with any valid offset; sizes above the line count
        // have none.
        let cursor = sizes
            .find(|&size| size <= n && n > 0)
            .map(|size| Cursor { size, offset: 0 });
        Chunks {
            seed,
            min_chunk,
            cursor,
        }
    }

    /// Advance to the next `(size, offset)` with a valid removal window.
    fn advance(&mut self) {
        let Some(cur) = self.cursor else { return };
        let n = self.seed.line_count();
        if cur.offset + cur.size < n {
            self.cursor = Some(Cursor {
                size: cur.size,
                offset: cur.offset + 1,
            });
            return;
        }
        let halved = cur.size / 2;
        self.cursor = (halved >= self.min_chunk).then(|| {
            debug!(chunk_size = halved, "shrinking chunk size");
            Cursor {
                size: halved,
                offset: 0,
            }
        });
    }
}

impl Strategy for Chunks {
    fn next_candidate(&mut self, dest: &Utf8Path) -> anyhow::Result<Round> {
        let Some(cur) = self.cursor else {
            return Ok(Round::Exhausted);
        };
        let candidate = self.seed.without_lines(cur.offset, cur.size);
        fs::write(dest, candidate)?;
        self.advance();
        Ok(Round::Produced)
    }
}
