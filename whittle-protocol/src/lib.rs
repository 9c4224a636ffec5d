//! The candidate handshake between a reducer process and the driver.
//!
//! A reducer is invoked as `reducer <seed-path>` and then loops in lockstep
//! with the driver: read one destination path from stdin, write the next
//! candidate there, emit a single newline on stdout once the write is
//! complete. An empty destination line (or closed stdin) is the driver's
//! cancellation signal. A strategy with nothing to offer — for example one
//! whose required external tool is missing — never enters the loop at all.
//!
//! Ordering is load-bearing: the driver starts reading the destination file
//! the instant it sees the completion newline, so the candidate must be
//! fully written and flushed first.
//!
//! Strategies implement [`Strategy`]; binaries wire one up through [`run`]
//! or [`run_with_seed`]. The loop itself, [`drive`], is generic over its
//! channels so it can be exercised against in-memory pipes.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

/// What a strategy did with one handshake round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Round {
    /// A candidate was fully written to the destination path.
    Produced,
    /// The strategy has no further candidates; the process ends cleanly.
    Exhausted,
    /// An external tool misbehaved; the process ends silently. The tools
    /// this covers are known to crash, and a crash must never surface as a
    /// fault that desyncs the handshake stream.
    ToolFailed,
}

/// One reduction-search strategy, driven once per handshake round.
///
/// Implementations own their cursor state (chunk size and offset, match
/// ordinal, tool counter) and advance it only on a [`Round::Produced`]
/// round. I/O errors writing the destination are fatal and should be
/// propagated, not mapped to [`Round::ToolFailed`].
pub trait Strategy {
    fn next_candidate(&mut self, dest: &Utf8Path) -> anyhow::Result<Round>;
}

/// Command line shared by every reducer binary.
#[derive(Debug, Parser)]
pub struct SeedArgs {
    /// Seed test case to shrink (read-only).
    pub seed: Utf8PathBuf,
}

/// Run the handshake loop over explicit channels.
///
/// Returns once the strategy is exhausted, a tool fails, or the driver
/// cancels (empty line or EOF on `input`). Only channel and destination
/// I/O errors are returned.
pub fn drive<S: Strategy>(
    strategy: &mut S,
    mut input: impl BufRead,
    mut output: impl Write,
) -> anyhow::Result<()> {
    let mut line = String::new();
    loop {
        line.clear();
        let n = input.read_line(&mut line)?;
        if n == 0 {
            debug!("input channel closed; stopping");
            return Ok(());
        }
        let dest = line.trim_end_matches('\n').trim_end_matches('\r');
        if dest.is_empty() {
            debug!("driver cancelled; stopping");
            return Ok(());
        }
        let dest = Utf8Path::new(dest);
        match strategy.next_candidate(dest)? {
            Round::Produced => {
                // The candidate is on disk; now, and only now, signal.
                output.write_all(b"\n")?;
                output.flush()?;
            }
            Round::Exhausted => {
                debug!("strategy exhausted");
                return Ok(());
            }
            Round::ToolFailed => {
                warn!("external tool failed; stopping without signal");
                return Ok(());
            }
        }
    }
}

/// Parse `reducer <seed-path>` and run `build`'s strategy to completion.
///
/// `build` returning `Ok(None)` means "zero candidates" (typically a
/// missing external tool): the process exits 0 before touching stdin or
/// stdout, which the driver treats as a no-op reducer.
pub fn run<S, F>(build: F) -> ExitCode
where
    S: Strategy,
    F: FnOnce(&Utf8Path) -> anyhow::Result<Option<S>>,
{
    let args = SeedArgs::parse();
    run_with_seed(&args.seed, build)
}

/// Like [`run`] for binaries that parse their own arguments.
pub fn run_with_seed<S, F>(seed: &Utf8Path, build: F) -> ExitCode
where
    S: Strategy,
    F: FnOnce(&Utf8Path) -> anyhow::Result<Option<S>>,
{
    init_tracing();
    match try_run(seed, build) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:?}");
            ExitCode::from(1)
        }
    }
}

fn try_run<S, F>(seed: &Utf8Path, build: F) -> anyhow::Result<()>
where
    S: Strategy,
    F: FnOnce(&Utf8Path) -> anyhow::Result<Option<S>>,
{
    let Some(mut strategy) = build(seed)? else {
        debug!(seed = %seed, "no candidates to offer");
        return Ok(());
    };
    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    drive(&mut strategy, stdin, stdout)
}

/// Logging goes to stderr; stdout belongs to the handshake.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}
