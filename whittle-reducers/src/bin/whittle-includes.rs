//! Reducer: removes the n-th `#include` line of the seed, one per round.

use anyhow::Context;
use regex::bytes::Regex;
use std::process::ExitCode;
use whittle_predicate::{LinePredicate, NthMatch};
use whittle_seed::Seed;

fn main() -> ExitCode {
    whittle_protocol::run(|seed| {
        let re = Regex::new(r"^#\s*include").context("compile include pattern")?;
        Ok(Some(NthMatch::new(
            Seed::read(seed)?,
            LinePredicate::Matches(re),
        )))
    })
}
