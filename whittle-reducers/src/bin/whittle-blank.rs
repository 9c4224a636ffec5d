//! Reducer: removes the n-th blank line of the seed, one per round.

use std::process::ExitCode;
use whittle_predicate::{LinePredicate, NthMatch};
use whittle_seed::Seed;

fn main() -> ExitCode {
    whittle_protocol::run(|seed| Ok(Some(NthMatch::new(Seed::read(seed)?, LinePredicate::Blank))))
}
