//! Reducer: removes balanced `<>` spans and their interiors from the seed.

use std::process::ExitCode;
use whittle_balanced::{BalancedSpans, Bracket};
use whittle_seed::Seed;

fn main() -> ExitCode {
    whittle_protocol::run(|seed| Ok(Some(BalancedSpans::new(Seed::read(seed)?, Bracket::Angle))))
}
