//! Reducer: removes single lines from the seed, first line first.

use std::process::ExitCode;
use whittle_chunks::Chunks;
use whittle_seed::Seed;

fn main() -> ExitCode {
    whittle_protocol::run(|seed| Ok(Some(Chunks::single_lines(Seed::read(seed)?))))
}
