//! Reducer: removes successively smaller chunks of lines from the seed.

use std::process::ExitCode;
use whittle_chunks::Chunks;
use whittle_seed::Seed;

fn main() -> ExitCode {
    whittle_protocol::run(|seed| Ok(Some(Chunks::new(Seed::read(seed)?))))
}
