//! Reducer: delegates to `clex rm-toks-11`. A no-op when clex is absent.

use std::process::ExitCode;
use whittle_tool::{ExternalTool, ToolProfile};

fn main() -> ExitCode {
    whittle_protocol::run(|seed| Ok(ExternalTool::resolve(seed, ToolProfile::clex("rm-toks-11"))))
}
