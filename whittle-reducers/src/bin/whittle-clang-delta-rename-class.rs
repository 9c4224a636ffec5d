//! Reducer: delegates to `clang_delta --transformation=rename-class`.
//! A no-op when clang_delta is absent.

use std::process::ExitCode;
use whittle_tool::{ExternalTool, ToolProfile};

fn main() -> ExitCode {
    whittle_protocol::run(|seed| {
        Ok(ExternalTool::resolve(
            seed,
            ToolProfile::clang_delta("rename-class"),
        ))
    })
}
