//! Reducer: delegates to an arbitrary external tool described by a TOML
//! profile (ordered search paths, argv template, exit-code classes).

use camino::Utf8PathBuf;
use clap::Parser;
use std::process::ExitCode;
use whittle_tool::{ExternalTool, ToolProfile};

#[derive(Debug, Parser)]
#[command(
    name = "whittle-tool",
    about = "Generic external-tool reducer driven by a TOML profile."
)]
struct Cli {
    /// Tool profile to load.
    #[arg(long)]
    profile: Utf8PathBuf,

    /// Seed test case to shrink (read-only).
    seed: Utf8PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    whittle_protocol::run_with_seed(&cli.seed, |seed| {
        let profile = ToolProfile::from_toml_path(&cli.profile)?;
        Ok(ExternalTool::resolve(seed, profile))
    })
}
