//! External delta-tool adapter.
//!
//! Some reductions are delegated to an external program (`clex`,
//! `clang_delta`) invoked once per round with a monotonically increasing
//! counter, its stdout captured as the candidate. The tool is located by
//! probing an explicit ordered list of absolute paths at construction;
//! when none resolves the reducer is a clean zero-candidate no-op.
//!
//! Exit statuses map through an explicit [`ToolProfile`] to exactly one of
//! three outcomes: candidate produced, search exhausted, or tool failure.
//! These tools are known to crash, so spawn errors and signal-death are
//! contained here as failures and never escape into the handshake stream.

use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;
use tracing::{debug, warn};
use whittle_protocol::{Round, Strategy};

/// Outcome class an exit code maps to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExitClass {
    /// The tool wrote a candidate to stdout; advance the counter.
    Produced,
    /// The tool reports its search space used up; stop cleanly.
    Exhausted,
    /// Anything crash-like; stop silently.
    #[default]
    Failed,
}

/// How to find and invoke one external tool.
///
/// Argv entries may contain `{index}` and `{seed}` placeholders,
/// substituted per round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolProfile {
    /// Ordered absolute paths probed for the executable.
    pub search_paths: Vec<Utf8PathBuf>,
    /// Argument template.
    pub args: Vec<String>,
    /// Exit codes meaning a candidate was produced.
    #[serde(default)]
    pub produced_codes: Vec<i32>,
    /// Exit codes meaning the tool's search is exhausted.
    #[serde(default)]
    pub exhausted_codes: Vec<i32>,
    /// Class for any other exit code.
    #[serde(default)]
    pub otherwise: ExitClass,
    /// First counter value.
    #[serde(default)]
    pub first_index: u64,
}

/// Errors loading a profile from disk.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("read profile: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse profile: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ToolProfile {
    pub fn from_toml_path(path: &Utf8Path) -> Result<Self, ProfileError> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// `clex <command> <index> <seed>`; exits 51 when it produced a
    /// variant, with the counter starting at 0.
    pub fn clex(command: &str) -> Self {
        ToolProfile {
            search_paths: [
                "/usr/local/libexec/clex",
                "/usr/libexec/clex",
                "/usr/lib/x86_64-linux-gnu/clex",
                "/usr/lib/creduce/clex",
                "/usr/local/Cellar/creduce/2.7.0/libexec/clex",
            ]
            .into_iter()
            .map(Utf8PathBuf::from)
            .collect(),
            args: vec![
                command.to_string(),
                "{index}".to_string(),
                "{seed}".to_string(),
            ],
            produced_codes: vec![51],
            exhausted_codes: Vec::new(),
            // Any normal exit that isn't 51 means "out of variants".
            otherwise: ExitClass::Exhausted,
            first_index: 0,
        }
    }

    /// `clang_delta --transformation=<t> --counter=<index> <seed>`; exits
    /// 0 when it applied the transformation instance, with the counter
    /// starting at 1.
    pub fn clang_delta(transformation: &str) -> Self {
        ToolProfile {
            search_paths: [
                "/usr/local/libexec/clang_delta",
                "/usr/libexec/clang_delta",
                "/usr/lib/x86_64-linux-gnu/clang_delta",
                "/usr/lib/creduce/clang_delta",
                "/usr/local/Cellar/creduce/2.7.0/libexec/clang_delta",
            ]
            .into_iter()
            .map(Utf8PathBuf::from)
            .collect(),
            args: vec![
                format!("--transformation={transformation}"),
                "--counter={index}".to_string(),
                "{seed}".to_string(),
            ],
            produced_codes: vec![0],
            exhausted_codes: Vec::new(),
            otherwise: ExitClass::Exhausted,
            first_index: 1,
        }
    }

    fn classify(&self, status: ExitStatus) -> ExitClass {
        match status.code() {
            // Killed by a signal.
            None => ExitClass::Failed,
            Some(code) if self.produced_codes.contains(&code) => ExitClass::Produced,
            Some(code) if self.exhausted_codes.contains(&code) => ExitClass::Exhausted,
            Some(_) => self.otherwise,
        }
    }
}

/// First search path that exists and is executable.
pub fn find_executable(paths: &[Utf8PathBuf]) -> Option<Utf8PathBuf> {
    paths.iter().find(|p| is_executable(p)).cloned()
}

#[cfg(unix)]
fn is_executable(path: &Utf8Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Utf8Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// The adapter strategy: one tool invocation per round, counter advanced
/// only when a candidate was produced.
pub struct ExternalTool {
    tool: Utf8PathBuf,
    seed: Utf8PathBuf,
    profile: ToolProfile,
    index: u64,
}

impl ExternalTool {
    /// Probe the profile's search paths. `None` means the tool is absent
    /// and the reducer should offer zero candidates.
    pub fn resolve(seed: &Utf8Path, profile: ToolProfile) -> Option<Self> {
        let tool = find_executable(&profile.search_paths)?;
        debug!(tool = %tool, "resolved external tool");
        Some(ExternalTool {
            tool,
            seed: seed.to_owned(),
            index: profile.first_index,
            profile,
        })
    }

    pub fn tool_path(&self) -> &Utf8Path {
        &self.tool
    }

    fn argv(&self) -> Vec<String> {
        let index = self.index.to_string();
        self.profile
            .args
            .iter()
            .map(|a| a.replace("{index}", &index).replace("{seed}", self.seed.as_str()))
            .collect()
    }
}

impl Strategy for ExternalTool {
    fn next_candidate(&mut self, dest: &Utf8Path) -> anyhow::Result<Round> {
        // Destination write failures are environmental and fatal; tool
        // misbehavior is not.
        let out = fs::File::create(dest)?;
        let status = match Command::new(&self.tool)
            .args(self.argv())
            .stdout(out.into_parts().0)
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) => status,
            Err(e) => {
                warn!(tool = %self.tool, error = %e, "failed to run external tool");
                return Ok(Round::ToolFailed);
            }
        };
        match self.profile.classify(status) {
            ExitClass::Produced => {
                self.index += 1;
                Ok(Round::Produced)
            }
            ExitClass::Exhausted => {
                debug!(tool = %self.tool, %status, "tool search exhausted");
                Ok(Round::Exhausted)
            }
            ExitClass::Failed => {
                warn!(tool = %self.tool, %status, "tool failed");
                Ok(Round::ToolFailed)
            }
        }
    }
}
