//! End-to-end handshake tests against the real reducer binaries.
//!
//! Stdin is pre-loaded with destination-path lines; the pipe closing after
//! the last line doubles as the driver going away, which a reducer must
//! treat as cancellation.

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn reducer(name: &str) -> Command {
    Command::cargo_bin(name).expect(name)
}

fn write_seed(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("seed");
    fs::write(&path, content).unwrap();
    path
}

/// `count` destination paths under `dir`, newline-terminated for stdin.
fn dest_lines(dir: &TempDir, count: usize) -> (Vec<PathBuf>, String) {
    let mut paths = Vec::new();
    let mut input = String::new();
    for i in 0..count {
        let p = dir.path().join(format!("cand-{i}"));
        input.push_str(p.to_str().unwrap());
        input.push('\n');
        paths.push(p);
    }
    (paths, input)
}

#[test]
fn lines_reducer_removes_one_line_per_round() {
    let dir = TempDir::new().unwrap();
    let seed = write_seed(&dir, "a\nb\nc\n");
    let (dests, input) = dest_lines(&dir, 3);

    reducer("whittle-lines")
        .arg(&seed)
        .write_stdin(input)
        .assert()
        .success()
        .stdout("\n\n\n");

    assert_eq!(fs::read(&dests[0]).unwrap(), b"b\nc\n");
    assert_eq!(fs::read(&dests[1]).unwrap(), b"a\nc\n");
    assert_eq!(fs::read(&dests[2]).unwrap(), b"a\nb\n");
}

#[test]
fn lines_reducer_stops_after_exhaustion() {
    let dir = TempDir::new().unwrap();
    let seed = write_seed(&dir, "a\nb\n");
    // More destinations than candidates; the extras stay unconsumed.
    let (dests, input) = dest_lines(&dir, 5);

    reducer("whittle-lines")
        .arg(&seed)
        .write_stdin(input)
        .assert()
        .success()
        .stdout("\n\n");

    assert!(!dests[2].exists());
}

#[test]
fn chunks_reducer_first_candidate_is_empty() {
    let dir = TempDir::new().unwrap();
    let seed = write_seed(&dir, "a\nb\nc\nd\n");
    let (dests, input) = dest_lines(&dir, 1);

    reducer("whittle-chunks")
        .arg(&seed)
        .write_stdin(input)
        .assert()
        .success()
        .stdout("\n");

    assert_eq!(fs::read(&dests[0]).unwrap(), b"");
}

#[test]
fn empty_destination_line_cancels_mid_run() {
    let dir = TempDir::new().unwrap();
    let seed = write_seed(&dir, "a\nb\nc\nd\ne\n");
    let first = dir.path().join("cand-0");
    let after = dir.path().join("cand-after");
    let input = format!(
        "{}\n\n{}\n",
        first.to_str().unwrap(),
        after.to_str().unwrap()
    );

    reducer("whittle-lines")
        .arg(&seed)
        .write_stdin(input)
        .assert()
        .success()
        .stdout("\n");

    assert!(first.exists());
    assert!(!after.exists());
}

#[test]
fn blank_reducer_follows_the_original_seed_each_round() {
    let dir = TempDir::new().unwrap();
    let seed = write_seed(&dir, "a\n\nb\n\nc\n");
    let (dests, input) = dest_lines(&dir, 3);

    reducer("whittle-blank")
        .arg(&seed)
        .write_stdin(input)
        .assert()
        .success()
        .stdout("\n\n");

    assert_eq!(fs::read(&dests[0]).unwrap(), b"a\nb\n\nc\n");
    assert_eq!(fs::read(&dests[1]).unwrap(), b"a\n\nb\nc\n");
    assert!(!dests[2].exists());
}

#[test]
fn includes_reducer_targets_include_lines_only() {
    let dir = TempDir::new().unwrap();
    let seed = write_seed(&dir, "#include <a.h>\nint main() {}\n");
    let (dests, input) = dest_lines(&dir, 2);

    reducer("whittle-includes")
        .arg(&seed)
        .write_stdin(input)
        .assert()
        .success()
        .stdout("\n");

    assert_eq!(fs::read(&dests[0]).unwrap(), b"int main() {}\n");
}

#[test]
fn balanced_angle_emits_span_then_interior_per_pair() {
    let dir = TempDir::new().unwrap();
    let seed = write_seed(&dir, "<a<b>c>d");
    let (dests, input) = dest_lines(&dir, 4);

    reducer("whittle-balanced-angle")
        .arg(&seed)
        .write_stdin(input)
        .assert()
        .success()
        .stdout("\n\n\n\n");

    assert_eq!(fs::read(&dests[0]).unwrap(), b"d");
    assert_eq!(fs::read(&dests[1]).unwrap(), b"<>d");
    assert_eq!(fs::read(&dests[2]).unwrap(), b"<ac>d");
    assert_eq!(fs::read(&dests[3]).unwrap(), b"<a<>c>d");
}

#[test]
fn balanced_empty_interior_is_skipped() {
    let dir = TempDir::new().unwrap();
    let seed = write_seed(&dir, "<>");
    let (dests, input) = dest_lines(&dir, 2);

    reducer("whittle-balanced-angle")
        .arg(&seed)
        .write_stdin(input)
        .assert()
        .success()
        .stdout("\n");

    assert_eq!(fs::read(&dests[0]).unwrap(), b"");
    assert!(!dests[1].exists());
}

#[test]
fn missing_seed_is_a_fatal_error() {
    let dir = TempDir::new().unwrap();
    reducer("whittle-lines")
        .arg(dir.path().join("no-such-seed"))
        .write_stdin("ignored\n")
        .assert()
        .failure();
}

fn write_profile(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("profile.toml");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn tool_reducer_with_absent_tool_is_a_zero_candidate_no_op() {
    let dir = TempDir::new().unwrap();
    let seed = write_seed(&dir, "anything\n");
    let missing = dir.path().join("no-such-tool");
    let profile = write_profile(
        &dir,
        &format!(
            "search_paths = [\"{}\"]\nargs = []\n",
            missing.to_str().unwrap()
        ),
    );
    let (dests, input) = dest_lines(&dir, 1);

    reducer("whittle-tool")
        .arg("--profile")
        .arg(&profile)
        .arg(&seed)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(!dests[0].exists());
}

#[cfg(unix)]
#[test]
fn tool_reducer_maps_exit_codes_per_profile() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let seed = write_seed(&dir, "anything\n");

    // Produces variants for counters 0 and 1, then reports exhaustion.
    let tool = dir.path().join("fake-delta");
    fs::write(
        &tool,
        "#!/bin/sh\nif [ \"$1\" -lt 2 ]; then echo \"variant $1\"; exit 51; fi\nexit 9\n",
    )
    .unwrap();
    fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

    let profile = write_profile(
        &dir,
        &format!(
            "search_paths = [\"{}\"]\nargs = [\"{{index}}\"]\nproduced_codes = [51]\notherwise = \"exhausted\"\n",
            tool.to_str().unwrap()
        ),
    );
    let (dests, input) = dest_lines(&dir, 5);

    reducer("whittle-tool")
        .arg("--profile")
        .arg(&profile)
        .arg(&seed)
        .write_stdin(input)
        .assert()
        .success()
        .stdout("\n\n");

    assert_eq!(fs::read(&dests[0]).unwrap(), b"variant 0\n");
    assert_eq!(fs::read(&dests[1]).unwrap(), b"variant 1\n");
    // The exhausting round opened its destination before classifying, but
    // signalled nothing and consumed no further lines.
    assert_eq!(fs::read(&dests[2]).unwrap(), b"");
    assert!(!dests[3].exists());
}

#[test]
fn clex_reducer_without_clex_exits_clean() {
    // Only meaningful on machines without creduce installed, which is the
    // common case for CI; with clex present the reducer would block on
    // stdin instead, so feed it a cancellation immediately.
    let dir = TempDir::new().unwrap();
    let seed = write_seed(&dir, "int x;\n");

    reducer("whittle-clex-rm-toks-11")
        .arg(&seed)
        .write_stdin("\n")
        .assert()
        .success();
}
