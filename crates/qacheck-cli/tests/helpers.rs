#![allow(dead_code)]

use std::path::PathBuf;
use std::process::Command;

use assert_cmd::prelude::*;

pub fn workspace_root() -> PathBuf {
    // crates/qacheck-cli -> <workspace root>
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

pub fn fixture(rel: &str) -> PathBuf {
    workspace_root().join("test/fixtures").join(rel)
}

/// `qacheck` with logs silenced and no user/cwd config in play.
pub fn bin_cmd() -> Command {
    let mut cmd = Command::cargo_bin("qacheck").expect("qacheck binary built");
    cmd.env("QACHECK_CONFIG", fixture("does-not-exist.toml"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .args(["--quiet", "--no-color"]);
    cmd
}

pub fn stdout_of(cmd: &mut Command) -> String {
    let out = cmd.assert().get_output().stdout.clone();
    String::from_utf8_lossy(&out).to_string()
}

/// Show the whole haystack when a substring is missing.
pub fn assert_contains_with_context(haystack: &str, needle: &str, ctx: &str) {
    assert!(
        haystack.contains(needle),
        "{ctx}: expected to find {needle:?}\n--- output ---\n{haystack}\n--------------"
    );
}
