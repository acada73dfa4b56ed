//! Shared test utilities for git-based tests.

use std::path::Path;
use std::process::Command;

/// Runs a git command in `dir`, asserting it succeeds.
pub fn git(dir: &Path, args: &[&str]) {
    let out = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        out.status.success(),
        "git {:?}: {}",
        args,
        String::from_utf8_lossy(&out.stderr)
    );
}

/// Creates a repo with one tracked file committed on main. The tracked
/// file gives `describe --dirty` something to notice when modified.
pub fn init_repo() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    for args in &[
        vec!["init", "--initial-branch=main"],
        vec!["config", "user.email", "test@test.com"],
        vec!["config", "user.name", "Test"],
        vec!["config", "commit.gpgsign", "false"],
    ] {
        git(dir, args);
    }
    std::fs::write(dir.join("tracked.txt"), "v1\n").unwrap();
    git(dir, &["add", "tracked.txt"]);
    git(dir, &["commit", "-m", "initial"]);
    tmp
}

/// Adds an empty commit on the current branch.
pub fn commit(dir: &Path, msg: &str) {
    git(dir, &["commit", "--allow-empty", "-m", msg]);
}

/// Tags HEAD with a lightweight tag.
pub fn tag(dir: &Path, name: &str) {
    git(dir, &["tag", name]);
}

/// Modifies the tracked file so the working tree reads as dirty.
pub fn dirty(dir: &Path, content: &str) {
    std::fs::write(dir.join("tracked.txt"), content).unwrap();
}
