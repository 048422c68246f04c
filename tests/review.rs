use std::process::Command;

fn revline(dir: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_revline"));
    cmd.current_dir(dir)
        .env_remove("OPENAI_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn empty_diff_writes_title_only_report_without_api_key() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("empty.diff"), "").unwrap();

    let output = revline(dir.path())
        .args(["review", "--diff-file", "empty.diff"])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "review failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("# AI Code Review Report"));

    let written = std::fs::read_to_string(dir.path().join("code_review_report.md")).unwrap();
    assert_eq!(written, "# AI Code Review Report\n\n");
}

#[test]
fn deletions_only_diff_needs_no_api_key() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("del.diff"), "+++ b/a.py\n-x = 1\n").unwrap();

    let output = revline(dir.path())
        .args(["review", "--diff-file", "del.diff", "--no-write"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(!dir.path().join("code_review_report.md").exists());
}

#[test]
fn additions_without_api_key_fail_with_config_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("add.diff"), "+++ b/a.py\n+x = 1\n").unwrap();

    let output = revline(dir.path())
        .args(["review", "--diff-file", "add.diff"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("OPENAI_API_KEY"), "stderr: {stderr}");
    assert!(!dir.path().join("code_review_report.md").exists());
}

#[test]
fn skipped_files_need_no_api_key() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("lock.diff"), "+++ b/Cargo.lock\n+version = 3\n").unwrap();

    let output = revline(dir.path())
        .args([
            "review",
            "--diff-file",
            "lock.diff",
            "--skip-pattern",
            "*.lock",
            "--format",
            "json",
        ])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "review failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed, serde_json::json!([]));
}

#[test]
fn missing_repository_is_a_git_error() {
    let dir = tempfile::tempdir().unwrap();

    let output = revline(dir.path())
        .args(["review", "--repo", "no-such-repo"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("git"), "stderr: {stderr}");
}
