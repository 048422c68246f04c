use std::path::{Path, PathBuf};
use std::process::Command;

use revline_difflens::extract_changes;
use revline_difflens::source::working_tree_diff;

fn git(dir: &Path, args: &[&str]) -> bool {
    Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["-c", "user.name=revline", "-c", "user.email=revline@example.com"])
        .args(args)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[test]
fn uncommitted_additions_become_records() {
    if !git_available() {
        eprintln!("git not installed, skipping");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    assert!(git(dir.path(), &["init", "-q"]));
    std::fs::write(dir.path().join("a.py"), "x = 1\n").unwrap();
    assert!(git(dir.path(), &["add", "a.py"]));
    assert!(git(dir.path(), &["commit", "-q", "-m", "init"]));

    std::fs::write(dir.path().join("a.py"), "x = 1\ny = 2\n").unwrap();

    let cwd_before = std::env::current_dir().unwrap();
    let diff = working_tree_diff(dir.path()).unwrap();
    assert_eq!(std::env::current_dir().unwrap(), cwd_before);

    let records = extract_changes(&diff);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].file, Some(PathBuf::from("a.py")));
    assert_eq!(records[0].line_content, "y = 2");
    assert_eq!(records[0].line, Some(2));
}

#[test]
fn clean_tree_yields_no_records() {
    if !git_available() {
        eprintln!("git not installed, skipping");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    assert!(git(dir.path(), &["init", "-q"]));
    let diff = working_tree_diff(dir.path()).unwrap();
    assert!(extract_changes(&diff).is_empty());
}
