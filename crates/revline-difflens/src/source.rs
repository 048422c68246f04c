//! Where diff text comes from: the `git` CLI, a patch file, or stdin.
use std::io::Read;
use std::path::Path;
use std::process::Command;

use revline_core::RevlineError;
use tracing::debug;

/// Run `git diff` against the working tree of `repo` and return its output.
///
/// The repository is addressed with `git -C`, so the process working
/// directory is left untouched. Colors and external diff drivers are
/// disabled so user configuration cannot change the output format.
///
/// # Errors
///
/// Returns [`RevlineError::Git`] if `git` cannot be spawned or exits with a
/// failure status (for example when `repo` is not a git working tree).
///
/// # Examples
///
/// ```no_run
/// use revline_difflens::source::working_tree_diff;
/// use std::path::Path;
///
/// let diff = working_tree_diff(Path::new(".")).unwrap();
/// println!("{diff}");
/// ```
pub fn working_tree_diff(repo: &Path) -> Result<String, RevlineError> {
    debug!(repo = %repo.display(), "running git diff");
    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(["diff", "--no-color", "--no-ext-diff"])
        .output()
        .map_err(|e| RevlineError::Git(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(RevlineError::Git(format!(
            "git diff failed in {} ({}): {}",
            repo.display(),
            output.status,
            stderr.trim()
        )));
    }

    let diff = String::from_utf8_lossy(&output.stdout).to_string();
    debug!(bytes = diff.len(), "git diff finished");
    Ok(diff)
}

/// Read diff text from a file, or from stdin when `path` is `-`.
///
/// # Errors
///
/// Returns [`RevlineError::FileNotFound`] for a missing file and
/// [`RevlineError::Io`] for any other read failure.
pub fn read_diff_file(path: &Path) -> Result<String, RevlineError> {
    if path == Path::new("-") {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        return Ok(input);
    }
    if !path.exists() {
        return Err(RevlineError::FileNotFound(path.to_path_buf()));
    }
    Ok(std::fs::read_to_string(path)?)
}
