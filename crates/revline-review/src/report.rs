//! Markdown report assembly.
use std::fmt::Write;
use std::path::Path;

use revline_core::{ReviewSuggestion, RevlineError};

/// Heading every report starts with.
pub const REPORT_TITLE: &str = "# AI Code Review Report\n\n";

/// Build the full markdown report: title, then one section per suggestion.
///
/// # Examples
///
/// ```
/// use revline_review::report::{build_report, REPORT_TITLE};
///
/// assert_eq!(build_report(&[]), REPORT_TITLE);
/// ```
pub fn build_report(suggestions: &[ReviewSuggestion]) -> String {
    let mut report = String::from(REPORT_TITLE);
    report.push_str(&render_entries(suggestions));
    report
}

/// Render only the per-suggestion sections, in input order.
///
/// Rendering two lists separately and concatenating the output equals
/// rendering their concatenation.
///
/// # Examples
///
/// ```
/// use revline_core::{ReviewSuggestion, SuggestionStatus};
/// use revline_review::report::render_entries;
/// use std::path::PathBuf;
///
/// let item = ReviewSuggestion {
///     file: Some(PathBuf::from("a.py")),
///     line: Some(1),
///     suggestion: "looks fine".into(),
///     status: SuggestionStatus::Reviewed,
/// };
/// assert_eq!(render_entries(&[item]), "## File: a.py\nlooks fine\n\n");
/// ```
pub fn render_entries(suggestions: &[ReviewSuggestion]) -> String {
    let mut out = String::new();
    for item in suggestions {
        let _ = writeln!(out, "## File: {}", item.file_label());
        let _ = write!(out, "{}\n\n", item.suggestion);
    }
    out
}

/// Write `report` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`RevlineError::Io`] if the file cannot be written.
pub fn write_report(path: &Path, report: &str) -> Result<(), RevlineError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, report)?;
    Ok(())
}
