//! Turns unified diff text into per-line [`ChangeRecord`]s.
use std::path::PathBuf;

use revline_core::ChangeRecord;

const NEW_FILE_HEADER: &str = "+++ ";

/// Extract one [`ChangeRecord`] per added line of a unified diff.
///
/// A `+++ b/<path>` header sets the file for the records that follow; added
/// lines seen before any header get `file: None`. Deletions, context lines
/// and hunk headers produce nothing. Malformed input never fails, it simply
/// yields fewer (or no) records.
///
/// # Examples
///
/// ```
/// use revline_difflens::extractor::extract_changes;
/// use std::path::PathBuf;
///
/// let records = extract_changes("+++ b/a.py\n+x = 1\n");
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].file, Some(PathBuf::from("a.py")));
/// assert_eq!(records[0].line_content, "x = 1");
/// ```
pub fn extract_changes(diff: &str) -> Vec<ChangeRecord> {
    let mut records = Vec::new();
    let mut current_file: Option<PathBuf> = None;
    let mut new_line: Option<u32> = None;

    for line in diff.lines() {
        if let Some(header) = line.strip_prefix(NEW_FILE_HEADER) {
            if let Some(path) = parse_new_path(header) {
                current_file = Some(path);
                new_line = None;
            }
        }

        if line.starts_with('+') && !line.starts_with("+++") {
            records.push(ChangeRecord {
                file: current_file.clone(),
                line: new_line,
                line_content: line[1..].trim().to_string(),
            });
            new_line = new_line.map(|n| n.saturating_add(1));
            continue;
        }

        if line.starts_with("@@") {
            new_line = parse_new_start(line);
            continue;
        }

        // Context lines advance the new-side cursor, deletions do not.
        if line.starts_with(' ') || line.is_empty() {
            new_line = new_line.map(|n| n.saturating_add(1));
        }
    }

    records
}

/// Path from a `+++ ` header, only for the `b/` side.
///
/// `/dev/null` (deleted files) and empty paths leave the current file as it was.
fn parse_new_path(header: &str) -> Option<PathBuf> {
    let header = header.trim_end_matches('\r');
    let unquoted = match header.strip_prefix('"') {
        Some(rest) => rest.strip_suffix('"').unwrap_or(rest),
        None => header,
    };
    let path = unquoted.strip_prefix("b/")?;
    if path.is_empty() {
        return None;
    }
    Some(PathBuf::from(path))
}

/// Start line of the new-side range in `@@ -a,b +c,d @@`.
fn parse_new_start(line: &str) -> Option<u32> {
    let inner = line.strip_prefix("@@ ")?;
    let end = inner.find(" @@")?;
    let new_range = inner[..end].split(' ').nth(1)?.strip_prefix('+')?;
    let start = new_range.split(',').next()?;
    start.parse().ok()
}
