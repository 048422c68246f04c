//! Pre-LLM filtering of change records by file path.
//!
//! Drops changes to files matching configured glob patterns (lock files,
//! vendored code, fixtures) so they never reach the model.

use std::path::PathBuf;

use revline_core::{ChangeRecord, ReviewConfig};
use tracing::warn;

/// Glob-based filter over [`ChangeRecord`] files.
///
/// # Examples
///
/// ```
/// use revline_difflens::filter::ChangeFilter;
///
/// let filter = ChangeFilter::new(&["*.lock".to_string()]);
/// assert!(filter.should_skip("Cargo.lock"));
/// assert!(!filter.should_skip("src/main.rs"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChangeFilter {
    skip_patterns: Vec<glob::Pattern>,
}

impl ChangeFilter {
    /// Build a filter from raw glob patterns. Invalid patterns are logged and ignored.
    pub fn new(patterns: &[String]) -> Self {
        let mut skip_patterns = Vec::new();
        for pat in patterns {
            match glob::Pattern::new(pat) {
                Ok(p) => skip_patterns.push(p),
                Err(e) => warn!(pattern = %pat, error = %e, "ignoring invalid skip pattern"),
            }
        }
        Self { skip_patterns }
    }

    /// Create a filter from review configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use revline_core::ReviewConfig;
    /// use revline_difflens::filter::ChangeFilter;
    ///
    /// let filter = ChangeFilter::from_config(&ReviewConfig::default());
    /// assert!(filter.is_empty());
    /// ```
    pub fn from_config(config: &ReviewConfig) -> Self {
        Self::new(&config.skip_patterns)
    }

    /// Whether no patterns are configured.
    pub fn is_empty(&self) -> bool {
        self.skip_patterns.is_empty()
    }

    /// Check if a single file path should be skipped.
    pub fn should_skip(&self, path: &str) -> bool {
        self.matching_pattern(path).is_some()
    }

    fn matching_pattern(&self, path: &str) -> Option<&glob::Pattern> {
        self.skip_patterns.iter().find(|p| p.matches(path))
    }

    /// Split records into kept and skipped, preserving order in both.
    ///
    /// Records without a file are always kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use revline_difflens::extractor::extract_changes;
    /// use revline_difflens::filter::ChangeFilter;
    ///
    /// let records = extract_changes("+++ b/yarn.lock\n+dep\n+++ b/src/a.ts\n+code\n");
    /// let result = ChangeFilter::new(&["*.lock".into()]).filter(records);
    /// assert_eq!(result.kept.len(), 1);
    /// assert_eq!(result.skipped.len(), 1);
    /// ```
    pub fn filter(&self, records: Vec<ChangeRecord>) -> FilterResult {
        if self.is_empty() {
            return FilterResult {
                kept: records,
                skipped: Vec::new(),
            };
        }

        let mut kept = Vec::new();
        let mut skipped: Vec<SkippedFile> = Vec::new();

        for record in records {
            let matched = record.file.as_ref().and_then(|file| {
                self.matching_pattern(&file.to_string_lossy())
                    .map(|p| (file.clone(), p.to_string()))
            });

            match matched {
                Some((path, pattern)) => {
                    if let Some(entry) = skipped.iter_mut().find(|s| s.path == path) {
                        entry.lines += 1;
                    } else {
                        skipped.push(SkippedFile {
                            path,
                            pattern,
                            lines: 1,
                        });
                    }
                }
                None => kept.push(record),
            }
        }

        FilterResult { kept, skipped }
    }
}

/// Result of filtering change records.
#[derive(Debug, Clone)]
pub struct FilterResult {
    /// Records that will be reviewed.
    pub kept: Vec<ChangeRecord>,
    /// Files whose added lines were dropped.
    pub skipped: Vec<SkippedFile>,
}

/// A file whose changes were filtered out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    /// Path of the skipped file.
    pub path: PathBuf,
    /// Pattern that matched it.
    pub pattern: String,
    /// Number of added lines dropped.
    pub lines: usize,
}
