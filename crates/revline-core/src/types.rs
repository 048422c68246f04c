use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Label used wherever a change has no known file.
pub const UNKNOWN_FILE: &str = "unknown";

fn file_label(file: Option<&Path>) -> String {
    match file {
        Some(path) => path.display().to_string(),
        None => UNKNOWN_FILE.to_string(),
    }
}

/// A single added line extracted from a unified diff.
///
/// # Examples
///
/// ```
/// use revline_core::ChangeRecord;
/// use std::path::PathBuf;
///
/// let record = ChangeRecord {
///     file: Some(PathBuf::from("src/lib.rs")),
///     line: Some(12),
///     line_content: "let x = 1;".into(),
/// };
/// assert_eq!(record.file_label(), "src/lib.rs");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    /// File the line was added to, if a file header preceded it.
    pub file: Option<PathBuf>,
    /// Line number in the new version, when the enclosing hunk header was readable.
    pub line: Option<u32>,
    /// Added text with the `+` marker stripped and whitespace trimmed.
    pub line_content: String,
}

impl ChangeRecord {
    /// Display form of the file, `unknown` when absent.
    pub fn file_label(&self) -> String {
        file_label(self.file.as_deref())
    }
}

/// Whether a suggestion came back from the model or stands in for a failure.
///
/// # Examples
///
/// ```
/// use revline_core::SuggestionStatus;
///
/// assert_eq!(SuggestionStatus::default(), SuggestionStatus::Reviewed);
/// assert_eq!(SuggestionStatus::Failed.to_string(), "failed");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    /// Text produced by the model.
    #[default]
    Reviewed,
    /// Placeholder recorded after the request failed.
    Failed,
}

impl fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestionStatus::Reviewed => write!(f, "reviewed"),
            SuggestionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Review commentary for one [`ChangeRecord`].
///
/// # Examples
///
/// ```
/// use revline_core::{ReviewSuggestion, SuggestionStatus};
///
/// let suggestion = ReviewSuggestion {
///     file: None,
///     line: None,
///     suggestion: "looks fine".into(),
///     status: SuggestionStatus::Reviewed,
/// };
/// assert_eq!(suggestion.file_label(), "unknown");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSuggestion {
    /// File of the reviewed line.
    pub file: Option<PathBuf>,
    /// Line number of the reviewed line in the new version.
    pub line: Option<u32>,
    /// Free-text commentary.
    pub suggestion: String,
    /// Origin of the commentary.
    #[serde(default)]
    pub status: SuggestionStatus,
}

impl ReviewSuggestion {
    /// Display form of the file, `unknown` when absent.
    pub fn file_label(&self) -> String {
        file_label(self.file.as_deref())
    }
}

/// How the analyzer reacts when a single request fails.
///
/// # Examples
///
/// ```
/// use revline_core::ErrorPolicy;
///
/// let policy: ErrorPolicy = "skip".parse().unwrap();
/// assert_eq!(policy, ErrorPolicy::Skip);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Abort the run with the first failure.
    #[default]
    #[serde(alias = "fail-fast")]
    Fail,
    /// Record a placeholder suggestion and keep going.
    #[serde(alias = "continue")]
    Skip,
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::Fail => write!(f, "fail"),
            ErrorPolicy::Skip => write!(f, "skip"),
        }
    }
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fail" | "fail-fast" => Ok(ErrorPolicy::Fail),
            "skip" | "continue" => Ok(ErrorPolicy::Skip),
            other => Err(format!("unknown error policy: {other}")),
        }
    }
}

/// Output format for what the binary prints to stdout.
///
/// # Examples
///
/// ```
/// use revline_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The markdown report.
    #[default]
    Markdown,
    /// Suggestions as JSON with camelCase keys.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
