use std::path::PathBuf;

/// Errors that can occur across revline.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary renders it through `miette`.
///
/// # Examples
///
/// ```
/// use revline_core::RevlineError;
///
/// let err = RevlineError::Config("missing API key".into());
/// assert!(err.to_string().contains("missing API key"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum RevlineError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    #[diagnostic(code(revline::io))]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    #[diagnostic(
        code(revline::config),
        help("check .revline.toml or run 'revline init' to create one")
    )]
    Config(String),

    /// The `git` subprocess could not be run or exited with a failure.
    #[error("git error: {0}")]
    #[diagnostic(
        code(revline::git),
        help("make sure git is installed and --repo points at a git working tree")
    )]
    Git(String),

    /// Chat completion request or response failure.
    #[error("LLM error: {message}")]
    #[diagnostic(code(revline::llm))]
    Llm {
        /// Human-readable description of the failure.
        message: String,
        /// Whether retrying the same request may succeed.
        transient: bool,
    },

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    #[diagnostic(code(revline::serialization))]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    #[diagnostic(code(revline::toml))]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    #[diagnostic(code(revline::file_not_found))]
    FileNotFound(PathBuf),
}

impl RevlineError {
    /// A service failure that retrying will not fix (bad credentials, bad request).
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
            transient: false,
        }
    }

    /// A service failure worth retrying (network, rate limit, server error).
    pub fn llm_transient(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
            transient: true,
        }
    }

    /// Whether the error is a transient LLM failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use revline_core::RevlineError;
    ///
    /// assert!(RevlineError::llm_transient("429").is_transient());
    /// assert!(!RevlineError::llm("401").is_transient());
    /// assert!(!RevlineError::Git("boom".into()).is_transient());
    /// ```
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Llm { transient: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: RevlineError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn config_error_displays_message() {
        let err = RevlineError::Config("bad value".into());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn git_error_displays_message() {
        let err = RevlineError::Git("not a git repository".into());
        assert_eq!(err.to_string(), "git error: not a git repository");
    }

    #[test]
    fn llm_error_hides_transient_flag_from_message() {
        let err = RevlineError::llm_transient("LLM API error 503");
        assert_eq!(err.to_string(), "LLM error: LLM API error 503");
        assert!(err.is_transient());
    }

    #[test]
    fn file_not_found_shows_path() {
        let err = RevlineError::FileNotFound(PathBuf::from("/tmp/missing.diff"));
        assert!(err.to_string().contains("/tmp/missing.diff"));
    }
}
