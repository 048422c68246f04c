use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::RevlineError;
use crate::types::ErrorPolicy;

/// Top-level configuration loaded from `.revline.toml`.
///
/// Supports layered resolution: CLI flags > env vars > local config > defaults.
///
/// # Examples
///
/// ```
/// use revline_core::RevlineConfig;
///
/// let config = RevlineConfig::default();
/// assert_eq!(config.review.concurrency, 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevlineConfig {
    /// Chat completion provider settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Review behavior settings.
    #[serde(default)]
    pub review: ReviewConfig,
}

impl RevlineConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RevlineError::FileNotFound`] if the file does not exist,
    /// [`RevlineError::Io`] if it cannot be read, or [`RevlineError::Toml`]
    /// if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use revline_core::RevlineConfig;
    /// use std::path::Path;
    ///
    /// let config = RevlineConfig::from_file(Path::new(".revline.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, RevlineError> {
        if !path.exists() {
            return Err(RevlineError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`RevlineError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use revline_core::RevlineConfig;
    ///
    /// let toml = r#"
    /// [review]
    /// concurrency = 4
    /// "#;
    /// let config = RevlineConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.review.concurrency, 4);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, RevlineError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Chat completion provider configuration.
///
/// Any endpoint speaking the OpenAI `/v1/chat/completions` protocol works.
///
/// # Examples
///
/// ```
/// use revline_core::LlmConfig;
///
/// let config = LlmConfig::default();
/// assert_eq!(config.model, "gpt-4-turbo");
/// assert_eq!(config.api_key_env, "OPENAI_API_KEY");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// API key for the provider. Takes precedence over `api_key_env`.
    pub api_key: Option<String>,
    /// Environment variable the API key is read from.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Custom base URL for API requests.
    pub base_url: Option<String>,
    /// Sampling temperature. Omitted from requests when unset.
    pub temperature: Option<f32>,
    /// Per-request timeout in seconds (default: 120).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Extra attempts after a transient failure (default: 2).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_model() -> String {
    "gpt-4-turbo".into()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".into()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_retries() -> u32 {
    2
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
            api_key_env: default_api_key_env(),
            base_url: None,
            temperature: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl LlmConfig {
    /// Resolve the API key: explicit `api_key` first, then `api_key_env`.
    ///
    /// Empty values count as unset.
    ///
    /// # Examples
    ///
    /// ```
    /// use revline_core::LlmConfig;
    ///
    /// let config = LlmConfig {
    ///     api_key: Some("sk-test".into()),
    ///     ..LlmConfig::default()
    /// };
    /// assert_eq!(config.resolve_api_key().as_deref(), Some("sk-test"));
    /// ```
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }

    /// Return a copy with `api_key` filled in from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`RevlineError::Config`] when no key is configured anywhere.
    pub fn with_resolved_api_key(&self) -> Result<Self, RevlineError> {
        let key = self.resolve_api_key().ok_or_else(|| {
            RevlineError::Config(format!(
                "no API key configured: set {} or add api_key under [llm]",
                self.api_key_env
            ))
        })?;
        Ok(Self {
            api_key: Some(key),
            ..self.clone()
        })
    }
}

/// Review behavior configuration.
///
/// # Examples
///
/// ```
/// use revline_core::{ErrorPolicy, ReviewConfig};
///
/// let config = ReviewConfig::default();
/// assert_eq!(config.concurrency, 1);
/// assert_eq!(config.on_error, ErrorPolicy::Fail);
/// assert!(config.skip_patterns.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Maximum number of requests in flight (default: 1, strictly sequential).
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// What to do when a single line cannot be reviewed.
    #[serde(default)]
    pub on_error: ErrorPolicy,
    /// Glob patterns for files whose changes are not sent for review.
    #[serde(default)]
    pub skip_patterns: Vec<String>,
    /// Where the markdown report is written (default: `code_review_report.md`).
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_concurrency() -> usize {
    1
}

fn default_output() -> PathBuf {
    PathBuf::from("code_review_report.md")
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            on_error: ErrorPolicy::default(),
            skip_patterns: Vec::new(),
            output: default_output(),
        }
    }
}
