//! Core types, configuration, and error handling for revline.
//!
//! This crate provides the shared foundation used by the other revline crates:
//! - [`RevlineError`]: unified error type using `thiserror`
//! - [`RevlineConfig`]: configuration loaded from `.revline.toml`
//! - Shared types: [`ChangeRecord`], [`ReviewSuggestion`], [`ErrorPolicy`],
//!   [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{LlmConfig, ReviewConfig, RevlineConfig};
pub use error::RevlineError;
pub use types::{
    ChangeRecord, ErrorPolicy, OutputFormat, ReviewSuggestion, SuggestionStatus, UNKNOWN_FILE,
};

/// A convenience `Result` type for revline operations.
pub type Result<T> = std::result::Result<T, RevlineError>;
