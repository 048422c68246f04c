//! Line-by-line AI review of extracted changes.
//!
//! Provides the chat completion client, the review prompt, the
//! [`analyzer::ChangeAnalyzer`] that dispatches one request per added line,
//! and the markdown report builder.

pub mod analyzer;
pub mod llm;
pub mod prompt;
pub mod report;
pub mod retry;
