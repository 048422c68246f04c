//! Diff acquisition and per-line change extraction.
//!
//! Reads uncommitted changes with `git diff` (or from a patch file), turns
//! every added line into a [`revline_core::ChangeRecord`] and filters out
//! files the user asked to skip.
pub mod extractor;
pub mod filter;
pub mod source;

pub use extractor::extract_changes;
