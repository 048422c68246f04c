use revline_core::{ChangeRecord, RevlineError};

const REVIEW_FOCUS: &str = "\
Provide specific feedback on:
1. Potential bugs or code quality issues
2. Performance concerns
3. Security vulnerabilities
4. Best practices and improvements
";

/// Build the user prompt asking for a review of one added line.
///
/// # Examples
///
/// ```
/// use revline_core::ChangeRecord;
/// use revline_review::prompt::build_review_prompt;
/// use std::path::PathBuf;
///
/// let record = ChangeRecord {
///     file: Some(PathBuf::from("app.py")),
///     line: None,
///     line_content: "eval(user_input)".into(),
/// };
/// let prompt = build_review_prompt(&record);
/// assert!(prompt.contains("app.py"));
/// assert!(prompt.contains("eval(user_input)"));
/// ```
pub fn build_review_prompt(record: &ChangeRecord) -> String {
    format!(
        "Analyze the following code change in {}:\n```\n{}\n```\n\n{REVIEW_FOCUS}",
        record.file_label(),
        record.line_content,
    )
}

/// Text recorded in place of a review when the request for it failed.
///
/// # Examples
///
/// ```
/// use revline_core::RevlineError;
/// use revline_review::prompt::unavailable_placeholder;
///
/// let text = unavailable_placeholder(&RevlineError::llm("401 Unauthorized"));
/// assert!(text.starts_with("_Review unavailable"));
/// ```
pub fn unavailable_placeholder(error: &RevlineError) -> String {
    format!("_Review unavailable: {error}_")
}
