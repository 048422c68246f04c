use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use revline_core::{
    ChangeRecord, ErrorPolicy, ReviewConfig, ReviewSuggestion, RevlineError, SuggestionStatus,
};
use tracing::{debug, warn};

use crate::llm::{ChatCompletion, ChatMessage};
use crate::prompt;

/// Sends every change record to a chat completion service, one request each.
///
/// Results come back in record order regardless of how many requests are in
/// flight. With the default concurrency of 1 requests go out strictly one at
/// a time.
pub struct ChangeAnalyzer<C> {
    client: C,
    concurrency: usize,
    on_error: ErrorPolicy,
    progress: ProgressBar,
}

impl<C: ChatCompletion> ChangeAnalyzer<C> {
    /// Create an analyzer from a completion service and review config.
    pub fn new(client: C, config: &ReviewConfig) -> Self {
        Self {
            client,
            concurrency: config.concurrency.max(1),
            on_error: config.on_error,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report progress on `bar`, one tick per finished record.
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = bar;
        self
    }

    /// Model used by the underlying service.
    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Review each record and return one suggestion per record, same order.
    ///
    /// # Errors
    ///
    /// Under [`ErrorPolicy::Fail`], returns the first [`RevlineError::Llm`]
    /// and drops requests still in flight. Under [`ErrorPolicy::Skip`] this
    /// never fails; failed lines get a placeholder marked
    /// [`SuggestionStatus::Failed`].
    pub async fn analyze(
        &self,
        records: &[ChangeRecord],
    ) -> Result<Vec<ReviewSuggestion>, RevlineError> {
        debug!(
            records = records.len(),
            concurrency = self.concurrency,
            policy = %self.on_error,
            "analyzing change records"
        );

        let mut results = stream::iter(records)
            .map(|record| self.review_one(record))
            .buffered(self.concurrency);

        let mut suggestions = Vec::with_capacity(records.len());
        while let Some(result) = results.next().await {
            let suggestion = result.inspect_err(|_| self.progress.finish_and_clear())?;
            self.progress.inc(1);
            suggestions.push(suggestion);
        }
        self.progress.finish_and_clear();

        Ok(suggestions)
    }

    async fn review_one(&self, record: &ChangeRecord) -> Result<ReviewSuggestion, RevlineError> {
        let messages = vec![ChatMessage::user(prompt::build_review_prompt(record))];

        match self.client.complete(messages).await {
            Ok(text) => Ok(ReviewSuggestion {
                file: record.file.clone(),
                line: record.line,
                suggestion: text,
                status: SuggestionStatus::Reviewed,
            }),
            Err(e) => match self.on_error {
                ErrorPolicy::Fail => Err(e),
                ErrorPolicy::Skip => {
                    warn!(file = %record.file_label(), error = %e, "review failed, continuing");
                    Ok(ReviewSuggestion {
                        file: record.file.clone(),
                        line: record.line,
                        suggestion: prompt::unavailable_placeholder(&e),
                        status: SuggestionStatus::Failed,
                    })
                }
            },
        }
    }
}
