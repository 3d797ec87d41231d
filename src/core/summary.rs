use crate::services::{LlmClient, LlmError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Texts shorter than this are rejected before reaching the model
pub const MIN_SUMMARY_WORDS: usize = 20;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Text is required for summarization.")]
    MissingText,

    #[error("Text must be at least 20 words for summarization.")]
    TooShort { words: usize },

    #[error("{0}")]
    Upstream(#[from] LlmError),
}

/// Whitespace-delimited word count of the trimmed text
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Instruction sent to the model, with `text` appended
pub fn summary_prompt(text: &str) -> String {
    format!(
        "Please summarize the following text in a concise manner with a structured format:\n\
         1. Write a short paragraph (200-250 words) summarizing the key points of the conversation. \
         Enclose this paragraph in <p> tags.\n\
         2. Extract and highlight five key points in the most concise form possible. \
         Each point should be a very short and direct phrase (max 5 words) enclosed in <ul><li> tags. \
         Focus only on actionable or significant details.\n\n\
         Avoid redundant information and irrelevant details. \
         Maintain a professional yet reader-friendly tone. \
         Here's the text to summarize: {text}\n"
    )
}

/// Turns long-form text into a paragraph plus five bullet points
#[derive(Clone)]
pub struct Summarizer {
    llm: Arc<dyn LlmClient>,
    upstream_timeout: Duration,
}

impl Summarizer {
    pub fn new(llm: Arc<dyn LlmClient>, upstream_timeout: Duration) -> Self {
        Self { llm, upstream_timeout }
    }

    /// Reject texts that are empty or too short to summarize
    pub fn check(text: &str) -> Result<(), SummaryError> {
        if text.is_empty() {
            return Err(SummaryError::MissingText);
        }
        let words = count_words(text);
        if words < MIN_SUMMARY_WORDS {
            return Err(SummaryError::TooShort { words });
        }
        Ok(())
    }

    pub async fn summarize(&self, text: &str) -> Result<String, SummaryError> {
        Self::check(text)?;

        let prompt = summary_prompt(text);
        let summary = tokio::time::timeout(self.upstream_timeout, self.llm.complete(&prompt))
            .await
            .map_err(|_| LlmError::Timeout(self.upstream_timeout.as_secs()))??;

        tracing::debug!("{} produced a {}-char summary", self.llm.name(), summary.len());

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoLlm;

    #[async_trait]
    impl LlmClient for EchoLlm {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
            Ok(prompt.to_string())
        }
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   "), 0);
        assert_eq!(count_words("  one\ttwo\n three  "), 3);
    }

    #[test]
    fn test_check_thresholds() {
        assert!(matches!(Summarizer::check(""), Err(SummaryError::MissingText)));
        assert!(matches!(
            Summarizer::check(&words(19)),
            Err(SummaryError::TooShort { words: 19 })
        ));
        assert!(Summarizer::check(&words(20)).is_ok());
    }

    #[test]
    fn test_prompt_embeds_text_and_format() {
        let prompt = summary_prompt("the quarterly plan");
        assert!(prompt.contains("<p>"));
        assert!(prompt.contains("<ul><li>"));
        assert!(prompt.ends_with("Here's the text to summarize: the quarterly plan\n"));
    }

    #[test]
    fn test_summarize_sends_prompt() {
        let summarizer = Summarizer::new(Arc::new(EchoLlm), Duration::from_secs(5));
        let text = words(25);
        let summary = tokio_test::block_on(summarizer.summarize(&text)).unwrap();
        assert_eq!(summary, summary_prompt(&text));
    }
}
