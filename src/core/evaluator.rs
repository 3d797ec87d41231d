use crate::core::labels::{AnswerLabel, MAX_LABEL_SCORE};
use crate::models::{ParsedAnswerSet, ScoreResult};
use crate::services::{LlmClient, LlmError};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Placeholder the prompt template must contain
pub const CONVERSATION_MARKER: &str = "{conversation}";

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Errors produced while evaluating a conversation
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream error: {0}")]
    UpstreamError(String),

    #[error("AI response is not valid JSON: {0}")]
    MalformedResponse(String),

    #[error("No valid answers found in AI response.")]
    NoValidAnswers,
}

impl EvaluationError {
    /// Whether the caller, rather than the model or provider, is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, EvaluationError::InvalidInput(_))
    }
}

impl From<LlmError> for EvaluationError {
    fn from(err: LlmError) -> Self {
        EvaluationError::UpstreamError(err.to_string())
    }
}

pub fn validate_subject(subject: &str) -> Result<(), EvaluationError> {
    if subject.trim().is_empty() {
        return Err(EvaluationError::InvalidInput(
            "text must be a non-empty string".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_prompt_template(template: &str) -> Result<(), EvaluationError> {
    if !template.contains(CONVERSATION_MARKER) {
        return Err(EvaluationError::InvalidInput(format!(
            "prompt template must include \"{}\" placeholder",
            CONVERSATION_MARKER
        )));
    }
    Ok(())
}

/// Substitute `subject` for the first marker in `template`
///
/// Later markers, if any, are left untouched.
pub fn render_prompt(template: &str, subject: &str) -> Result<String, EvaluationError> {
    validate_subject(subject)?;
    validate_prompt_template(template)?;
    Ok(template.replacen(CONVERSATION_MARKER, subject, 1))
}

/// Remove a leading "```json" and a trailing "```" from trimmed model output
///
/// Each fence is stripped independently of the other. No further trimming
/// happens after the strip; the JSON parser tolerates the leftover whitespace.
pub fn strip_code_fence(raw: &str) -> &str {
    let mut content = raw.trim();
    if let Some(rest) = content.strip_prefix(FENCE_OPEN) {
        content = rest;
    }
    if let Some(rest) = content.strip_suffix(FENCE_CLOSE) {
        content = rest;
    }
    content
}

/// Parse model output into a question -> answer mapping
pub fn parse_answer_set(raw: &str) -> Result<ParsedAnswerSet, EvaluationError> {
    let cleaned = strip_code_fence(raw);

    let value: Value = serde_json::from_str(cleaned).map_err(|e| {
        tracing::error!("JSON parsing error: {} (raw response: {:?})", e, raw);
        EvaluationError::MalformedResponse(e.to_string())
    })?;

    match value {
        Value::Object(map) => Ok(map),
        other => {
            tracing::error!("Parsed response is not an object (raw response: {:?})", raw);
            Err(EvaluationError::MalformedResponse(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Mean label score over recognised answers on a 0-5 scale, rounded to 2 decimals
///
/// Answers that are not strings or not in the label vocabulary are skipped.
pub fn score_answers(answers: &ParsedAnswerSet) -> Result<f64, EvaluationError> {
    let mut total_score: u32 = 0;
    let mut question_count: u32 = 0;

    for (key, answer) in answers {
        let label = match answer.as_str().and_then(AnswerLabel::parse) {
            Some(label) => label,
            None => {
                tracing::warn!("Unexpected answer format for key {:?}: {}", key, answer);
                continue;
            }
        };
        total_score += u32::from(label.score());
        question_count += 1;
    }

    if question_count == 0 {
        return Err(EvaluationError::NoValidAnswers);
    }

    let max = f64::from(MAX_LABEL_SCORE);
    let overall = (f64::from(total_score) / (f64::from(question_count) * max)) * max;

    Ok(round2(overall))
}

/// Round the exact binary value of `value` to 2 decimals, ties away from zero
///
/// Scaling by 100 first would round products like 107.49999999999999 up to
/// 107.5 and push them over the midpoint.
fn round2(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_string().parse().ok())
        .unwrap_or(value)
}

/// Scores a conversation by asking the model to answer a questionnaire
///
/// Holds no per-request state; clones share the same LLM client.
#[derive(Clone)]
pub struct ResponseEvaluator {
    llm: Arc<dyn LlmClient>,
    upstream_timeout: Duration,
}

impl ResponseEvaluator {
    pub fn new(llm: Arc<dyn LlmClient>, upstream_timeout: Duration) -> Self {
        Self { llm, upstream_timeout }
    }

    /// Render the prompt, query the model, then parse and score its answers
    pub async fn evaluate(
        &self,
        subject: &str,
        template: &str,
    ) -> Result<ScoreResult, EvaluationError> {
        let prompt = render_prompt(template, subject)?;

        let raw = tokio::time::timeout(self.upstream_timeout, self.llm.complete(&prompt))
            .await
            .map_err(|_| {
                tracing::error!(
                    "{} did not answer within {:?}",
                    self.llm.name(),
                    self.upstream_timeout
                );
                EvaluationError::UpstreamError(format!(
                    "LLM call timed out after {}s",
                    self.upstream_timeout.as_secs()
                ))
            })??;

        // Whitespace-only output is handed to the parser and fails there
        if raw.is_empty() {
            return Err(LlmError::EmptyContent.into());
        }

        let parsed_response = parse_answer_set(&raw)?;
        let overall_score = score_answers(&parsed_response)?;

        tracing::info!(
            "Calculated score {:.2} from {} answers",
            overall_score,
            parsed_response.len()
        );

        Ok(ScoreResult {
            parsed_response,
            overall_score,
        })
    }
}
