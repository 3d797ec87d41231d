use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// Minimum text length in UTF-16 code units, as browsers count it
pub const MIN_TEXT_LEN: usize = 5;

/// Request to analyze and score a conversation
///
/// Missing or `null` fields deserialize to empty strings so that the
/// validation layer, not the JSON extractor, reports them.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[validate(length(min = 1, message = "Type fields are required"))]
    #[serde(rename = "type", default, deserialize_with = "null_as_empty")]
    pub kind: String,
    #[validate(custom(function = "validate_text_len"))]
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
    #[validate(length(min = 1, message = "Prompt is required and must be a string."))]
    #[serde(default, deserialize_with = "null_as_empty")]
    pub prompt: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn validate_text_len(text: &str) -> Result<(), ValidationError> {
    if text.encode_utf16().count() < MIN_TEXT_LEN {
        return Err(ValidationError::new("length")
            .with_message(Cow::Borrowed("Text must be at least 5 characters long.")));
    }
    Ok(())
}

/// Request to summarize free text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub text: Option<String>,
}
