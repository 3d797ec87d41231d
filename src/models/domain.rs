use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Question key to answer label, exactly as the model returned it
pub type ParsedAnswerSet = Map<String, Value>;

/// Outcome of scoring a model's answer set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    #[serde(rename = "parsedResponse")]
    pub parsed_response: ParsedAnswerSet,
    /// Mean label score on the 0-5 scale, rounded to 2 decimals
    #[serde(rename = "overallScore")]
    pub overall_score: f64,
}

/// Stored analysis of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: uuid::Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub prompt: String,
    pub text: String,
    pub score: Option<f64>,
    #[serde(default)]
    pub metadata: Value,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Fields supplied by the caller when persisting a new analysis
#[derive(Debug, Clone)]
pub struct NewConversation {
    pub kind: String,
    pub prompt: String,
    pub text: String,
    pub score: Option<f64>,
    pub metadata: Value,
}

impl NewConversation {
    pub fn from_score(kind: String, prompt: String, text: String, result: ScoreResult) -> Self {
        Self {
            kind,
            prompt,
            text,
            score: Some(result.overall_score),
            metadata: Value::Object(result.parsed_response),
        }
    }

    /// Stamp an id and timestamps onto the new record
    pub fn into_record(self) -> ConversationRecord {
        let now = chrono::Utc::now();
        ConversationRecord {
            id: uuid::Uuid::new_v4(),
            kind: self.kind,
            prompt: self.prompt,
            text: self.text,
            score: self.score,
            metadata: self.metadata,
            created_at: now,
            updated_at: now,
        }
    }
}
