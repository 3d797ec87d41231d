//! Personal Manager - conversation scoring and summarization service
//!
//! Scores conversations by having an LLM answer a questionnaire and
//! averaging the recognised answer labels, and summarizes long texts.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{AnswerLabel, EvaluationError, ResponseEvaluator, Summarizer};
pub use models::{ConversationRecord, ParsedAnswerSet, ScoreResult};
