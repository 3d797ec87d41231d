// Service exports
pub mod gemini;
pub mod llm;
pub mod postgres;
pub mod store;

pub use gemini::GeminiClient;
pub use llm::{LlmClient, LlmError};
pub use postgres::PostgresClient;
pub use store::{ConversationStore, StoreError};
