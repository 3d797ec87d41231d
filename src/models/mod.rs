// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{ConversationRecord, NewConversation, ParsedAnswerSet, ScoreResult};
pub use requests::{AnalyzeRequest, SummarizeRequest};
pub use responses::{DataResponse, ErrorResponse, HealthResponse, StatusMessage, SummaryResponse};
