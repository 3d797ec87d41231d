use actix_web::{web, HttpResponse, Responder};
use validator::{Validate, ValidationErrors};
use crate::core::evaluator::validate_prompt_template;
use crate::core::{ResponseEvaluator, Summarizer, SummaryError};
use crate::models::{
    AnalyzeRequest, DataResponse, ErrorResponse, HealthResponse, NewConversation, StatusMessage,
    SummarizeRequest, SummaryResponse,
};
use crate::services::ConversationStore;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub evaluator: ResponseEvaluator,
    pub summarizer: Summarizer,
    pub store: Arc<dyn ConversationStore>,
}

/// Configure all conversation-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/analyze", web::post().to(analyze))
        .route("/get-all-score", web::get().to(get_all_scores))
        .route("/summarize", web::post().to(summarize));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// First failing field message, in request field order
fn first_validation_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();

    ["type", "kind", "text", "prompt"]
        .iter()
        .filter_map(|field| field_errors.get(*field))
        .chain(field_errors.values())
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}

/// Analyze and persist a conversation
///
/// POST /api/analyze
///
/// Request body:
/// ```json
/// {
///   "type": "string",
///   "text": "string (at least 5 characters)",
///   "prompt": "string containing {conversation}"
/// }
/// ```
async fn analyze(
    state: web::Data<AppState>,
    req: web::Json<AnalyzeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for analyze request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse::new(first_validation_message(&errors)));
    }
    if let Err(e) = validate_prompt_template(&req.prompt) {
        return HttpResponse::BadRequest().json(ErrorResponse::new(e.to_string()));
    }

    let AnalyzeRequest { kind, text, prompt } = req.into_inner();

    let evaluation = match state.evaluator.evaluate(&text, &prompt).await {
        Ok(result) => result,
        Err(e) if e.is_client_error() => {
            return HttpResponse::BadRequest().json(ErrorResponse::new(e.to_string()));
        }
        Err(e) => {
            tracing::error!("Analysis error for {:?} conversation: {}", kind, e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::with_details("Failed to analyze conversation", e));
        }
    };

    tracing::info!("Calculated score {} for {:?} conversation", evaluation.overall_score, kind);

    match state
        .store
        .insert(NewConversation::from_score(kind, prompt, text, evaluation))
        .await
    {
        Ok(record) => HttpResponse::Created().json(DataResponse::new(
            "Conversation analyzed and saved successfully!",
            record,
        )),
        Err(e) => {
            tracing::error!("Failed to store analyzed conversation: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::with_details("Failed to analyze conversation", e))
        }
    }
}

/// List every scored conversation, newest first
///
/// GET /api/get-all-score
async fn get_all_scores(state: web::Data<AppState>) -> impl Responder {
    match state.store.list_recent().await {
        Ok(records) => HttpResponse::Ok().json(DataResponse::new(
            "Conversations retrieved successfully!",
            records,
        )),
        Err(e) => {
            tracing::error!("Error fetching conversations: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::with_details("Failed to retrieve conversations", e))
        }
    }
}

/// Summarize free text
///
/// POST /api/summarize
///
/// Request body:
/// ```json
/// { "text": "string (at least 20 words)" }
/// ```
async fn summarize(
    state: web::Data<AppState>,
    req: web::Json<SummarizeRequest>,
) -> impl Responder {
    let text = req.text.as_deref().unwrap_or_default();

    match state.summarizer.summarize(text).await {
        Ok(summary) => HttpResponse::Ok().json(SummaryResponse { status: true, summary }),
        Err(e @ SummaryError::MissingText) => {
            HttpResponse::BadRequest().json(ErrorResponse::new(e.to_string()))
        }
        Err(e @ SummaryError::TooShort { .. }) => HttpResponse::BadRequest().json(StatusMessage {
            status: false,
            message: e.to_string(),
        }),
        Err(SummaryError::Upstream(e)) => {
            tracing::error!("Summary generation failed: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::with_details("Summary generation failed", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_validation_message_follows_field_order() {
        let req = AnalyzeRequest {
            kind: String::new(),
            text: "hey".to_string(),
            prompt: String::new(),
        };

        let errors = req.validate().unwrap_err();
        assert_eq!(first_validation_message(&errors), "Type fields are required");
    }

    #[test]
    fn test_short_text_message() {
        let req = AnalyzeRequest {
            kind: "call".to_string(),
            text: "hey".to_string(),
            prompt: "{conversation}".to_string(),
        };

        let errors = req.validate().unwrap_err();
        assert_eq!(first_validation_message(&errors), "Text must be at least 5 characters long.");
    }
}
