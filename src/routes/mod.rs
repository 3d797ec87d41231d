// Route exports
pub mod conversations;

use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse};
use crate::models::ErrorResponse;

pub use conversations::AppState;

/// JSON error response for malformed request bodies
#[derive(Debug)]
pub struct JsonError {
    pub message: String,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(&self.message))
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        message: format!("Invalid JSON: {}", err),
    }
    .into()
}

/// Extractor config that reports bad bodies as `{ "error": ... }`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(handle_json_payload_error)
}

async fn welcome() -> HttpResponse {
    HttpResponse::Ok().body("Welcome To Personal Manager")
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(welcome)).service(
        web::scope("/api")
            .configure(conversations::configure),
    );
}
