use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use personal_manager::config::{CorsSettings, LoggingSettings, Settings};
use personal_manager::core::{ResponseEvaluator, Summarizer};
use personal_manager::routes::{self, AppState};
use personal_manager::services::{GeminiClient, PostgresClient};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.json().init(),
    }
}

fn build_cors(settings: &CorsSettings) -> Cors {
    if settings.allowed_origins.is_empty() {
        return Cors::permissive();
    }

    settings
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, err);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        // Logging is not configured yet
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings.logging);

    info!("Starting Personal Manager service...");

    if settings.gemini.api_key.is_empty() {
        error!("GEMINI_API_KEY is not set; analysis and summary calls will be rejected upstream");
    }

    let timeout = settings.gemini.timeout();

    let analysis_llm = GeminiClient::analysis(&settings.gemini)
        .map_err(|e| startup_error("Failed to create analysis client", e))?;
    let summary_llm = GeminiClient::summary(&settings.gemini)
        .map_err(|e| startup_error("Failed to create summary client", e))?;

    info!(
        "Gemini clients initialized (analysis: {}, summary: {}, timeout: {:?})",
        analysis_llm.model(),
        summary_llm.model(),
        timeout
    );

    let store = PostgresClient::from_settings(&settings.database)
        .await
        .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?;

    info!("PostgreSQL client initialized");

    let app_state = AppState {
        evaluator: ResponseEvaluator::new(Arc::new(analysis_llm), timeout),
        summarizer: Summarizer::new(Arc::new(summary_llm), timeout),
        store: Arc::new(store),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let cors_settings = settings.cors.clone();

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
            .wrap(build_cors(&cors_settings))
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
