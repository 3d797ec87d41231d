use crate::config::DatabaseSettings;
use crate::models::{ConversationRecord, NewConversation};
use crate::services::store::{ConversationStore, StoreError};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;

/// PostgreSQL-backed conversation store
///
/// Records are kept in a single `conversations` table; the parsed answer set
/// is stored verbatim in a `JSON` column, which keeps the model's key order.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        tracing::info!(
            "Connecting to PostgreSQL (max: {:?}, min: {:?} connections)",
            settings.max_connections,
            settings.min_connections
        );

        Self::new(
            &settings.url,
            settings.max_connections.unwrap_or(10),
            settings.min_connections.unwrap_or(1),
            Duration::from_secs(settings.acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(settings.idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

fn record_from_row(row: &PgRow) -> Result<ConversationRecord, sqlx::Error> {
    Ok(ConversationRecord {
        id: row.try_get("id")?,
        kind: row.try_get("type")?,
        prompt: row.try_get("prompt")?,
        text: row.try_get("text")?,
        score: row.try_get("score")?,
        metadata: row.try_get("metadata")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl ConversationStore for PostgresClient {
    async fn insert(&self, conversation: NewConversation) -> Result<ConversationRecord, StoreError> {
        let record = conversation.into_record();

        let query = r#"
            INSERT INTO conversations (id, type, prompt, text, score, metadata, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6::json, $7, $8)
        "#;

        sqlx::query(query)
            .bind(record.id)
            .bind(&record.kind)
            .bind(&record.prompt)
            .bind(&record.text)
            .bind(record.score)
            .bind(&record.metadata)
            .bind(record.created_at)
            .bind(record.updated_at)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Stored conversation {} (score: {:?})", record.id, record.score);

        Ok(record)
    }

    async fn list_recent(&self) -> Result<Vec<ConversationRecord>, StoreError> {
        let query = r#"
            SELECT id, type, prompt, text, score, metadata, created_at, updated_at
            FROM conversations
            ORDER BY created_at DESC
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let records = rows
            .iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Loaded {} conversations", records.len());

        Ok(records)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
