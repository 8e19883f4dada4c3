use pebble_core::{PebbleError, Result, SessionMap, SessionStore};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, sqlite::SqlitePool};
use tracing::debug;

fn storage_error(what: &str, e: impl std::fmt::Display) -> PebbleError {
    PebbleError::StorageUnavailable(format!("{}: {}", what, e))
}

/// SQLite-backed session store.
///
/// One row per session id; the whole mapping, marker table included, is
/// stored as a JSON document.
pub struct DatabaseSessionStore {
    pool: SqlitePool,
}

impl DatabaseSessionStore {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .map_err(|e| storage_error("database connection failed", e))?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                session_id TEXT PRIMARY KEY,
                state TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("migration failed", e))?;

        Ok(())
    }
}

#[async_trait]
impl SessionStore for DatabaseSessionStore {
    async fn load(&self, id: &str) -> Result<Option<SessionMap>> {
        let row = sqlx::query("SELECT state FROM sessions WHERE session_id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("query failed", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let state: SessionMap = serde_json::from_str(row.get("state"))
            .map_err(|e| storage_error("deserialize failed", e))?;
        Ok(Some(state))
    }

    async fn persist(&self, id: &str, data: &SessionMap) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let state_json =
            serde_json::to_string(data).map_err(|e| storage_error("serialize failed", e))?;

        sqlx::query(
            r#"
            INSERT INTO sessions (session_id, state, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(session_id) DO UPDATE SET
                state = excluded.state,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(id)
        .bind(&state_json)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("upsert failed", e))?;

        debug!(session.id = id, keys = data.len(), "persisted to database");
        Ok(())
    }

    /// The database has no notion of a current request, so this is always
    /// `None`; hosts pass the id to `open_with_id`.
    fn current_id(&self) -> Option<String> {
        None
    }

    async fn destroy(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE session_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("delete failed", e))?;

        Ok(())
    }
}
