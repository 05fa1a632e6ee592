use super::traits::{DefinitionStore, RecordStore, StoreFuture};
use crate::error::StoreError;
use crate::versioning::timestamp::{format_timestamp, parse_millis};
use crate::versioning::{NodeType, StoreSnapshot};
use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::path::Path;
use std::time::Duration;

/// SQLite-backed graph node store.
///
/// Snapshot reads run inside their own transaction, committed on success and
/// rolled back when dropped on any error path. Writers update
/// `last_updated_on` and `version_key` in a single statement.
#[derive(Debug, Clone)]
pub struct SqliteGraphStore {
    pool: SqlitePool,
}

impl SqliteGraphStore {
    /// Open (or create) the database at `db_path`.
    pub async fn open(db_path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .context("create graph store directory")?;
        }

        let url = format!("sqlite:{}?mode=rwc", db_path.display());
        let pool = SqlitePool::connect(&url)
            .await
            .context("open SQLite graph store")?;
        init_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// Open a private in-memory database.
    pub async fn in_memory() -> anyhow::Result<Self> {
        // One pinned connection: every pooled connection would otherwise get
        // its own empty in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect("sqlite::memory:")
            .await
            .context("open in-memory SQLite")?;
        init_schema(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn upsert_node(
        &self,
        id: &str,
        object_type: &str,
        node_type: &NodeType,
        snapshot: &StoreSnapshot,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO graph_nodes (identifier, object_type, node_type, last_updated_on, version_key)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(identifier) DO UPDATE SET
                object_type = excluded.object_type,
                node_type = excluded.node_type,
                last_updated_on = excluded.last_updated_on,
                version_key = excluded.version_key",
        )
        .bind(id)
        .bind(object_type)
        .bind(node_type.as_tag())
        .bind(snapshot.last_updated_on.as_deref())
        .bind(snapshot.version_key.as_deref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Record a successful write at `at`: stamps `last_updated_on` and the
    /// matching millisecond version key together. Returns the new key.
    pub async fn stamp_update(&self, id: &str, at: DateTime<Utc>) -> Result<String, StoreError> {
        let last_updated_on = format_timestamp(at);
        let version_key = parse_millis(&last_updated_on)
            .map_err(|err| StoreError::Backend(err.to_string()))?
            .to_string();

        let result = sqlx::query(
            "UPDATE graph_nodes SET last_updated_on = ?1, version_key = ?2 WHERE identifier = ?3",
        )
        .bind(&last_updated_on)
        .bind(&version_key)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        Ok(version_key)
    }

    pub async fn set_config_value(
        &self,
        object_type: &str,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO definition_config (object_type, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(object_type, key) DO UPDATE SET value = excluded.value",
        )
        .bind(object_type)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn read_snapshot(&self, id: &str) -> Result<Option<StoreSnapshot>, StoreError> {
        let mut tx = self.pool.begin().await?;
        tracing::trace!(node_id = id, "snapshot read transaction started");

        let row: Option<(Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT last_updated_on, version_key FROM graph_nodes WHERE identifier = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::trace!(node_id = id, found = row.is_some(), "snapshot read committed");

        Ok(row.map(|(last_updated_on, version_key)| StoreSnapshot {
            last_updated_on,
            version_key,
        }))
    }

    async fn read_config_value(
        &self,
        object_type: &str,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        let row: Option<(Option<String>,)> = sqlx::query_as(
            "SELECT value FROM definition_config WHERE object_type = ?1 AND key = ?2",
        )
        .bind(object_type)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.and_then(|(value,)| value))
    }
}

async fn init_schema(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::raw_sql(
        "CREATE TABLE IF NOT EXISTS graph_nodes (
            identifier      TEXT PRIMARY KEY,
            object_type     TEXT NOT NULL,
            node_type       TEXT NOT NULL,
            last_updated_on TEXT,
            version_key     TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_graph_nodes_object_type ON graph_nodes(object_type);

        CREATE TABLE IF NOT EXISTS definition_config (
            object_type TEXT NOT NULL,
            key         TEXT NOT NULL,
            value       TEXT,
            PRIMARY KEY (object_type, key)
        );",
    )
    .execute(pool)
    .await
    .context("initialize graph store schema")?;
    Ok(())
}

impl RecordStore for SqliteGraphStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn fetch_snapshot<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<StoreSnapshot>> {
        Box::pin(async move { self.read_snapshot(id).await })
    }
}

impl DefinitionStore for SqliteGraphStore {
    fn config_value<'a>(
        &'a self,
        object_type: &'a str,
        key: &'a str,
    ) -> StoreFuture<'a, Option<String>> {
        Box::pin(async move { self.read_config_value(object_type, key).await })
    }
}
