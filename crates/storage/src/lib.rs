use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use shared::{
    domain::{ClauseId, DocumentAnalysisResult, DocumentId},
    protocol::{AnalysisResultRecord, ClauseRecord},
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

/// SQLite-backed mapping from `documentId` to the serialized analysis result,
/// with a secondary index from `clauseId` to the owning document.
#[derive(Clone)]
pub struct ResultCache {
    pool: Pool<Sqlite>,
}

/// Raw cached payload. Decoding and validation happen in the caller so that a
/// corrupt row is reported the same way as a bad engine response.
#[derive(Debug, Clone)]
pub struct CachedResult {
    pub document_id: DocumentId,
    pub payload: String,
    pub stored_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CachedClause {
    pub clause_id: ClauseId,
    pub document_id: DocumentId,
    pub position: i64,
    pub payload: String,
}

impl ResultCache {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool_options = if is_memory_url(database_url) {
            // Every pooled connection to an in-memory database would see its
            // own empty schema, and closing the only one drops the data.
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open result cache at '{database_url}'"))?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to migrate result cache schema")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Writes (or replaces) a result and re-indexes its clauses.
    pub async fn store_result(&self, result: &DocumentAnalysisResult) -> Result<()> {
        let payload = serde_json::to_string(&AnalysisResultRecord::from(result))
            .context("failed to serialize analysis result")?;
        let mut tx = self.pool.begin().await?;

        for clause in &result.clauses {
            let owner: Option<String> =
                sqlx::query_scalar("SELECT document_id FROM analysis_clauses WHERE clause_id = ?")
                    .bind(clause.clause_id.as_str())
                    .fetch_optional(&mut *tx)
                    .await?;
            if let Some(owner) = owner {
                if owner != result.document_id.0 {
                    bail!(
                        "clause id {} already belongs to document {owner}",
                        clause.clause_id
                    );
                }
            }
        }

        sqlx::query(
            "INSERT INTO analysis_results (document_id, payload, stored_at) VALUES (?, ?, ?)
             ON CONFLICT(document_id) DO UPDATE SET payload = excluded.payload, stored_at = excluded.stored_at",
        )
        .bind(result.document_id.as_str())
        .bind(&payload)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .with_context(|| format!("failed to store result for {}", result.document_id))?;

        sqlx::query("DELETE FROM analysis_clauses WHERE document_id = ?")
            .bind(result.document_id.as_str())
            .execute(&mut *tx)
            .await?;

        for (position, clause) in result.clauses.iter().enumerate() {
            let clause_payload = serde_json::to_string(&ClauseRecord::from(clause))
                .context("failed to serialize clause")?;
            sqlx::query(
                "INSERT INTO analysis_clauses (clause_id, document_id, position, payload)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(clause.clause_id.as_str())
            .bind(result.document_id.as_str())
            .bind(position as i64)
            .bind(clause_payload)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to index clause {}", clause.clause_id))?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn load_result(&self, document_id: &DocumentId) -> Result<Option<CachedResult>> {
        let row = sqlx::query(
            "SELECT document_id, payload, stored_at FROM analysis_results WHERE document_id = ?",
        )
        .bind(document_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to load result for {document_id}"))?;

        row.map(|row| -> Result<CachedResult> {
            Ok(CachedResult {
                document_id: DocumentId(row.try_get("document_id")?),
                payload: row.try_get("payload")?,
                stored_at: row.try_get("stored_at")?,
            })
        })
        .transpose()
    }

    pub async fn load_clause(&self, clause_id: &ClauseId) -> Result<Option<CachedClause>> {
        let row = sqlx::query(
            "SELECT clause_id, document_id, position, payload FROM analysis_clauses WHERE clause_id = ?",
        )
        .bind(clause_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to load clause {clause_id}"))?;

        row.map(|row| -> Result<CachedClause> {
            Ok(CachedClause {
                clause_id: ClauseId(row.try_get("clause_id")?),
                document_id: DocumentId(row.try_get("document_id")?),
                position: row.try_get("position")?,
                payload: row.try_get("payload")?,
            })
        })
        .transpose()
    }

    pub async fn remove_result(&self, document_id: &DocumentId) -> Result<bool> {
        let removed = sqlx::query("DELETE FROM analysis_results WHERE document_id = ?")
            .bind(document_id.as_str())
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to remove result for {document_id}"))?;
        Ok(removed.rows_affected() > 0)
    }
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if is_memory_url(database_url) || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
