//! Authors repository

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::sqlite_helpers::{new_id, now_iso8601, placeholders};

/// Author record from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuthorRecord {
    pub id: String,
    pub name: String,
    pub born: Option<i32>,
    pub created_at: String,
}

/// Input for creating an author
#[derive(Debug, Clone)]
pub struct CreateAuthor {
    pub name: String,
    pub born: Option<i32>,
}

pub struct AuthorRepository {
    pool: SqlitePool,
}

impl AuthorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Number of authors
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// All authors in insertion order
    pub async fn list(&self) -> Result<Vec<AuthorRecord>> {
        let records = sqlx::query_as::<_, AuthorRecord>(
            "SELECT id, name, born, created_at FROM authors ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Get an author by exact name
    pub async fn get_by_name(&self, name: &str) -> Result<Option<AuthorRecord>> {
        let record = sqlx::query_as::<_, AuthorRecord>(
            "SELECT id, name, born, created_at FROM authors WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Fetch every author whose id is in `ids` (missing ids are skipped)
    pub async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<AuthorRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id, name, born, created_at FROM authors WHERE id IN ({})",
            placeholders(ids.len())
        );

        let mut query = sqlx::query_as::<_, AuthorRecord>(&sql);
        for id in ids {
            query = query.bind(id);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Create a new author
    pub async fn create(&self, input: CreateAuthor) -> Result<AuthorRecord> {
        let record = sqlx::query_as::<_, AuthorRecord>(
            r#"
            INSERT INTO authors (id, name, born, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, born, created_at
            "#,
        )
        .bind(new_id())
        .bind(&input.name)
        .bind(input.born)
        .bind(now_iso8601())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Look an author up by name, creating it with no birth year if absent.
    ///
    /// Returns the record and whether this call created it. Concurrent calls
    /// for the same name converge on a single row.
    pub async fn find_or_create(&self, name: &str) -> Result<(AuthorRecord, bool)> {
        if let Some(existing) = self.get_by_name(name).await? {
            return Ok((existing, false));
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO authors (id, name, born, created_at)
            VALUES (?, ?, NULL, ?)
            ON CONFLICT(name) DO NOTHING
            "#,
        )
        .bind(new_id())
        .bind(name)
        .bind(now_iso8601())
        .execute(&self.pool)
        .await?
        .rows_affected();

        let record = self
            .get_by_name(name)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Author '{}' missing after insert", name))?;

        Ok((record, inserted == 1))
    }

    /// Set (or clear) the birth year of the author with this name.
    ///
    /// Returns the updated record, or `None` when no author has the name.
    pub async fn set_born(&self, name: &str, born: Option<i32>) -> Result<Option<AuthorRecord>> {
        let record = sqlx::query_as::<_, AuthorRecord>(
            r#"
            UPDATE authors SET born = ?
            WHERE name = ?
            RETURNING id, name, born, created_at
            "#,
        )
        .bind(born)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}
