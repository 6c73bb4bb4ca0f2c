//! Books repository

use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use super::sqlite_helpers::{
    json_array_contains_sql, json_to_vec, new_id, now_iso8601, placeholders, vec_to_json,
};

/// Book record from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub published: i32,
    pub author_id: String,
    pub genres: Vec<String>,
    pub created_at: String,
}

impl FromRow<'_, SqliteRow> for BookRecord {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let genres: String = row.try_get("genres")?;
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            published: row.try_get("published")?,
            author_id: row.try_get("author_id")?,
            genres: json_to_vec(&genres),
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Input for creating a book
#[derive(Debug, Clone)]
pub struct CreateBook {
    pub title: String,
    pub published: i32,
    pub author_id: String,
    pub genres: Vec<String>,
}

/// Conditions for listing books; set fields are ANDed
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    pub author_id: Option<String>,
    pub genre: Option<String>,
}

const BOOK_COLUMNS: &str = "id, title, published, author_id, genres, created_at";

pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Number of books
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Books matching the filter, in insertion order
    pub async fn list(&self, filter: &BookFilter) -> Result<Vec<BookRecord>> {
        let mut conditions = Vec::new();
        if filter.author_id.is_some() {
            conditions.push("author_id = ?".to_string());
        }
        if filter.genre.is_some() {
            conditions.push(json_array_contains_sql("books.genres"));
        }

        let mut sql = format!("SELECT {} FROM books", BOOK_COLUMNS);
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY rowid");

        let mut query = sqlx::query_as::<_, BookRecord>(&sql);
        if let Some(author_id) = &filter.author_id {
            query = query.bind(author_id);
        }
        if let Some(genre) = &filter.genre {
            query = query.bind(genre);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Create a new book
    pub async fn create(&self, input: CreateBook) -> Result<BookRecord> {
        let sql = format!(
            r#"
            INSERT INTO books (id, title, published, author_id, genres, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );

        let record = sqlx::query_as::<_, BookRecord>(&sql)
            .bind(new_id())
            .bind(&input.title)
            .bind(input.published)
            .bind(&input.author_id)
            .bind(vec_to_json(&input.genres))
            .bind(now_iso8601())
            .fetch_one(&self.pool)
            .await?;

        Ok(record)
    }

    /// Book counts for the given authors in one grouped query.
    ///
    /// Authors without books are absent from the map.
    pub async fn count_by_authors(&self, author_ids: &[String]) -> Result<HashMap<String, i64>> {
        if author_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT author_id, COUNT(*) FROM books WHERE author_id IN ({}) GROUP BY author_id",
            placeholders(author_ids.len())
        );

        let mut query = sqlx::query_as::<_, (String, i64)>(&sql);
        for id in author_ids {
            query = query.bind(id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().collect())
    }

    /// Distinct genres across all books, sorted
    pub async fn genres(&self) -> Result<Vec<String>> {
        let genres: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT value FROM books, json_each(books.genres) ORDER BY value",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(genres)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::db::{CreateAuthor, Database};

    use super::*;

    async fn author(db: &Database, name: &str) -> String {
        db.authors()
            .create(CreateAuthor {
                name: name.to_string(),
                born: None,
            })
            .await
            .unwrap()
            .id
    }

    async fn book(db: &Database, title: &str, author_id: &str, genres: &[&str]) -> BookRecord {
        db.books()
            .create(CreateBook {
                title: title.to_string(),
                published: 2000,
                author_id: author_id.to_string(),
                genres: genres.iter().map(|g| g.to_string()).collect(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_filters_are_anded() {
        let db = Database::in_memory().await.unwrap();
        let martin = author(&db, "Robert Martin").await;
        let fowler = author(&db, "Martin Fowler").await;

        book(&db, "Clean Code", &martin, &["refactoring"]).await;
        let agile = book(&db, "Agile software development", &martin, &["agile", "patterns"]).await;
        book(&db, "Refactoring, edition 2", &fowler, &["refactoring"]).await;

        let all = db.books().list(&BookFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let by_genre = db
            .books()
            .list(&BookFilter {
                genre: Some("refactoring".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let titles: Vec<_> = by_genre.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Clean Code", "Refactoring, edition 2"]);

        let both = db
            .books()
            .list(&BookFilter {
                author_id: Some(martin.clone()),
                genre: Some("agile".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(both, vec![agile]);
    }

    #[tokio::test]
    async fn test_genre_filter_is_exact_match() {
        let db = Database::in_memory().await.unwrap();
        let a = author(&db, "Sandi Metz").await;
        book(&db, "Practical Object-Oriented Design", &a, &["design"]).await;

        let found = db
            .books()
            .list(&BookFilter {
                genre: Some("des".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_author() {
        let db = Database::in_memory().await.unwrap();
        let result = db
            .books()
            .create(CreateBook {
                title: "Orphaned book".to_string(),
                published: 1999,
                author_id: "no-such-author".to_string(),
                genres: vec![],
            })
            .await;
        assert!(result.is_err());
        assert_eq!(db.books().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_count_by_authors_groups() {
        let db = Database::in_memory().await.unwrap();
        let a = author(&db, "Fyodor Dostoevsky").await;
        let b = author(&db, "Joshua Kerievsky").await;
        let c = author(&db, "Sandi Metz").await;

        book(&db, "Crime and punishment", &a, &["classic", "crime"]).await;
        book(&db, "Demons", &a, &["classic", "revolution"]).await;
        book(&db, "Refactoring to patterns", &b, &["refactoring", "patterns"]).await;

        let counts = db
            .books()
            .count_by_authors(&[a.clone(), b.clone(), c.clone()])
            .await
            .unwrap();
        assert_eq!(counts.get(&a), Some(&2));
        assert_eq!(counts.get(&b), Some(&1));
        assert_eq!(counts.get(&c), None);
    }

    #[tokio::test]
    async fn test_genres_are_distinct() {
        let db = Database::in_memory().await.unwrap();
        let a = author(&db, "Fyodor Dostoevsky").await;
        book(&db, "Crime and punishment", &a, &["classic", "crime"]).await;
        book(&db, "Demons", &a, &["classic", "revolution"]).await;

        assert_eq!(
            db.books().genres().await.unwrap(),
            vec!["classic", "crime", "revolution"]
        );
    }

    #[tokio::test]
    async fn test_genres_keep_insertion_order_on_read() {
        let db = Database::in_memory().await.unwrap();
        let a = author(&db, "Robert Martin").await;
        let created = book(
            &db,
            "Agile software development",
            &a,
            &["agile", "patterns", "design"],
        )
        .await;

        let read = db.books().list(&BookFilter::default()).await.unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].id, created.id);
        assert_eq!(read[0].genres, vec!["agile", "patterns", "design"]);
    }
}
