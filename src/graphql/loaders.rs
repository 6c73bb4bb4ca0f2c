//! GraphQL DataLoaders for batching database queries
//!
//! Resolving `allAuthors { bookCount }` naively costs one count query per
//! author. [`BookCountLoader`] collects every author id requested while a
//! single operation resolves and answers them with one grouped query.
//!
//! A fresh loader is attached to each request (see
//! [`with_request_context`](super::with_request_context)), so batches never
//! span requests. The async-graphql `DataLoader` deduplicates keys and, with
//! the default `NoCache`, memoizes nothing beyond the batch.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_graphql::dataloader::{DataLoader, Loader};
use async_trait::async_trait;

use crate::db::Database;

use super::helpers::count_to_int;

/// Backing store for grouped book counts
#[async_trait]
pub trait BookCountSource: Send + Sync {
    /// Book totals keyed by author id; authors without books may be absent
    async fn count_books_by_author(
        &self,
        author_ids: &[String],
    ) -> anyhow::Result<HashMap<String, i64>>;
}

#[async_trait]
impl BookCountSource for Database {
    async fn count_books_by_author(
        &self,
        author_ids: &[String],
    ) -> anyhow::Result<HashMap<String, i64>> {
        self.books().count_by_authors(author_ids).await
    }
}

pub struct BookCountLoader {
    source: Arc<dyn BookCountSource>,
}

impl BookCountLoader {
    pub fn new(source: Arc<dyn BookCountSource>) -> Self {
        Self { source }
    }
}

impl Loader<String> for BookCountLoader {
    type Value = i32;
    type Error = Arc<anyhow::Error>;

    async fn load(&self, keys: &[String]) -> Result<HashMap<String, Self::Value>, Self::Error> {
        let distinct: Vec<String> = keys
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if distinct.is_empty() {
            return Ok(HashMap::new());
        }

        tracing::debug!(authors = distinct.len(), "Batch loading book counts");

        let counts = self
            .source
            .count_books_by_author(&distinct)
            .await
            .map_err(Arc::new)?;

        Ok(distinct
            .into_iter()
            .map(|id| {
                let count = counts.get(&id).copied().unwrap_or(0);
                (id, count_to_int(count))
            })
            .collect())
    }
}

pub type BookCountDataLoader = DataLoader<BookCountLoader>;

/// Loader scoped to one request
pub fn book_count_loader(source: Arc<dyn BookCountSource>) -> BookCountDataLoader {
    DataLoader::new(BookCountLoader::new(source), tokio::spawn)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use crate::db::{CreateAuthor, CreateBook};

    use super::*;

    /// Wraps the database and records every grouped query issued
    struct CountingSource {
        db: Database,
        calls: AtomicUsize,
        last_keys: parking_lot::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl BookCountSource for CountingSource {
        async fn count_books_by_author(
            &self,
            author_ids: &[String],
        ) -> anyhow::Result<HashMap<String, i64>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_keys.lock() = author_ids.to_vec();
            self.db.count_books_by_author(author_ids).await
        }
    }

    async fn fixture() -> (Database, String, String) {
        let db = Database::in_memory().await.unwrap();
        let a = db
            .authors()
            .create(CreateAuthor {
                name: "Robert Martin".to_string(),
                born: Some(1952),
            })
            .await
            .unwrap();
        let b = db
            .authors()
            .create(CreateAuthor {
                name: "Sandi Metz".to_string(),
                born: None,
            })
            .await
            .unwrap();
        for title in ["Clean Code", "Agile software development"] {
            db.books()
                .create(CreateBook {
                    title: title.to_string(),
                    published: 2008,
                    author_id: a.id.clone(),
                    genres: vec!["agile".to_string()],
                })
                .await
                .unwrap();
        }
        (db, a.id, b.id)
    }

    #[tokio::test]
    async fn test_duplicate_keys_collapse_into_one_query() {
        let (db, a, b) = fixture().await;
        let source = Arc::new(CountingSource {
            db,
            calls: AtomicUsize::new(0),
            last_keys: parking_lot::Mutex::new(Vec::new()),
        });
        let loader = book_count_loader(source.clone());

        let counts = loader
            .load_many(vec![a.clone(), a.clone(), b.clone()])
            .await
            .unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.last_keys.lock().len(), 2);
        assert_eq!(counts.get(&a), Some(&2));
        assert_eq!(counts.get(&b), Some(&0));
    }

    #[tokio::test]
    async fn test_load_fills_missing_with_zero() {
        let (db, a, _) = fixture().await;
        let loader = BookCountLoader::new(Arc::new(db));

        let counts = loader
            .load(&[a.clone(), "unknown".to_string(), a.clone()])
            .await
            .unwrap();

        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&a], 2);
        assert_eq!(counts["unknown"], 0);
    }

    #[tokio::test]
    async fn test_empty_batch_skips_store() {
        let (db, _, _) = fixture().await;
        let source = Arc::new(CountingSource {
            db,
            calls: AtomicUsize::new(0),
            last_keys: parking_lot::Mutex::new(Vec::new()),
        });
        let loader = BookCountLoader::new(source.clone());

        assert!(loader.load(&[]).await.unwrap().is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }
}
