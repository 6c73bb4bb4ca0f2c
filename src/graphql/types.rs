//! GraphQL object types
//!
//! Wire types are built from repository records; they never carry storage
//! details such as password hashes or timestamps.

use async_graphql::{ComplexObject, Context, ErrorExtensions, ID, Result, SimpleObject};

use crate::db::{AuthorRecord, BookRecord, Database, UserRecord};

use super::errors::{CatalogError, internal};
use super::helpers::count_to_int;
use super::loaders::BookCountDataLoader;

#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
#[graphql(complex)]
pub struct Author {
    pub name: String,
    pub id: ID,
    pub born: Option<i32>,
}

#[ComplexObject]
impl Author {
    /// Number of books by this author, batched per request
    async fn book_count(&self, ctx: &Context<'_>) -> Result<i32> {
        let author_id = self.id.0.clone();

        if let Some(loader) = ctx.data_opt::<BookCountDataLoader>() {
            let count = loader
                .load_one(author_id)
                .await
                .map_err(|e| CatalogError::Internal(e.to_string()).extend())?;
            return Ok(count.unwrap_or(0));
        }

        // No per-request loader attached: count directly
        let counts = ctx
            .data_unchecked::<Database>()
            .books()
            .count_by_authors(std::slice::from_ref(&author_id))
            .await
            .map_err(internal)?;
        Ok(count_to_int(counts.get(&author_id).copied().unwrap_or(0)))
    }
}

impl From<AuthorRecord> for Author {
    fn from(r: AuthorRecord) -> Self {
        Self {
            name: r.name,
            id: ID(r.id),
            born: r.born,
        }
    }
}

/// A book with its author populated
#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
pub struct Book {
    pub title: String,
    pub published: i32,
    pub author: Author,
    pub id: ID,
    pub genres: Vec<String>,
}

impl Book {
    pub fn from_records(book: BookRecord, author: AuthorRecord) -> Self {
        Self {
            title: book.title,
            published: book.published,
            author: author.into(),
            id: ID(book.id),
            genres: book.genres,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
pub struct User {
    pub username: String,
    pub favorite_genre: String,
    pub id: ID,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self {
            username: r.username,
            favorite_genre: r.favorite_genre,
            id: ID(r.id),
        }
    }
}

/// Signed bearer credential returned by `login`
#[derive(Debug, Clone, SimpleObject)]
pub struct Token {
    pub value: String,
}
