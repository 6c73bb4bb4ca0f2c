// Helper functions shared across GraphQL query/mutation modules.

use std::collections::HashMap;

use anyhow::anyhow;

use crate::db::{BookRecord, Database};
use crate::graphql::types::Book;

/// Clamp a store count into GraphQL's 32-bit `Int`.
pub(crate) fn count_to_int(count: i64) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

/// Attach full author records to a list of books with one author lookup.
pub(crate) async fn populate_books(
    db: &Database,
    books: Vec<BookRecord>,
) -> anyhow::Result<Vec<Book>> {
    let mut author_ids: Vec<String> = books.iter().map(|b| b.author_id.clone()).collect();
    author_ids.sort();
    author_ids.dedup();

    let authors: HashMap<String, _> = db
        .authors()
        .get_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|a| (a.id.clone(), a))
        .collect();

    books
        .into_iter()
        .map(|book| {
            let author = authors.get(&book.author_id).cloned().ok_or_else(|| {
                anyhow!(
                    "Book '{}' references missing author {}",
                    book.id,
                    book.author_id
                )
            })?;
            Ok(Book::from_records(book, author))
        })
        .collect()
}
