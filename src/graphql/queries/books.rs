use super::prelude::*;

#[derive(Default)]
pub struct BookQueries;

#[Object]
impl BookQueries {
    /// Total number of books
    async fn book_count(&self, ctx: &Context<'_>) -> Result<i32> {
        let db = ctx.data_unchecked::<Database>();
        let count = db.books().count().await.map_err(internal)?;
        Ok(count_to_int(count))
    }

    /// Books, optionally restricted to one author and/or one genre.
    ///
    /// An unknown author name yields an empty list.
    async fn all_books(
        &self,
        ctx: &Context<'_>,
        author: Option<String>,
        genre: Option<String>,
    ) -> Result<Vec<Book>> {
        tracing::debug!(author = ?author, genre = ?genre, "allBooks");
        let db = ctx.data_unchecked::<Database>();

        let mut filter = BookFilter {
            genre,
            ..Default::default()
        };

        if let Some(name) = author {
            match db.authors().get_by_name(&name).await.map_err(internal)? {
                Some(record) => filter.author_id = Some(record.id),
                None => return Ok(Vec::new()),
            }
        }

        let books = db.books().list(&filter).await.map_err(internal)?;
        populate_books(db, books).await.map_err(internal)
    }

    /// Every distinct genre in the catalog
    async fn all_genres(&self, ctx: &Context<'_>) -> Result<Vec<String>> {
        let db = ctx.data_unchecked::<Database>();
        db.books().genres().await.map_err(internal)
    }
}
