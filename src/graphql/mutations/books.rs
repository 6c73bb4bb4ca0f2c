use super::prelude::*;

#[derive(Default)]
pub struct BookMutations;

#[Object]
impl BookMutations {
    /// Add a book, creating its author on first mention.
    ///
    /// The author and the book are separate writes with no transaction. An
    /// author created here stays in the catalog even when the book insert is
    /// rejected afterwards.
    ///
    /// Publishes the stored book to `bookAdded` subscribers.
    #[graphql(guard = "AuthGuard")]
    async fn add_book(
        &self,
        ctx: &Context<'_>,
        title: String,
        author: String,
        published: i32,
        genres: Vec<String>,
    ) -> Result<Option<Book>> {
        let db = ctx.data_unchecked::<Database>();
        let events = ctx.data_unchecked::<BookEventBus>();

        let (author_record, created) = db
            .authors()
            .find_or_create(&author)
            .await
            .map_err(|e| CatalogError::validation("Saving author failed", &author, e).extend())?;

        if created {
            tracing::info!(author_id = %author_record.id, name = %author_record.name, "Created author");
        }

        let book = db
            .books()
            .create(CreateBook {
                title: title.clone(),
                published,
                author_id: author_record.id.clone(),
                genres,
            })
            .await
            .map_err(|e| CatalogError::validation("Saving book failed", &title, e).extend())?;

        let book = Book::from_records(book, author_record);
        let delivered = events.publish(book.clone());
        tracing::info!(book_id = %book.id.0, title = %book.title, subscribers = delivered, "Book added");

        Ok(Some(book))
    }
}
