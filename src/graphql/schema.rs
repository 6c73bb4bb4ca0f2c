//! GraphQL schema definition with queries, mutations, and subscriptions

use std::sync::Arc;

use async_graphql::{MergedObject, Request, Schema};

use crate::db::Database;
use crate::services::AuthService;

use super::BookEventBus;
use super::auth::CurrentUser;
use super::loaders::book_count_loader;
use super::mutations::{AuthMutations, AuthorMutations, BookMutations};
use super::queries::{AuthorQueries, BookQueries, UserQueries};
use super::subscriptions::SubscriptionRoot;

#[derive(MergedObject, Default)]
pub struct QueryRoot(BookQueries, AuthorQueries, UserQueries);

#[derive(MergedObject, Default)]
pub struct MutationRoot(BookMutations, AuthorMutations, AuthMutations);

/// The GraphQL schema type
pub type CatalogSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

/// Build the GraphQL schema with its shared collaborators
pub fn build_schema(db: Database, auth: AuthService, events: BookEventBus) -> CatalogSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), SubscriptionRoot)
        .data(db)
        .data(auth)
        .data(events)
        .finish()
}

/// Attach per-request data: a fresh book-count loader and the caller, if any.
pub fn with_request_context(
    request: Request,
    db: &Database,
    current_user: Option<CurrentUser>,
) -> Request {
    let request = request.data(book_count_loader(Arc::new(db.clone())));
    match current_user {
        Some(user) => request.data(user),
        None => request,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::AuthConfig;

    #[tokio::test]
    async fn test_sdl_nullability() {
        let db = Database::in_memory().await.unwrap();
        let auth = AuthService::new(db.clone(), AuthConfig::new("s"));
        let sdl = build_schema(db, auth, BookEventBus::default()).sdl();

        assert!(sdl.contains("born: Int\n"));
        assert!(sdl.contains("bookCount: Int!"));
        assert!(sdl.contains("genres: [String!]!"));
        assert!(sdl.contains("allBooks(author: String, genre: String): [Book!]!"));
        assert!(sdl.contains("me: User\n"));
        assert!(sdl.contains("favoriteGenre: String!"));
        assert!(sdl.contains("bookAdded: Book!"));
    }
}
