//! GraphQL API with subscriptions for real-time updates
//!
//! Queries and mutations are split per entity under `queries/` and
//! `mutations/` and merged into the roots in `schema.rs`.

pub mod auth;
pub mod errors;
pub mod helpers;
pub mod loaders;
pub mod mutations;
pub mod queries;
mod schema;
mod subscriptions;
pub mod types;

use crate::services::EventBus;

pub use auth::{AuthExt, AuthGuard, CurrentUser, authenticate, bearer_token};
pub use errors::CatalogError;
pub use loaders::{BookCountDataLoader, BookCountLoader, BookCountSource, book_count_loader};
pub use schema::{CatalogSchema, MutationRoot, QueryRoot, build_schema, with_request_context};
pub use subscriptions::SubscriptionRoot;
pub use types::{Author, Book, Token, User};

/// Broadcast channel carrying `BOOK_ADDED` events
pub type BookEventBus = EventBus<Book>;
