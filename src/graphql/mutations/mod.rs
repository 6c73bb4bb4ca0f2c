pub mod auth;
pub mod authors;
pub mod books;

pub use auth::AuthMutations;
pub use authors::AuthorMutations;
pub use books::BookMutations;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, ErrorExtensions, Object, Result};

    pub(crate) use crate::db::{CreateBook, Database};
    pub(crate) use crate::graphql::BookEventBus;
    pub(crate) use crate::graphql::auth::AuthGuard;
    pub(crate) use crate::graphql::errors::CatalogError;
    pub(crate) use crate::graphql::types::*;
}
