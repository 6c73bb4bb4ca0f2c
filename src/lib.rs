//! Library catalog backend
//!
//! A GraphQL API over books and authors with token authentication and a
//! `bookAdded` subscription feed. All operations are exposed at `/graphql`.

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod graphql;
pub mod services;

pub use app::{AppState, build_app};
