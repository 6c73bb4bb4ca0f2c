//! HTTP routes
//!
//! All catalog operations go through GraphQL; the only other endpoints are
//! the health probes.

pub mod graphql;
pub mod health;
