//! Domain services shared by the GraphQL layer and the HTTP surface

pub mod auth;
pub mod events;

pub use auth::{AuthConfig, AuthError, AuthService, RegisterInput, TokenClaims};
pub use events::EventBus;
