//! GraphQL authentication and authorization
//!
//! The HTTP and WebSocket handlers resolve the caller with [`authenticate`]
//! before execution and attach a [`CurrentUser`] to the request data.
//!
//! ## Guards
//!
//! Use `AuthGuard` to require a logged-in caller on any operation:
//!
//! ```ignore
//! #[graphql(guard = "AuthGuard")]
//! async fn add_book(&self, ctx: &Context<'_>, ...) -> Result<Option<Book>> { ... }
//! ```

use async_graphql::{Context, ErrorExtensions, Result};

use crate::db::UserRecord;
use crate::services::AuthService;

use super::errors::CatalogError;

/// The user a verified bearer token belongs to
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRecord);

/// Token from an `Authorization: Bearer <token>` header value.
///
/// Any other scheme is treated as no credentials at all.
pub fn bearer_token(header: &str) -> Option<&str> {
    header.strip_prefix("Bearer ")
}

/// Resolve the caller from an optional `Authorization` header value.
///
/// - no header, or not a bearer header: `Ok(None)`
/// - bad signature or malformed token: `Err(CatalogError::InvalidToken)`
/// - valid token for a user that no longer exists: `Ok(None)`
pub async fn authenticate(
    auth: &AuthService,
    authorization: Option<&str>,
) -> std::result::Result<Option<CurrentUser>, CatalogError> {
    let Some(token) = authorization.and_then(bearer_token) else {
        return Ok(None);
    };

    match auth.current_user(token).await {
        Ok(Some(user)) => {
            tracing::debug!(user_id = %user.id, "Authenticated request");
            Ok(Some(CurrentUser(user)))
        }
        Ok(None) => {
            tracing::debug!("Token valid but user no longer exists");
            Ok(None)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Token verification failed");
            Err(e.into())
        }
    }
}

/// Extension trait to get the current user from GraphQL context
pub trait AuthExt {
    /// The current user, or a not-authenticated error
    fn current_user(&self) -> Result<&UserRecord>;

    /// The current user if the request is authenticated
    fn try_current_user(&self) -> Option<&UserRecord>;
}

impl<'a> AuthExt for Context<'a> {
    fn current_user(&self) -> Result<&UserRecord> {
        self.try_current_user()
            .ok_or_else(|| CatalogError::NotAuthenticated.extend())
    }

    fn try_current_user(&self) -> Option<&UserRecord> {
        self.data_opt::<CurrentUser>().map(|u| &u.0)
    }
}

/// Guard that requires authentication.
///
/// Runs before the resolver body, so a rejected call has no side effects.
pub struct AuthGuard;

impl async_graphql::Guard for AuthGuard {
    fn check(&self, ctx: &Context<'_>) -> impl std::future::Future<Output = Result<()>> + Send {
        let result = ctx.current_user().map(|_| ());
        async move { result }
    }
}
