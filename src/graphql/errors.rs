//! Error taxonomy surfaced to GraphQL clients
//!
//! Every variant becomes a GraphQL error with an `extensions.code`. Client
//! mistakes share the `BAD_USER_INPUT` code and are told apart by
//! `extensions.reason`.

use async_graphql::ErrorExtensions;
use thiserror::Error;

use crate::services::AuthError;

pub const BAD_USER_INPUT: &str = "BAD_USER_INPUT";
pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Operation requires a logged-in caller
    #[error("not authenticated")]
    NotAuthenticated,

    /// The store rejected the input
    #[error("{message}")]
    Validation {
        message: String,
        invalid_args: String,
        error: String,
    },

    #[error("{entity} not found")]
    NotFound {
        entity: &'static str,
        invalid_args: String,
    },

    #[error("wrong credentials")]
    WrongCredentials,

    /// Bearer token failed verification
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    pub fn validation(
        message: impl Into<String>,
        invalid_args: impl Into<String>,
        error: impl std::fmt::Display,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            invalid_args: invalid_args.into(),
            error: error.to_string(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidToken(_) => UNAUTHENTICATED,
            Self::Internal(_) => INTERNAL_SERVER_ERROR,
            _ => BAD_USER_INPUT,
        }
    }

    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Self::NotAuthenticated => Some("NOT_AUTHENTICATED"),
            Self::Validation { .. } => Some("VALIDATION"),
            Self::NotFound { .. } => Some("NOT_FOUND"),
            Self::WrongCredentials => Some("WRONG_CREDENTIALS"),
            Self::InvalidToken(_) => Some("INVALID_TOKEN"),
            Self::Internal(_) => None,
        }
    }
}

impl ErrorExtensions for CatalogError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.code());
            if let Some(reason) = self.reason() {
                e.set("reason", reason);
            }
            match self {
                Self::Validation {
                    invalid_args,
                    error,
                    ..
                } => {
                    e.set("invalidArgs", invalid_args.as_str());
                    e.set("error", error.as_str());
                }
                Self::NotFound { invalid_args, .. } => {
                    e.set("invalidArgs", invalid_args.as_str());
                }
                _ => {}
            }
        })
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(e: anyhow::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<AuthError> for CatalogError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::WrongCredentials => Self::WrongCredentials,
            AuthError::InvalidToken(e) => Self::InvalidToken(e.to_string()),
            AuthError::Hashing(e) => Self::Internal(e.to_string()),
            AuthError::Storage(e) => Self::Internal(e.to_string()),
        }
    }
}

/// Map a store failure on a read path to an internal GraphQL error
pub(crate) fn internal(e: anyhow::Error) -> async_graphql::Error {
    tracing::error!(error = %e, "Store operation failed");
    CatalogError::from(e).extend()
}
