//! Authentication service for user registration, login and token handling
//!
//! Provides:
//! - User registration with bcrypt password hashing
//! - Login against the stored per-user hash
//! - Signing and verifying bearer tokens (HS256 JWT, no expiry)

use std::collections::HashSet;

use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{CreateUser, Database, UserRecord};

// ============================================================================
// JWT Claims
// ============================================================================

/// Claims embedded in a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub username: String,
    /// User ID
    pub id: String,
    /// Issued at timestamp
    pub iat: i64,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("wrong credentials")]
    WrongCredentials,

    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

// ============================================================================
// Configuration
// ============================================================================

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Bcrypt cost factor
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            bcrypt_cost: DEFAULT_COST,
        }
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }
}

/// Registration input
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub favorite_genre: String,
    pub password: String,
}

// ============================================================================
// Auth Service
// ============================================================================

#[derive(Clone)]
pub struct AuthService {
    db: Database,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(db: Database, config: AuthConfig) -> Self {
        Self { db, config }
    }

    /// Register a new user. Store rejections (duplicate or too-short
    /// username) surface as [`AuthError::Storage`].
    pub async fn register(&self, input: RegisterInput) -> Result<UserRecord, AuthError> {
        let password_hash = hash(&input.password, self.config.bcrypt_cost)?;

        let user = self
            .db
            .users()
            .create(CreateUser {
                username: input.username,
                favorite_genre: input.favorite_genre,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable to the caller.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let user = self
            .db
            .users()
            .get_by_username(username)
            .await?
            .ok_or(AuthError::WrongCredentials)?;

        if !verify(password, &user.password_hash)? {
            tracing::debug!(username = %username, "Password mismatch");
            return Err(AuthError::WrongCredentials);
        }

        self.issue_token(&user)
    }

    /// Sign a token embedding the user's name and id
    pub fn issue_token(&self, user: &UserRecord) -> Result<String, AuthError> {
        let claims = TokenClaims {
            username: user.username.clone(),
            id: user.id.clone(),
            iat: Utc::now().timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verify a token's signature and return its claims
    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::new();

        let token_data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )?;

        Ok(token_data.claims)
    }

    /// Resolve the user a token was issued to.
    ///
    /// `Ok(None)` when the signature is valid but the user no longer exists.
    pub async fn current_user(&self, token: &str) -> Result<Option<UserRecord>, AuthError> {
        let claims = self.verify_token(token)?;
        Ok(self.db.users().get_by_id(&claims.id).await?)
    }
}
