//! User registration and login
//!
//! Neither mutation requires an authenticated caller.

use super::prelude::*;

use crate::services::{AuthError, AuthService, RegisterInput};

#[derive(Default)]
pub struct AuthMutations;

#[Object]
impl AuthMutations {
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        favorite_genre: String,
        password: String,
    ) -> Result<Option<User>> {
        let auth = ctx.data_unchecked::<AuthService>();

        let input = RegisterInput {
            username: username.clone(),
            favorite_genre,
            password,
        };

        match auth.register(input).await {
            Ok(user) => Ok(Some(user.into())),
            Err(AuthError::Storage(e)) => {
                tracing::warn!(username = %username, error = %e, "User registration failed");
                Err(CatalogError::validation("Creating the user failed", &username, e).extend())
            }
            Err(e) => Err(CatalogError::from(e).extend()),
        }
    }

    /// Exchange credentials for a bearer token
    async fn login(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
    ) -> Result<Option<Token>> {
        let auth = ctx.data_unchecked::<AuthService>();

        let value = auth.login(&username, &password).await.map_err(|e| {
            tracing::debug!(username = %username, error = %e, "Login rejected");
            CatalogError::from(e).extend()
        })?;

        Ok(Some(Token { value }))
    }
}
