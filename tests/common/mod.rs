//! Shared fixtures for the integration tests
#![allow(dead_code)]

use std::sync::Arc;

use async_graphql::{Request, Response, Value, Variables};
use library_catalog::config::Config;
use library_catalog::db::{Database, UserRecord, seed_sample_catalog};
use library_catalog::graphql::{
    BookEventBus, CatalogSchema, CurrentUser, build_schema, with_request_context,
};
use library_catalog::services::{AuthConfig, AuthService, RegisterInput};
use library_catalog::{AppState, build_app};

pub const JWT_SECRET: &str = "integration-secret";

pub struct TestCatalog {
    pub db: Database,
    pub auth: AuthService,
    pub events: BookEventBus,
    pub schema: CatalogSchema,
}

impl TestCatalog {
    /// Empty catalog
    pub async fn new() -> Self {
        let db = Database::in_memory().await.unwrap();
        let auth = AuthService::new(db.clone(), AuthConfig::new(JWT_SECRET).with_bcrypt_cost(4));
        let events = BookEventBus::new(16);
        let schema = build_schema(db.clone(), auth.clone(), events.clone());
        Self {
            db,
            auth,
            events,
            schema,
        }
    }

    /// Catalog holding the five sample authors and seven sample books
    pub async fn seeded() -> Self {
        let catalog = Self::new().await;
        seed_sample_catalog(&catalog.db).await.unwrap();
        catalog
    }

    pub async fn register(&self, username: &str, password: &str) -> UserRecord {
        self.auth
            .register(RegisterInput {
                username: username.to_string(),
                favorite_genre: "refactoring".to_string(),
                password: password.to_string(),
            })
            .await
            .unwrap()
    }

    pub fn request(&self, query: &str, user: Option<&UserRecord>) -> Request {
        with_request_context(
            Request::new(query),
            &self.db,
            user.cloned().map(CurrentUser),
        )
    }

    pub async fn execute(&self, query: &str) -> Response {
        self.schema.execute(self.request(query, None)).await
    }

    pub async fn execute_as(&self, user: &UserRecord, query: &str) -> Response {
        self.schema.execute(self.request(query, Some(user))).await
    }

    pub async fn execute_with_vars(
        &self,
        user: Option<&UserRecord>,
        query: &str,
        variables: serde_json::Value,
    ) -> Response {
        let request = self
            .request(query, user)
            .variables(Variables::from_json(variables));
        self.schema.execute(request).await
    }

    pub fn app(&self) -> axum::Router {
        build_app(AppState {
            config: Arc::new(test_config()),
            db: self.db.clone(),
            auth: self.auth.clone(),
            schema: self.schema.clone(),
        })
    }
}

pub fn test_config() -> Config {
    Config {
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        database_max_connections: 1,
        jwt_secret: JWT_SECRET.to_string(),
        bcrypt_cost: 4,
        event_bus_capacity: 16,
        seed_sample_data: false,
    }
}

/// Response data as JSON, asserting there were no errors
pub fn data(response: Response) -> serde_json::Value {
    assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
    response.data.into_json().unwrap()
}

/// `extensions.<key>` of the first error, as a string
pub fn error_extension(response: &Response, key: &str) -> Option<String> {
    let value = response.errors.first()?.extensions.as_ref()?.get(key)?;
    match value {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

pub fn titles(books: &serde_json::Value) -> Vec<String> {
    books
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap().to_string())
        .collect()
}
