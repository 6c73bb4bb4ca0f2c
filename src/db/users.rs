//! Users repository

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::sqlite_helpers::{new_id, now_iso8601};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub favorite_genre: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub favorite_genre: String,
    pub password_hash: String,
}

pub struct UsersRepository {
    pool: SqlitePool,
}

impl UsersRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, user: CreateUser) -> Result<UserRecord> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (id, username, favorite_genre, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, username, favorite_genre, password_hash, created_at
            "#,
        )
        .bind(new_id())
        .bind(&user.username)
        .bind(&user.favorite_genre)
        .bind(&user.password_hash)
        .bind(now_iso8601())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, favorite_genre, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Get user by exact username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, favorite_genre, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;

    use super::*;

    fn input(username: &str) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            favorite_genre: "refactoring".to_string(),
            password_hash: "$2b$04$placeholder".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let db = Database::in_memory().await.unwrap();
        let created = db.users().create(input("mluukkai")).await.unwrap();

        let by_name = db.users().get_by_username("mluukkai").await.unwrap().unwrap();
        let by_id = db.users().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_name, created);
        assert_eq!(by_id, created);
        assert!(db.users().get_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let db = Database::in_memory().await.unwrap();
        db.users().create(input("mluukkai")).await.unwrap();
        assert!(db.users().create(input("mluukkai")).await.is_err());
    }

    #[tokio::test]
    async fn test_short_username_rejected() {
        let db = Database::in_memory().await.unwrap();
        assert!(db.users().create(input("ab")).await.is_err());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let record = UserRecord {
            id: "1".to_string(),
            username: "mluukkai".to_string(),
            favorite_genre: "refactoring".to_string(),
            password_hash: "secret-hash".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
