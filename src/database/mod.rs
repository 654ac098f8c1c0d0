use crate::domain::{NewUser, User};
use async_trait::async_trait;
use thiserror::Error;

pub mod sqlite;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store rejected a write because of a uniqueness rule.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Any other failure inside the store (connection loss, closed pool, bad SQL...).
    #[error("{0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::ConstraintViolation(db_err.message().to_string())
            }
            _ => Self::Database(e),
        }
    }
}

// a user repository is shared between every request handler (Arc<dyn UserRepository>)
// sqlx::Pool is thread safe, so implementations only need &self
// every operation maps to exactly one statement against the store
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError>;

    // write operations
    async fn create_user(&self, user: &NewUser) -> Result<User, StoreError>;
    async fn update_user(&self, id: i64, name: &str) -> Result<Option<User>, StoreError>;
    async fn delete_user(&self, id: i64) -> Result<bool, StoreError>;

    /// Release the underlying connection. Calling it twice is harmless.
    async fn close(&self);
}
