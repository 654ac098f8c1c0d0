use crate::database::{StoreError, UserRepository};
use crate::domain::{NewUser, User};
use crate::features::users::model::DbUser;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::time::Duration;

pub struct SqliteRepository {
    pool: Pool<Sqlite>,
}

impl SqliteRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Opens (creating if needed) the database at `database_url` and makes sure the
    /// `users` table exists.
    ///
    /// The pool holds exactly one connection for the life of the process. Idle
    /// timeout and max lifetime are disabled so that `sqlite::memory:` databases are
    /// never silently dropped and recreated empty.
    pub async fn connect(database_url: &str) -> Result<Self> {
        // verify db exists
        if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
            tracing::info!("No database at {}, creating...", database_url);
            Sqlite::create_database(database_url)
                .await
                .with_context(|| format!("Unable to create database at {}", database_url))?;
            tracing::info!("Created database at {}", database_url);
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect(database_url)
            .await
            .with_context(|| format!("Failed to open database at {}", database_url))?;

        // run migrations to create the users schema
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run database migrations")?;

        tracing::info!("Users table ready");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        tracing::debug!("listing users");
        let db_users = sqlx::query_as::<_, DbUser>("SELECT id, name, email FROM users")
            .fetch_all(&self.pool)
            .await?;

        Ok(db_users.into_iter().map(User::from).collect())
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        tracing::debug!(id, "fetching user");
        let db_user_opt =
            sqlx::query_as::<_, DbUser>("SELECT id, name, email FROM users WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(db_user_opt.map(User::from))
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, StoreError> {
        // RETURNING hands back the id the store assigned in the same statement
        let db_user = sqlx::query_as::<_, DbUser>(
            r#"
            INSERT INTO users (name, email)
            VALUES (?, ?)
            RETURNING id, name, email
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(user = %db_user, "created user");
        Ok(db_user.into())
    }

    async fn update_user(&self, id: i64, name: &str) -> Result<Option<User>, StoreError> {
        // zero matched rows means no row comes back, which is our "not found"
        let db_user_opt = sqlx::query_as::<_, DbUser>(
            r#"
            UPDATE users SET name = ?
            WHERE id = ?
            RETURNING id, name, email
            "#,
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        tracing::debug!(id, found = db_user_opt.is_some(), "updated user");
        Ok(db_user_opt.map(User::from))
    }

    async fn delete_user(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!(id, rows = result.rows_affected(), "deleted user");
        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) {
        if self.pool.is_closed() {
            return;
        }
        self.pool.close().await;
        tracing::info!("Database connection closed");
    }
}
