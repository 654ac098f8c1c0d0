use crate::domain::{NewUser, User};
use derive_more::derive::Display;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// row shape of the `users` table
#[derive(sqlx::FromRow, Debug, Eq, PartialEq, Clone, Display)]
#[display("{} (#{})", name, id)]
pub struct DbUser {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
}

impl From<DbUser> for User {
    fn from(db_user: DbUser) -> Self {
        User {
            id: db_user.id,
            name: db_user.name,
            email: db_user.email,
        }
    }
}

/// A user as returned by the API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[schema(as = User)]
pub struct JsonUser {
    /// The auto-generated id of the user
    #[schema(example = 1)]
    pub id: i64,
    /// The name of the user
    #[schema(example = "John Doe")]
    pub name: String,
    /// The user's email address, only present when one was given on creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "john@example.com")]
    pub email: Option<String>,
}

impl From<User> for JsonUser {
    fn from(user: User) -> Self {
        JsonUser {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Request body for creating or replacing a user.
///
/// Both fields are optional at the parsing stage so that a missing `name` is
/// reported as a validation error rather than a parse error.
#[derive(Deserialize, Debug, Default, Clone, ToSchema)]
#[schema(as = CreateUserDto)]
pub struct UserPayload {
    /// The name of the user
    #[schema(example = "John Doe")]
    pub name: Option<String>,
    /// Optional unique email, only read on creation
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    MissingName,
    EmptyEmail,
}

impl UserPayload {
    /// The name to store, if it is non-empty after trimming.
    pub fn valid_name(&self) -> Result<&str, PayloadError> {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => Ok(name),
            _ => Err(PayloadError::MissingName),
        }
    }

    pub fn into_new_user(self) -> Result<NewUser, PayloadError> {
        let name = self.valid_name()?.to_string();

        let email = match self.email {
            Some(email) if email.trim().is_empty() => return Err(PayloadError::EmptyEmail),
            other => other,
        };

        Ok(NewUser { name, email })
    }
}

/// Error body shared by every failing route.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
#[schema(as = Error)]
pub struct ErrorBody {
    /// Error message
    #[schema(example = "Failed to retrieve users")]
    pub error: String,
    /// Detailed error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Database connection failed")]
    pub message: Option<String>,
}
