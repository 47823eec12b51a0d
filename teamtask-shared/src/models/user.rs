/// User model
///
/// Users are identities with a unique username and an Argon2id password
/// hash. Accounts are immutable after registration (credential rotation
/// is out of scope) and never deleted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (store-generated)
    pub id: Uuid,

    /// Unique username used for login
    pub username: String,

    /// Argon2id password hash
    ///
    /// Never store plaintext passwords. Serialization skips this field
    /// so a `User` can be returned to clients directly.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Username (uniqueness enforced by the store)
    pub username: String,

    /// Argon2id password hash (NOT the plaintext secret)
    pub password_hash: String,
}
