/// Identity store: registration and credential verification
///
/// Maps usernames to credentials and opaque user IDs. Passwords are
/// stored only as Argon2id hashes; the `User` serializer never emits
/// the hash.
///
/// Credential verification reports one failure ("invalid username or
/// password") for both an unknown username and a wrong password, and
/// burns a hash verification either way so the two cases are not
/// distinguishable by timing.

use std::sync::OnceLock;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::{NewUser, User};
use crate::store::Store;

use super::password::{hash_password, verify_password};

/// Hash verified against when the username does not exist, so unknown
/// and known usernames take the same code path.
static DUMMY_HASH: OnceLock<String> = OnceLock::new();

fn dummy_hash() -> &'static str {
    DUMMY_HASH.get_or_init(|| hash_password("timing-equalizer").unwrap_or_default())
}

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 50;
const PASSWORD_MIN: usize = 8;

/// Identity operations over an injected store
pub struct Identity<'a> {
    store: &'a dyn Store,
}

impl<'a> Identity<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Registers a new user
    ///
    /// Validates the username and password at the boundary, hashes the
    /// password, and inserts the record. A taken username is a
    /// `Conflict`.
    pub async fn register(&self, username: &str, password: &str) -> CoreResult<User> {
        let mut errors = Vec::new();

        let username = username.trim();
        if username.len() < USERNAME_MIN || username.len() > USERNAME_MAX {
            errors.push(crate::error::FieldError {
                field: "username".to_string(),
                message: format!(
                    "must be between {} and {} characters",
                    USERNAME_MIN, USERNAME_MAX
                ),
            });
        }
        if password.len() < PASSWORD_MIN {
            errors.push(crate::error::FieldError {
                field: "password".to_string(),
                message: format!("must be at least {} characters", PASSWORD_MIN),
            });
        }
        if !errors.is_empty() {
            return Err(CoreError::Validation(errors));
        }

        let password_hash =
            hash_password(password).map_err(|e| CoreError::Internal(e.to_string()))?;

        let user = self
            .store
            .create_user(NewUser {
                username: username.to_string(),
                password_hash,
            })
            .await?;

        debug!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Verifies a username/password pair
    ///
    /// Returns the user on success. Unknown username and wrong password
    /// both fail `Unauthenticated` with identical timing and message.
    pub async fn verify_credential(&self, username: &str, password: &str) -> CoreResult<User> {
        let found = self.store.find_user_by_username(username).await?;

        match found {
            Some(user) => {
                let ok = verify_password(password, &user.password_hash)
                    .map_err(|e| CoreError::Internal(e.to_string()))?;
                if ok {
                    Ok(user)
                } else {
                    Err(CoreError::Unauthenticated)
                }
            }
            None => {
                // Same work as the known-username path.
                if let Err(e) = verify_password(password, dummy_hash()) {
                    warn!(error = %e, "dummy hash verification failed");
                }
                Err(CoreError::Unauthenticated)
            }
        }
    }

    /// Looks up a user by ID
    pub async fn get_user(&self, id: Uuid) -> CoreResult<User> {
        self.store.find_user(id).await?.ok_or(CoreError::NotFound)
    }
}
