/// Common error taxonomy for the TeamTask core
///
/// Every authorization-aware operation in `registry`, `resources`, and
/// `auth::identity` returns `Result<T, CoreError>`. Transport layers map
/// these variants onto their own responses (the HTTP API maps them to
/// status codes in `teamtask-api`).
///
/// # Design
///
/// Authorization denials and missing records are deliberately collapsed
/// into the single `NotFound` variant: a caller probing a resource it
/// does not own learns nothing about whether the resource exists.
/// Protected-invariant failures (`InvariantViolation`) stay distinct
/// from `NotFound` because they report a rejected mutation on state the
/// caller *can* see, not a missing record.

use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,

    /// Human-readable message
    pub message: String,
}

/// Protected invariants that mutations may violate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invariant {
    /// A team must keep at least one `owner` membership at all times
    LastOwner,

    /// At most one membership row may exist per (team, user) pair
    DuplicateMembership,
}

impl Invariant {
    /// Stable machine-readable code for the invariant
    pub fn as_str(&self) -> &'static str {
        match self {
            Invariant::LastOwner => "last_owner",
            Invariant::DuplicateMembership => "duplicate_membership",
        }
    }
}

impl std::fmt::Display for Invariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Invariant::LastOwner => write!(f, "cannot remove the last owner of a team"),
            Invariant::DuplicateMembership => {
                write!(f, "user is already a member of this team")
            }
        }
    }
}

/// Unified error type for the TeamTask core
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No verified identity, or credential verification failed.
    ///
    /// Unknown username and wrong password intentionally surface the
    /// same variant so callers cannot enumerate accounts.
    #[error("authentication required")]
    Unauthenticated,

    /// Missing record, or a record the caller is not allowed to touch.
    ///
    /// The two cases are indistinguishable on purpose.
    #[error("resource not found")]
    NotFound,

    /// Malformed or out-of-enum input, rejected before any persistence
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// Unique-identity conflict (e.g. username already taken)
    #[error("conflict: {0}")]
    Conflict(String),

    /// A mutation would violate a protected invariant
    #[error("invariant violation: {0}")]
    InvariantViolation(Invariant),

    /// Underlying persistence failed; not locally recoverable
    #[error("storage failure: {0}")]
    Store(StoreError),

    /// Unexpected internal failure (hashing, token signing)
    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Builds a single-field validation error
    pub fn validation(field: &str, message: &str) -> Self {
        CoreError::Validation(vec![FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }])
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => CoreError::NotFound,
            StoreError::DuplicateUsername(name) => {
                CoreError::Conflict(format!("username '{}' is already taken", name))
            }
            StoreError::DuplicateMembership => {
                CoreError::InvariantViolation(Invariant::DuplicateMembership)
            }
            StoreError::LastOwner => CoreError::InvariantViolation(Invariant::LastOwner),
            StoreError::Unavailable(_) => CoreError::Store(err),
        }
    }
}
