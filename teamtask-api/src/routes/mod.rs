/// API route handlers
///
/// Handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh)
/// - `teams`: Teams and membership endpoints
/// - `projects`: Project endpoints
/// - `tasks`: Task endpoints

pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod teams;

use serde::{Deserialize, Deserializer};

/// Deserializes a field that distinguishes "absent" from "null"
///
/// Used with `#[serde(default, deserialize_with = "double_option")]` on
/// `Option<Option<T>>` fields: absent stays `None`, an explicit `null`
/// becomes `Some(None)`, a value becomes `Some(Some(v))`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
