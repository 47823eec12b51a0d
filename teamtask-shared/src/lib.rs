//! # TeamTask Shared Library
//!
//! This crate contains the core domain logic of TeamTask: data models,
//! the storage abstraction, authentication utilities, and the
//! authorization-aware services that every transport surface (currently
//! the HTTP API) calls into.
//!
//! ## Module Organization
//!
//! - `models`: Domain entities and their input/patch types
//! - `store`: The `Store` capability trait plus Postgres and in-memory backends
//! - `auth`: Password hashing, JWT tokens, and the identity store
//! - `authz`: The stateless authorization gate
//! - `registry`: Team membership registry (teams, members, roles)
//! - `resources`: Resource ownership layer (projects, tasks)
//! - `error`: Common error taxonomy

pub mod auth;
pub mod authz;
pub mod error;
pub mod models;
pub mod registry;
pub mod resources;
pub mod store;

/// Current version of the TeamTask shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
