//! # TeamTask API Server Library
//!
//! HTTP surface for TeamTask: authentication, teams and memberships,
//! projects, and tasks, backed by the services in `teamtask-shared`.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
