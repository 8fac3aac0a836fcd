//! # Taskboard Shared Library
//!
//! This crate contains the domain model, authentication primitives, and
//! database plumbing shared by the Taskboard API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their store operations
//! - `auth`: Password hashing, JWT tokens, and request auth context
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
