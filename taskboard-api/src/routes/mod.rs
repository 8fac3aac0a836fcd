/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Token endpoints (obtain, refresh)
/// - `users`: User registration and CRUD
/// - `projects`: Project CRUD
/// - `tasks`: Task CRUD with optional project scoping
/// - `comments`: Comment CRUD with optional task scoping

pub mod auth;
pub mod comments;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod users;
