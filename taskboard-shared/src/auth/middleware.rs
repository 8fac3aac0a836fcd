/// Authentication context for Axum handlers
///
/// The API's bearer-validation middleware extracts the JWT from the
/// Authorization header, validates it, and inserts an [`AuthContext`] into
/// the request extensions. Handlers pick it up with Axum's `Extension`
/// extractor.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use taskboard_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {}", auth.user_id)
/// }
/// ```

use serde::{Deserialize, Serialize};

/// Authentication context added to request extensions
///
/// Present on every request that passed the bearer-validation layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID (JWT subject)
    pub user_id: i64,
}

impl AuthContext {
    /// Creates auth context from a validated JWT subject
    pub fn from_jwt(user_id: i64) -> Self {
        Self { user_id }
    }
}
