/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup (env-configured, migrations applied)
/// - Fixture user creation with real password hashes
/// - JWT token generation
/// - A request helper driving the router in-process

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::PgPool;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use taskboard_shared::auth::jwt::{create_token, Claims, TokenType};
use taskboard_shared::auth::password::hash_password;
use taskboard_shared::models::user::{CreateUser, User};
use tower::{Layer, ServiceExt};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: NormalizePath<Router>,
    pub config: Config,
    pub user: User,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a new test context against the env-configured database
    pub async fn new() -> anyhow::Result<Self> {
        // Load test configuration (DATABASE_URL, JWT_SECRET)
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../migrations").run(&db).await?;

        // Create fixture user with a bearer token
        let user = create_user(&db, &unique_name("fixture"), "fixture-p@ss").await?;
        let claims = Claims::new(user.id, TokenType::Access);
        let jwt_token = create_token(&claims, &config.jwt.secret)?;

        // Build app with the same trailing-slash normalization as the binary
        let state = AppState::new(db.clone(), config.clone());
        let app = NormalizePathLayer::trim_trailing_slash().layer(build_router(state));

        Ok(TestContext {
            db,
            app,
            config,
            user,
            jwt_token,
        })
    }

    /// Returns the fixture user's bearer token
    pub fn token(&self) -> &str {
        &self.jwt_token
    }

    /// Generates an access token for any user
    pub fn token_for(&self, user: &User) -> String {
        let claims = Claims::new(user.id, TokenType::Access);
        create_token(&claims, &self.config.jwt.secret).expect("token creation should succeed")
    }

    /// Sends one request through the router, returning status and JSON body
    ///
    /// An empty response body (204, bare 404) comes back as `Value::Null`.
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("request should build"),
            None => builder.body(Body::empty()).expect("request should build"),
        };

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("request should not fail at the transport level");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should collect");

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, value)
    }

    /// Cleans up the fixture user (owned rows cascade away)
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        User::delete(&self.db, self.user.id).await?;
        Ok(())
    }
}

/// Generates a unique fixture name
pub fn unique_name(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

/// Creates a user directly in the store with a real password hash
pub async fn create_user(db: &PgPool, username: &str, password: &str) -> anyhow::Result<User> {
    let user = User::create(
        db,
        CreateUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: hash_password(password)?,
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
        },
    )
    .await?;

    Ok(user)
}
