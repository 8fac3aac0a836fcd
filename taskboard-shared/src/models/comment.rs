/// Comment model and database operations
///
/// Comments hang off tasks and carry an author. Deleting either the task or
/// the author removes the comment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Comment on a task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub content: String,

    /// Author
    pub user_id: i64,

    /// Task the comment is attached to
    pub task_id: i64,

    /// When the comment was created, immutable
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComment {
    pub content: String,
    pub user_id: i64,
    pub task_id: i64,
}

/// Input for updating an existing comment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateComment {
    pub content: Option<String>,
    pub user_id: Option<i64>,
    pub task_id: Option<i64>,
}

impl Comment {
    /// Creates a new comment
    pub async fn create(pool: &PgPool, data: CreateComment) -> Result<Self, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (content, user_id, task_id)
            VALUES ($1, $2, $3)
            RETURNING id, content, user_id, task_id, created_at
            "#,
        )
        .bind(data.content)
        .bind(data.user_id)
        .bind(data.task_id)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    /// Finds a comment by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, content, user_id, task_id, created_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(comment)
    }

    /// Lists comments in insertion order, optionally filtered by task
    pub async fn list(pool: &PgPool, task_id: Option<i64>) -> Result<Vec<Self>, sqlx::Error> {
        let comments = match task_id {
            Some(task_id) => {
                sqlx::query_as::<_, Comment>(
                    r#"
                    SELECT id, content, user_id, task_id, created_at
                    FROM comments
                    WHERE task_id = $1
                    ORDER BY id ASC
                    "#,
                )
                .bind(task_id)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Comment>(
                    r#"
                    SELECT id, content, user_id, task_id, created_at
                    FROM comments
                    ORDER BY id ASC
                    "#,
                )
                .fetch_all(pool)
                .await?
            }
        };

        Ok(comments)
    }

    /// Updates an existing comment
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateComment,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut sets: Vec<String> = Vec::new();
        let mut bind_count = 1;

        if data.content.is_some() {
            bind_count += 1;
            sets.push(format!("content = ${}", bind_count));
        }
        if data.user_id.is_some() {
            bind_count += 1;
            sets.push(format!("user_id = ${}", bind_count));
        }
        if data.task_id.is_some() {
            bind_count += 1;
            sets.push(format!("task_id = ${}", bind_count));
        }

        if sets.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let query = format!(
            "UPDATE comments SET {} WHERE id = $1 RETURNING id, content, user_id, task_id, created_at",
            sets.join(", ")
        );

        let mut q = sqlx::query_as::<_, Comment>(&query).bind(id);

        if let Some(content) = data.content {
            q = q.bind(content);
        }
        if let Some(user_id) = data.user_id {
            q = q.bind(user_id);
        }
        if let Some(task_id) = data.task_id {
            q = q.bind(task_id);
        }

        let comment = q.fetch_optional(pool).await?;

        Ok(comment)
    }

    /// Deletes a comment by ID
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
