/// Task model and database operations
///
/// Tasks belong to a project and may be assigned to a user. Status and
/// priority are closed choice sets whose wire spellings are stored verbatim
/// as Postgres enum values.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('To Do', 'In Progress', 'Done');
/// CREATE TYPE task_priority AS ENUM ('Low', 'Medium', 'High');
///
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(100) NOT NULL,
///     description TEXT NOT NULL,
///     status task_status NOT NULL,
///     priority task_priority NOT NULL,
///     assigned_to BIGINT REFERENCES users(id) ON DELETE SET NULL,
///     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     due_date TIMESTAMPTZ NOT NULL
/// );
/// ```
///
/// # Delete semantics
///
/// Deleting the project removes the task (and its comments). Deleting the
/// assigned user keeps the task and clears `assigned_to`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Workflow state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    #[sqlx(rename = "To Do")]
    #[serde(rename = "To Do")]
    ToDo,

    #[sqlx(rename = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,

    #[sqlx(rename = "Done")]
    Done,
}

impl TaskStatus {
    /// Wire spellings accepted for the status field
    pub const CHOICES: &'static [&'static str] = &["To Do", "In Progress", "Done"];

    /// Parses the wire spelling of a status
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "To Do" => Some(TaskStatus::ToDo),
            "In Progress" => Some(TaskStatus::InProgress),
            "Done" => Some(TaskStatus::Done),
            _ => None,
        }
    }

    /// Wire spelling of this status
    pub fn as_wire(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

/// Priority of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority")]
pub enum TaskPriority {
    #[sqlx(rename = "Low")]
    Low,

    #[sqlx(rename = "Medium")]
    Medium,

    #[sqlx(rename = "High")]
    High,
}

impl TaskPriority {
    /// Wire spellings accepted for the priority field
    pub const CHOICES: &'static [&'static str] = &["Low", "Medium", "High"];

    /// Parses the wire spelling of a priority
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "Low" => Some(TaskPriority::Low),
            "Medium" => Some(TaskPriority::Medium),
            "High" => Some(TaskPriority::High),
            _ => None,
        }
    }

    /// Wire spelling of this priority
    pub fn as_wire(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    /// Short title
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Workflow state
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Assignee, None when unassigned
    pub assigned_to: Option<i64>,

    /// Project the task belongs to
    pub project_id: i64,

    /// When the task was created, immutable
    pub created_at: DateTime<Utc>,

    /// When the task is due
    pub due_date: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assigned_to: Option<i64>,
    pub project_id: i64,
    pub due_date: DateTime<Utc>,
}

/// Input for updating an existing task
///
/// Only non-None fields are written. `assigned_to` distinguishes "keep"
/// (None) from "clear" (Some(None)).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<Option<i64>>,
    pub project_id: Option<i64>,
    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new task
    ///
    /// # Errors
    ///
    /// Returns an error if the project or assignee does not exist (foreign
    /// key violation) or the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, priority, assigned_to, project_id, due_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, description, status, priority, assigned_to, project_id,
                      created_at, due_date
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.assigned_to)
        .bind(data.project_id)
        .bind(data.due_date)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, priority, assigned_to, project_id,
                   created_at, due_date
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Checks whether a task exists
    pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tasks WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;

        Ok(exists)
    }

    /// Lists tasks in insertion order, optionally filtered by project
    pub async fn list(pool: &PgPool, project_id: Option<i64>) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = match project_id {
            Some(project_id) => {
                sqlx::query_as::<_, Task>(
                    r#"
                    SELECT id, title, description, status, priority, assigned_to, project_id,
                           created_at, due_date
                    FROM tasks
                    WHERE project_id = $1
                    ORDER BY id ASC
                    "#,
                )
                .bind(project_id)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Task>(
                    r#"
                    SELECT id, title, description, status, priority, assigned_to, project_id,
                           created_at, due_date
                    FROM tasks
                    ORDER BY id ASC
                    "#,
                )
                .fetch_all(pool)
                .await?
            }
        };

        Ok(tasks)
    }

    /// Updates an existing task
    ///
    /// # Returns
    ///
    /// The updated task if found, None if the task doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut sets: Vec<String> = Vec::new();
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            sets.push(format!("title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            sets.push(format!("description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            sets.push(format!("status = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            sets.push(format!("priority = ${}", bind_count));
        }
        if data.assigned_to.is_some() {
            bind_count += 1;
            sets.push(format!("assigned_to = ${}", bind_count));
        }
        if data.project_id.is_some() {
            bind_count += 1;
            sets.push(format!("project_id = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            sets.push(format!("due_date = ${}", bind_count));
        }

        if sets.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let query = format!(
            "UPDATE tasks SET {} WHERE id = $1 RETURNING id, title, description, status, \
             priority, assigned_to, project_id, created_at, due_date",
            sets.join(", ")
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(assigned_to) = data.assigned_to {
            q = q.bind(assigned_to);
        }
        if let Some(project_id) = data.project_id {
            q = q.bind(project_id);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task by ID
    ///
    /// Comments on the task go with it.
    ///
    /// # Returns
    ///
    /// True if the task was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
