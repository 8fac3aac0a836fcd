/// Comment serialization schema
///
/// The author comes from the body `user` field, not the bearer credential.

use super::{
    body_object, optional_reference, optional_string, required_reference, required_string,
    UNBOUNDED,
};
use crate::error::ValidationErrorDetail;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use taskboard_shared::models::comment::{Comment, CreateComment, UpdateComment};

/// Read representation of a comment
#[derive(Debug, Serialize)]
pub struct CommentBody {
    pub id: i64,
    pub content: String,

    /// Author id, bare value
    pub user: i64,

    /// Task id, bare value
    pub task: i64,

    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentBody {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            user: comment.user_id,
            task: comment.task_id,
            created_at: comment.created_at,
        }
    }
}

/// Validates a creation body
///
/// `task` is required in the body; the task-scoped route overrides it with
/// the path id after validation.
pub fn parse_create(value: &Value) -> Result<CreateComment, Vec<ValidationErrorDetail>> {
    let obj = body_object(value)?;
    let mut errors = Vec::new();

    let content = required_string(obj, "content", UNBOUNDED, &mut errors);
    let user_id = required_reference(obj, "user", &mut errors);
    let task_id = required_reference(obj, "task", &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(CreateComment {
        content: content.expect("validated"),
        user_id: user_id.expect("validated"),
        task_id: task_id.expect("validated"),
    })
}

/// Validates a partial-update body
pub fn parse_update(value: &Value) -> Result<UpdateComment, Vec<ValidationErrorDetail>> {
    let obj = body_object(value)?;
    let mut errors = Vec::new();

    let update = UpdateComment {
        content: optional_string(obj, "content", UNBOUNDED, &mut errors),
        user_id: optional_reference(obj, "user", &mut errors),
        task_id: optional_reference(obj, "task", &mut errors),
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(update)
}
