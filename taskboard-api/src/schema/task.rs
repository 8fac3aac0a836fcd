/// Task serialization schema
///
/// Status and priority validate against their closed choice sets; a rejected
/// value names the field and the allowed spellings. `assigned_to` is the one
/// nullable reference: on update, an absent key keeps the current assignee
/// while an explicit `null` clears it.

use super::{
    body_object, optional_choice, optional_datetime, optional_reference, optional_string,
    required_choice, required_datetime, required_reference, required_string, UNBOUNDED,
};
use crate::error::ValidationErrorDetail;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use taskboard_shared::models::task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask};

/// Read representation of a task
///
/// Foreign keys (`assigned_to`, `project`) are bare identifier values.
#[derive(Debug, Serialize)]
pub struct TaskBody {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assigned_to: Option<i64>,
    pub project: i64,
    pub created_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

impl From<Task> for TaskBody {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            assigned_to: task.assigned_to,
            project: task.project_id,
            created_at: task.created_at,
            due_date: task.due_date,
        }
    }
}

/// Validates a creation body
///
/// `project` is required in the body; the project-scoped route overrides it
/// with the path id after validation.
pub fn parse_create(value: &Value) -> Result<CreateTask, Vec<ValidationErrorDetail>> {
    let obj = body_object(value)?;
    let mut errors = Vec::new();

    let title = required_string(obj, "title", 100, &mut errors);
    let description = required_string(obj, "description", UNBOUNDED, &mut errors);
    let status = required_choice(
        obj,
        "status",
        TaskStatus::CHOICES,
        TaskStatus::from_wire,
        &mut errors,
    );
    let priority = required_choice(
        obj,
        "priority",
        TaskPriority::CHOICES,
        TaskPriority::from_wire,
        &mut errors,
    );
    let assigned_to = optional_reference(obj, "assigned_to", &mut errors);
    let project_id = required_reference(obj, "project", &mut errors);
    let due_date = required_datetime(obj, "due_date", &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(CreateTask {
        title: title.expect("validated"),
        description: description.expect("validated"),
        status: status.expect("validated"),
        priority: priority.expect("validated"),
        assigned_to,
        project_id: project_id.expect("validated"),
        due_date: due_date.expect("validated"),
    })
}

/// Validates a partial-update body
pub fn parse_update(value: &Value) -> Result<UpdateTask, Vec<ValidationErrorDetail>> {
    let obj = body_object(value)?;
    let mut errors = Vec::new();

    // Tri-state: absent keeps the assignee, null clears it
    let assigned_to = match obj.get("assigned_to") {
        None => None,
        Some(Value::Null) => Some(None),
        Some(_) => optional_reference(obj, "assigned_to", &mut errors).map(Some),
    };

    let update = UpdateTask {
        title: optional_string(obj, "title", 100, &mut errors),
        description: optional_string(obj, "description", UNBOUNDED, &mut errors),
        status: optional_choice(
            obj,
            "status",
            TaskStatus::CHOICES,
            TaskStatus::from_wire,
            &mut errors,
        ),
        priority: optional_choice(
            obj,
            "priority",
            TaskPriority::CHOICES,
            TaskPriority::from_wire,
            &mut errors,
        ),
        assigned_to,
        project_id: optional_reference(obj, "project", &mut errors),
        due_date: optional_datetime(obj, "due_date", &mut errors),
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "title": "Ship it",
            "description": "d",
            "status": "To Do",
            "priority": "High",
            "project": 1,
            "due_date": "2024-07-01T12:00:00Z",
        })
    }

    #[test]
    fn test_create_valid_body() {
        let task = parse_create(&valid_body()).unwrap();

        assert_eq!(task.title, "Ship it");
        assert_eq!(task.status, TaskStatus::ToDo);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.assigned_to, None);
        assert_eq!(task.project_id, 1);
    }

    #[test]
    fn test_create_missing_fields_all_reported() {
        let errors = parse_create(&json!({})).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();

        assert_eq!(
            fields,
            vec!["title", "description", "status", "priority", "project", "due_date"]
        );
        for error in &errors {
            assert_eq!(error.message, "This field is required.");
        }
    }

    #[test]
    fn test_create_invalid_status_names_field_and_choices() {
        let mut body = valid_body();
        body["status"] = json!("Blocked");

        let errors = parse_create(&body).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "status");
        assert!(errors[0].message.contains("To Do, In Progress, Done"));
    }

    #[test]
    fn test_create_invalid_priority_rejected() {
        let mut body = valid_body();
        body["priority"] = json!("Urgent");

        let errors = parse_create(&body).unwrap_err();
        assert_eq!(errors[0].field, "priority");
        assert!(errors[0].message.contains("Low, Medium, High"));
    }

    #[test]
    fn test_create_choice_spellings_are_exact() {
        for bad in ["to do", "TODO", "done", "high"] {
            let mut body = valid_body();
            if bad == "high" {
                body["priority"] = json!(bad);
            } else {
                body["status"] = json!(bad);
            }
            assert!(parse_create(&body).is_err(), "{:?} must be rejected", bad);
        }
    }

    #[test]
    fn test_create_null_assignee_allowed() {
        let mut body = valid_body();
        body["assigned_to"] = json!(null);

        let task = parse_create(&body).unwrap();
        assert_eq!(task.assigned_to, None);
    }

    #[test]
    fn test_update_assignee_tri_state() {
        // absent = keep
        let keep = parse_update(&json!({"title": "t"})).unwrap();
        assert_eq!(keep.assigned_to, None);

        // null = clear
        let clear = parse_update(&json!({"assigned_to": null})).unwrap();
        assert_eq!(clear.assigned_to, Some(None));

        // value = reassign
        let reassign = parse_update(&json!({"assigned_to": 4})).unwrap();
        assert_eq!(reassign.assigned_to, Some(Some(4)));
    }

    #[test]
    fn test_update_ignores_created_at() {
        let update = parse_update(&json!({"created_at": "2020-01-01T00:00:00Z"})).unwrap();

        assert!(update.title.is_none());
        assert!(update.due_date.is_none());
    }

    #[test]
    fn test_update_validates_present_fields_like_create() {
        let errors = parse_update(&json!({"status": "Blocked"})).unwrap_err();
        assert_eq!(errors[0].field, "status");
    }

    #[test]
    fn test_task_body_wire_shape() {
        let task = Task {
            id: 9,
            title: "t".to_string(),
            description: "d".to_string(),
            status: TaskStatus::InProgress,
            priority: TaskPriority::Low,
            assigned_to: Some(4),
            project_id: 7,
            created_at: Utc::now(),
            due_date: Utc::now(),
        };

        let body = serde_json::to_value(TaskBody::from(task)).unwrap();
        assert_eq!(body["status"], json!("In Progress"));
        assert_eq!(body["priority"], json!("Low"));
        assert_eq!(body["project"], json!(7));
        assert_eq!(body["assigned_to"], json!(4));
    }
}
