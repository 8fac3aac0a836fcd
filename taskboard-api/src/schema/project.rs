/// Project serialization schema
///
/// The owner is server-assigned on create (the authenticated caller); a
/// body-supplied `owner` is ignored there but remains writable on update.

use super::{body_object, optional_reference, optional_string, required_string, UNBOUNDED};
use crate::error::ValidationErrorDetail;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use taskboard_shared::models::project::{Project, UpdateProject};

/// Read representation of a project
#[derive(Debug, Serialize)]
pub struct ProjectBody {
    pub id: i64,
    pub name: String,
    pub description: String,

    /// Owning user id, bare value
    pub owner: i64,

    pub created_at: DateTime<Utc>,
}

impl From<Project> for ProjectBody {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            owner: project.owner_id,
            created_at: project.created_at,
        }
    }
}

/// Validated creation input; the controller supplies the owner
#[derive(Debug)]
pub struct CreateProjectData {
    pub name: String,
    pub description: String,
}

/// Validates a creation body
pub fn parse_create(value: &Value) -> Result<CreateProjectData, Vec<ValidationErrorDetail>> {
    let obj = body_object(value)?;
    let mut errors = Vec::new();

    let name = required_string(obj, "name", 200, &mut errors);
    let description = required_string(obj, "description", UNBOUNDED, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(CreateProjectData {
        name: name.expect("validated"),
        description: description.expect("validated"),
    })
}

/// Validates a partial-update body
pub fn parse_update(value: &Value) -> Result<UpdateProject, Vec<ValidationErrorDetail>> {
    let obj = body_object(value)?;
    let mut errors = Vec::new();

    let update = UpdateProject {
        name: optional_string(obj, "name", 200, &mut errors),
        description: optional_string(obj, "description", UNBOUNDED, &mut errors),
        owner_id: optional_reference(obj, "owner", &mut errors),
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(update)
}
