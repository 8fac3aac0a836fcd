/// Project membership model
///
/// A membership row links a user to a project with a role. There is no
/// uniqueness constraint on (project, user): the same user may appear in a
/// project more than once, and both rows are reported.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE member_role AS ENUM ('Admin', 'Member');
///
/// CREATE TABLE project_members (
///     id BIGSERIAL PRIMARY KEY,
///     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role member_role NOT NULL
/// );
/// ```
///
/// The role is stored but not consulted by any controller; no endpoint
/// currently writes membership rows either.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Role of a user within a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_role")]
pub enum MemberRole {
    #[sqlx(rename = "Admin")]
    Admin,

    #[sqlx(rename = "Member")]
    Member,
}

impl MemberRole {
    /// Wire spellings accepted for the role field
    pub const CHOICES: &'static [&'static str] = &["Admin", "Member"];

    /// Parses the wire spelling of a role
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "Admin" => Some(MemberRole::Admin),
            "Member" => Some(MemberRole::Member),
            _ => None,
        }
    }

    /// Wire spelling of this role
    pub fn as_wire(&self) -> &'static str {
        match self {
            MemberRole::Admin => "Admin",
            MemberRole::Member => "Member",
        }
    }
}

/// Membership row linking a user to a project
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectMember {
    pub id: i64,
    pub project_id: i64,
    pub user_id: i64,
    pub role: MemberRole,
}

/// Input for creating a membership row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectMember {
    pub project_id: i64,
    pub user_id: i64,
    pub role: MemberRole,
}

impl ProjectMember {
    /// Creates a membership row
    ///
    /// Duplicate (project, user) pairs are accepted.
    pub async fn create(pool: &PgPool, data: CreateProjectMember) -> Result<Self, sqlx::Error> {
        let member = sqlx::query_as::<_, ProjectMember>(
            r#"
            INSERT INTO project_members (project_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING id, project_id, user_id, role
            "#,
        )
        .bind(data.project_id)
        .bind(data.user_id)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(member)
    }

    /// Lists the membership rows of a project in insertion order
    pub async fn list_by_project(pool: &PgPool, project_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let members = sqlx::query_as::<_, ProjectMember>(
            r#"
            SELECT id, project_id, user_id, role
            FROM project_members
            WHERE project_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }
}
