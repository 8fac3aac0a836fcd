/// User serialization schema
///
/// Two input shapes exist: registration (which accepts a write-only plaintext
/// password) and partial update. The read representation never includes the
/// password or its hash.

use super::{body_object, optional_string, required_string};
use crate::error::ValidationErrorDetail;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use taskboard_shared::models::user::{UpdateUser, User};
use validator::ValidateEmail;

/// Read representation of a user
///
/// Exactly the allow-listed fields; `password_hash`, `is_staff`, and
/// `is_active` stay off the wire.
#[derive(Debug, Serialize)]
pub struct UserBody {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_joined: DateTime<Utc>,
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            date_joined: user.date_joined,
        }
    }
}

/// Validated registration input
///
/// The password is plaintext here for exactly as long as it takes the
/// controller to hash it.
#[derive(Debug)]
pub struct RegisterData {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

fn email_value(
    obj: &serde_json::Map<String, Value>,
    required: bool,
    errors: &mut Vec<ValidationErrorDetail>,
) -> Option<String> {
    let email = if required {
        required_string(obj, "email", 254, errors)
    } else {
        optional_string(obj, "email", 254, errors)
    };

    match email {
        Some(email) if !email.validate_email() => {
            errors.push(ValidationErrorDetail::new(
                "email",
                "Enter a valid email address.",
            ));
            None
        }
        other => other,
    }
}

/// Validates a registration body
pub fn parse_register(value: &Value) -> Result<RegisterData, Vec<ValidationErrorDetail>> {
    let obj = body_object(value)?;
    let mut errors = Vec::new();

    let username = required_string(obj, "username", 150, &mut errors);
    let email = email_value(obj, true, &mut errors);
    let password = required_string(obj, "password", 128, &mut errors);
    let first_name = optional_string(obj, "first_name", 150, &mut errors);
    let last_name = optional_string(obj, "last_name", 150, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(RegisterData {
        username: username.expect("validated"),
        email: email.expect("validated"),
        password: password.expect("validated"),
        first_name: first_name.unwrap_or_default(),
        last_name: last_name.unwrap_or_default(),
    })
}

/// Validates a partial-update body
///
/// Only the writable allow-list is consulted; `id` and `date_joined` are
/// ignored if present.
pub fn parse_update(value: &Value) -> Result<UpdateUser, Vec<ValidationErrorDetail>> {
    let obj = body_object(value)?;
    let mut errors = Vec::new();

    let update = UpdateUser {
        username: optional_string(obj, "username", 150, &mut errors),
        email: email_value(obj, false, &mut errors),
        first_name: optional_string(obj, "first_name", 150, &mut errors),
        last_name: optional_string(obj, "last_name", 150, &mut errors),
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(update)
}
