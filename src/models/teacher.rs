// src/models/teacher.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A registered teacher, keyed by email in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub name: String,

    /// Output of the configured password scheme.
    /// Skipped during serialization to prevent leaking it.
    #[serde(default, skip_serializing)]
    pub password: String,

    /// Name of the school the teacher registered with.
    #[serde(default)]
    pub school: String,

    /// Education stage, e.g. "primary".
    #[serde(default)]
    pub stage: String,

    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Profile returned by login and register.
#[derive(Debug, Clone, Serialize)]
pub struct TeacherProfile {
    pub email: String,
    pub name: String,
    pub school: String,
    pub stage: String,
}

impl From<&Teacher> for TeacherProfile {
    fn from(teacher: &Teacher) -> Self {
        Self {
            email: teacher.email.clone(),
            name: teacher.name.clone(),
            school: teacher.school.clone(),
            stage: teacher.stage.clone(),
        }
    }
}

/// DTO for registration. Every field is required.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required."))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "School name is required."))]
    pub school: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Stage is required."))]
    pub stage: String,
}

/// DTO for login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required."))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}
