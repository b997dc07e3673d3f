// src/models/result.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A recorded quiz attempt.
///
/// Whatever the client submitted is kept verbatim in `fields`; only the keys
/// below are interpreted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub id: i64,

    /// Display name of the teacher the attempt was taken for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_id: Option<String>,

    /// Owner email, resolved from `school_id` at submission.
    #[serde(default, skip_serializing)]
    pub owner: Option<String>,

    pub timestamp: DateTime<Utc>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl QuizResult {
    /// Results tied to a known school belong to its owner; anything else falls
    /// back to matching the submitted teacher name.
    pub fn is_owned_by(&self, email: &str, name: &str) -> bool {
        match &self.owner {
            Some(owner) => owner == email,
            None => self.teacher.as_deref() == Some(name),
        }
    }
}
