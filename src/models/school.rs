// src/models/school.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::test::Test;

/// A named group of tests owned by one teacher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct School {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Owner's display name, kept for listings.
    #[serde(default)]
    pub teacher: String,
    /// Owner's email. This, not `teacher`, decides who may see and edit it.
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub tests: Vec<Test>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl School {
    pub fn is_owned_by(&self, email: &str) -> bool {
        !self.owner.is_empty() && self.owner == email
    }
}

/// Unauthenticated view of a school.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSchool {
    pub id: String,
    pub name: String,
    pub teacher: String,
    pub tests_count: usize,
}

impl From<&School> for PublicSchool {
    fn from(school: &School) -> Self {
        Self {
            id: school.id.clone(),
            name: school.name.clone(),
            teacher: school.teacher.clone(),
            tests_count: school.tests.len(),
        }
    }
}
