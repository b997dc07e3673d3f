// src/store/database.rs

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{
    error::AppError,
    models::{
        result::QuizResult,
        school::{PublicSchool, School},
        teacher::{RegisterRequest, Teacher},
        test::{CreateTestRequest, Test, UpdateTestRequest},
    },
};

/// Everything the service knows. Lives for the process lifetime only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Database {
    /// Keyed by email.
    pub teachers: BTreeMap<String, Teacher>,
    /// Keyed by school id.
    pub schools: BTreeMap<String, School>,
    pub results: Vec<QuizResult>,
    /// Last millisecond stamp handed out for an id.
    last_stamp: i64,
}

/// Aggregate counts across the whole store.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_schools: usize,
    pub total_teachers: usize,
    pub total_tests: usize,
    pub total_results: usize,
    /// Tests with at least one question.
    pub active_tests: usize,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from a raw JSON snapshot.
    ///
    /// A top-level collection that is missing, of the wrong kind or fails to
    /// decode comes back empty; the others are kept.
    pub fn recover(raw: Value) -> Self {
        let mut db = Database::new();

        let Value::Object(mut root) = raw else {
            tracing::warn!("Snapshot is not a JSON object; starting from an empty store");
            return db;
        };

        db.teachers = take_collection(&mut root, "teachers", Value::is_object);
        db.schools = take_collection(&mut root, "schools", Value::is_object);
        db.results = take_collection(&mut root, "results", Value::is_array);

        for (email, teacher) in db.teachers.iter_mut() {
            if teacher.email.is_empty() {
                teacher.email = email.clone();
            }
        }
        for (id, school) in db.schools.iter_mut() {
            if school.id.is_empty() {
                school.id = id.clone();
            }
        }
        db.relink_orphan_schools();
        db.last_stamp = db.results.iter().map(|r| r.id).max().unwrap_or(0);

        // Tests without an id can't be addressed by update; give them one.
        let unnamed = db
            .schools
            .values()
            .flat_map(|s| s.tests.iter())
            .filter(|t| t.id.is_empty())
            .count();
        let fresh_ids: Vec<String> = (0..unnamed)
            .map(|_| format!("test_{}", db.next_stamp()))
            .collect();
        let tests = db.schools.values_mut().flat_map(|s| s.tests.iter_mut());
        for (test, id) in tests.filter(|t| t.id.is_empty()).zip(fresh_ids) {
            test.id = id;
        }

        db
    }

    /// Gives ownerless schools to the one teacher whose display name matches.
    /// Ambiguous or unmatched names stay ownerless.
    fn relink_orphan_schools(&mut self) {
        for school in self.schools.values_mut().filter(|s| s.owner.is_empty()) {
            let mut matches = self
                .teachers
                .values()
                .filter(|t| !school.teacher.is_empty() && t.name == school.teacher);

            match (matches.next(), matches.next()) {
                (Some(teacher), None) => school.owner = teacher.email.clone(),
                (Some(_), Some(_)) => tracing::warn!(
                    "School {} has an ambiguous owner name '{}'; leaving it unowned",
                    school.id,
                    school.teacher
                ),
                _ => {}
            }
        }
    }

    pub fn clear(&mut self) {
        self.teachers.clear();
        self.schools.clear();
        self.results.clear();
    }

    /// Millisecond timestamp, strictly increasing across calls.
    fn next_stamp(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last_stamp = now.max(self.last_stamp + 1);
        self.last_stamp
    }

    fn next_school_id(&mut self) -> String {
        loop {
            let id = format!("school_{}", self.next_stamp());
            if !self.schools.contains_key(&id) {
                return id;
            }
        }
    }

    fn next_result_id(&mut self) -> i64 {
        loop {
            let id = self.next_stamp();
            if !self.results.iter().any(|r| r.id == id) {
                return id;
            }
        }
    }

    // ---- credentials ----

    pub fn teacher(&self, email: &str) -> Option<&Teacher> {
        self.teachers.get(email)
    }

    /// Inserts a teacher together with the school they registered with.
    /// Both land or neither does.
    pub fn register(
        &mut self,
        req: RegisterRequest,
        password_hash: String,
    ) -> Result<(Teacher, School), AppError> {
        if self.teachers.contains_key(&req.email) {
            return Err(AppError::DuplicateIdentity(
                "Email is already registered".to_string(),
            ));
        }

        let now = Utc::now();
        let school = School {
            id: self.next_school_id(),
            name: req.school.clone(),
            teacher: req.name.clone(),
            owner: req.email.clone(),
            tests: Vec::new(),
            created_at: Some(now),
        };
        let teacher = Teacher {
            email: req.email,
            name: req.name,
            password: password_hash,
            school: req.school,
            stage: req.stage,
            created_at: Some(now),
        };

        self.teachers.insert(teacher.email.clone(), teacher.clone());
        self.schools.insert(school.id.clone(), school.clone());

        Ok((teacher, school))
    }

    pub fn set_password(&mut self, email: &str, password_hash: String) -> Result<(), AppError> {
        let teacher = self
            .teachers
            .get_mut(email)
            .ok_or(AppError::NotFound("User not found".to_string()))?;
        teacher.password = password_hash;
        Ok(())
    }

    pub fn list_teachers(&self) -> Vec<Teacher> {
        self.teachers.values().cloned().collect()
    }

    // ---- schools & tests ----

    pub fn schools_owned_by(&self, email: &str) -> Vec<School> {
        self.schools
            .values()
            .filter(|s| s.is_owned_by(email))
            .cloned()
            .collect()
    }

    pub fn public_schools(&self) -> Vec<PublicSchool> {
        self.schools.values().map(PublicSchool::from).collect()
    }

    pub fn tests(&self, school_id: &str) -> Result<&[Test], AppError> {
        self.schools
            .get(school_id)
            .map(|s| s.tests.as_slice())
            .ok_or_else(school_not_found)
    }

    fn owned_school_mut(&mut self, school_id: &str, email: &str) -> Result<&mut School, AppError> {
        let school = self
            .schools
            .get_mut(school_id)
            .ok_or_else(school_not_found)?;

        if !school.is_owned_by(email) {
            return Err(AppError::Forbidden(
                "You do not own this school".to_string(),
            ));
        }
        Ok(school)
    }

    pub fn create_test(
        &mut self,
        school_id: &str,
        email: &str,
        req: CreateTestRequest,
    ) -> Result<Test, AppError> {
        // Check before stamping so a rejected request doesn't burn an id.
        self.owned_school_mut(school_id, email)?;

        let id = loop {
            let candidate = format!("test_{}", self.next_stamp());
            if !self
                .schools
                .values()
                .any(|s| s.tests.iter().any(|t| t.id == candidate))
            {
                break candidate;
            }
        };

        let test = req.into_test(id, Utc::now());
        self.owned_school_mut(school_id, email)?
            .tests
            .push(test.clone());

        Ok(test)
    }

    pub fn update_test(
        &mut self,
        school_id: &str,
        test_id: &str,
        email: &str,
        patch: UpdateTestRequest,
    ) -> Result<Test, AppError> {
        let school = self.owned_school_mut(school_id, email)?;
        let test = school
            .tests
            .iter_mut()
            .find(|t| t.id == test_id)
            .ok_or(AppError::NotFound("Test not found".to_string()))?;

        patch.apply(test, Utc::now());
        Ok(test.clone())
    }

    // ---- results ----

    /// Records a submitted attempt. Server-owned keys in the body are
    /// replaced: `id`, `timestamp` and the resolved owner.
    pub fn submit_result(&mut self, body: Value) -> Result<QuizResult, AppError> {
        let Value::Object(mut fields) = body else {
            return Err(AppError::BadRequest(
                "Result must be a JSON object".to_string(),
            ));
        };

        for key in ["id", "timestamp", "owner"] {
            fields.remove(key);
        }
        let teacher = take_string(&mut fields, "teacher");
        let school_id = take_string(&mut fields, "schoolId");
        let owner = school_id
            .as_deref()
            .and_then(|id| self.schools.get(id))
            .filter(|s| !s.owner.is_empty())
            .map(|s| s.owner.clone());

        let result = QuizResult {
            id: self.next_result_id(),
            teacher,
            school_id,
            owner,
            timestamp: Utc::now(),
            fields,
        };
        self.results.push(result.clone());

        Ok(result)
    }

    pub fn results_for(&self, email: &str, name: &str) -> Vec<QuizResult> {
        self.results
            .iter()
            .filter(|r| r.is_owned_by(email, name))
            .cloned()
            .collect()
    }

    pub fn delete_result(&mut self, email: &str, name: &str, id: i64) -> Result<(), AppError> {
        let index = self
            .results
            .iter()
            .position(|r| r.id == id && r.is_owned_by(email, name))
            .ok_or(AppError::NotFound("Result not found".to_string()))?;

        self.results.remove(index);
        Ok(())
    }

    // ---- reporting ----

    pub fn statistics(&self) -> Statistics {
        let tests = self.schools.values().flat_map(|s| s.tests.iter());

        Statistics {
            total_schools: self.schools.len(),
            total_teachers: self.teachers.len(),
            total_tests: self.schools.values().map(|s| s.tests.len()).sum(),
            total_results: self.results.len(),
            active_tests: tests.filter(|t| !t.questions.is_empty()).count(),
        }
    }
}

fn school_not_found() -> AppError {
    AppError::NotFound("School not found".to_string())
}

fn take_collection<T: DeserializeOwned + Default>(
    root: &mut Map<String, Value>,
    key: &str,
    expected_kind: fn(&Value) -> bool,
) -> T {
    match root.remove(key) {
        Some(value) if expected_kind(&value) => serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::warn!("Snapshot collection '{}' is corrupt ({}); resetting it", key, e);
            T::default()
        }),
        Some(_) => {
            tracing::warn!("Snapshot collection '{}' has the wrong shape; resetting it", key);
            T::default()
        }
        None => {
            tracing::warn!("Snapshot collection '{}' is missing; starting it empty", key);
            T::default()
        }
    }
}

/// Removes `key` if it holds a string. Other values stay in the map.
fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key) {
        Some(Value::String(_)) => match fields.remove(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        },
        _ => None,
    }
}
