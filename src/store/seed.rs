// src/store/seed.rs

use chrono::Utc;
use serde::Serialize;

use crate::{
    error::AppError,
    models::{question::Question, school::School, teacher::Teacher, test::Test},
    state::Db,
    utils::hash::{Passwords, hash_password},
};

use super::database::Database;

pub const DEFAULT_SCHOOL_ID: &str = "school_default";
pub const DEMO_EMAIL: &str = "demo@quiz.local";
pub const DEMO_PASSWORD: &str = "123456";
pub const DEMO_NAME: &str = "Demo Teacher";
pub const DEMO_SCHOOL: &str = "Demo Primary School";
pub const DEMO_STAGE: &str = "primary";

/// Counts reported after a reset.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResetStats {
    pub teachers: usize,
    pub schools: usize,
    /// Tests in the default school.
    pub tests: usize,
}

fn demo_teacher(password_hash: String) -> Teacher {
    Teacher {
        email: DEMO_EMAIL.to_string(),
        name: DEMO_NAME.to_string(),
        password: password_hash,
        school: DEMO_SCHOOL.to_string(),
        stage: DEMO_STAGE.to_string(),
        created_at: Some(Utc::now()),
    }
}

fn demo_tests() -> Vec<Test> {
    vec![Test {
        id: "test_1".to_string(),
        name: "Mathematics, first term".to_string(),
        subject: "Mathematics".to_string(),
        grade: "Grade 4".to_string(),
        timer_per_question: 30,
        difficulty: "medium".to_string(),
        description: "First term mathematics test".to_string(),
        questions: vec![
            Question::new("What is 15 + 27?", &["42", "32", "52", "37"], 0),
            Question::new("Which number is twenty-five?", &["52", "25", "205", "250"], 1),
        ],
        created_at: Some(Utc::now()),
        updated_at: None,
    }]
}

fn demo_school() -> School {
    School {
        id: DEFAULT_SCHOOL_ID.to_string(),
        name: DEMO_SCHOOL.to_string(),
        teacher: DEMO_NAME.to_string(),
        owner: DEMO_EMAIL.to_string(),
        tests: demo_tests(),
        created_at: Some(Utc::now()),
    }
}

/// Makes sure the demo teacher and demo school exist.
///
/// Nothing already present is overwritten. On an existing default school,
/// defaults only fill fields that are empty; user tests are never dropped.
/// Running it again on its own output changes nothing.
///
/// `demo_hash` is the demo password already run through the password scheme;
/// hash it before taking the store lock.
pub fn ensure_defaults(db: &mut Database, demo_hash: &str) {
    if !db.teachers.contains_key(DEMO_EMAIL) {
        db.teachers
            .insert(DEMO_EMAIL.to_string(), demo_teacher(demo_hash.to_string()));
        tracing::info!("Restored demo teacher {}", DEMO_EMAIL);
    }

    match db.schools.get_mut(DEFAULT_SCHOOL_ID) {
        None => {
            db.schools
                .insert(DEFAULT_SCHOOL_ID.to_string(), demo_school());
            tracing::info!("Restored default school");
        }
        Some(school) => {
            let mut filled = Vec::new();
            if school.name.is_empty() {
                school.name = DEMO_SCHOOL.to_string();
                filled.push("name");
            }
            if school.teacher.is_empty() {
                school.teacher = DEMO_NAME.to_string();
                filled.push("teacher");
            }
            if school.owner.is_empty() {
                school.owner = DEMO_EMAIL.to_string();
                filled.push("owner");
            }
            if school.tests.is_empty() {
                school.tests = demo_tests();
                filled.push("tests");
            }
            if school.created_at.is_none() {
                school.created_at = Some(Utc::now());
                filled.push("createdAt");
            }
            if !filled.is_empty() {
                tracing::info!("Filled default school fields: {}", filled.join(", "));
            }
        }
    }

    tracing::info!(
        "Store ready: {} teachers, {} schools",
        db.teachers.len(),
        db.schools.len()
    );
}

/// Drops everything and reseeds the defaults.
pub fn reset(db: &mut Database, demo_hash: &str) -> ResetStats {
    db.clear();
    ensure_defaults(db, demo_hash);

    ResetStats {
        teachers: db.teachers.len(),
        schools: db.schools.len(),
        tests: db
            .schools
            .get(DEFAULT_SCHOOL_ID)
            .map_or(0, |s| s.tests.len()),
    }
}

/// Hashes the demo password on the blocking pool, then resets under a
/// short write lock. Readers are never stuck behind the hash.
pub async fn reset_store(db: &Db, passwords: &Passwords) -> Result<ResetStats, AppError> {
    let demo_hash = hash_password(passwords, DEMO_PASSWORD).await?;
    let stats = reset(&mut db.write(), &demo_hash);
    Ok(stats)
}
