// src/handlers/admin.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::{
    error::AppError,
    state::Db,
    store::seed::{self, DEFAULT_SCHOOL_ID, DEMO_EMAIL},
    utils::hash::Passwords,
};

/// Service banner with the endpoint map.
pub async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "Quiz API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "login": "POST /api/login",
            "register": "POST /api/register",
            "change_password": "POST /api/change-password",
            "teachers": "GET /api/teachers",
            "schools": "GET /api/schools",
            "schools_public": "GET /api/schools/public",
            "all_schools": "GET /api/all-schools",
            "tests": "GET /api/tests/{schoolId}",
            "create_test": "POST /api/schools/{schoolId}/tests",
            "update_test": "PUT /api/schools/{schoolId}/tests/{testId}",
            "results": "GET|POST /api/results",
            "delete_result": "DELETE /api/results/{id}",
            "reset_data": "POST /api/reset-data",
            "statistics": "GET /api/statistics",
            "status": "GET /api/status",
            "debug": "GET /api/debug/data",
        },
        "demo_account": { "email": DEMO_EMAIL },
    }))
}

pub async fn status(State(db): State<Db>) -> impl IntoResponse {
    let db = db.read();
    Json(json!({
        "status": "ok",
        "teachers_count": db.teachers.len(),
        "schools_count": db.schools.len(),
    }))
}

/// Public teacher directory. Password hashes never serialize.
pub async fn list_teachers(State(db): State<Db>) -> Result<impl IntoResponse, AppError> {
    let teachers = db.read().list_teachers();
    Ok(Json(teachers))
}

/// Wipes the store and restores the demo data.
pub async fn reset_data(
    State(db): State<Db>,
    State(passwords): State<Passwords>,
) -> Result<impl IntoResponse, AppError> {
    let stats = seed::reset_store(&db, &passwords).await?;

    tracing::warn!("Store reset to defaults");

    Ok(Json(json!({
        "success": true,
        "message": "Default data restored",
        "stats": stats,
    })))
}

/// Store keys and counts, for poking at a running instance.
pub async fn debug_data(State(db): State<Db>) -> impl IntoResponse {
    let db = db.read();
    Json(json!({
        "teachers": db.teachers.keys().collect::<Vec<_>>(),
        "schools": db.schools.keys().collect::<Vec<_>>(),
        "stats": {
            "teachers_count": db.teachers.len(),
            "schools_count": db.schools.len(),
            "results_count": db.results.len(),
            "tests_count": db.schools.get(DEFAULT_SCHOOL_ID).map_or(0, |s| s.tests.len()),
        },
    }))
}

pub async fn statistics(State(db): State<Db>) -> impl IntoResponse {
    Json(db.read().statistics())
}
