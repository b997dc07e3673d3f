// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::test::{CreateTestRequest, UpdateTestRequest},
    state::Db,
    utils::jwt::Claims,
};

/// Lists the tests of a school. Students use this without logging in.
pub async fn get_tests(
    State(db): State<Db>,
    Path(school_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let tests = db.read().tests(&school_id)?.to_vec();
    Ok(Json(tests))
}

/// Appends a new test to one of the caller's schools.
pub async fn create_test(
    State(db): State<Db>,
    Extension(claims): Extension<Claims>,
    Path(school_id): Path<String>,
    Json(payload): Json<CreateTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let test = db.write().create_test(&school_id, &claims.email, payload)?;
    tracing::info!("{} created test {} in {}", claims.email, test.id, school_id);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "test": test })),
    ))
}

/// Merges the given fields over an existing test.
pub async fn update_test(
    State(db): State<Db>,
    Extension(claims): Extension<Claims>,
    Path((school_id, test_id)): Path<(String, String)>,
    Json(payload): Json<UpdateTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    let test = db
        .write()
        .update_test(&school_id, &test_id, &claims.email, payload)?;

    Ok(Json(json!({ "success": true, "test": test })))
}
