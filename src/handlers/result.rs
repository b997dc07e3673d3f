// src/handlers/result.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Value, json};

use crate::{error::AppError, state::Db, utils::jwt::Claims};

/// Stores a student's attempt. Students are anonymous, so no auth.
pub async fn submit_result(
    State(db): State<Db>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let result = db.write().submit_result(body)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "result": result })),
    ))
}

pub async fn list_results(
    State(db): State<Db>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let results = db.read().results_for(&claims.email, &claims.name);
    Ok(Json(results))
}

pub async fn delete_result(
    State(db): State<Db>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    db.write().delete_result(&claims.email, &claims.name, id)?;

    Ok(Json(json!({
        "success": true,
        "message": "Result deleted",
    })))
}
