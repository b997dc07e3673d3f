// src/handlers/school.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{error::AppError, state::Db, utils::jwt::Claims};

/// Schools owned by the authenticated teacher.
pub async fn list_schools(
    State(db): State<Db>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let schools = db.read().schools_owned_by(&claims.email);
    Ok(Json(schools))
}

/// Every school, without tests or owner details. No auth.
pub async fn list_public_schools(State(db): State<Db>) -> Result<impl IntoResponse, AppError> {
    let schools = db.read().public_schools();
    Ok(Json(schools))
}
