// src/handlers/auth.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    config::{Config, MIN_PASSWORD_LENGTH},
    error::AppError,
    models::teacher::{ChangePasswordRequest, LoginRequest, RegisterRequest, TeacherProfile},
    state::Db,
    utils::{
        hash::{Passwords, hash_password, verify_password},
        jwt::{Claims, sign_jwt},
    },
};

/// Registers a new teacher and the school they teach at.
///
/// Returns 201 Created with a token, the profile and the new school.
pub async fn register(
    State(db): State<Db>,
    State(config): State<Config>,
    State(passwords): State<Passwords>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    // Skip the expensive hash for an obvious duplicate. `Database::register`
    // re-checks under the write lock.
    if db.read().teacher(&payload.email).is_some() {
        return Err(AppError::DuplicateIdentity(
            "Email is already registered".to_string(),
        ));
    }

    let hashed_password = hash_password(&passwords, &payload.password).await?;
    let (teacher, school) = db.write().register(payload, hashed_password)?;
    tracing::info!("Registered teacher {} with school {}", teacher.email, school.id);

    let token = sign_jwt(
        &teacher.email,
        &teacher.name,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "token": token,
            "user": TeacherProfile::from(&teacher),
            "school": school,
        })),
    ))
}

/// Authenticates a teacher and returns a JWT token.
pub async fn login(
    State(db): State<Db>,
    State(config): State<Config>,
    State(passwords): State<Passwords>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let teacher = db
        .read()
        .teacher(&payload.email)
        .cloned()
        .ok_or(AppError::UnknownIdentity("Email is not registered".to_string()))?;

    if !verify_password(&passwords, &payload.password, &teacher.password).await? {
        return Err(AppError::InvalidCredential("Incorrect password".to_string()));
    }

    let token = sign_jwt(
        &teacher.email,
        &teacher.name,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(json!({
        "success": true,
        "token": token,
        "user": TeacherProfile::from(&teacher),
    })))
}

/// Replaces the caller's password after checking the current one.
pub async fn change_password(
    State(db): State<Db>,
    State(passwords): State<Passwords>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let stored = db
        .read()
        .teacher(&claims.email)
        .map(|t| t.password.clone())
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    if !verify_password(&passwords, &payload.current_password, &stored).await? {
        return Err(AppError::InvalidCredential(
            "Current password is incorrect".to_string(),
        ));
    }

    if payload.new_password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::WeakSecret(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    let hashed = hash_password(&passwords, &payload.new_password).await?;
    db.write().set_password(&claims.email, hashed)?;
    tracing::info!("Password changed for {}", claims.email);

    Ok(Json(json!({
        "success": true,
        "message": "Password changed successfully",
    })))
}
