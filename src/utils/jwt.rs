// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError};

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Teacher's email, the account key.
    pub email: String,
    /// Teacher's display name at the time of signing.
    pub name: String,
    /// Issued-at as Unix timestamp.
    pub iat: u64,
    /// Expiration time as Unix timestamp. Absent when expiry is disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

fn now_secs() -> Result<u64, AppError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| AppError::ServerFault(e.to_string()))
}

/// Signs a new JWT for a teacher.
///
/// `expiration_seconds == 0` produces a token without an `exp` claim.
pub fn sign_jwt(
    email: &str,
    name: &str,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    let iat = now_secs()?;

    let claims = Claims {
        email: email.to_owned(),
        name: name.to_owned(),
        iat,
        exp: (expiration_seconds > 0).then(|| iat + expiration_seconds),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::ServerFault(e.to_string()))
}

/// Verifies and decodes a JWT string.
///
/// With expiry enabled the `exp` claim is mandatory.
pub fn verify_jwt(token: &str, secret: &str, expiration_seconds: u64) -> Result<Claims, AppError> {
    let mut validation = Validation::default();
    if expiration_seconds == 0 {
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
    }

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        AppError::InvalidToken
    })?;

    Ok(token_data.claims)
}

/// Pulls the token out of an `Authorization: Bearer <token>` value.
pub fn bearer_token(value: &str) -> Option<&str> {
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Axum Middleware: Authentication.
///
/// Validates the bearer token and injects `Claims` into the request
/// extensions for handlers to use.
pub async fn auth_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or(AppError::MissingToken)?;

    let claims = verify_jwt(token, &config.jwt_secret, config.jwt_expiration)?;
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
