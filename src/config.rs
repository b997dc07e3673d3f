// src/config.rs

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use dotenvy::dotenv;

use crate::utils::hash::SchemeKind;

/// Signing secret used when `JWT_SECRET` is not set. Anyone who has read the
/// source can forge tokens with it.
pub const INSECURE_DEFAULT_SECRET: &str = "quiz-system-secret-2024";

/// Token lifetime when `JWT_EXPIRATION` is not set (24 hours).
pub const DEFAULT_JWT_EXPIRATION: u64 = 86_400;

pub const DEFAULT_PORT: u16 = 3000;

/// Minimum length accepted for a new password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub jwt_secret: String,
    /// Token lifetime in seconds. `0` disables expiry entirely.
    pub jwt_expiration: u64,
    pub password_scheme: SchemeKind,
    pub rust_log: String,
    /// Optional JSON snapshot loaded (never written) at startup.
    pub snapshot_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| INSECURE_DEFAULT_SECRET.to_string());

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            port: parse_var("PORT", DEFAULT_PORT),
            jwt_secret,
            jwt_expiration: parse_var("JWT_EXPIRATION", DEFAULT_JWT_EXPIRATION),
            password_scheme: parse_var("PASSWORD_SCHEME", SchemeKind::Argon2),
            rust_log,
            snapshot_path: env::var("SNAPSHOT_PATH").ok().map(PathBuf::from),
        }
    }

    /// Insecure settings worth shouting about at startup.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.jwt_secret == INSECURE_DEFAULT_SECRET {
            warnings.push(
                "JWT_SECRET is not set; using the built-in fallback secret. Tokens can be forged."
                    .to_string(),
            );
        }
        if self.jwt_expiration == 0 {
            warnings.push("JWT_EXPIRATION=0: issued tokens never expire.".to_string());
        }
        if self.password_scheme == SchemeKind::Plaintext {
            warnings.push(
                "PASSWORD_SCHEME=plaintext: passwords are stored unhashed (legacy mode)."
                    .to_string(),
            );
        }

        warnings
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}
