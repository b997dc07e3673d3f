use std::{fmt, str::FromStr, sync::Arc};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::AppError;

/// Strategy for turning a password into a stored secret and checking it later.
pub trait PasswordScheme: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AppError>;

    fn verify(&self, password: &str, stored: &str) -> Result<bool, AppError>;
}

/// Shared handle to the configured scheme.
pub type Passwords = Arc<dyn PasswordScheme>;

/// Salted Argon2id, stored as a PHC string.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Scheme;

impl PasswordScheme for Argon2Scheme {
    fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::ServerFault(e.to_string()))?
            .to_string();

        Ok(password_hash)
    }

    /// A stored secret that is not a PHC string (e.g. a plaintext password
    /// from a legacy snapshot) never matches.
    fn verify(&self, password: &str, stored: &str) -> Result<bool, AppError> {
        let Ok(parsed_hash) = PasswordHash::new(stored) else {
            tracing::warn!("Stored password is not an Argon2 hash; rejecting login");
            return Ok(false);
        };

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

/// Stores passwords as-is. Only for parity with legacy deployments.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextScheme;

impl PasswordScheme for PlaintextScheme {
    fn hash(&self, password: &str) -> Result<String, AppError> {
        Ok(password.to_string())
    }

    fn verify(&self, password: &str, stored: &str) -> Result<bool, AppError> {
        Ok(password == stored)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeKind {
    Argon2,
    Plaintext,
}

impl SchemeKind {
    pub fn build(self) -> Passwords {
        match self {
            SchemeKind::Argon2 => Arc::new(Argon2Scheme),
            SchemeKind::Plaintext => Arc::new(PlaintextScheme),
        }
    }
}

impl FromStr for SchemeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "argon2" | "argon2id" => Ok(SchemeKind::Argon2),
            "plaintext" | "plain" => Ok(SchemeKind::Plaintext),
            other => Err(format!("unknown password scheme '{}'", other)),
        }
    }
}

impl fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemeKind::Argon2 => write!(f, "argon2"),
            SchemeKind::Plaintext => write!(f, "plaintext"),
        }
    }
}

/// Hashes on the blocking pool so slow schemes don't stall the runtime.
pub async fn hash_password(passwords: &Passwords, password: &str) -> Result<String, AppError> {
    let passwords = passwords.clone();
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || passwords.hash(&password)).await?
}

pub async fn verify_password(
    passwords: &Passwords,
    password: &str,
    stored: &str,
) -> Result<bool, AppError> {
    let passwords = passwords.clone();
    let password = password.to_owned();
    let stored = stored.to_owned();
    tokio::task::spawn_blocking(move || passwords.verify(&password, &stored)).await?
}
