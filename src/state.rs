use std::sync::Arc;

use axum::extract::FromRef;
use parking_lot::RwLock;

use crate::{config::Config, store::Database, utils::hash::Passwords};

/// Shared handle to the store. Guards must never be held across `.await`.
pub type Db = Arc<RwLock<Database>>;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Config,
    pub passwords: Passwords,
}

impl AppState {
    pub fn new(config: Config, database: Database) -> Self {
        let passwords = config.password_scheme.build();
        Self {
            db: Arc::new(RwLock::new(database)),
            config,
            passwords,
        }
    }
}

impl FromRef<AppState> for Db {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Passwords {
    fn from_ref(state: &AppState) -> Self {
        state.passwords.clone()
    }
}
