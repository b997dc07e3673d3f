// src/main.rs

use std::net::SocketAddr;

use dotenvy::dotenv;
use quiz_api::config::Config;
use quiz_api::routes;
use quiz_api::state::AppState;
use quiz_api::store::{Database, seed};
use quiz_api::utils::hash::PasswordScheme;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    for warning in config.warnings() {
        tracing::warn!("{}", warning);
    }
    tracing::info!("Password scheme: {}", config.password_scheme);

    let database = load_snapshot(&config);
    let state = AppState::new(config.clone(), database);

    // Seed the demo account and school.
    match state.passwords.hash(seed::DEMO_PASSWORD) {
        Ok(demo_hash) => seed::ensure_defaults(&mut state.db.write(), &demo_hash),
        Err(e) => tracing::error!("Failed to seed default data: {}", e),
    }

    let app = routes::create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}

/// Reads the optional startup snapshot, repairing whatever is malformed.
fn load_snapshot(config: &Config) -> Database {
    let Some(path) = &config.snapshot_path else {
        return Database::new();
    };

    let raw = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()));

    match raw {
        Ok(value) => {
            tracing::info!("Loaded snapshot from {}", path.display());
            Database::recover(value)
        }
        Err(e) => {
            tracing::warn!("Ignoring snapshot {}: {}", path.display(), e);
            Database::new()
        }
    }
}
