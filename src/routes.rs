// src/routes.rs

use axum::{
    Router,
    http::{Method, header},
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{admin, auth, quiz, result, school},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Public routes: auth, public school listing, test lookup, result submission, admin tools.
/// * Protected routes sit behind `auth_middleware`.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    // Students load tests from arbitrary static pages.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let public_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/teachers", get(admin::list_teachers))
        .route("/schools/public", get(school::list_public_schools))
        .route("/all-schools", get(school::list_public_schools))
        .route("/tests/{school_id}", get(quiz::get_tests))
        .route("/results", post(result::submit_result))
        .route("/reset-data", post(admin::reset_data))
        .route("/debug/data", get(admin::debug_data))
        .route("/statistics", get(admin::statistics))
        .route("/status", get(admin::status));

    let protected_routes = Router::new()
        .route("/change-password", post(auth::change_password))
        .route("/schools", get(school::list_schools))
        .route("/schools/{school_id}/tests", post(quiz::create_test))
        .route("/schools/{school_id}/tests/{test_id}", put(quiz::update_test))
        .route("/results", get(result::list_results))
        .route("/results/{id}", delete(result::delete_result))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/", get(admin::index))
        .nest("/api", public_routes.merge(protected_routes))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
