use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a session: health, the login/logout form targets
/// and the session JSON API.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe.
        .route("/health", get(|| async { "ok" }))
        // GET|POST /login
        // GET renders the login view like any other page; POST is the form submission.
        .route(
            "/login",
            get(handlers::render_page).post(handlers::login_form),
        )
        // GET|POST /logout
        // Only POST has a meaning; GET falls back to page navigation (not found).
        .route(
            "/logout",
            get(handlers::render_page).post(handlers::logout_form),
        )
        // GET /api/session
        .route("/api/session", get(handlers::get_session))
        // POST /api/session/login
        .route("/api/session/login", post(handlers::api_login))
        // POST /api/session/logout
        .route("/api/session/logout", post(handlers::api_logout))
}
