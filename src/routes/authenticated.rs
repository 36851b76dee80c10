use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// JSON endpoints backing the app views. The whole router is wrapped in the
/// authentication middleware in `create_router`, and each handler also takes an
/// `AuthUser`, so an anonymous session gets a 401 either way.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /api/cities
        .route("/api/cities", get(handlers::list_cities))
        // GET /api/cities/{id}
        .route("/api/cities/{id}", get(handlers::get_city))
        // GET /api/countries
        // Derived from the city list on every request.
        .route("/api/countries", get(handlers::list_countries))
}
