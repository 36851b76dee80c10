use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Session state, the gate around it and the request extractor.
pub mod auth;
pub mod session;

// Navigation: route table, guard, lazy views and the shell composing them.
pub mod navigation;
pub mod shell;
pub mod views;

// Data and HTTP plumbing.
pub mod cities;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;

// Module for routing segregation (Public, Authenticated).
pub mod routes;
use auth::{AuthUser, SessionScope};
use config::Env;
use navigation::RouteTable;
use routes::{authenticated, public};
use shell::DemoLogin;
use views::{ModuleSource, ViewError, ViewModules};

// --- Public Re-exports ---

pub use auth::SessionGate;
pub use config::AppConfig;
pub use repository::{CityRepositoryState, InMemoryCityRepository};
pub use shell::Shell;

/// ApiDoc
///
/// OpenAPI document for the JSON endpoints, served at `/api-docs/openapi.json`.
/// Page navigation is HTML and is not described here.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_session, handlers::api_login, handlers::api_logout,
        handlers::list_cities, handlers::get_city, handlers::list_countries
    ),
    components(
        schemas(
            models::User, models::LoginRequest, models::SessionView, models::City,
            models::Position, models::Country, models::ErrorResponse,
        )
    ),
    tags(
        (name = "worldwise", description = "WorldWise visited-cities API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single container of shared services, cloned into every request. The
/// session gate is injected here once and reaches the shell and the extractors
/// from this one place.
#[derive(Clone)]
pub struct AppState {
    /// Navigation: route table, lazy page modules and partials.
    pub shell: Arc<Shell>,
    /// The process-wide session and its login/logout transitions.
    pub gate: SessionGate,
    /// Visited-city store.
    pub cities: CityRepositoryState,
    /// The loaded, immutable configuration.
    pub config: AppConfig,
}

impl AppState {
    /// new
    ///
    /// Wires the session gate into the shell's provider scope and builds the
    /// default route table over the given city store and page module source.
    pub fn new(
        config: AppConfig,
        cities: CityRepositoryState,
        source: Arc<dyn ModuleSource>,
    ) -> Result<Self, ViewError> {
        let gate = SessionGate::new(config.credentials.clone());
        let mut shell = Shell::new(
            RouteTable::default(),
            SessionScope::provide(gate.clone()),
            ViewModules::new(source),
            cities.clone(),
        )?;
        // Production credentials never end up in rendered HTML.
        if config.env == Env::Local {
            shell = shell.with_demo_login(DemoLogin {
                email: config.credentials.email.clone(),
                password: config.credentials.password.clone(),
            });
        }

        Ok(Self {
            shell: Arc::new(shell),
            gate,
            cities,
            config,
        })
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for SessionGate {
    fn from_ref(app_state: &AppState) -> SessionGate {
        app_state.gate.clone()
    }
}

impl FromRef<AppState> for CityRepositoryState {
    fn from_ref(app_state: &AppState) -> CityRepositoryState {
        app_state.cities.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Enforces an authenticated session for `authenticated_routes`. Extracting
/// `AuthUser` rejects anonymous sessions with 401 before the handler runs.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the routing structure, applies the scoped and global middleware,
/// and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        // 3. Page Navigation Fallback
        // Any path not claimed above goes through the route table; the shell
        // answers with a page, the loading placeholder, a redirect or the
        // not-found view.
        .fallback(handlers::render_page)
        .with_state(state);

    // 4. Observability and Correlation Layers
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span factory for `TraceLayer`. Pages are addressed by path alone, so the span
/// carries the path rather than the full URI, plus the `x-request-id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        req_id = %request_id,
    )
}
