use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use tokio::sync::Semaphore;
use tower::util::ServiceExt;
use worldwise::{
    AppConfig, AppState, InMemoryCityRepository, create_router,
    models::{City, Country, SessionView},
    repository::CityRepositoryState,
    views::{EmbeddedModules, ModuleSource, ViewError, ViewId},
};

fn state_with(source: Arc<dyn ModuleSource>) -> AppState {
    let cities = Arc::new(InMemoryCityRepository::embedded().unwrap()) as CityRepositoryState;
    AppState::new(AppConfig::default(), cities, source).unwrap()
}

/// Router whose page modules are already loaded, so pages render on first request.
async fn app() -> Router {
    let state = state_with(Arc::new(EmbeddedModules::default()));
    for view in ViewId::PAGES {
        state.shell.modules().load(view).await.unwrap();
    }
    create_router(state)
}

/// Holds every page fetch open until the test adds a permit.
struct HeldModules {
    gate: Arc<Semaphore>,
}

#[async_trait]
impl ModuleSource for HeldModules {
    async fn fetch(&self, view: ViewId) -> Result<String, ViewError> {
        self.gate.acquire().await.expect("semaphore closed").forget();
        EmbeddedModules::default().fetch(view).await
    }
}

async fn send(app: &Router, request: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

async fn login(app: &Router) {
    let response = send(
        app,
        post_form("/login", "email=peter%40example.com&password=qwerty"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/app");
}

// --- Tests ---

#[tokio::test]
async fn test_health_check() {
    let app = app().await;
    let response = send(&app, get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = app().await;
    let response = send(&app, get("/")).await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_homepage_renders() {
    let app = app().await;
    let response = send(&app, get("/")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains(r#"data-view="homepage""#));
}

#[tokio::test]
async fn test_unknown_path_is_404_page() {
    let app = app().await;

    for uri in ["/nowhere", "/app/unknown", "/logout"] {
        let response = send(&app, get(uri)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert!(body_string(response).await.contains("Page not found"));
    }
}

#[tokio::test]
async fn test_anonymous_app_redirects_to_login() {
    let app = app().await;
    let response = send(&app, get("/app/countries")).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_form_login_flow() {
    let app = app().await;
    login(&app).await;

    let bare = send(&app, get("/app")).await;
    assert_eq!(bare.status(), StatusCode::OK);
    let explicit = send(&app, get("/app/cities")).await;
    assert_eq!(body_string(bare).await, body_string(explicit).await);

    // The login page now bounces into the app.
    let response = send(&app, get("/login")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/app");

    let response = send(&app, post_form("/logout", "")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let response = send(&app, get("/app")).await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_form_login_failure_shows_message_and_keeps_session() {
    let app = app().await;
    let response = send(
        &app,
        post_form("/login", "email=peter%40example.com&password=wrong"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let html = body_string(response).await;
    assert!(html.contains("email or password is incorrect"));
    assert!(html.contains("peter@example.com"));

    let session = send(&app, get("/api/session")).await;
    let session: SessionView = serde_json::from_str(&body_string(session).await).unwrap();
    assert_eq!(session, SessionView::default());
}

#[tokio::test]
async fn test_json_session_api() {
    let app = app().await;

    let rejected = send(
        &app,
        post_json(
            "/api/session/login",
            serde_json::json!({ "email": "peter@example.com", "password": "nope" }),
        ),
    )
    .await;
    assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);
    let error: serde_json::Value = serde_json::from_str(&body_string(rejected).await).unwrap();
    assert_eq!(error["error"], "email or password is incorrect");

    let accepted = send(
        &app,
        post_json(
            "/api/session/login",
            serde_json::json!({ "email": "peter@example.com", "password": "qwerty" }),
        ),
    )
    .await;
    assert_eq!(accepted.status(), StatusCode::OK);
    let session: serde_json::Value = serde_json::from_str(&body_string(accepted).await).unwrap();
    assert_eq!(session["isAuthenticated"], true);
    assert_eq!(session["user"]["name"], "Peter");
    assert!(session["user"].get("password").is_none());

    let cleared = send(&app, post_json("/api/session/logout", serde_json::json!({}))).await;
    let session: SessionView = serde_json::from_str(&body_string(cleared).await).unwrap();
    assert_eq!(session, SessionView::default());
}

#[tokio::test]
async fn test_city_api_requires_session() {
    let app = app().await;

    for uri in ["/api/cities", "/api/cities/73930385", "/api/countries"] {
        let response = send(&app, get(uri)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn test_city_api_after_login() {
    let app = app().await;
    login(&app).await;

    let response = send(&app, get("/api/cities")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cities: Vec<City> = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(cities.len(), 4);

    let response = send(&app, get("/api/cities/98443197")).await;
    let madrid: City = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(madrid.city_name, "Madrid");

    let response = send(&app, get("/api/cities/unknown")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, get("/api/countries")).await;
    let countries: Vec<Country> = serde_json::from_str(&body_string(response).await).unwrap();
    let names: Vec<&str> = countries.iter().map(|c| c.country.as_str()).collect();
    assert_eq!(names, vec!["Portugal", "Spain", "Germany"]);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = app().await;
    let response = send(&app, get("/api-docs/openapi.json")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("/api/countries"));
}

#[tokio::test]
async fn test_spinner_is_served_while_page_module_loads() {
    let gate = Arc::new(Semaphore::new(0));
    let state = state_with(Arc::new(HeldModules { gate: gate.clone() }));
    let shell = state.shell.clone();
    let app = create_router(state);

    for _ in 0..2 {
        let response = send(&app, get("/")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::REFRESH).unwrap(), "1");
        let html = body_string(response).await;
        assert!(html.contains(r#"data-view="loading""#));
        assert!(!html.contains(r#"data-view="homepage""#));
    }

    gate.add_permits(1);
    shell.modules().load(ViewId::Homepage).await.unwrap();

    let response = send(&app, get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!response.headers().contains_key(header::REFRESH));
    assert!(body_string(response).await.contains(r#"data-view="homepage""#));
}

#[tokio::test]
async fn test_login_page_is_prefilled_with_demo_account() {
    let app = app().await;
    let response = send(&app, get("/login")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains(r#"name="email" value="peter@example.com""#));
    assert!(html.contains(r#"name="password" value="qwerty""#));
}

#[tokio::test]
async fn test_pages_only_answer_get_and_head() {
    let app = app().await;

    let head = Request::builder()
        .method("HEAD")
        .uri("/pricing")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, head).await.status(), StatusCode::OK);

    for method in ["POST", "DELETE", "PUT"] {
        let request = Request::builder()
            .method(method)
            .uri("/pricing")
            .body(Body::empty())
            .unwrap();
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "GET, HEAD");
    }
}
