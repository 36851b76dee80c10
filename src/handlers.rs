use axum::{
    Form, Json,
    extract::{Path, State},
    http::{HeaderValue, Method, StatusCode, Uri, header},
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    AppState,
    auth::AuthUser,
    cities::derive_countries,
    models::{City, Country, ErrorResponse, LoginRequest, SessionView},
    navigation::LOGIN_PATH,
    shell::{Frame, Navigation, RenderOptions},
};

use crate::error::AppError;

/// Where a successful form login lands.
const APP_PATH: &str = "/app";

/// Seconds the browser waits before asking again for a page still loading.
const PLACEHOLDER_REFRESH: &str = "1";

// --- Page Handlers ---

/// render_page
///
/// [Public Route] Fallback for every path without a dedicated handler. The path is
/// handed to the navigation shell: a rendered page (404 for the not-found view),
/// or a redirect issued by the session gate. While the page module is still
/// loading the spinner is served with a `Refresh` header, so the browser keeps
/// showing it until the page is ready.
pub async fn render_page(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Result<Response, AppError> {
    if method != Method::GET && method != Method::HEAD {
        return Err(AppError::MethodNotAllowed(method));
    }

    match state.shell.poll(uri.path()).await? {
        Frame::Placeholder(html) => {
            let mut response = Html(html).into_response();
            let headers = response.headers_mut();
            headers.insert(header::REFRESH, HeaderValue::from_static(PLACEHOLDER_REFRESH));
            headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
            Ok(response)
        }
        Frame::Ready(navigation) => Ok(navigation_response(navigation, StatusCode::OK)),
    }
}

/// login_form
///
/// [Public Route] HTML login form submission. Success redirects into the app; a
/// credential mismatch leaves the session unchanged and re-renders the login page
/// with a message and status 401.
pub async fn login_form(
    State(state): State<AppState>,
    Form(payload): Form<LoginRequest>,
) -> Result<Response, AppError> {
    match state.gate.login(&payload.email, &payload.password).await {
        Ok(_) => Ok(Redirect::to(APP_PATH).into_response()),
        Err(error) => {
            let options = RenderOptions {
                flash: Some(error.to_string()),
                email: Some(payload.email),
            };
            let navigation = state.shell.navigate_with(LOGIN_PATH, options).await?;
            Ok(navigation_response(navigation, StatusCode::UNAUTHORIZED))
        }
    }
}

/// logout_form
///
/// [Public Route] Clears the session and returns to the homepage.
pub async fn logout_form(State(state): State<AppState>) -> Redirect {
    state.gate.logout().await;
    Redirect::to("/")
}

fn navigation_response(navigation: Navigation, status: StatusCode) -> Response {
    match navigation {
        Navigation::Render(page) if page.not_found => {
            (StatusCode::NOT_FOUND, Html(page.html)).into_response()
        }
        Navigation::Render(page) => (status, Html(page.html)).into_response(),
        Navigation::Redirect(target) => Redirect::to(target).into_response(),
    }
}

// --- Session API ---

/// get_session
///
/// [Public Route] Current session snapshot.
#[utoipa::path(
    get,
    path = "/api/session",
    responses((status = 200, description = "Current session", body = SessionView))
)]
pub async fn get_session(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.gate.snapshot().await.view())
}

/// api_login
///
/// [Public Route] JSON credential check.
#[utoipa::path(
    post,
    path = "/api/session/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = SessionView),
        (status = 401, description = "Credentials rejected", body = ErrorResponse)
    )
)]
pub async fn api_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionView>, AppError> {
    state.gate.login(&payload.email, &payload.password).await?;
    Ok(Json(state.gate.snapshot().await.view()))
}

/// api_logout
///
/// [Public Route] Resets the session to anonymous. Always succeeds.
#[utoipa::path(
    post,
    path = "/api/session/logout",
    responses((status = 200, description = "Anonymous session", body = SessionView))
)]
pub async fn api_logout(State(state): State<AppState>) -> Json<SessionView> {
    state.gate.logout().await;
    Json(state.gate.snapshot().await.view())
}

// --- City API ---

/// list_cities
///
/// [Authenticated Route] Every visited city.
#[utoipa::path(
    get,
    path = "/api/cities",
    responses(
        (status = 200, description = "Visited cities", body = [City]),
        (status = 401, description = "Anonymous session", body = ErrorResponse)
    )
)]
pub async fn list_cities(_user: AuthUser, State(state): State<AppState>) -> Json<Vec<City>> {
    Json(state.cities.list_cities().await)
}

/// get_city
///
/// [Authenticated Route] One city by id.
#[utoipa::path(
    get,
    path = "/api/cities/{id}",
    params(("id" = String, Path, description = "City ID")),
    responses(
        (status = 200, description = "Found", body = City),
        (status = 404, description = "Unknown city", body = ErrorResponse)
    )
)]
pub async fn get_city(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<City>, AppError> {
    state
        .cities
        .get_city(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("city {id}")))
}

/// list_countries
///
/// [Authenticated Route] Countries derived from the visited cities on every call.
#[utoipa::path(
    get,
    path = "/api/countries",
    responses((status = 200, description = "Visited countries", body = [Country]))
)]
pub async fn list_countries(_user: AuthUser, State(state): State<AppState>) -> Json<Vec<Country>> {
    let cities = state.cities.list_cities().await;
    Json(derive_countries(&cities))
}
