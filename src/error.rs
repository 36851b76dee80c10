use axum::{
    Json,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{auth::AuthError, models::ErrorResponse, navigation::NavigationError};

/// AppError
///
/// Edge error type for the HTTP layer. Domain errors convert into it with `?`
/// and it renders as a JSON `{ "error": ... }` envelope.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("authentication required")]
    Unauthorized,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{0} not found")]
    NotFound(String),
    #[error("method {0} is not allowed for pages")]
    MethodNotAllowed(Method),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Navigation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Server-side failures are programmer errors such as a missing provider
        // or a broken template. They are logged before being reported.
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let allow = matches!(self, Self::MethodNotAllowed(_));
        let body = ErrorResponse {
            error: self.to_string(),
        };
        let mut response = (status, Json(body)).into_response();
        if allow {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("GET, HEAD"));
        }
        response
    }
}
