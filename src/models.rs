use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- Identity Schemas ---

/// User
///
/// The identity record stored in the session once a login succeeds.
/// It deliberately carries no password: credentials live in `config::Credentials`
/// and never enter the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
pub struct User {
    pub name: String,
    pub email: String,
    // Remote avatar image URL, rendered in the app user badge.
    pub avatar: String,
}

/// LoginRequest
///
/// Input payload for both the HTML login form (POST /login) and the JSON endpoint
/// (POST /api/session/login).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// --- City Schemas ---

/// Position
///
/// Geographic coordinates of a visited city, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema, Default)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

/// City
///
/// A single visited-city record. Field names follow the camelCase layout of the
/// seed data file so records can be loaded unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: String,
    pub city_name: String,
    pub country: String,
    // Flag emoji of the country.
    pub emoji: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
    pub position: Position,
}

/// Country
///
/// A country derived from the visited cities. Never stored: see `cities::derive_countries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Country {
    pub country: String,
    pub emoji: String,
}

/// Marker
///
/// The minimal record handed to the client-side mapping library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub city_name: String,
    pub emoji: String,
    pub lat: f64,
    pub lng: f64,
}

// --- Response Schemas ---

/// SessionView
///
/// Read-only snapshot of the session returned by the JSON API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub user: Option<User>,
    pub is_authenticated: bool,
}

/// ErrorResponse
///
/// JSON error envelope produced by `error::AppError`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
