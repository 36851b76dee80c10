use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::{
    config::Credentials,
    error::AppError,
    models::User,
    session::{Session, SessionAction, SessionError},
};

/// AuthError
///
/// Failures surfaced by the credential check. The session is never modified when
/// one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("email or password is incorrect")]
    InvalidCredentials,
}

/// SessionGate
///
/// Owns the process-wide session and the two transitions that change it.
/// Cloning the gate shares the same session; consumers receive it by injection
/// (application state, `SessionScope`) and never construct their own.
#[derive(Clone)]
pub struct SessionGate {
    state: Arc<RwLock<Session>>,
    credentials: Arc<Credentials>,
}

impl SessionGate {
    /// new
    ///
    /// Creates a gate in the anonymous state, accepting exactly one account.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            state: Arc::new(RwLock::new(Session::anonymous())),
            credentials: Arc::new(credentials),
        }
    }

    /// snapshot
    ///
    /// A copy of the current state. Reads never observe a half-applied transition
    /// because the reducer replaces the whole value under the write lock.
    pub async fn snapshot(&self) -> Session {
        self.state.read().await.clone()
    }

    /// dispatch
    ///
    /// Runs one action through `Session::reduce` and stores the result.
    pub async fn dispatch(&self, action: SessionAction) -> Session {
        let mut guard = self.state.write().await;
        let current = std::mem::take(&mut *guard);
        *guard = current.reduce(action);
        guard.clone()
    }

    /// login
    ///
    /// Transitions to authenticated only when both fields match the configured
    /// account. A mismatch leaves the session untouched and is reported as
    /// `AuthError::InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if !self.credentials.matches(email, password) {
            tracing::warn!(email = %email, "Login rejected: credentials do not match");
            return Err(AuthError::InvalidCredentials);
        }

        let user = self.credentials.identity();
        self.dispatch(SessionAction::Login(user.clone())).await;
        tracing::info!(email = %user.email, "Session authenticated");
        Ok(user)
    }

    /// logout
    ///
    /// Unconditionally resets the session to anonymous.
    pub async fn logout(&self) {
        self.dispatch(SessionAction::Logout).await;
        tracing::info!("Session cleared");
    }
}

/// SessionScope
///
/// The provisioning scope handed down the render path. A scope created with
/// `provide` gives access to the gate; a `detached` scope models a consumer placed
/// outside any provider, and every read from it fails with
/// `SessionError::OutsideProvider`.
#[derive(Clone, Default)]
pub struct SessionScope {
    gate: Option<SessionGate>,
}

impl SessionScope {
    pub fn provide(gate: SessionGate) -> Self {
        Self { gate: Some(gate) }
    }

    pub fn detached() -> Self {
        Self { gate: None }
    }

    /// use_session
    ///
    /// Resolves the gate or fails fast.
    pub fn use_session(&self) -> Result<&SessionGate, SessionError> {
        self.gate.as_ref().ok_or(SessionError::OutsideProvider)
    }
}

/// AuthUser
///
/// Extractor resolving the identity of the current session. Rejects with
/// `AppError::Unauthorized` (401) while the session is anonymous, so any handler
/// taking an `AuthUser` argument is only reachable after login.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    SessionGate: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gate = SessionGate::from_ref(state);
        let session = gate.snapshot().await;

        match (session.is_authenticated(), session.user()) {
            (true, Some(user)) => Ok(AuthUser(user.clone())),
            _ => Err(AppError::Unauthorized),
        }
    }
}
