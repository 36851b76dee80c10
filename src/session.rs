use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{SessionView, User};

/// SessionError
///
/// Programmer-error class failures of the session layer. Both variants are fatal:
/// they are returned immediately and never recovered from locally.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// A serialized action carried a `type` the reducer does not know.
    #[error("unknown session action: {0}")]
    UnknownAction(String),
    /// A consumer asked for the session gate from a scope that was never given one.
    #[error("session gate was read outside its provider scope")]
    OutsideProvider,
    /// A serialized action was not a JSON object with a `type` field.
    #[error("malformed session action: {0}")]
    Malformed(String),
}

/// Session
///
/// The two-state authentication model. The fields are private on purpose: the only
/// way to obtain a different `Session` is `Session::reduce`, which replaces `user`
/// and `is_authenticated` together. No other path can produce an
/// authenticated-but-userless (or the reverse) value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    user: Option<User>,
    is_authenticated: bool,
}

/// SessionAction
///
/// The transitions accepted by the reducer. The serialized shape is
/// `{"type": "login", "payload": {...}}` / `{"type": "logout"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum SessionAction {
    Login(User),
    Logout,
}

impl Session {
    /// anonymous
    ///
    /// The initial state: no user, not authenticated.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    /// reduce
    ///
    /// The single transition function. Consumes the current state and an action and
    /// returns the next state; both fields are always written in the same step.
    pub fn reduce(self, action: SessionAction) -> Self {
        match action {
            SessionAction::Login(user) => Self {
                user: Some(user),
                is_authenticated: true,
            },
            SessionAction::Logout => Self {
                user: None,
                is_authenticated: false,
            },
        }
    }

    /// view
    ///
    /// Snapshot used by the JSON API and the templates.
    pub fn view(&self) -> SessionView {
        SessionView {
            user: self.user.clone(),
            is_authenticated: self.is_authenticated,
        }
    }
}

impl SessionAction {
    /// from_json
    ///
    /// Decodes a serialized action. An unrecognized `type` is rejected with
    /// `SessionError::UnknownAction` before any state is touched.
    pub fn from_json(raw: &str) -> Result<Self, SessionError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| SessionError::Malformed(e.to_string()))?;

        let kind = value
            .get("type")
            .and_then(|kind| kind.as_str())
            .ok_or_else(|| SessionError::Malformed("missing `type` field".to_string()))?
            .to_string();

        match kind.as_str() {
            "login" | "logout" => serde_json::from_value(value)
                .map_err(|e| SessionError::Malformed(e.to_string())),
            _ => Err(SessionError::UnknownAction(kind)),
        }
    }
}
