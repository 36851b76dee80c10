use crate::session::Session;

/// The view anonymous users are sent to when they hit a protected route.
pub const LOGIN_PATH: &str = "/login";

/// Access
///
/// Whether a route subtree may be rendered for anonymous sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
}

/// Admission
///
/// Outcome of the protected-subtree wrapper for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Render,
    Redirect(&'static str),
}

/// admit
///
/// Consulted on every render of a route. Anonymous sessions are redirected away
/// from protected subtrees; everything else renders unchanged. The check is
/// synchronous, so there is no pending state.
pub fn admit(access: Access, session: &Session) -> Admission {
    match access {
        Access::Public => Admission::Render,
        Access::Protected if session.is_authenticated() => Admission::Render,
        Access::Protected => Admission::Redirect(LOGIN_PATH),
    }
}
