//! URL-driven view composition.
//!
//! `table` resolves a path to a top-level view plus the child that fills its
//! outlet, `guard` decides whether the resolved subtree may render for the
//! current session, and `pattern` holds the segment matcher both rely on.

use thiserror::Error;

use crate::{session::SessionError, views::ViewError};

pub mod guard;
pub mod pattern;
pub mod table;

pub use guard::{Access, Admission, LOGIN_PATH, admit};
pub use pattern::{Params, PathPattern};
pub use table::{Outlet, Resolution, RouteEntry, RouteMatch, RouteTable};

/// NavigationError
///
/// Fatal failures while turning a URL into a rendered page. An unmatched path is
/// not one of them: it resolves to the not-found view.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    View(#[from] ViewError),
}
