/// Router Module Index
///
/// Splits the HTTP surface by access level. Page navigation itself is not listed
/// here: every other path falls through to `handlers::render_page`, where the
/// route table and the session gate decide what to show.

/// Routes accessible to anonymous and authenticated sessions alike.
pub mod public;

/// Routes protected by the `AuthUser` extractor middleware.
/// Requires an authenticated session.
pub mod authenticated;
