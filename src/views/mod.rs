//! Views and their templates.
//!
//! Top-level pages are lazy: `loader` fetches and compiles their template on
//! first navigation. Child views rendered inside the app layout outlet, and the
//! full-page spinner, are compiled up front by `render::Partials`.

use std::fmt;

use thiserror::Error;

pub mod loader;
pub mod render;

pub use loader::{
    DirectoryModules, EmbeddedModules, LazyView, LoadState, ModuleSource, ViewModule, ViewModules,
};
pub use render::Partials;

/// ViewId
///
/// Every view the route table can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    Homepage,
    Pricing,
    Product,
    Login,
    AppLayout,
    PageNotFound,
    CityList,
    City,
    CountryList,
    Form,
}

impl ViewId {
    /// The lazily loaded top-level pages.
    pub const PAGES: [ViewId; 6] = [
        ViewId::Homepage,
        ViewId::Pricing,
        ViewId::Product,
        ViewId::Login,
        ViewId::AppLayout,
        ViewId::PageNotFound,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Homepage => "homepage",
            Self::Pricing => "pricing",
            Self::Product => "product",
            Self::Login => "login",
            Self::AppLayout => "app_layout",
            Self::PageNotFound => "page_not_found",
            Self::CityList => "city_list",
            Self::City => "city",
            Self::CountryList => "country_list",
            Self::Form => "form",
        }
    }

    /// Template file name; the `.html` suffix turns on Tera autoescaping.
    pub fn template_name(self) -> String {
        format!("{}.html", self.name())
    }

    pub fn is_page(self) -> bool {
        Self::PAGES.contains(&self)
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// ViewError
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
    #[error("failed to load view module {view}: {source}")]
    Source {
        view: ViewId,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not a lazily loaded page")]
    NotAPage(ViewId),
    #[error("{0} cannot be rendered inside an outlet")]
    NotAPartial(ViewId),
}
