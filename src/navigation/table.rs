use crate::views::ViewId;

use super::{
    guard::Access,
    pattern::{Params, PathPattern, split_path},
};

/// ChildRoute
///
/// A nested route rendered inside its parent's outlet.
#[derive(Debug, Clone)]
pub struct ChildRoute {
    pattern: PathPattern,
    view: ViewId,
}

/// RouteEntry
///
/// One top-level row of the route table. A leaf page has no children and no
/// index; a layout owns an outlet filled by one of its children, or by its index
/// view when the URL stops at the layout's own path.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pattern: PathPattern,
    view: ViewId,
    access: Access,
    index: Option<ViewId>,
    children: Vec<ChildRoute>,
}

impl RouteEntry {
    pub fn page(path: &str, view: ViewId) -> Self {
        Self {
            pattern: PathPattern::parse(path),
            view,
            access: Access::Public,
            index: None,
            children: Vec::new(),
        }
    }

    /// Alias of `page` for readability at layout rows; nesting comes from `index`/`child`.
    pub fn layout(path: &str, view: ViewId) -> Self {
        Self::page(path, view)
    }

    pub fn protected(mut self) -> Self {
        self.access = Access::Protected;
        self
    }

    pub fn index(mut self, view: ViewId) -> Self {
        self.index = Some(view);
        self
    }

    pub fn child(mut self, path: &str, view: ViewId) -> Self {
        self.children.push(ChildRoute {
            pattern: PathPattern::parse(path),
            view,
        });
        self
    }

    fn is_layout(&self) -> bool {
        self.index.is_some() || !self.children.is_empty()
    }

    fn resolve(&self, segments: &[&str]) -> Option<RouteMatch> {
        if !self.is_layout() {
            return self.pattern.match_exact(segments).map(|params| RouteMatch {
                view: self.view,
                access: self.access,
                outlet: None,
                params,
            });
        }

        let mut params = self.pattern.match_prefix(segments)?;
        let rest = segments.get(self.pattern.len()..).unwrap_or_default();

        let outlet = if rest.is_empty() {
            self.index.map(|view| Outlet { view, index: true })
        } else {
            let (child, child_params) = self
                .children
                .iter()
                .find_map(|child| child.pattern.match_exact(rest).map(|p| (child, p)))?;
            params.extend(child_params);
            Some(Outlet {
                view: child.view,
                index: false,
            })
        };

        Some(RouteMatch {
            view: self.view,
            access: self.access,
            outlet,
            params,
        })
    }
}

/// Outlet
///
/// The child view selected for a layout. `index` is true when the default child
/// was used because the URL had no nested segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outlet {
    pub view: ViewId,
    pub index: bool,
}

/// RouteMatch
///
/// A successful resolution: the top-level view, its access rule, the outlet
/// content (layouts only) and the captured path parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub view: ViewId,
    pub access: Access,
    pub outlet: Option<Outlet>,
    pub params: Params,
}

/// Resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Matched(RouteMatch),
    NotFound(ViewId),
}

impl Resolution {
    /// The top-level view that will be rendered for this resolution.
    pub fn view(&self) -> ViewId {
        match self {
            Self::Matched(found) => found.view,
            Self::NotFound(view) => *view,
        }
    }
}

/// RouteTable
///
/// Static, ordered URL-to-view mapping with one level of nesting. Built once at
/// startup and never mutated; entries are tried top-down and the first match
/// wins. Anything left unmatched resolves to the fallback view.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    fallback: ViewId,
}

impl RouteTable {
    pub fn new(entries: Vec<RouteEntry>, fallback: ViewId) -> Self {
        Self { entries, fallback }
    }

    pub fn resolve(&self, path: &str) -> Resolution {
        let segments = split_path(path);

        self.entries
            .iter()
            .find_map(|entry| entry.resolve(&segments))
            .map_or(Resolution::NotFound(self.fallback), Resolution::Matched)
    }
}

impl Default for RouteTable {
    /// default
    ///
    /// The application's navigation surface.
    fn default() -> Self {
        Self::new(
            vec![
                RouteEntry::page("/", ViewId::Homepage),
                RouteEntry::page("/pricing", ViewId::Pricing),
                RouteEntry::page("/product", ViewId::Product),
                RouteEntry::page("/login", ViewId::Login),
                RouteEntry::layout("/app", ViewId::AppLayout)
                    .protected()
                    .index(ViewId::CityList)
                    .child("cities", ViewId::CityList)
                    .child("cities/:id", ViewId::City)
                    .child("countries", ViewId::CountryList)
                    .child("form", ViewId::Form),
            ],
            ViewId::PageNotFound,
        )
    }
}
