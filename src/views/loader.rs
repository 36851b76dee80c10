use std::{collections::HashMap, path::PathBuf, sync::Arc, time::Duration};

use async_trait::async_trait;
use tera::{Context, Tera};
use tokio::sync::OnceCell;

use super::{ViewError, ViewId};

/// Templates every page module is compiled together with.
pub(crate) const BASE_TEMPLATE: &str = include_str!("../../templates/base.html");
pub(crate) const PAGE_NAV_TEMPLATE: &str = include_str!("../../templates/page_nav.html");

// 1. ModuleSource Contract
/// ModuleSource
///
/// Where the template source of a lazy page comes from. Swapping the
/// implementation changes the load behaviour (embedded, on-disk, or a test
/// source that holds the load open) without touching the navigation code.
#[async_trait]
pub trait ModuleSource: Send + Sync {
    /// Returns the template source of a page view.
    async fn fetch(&self, view: ViewId) -> Result<String, ViewError>;
}

// 2. Embedded Implementation
/// EmbeddedModules
///
/// Page templates compiled into the binary. `latency` delays every fetch, which
/// makes the placeholder observable during local development.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedModules {
    latency: Duration,
}

impl EmbeddedModules {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    fn source(view: ViewId) -> Option<&'static str> {
        let source = match view {
            ViewId::Homepage => include_str!("../../templates/pages/homepage.html"),
            ViewId::Pricing => include_str!("../../templates/pages/pricing.html"),
            ViewId::Product => include_str!("../../templates/pages/product.html"),
            ViewId::Login => include_str!("../../templates/pages/login.html"),
            ViewId::AppLayout => include_str!("../../templates/pages/app_layout.html"),
            ViewId::PageNotFound => include_str!("../../templates/pages/page_not_found.html"),
            _ => return None,
        };
        Some(source)
    }
}

#[async_trait]
impl ModuleSource for EmbeddedModules {
    async fn fetch(&self, view: ViewId) -> Result<String, ViewError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Self::source(view)
            .map(str::to_string)
            .ok_or(ViewError::NotAPage(view))
    }
}

// 3. Directory Implementation
/// DirectoryModules
///
/// Reads `<root>/<view>.html` on first navigation, so page templates can be
/// edited without rebuilding.
#[derive(Debug, Clone)]
pub struct DirectoryModules {
    root: PathBuf,
}

impl DirectoryModules {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ModuleSource for DirectoryModules {
    async fn fetch(&self, view: ViewId) -> Result<String, ViewError> {
        if !view.is_page() {
            return Err(ViewError::NotAPage(view));
        }
        let path = self.root.join(view.template_name());
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ViewError::Source { view, source })
    }
}

/// ViewModule
///
/// A compiled page: its own Tera instance holding the shared base templates and
/// the page template.
#[derive(Debug)]
pub struct ViewModule {
    view: ViewId,
    tera: Tera,
}

impl ViewModule {
    pub fn compile(view: ViewId, source: &str) -> Result<Self, ViewError> {
        let mut tera = Tera::default();
        let name = view.template_name();
        tera.add_raw_templates(vec![
            ("base.html", BASE_TEMPLATE),
            ("page_nav.html", PAGE_NAV_TEMPLATE),
            (name.as_str(), source),
        ])?;
        Ok(Self { view, tera })
    }

    pub fn view(&self) -> ViewId {
        self.view
    }

    pub fn render(&self, context: &Context) -> Result<String, ViewError> {
        Ok(self.tera.render(&self.view.template_name(), context)?)
    }
}

/// LoadState
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Ready,
}

/// LazyView
///
/// One page loaded at most once. The cell goes from empty to filled exactly once;
/// concurrent first loads wait on the same initialization instead of fetching
/// again. A failed load leaves the cell empty so the next navigation retries.
#[derive(Debug)]
pub struct LazyView {
    view: ViewId,
    cell: OnceCell<Arc<ViewModule>>,
}

impl LazyView {
    pub fn new(view: ViewId) -> Self {
        Self {
            view,
            cell: OnceCell::new(),
        }
    }

    pub fn state(&self) -> LoadState {
        if self.cell.initialized() {
            LoadState::Ready
        } else {
            LoadState::Pending
        }
    }

    pub fn get(&self) -> Option<Arc<ViewModule>> {
        self.cell.get().cloned()
    }

    pub async fn load(&self, source: &dyn ModuleSource) -> Result<Arc<ViewModule>, ViewError> {
        let module = self
            .cell
            .get_or_try_init(|| async {
                tracing::debug!(view = %self.view, "Loading view module");
                let template = source.fetch(self.view).await?;
                let module = ViewModule::compile(self.view, &template)?;
                tracing::info!(view = %self.view, "View module ready");
                Ok::<_, ViewError>(Arc::new(module))
            })
            .await?;
        Ok(module.clone())
    }
}

/// ViewModules
///
/// Registry of every lazy page, sharing one `ModuleSource`.
pub struct ViewModules {
    source: Arc<dyn ModuleSource>,
    views: HashMap<ViewId, LazyView>,
}

impl ViewModules {
    pub fn new(source: Arc<dyn ModuleSource>) -> Self {
        let views = ViewId::PAGES
            .iter()
            .map(|view| (*view, LazyView::new(*view)))
            .collect();
        Self { source, views }
    }

    fn lazy(&self, view: ViewId) -> Result<&LazyView, ViewError> {
        self.views.get(&view).ok_or(ViewError::NotAPage(view))
    }

    pub fn state(&self, view: ViewId) -> Result<LoadState, ViewError> {
        Ok(self.lazy(view)?.state())
    }

    /// The compiled module, only if it has already been loaded.
    pub fn ready(&self, view: ViewId) -> Result<Option<Arc<ViewModule>>, ViewError> {
        Ok(self.lazy(view)?.get())
    }

    pub async fn load(&self, view: ViewId) -> Result<Arc<ViewModule>, ViewError> {
        self.lazy(view)?.load(self.source.as_ref()).await
    }
}
