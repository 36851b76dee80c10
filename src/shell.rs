use std::sync::Arc;

use chrono::{Datelike, Utc};
use tera::Context;

use crate::{
    auth::SessionScope,
    cities::map_markers,
    models::City,
    navigation::{Admission, NavigationError, Outlet, Resolution, RouteTable, admit},
    repository::CityRepositoryState,
    session::Session,
    views::{LoadState, Partials, ViewError, ViewId, ViewModules, render::OutletData},
};

/// Where an authenticated visitor of the login page is sent.
const APP_PATH: &str = "/app";

/// Page
///
/// A fully rendered navigation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub view: ViewId,
    pub outlet: Option<ViewId>,
    // True when the path matched nothing and the fallback view was rendered.
    pub not_found: bool,
    pub html: String,
}

/// Navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(Page),
    Redirect(&'static str),
}

/// Frame
///
/// What is on screen right now for a path: the placeholder while the page module
/// is still loading, then the resolved navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Placeholder(String),
    Ready(Navigation),
}

/// RenderOptions
///
/// Per-navigation extras for the login page: a message after a failed attempt and
/// the email to keep in the form.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub flash: Option<String>,
    pub email: Option<String>,
}

/// DemoLogin
///
/// Values the login form is prefilled with when no attempt has been made yet.
#[derive(Debug, Clone)]
pub struct DemoLogin {
    pub email: String,
    pub password: String,
}

/// Shell
///
/// Composes the route table, the session gate, the lazy page modules and the
/// eager partials. Every URL goes through the same steps: resolve, admit,
/// load the page module, render the outlet child, render the page around it.
pub struct Shell {
    routes: RouteTable,
    scope: SessionScope,
    modules: Arc<ViewModules>,
    partials: Partials,
    cities: CityRepositoryState,
    demo_login: Option<DemoLogin>,
}

impl Shell {
    pub fn new(
        routes: RouteTable,
        scope: SessionScope,
        modules: ViewModules,
        cities: CityRepositoryState,
    ) -> Result<Self, ViewError> {
        Ok(Self {
            routes,
            scope,
            modules: Arc::new(modules),
            partials: Partials::new()?,
            cities,
            demo_login: None,
        })
    }

    /// Prefills the login form of a fresh visit with these values.
    pub fn with_demo_login(mut self, demo_login: DemoLogin) -> Self {
        self.demo_login = Some(demo_login);
        self
    }

    pub fn modules(&self) -> &ViewModules {
        &self.modules
    }

    /// navigate
    ///
    /// Resolves and renders a path, waiting for the page module if it is not
    /// loaded yet.
    pub async fn navigate(&self, path: &str) -> Result<Navigation, NavigationError> {
        self.navigate_with(path, RenderOptions::default()).await
    }

    pub async fn navigate_with(
        &self,
        path: &str,
        options: RenderOptions,
    ) -> Result<Navigation, NavigationError> {
        let resolution = self.routes.resolve(path);
        let session = self.scope.use_session()?.snapshot().await;

        if let Some(target) = redirect_for(&resolution, &session) {
            tracing::debug!(path, target, "Navigation redirected");
            return Ok(Navigation::Redirect(target));
        }

        self.modules.load(resolution.view()).await?;
        self.render(&resolution, &session, options).await
    }

    /// poll
    ///
    /// Non-waiting variant of `navigate`. While the page module is pending this
    /// starts (or joins) its load in the background and returns the placeholder;
    /// once the module is ready it returns the rendered page. The placeholder is
    /// therefore shown for the whole load and replaced exactly once.
    pub async fn poll(&self, path: &str) -> Result<Frame, NavigationError> {
        let resolution = self.routes.resolve(path);
        let session = self.scope.use_session()?.snapshot().await;

        if let Some(target) = redirect_for(&resolution, &session) {
            return Ok(Frame::Ready(Navigation::Redirect(target)));
        }

        let view = resolution.view();
        if self.modules.state(view)? == LoadState::Pending {
            let modules = self.modules.clone();
            tokio::spawn(async move {
                if let Err(error) = modules.load(view).await {
                    tracing::error!(view = %view, error = %error, "View module failed to load");
                }
            });
            return Ok(Frame::Placeholder(self.partials.spinner()?));
        }

        let navigation = self
            .render(&resolution, &session, RenderOptions::default())
            .await?;
        Ok(Frame::Ready(navigation))
    }

    async fn render(
        &self,
        resolution: &Resolution,
        session: &Session,
        options: RenderOptions,
    ) -> Result<Navigation, NavigationError> {
        let view = resolution.view();
        let module = match self.modules.ready(view)? {
            Some(module) => module,
            None => self.modules.load(view).await?,
        };

        let mut context = Context::new();
        context.insert("session", &session.view());
        context.insert("flash", &options.flash);
        // A failed attempt keeps what was typed; a fresh visit gets the demo account.
        let (email, password) = match (options.email, &self.demo_login) {
            (Some(email), _) => (email, String::new()),
            (None, Some(demo)) => (demo.email.clone(), demo.password.clone()),
            (None, None) => (String::new(), String::new()),
        };
        context.insert("email", &email);
        context.insert("password", &password);

        let outlet = match resolution {
            Resolution::Matched(found) => found.outlet,
            Resolution::NotFound(_) => None,
        };

        if let Some(Outlet { view: child, .. }) = outlet {
            let cities = self.cities.list_cities().await;
            let city_id = match resolution {
                Resolution::Matched(found) => found.params.get("id").map(String::as_str),
                Resolution::NotFound(_) => None,
            };
            let outlet_html = self.partials.render_outlet(
                child,
                &OutletData {
                    cities: &cities,
                    city_id,
                },
            )?;

            context.insert("outlet", &outlet_html);
            context.insert("outlet_view", child.name());
            context.insert("active", active_tab(child));
            context.insert("markers", &markers_json(&cities));
            context.insert("year", &Utc::now().year());
        }

        let html = module.render(&context)?;
        Ok(Navigation::Render(Page {
            view,
            outlet: outlet.map(|outlet| outlet.view),
            not_found: matches!(resolution, Resolution::NotFound(_)),
            html,
        }))
    }
}

/// redirect_for
///
/// The protected-subtree wrapper, plus the login page bounce for sessions that
/// are already authenticated.
fn redirect_for(resolution: &Resolution, session: &Session) -> Option<&'static str> {
    match resolution {
        Resolution::Matched(found) => match admit(found.access, session) {
            Admission::Redirect(target) => Some(target),
            Admission::Render if found.view == ViewId::Login && session.is_authenticated() => {
                Some(APP_PATH)
            }
            Admission::Render => None,
        },
        Resolution::NotFound(_) => None,
    }
}

fn active_tab(child: ViewId) -> &'static str {
    match child {
        ViewId::CountryList => "countries",
        ViewId::Form => "form",
        _ => "cities",
    }
}

fn markers_json(cities: &[City]) -> String {
    // Serializing plain structs of strings and floats cannot fail.
    serde_json::to_string(&map_markers(cities)).unwrap_or_else(|_| "[]".to_string())
}
