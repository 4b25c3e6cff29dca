//! Routing abstraction shared by pages, the route guard and the transport.
//!
//! SYSTEM CONTEXT
//! ==============
//! The transport never navigates by itself: when a 401 invalidates the
//! session, the auth controller's listener asks the [`Navigator`] for
//! [`Route::Login`]. Pages hold a [`RouteScope`] so completions that land
//! after a navigation can be dropped instead of applied.

#[cfg(test)]
#[path = "router_test.rs"]
mod router_test;

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

/// Every view the application can show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Templates,
    Dashboard,
    /// `/editor` creates a new site; `/editor/{id}` edits an existing one.
    Editor(Option<String>),
    NotFound,
}

impl Route {
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_owned(),
            Self::Login => "/login".to_owned(),
            Self::Register => "/register".to_owned(),
            Self::Templates => "/templates".to_owned(),
            Self::Dashboard => "/dashboard".to_owned(),
            Self::Editor(None) => "/editor".to_owned(),
            Self::Editor(Some(id)) => format!("/editor/{id}"),
            Self::NotFound => "/404".to_owned(),
        }
    }

    /// Resolve a path; anything unknown is [`Route::NotFound`].
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Self::Home,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["templates"] => Self::Templates,
            ["dashboard"] => Self::Dashboard,
            ["editor"] => Self::Editor(None),
            ["editor", id] => Self::Editor(Some((*id).to_owned())),
            _ => Self::NotFound,
        }
    }

    /// Views that require a signed-in user.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        matches!(self, Self::Dashboard | Self::Editor(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Something that can move the application to another view.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Location {
    route: Route,
    /// Bumped on every navigation, including to the same route.
    generation: u64,
}

/// Watch-channel router holding the current route.
#[derive(Clone, Debug)]
pub struct Router {
    tx: Arc<watch::Sender<Location>>,
}

impl Router {
    #[must_use]
    pub fn new(initial: Route) -> Self {
        let (tx, _rx) = watch::channel(Location { route: initial, generation: 0 });
        Self { tx: Arc::new(tx) }
    }

    #[must_use]
    pub fn current(&self) -> Route {
        self.tx.borrow().route.clone()
    }

    /// Number of navigations since construction.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.tx.borrow().generation
    }

    /// Capture the current location; see [`RouteScope::is_current`].
    #[must_use]
    pub fn scope(&self) -> RouteScope {
        RouteScope { router: self.clone(), generation: self.generation() }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl Navigator for Router {
    fn navigate(&self, route: Route) {
        tracing::debug!(to = %route, "navigate");
        self.tx.send_modify(|loc| {
            loc.route = route;
            loc.generation = loc.generation.wrapping_add(1);
        });
    }
}

/// Snapshot of the router taken when a page starts work.
#[derive(Clone, Debug)]
pub struct RouteScope {
    router: Router,
    generation: u64,
}

impl RouteScope {
    /// `false` once any navigation happened after the scope was taken;
    /// results arriving after that belong to an abandoned view.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.router.generation() == self.generation
    }

    /// Where the router went, if it moved.
    #[must_use]
    pub fn redirected_to(&self) -> Option<Route> {
        (!self.is_current()).then(|| self.router.current())
    }
}
