//! Route lookup.
//!
//! # Responsibilities
//! - Hold the two compiled route patterns
//! - Resolve dot segments (`.`, `..`, `%2e` forms) in the request path
//! - Resolve a request path to a matched route or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (shared without locks)
//! - Fixed evaluation order: list route first, then detail route
//! - First match wins

use url::Url;

use crate::routing::matcher::RoutePattern;

/// A resolved route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/` - list all todos.
    ListTodos,
    /// `/todos/:id` - a single todo.
    TodoDetail { id: String },
}

impl Route {
    /// Route template, used for span names and metric labels.
    pub fn template(&self) -> &'static str {
        match self {
            Route::ListTodos => Router::LIST_TEMPLATE,
            Route::TodoDetail { .. } => Router::DETAIL_TEMPLATE,
        }
    }
}

/// Compiled route table.
#[derive(Debug, Clone)]
pub struct Router {
    list: RoutePattern,
    detail: RoutePattern,
}

impl Router {
    pub const LIST_TEMPLATE: &'static str = "/";
    pub const DETAIL_TEMPLATE: &'static str = "/todos/:id";

    pub fn new() -> Self {
        Self {
            list: RoutePattern::new(Self::LIST_TEMPLATE),
            detail: RoutePattern::new(Self::DETAIL_TEMPLATE),
        }
    }

    /// Find the route for a request path, after dot-segment resolution.
    pub fn match_path(&self, path: &str) -> Option<Route> {
        let path = normalize_path(path)?;

        if self.list.test(&path) {
            return Some(Route::ListTodos);
        }

        self.detail.exec(&path).and_then(|params| {
            params.get("id").map(|id| Route::TodoDetail { id: id.to_string() })
        })
    }
}

/// Resolve dot segments the way a URL parser does, so `/todos/..` is `/`
/// and `/todos/%2e` is `/todos/`. Trailing and repeated slashes are kept.
pub fn normalize_path(path: &str) -> Option<String> {
    let mut url = Url::parse("http://localhost/").ok()?;
    url.set_path(path);
    Some(url.path().to_string())
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
