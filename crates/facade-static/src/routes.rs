//! Route table mapping URL paths to pages.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::page::Page;

/// A registered path and its page.
#[derive(Debug)]
pub struct Route {
    path: String,
    page: Page,
}

impl Route {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn page(&self) -> &Page {
        &self.page
    }
}

/// Ordered, unique mapping from path to page.
#[derive(Debug, Default)]
pub struct RouteTable {
    /// Routes in registration order
    routes: Vec<Route>,

    /// Path to position in `routes`
    index: HashMap<String, usize>,
}

impl RouteTable {
    /// Create an empty route table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page at `path`.
    ///
    /// An existing registration at the same path is left in place.
    pub fn register(&mut self, path: impl Into<String>, page: Page) -> Result<(), RouteError> {
        let path = path.into();
        validate_path(&path)?;

        if self.index.contains_key(&path) {
            return Err(RouteError::Duplicate(path));
        }

        tracing::debug!("Registered route {}", path);
        self.index.insert(path.clone(), self.routes.len());
        self.routes.push(Route { path, page });
        Ok(())
    }

    /// Look up the page registered at `path`.
    pub fn resolve(&self, path: &str) -> Result<&Page, RouteError> {
        self.index
            .get(path)
            .map(|&i| &self.routes[i].page)
            .ok_or_else(|| RouteError::NotFound(path.to_string()))
    }

    /// Check whether a path is registered.
    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// Routes in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Fail unless the root path is registered.
    pub fn ensure_root(&self) -> Result<(), RouteError> {
        if self.contains("/") {
            Ok(())
        } else {
            Err(RouteError::MissingRoot)
        }
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn validate_path(path: &str) -> Result<(), RouteError> {
    static PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^/(?:[A-Za-z0-9._~-]+/?)*$").expect("Invalid route path regex")
    });

    let dot_segment = path.split('/').any(|s| s == "." || s == "..");
    if !PATH_RE.is_match(path) || dot_segment {
        return Err(RouteError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// Errors from registering or resolving routes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    #[error("Invalid route path: {0:?}")]
    InvalidPath(String),

    #[error("Route already registered: {0}")]
    Duplicate(String),

    #[error("Route not found: {0}")]
    NotFound(String),

    #[error("Route table has no root path \"/\"")]
    MissingRoot,
}
