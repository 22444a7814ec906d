//! Page definitions.

use std::fmt;

use facade_compose::{NodeResult, PageNode};

/// Declarative description of a page's content.
///
/// Composed once per export; the resulting tree is dropped after the page
/// is written.
pub trait Layout: Send + Sync {
    /// Build the page's root node.
    fn compose(&self) -> NodeResult;
}

impl<F> Layout for F
where
    F: Fn() -> NodeResult + Send + Sync,
{
    fn compose(&self) -> NodeResult {
        self()
    }
}

/// A titled page whose content comes from a [`Layout`].
pub struct Page {
    /// Document title
    pub title: String,

    /// Meta description
    pub description: Option<String>,

    layout: Box<dyn Layout>,
}

impl Page {
    /// Create a page from a layout.
    pub fn new(title: impl Into<String>, layout: impl Layout + 'static) -> Self {
        Self {
            title: title.into(),
            description: None,
            layout: Box::new(layout),
        }
    }

    /// Create a page from an already built tree.
    pub fn from_tree(title: impl Into<String>, tree: PageNode) -> Self {
        Self::new(title, move || -> NodeResult { Ok(tree.clone()) })
    }

    /// Set the meta description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build the page's node tree.
    pub fn compose(&self) -> NodeResult {
        self.layout.compose()
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("title", &self.title)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
