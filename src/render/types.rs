//! Renderer types and traits
//!
//! Defines the small set of browser verbs the scraper depends on.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::fmt;

/// How an element is located on a rendered page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// CSS selector
    Css(String),
    /// XPath expression
    XPath(String),
    /// Single class name
    Class(String),
}

impl Selector {
    /// CSS selector
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// XPath expression
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Class name
    pub fn class(name: impl Into<String>) -> Self {
        Self::Class(name.into())
    }

    /// CSS form of the selector, when one exists
    pub fn to_css(&self) -> Option<String> {
        match self {
            Selector::Css(css) => Some(css.clone()),
            Selector::Class(name) => Some(format!(".{name}")),
            Selector::XPath(_) => None,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Css(css) => write!(f, "css `{css}`"),
            Selector::XPath(expr) => write!(f, "xpath `{expr}`"),
            Selector::Class(name) => write!(f, "class `{name}`"),
        }
    }
}

/// A rendered-page session (browser automation driver).
///
/// Lookups that find nothing return `Ok(None)` / an empty list; `Err` is
/// reserved for a broken session.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Handle to an element on the current page. Equal handles refer to the
    /// same DOM node.
    type Element: Clone + PartialEq + Send + Sync;

    /// Load a URL
    async fn navigate(&self, url: &str) -> Result<()>;

    /// First element matching `selector`
    async fn find_element(&self, selector: &Selector) -> Result<Option<Self::Element>>;

    /// First descendant of `parent` matching `selector`
    async fn find_within(
        &self,
        parent: &Self::Element,
        selector: &Selector,
    ) -> Result<Option<Self::Element>>;

    /// First element matching `selector`, failing with
    /// [`Error::ElementNotFound`] when there is none
    async fn require_element(&self, selector: &Selector) -> Result<Self::Element> {
        self.find_element(selector)
            .await?
            .ok_or_else(|| Error::element_not_found(selector.to_string()))
    }

    /// All elements matching `selector`, in document order
    async fn list_elements(&self, selector: &Selector) -> Result<Vec<Self::Element>>;

    /// Click an element
    async fn click(&self, element: &Self::Element) -> Result<()>;

    /// Scroll the page until the element is visible
    async fn scroll_into_view(&self, element: &Self::Element) -> Result<()>;

    /// Visible text of an element
    async fn read_text(&self, element: &Self::Element) -> Result<String>;

    /// URL of the current page
    async fn current_url(&self) -> Result<String>;

    /// End the session
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
