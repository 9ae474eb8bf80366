//! Browser capability used by the scraper.
//!
//! The scraper only needs a handful of operations from a browser: navigate,
//! look elements up by CSS selector, check visibility, click, read text and
//! attributes. [`BrowserSession`] captures exactly that so the page logic can
//! run against headless Chrome in production and against static HTML in tests.

use thiserror::Error;

/// Errors raised by a browser session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no element matches `{selector}`")]
    ElementNotFound { selector: String },

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("element `{selector}` cannot be clicked")]
    NotInteractable { selector: String },

    #[error("browser error: {0}")]
    Browser(String),
}

impl SessionError {
    pub fn not_found(selector: &str) -> Self {
        SessionError::ElementNotFound {
            selector: selector.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SessionError::ElementNotFound { .. })
    }
}

/// A single browser tab driven by CSS selectors.
///
/// `Element` is an owned handle; it stays valid as long as the node it points
/// at is attached to the current document.
pub trait BrowserSession {
    type Element;

    /// Load `url` and wait for the navigation to finish
    fn navigate(&self, url: &str) -> Result<(), SessionError>;

    /// First match in the document, `ElementNotFound` when there is none
    fn find_element(&self, selector: &str) -> Result<Self::Element, SessionError> {
        self.find_elements(selector)?
            .into_iter()
            .next()
            .ok_or_else(|| SessionError::not_found(selector))
    }

    /// All matches in document order; empty when there are none
    fn find_elements(&self, selector: &str) -> Result<Vec<Self::Element>, SessionError>;

    fn find_child(&self, parent: &Self::Element, selector: &str) -> Result<Self::Element, SessionError> {
        self.find_children(parent, selector)?
            .into_iter()
            .next()
            .ok_or_else(|| SessionError::not_found(selector))
    }

    fn find_children(&self, parent: &Self::Element, selector: &str) -> Result<Vec<Self::Element>, SessionError>;

    fn is_displayed(&self, element: &Self::Element) -> Result<bool, SessionError>;

    fn click(&self, element: &Self::Element) -> Result<(), SessionError>;

    /// Rendered text of the element
    fn text(&self, element: &Self::Element) -> Result<String, SessionError>;

    fn attribute(&self, element: &Self::Element, name: &str) -> Result<Option<String>, SessionError>;
}
