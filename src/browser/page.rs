//! Contract for the external browser-automation collaborator.
//!
//! Every interaction is bounded by an explicit timeout. Expiry surfaces as
//! [`PageError::Timeout`], which calling flows may treat as retryable. Once
//! the page or its context is torn down every call fails with
//! [`PageError::Closed`].

use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Element state awaited by [`Page::wait_for`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState {
    /// Present in the DOM
    Attached,
    /// Not present in the DOM
    Detached,
    /// Present and visible
    Visible,
    /// Absent or not visible
    Hidden,
}

/// Page load milestone awaited by [`Page::wait_for_load_state`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Load,
    DomContentLoaded,
    /// No in-flight network activity
    NetworkIdle,
}

/// A single browser page driven by the harness
pub trait Page {
    /// Navigate to an absolute URL
    fn navigate(&mut self, url: &str, timeout: Duration) -> PageResult<()>;

    /// Wait until the element matched by `selector` reaches `state`
    fn wait_for(&self, selector: &str, state: WaitState, timeout: Duration) -> PageResult<()>;

    /// Replace the value of an input element
    fn fill(&mut self, selector: &str, value: &str, timeout: Duration) -> PageResult<()>;

    fn click(&mut self, selector: &str, timeout: Duration) -> PageResult<()>;

    /// Read the current value of an input element
    fn input_value(&self, selector: &str, timeout: Duration) -> PageResult<String>;

    fn current_url(&self) -> PageResult<String>;

    fn wait_for_load_state(&self, state: LoadState, timeout: Duration) -> PageResult<()>;

    /// Write a PNG of the page to `path`
    fn screenshot(&self, path: &Path, full_page: bool) -> PageResult<()>;

    fn is_closed(&self) -> bool;

    /// Tear down the page. Later calls fail with [`PageError::Closed`].
    fn close(&mut self);
}

/// Result type for page interactions
pub type PageResult<T> = Result<T, PageError>;

/// Error types for page interactions
#[derive(Debug)]
pub enum PageError {
    /// Element, navigation or load state not reached within the bound
    Timeout { what: String, timeout: Duration },

    /// Page or browser context already torn down
    Closed,

    /// Every strategy of a fallback chain was exhausted
    NotResolved { what: String, tried: Vec<String> },

    /// Any other failure reported by the automation backend
    Other(String),
}

impl PageError {
    pub fn timeout(what: impl Into<String>, timeout: Duration) -> Self {
        PageError::Timeout {
            what: what.into(),
            timeout,
        }
    }

    /// Whether the calling flow may retry or fall back
    pub fn is_timeout(&self) -> bool {
        matches!(self, PageError::Timeout { .. })
    }
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::Timeout { what, timeout } => {
                write!(f, "Timeout {}ms exceeded waiting for {}", timeout.as_millis(), what)
            }
            PageError::Closed => write!(f, "Target page, context or browser has been closed"),
            PageError::NotResolved { what, tried } => {
                write!(f, "Could not find {} (tried: {})", what, tried.join(", "))
            }
            PageError::Other(msg) => write!(f, "Page error: {}", msg),
        }
    }
}

impl std::error::Error for PageError {}

impl From<std::io::Error> for PageError {
    fn from(err: std::io::Error) -> Self {
        PageError::Other(err.to_string())
    }
}
