//! Errors reported by an automation session.
//!
//! Every [`SessionError`] maps onto a closed [`ErrorKind`]. Callers decide how
//! to recover from the kind alone: the interactor only falls back to a
//! programmatic click when the native click was rejected
//! ([`ErrorKind::NotClickable`]).

use thiserror::Error;

/// Closed classification of session failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The remote side did not answer, or a wait inside it expired.
    Timeout,
    /// The element exists but cannot receive a native event right now
    /// (covered, off-screen, mid-animation, not interactable).
    NotClickable,
    /// The handle points at an element that is no longer attached.
    StaleReference,
    /// Anything else, including a broken page or a lost session.
    Other,
}

impl ErrorKind {
    /// Kinds known to be benign for a click: a programmatic activation is
    /// expected to succeed where the native click was blocked.
    pub fn allows_fallback(&self) -> bool {
        matches!(self, ErrorKind::Timeout | ErrorKind::NotClickable)
    }

    /// Whether a failed native click is known not to have reached the element.
    ///
    /// A timeout leaves the outcome unknown: the click may have been dispatched
    /// before the remote side gave up waiting (e.g. on the navigation it started).
    pub fn click_rejected(&self) -> bool {
        matches!(self, ErrorKind::NotClickable)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    // ============================================================
    // Navigation
    // ============================================================
    #[error("Navigation failed: {0}")]
    Navigation(String),

    // ============================================================
    // Element errors
    // ============================================================
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Element {id} is stale (removed from DOM or page navigated)")]
    ElementStale { id: u32 },

    #[error("Element {id} is not visible")]
    ElementNotVisible { id: u32 },

    #[error("Element {id} is not interactable: {reason}")]
    ElementNotInteractable { id: u32, reason: String },

    #[error("Click on element {id} was intercepted: {reason}")]
    ClickIntercepted { id: u32, reason: String },

    #[error("Invalid selector: {selector}")]
    InvalidSelector { selector: String },

    // ============================================================
    // Execution
    // ============================================================
    #[error("Script execution error: {0}")]
    Script(String),

    #[error("Timeout: {operation}")]
    Timeout { operation: String },

    // ============================================================
    // System
    // ============================================================
    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Other: {0}")]
    Other(String),
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Other(format!("serialization: {}", err))
    }
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::Timeout { .. } => ErrorKind::Timeout,
            SessionError::ElementNotVisible { .. }
            | SessionError::ElementNotInteractable { .. }
            | SessionError::ClickIntercepted { .. } => ErrorKind::NotClickable,
            SessionError::ElementStale { .. } => ErrorKind::StaleReference,
            SessionError::Navigation(_)
            | SessionError::ElementNotFound(_)
            | SessionError::InvalidSelector { .. }
            | SessionError::Script(_)
            | SessionError::ConnectionLost(_)
            | SessionError::NotSupported(_)
            | SessionError::Other(_) => ErrorKind::Other,
        }
    }

    /// Stable error code, used in reports and logs.
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::Navigation(_) => "NAVIGATION_ERROR",
            SessionError::ElementNotFound(_) => "ELEMENT_NOT_FOUND",
            SessionError::ElementStale { .. } => "ELEMENT_STALE",
            SessionError::ElementNotVisible { .. } => "ELEMENT_NOT_VISIBLE",
            SessionError::ElementNotInteractable { .. } => "ELEMENT_NOT_INTERACTABLE",
            SessionError::ClickIntercepted { .. } => "CLICK_INTERCEPTED",
            SessionError::InvalidSelector { .. } => "SELECTOR_INVALID",
            SessionError::Script(_) => "SCRIPT_ERROR",
            SessionError::Timeout { .. } => "TIMEOUT",
            SessionError::ConnectionLost(_) => "CONNECTION_LOST",
            SessionError::NotSupported(_) => "NOT_SUPPORTED",
            SessionError::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Short hint shown next to a failure to tell markup drift from regressions.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            SessionError::ElementStale { .. } => "Re-resolve the element after navigation",
            SessionError::ElementNotVisible { .. } => "Scroll element into view or wait",
            SessionError::ElementNotInteractable { .. } | SessionError::ClickIntercepted { .. } => {
                "Element may be covered; scroll or wait for overlays to close"
            }
            SessionError::InvalidSelector { .. } => "Check the locator expression syntax",
            SessionError::ElementNotFound(_) => "Check the locator matches the current markup",
            SessionError::Timeout { .. } => "Increase the timeout or verify the page is responsive",
            SessionError::Navigation(_) => "Check the URL is valid and reachable",
            SessionError::ConnectionLost(_) => "Check the WebDriver server is running",
            _ => "See the error message for details",
        }
    }
}
