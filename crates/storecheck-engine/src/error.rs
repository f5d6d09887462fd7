use storecheck_common::SessionError;
use thiserror::Error;

fn describe_last(last_error: &Option<SessionError>) -> String {
    match last_error {
        Some(err) => format!("; last error [{}]: {} ({})", err.code(), err, err.recovery_hint()),
        None => String::new(),
    }
}

/// Failures of the resolution and interaction engine.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// The document never reported load completion within the budget.
    #[error("page not ready after {elapsed_ms}ms{}", describe_last(.last_error))]
    ReadinessTimeout {
        elapsed_ms: u64,
        last_error: Option<SessionError>,
    },

    /// Polling exhausted its budget without any locator yielding a visible element.
    #[error("no visible element for '{target}' after {elapsed_ms}ms{}", describe_last(.last_error))]
    ResolutionTimeout {
        target: String,
        elapsed_ms: u64,
        last_error: Option<SessionError>,
    },

    /// Both the native click and the programmatic fallback failed.
    #[error("interaction failed: native click: {native}; fallback activation: {fallback}")]
    InteractionFailed {
        native: SessionError,
        fallback: SessionError,
    },

    #[error("session error [{code}]: {0}", code = .0.code())]
    Session(#[from] SessionError),
}

/// Failures of a scenario flow.
#[derive(Debug, Clone, Error)]
pub enum ScenarioError {
    /// A required starting condition was not met (e.g. no products listed).
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// The flow ran but its required outcome is missing (e.g. no results).
    #[error("postcondition failed: {0}")]
    Postcondition(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<SessionError> for ScenarioError {
    fn from(err: SessionError) -> Self {
        ScenarioError::Engine(EngineError::Session(err))
    }
}
