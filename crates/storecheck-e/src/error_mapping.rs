//! WebDriver Error Mapping
//!
//! Maps WebDriver command failures onto the classified [`SessionError`] set so
//! the engine can tell an occluded click from a dead browser.

use fantoccini::error::{CmdError, ErrorStatus};
use storecheck_common::{ElementHandle, SessionError};

/// Maps a failed WebDriver command to a [`SessionError`].
///
/// * `operation` - what was attempted; for queries this is the selector
/// * `element` - the element the command targeted, if any
pub fn map_cmd_error(err: CmdError, operation: &str, element: Option<&ElementHandle>) -> SessionError {
    match err {
        CmdError::Standard(wd) => map_status(&wd.error, &wd.message, operation, element),
        CmdError::WaitTimeout => SessionError::Timeout {
            operation: operation.to_string(),
        },
        CmdError::Lost(e) => SessionError::ConnectionLost(e.to_string()),
        other => SessionError::Other(format!("{}: {}", operation, other)),
    }
}

/// Maps a W3C error status and message to a [`SessionError`].
pub fn map_status(
    status: &ErrorStatus,
    message: &str,
    operation: &str,
    element: Option<&ElementHandle>,
) -> SessionError {
    let id = element.map(ElementHandle::id).unwrap_or_default();
    match status {
        ErrorStatus::ElementClickIntercepted => SessionError::ClickIntercepted {
            id,
            reason: message.to_string(),
        },
        ErrorStatus::ElementNotInteractable => SessionError::ElementNotInteractable {
            id,
            reason: message.to_string(),
        },
        ErrorStatus::StaleElementReference => SessionError::ElementStale { id },
        ErrorStatus::Timeout | ErrorStatus::ScriptTimeout => SessionError::Timeout {
            operation: operation.to_string(),
        },
        ErrorStatus::NoSuchElement => SessionError::ElementNotFound(message.to_string()),
        ErrorStatus::InvalidSelector => SessionError::InvalidSelector {
            selector: operation.to_string(),
        },
        ErrorStatus::JavascriptError => SessionError::Script(message.to_string()),
        ErrorStatus::InvalidSessionId | ErrorStatus::NoSuchWindow => {
            SessionError::ConnectionLost(message.to_string())
        }
        _ => SessionError::Other(format!("{}: {}", operation, message)),
    }
}
