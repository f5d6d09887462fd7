use async_trait::async_trait;
use serde_json::Value;
use storecheck_common::{ElementHandle, Locator, SessionError};

const READY_STATE_SCRIPT: &str = "return document.readyState === 'complete';";

const SCROLL_INTO_VIEW_SCRIPT: &str =
    "arguments[0].scrollIntoView({block: 'center', inline: 'center'}); return true;";

const ACTIVATE_SCRIPT: &str = "arguments[0].click(); return true;";

const SUBMIT_SCRIPT: &str = r#"
    var form = arguments[0].form || arguments[0].closest('form');
    if (!form) { throw new Error('element is not inside a form'); }
    if (typeof form.requestSubmit === 'function') { form.requestSubmit(); } else { form.submit(); }
    return true;
"#;

/// The automation session boundary.
///
/// One session is one browser with one control flow: every method takes
/// `&mut self` and the engine never issues two calls concurrently. The engine
/// components receive the session as an explicit parameter and keep no handle
/// to it between calls.
#[async_trait]
pub trait Session: Send + Sync {
    /// Load a URL in the current window.
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError>;

    async fn title(&mut self) -> Result<String, SessionError>;

    async fn current_url(&mut self) -> Result<String, SessionError>;

    /// Run a script in the page and return its JSON result.
    async fn execute_script(&mut self, script: &str) -> Result<Value, SessionError>;

    /// Run a script with `element` passed as `arguments[0]`.
    async fn execute_on_element(
        &mut self,
        element: &ElementHandle,
        script: &str,
    ) -> Result<Value, SessionError>;

    /// Return every element matching `locator`, in document order.
    ///
    /// With a `scope`, only descendants of that element are considered. This
    /// never waits: no match is an empty list, not an error.
    async fn query_elements(
        &mut self,
        scope: Option<&ElementHandle>,
        locator: &Locator,
    ) -> Result<Vec<ElementHandle>, SessionError>;

    /// Rendered text of the element.
    async fn text(&mut self, element: &ElementHandle) -> Result<String, SessionError>;

    async fn attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, SessionError>;

    /// Native click through the automation protocol.
    async fn click(&mut self, element: &ElementHandle) -> Result<(), SessionError>;

    async fn clear(&mut self, element: &ElementHandle) -> Result<(), SessionError>;

    async fn send_keys(&mut self, element: &ElementHandle, text: &str)
    -> Result<(), SessionError>;

    async fn is_visible(&mut self, element: &ElementHandle) -> Result<bool, SessionError>;

    /// Visible, enabled and not covered by another element.
    async fn is_clickable(&mut self, element: &ElementHandle) -> Result<bool, SessionError>;

    /// Load-completion signal of the current document.
    async fn document_ready(&mut self) -> Result<bool, SessionError> {
        let value = self.execute_script(READY_STATE_SCRIPT).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// Scroll the element to the center of the viewport.
    async fn scroll_into_view(&mut self, element: &ElementHandle) -> Result<(), SessionError> {
        self.execute_on_element(element, SCROLL_INTO_VIEW_SCRIPT)
            .await
            .map(|_| ())
    }

    /// Programmatic activation that bypasses visibility and occlusion checks.
    async fn activate(&mut self, element: &ElementHandle) -> Result<(), SessionError> {
        self.execute_on_element(element, ACTIVATE_SCRIPT)
            .await
            .map(|_| ())
    }

    /// Submit the form enclosing the element. Fails when there is none.
    async fn submit(&mut self, element: &ElementHandle) -> Result<(), SessionError> {
        self.execute_on_element(element, SUBMIT_SCRIPT)
            .await
            .map(|_| ())
    }

    /// End the session and release the browser.
    async fn close(&mut self) -> Result<(), SessionError>;
}
