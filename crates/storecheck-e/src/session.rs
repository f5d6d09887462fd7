use crate::error_mapping::map_cmd_error;
use crate::webdriver;
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::{Client, Locator as WdLocator};
use serde_json::Value;
use std::collections::HashMap;
use storecheck_common::{ElementHandle, Locator, SessionError, Strategy};
use storecheck_engine::config::BrowserConfig;
use storecheck_engine::session::Session;
use tracing::{debug, info};

/// Visible, enabled, inside the viewport and on top at its center point.
const UNOBSCURED_SCRIPT: &str = r#"
    var el = arguments[0];
    var r = el.getBoundingClientRect();
    if (r.width === 0 || r.height === 0) { return false; }
    var x = r.left + r.width / 2, y = r.top + r.height / 2;
    if (x < 0 || y < 0 || x > window.innerWidth || y > window.innerHeight) { return false; }
    var top = document.elementFromPoint(x, y);
    return top === el || el.contains(top);
"#;

/// [`Session`] over a WebDriver browser session.
///
/// Found elements are kept in a handle table that is cleared on every
/// navigation; no implicit wait is configured, so queries never block.
pub struct WebDriverSession {
    client: Client,
    elements: HandleTable<Element>,
}

/// Handle ids keyed by the remote element reference.
///
/// Finding the same remote element again returns its existing handle, so
/// repeated polling over one page does not grow the table.
#[derive(Debug)]
struct HandleTable<T> {
    by_id: HashMap<u32, T>,
    by_ref: HashMap<String, u32>,
    next_id: u32,
}

impl<T: Clone> HandleTable<T> {
    fn new() -> Self {
        Self {
            by_id: HashMap::new(),
            by_ref: HashMap::new(),
            next_id: 1,
        }
    }

    fn insert(&mut self, remote_ref: String, value: T) -> u32 {
        if let Some(&id) = self.by_ref.get(&remote_ref) {
            return id;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.by_id.insert(id, value);
        self.by_ref.insert(remote_ref, id);
        id
    }

    fn get(&self, id: u32) -> Option<T> {
        self.by_id.get(&id).cloned()
    }

    fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Ids are not reused, so handles from before a clear stay stale.
    fn clear(&mut self) {
        self.by_id.clear();
        self.by_ref.clear();
    }
}

impl WebDriverSession {
    /// Start a browser session as described by `config`.
    pub async fn connect(config: &BrowserConfig) -> Result<Self, SessionError> {
        let client = webdriver::connect(config).await?;
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            elements: HandleTable::new(),
        }
    }

    fn register(&mut self, element: Element) -> ElementHandle {
        let remote_ref = element.element_id().to_string();
        ElementHandle::new(self.elements.insert(remote_ref, element))
    }

    fn element(&self, handle: &ElementHandle) -> Result<Element, SessionError> {
        self.elements
            .get(handle.id())
            .ok_or(SessionError::ElementStale { id: handle.id() })
    }

    /// Number of element handles currently valid.
    pub fn tracked_elements(&self) -> usize {
        self.elements.len()
    }

    async fn run_script(&self, script: &str, args: Vec<Value>) -> Result<Value, SessionError> {
        self.client
            .execute(script, args)
            .await
            .map_err(|e| map_cmd_error(e, "execute script", None))
    }
}

#[async_trait]
impl Session for WebDriverSession {
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        info!(url, "Navigating to");
        self.elements.clear();
        self.client
            .goto(url)
            .await
            .map_err(|e| SessionError::Navigation(format!("{}: {}", url, e)))
    }

    async fn title(&mut self) -> Result<String, SessionError> {
        self.client
            .title()
            .await
            .map_err(|e| map_cmd_error(e, "title", None))
    }

    async fn current_url(&mut self) -> Result<String, SessionError> {
        self.client
            .current_url()
            .await
            .map(|u| u.to_string())
            .map_err(|e| map_cmd_error(e, "current url", None))
    }

    async fn execute_script(&mut self, script: &str) -> Result<Value, SessionError> {
        self.run_script(script, vec![]).await
    }

    async fn execute_on_element(
        &mut self,
        element: &ElementHandle,
        script: &str,
    ) -> Result<Value, SessionError> {
        let arg = serde_json::to_value(self.element(element)?)?;
        self.client
            .execute(script, vec![arg])
            .await
            .map_err(|e| map_cmd_error(e, "execute script", Some(element)))
    }

    async fn query_elements(
        &mut self,
        scope: Option<&ElementHandle>,
        locator: &Locator,
    ) -> Result<Vec<ElementHandle>, SessionError> {
        let css;
        let wd_locator = match locator.strategy() {
            Strategy::Css => WdLocator::Css(locator.expression()),
            Strategy::Xpath => WdLocator::XPath(locator.expression()),
            Strategy::Attribute => {
                css = locator
                    .attribute_as_css()
                    .ok_or_else(|| SessionError::InvalidSelector {
                        selector: locator.expression().to_string(),
                    })?;
                WdLocator::Css(&css)
            }
        };

        let found = match scope {
            Some(handle) => self.element(handle)?.find_all(wd_locator).await,
            None => self.client.find_all(wd_locator).await,
        }
        .map_err(|e| map_cmd_error(e, locator.expression(), scope))?;

        debug!(locator = %locator, matches = found.len(), "Queried elements");
        Ok(found.into_iter().map(|el| self.register(el)).collect())
    }

    async fn text(&mut self, element: &ElementHandle) -> Result<String, SessionError> {
        self.element(element)?
            .text()
            .await
            .map_err(|e| map_cmd_error(e, "text", Some(element)))
    }

    async fn attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, SessionError> {
        self.element(element)?
            .attr(name)
            .await
            .map_err(|e| map_cmd_error(e, "attribute", Some(element)))
    }

    async fn click(&mut self, element: &ElementHandle) -> Result<(), SessionError> {
        self.element(element)?
            .click()
            .await
            .map_err(|e| map_cmd_error(e, "click", Some(element)))
    }

    async fn clear(&mut self, element: &ElementHandle) -> Result<(), SessionError> {
        self.element(element)?
            .clear()
            .await
            .map_err(|e| map_cmd_error(e, "clear", Some(element)))
    }

    async fn send_keys(&mut self, element: &ElementHandle, text: &str) -> Result<(), SessionError> {
        self.element(element)?
            .send_keys(text)
            .await
            .map_err(|e| map_cmd_error(e, "send keys", Some(element)))
    }

    async fn is_visible(&mut self, element: &ElementHandle) -> Result<bool, SessionError> {
        self.element(element)?
            .is_displayed()
            .await
            .map_err(|e| map_cmd_error(e, "is displayed", Some(element)))
    }

    async fn is_clickable(&mut self, element: &ElementHandle) -> Result<bool, SessionError> {
        let el = self.element(element)?;
        let shown = el
            .is_displayed()
            .await
            .map_err(|e| map_cmd_error(e, "is displayed", Some(element)))?;
        let enabled = el
            .is_enabled()
            .await
            .map_err(|e| map_cmd_error(e, "is enabled", Some(element)))?;
        if !shown || !enabled {
            return Ok(false);
        }
        let on_top = self.execute_on_element(element, UNOBSCURED_SCRIPT).await?;
        Ok(on_top.as_bool().unwrap_or(false))
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        info!("Closing browser session");
        self.elements.clear();
        self.client
            .clone()
            .close()
            .await
            .map_err(|e| map_cmd_error(e, "close", None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_remote_element_keeps_its_handle() {
        let mut table = HandleTable::new();
        let first = table.insert("ref-a".into(), "a");
        let second = table.insert("ref-b".into(), "b");

        for _ in 0..100 {
            assert_eq!(table.insert("ref-a".into(), "a"), first);
        }
        assert_ne!(first, second);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(second), Some("b"));
    }

    #[test]
    fn test_clear_invalidates_without_reusing_ids() {
        let mut table = HandleTable::new();
        let before = table.insert("ref-a".into(), "a");
        table.clear();

        assert_eq!(table.get(before), None);
        let after = table.insert("ref-a".into(), "a");
        assert_ne!(after, before);
        assert_eq!(table.len(), 1);
    }
}
