//! Scripted in-memory session shared by the engine's integration tests.
//!
//! Pages are declared up front; every navigation loads a fresh copy of the
//! page's elements and invalidates all earlier handles. Element timing
//! (`appears_after`, `visible_after`, `ready_after`) is measured from the
//! navigation on tokio's clock, so tests run with `start_paused = true`.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use storecheck_common::{ElementHandle, Locator, SessionError};
use storecheck_engine::session::Session;
use tokio::time::{Instant, sleep};
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone)]
pub struct MockElement {
    pub text: String,
    pub matches: Vec<Locator>,
    pub parent: Option<usize>,
    pub appears_after: Duration,
    /// `None` means never visible.
    pub visible_after: Option<Duration>,
    pub in_viewport: bool,
    pub click_error: Option<SessionError>,
    /// Error returned after the native click was already delivered.
    pub click_error_after_dispatch: Option<SessionError>,
    pub activate_error: Option<SessionError>,
    pub navigates_to: Option<String>,
    pub in_form: bool,
    pub value: String,
}

impl MockElement {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            matches: Vec::new(),
            parent: None,
            appears_after: Duration::ZERO,
            visible_after: Some(Duration::ZERO),
            in_viewport: true,
            click_error: None,
            click_error_after_dispatch: None,
            activate_error: None,
            navigates_to: None,
            in_form: false,
            value: String::new(),
        }
    }

    pub fn matching(mut self, locator: Locator) -> Self {
        self.matches.push(locator);
        self
    }

    /// Descendant of the element at `parent` (index in the page's element list).
    pub fn inside(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn appears_after(mut self, delay: Duration) -> Self {
        self.appears_after = delay;
        self
    }

    pub fn visible_after(mut self, delay: Duration) -> Self {
        self.visible_after = Some(delay);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible_after = None;
        self
    }

    pub fn below_fold(mut self) -> Self {
        self.in_viewport = false;
        self
    }

    pub fn click_fails_with(mut self, err: SessionError) -> Self {
        self.click_error = Some(err);
        self
    }

    /// The native click lands, then the session reports `err` anyway
    /// (a WebDriver click waiting on the navigation it started).
    pub fn click_lands_then_fails_with(mut self, err: SessionError) -> Self {
        self.click_error_after_dispatch = Some(err);
        self
    }

    pub fn activation_fails_with(mut self, err: SessionError) -> Self {
        self.activate_error = Some(err);
        self
    }

    pub fn navigates_to(mut self, url: &str) -> Self {
        self.navigates_to = Some(url.to_string());
        self
    }

    pub fn in_form(mut self) -> Self {
        self.in_form = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct MockPage {
    pub title: String,
    /// `None` means the document never finishes loading.
    pub ready_after: Option<Duration>,
    pub elements: Vec<MockElement>,
    pub query_errors: HashMap<Locator, SessionError>,
    pub query_delay: Duration,
}

impl MockPage {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ready_after: Some(Duration::ZERO),
            elements: Vec::new(),
            query_errors: HashMap::new(),
            query_delay: Duration::ZERO,
        }
    }

    pub fn with(mut self, element: MockElement) -> Self {
        self.elements.push(element);
        self
    }

    pub fn ready_after(mut self, delay: Duration) -> Self {
        self.ready_after = Some(delay);
        self
    }

    pub fn never_ready(mut self) -> Self {
        self.ready_after = None;
        self
    }

    pub fn query_fails(mut self, locator: Locator, err: SessionError) -> Self {
        self.query_errors.insert(locator, err);
        self
    }

    pub fn query_delay(mut self, delay: Duration) -> Self {
        self.query_delay = delay;
        self
    }
}

/// One activation received by an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub url: String,
    pub text: String,
    pub native: bool,
}

pub struct MockSession {
    pages: HashMap<String, MockPage>,
    current: Option<(String, MockPage)>,
    loaded_at: Instant,
    generation: u32,
    pub queries: Vec<Locator>,
    pub activations: Vec<Activation>,
    pub submits: usize,
    pub navigations: Vec<String>,
    pub closed: bool,
}

impl Default for MockSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSession {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            current: None,
            loaded_at: Instant::now(),
            generation: 0,
            queries: Vec::new(),
            activations: Vec::new(),
            submits: 0,
            navigations: Vec::new(),
            closed: false,
        }
    }

    pub fn page(mut self, url: &str, page: MockPage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    /// Load `url` without going through the trait (test setup).
    pub fn load(&mut self, url: &str) {
        let page = self.pages.get(url).cloned().expect("unknown mock page");
        self.enter(url, page);
    }

    pub fn current_url_str(&self) -> Option<&str> {
        self.current.as_ref().map(|(url, _)| url.as_str())
    }

    /// Value typed into the first element whose text is `text`.
    pub fn value_of(&self, text: &str) -> Option<String> {
        let (_, page) = self.current.as_ref()?;
        page.elements
            .iter()
            .find(|el| el.text == text)
            .map(|el| el.value.clone())
    }

    /// Handle for the element at `index` on the current page.
    pub fn handle(&self, index: usize) -> ElementHandle {
        ElementHandle::new((self.generation << 16) | index as u32)
    }

    fn enter(&mut self, url: &str, page: MockPage) {
        self.generation += 1;
        self.loaded_at = Instant::now();
        self.current = Some((url.to_string(), page));
    }

    fn since_load(&self) -> Duration {
        self.loaded_at.elapsed()
    }

    fn current_page(&self) -> Result<&MockPage, SessionError> {
        self.current
            .as_ref()
            .map(|(_, page)| page)
            .ok_or_else(|| SessionError::Navigation("no page loaded".into()))
    }

    fn index(&self, handle: &ElementHandle) -> Result<usize, SessionError> {
        let stale = SessionError::ElementStale { id: handle.id() };
        if handle.id() >> 16 != self.generation {
            return Err(stale);
        }
        let index = (handle.id() & 0xFFFF) as usize;
        let page = self.current_page()?;
        match page.elements.get(index) {
            Some(el) if self.since_load() >= el.appears_after => Ok(index),
            _ => Err(stale),
        }
    }

    fn element(&self, handle: &ElementHandle) -> Result<&MockElement, SessionError> {
        let index = self.index(handle)?;
        Ok(&self.current_page()?.elements[index])
    }

    fn element_mut(&mut self, handle: &ElementHandle) -> Result<&mut MockElement, SessionError> {
        let index = self.index(handle)?;
        match self.current.as_mut() {
            Some((_, page)) => Ok(&mut page.elements[index]),
            None => Err(SessionError::Navigation("no page loaded".into())),
        }
    }

    fn shown(&self, el: &MockElement) -> bool {
        let since = self.since_load();
        since >= el.appears_after && el.visible_after.is_some_and(|delay| since >= delay)
    }

    fn record_activation(&mut self, handle: &ElementHandle, native: bool) -> Result<(), SessionError> {
        let el = self.element(handle)?.clone();
        let url = self.current_url_str().unwrap_or_default().to_string();
        self.activations.push(Activation {
            url,
            text: el.text.clone(),
            native,
        });
        if let Some(target) = el.navigates_to {
            let page = self
                .pages
                .get(&target)
                .cloned()
                .ok_or_else(|| SessionError::Navigation(format!("unknown page {}", target)))?;
            self.enter(&target, page);
        }
        Ok(())
    }
}

#[async_trait]
impl Session for MockSession {
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        self.navigations.push(url.to_string());
        let page = self
            .pages
            .get(url)
            .cloned()
            .ok_or_else(|| SessionError::Navigation(format!("unknown page {}", url)))?;
        self.enter(url, page);
        Ok(())
    }

    async fn title(&mut self) -> Result<String, SessionError> {
        Ok(self.current_page()?.title.clone())
    }

    async fn current_url(&mut self) -> Result<String, SessionError> {
        self.current_url_str()
            .map(String::from)
            .ok_or_else(|| SessionError::Navigation("no page loaded".into()))
    }

    async fn execute_script(&mut self, _script: &str) -> Result<Value, SessionError> {
        Ok(Value::Null)
    }

    async fn execute_on_element(
        &mut self,
        element: &ElementHandle,
        _script: &str,
    ) -> Result<Value, SessionError> {
        self.element(element)?;
        Ok(Value::Null)
    }

    async fn query_elements(
        &mut self,
        scope: Option<&ElementHandle>,
        locator: &Locator,
    ) -> Result<Vec<ElementHandle>, SessionError> {
        self.queries.push(locator.clone());
        let scope = scope.map(|handle| self.index(handle)).transpose()?;

        let page = self.current_page()?;
        let delay = page.query_delay;
        if let Some(err) = page.query_errors.get(locator) {
            return Err(err.clone());
        }

        let since = self.since_load();
        let indices: Vec<usize> = page
            .elements
            .iter()
            .enumerate()
            .filter(|(_, el)| el.matches.contains(locator))
            .filter(|(_, el)| since >= el.appears_after)
            .filter(|(_, el)| scope.is_none() || el.parent == scope)
            .map(|(index, _)| index)
            .collect();

        if !delay.is_zero() {
            sleep(delay).await;
        }
        Ok(indices.into_iter().map(|index| self.handle(index)).collect())
    }

    async fn text(&mut self, element: &ElementHandle) -> Result<String, SessionError> {
        Ok(self.element(element)?.text.clone())
    }

    async fn attribute(
        &mut self,
        element: &ElementHandle,
        _name: &str,
    ) -> Result<Option<String>, SessionError> {
        self.element(element)?;
        Ok(None)
    }

    async fn click(&mut self, element: &ElementHandle) -> Result<(), SessionError> {
        let el = self.element(element)?;
        if let Some(err) = &el.click_error {
            return Err(err.clone());
        }
        if !self.shown(el) {
            return Err(SessionError::ElementNotVisible { id: element.id() });
        }
        if !el.in_viewport {
            return Err(SessionError::ClickIntercepted {
                id: element.id(),
                reason: "element is outside the viewport".into(),
            });
        }
        let late_error = el.click_error_after_dispatch.clone();
        self.record_activation(element, true)?;
        match late_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn clear(&mut self, element: &ElementHandle) -> Result<(), SessionError> {
        self.element_mut(element)?.value.clear();
        Ok(())
    }

    async fn send_keys(&mut self, element: &ElementHandle, text: &str) -> Result<(), SessionError> {
        self.element_mut(element)?.value.push_str(text);
        Ok(())
    }

    async fn is_visible(&mut self, element: &ElementHandle) -> Result<bool, SessionError> {
        let el = self.element(element)?;
        Ok(self.shown(el))
    }

    async fn is_clickable(&mut self, element: &ElementHandle) -> Result<bool, SessionError> {
        let el = self.element(element)?;
        Ok(self.shown(el) && el.in_viewport && el.click_error.is_none())
    }

    async fn document_ready(&mut self) -> Result<bool, SessionError> {
        let page = self.current_page()?;
        Ok(page
            .ready_after
            .is_some_and(|delay| self.since_load() >= delay))
    }

    async fn scroll_into_view(&mut self, element: &ElementHandle) -> Result<(), SessionError> {
        self.element_mut(element)?.in_viewport = true;
        Ok(())
    }

    async fn activate(&mut self, element: &ElementHandle) -> Result<(), SessionError> {
        if let Some(err) = self.element(element)?.activate_error.clone() {
            return Err(err);
        }
        self.record_activation(element, false)
    }

    async fn submit(&mut self, element: &ElementHandle) -> Result<(), SessionError> {
        if !self.element(element)?.in_form {
            return Err(SessionError::Script("element is not inside a form".into()));
        }
        self.submits += 1;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        self.closed = true;
        Ok(())
    }
}

pub const HOME: &str = "https://store.test/";
pub const DETAIL: &str = "https://store.test/product/1";
pub const CART: &str = "https://store.test/cart";
pub const CATEGORY: &str = "https://store.test/category/shoes";

fn header() -> MockElement {
    MockElement::new("PRT681 Store").matching(Locator::css("header"))
}

fn product_card(name: &str) -> MockElement {
    MockElement::new(name).matching(Locator::css(".product-card"))
}

/// Listing with one linked product, three cards and a search box inside a form.
pub fn home_page() -> MockPage {
    MockPage::new("PRT681 Store")
        .with(header())
        .with(product_card("Running Shoes $49.99"))
        .with(product_card("Trail Shoes $59.99"))
        .with(product_card("Court Shoes $39.99"))
        .with(
            MockElement::new("Running Shoes")
                .matching(Locator::css(".product-card a"))
                .inside(1)
                .navigates_to(DETAIL),
        )
        .with(
            MockElement::new("search")
                .matching(Locator::css("input[type='search']"))
                .in_form(),
        )
}

pub fn detail_page() -> MockPage {
    MockPage::new("Running Shoes | PRT681 Store")
        .with(header())
        .with(MockElement::new("Running Shoes — Model X").matching(Locator::css("h1")))
        .with(MockElement::new("$49.99").matching(Locator::css(".price")))
        .with(
            MockElement::new("Add to Cart")
                .matching(Locator::css("button.add-to-cart"))
                .below_fold(),
        )
        .with(
            MockElement::new("Cart (1)")
                .matching(Locator::css("a.cart, a[href*='cart']"))
                .navigates_to(CART),
        )
}

pub fn cart_page() -> MockPage {
    MockPage::new("Cart | PRT681 Store")
        .with(header())
        .with(MockElement::new("").matching(Locator::css(".cart-item")))
        .with(
            MockElement::new("  Running Shoes  ")
                .matching(Locator::css(".cart-item .name"))
                .inside(1),
        )
}

/// A storefront where every acceptance case can pass.
pub fn storefront() -> MockSession {
    MockSession::new()
        .page(HOME, home_page())
        .page(DETAIL, detail_page())
        .page(CART, cart_page())
}
