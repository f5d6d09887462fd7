//! Named storefront flows built from the resolver, gate and interactor.
//!
//! Flows return plain values ("performed", captured text, a result count) or
//! a [`ScenarioError`]. Whether absence means skip or fail is the caller's
//! decision; the driver never turns a missing required element into success.

use super::catalog::Catalog;
use crate::error::{EngineError, ScenarioError};
use crate::interactor::{ClickPath, Interactor};
use crate::readiness::{Readiness, ReadinessGate};
use crate::resolution::ElementResolver;
use crate::session::Session;
use std::fmt;
use std::time::Duration;
use storecheck_common::{ElementHandle, LocatorSet};
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Default search term typed into the storefront search box
pub const DEFAULT_SEARCH_TERM: &str = "shoe";

/// Default pause after submitting a search, before results are counted
pub const DEFAULT_SEARCH_SETTLE_MS: u64 = 1_500;

/// Which affordance produced the result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchVia {
    Query,
    Category,
}

impl fmt::Display for SearchVia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchVia::Query => f.write_str("search box"),
            SearchVia::Category => f.write_str("category link"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Neither a search box nor a category link exists on the page.
    Skipped,
    Results { via: SearchVia, count: usize },
}

/// Text read from a product detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetail {
    pub title: String,
    pub price: String,
}

#[derive(Debug, Clone)]
pub struct ScenarioDriver {
    catalog: Catalog,
    resolver: ElementResolver,
    interactor: Interactor,
    gate: ReadinessGate,
    search_term: String,
    search_settle: Duration,
}

impl ScenarioDriver {
    /// The readiness gate uses the catalog's page anchors and the resolver's
    /// poll interval and attempt timeout.
    pub fn new(catalog: Catalog, resolver: ElementResolver, interactor: Interactor) -> Self {
        let budget = resolver.budget();
        let gate = ReadinessGate::new(
            catalog.page_anchors.clone(),
            budget.interval(),
            budget.attempt(),
        );
        Self {
            catalog,
            resolver,
            interactor,
            gate,
            search_term: DEFAULT_SEARCH_TERM.to_string(),
            search_settle: Duration::from_millis(DEFAULT_SEARCH_SETTLE_MS),
        }
    }

    pub fn with_search(mut self, term: impl Into<String>, settle: Duration) -> Self {
        self.search_term = term.into();
        self.search_settle = settle;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn resolver(&self) -> &ElementResolver {
        &self.resolver
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Navigate to `url` and pass the readiness gate.
    pub async fn open<S: Session + ?Sized>(
        &self,
        session: &mut S,
        url: &str,
    ) -> Result<Readiness, ScenarioError> {
        info!(url, "Navigating");
        session.navigate(url).await?;
        self.settle(session).await
    }

    /// Click the first product on a listing page.
    ///
    /// Returns the trimmed text of what was clicked, which may be empty.
    /// A listing without any product link or card is a precondition failure.
    pub async fn open_first_product<S: Session + ?Sized>(
        &self,
        session: &mut S,
    ) -> Result<String, ScenarioError> {
        let target = match self
            .resolver
            .find_first(session, &self.catalog.product_links, None)
            .await?
        {
            Some(link) => link.element,
            None => {
                debug!("No product link; falling back to product cards");
                let cards = self
                    .resolver
                    .find_all(session, &self.catalog.product_cards, None)
                    .await?
                    .ok_or_else(|| {
                        ScenarioError::Precondition(
                            "could not find any product cards or links on the page".into(),
                        )
                    })?;
                cards.elements[0]
            }
        };

        let name = session.text(&target).await?.trim().to_string();
        self.click(session, &target).await?;
        self.settle(session).await?;
        info!(product = %name, "Opened product");
        Ok(name)
    }

    /// Read the title and price of the current product detail page.
    pub async fn read_product_detail<S: Session + ?Sized>(
        &self,
        session: &mut S,
    ) -> Result<ProductDetail, ScenarioError> {
        let title = self
            .required_text(session, &self.catalog.detail_title, "product title")
            .await?;
        let price = self
            .required_text(session, &self.catalog.detail_price, "price")
            .await?;
        Ok(ProductDetail { title, price })
    }

    /// Click an add-to-cart button if the page has one.
    pub async fn add_to_cart_if_present<S: Session + ?Sized>(
        &self,
        session: &mut S,
    ) -> Result<bool, ScenarioError> {
        match self
            .resolver
            .find_first(session, &self.catalog.add_to_cart, None)
            .await?
        {
            Some(button) => {
                self.click(session, &button.element).await?;
                info!("Added to cart");
                Ok(true)
            }
            None => {
                info!("No add-to-cart button on this page");
                Ok(false)
            }
        }
    }

    /// Follow the cart link if the page has one.
    ///
    /// After the click, cart indicators are awaited best-effort only; their
    /// absence does not change the result.
    pub async fn navigate_to_cart<S: Session + ?Sized>(
        &self,
        session: &mut S,
    ) -> Result<bool, ScenarioError> {
        let Some(link) = self
            .resolver
            .find_first(session, &self.catalog.cart_link, None)
            .await?
        else {
            info!("No cart link on this page");
            return Ok(false);
        };

        self.click(session, &link.element).await?;
        if let Err(err) = self
            .resolver
            .wait_for_any(session, &self.catalog.cart_indicators)
            .await
        {
            warn!(error = %err, "Cart page shows no cart indicator");
        }
        info!("Opened cart");
        Ok(true)
    }

    /// Name of the first cart item on the cart page.
    pub async fn first_cart_item_name<S: Session + ?Sized>(
        &self,
        session: &mut S,
    ) -> Result<String, ScenarioError> {
        self.required_text(session, &self.catalog.cart_item_name, "cart item name")
            .await
    }

    /// Search for the configured term, or filter by category when there is no
    /// search box, and count the product results.
    pub async fn search<S: Session + ?Sized>(
        &self,
        session: &mut S,
    ) -> Result<SearchOutcome, ScenarioError> {
        if let Some(input) = self
            .resolver
            .find_first(session, &self.catalog.search_input, None)
            .await?
        {
            info!(term = %self.search_term, "Searching");
            self.interactor
                .type_into(session, &input.element, &self.search_term, true)
                .await?;
            sleep(self.search_settle).await;
            return self.count_results(session, SearchVia::Query).await;
        }

        if let Some(link) = self
            .resolver
            .find_first(session, &self.catalog.category_link, None)
            .await?
        {
            info!("No search box; filtering by category");
            self.click(session, &link.element).await?;
            let budget = self.resolver.budget();
            if let Err(err) = self
                .resolver
                .wait_for_present(session, &self.catalog.product_results, budget)
                .await
            {
                warn!(error = %err, "No product grid after category click");
            }
            return self.count_results(session, SearchVia::Category).await;
        }

        info!("No search box or category link; search skipped");
        Ok(SearchOutcome::Skipped)
    }

    async fn count_results<S: Session + ?Sized>(
        &self,
        session: &mut S,
        via: SearchVia,
    ) -> Result<SearchOutcome, ScenarioError> {
        let results = self
            .resolver
            .find_all(session, &self.catalog.product_results, None)
            .await?;
        match results {
            Some(results) if !results.is_empty() => {
                info!(%via, count = results.len(), "Search results rendered");
                Ok(SearchOutcome::Results {
                    via,
                    count: results.len(),
                })
            }
            _ => Err(ScenarioError::Postcondition(format!(
                "no results after {} ('{}')",
                via, self.search_term
            ))),
        }
    }

    /// Poll for `set` and return its trimmed, non-empty text.
    async fn required_text<S: Session + ?Sized>(
        &self,
        session: &mut S,
        set: &LocatorSet,
        what: &str,
    ) -> Result<String, ScenarioError> {
        let resolved = match self.resolver.wait_for_any(session, set).await {
            Ok(resolved) => resolved,
            Err(err @ EngineError::ResolutionTimeout { .. }) => {
                return Err(ScenarioError::Postcondition(format!(
                    "could not find a {} on the page: {}",
                    what, err
                )));
            }
            Err(err) => return Err(err.into()),
        };

        let text = session.text(&resolved.element).await?.trim().to_string();
        if text.is_empty() {
            return Err(ScenarioError::Postcondition(format!(
                "{} element ({}) has no text",
                what, resolved.locator
            )));
        }
        Ok(text)
    }

    async fn click<S: Session + ?Sized>(
        &self,
        session: &mut S,
        element: &ElementHandle,
    ) -> Result<ClickPath, ScenarioError> {
        Ok(self.interactor.click(session, element).await?)
    }

    async fn settle<S: Session + ?Sized>(&self, session: &mut S) -> Result<Readiness, ScenarioError> {
        let timeout = self.resolver.budget().total();
        Ok(self.gate.await_ready(session, timeout).await?)
    }
}
