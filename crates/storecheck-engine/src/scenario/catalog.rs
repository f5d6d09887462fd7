//! Storefront locator sets.
//!
//! Each set lists its most specific locator first (a class or `data-testid`
//! the storefront is known to use) and its broadest heuristic last. Every set
//! can be replaced from the `catalog` section of the configuration file.

use serde::{Deserialize, Serialize};
use storecheck_common::LocatorSet;

const PRODUCT_HREF_XPATH: &str = "//a[contains(@href,'product') or contains(@href,'/products')]";

const LOWERCASE_TEXT: &str =
    "translate(., 'ABCDEFGHIJKLMNOPQRSTUVWXYZ','abcdefghijklmnopqrstuvwxyz')";

/// Every locator set the scenarios and the acceptance suite use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default = "default_product_cards")]
    pub product_cards: LocatorSet,

    #[serde(default = "default_product_links")]
    pub product_links: LocatorSet,

    #[serde(default = "default_add_to_cart")]
    pub add_to_cart: LocatorSet,

    #[serde(default = "default_cart_link")]
    pub cart_link: LocatorSet,

    #[serde(default = "default_cart_indicators")]
    pub cart_indicators: LocatorSet,

    #[serde(default = "default_cart_item_name")]
    pub cart_item_name: LocatorSet,

    #[serde(default = "default_search_input")]
    pub search_input: LocatorSet,

    #[serde(default = "default_category_link")]
    pub category_link: LocatorSet,

    #[serde(default = "default_product_results")]
    pub product_results: LocatorSet,

    #[serde(default = "default_detail_title")]
    pub detail_title: LocatorSet,

    #[serde(default = "default_detail_price")]
    pub detail_price: LocatorSet,

    /// Elements most pages are expected to show once rendered.
    #[serde(default = "default_page_anchors")]
    pub page_anchors: LocatorSet,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            product_cards: default_product_cards(),
            product_links: default_product_links(),
            add_to_cart: default_add_to_cart(),
            cart_link: default_cart_link(),
            cart_indicators: default_cart_indicators(),
            cart_item_name: default_cart_item_name(),
            search_input: default_search_input(),
            category_link: default_category_link(),
            product_results: default_product_results(),
            detail_title: default_detail_title(),
            detail_price: default_detail_price(),
            page_anchors: default_page_anchors(),
        }
    }
}

impl Catalog {
    /// All sets, for validation and listing.
    pub fn sets(&self) -> [&LocatorSet; 12] {
        [
            &self.product_cards,
            &self.product_links,
            &self.add_to_cart,
            &self.cart_link,
            &self.cart_indicators,
            &self.cart_item_name,
            &self.search_input,
            &self.category_link,
            &self.product_results,
            &self.detail_title,
            &self.detail_price,
            &self.page_anchors,
        ]
    }
}

fn default_product_cards() -> LocatorSet {
    LocatorSet::named("product-cards")
        .css(".product-card")
        .attribute("data-testid", "product-card")
        .css(".card, .item, .product")
        .xpath(PRODUCT_HREF_XPATH)
        .xpath("//*[contains(@class,'product') and (self::div or self::li)]")
}

fn default_product_links() -> LocatorSet {
    LocatorSet::named("product-links")
        .css(".product-card a")
        .css("[data-testid='product-card'] a")
        .xpath(format!("({})[1]", PRODUCT_HREF_XPATH))
        .css("a[href*='product']")
}

fn default_add_to_cart() -> LocatorSet {
    LocatorSet::named("add-to-cart")
        .css("button.add-to-cart")
        .xpath("//button[contains(., 'Add to Cart') or contains(., 'Add to cart')]")
        .xpath(format!("//button[contains({},'add to cart')]", LOWERCASE_TEXT))
        .attribute("data-testid", "add-to-cart")
}

fn default_cart_link() -> LocatorSet {
    LocatorSet::named("cart-link")
        .css("a.cart, a[href*='cart']")
        .xpath("//a[contains(@href,'cart') or contains(., 'Cart')]")
        .xpath("//a[@aria-label='Cart' or @title='Cart']")
        .attribute("data-testid", "cart-link")
}

fn default_cart_indicators() -> LocatorSet {
    LocatorSet::named("cart-indicators")
        .css(".cart-item")
        .xpath("//*[contains(@class,'cart') and (self::div or self::section)]")
        .xpath("//*[contains(.,'Your Cart') or contains(.,'Shopping Cart')]")
}

fn default_cart_item_name() -> LocatorSet {
    LocatorSet::named("cart-item-name")
        .css(".cart-item .name")
        .css(".cart-item [data-testid='name']")
        .xpath("//*[contains(@class,'cart')]//*[self::h3 or self::h2 or self::p]")
}

fn default_search_input() -> LocatorSet {
    LocatorSet::named("search-input")
        .css("input[type='search']")
        .css("input#search, input[name='search']")
        .css("[placeholder*='Search' i]")
}

fn default_category_link() -> LocatorSet {
    LocatorSet::named("category-link")
        .attribute("data-testid", "category-link")
        .xpath(format!("//a[contains({},'category')]", LOWERCASE_TEXT))
        .css("nav a, .filters a")
}

fn default_product_results() -> LocatorSet {
    LocatorSet::named("product-results")
        .css(".product-card")
        .attribute("data-testid", "product-card")
        .css(".product, .item, .card")
}

fn default_detail_title() -> LocatorSet {
    LocatorSet::named("detail-title")
        .css("h1")
        .attribute("data-testid", "product-title")
        .xpath("//h1|//h2")
}

fn default_detail_price() -> LocatorSet {
    LocatorSet::named("detail-price")
        .css(".price")
        .attribute("data-testid", "product-price")
        .xpath("//*[contains(@class,'price') or contains(., '$')]")
}

fn default_page_anchors() -> LocatorSet {
    LocatorSet::named("page-anchors")
        .css("header")
        .css("nav")
        .css(".product-card")
        .css("input[type='search']")
        .css("button")
}
