//! Storefront flows and the locator sets they resolve.

pub mod catalog;
pub mod driver;

pub use catalog::Catalog;
pub use driver::{ProductDetail, ScenarioDriver, SearchOutcome, SearchVia};
