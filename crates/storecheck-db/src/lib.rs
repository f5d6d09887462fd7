//! Cross-checks that a product created through the storefront API is
//! persisted with the expected fields, then removes it again.

pub mod api;
pub mod error;
pub mod product;
pub mod store;
pub mod verify;

pub use api::{HttpProductApi, ProductApi};
pub use error::VerifyError;
pub use product::{NewProduct, ProductId, ProductRow};
pub use store::{ProductStore, SqliteProductStore};
pub use verify::{ProductVerifier, Verification};
