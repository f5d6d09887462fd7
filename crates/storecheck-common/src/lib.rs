pub mod element;
pub mod error;
pub mod locator;

pub use element::ElementHandle;
pub use error::{ErrorKind, SessionError};
pub use locator::{Locator, LocatorSet, Strategy};
