pub mod config;
pub mod error;
pub mod interactor;
pub mod readiness;
pub mod resolution;
pub mod scenario;
pub mod session;
pub mod suite;

pub use error::{EngineError, ScenarioError};
pub use session::Session;
pub use storecheck_common::{ElementHandle, ErrorKind, Locator, LocatorSet, SessionError, Strategy};
