pub mod error_mapping;
pub mod session;
pub mod webdriver;

pub use session::WebDriverSession;
