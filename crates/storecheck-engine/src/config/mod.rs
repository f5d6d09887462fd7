pub mod loader;
pub mod schema;

pub use loader::{ConfigError, ConfigLoader};
pub use schema::{
    BrowserConfig, DatabaseConfig, SearchConfig, StorecheckConfig, TargetConfig, TimingConfig,
    WindowConfig,
};
