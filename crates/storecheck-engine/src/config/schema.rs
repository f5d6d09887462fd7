use crate::interactor::Interactor;
use crate::resolution::{ElementResolver, PollBudget};
use crate::scenario::{Catalog, ScenarioDriver};
use crate::suite::AcceptanceSuite;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorecheckConfig {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub catalog: Catalog,
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl StorecheckConfig {
    pub fn scenario_driver(&self) -> ScenarioDriver {
        ScenarioDriver::new(
            self.catalog.clone(),
            ElementResolver::new(self.timing.poll_budget()),
            self.timing.interactor(),
        )
        .with_search(self.search.term.clone(), self.timing.search_settle())
    }

    pub fn acceptance_suite(&self) -> AcceptanceSuite {
        AcceptanceSuite::new(
            self.scenario_driver(),
            self.target.base_url.clone(),
            self.target.title_fragment.clone(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Expected (case-insensitive) part of the homepage title.
    #[serde(default = "default_title_fragment")]
    pub title_fragment: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            title_fragment: default_title_fragment(),
        }
    }
}

fn default_base_url() -> String {
    "https://prt681store.netlify.app/".into()
}

fn default_title_fragment() -> String {
    "Store".into()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
    #[serde(default = "default_headless")]
    pub headless: bool,
    #[serde(default)]
    pub window: WindowConfig,
    /// Extra browser command-line flags. Headless and window size are added separately.
    #[serde(default = "default_browser_args")]
    pub args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            window: WindowConfig::default(),
            args: default_browser_args(),
        }
    }
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".into()
}

fn default_headless() -> bool {
    true
}

fn default_browser_args() -> Vec<String> {
    ["--disable-gpu", "--no-sandbox", "--disable-dev-shm-usage"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_width")]
    pub width: u32,
    #[serde(default = "default_window_height")]
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

fn default_window_width() -> u32 {
    1280
}

fn default_window_height() -> u32 {
    900
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,
    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_clickable_timeout_ms")]
    pub clickable_timeout_ms: u64,
    #[serde(default = "default_search_settle_ms")]
    pub search_settle_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: default_timeout_ms(),
            attempt_timeout_ms: default_attempt_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            clickable_timeout_ms: default_clickable_timeout_ms(),
            search_settle_ms: default_search_settle_ms(),
        }
    }
}

impl TimingConfig {
    /// Polling budget; the attempt timeout is clamped to the total.
    pub fn poll_budget(&self) -> PollBudget {
        PollBudget::new(
            Duration::from_millis(self.default_timeout_ms),
            Duration::from_millis(self.attempt_timeout_ms),
        )
        .with_interval(Duration::from_millis(self.poll_interval_ms))
    }

    pub fn interactor(&self) -> Interactor {
        Interactor::new(
            Duration::from_millis(self.clickable_timeout_ms),
            Duration::from_millis(self.poll_interval_ms),
        )
    }

    pub fn search_settle(&self) -> Duration {
        Duration::from_millis(self.search_settle_ms)
    }
}

fn default_timeout_ms() -> u64 {
    crate::resolution::budget::DEFAULT_TIMEOUT_MS
}

fn default_attempt_timeout_ms() -> u64 {
    crate::resolution::budget::DEFAULT_ATTEMPT_TIMEOUT_MS
}

fn default_poll_interval_ms() -> u64 {
    crate::resolution::budget::DEFAULT_POLL_INTERVAL_MS
}

fn default_clickable_timeout_ms() -> u64 {
    crate::interactor::DEFAULT_CLICKABLE_TIMEOUT_MS
}

fn default_search_settle_ms() -> u64 {
    crate::scenario::driver::DEFAULT_SEARCH_SETTLE_MS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_term")]
    pub term: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            term: default_search_term(),
        }
    }
}

fn default_search_term() -> String {
    crate::scenario::driver::DEFAULT_SEARCH_TERM.into()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    #[serde(default = "default_settle_timeout_ms")]
    pub settle_timeout_ms: u64,
    #[serde(default = "default_db_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            database_path: default_database_path(),
            settle_timeout_ms: default_settle_timeout_ms(),
            poll_interval_ms: default_db_poll_interval_ms(),
        }
    }
}

fn default_api_base() -> String {
    "http://localhost:8080".into()
}

fn default_database_path() -> PathBuf {
    PathBuf::from("ecommerce.db")
}

fn default_settle_timeout_ms() -> u64 {
    5000
}

fn default_db_poll_interval_ms() -> u64 {
    200
}
