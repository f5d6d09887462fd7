use fantoccini::{Client, ClientBuilder};
use serde_json::{Map, Value, json};
use storecheck_common::SessionError;
use storecheck_engine::config::BrowserConfig;
use tracing::{debug, info};

/// W3C capabilities for a Chrome session described by `config`.
pub fn chrome_capabilities(config: &BrowserConfig) -> Map<String, Value> {
    let mut args = Vec::new();
    if config.headless {
        args.push("--headless=new".to_string());
    }
    args.push(format!(
        "--window-size={},{}",
        config.window.width, config.window.height
    ));
    for arg in &config.args {
        if !args.contains(arg) {
            args.push(arg.clone());
        }
    }

    let mut caps = Map::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}

/// Connect to the WebDriver server and open a browser session.
pub async fn connect(config: &BrowserConfig) -> Result<Client, SessionError> {
    let url = &config.webdriver_url;
    if !is_webdriver_running(url).await {
        debug!(url = %url, "WebDriver status check failed; trying to connect anyway");
    }

    info!(url = %url, headless = config.headless, "Connecting to WebDriver");
    ClientBuilder::native()
        .capabilities(chrome_capabilities(config))
        .connect(url)
        .await
        .map_err(|e| {
            SessionError::ConnectionLost(format!("Failed to connect to WebDriver at {}: {}", url, e))
        })
}

/// Whether the WebDriver server answers its status endpoint.
pub async fn is_webdriver_running(url: &str) -> bool {
    let status_url = format!("{}/status", url.trim_end_matches('/'));
    match reqwest::get(&status_url).await {
        Ok(response) => response.status().is_success(),
        Err(_) => false,
    }
}
