use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;
use storecheck_engine::config::{ConfigError, ConfigLoader, StorecheckConfig};

#[tokio::test]
async fn test_partial_file_keeps_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
target:
  base_url: "https://staging.store.test/"
timing:
  default_timeout_ms: 5000
  attempt_timeout_ms: 9000
search:
  term: boots
"#
    )
    .unwrap();

    let config = ConfigLoader::load_from(file.path()).await.unwrap();

    assert_eq!(config.target.base_url, "https://staging.store.test/");
    assert_eq!(config.target.title_fragment, "Store");
    assert_eq!(config.search.term, "boots");
    assert_eq!(config.timing.poll_interval_ms, 250);
    assert_eq!(config.browser.window.width, 1280);
    assert_eq!(config.database.settle_timeout_ms, 5000);

    // The attempt timeout is clamped to the total.
    let budget = config.timing.poll_budget();
    assert_eq!(budget.total(), Duration::from_secs(5));
    assert_eq!(budget.attempt(), Duration::from_secs(5));
}

#[tokio::test]
async fn test_explicit_path_is_validated() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
catalog:
  cart_link:
    name: cart-link
    locators: []
"#
    )
    .unwrap();

    let err = ConfigLoader::load(Some(file.path())).await.unwrap_err();
    match err {
        ConfigError::Invalid(message) => assert!(message.contains("cart-link")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_malformed_file_is_a_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "timing: [not, a, map]").unwrap();

    let err = ConfigLoader::load_from(file.path()).await.unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_environment_overrides() {
    let env: HashMap<&str, &str> = [
        ("HEADLESS", "0"),
        ("BASE_URL", "http://localhost:5173/"),
        ("WEBDRIVER_URL", "http://selenium:4444"),
        ("API_BASE", ""),
    ]
    .into_iter()
    .collect();

    let mut config = StorecheckConfig::default();
    ConfigLoader::apply_env(&mut config, |key| env.get(key).map(|v| v.to_string()));

    assert!(!config.browser.headless);
    assert_eq!(config.target.base_url, "http://localhost:5173/");
    assert_eq!(config.browser.webdriver_url, "http://selenium:4444");
    // Empty values leave the setting alone.
    assert_eq!(config.database.api_base, "http://localhost:8080");

    ConfigLoader::apply_env(&mut config, |key| (key == "HEADLESS").then(|| "1".to_string()));
    assert!(config.browser.headless);
}

#[test]
fn test_invalid_url_is_rejected() {
    let mut config = StorecheckConfig::default();
    config.target.base_url = "not a url".into();

    let err = ConfigLoader::validate(&config).unwrap_err();
    assert!(err.to_string().contains("target.base_url"));
}

#[test]
fn test_zero_timeouts_are_rejected() {
    let mut config = StorecheckConfig::default();
    config.timing.attempt_timeout_ms = 0;
    let err = ConfigLoader::validate(&config).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains("timing.attempt_timeout_ms"));

    let mut config = StorecheckConfig::default();
    config.timing.clickable_timeout_ms = 0;
    let err = ConfigLoader::validate(&config).unwrap_err();
    assert!(err.to_string().contains("timing.clickable_timeout_ms"));

    let mut config = StorecheckConfig::default();
    config.timing.poll_interval_ms = 0;
    let err = ConfigLoader::validate(&config).unwrap_err();
    assert!(err.to_string().contains("timing.poll_interval_ms"));
}

#[test]
fn test_defaults_validate() {
    ConfigLoader::validate(&StorecheckConfig::default()).unwrap();
}
