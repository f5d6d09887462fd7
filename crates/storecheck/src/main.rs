use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use storecheck_db::{HttpProductApi, NewProduct, ProductVerifier, SqliteProductStore};
use storecheck_e::WebDriverSession;
use storecheck_e::webdriver::is_webdriver_running;
use storecheck_engine::Session;
use storecheck_engine::config::{ConfigLoader, StorecheckConfig};
use storecheck_engine::suite::Case;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "storecheck", version, about = "Storefront acceptance checks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Common {
    /// Config file (defaults to ./storecheck.yaml, then ~/.storecheck/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run the browser acceptance suite against the storefront
    Suite {
        #[command(flatten)]
        common: Common,

        #[arg(long)]
        base_url: Option<String>,

        #[arg(long)]
        webdriver_url: Option<String>,

        /// Show the browser window
        #[arg(long)]
        headed: bool,

        /// Run only the named case (repeatable)
        #[arg(long = "case")]
        cases: Vec<Case>,
    },
    /// Create a product through the API and check the database row
    VerifyDb {
        #[command(flatten)]
        common: Common,

        #[arg(long)]
        api_base: Option<String>,

        #[arg(long)]
        database: Option<PathBuf>,

        #[arg(long, default_value = "Test Widget")]
        name: String,

        #[arg(long, default_value_t = 19.99)]
        price: f64,

        #[arg(long, default_value_t = 5)]
        quantity: i64,
    },
}

impl Command {
    fn common(&self) -> &Common {
        match self {
            Command::Suite { common, .. } | Command::VerifyDb { common, .. } => common,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let common = cli.command.common();

    let default_level = if common.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Suite {
            common,
            base_url,
            webdriver_url,
            headed,
            cases,
        } => {
            run_suite(
                common.config,
                SuiteOverrides {
                    base_url,
                    webdriver_url,
                    headed,
                    cases,
                },
            )
            .await
        }
        Command::VerifyDb {
            common,
            api_base,
            database,
            name,
            price,
            quantity,
        } => {
            let product = NewProduct {
                name,
                price,
                quantity,
            };
            run_verify(common.config, api_base, database, product).await
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

struct SuiteOverrides {
    base_url: Option<String>,
    webdriver_url: Option<String>,
    headed: bool,
    cases: Vec<Case>,
}

async fn load_config(path: Option<PathBuf>) -> anyhow::Result<StorecheckConfig> {
    ConfigLoader::load(path.as_deref())
        .await
        .context("Failed to load configuration")
}

async fn run_suite(config: Option<PathBuf>, overrides: SuiteOverrides) -> anyhow::Result<bool> {
    let mut config = load_config(config).await?;
    if let Some(url) = overrides.base_url {
        config.target.base_url = url;
    }
    if let Some(url) = overrides.webdriver_url {
        config.browser.webdriver_url = url;
    }
    if overrides.headed {
        config.browser.headless = false;
    }
    ConfigLoader::validate(&config).context("Invalid command-line override")?;

    let mut suite = config.acceptance_suite();
    if !overrides.cases.is_empty() {
        suite = suite.with_cases(&overrides.cases);
    }

    info!(
        base_url = %config.target.base_url,
        webdriver = %config.browser.webdriver_url,
        "Starting acceptance suite"
    );
    if !is_webdriver_running(&config.browser.webdriver_url).await {
        warn!(
            "No WebDriver status response at {}; is chromedriver running?",
            config.browser.webdriver_url
        );
    }
    let mut session = WebDriverSession::connect(&config.browser)
        .await
        .with_context(|| format!("Failed to connect to {}", config.browser.webdriver_url))?;

    let report = suite.run(&mut session).await;
    report.log_summary();

    if let Err(e) = session.close().await {
        error!("Failed to close browser session: {}", e);
    }
    Ok(report.is_success())
}

async fn run_verify(
    config: Option<PathBuf>,
    api_base: Option<String>,
    database: Option<PathBuf>,
    product: NewProduct,
) -> anyhow::Result<bool> {
    let mut config = load_config(config).await?;
    if let Some(base) = api_base {
        config.database.api_base = base;
    }
    if let Some(path) = database {
        config.database.database_path = path;
    }
    ConfigLoader::validate(&config).context("Invalid command-line override")?;

    let db = &config.database;
    let store = SqliteProductStore::open(&db.database_path)
        .with_context(|| format!("Failed to open {:?}", db.database_path))?;
    let verifier = ProductVerifier::new(HttpProductApi::new(db.api_base.clone()), store)
        .with_timing(
            Duration::from_millis(db.settle_timeout_ms),
            Duration::from_millis(db.poll_interval_ms),
        );

    match verifier.verify(&product).await {
        Ok(verification) => {
            info!(
                id = %verification.id,
                elapsed_ms = verification.elapsed.as_millis() as u64,
                deleted = verification.deleted,
                "Product persisted with expected fields"
            );
            Ok(true)
        }
        Err(e) => {
            error!("Database verification failed: {}", e);
            Ok(false)
        }
    }
}
