//! Acceptance suite: runs the storefront cases against one session and
//! reports pass, fail or skip per case.

mod cases;

pub use cases::Case;

use crate::scenario::ScenarioDriver;
use crate::session::Session;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// Result of one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed(String),
    Skipped(String),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Passed => f.write_str("passed"),
            Outcome::Failed(reason) => write!(f, "FAILED: {}", reason),
            Outcome::Skipped(reason) => write!(f, "skipped: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    pub case: Case,
    pub outcome: Outcome,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteReport {
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(Outcome::is_failure)
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped(_)))
    }

    /// False when any case failed. Skips do not count as failures.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn outcome(&self, case: Case) -> Option<&Outcome> {
        self.cases
            .iter()
            .find(|report| report.case == case)
            .map(|report| &report.outcome)
    }

    pub fn log_summary(&self) {
        for report in &self.cases {
            info!(
                case = %report.case,
                elapsed_ms = report.elapsed.as_millis() as u64,
                "{}",
                report.outcome
            );
        }
        info!(
            passed = self.passed(),
            failed = self.failed(),
            skipped = self.skipped(),
            "Suite finished"
        );
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.cases.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Runs cases in order, each from a fresh navigation to the base URL.
#[derive(Debug, Clone)]
pub struct AcceptanceSuite {
    driver: ScenarioDriver,
    base_url: String,
    title_fragment: String,
    cases: Vec<Case>,
}

impl AcceptanceSuite {
    pub fn new(
        driver: ScenarioDriver,
        base_url: impl Into<String>,
        title_fragment: impl Into<String>,
    ) -> Self {
        Self {
            driver,
            base_url: base_url.into(),
            title_fragment: title_fragment.into(),
            cases: Case::ALL.to_vec(),
        }
    }

    /// Restrict the run to `cases`; the fixed suite order is kept.
    pub fn with_cases(mut self, cases: &[Case]) -> Self {
        if !cases.is_empty() {
            self.cases = Case::ALL
                .into_iter()
                .filter(|case| cases.contains(case))
                .collect();
        }
        self
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub async fn run<S: Session + ?Sized>(&self, session: &mut S) -> SuiteReport {
        let mut report = SuiteReport::default();
        for &case in &self.cases {
            info!(%case, "Running case");
            let started = Instant::now();
            let outcome = self.run_case(session, case).await;
            match &outcome {
                Outcome::Passed => info!(%case, "Case passed"),
                Outcome::Skipped(reason) => warn!(%case, reason = %reason, "Case skipped"),
                Outcome::Failed(reason) => error!(%case, reason = %reason, "Case failed"),
            }
            report.cases.push(CaseReport {
                case,
                outcome,
                elapsed: started.elapsed(),
            });
        }
        report
    }

    async fn run_case<S: Session + ?Sized>(&self, session: &mut S, case: Case) -> Outcome {
        if let Err(err) = self.driver.open(session, &self.base_url).await {
            return Outcome::Failed(err.to_string());
        }

        let result = match case {
            Case::HomepageTitle => {
                cases::homepage_title(&self.driver, session, &self.title_fragment).await
            }
            Case::ProductDetail => cases::product_detail(&self.driver, session).await,
            Case::AddToCart => cases::add_to_cart(&self.driver, session).await,
            Case::SearchOrFilter => cases::search_or_filter(&self.driver, session).await,
        };
        result.unwrap_or_else(|err| Outcome::Failed(err.to_string()))
    }
}
