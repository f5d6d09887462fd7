//! Readiness gate: decides when a freshly navigated page is safe to query.
//!
//! The gate polls the document's load-completion signal. Once the document is
//! loaded it spends whatever is left of the budget looking for one of a few
//! anchor elements. Anchors are a heuristic only: pages without any of them
//! still pass the gate.

use crate::error::EngineError;
use crate::resolution::{ElementResolver, PollBudget};
use crate::session::Session;
use std::time::Duration;
use storecheck_common::{Locator, LocatorSet, SessionError};
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

/// Outcome of a passed gate.
#[derive(Debug, Clone, PartialEq)]
pub struct Readiness {
    /// The anchor locator that matched, if any did before the budget ran out.
    pub anchor: Option<Locator>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct ReadinessGate {
    anchors: LocatorSet,
    poll_interval: Duration,
    attempt_timeout: Duration,
}

impl ReadinessGate {
    pub fn new(anchors: LocatorSet, poll_interval: Duration, attempt_timeout: Duration) -> Self {
        Self {
            anchors,
            poll_interval,
            attempt_timeout,
        }
    }

    pub fn anchors(&self) -> &LocatorSet {
        &self.anchors
    }

    /// Block until the document is loaded, then best-effort wait for an anchor.
    ///
    /// Fails only with [`EngineError::ReadinessTimeout`] when the load signal
    /// never becomes true within `timeout`.
    pub async fn await_ready<S: Session + ?Sized>(
        &self,
        session: &mut S,
        timeout: Duration,
    ) -> Result<Readiness, EngineError> {
        let started = Instant::now();
        let deadline = started + timeout;
        let mut last_error: Option<SessionError> = None;

        loop {
            match session.document_ready().await {
                Ok(true) => break,
                Ok(false) => {}
                Err(err) => {
                    debug!(error = %err, "Ready-state check failed");
                    last_error = Some(err);
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(EngineError::ReadinessTimeout {
                    elapsed_ms: started.elapsed().as_millis() as u64,
                    last_error,
                });
            }
            sleep(self.poll_interval.min(deadline - now)).await;
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        let anchor = if remaining.is_zero() {
            None
        } else {
            let budget = PollBudget::new(remaining, self.attempt_timeout)
                .with_interval(self.poll_interval);
            match ElementResolver::new(budget)
                .wait_for_any(session, &self.anchors)
                .await
            {
                Ok(resolved) => Some(resolved.locator),
                Err(err) => {
                    debug!(error = %err, "No anchor element found; continuing");
                    None
                }
            }
        };

        let elapsed = started.elapsed();
        info!(
            elapsed_ms = elapsed.as_millis() as u64,
            anchor = anchor.as_ref().map(|l| l.to_string()).unwrap_or_default(),
            "Page ready"
        );
        Ok(Readiness { anchor, elapsed })
    }
}
