//! Multi-strategy element resolution.
//!
//! A [`LocatorSet`] is always tried in declaration order and the first locator
//! that produces a match wins outright; later locators are not consulted and
//! results are never merged across locators.
//!
//! Two modes are offered:
//! - immediate ([`ElementResolver::find_first`], [`ElementResolver::find_all`]):
//!   one pass, no waiting, absence is `Ok(None)`;
//! - polling ([`ElementResolver::wait_for_any`]): full passes every poll interval
//!   until a locator yields a visible element or the [`PollBudget`] runs out.

use super::budget::PollBudget;
use super::result::{Resolved, ResolvedAll};
use crate::error::EngineError;
use crate::session::Session;
use storecheck_common::{ElementHandle, ErrorKind, Locator, LocatorSet, SessionError};
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, info};

/// What a polled element must satisfy to count as a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Requirement {
    Visible,
    Present,
}

/// Stateless resolver; the session is passed to every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementResolver {
    budget: PollBudget,
}

impl ElementResolver {
    pub fn new(budget: PollBudget) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> PollBudget {
        self.budget
    }

    /// Immediate mode: the first element of the first locator with a match.
    ///
    /// With `scope`, the lookup is limited to descendants of that element
    /// (e.g. "the price inside this card").
    pub async fn find_first<S: Session + ?Sized>(
        &self,
        session: &mut S,
        set: &LocatorSet,
        scope: Option<&ElementHandle>,
    ) -> Result<Option<Resolved>, EngineError> {
        Ok(self
            .single_pass(session, set, scope)
            .await?
            .and_then(|all| all.first()))
    }

    /// Immediate mode returning every element of the first locator with a match.
    pub async fn find_all<S: Session + ?Sized>(
        &self,
        session: &mut S,
        set: &LocatorSet,
        scope: Option<&ElementHandle>,
    ) -> Result<Option<ResolvedAll>, EngineError> {
        self.single_pass(session, set, scope).await
    }

    /// Polling mode with the resolver's own budget.
    pub async fn wait_for_any<S: Session + ?Sized>(
        &self,
        session: &mut S,
        set: &LocatorSet,
    ) -> Result<Resolved, EngineError> {
        self.poll(session, set, self.budget, Requirement::Visible)
            .await
    }

    /// Polling mode with an explicit budget (e.g. what is left of a larger one).
    pub async fn wait_for_any_within<S: Session + ?Sized>(
        &self,
        session: &mut S,
        set: &LocatorSet,
        budget: PollBudget,
    ) -> Result<Resolved, EngineError> {
        self.poll(session, set, budget, Requirement::Visible).await
    }

    /// Polling mode that accepts present but hidden elements.
    pub async fn wait_for_present<S: Session + ?Sized>(
        &self,
        session: &mut S,
        set: &LocatorSet,
        budget: PollBudget,
    ) -> Result<Resolved, EngineError> {
        self.poll(session, set, budget, Requirement::Present).await
    }

    async fn single_pass<S: Session + ?Sized>(
        &self,
        session: &mut S,
        set: &LocatorSet,
        scope: Option<&ElementHandle>,
    ) -> Result<Option<ResolvedAll>, EngineError> {
        let mut broken = 0usize;
        let mut last_broken = None;

        for locator in set.iter() {
            match session.query_elements(scope, locator).await {
                Ok(elements) if !elements.is_empty() => {
                    debug!(
                        locator_set = %set.name(),
                        locator = %locator,
                        matches = elements.len(),
                        "Locator matched"
                    );
                    return Ok(Some(ResolvedAll {
                        elements,
                        locator: locator.clone(),
                    }));
                }
                Ok(_) => {
                    debug!(locator_set = %set.name(), locator = %locator, "No match");
                }
                Err(err) => {
                    debug!(locator_set = %set.name(), locator = %locator, error = %err, "Query failed");
                    if err.kind() == ErrorKind::Other {
                        broken += 1;
                        last_broken = Some(err);
                    }
                }
            }
        }

        // A set where every locator hit a hard error means the session itself is
        // unusable; report that instead of "not found".
        if broken > 0
            && broken == set.len()
            && let Some(err) = last_broken
        {
            return Err(err.into());
        }

        Ok(None)
    }

    async fn poll<S: Session + ?Sized>(
        &self,
        session: &mut S,
        set: &LocatorSet,
        budget: PollBudget,
        requirement: Requirement,
    ) -> Result<Resolved, EngineError> {
        let started = Instant::now();
        let deadline = started + budget.total();
        let mut last_error: Option<SessionError> = None;
        let mut cycles = 0u32;

        'cycles: loop {
            cycles += 1;
            for locator in set.iter() {
                let now = Instant::now();
                if now >= deadline {
                    break 'cycles;
                }
                let limit = budget.attempt().min(deadline - now);

                match timeout(limit, matching_element(&mut *session, locator, requirement)).await {
                    Ok(Ok(Some(element))) => {
                        info!(
                            locator_set = %set.name(),
                            locator = %locator,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            cycles,
                            "Resolved element"
                        );
                        return Ok(Resolved {
                            element,
                            locator: locator.clone(),
                        });
                    }
                    Ok(Ok(None)) => {}
                    Ok(Err(err)) => {
                        debug!(locator_set = %set.name(), locator = %locator, error = %err, "Attempt failed");
                        last_error = Some(err);
                    }
                    Err(_) => {
                        debug!(locator_set = %set.name(), locator = %locator, "Attempt timed out");
                        last_error = Some(SessionError::Timeout {
                            operation: format!("query {}", locator),
                        });
                    }
                }
            }

            let now = Instant::now();
            if now >= deadline {
                break;
            }
            sleep(budget.interval().min(deadline - now)).await;
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        debug!(locator_set = %set.name(), elapsed_ms, cycles, "Polling budget exhausted");
        Err(EngineError::ResolutionTimeout {
            target: set.name().to_string(),
            elapsed_ms,
            last_error,
        })
    }
}

async fn matching_element<S: Session + ?Sized>(
    session: &mut S,
    locator: &Locator,
    requirement: Requirement,
) -> Result<Option<ElementHandle>, SessionError> {
    let elements = session.query_elements(None, locator).await?;
    if requirement == Requirement::Present {
        return Ok(elements.first().copied());
    }

    for element in elements {
        match session.is_visible(&element).await {
            Ok(true) => return Ok(Some(element)),
            Ok(false) => {}
            // Re-rendered between the query and the check; the next cycle re-queries.
            Err(err) if err.kind() == ErrorKind::StaleReference => {}
            Err(err) => return Err(err),
        }
    }
    Ok(None)
}
