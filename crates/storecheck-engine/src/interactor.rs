//! Resilient click and text entry.
//!
//! Clicks go through four steps: scroll to the viewport center, wait briefly for
//! the session's clickable predicate, native click, and a programmatic
//! activation when the native click is blocked. The fallback only runs when the
//! native click was rejected (not clickable). A click that timed out may already
//! have landed, so it propagates like a stale handle or a broken page.
//!
//! The interactor does not verify the effect of an interaction.

use crate::error::EngineError;
use crate::session::Session;
use std::time::Duration;
use storecheck_common::{ElementHandle, ErrorKind};
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

/// Default wait for the clickable predicate before trying the native click
pub const DEFAULT_CLICKABLE_TIMEOUT_MS: u64 = 2_000;

/// How the element ended up activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickPath {
    Native,
    Fallback,
}

#[derive(Debug, Clone, Copy)]
pub struct Interactor {
    clickable_timeout: Duration,
    poll_interval: Duration,
}

impl Default for Interactor {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_CLICKABLE_TIMEOUT_MS),
            Duration::from_millis(crate::resolution::budget::DEFAULT_POLL_INTERVAL_MS),
        )
    }
}

impl Interactor {
    pub fn new(clickable_timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            clickable_timeout,
            poll_interval,
        }
    }

    /// Click `element`, falling back to a programmatic activation when the
    /// native click is blocked. The element receives exactly one activation.
    pub async fn click<S: Session + ?Sized>(
        &self,
        session: &mut S,
        element: &ElementHandle,
    ) -> Result<ClickPath, EngineError> {
        // 1. Bring into view
        if let Err(err) = session.scroll_into_view(element).await {
            if !err.kind().allows_fallback() {
                return Err(err.into());
            }
            debug!(%element, error = %err, "Scroll into view failed; continuing");
        }

        // 2. Give animations and overlays a moment to settle
        self.wait_clickable(session, element).await?;

        // 3. Native click
        let native = match session.click(element).await {
            Ok(()) => {
                debug!(%element, "Native click");
                return Ok(ClickPath::Native);
            }
            Err(err) => err,
        };

        if !native.kind().click_rejected() {
            return Err(native.into());
        }

        // 4. Programmatic activation
        warn!(%element, error = %native, "Native click blocked; using programmatic activation");
        match session.activate(element).await {
            Ok(()) => {
                info!(%element, "Activated element programmatically");
                Ok(ClickPath::Fallback)
            }
            Err(fallback) => Err(EngineError::InteractionFailed { native, fallback }),
        }
    }

    /// Clear the element and type `text` into it.
    ///
    /// With `submit`, the enclosing form is submitted afterwards; inputs outside
    /// any form are common, so a failed submission is only logged.
    pub async fn type_into<S: Session + ?Sized>(
        &self,
        session: &mut S,
        element: &ElementHandle,
        text: &str,
        submit: bool,
    ) -> Result<(), EngineError> {
        session.clear(element).await?;
        session.send_keys(element, text).await?;
        debug!(%element, chars = text.chars().count(), "Typed text");

        if submit && let Err(err) = session.submit(element).await {
            debug!(%element, error = %err, "Form submission skipped");
        }
        Ok(())
    }

    /// Poll the clickable predicate for a short, fixed time.
    ///
    /// Running out of time is not an error: the native click is attempted anyway
    /// and the fallback handles a still-blocked element.
    async fn wait_clickable<S: Session + ?Sized>(
        &self,
        session: &mut S,
        element: &ElementHandle,
    ) -> Result<(), EngineError> {
        let deadline = Instant::now() + self.clickable_timeout;
        loop {
            match session.is_clickable(element).await {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(err) if err.kind() == ErrorKind::StaleReference => return Err(err.into()),
                Err(err) => debug!(%element, error = %err, "Clickable check failed"),
            }

            let now = Instant::now();
            if now >= deadline {
                debug!(%element, "Element not clickable in time; trying anyway");
                return Ok(());
            }
            sleep(self.poll_interval.min(deadline - now)).await;
        }
    }
}
