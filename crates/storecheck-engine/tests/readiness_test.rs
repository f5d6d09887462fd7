mod common;

use common::{MockElement, MockPage, MockSession};
use std::time::Duration;
use storecheck_common::{Locator, LocatorSet};
use storecheck_engine::EngineError;
use storecheck_engine::readiness::ReadinessGate;
use tokio::time::Instant;

const PAGE: &str = "https://store.test/";

fn gate() -> ReadinessGate {
    ReadinessGate::new(
        LocatorSet::named("page-anchors").css("header").css("nav").css("button"),
        Duration::from_millis(250),
        Duration::from_millis(750),
    )
}

fn session_with(page: MockPage) -> MockSession {
    let mut session = MockSession::new().page(PAGE, page);
    session.load(PAGE);
    session
}

#[tokio::test(start_paused = true)]
async fn test_ready_after_load_signal_and_anchor() {
    let page = MockPage::new("Store")
        .ready_after(Duration::from_millis(600))
        .with(MockElement::new("nav").matching(Locator::css("nav")));
    let mut session = session_with(page);

    let readiness = gate()
        .await_ready(&mut session, Duration::from_secs(15))
        .await
        .unwrap();

    assert!(readiness.elapsed >= Duration::from_millis(600));
    assert!(readiness.elapsed < Duration::from_millis(850));
    assert_eq!(readiness.anchor, Some(Locator::css("nav")));
}

#[tokio::test(start_paused = true)]
async fn test_never_ready_even_with_anchors_present() {
    let page = MockPage::new("Store")
        .never_ready()
        .with(MockElement::new("header").matching(Locator::css("header")));
    let mut session = session_with(page);

    let started = Instant::now();
    let err = gate()
        .await_ready(&mut session, Duration::from_secs(2))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::ReadinessTimeout { .. }));
    assert!(started.elapsed() >= Duration::from_secs(2));
    assert!(started.elapsed() <= Duration::from_millis(2_250));
}

#[tokio::test(start_paused = true)]
async fn test_missing_anchors_do_not_fail_the_gate() {
    let mut session = session_with(MockPage::new("Blank"));

    let readiness = gate()
        .await_ready(&mut session, Duration::from_secs(3))
        .await
        .unwrap();

    assert!(readiness.anchor.is_none());
    // The anchor search only spends what is left of the budget.
    assert!(readiness.elapsed <= Duration::from_secs(3));
}
