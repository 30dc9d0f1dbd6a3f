#![forbid(unsafe_code)]

//! Log output of the dispatcher.
//!
//! Kept in its own test binary: the scoped capturing subscriber must not
//! compete with the global one installed by `init_test_logging`.

use baraja_harness::{deck, settle_cooperative, settle_silent, with_captured_events};
use pretty_assertions::assert_eq;
use tracing::Level;

fn messages(events: &[baraja_harness::CapturedEvent], level: Level) -> Vec<String> {
    events
        .iter()
        .filter(|e| e.level == level)
        .filter_map(|e| e.message.clone())
        .collect()
}

#[test]
fn timeout_is_reported_as_warning() {
    let (done, events) = with_captured_events(|| {
        let mut deck = deck(3);
        let ticket = deck.next().into_ticket().unwrap();
        settle_silent(&mut deck);
        ticket.try_completion().unwrap()
    });
    assert!(done.degraded);
    let warnings = messages(&events, Level::WARN);
    assert_eq!(
        warnings,
        vec![
            "transition end not signalled before deadline, settling by timeout".to_owned(),
            "transition end not signalled before deadline, settling by timeout".to_owned(),
            "operation completed after timeout".to_owned(),
        ]
    );
}

#[test]
fn cooperative_run_logs_no_warnings() {
    let ((), events) = with_captured_events(|| {
        let mut deck = deck(4);
        deck.fan(None);
        deck.next();
        settle_cooperative(&mut deck);
    });
    assert!(messages(&events, Level::WARN).is_empty());
    let debug = messages(&events, Level::DEBUG);
    assert!(debug.iter().any(|m| m == "queued behind in-flight operation"));
    assert_eq!(
        debug.iter().filter(|m| *m == "operation complete").count(),
        2
    );
}

#[test]
fn queue_overflow_is_reported() {
    let (rejected, events) = with_captured_events(|| {
        let mut deck = deck(2);
        deck.next();
        (0..17).filter(|_| !deck.next().is_accepted()).count()
    });
    assert_eq!(rejected, 1);
    let warnings = messages(&events, Level::WARN);
    assert_eq!(warnings, vec!["dispatch queue full, dropping request".to_owned()]);
}
