#![forbid(unsafe_code)]

//! Host-side drivers.
//!
//! A real host delivers transition ends from the document and advances
//! the clock from its frame loop. These helpers play that role against a
//! [`Baraja`] until it goes idle.

use baraja_runtime::{Baraja, ElementSource, Renderer};
use web_time::Duration;

/// Upper bound on driver steps before a scenario is considered stuck.
const MAX_STEPS: usize = 100_000;

/// What a driver did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriveReport {
    /// Transition ends delivered.
    pub signals: usize,
    /// Clock advances.
    pub ticks: usize,
    /// Total simulated time.
    pub elapsed: Duration,
}

/// Signal every pending transition as soon as it is awaited, jumping the
/// clock only to fire timers. Stops when nothing is pending.
///
/// # Panics
///
/// If the deck is still busy after an unreasonable number of steps.
pub fn settle_cooperative<S: ElementSource, R: Renderer>(deck: &mut Baraja<S, R>) -> DriveReport {
    let mut report = DriveReport::default();
    for _ in 0..MAX_STEPS {
        if let Some(&item) = deck.pending_transitions().first() {
            deck.transition_end(item);
            report.signals += 1;
        } else if let Some(deadline) = deck.next_deadline() {
            advance_to(deck, deadline, &mut report);
        } else {
            return report;
        }
    }
    panic!("deck did not settle: {report:?}");
}

/// Never deliver a transition end; only advance the clock from deadline
/// to deadline. Every awaited transition settles by timeout.
///
/// # Panics
///
/// If the deck is still busy after an unreasonable number of steps.
pub fn settle_silent<S: ElementSource, R: Renderer>(deck: &mut Baraja<S, R>) -> DriveReport {
    let mut report = DriveReport::default();
    for _ in 0..MAX_STEPS {
        match deck.next_deadline() {
            Some(deadline) => advance_to(deck, deadline, &mut report),
            None => return report,
        }
    }
    panic!("deck did not settle: {report:?}");
}

/// Advance in fixed frames, signalling each awaited transition once the
/// frame clock passes its expected end. Models a host that reports on its
/// frame loop.
///
/// # Panics
///
/// If the deck is still busy after an unreasonable number of frames.
pub fn settle_framed<S: ElementSource, R: Renderer>(
    deck: &mut Baraja<S, R>,
    frame: Duration,
) -> DriveReport {
    let mut report = DriveReport::default();
    for _ in 0..MAX_STEPS {
        if !deck.is_animating() && deck.next_deadline().is_none() {
            return report;
        }
        for item in deck.pending_transitions() {
            deck.transition_end(item);
            report.signals += 1;
        }
        deck.tick(frame);
        report.ticks += 1;
        report.elapsed += frame;
    }
    panic!("deck did not settle: {report:?}");
}

fn advance_to<S: ElementSource, R: Renderer>(
    deck: &mut Baraja<S, R>,
    deadline: Duration,
    report: &mut DriveReport,
) {
    let dt = deadline.saturating_sub(deck.dispatcher().now());
    deck.tick(dt);
    report.ticks += 1;
    report.elapsed += dt;
}
