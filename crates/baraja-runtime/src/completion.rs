#![forbid(unsafe_code)]

//! Counted completion and operation tickets.
//!
//! A [`CompletionBatch`] expects a fixed number of settle signals, one per
//! participating item. The phase it guards is complete once every signal
//! has been observed.
//!
//! Callers observe an operation through a [`Ticket`], the receiving half of
//! a one-shot channel. The dispatcher keeps the [`TicketSender`] and
//! consumes it on completion, so a ticket resolves at most once.
//!
//! # Invariants
//!
//! 1. `settled() <= expected()`; extra signals are ignored.
//! 2. A batch expecting zero participants is complete on creation.
//! 3. A ticket yields the same [`Completion`] on every query once resolved.

use std::cell::OnceCell;
use std::fmt;
use std::sync::mpsc;

/// Which public operation a ticket belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Fan,
    Close,
    Next,
    Previous,
    Front,
    Add,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fan => "fan",
            Self::Close => "close",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::Front => "front",
            Self::Add => "add",
        })
    }
}

/// Outcome delivered once an operation has fully settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub kind: OperationKind,
    /// At least one participant never signalled and was settled by timeout.
    pub degraded: bool,
}

/// Counts settle signals for one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletionBatch {
    expected: usize,
    settled: usize,
}

impl CompletionBatch {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            settled: 0,
        }
    }

    /// Add participants to a batch that is still being armed.
    pub fn expect_more(&mut self, count: usize) {
        self.expected += count;
    }

    /// Record one settle signal. Returns `true` when this signal completed
    /// the batch.
    pub fn settle(&mut self) -> bool {
        if self.settled >= self.expected {
            return false;
        }
        self.settled += 1;
        self.settled == self.expected
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn settled(&self) -> usize {
        self.settled
    }

    pub fn remaining(&self) -> usize {
        self.expected - self.settled
    }

    pub fn is_complete(&self) -> bool {
        self.settled >= self.expected
    }
}

/// Receiving side of an operation's completion.
#[derive(Debug)]
pub struct Ticket {
    kind: OperationKind,
    rx: mpsc::Receiver<Completion>,
    done: OnceCell<Completion>,
}

/// Sending side, held by the dispatcher while the operation runs.
#[derive(Debug)]
pub struct TicketSender {
    kind: OperationKind,
    tx: mpsc::Sender<Completion>,
}

/// Create a linked sender/ticket pair.
pub fn ticket(kind: OperationKind) -> (TicketSender, Ticket) {
    let (tx, rx) = mpsc::channel();
    (
        TicketSender { kind, tx },
        Ticket {
            kind,
            rx,
            done: OnceCell::new(),
        },
    )
}

impl TicketSender {
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Resolve the ticket. A dropped ticket is not an error.
    pub fn complete(self, degraded: bool) {
        let _ = self.tx.send(Completion {
            kind: self.kind,
            degraded,
        });
    }
}

impl Ticket {
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// The completion, if the operation has finished.
    pub fn try_completion(&self) -> Option<Completion> {
        if let Some(done) = self.done.get() {
            return Some(*done);
        }
        let completion = self.rx.try_recv().ok()?;
        let _ = self.done.set(completion);
        Some(completion)
    }

    pub fn is_complete(&self) -> bool {
        self.try_completion().is_some()
    }

    /// Number of completions that arrived over the channel, including one
    /// already observed. Always 0 or 1.
    pub fn completion_count(&self) -> usize {
        let mut count = usize::from(self.try_completion().is_some());
        while self.rx.try_recv().is_ok() {
            count += 1;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_completes_after_expected_signals() {
        let mut batch = CompletionBatch::new(3);
        assert!(!batch.settle());
        assert!(!batch.settle());
        assert_eq!(batch.remaining(), 1);
        assert!(batch.settle());
        assert!(batch.is_complete());
        assert!(!batch.settle(), "extra signal must not re-complete");
        assert_eq!(batch.settled(), 3);
    }

    #[test]
    fn empty_batch_is_complete() {
        assert!(CompletionBatch::new(0).is_complete());
        assert!(CompletionBatch::default().is_complete());
    }

    #[test]
    fn expect_more_reopens_arming_batch() {
        let mut batch = CompletionBatch::new(1);
        batch.expect_more(2);
        assert_eq!(batch.expected(), 3);
        batch.settle();
        assert!(!batch.is_complete());
    }

    #[test]
    fn ticket_resolves_once() {
        let (tx, ticket) = ticket(OperationKind::Next);
        assert!(!ticket.is_complete());
        tx.complete(false);
        let done = ticket.try_completion().unwrap();
        assert_eq!(done.kind, OperationKind::Next);
        assert!(!done.degraded);
        assert_eq!(ticket.try_completion(), Some(done));
        assert_eq!(ticket.completion_count(), 1);
    }

    #[test]
    fn dropped_sender_leaves_ticket_pending() {
        let (tx, ticket) = ticket(OperationKind::Fan);
        drop(tx);
        assert_eq!(ticket.try_completion(), None);
        assert_eq!(ticket.kind(), OperationKind::Fan);
    }
}
