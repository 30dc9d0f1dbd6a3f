#![forbid(unsafe_code)]

//! Deadline table for pending transition ends and timers.
//!
//! Every awaited transition is registered with a deadline. If the host
//! reports the transition end first, the entry is taken by item; otherwise
//! [`WaitTable::pop_expired`] hands it out once the clock passes the
//! deadline. Plain timers only ever leave through expiry.

use baraja_core::ItemId;
use web_time::Duration;

/// What a wait is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitKey {
    /// A transition on this item.
    Transition(ItemId),
    /// A timer with no host signal.
    Timer(u64),
}

/// A pending wait and its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Wait<A> {
    pub key: WaitKey,
    pub deadline: Duration,
    pub action: A,
}

/// Pending waits, ordered by arming sequence.
#[derive(Debug, Clone)]
pub struct WaitTable<A> {
    waits: Vec<Wait<A>>,
    next_timer: u64,
}

impl<A> Default for WaitTable<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> WaitTable<A> {
    pub fn new() -> Self {
        Self {
            waits: Vec::new(),
            next_timer: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.waits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waits.is_empty()
    }

    /// Await a transition end on `item`.
    pub fn arm_transition(&mut self, item: ItemId, deadline: Duration, action: A) {
        self.waits.push(Wait {
            key: WaitKey::Transition(item),
            deadline,
            action,
        });
    }

    /// Schedule `action` for `deadline`. Returns the timer id.
    pub fn arm_timer(&mut self, deadline: Duration, action: A) -> u64 {
        let id = self.next_timer;
        self.next_timer += 1;
        self.waits.push(Wait {
            key: WaitKey::Timer(id),
            deadline,
            action,
        });
        id
    }

    /// Whether a transition wait on `item` is pending.
    pub fn is_waiting_on(&self, item: ItemId) -> bool {
        self.waits
            .iter()
            .any(|w| w.key == WaitKey::Transition(item))
    }

    /// Items with a pending transition wait, in arming order.
    pub fn transition_items(&self) -> Vec<ItemId> {
        self.waits
            .iter()
            .filter_map(|w| match w.key {
                WaitKey::Transition(item) => Some(item),
                WaitKey::Timer(_) => None,
            })
            .collect()
    }

    /// Remove the oldest transition wait on `item`.
    pub fn take_transition(&mut self, item: ItemId) -> Option<Wait<A>> {
        let idx = self
            .waits
            .iter()
            .position(|w| w.key == WaitKey::Transition(item))?;
        Some(self.waits.remove(idx))
    }

    /// Earliest deadline among pending waits.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.waits.iter().map(|w| w.deadline).min()
    }

    /// Remove the earliest wait whose deadline is `<= now`.
    ///
    /// Ties go to the wait armed first.
    pub fn pop_expired(&mut self, now: Duration) -> Option<Wait<A>> {
        let mut best: Option<usize> = None;
        for (i, w) in self.waits.iter().enumerate() {
            if w.deadline > now {
                continue;
            }
            match best {
                Some(b) if self.waits[b].deadline <= w.deadline => {}
                _ => best = Some(i),
            }
        }
        best.map(|i| self.waits.remove(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn transition_taken_by_item() {
        let mut table = WaitTable::new();
        table.arm_transition(ItemId(1), ms(500), "a");
        table.arm_transition(ItemId(2), ms(500), "b");
        assert!(table.is_waiting_on(ItemId(2)));
        let w = table.take_transition(ItemId(2)).unwrap();
        assert_eq!(w.action, "b");
        assert!(!table.is_waiting_on(ItemId(2)));
        assert!(table.take_transition(ItemId(2)).is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn expiry_in_deadline_order() {
        let mut table = WaitTable::new();
        table.arm_transition(ItemId(1), ms(300), 1);
        table.arm_timer(ms(100), 2);
        table.arm_transition(ItemId(3), ms(100), 3);
        assert_eq!(table.next_deadline(), Some(ms(100)));

        assert_eq!(table.pop_expired(ms(50)), None);
        assert_eq!(table.pop_expired(ms(200)).unwrap().action, 2);
        assert_eq!(table.pop_expired(ms(200)).unwrap().action, 3);
        assert_eq!(table.pop_expired(ms(200)), None);
        assert_eq!(table.pop_expired(ms(300)).unwrap().action, 1);
        assert!(table.is_empty());
    }

    #[test]
    fn timers_get_distinct_ids() {
        let mut table = WaitTable::new();
        let a = table.arm_timer(ms(1), ());
        let b = table.arm_timer(ms(1), ());
        assert_ne!(a, b);
        assert_eq!(table.pop_expired(ms(1)).unwrap().key, WaitKey::Timer(a));
    }
}
