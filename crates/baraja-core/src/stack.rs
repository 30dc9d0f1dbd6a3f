#![forbid(unsafe_code)]

//! Z-order model over opaque item handles.
//!
//! A [`Stack`] assigns every managed item one integer z-index. Outside of a
//! single mutation the assignment is always the contiguous range
//! `[z_index_min, z_index_min + len - 1]`: a permutation with no duplicates
//! and no gaps. The item holding the maximum is the *top* of the stack.
//!
//! # Invariants
//!
//! 1. `len() >= 2` for every constructed stack.
//! 2. After `new`, `bring_to_front`, `step`, `append`, and `normalize` the
//!    z-index set equals `{z_index_min, ..., z_index_min + len - 1}`.
//! 3. `z_index_min` never changes.
//! 4. `items()` preserves insertion (container) order; z-order is tracked
//!    separately.
//!
//! # Mid-flight values
//!
//! [`Stack::displace`] parks the moved item on a sentinel just outside the
//! valid range (`z_index_min - 1` for next, `z_index_min + len` for prev)
//! and then shifts the affected block by one slot. The shift pass includes
//! the moved item itself, which lands back on the vacated end of the range.
//! [`Stack::push_below`] is the one mutation that leaves values outside the
//! range; [`Stack::normalize`] recompresses them.

use std::fmt;

use crate::error::InitializationError;

/// Default lowest z-index handed out by a stack.
pub const DEFAULT_Z_INDEX_MIN: i32 = 1000;

/// Opaque handle to a visual element owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Which way a stack step moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    /// The top item goes to the bottom.
    Next,
    /// The bottom item comes to the top.
    Prev,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    id: ItemId,
    z_index: i32,
}

/// Ordered collection of items with a contiguous z-order.
#[derive(Debug, Clone)]
pub struct Stack {
    entries: Vec<Entry>,
    z_index_min: i32,
}

impl Stack {
    /// Build a stack with the default z-index floor.
    pub fn initialize(items: &[ItemId]) -> Result<Self, InitializationError> {
        Self::new(items, DEFAULT_Z_INDEX_MIN)
    }

    /// Build a stack whose lowest z-index is `z_index_min`.
    ///
    /// The first item ends on top. Duplicate handles are collapsed to their
    /// first occurrence before the size check.
    pub fn new(items: &[ItemId], z_index_min: i32) -> Result<Self, InitializationError> {
        let mut entries: Vec<Entry> = Vec::with_capacity(items.len());
        for &id in items {
            if !entries.iter().any(|e| e.id == id) {
                entries.push(Entry { id, z_index: 0 });
            }
        }
        if entries.len() <= 1 {
            return Err(InitializationError::TooFewItems {
                found: entries.len(),
            });
        }

        let mut stack = Self {
            entries,
            z_index_min,
        };
        let all: Vec<ItemId> = stack.items();
        stack.set_stack(&all);
        Ok(stack)
    }

    /// Number of managed items.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; a stack holds at least two items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lowest valid z-index.
    #[inline]
    pub fn z_index_min(&self) -> i32 {
        self.z_index_min
    }

    /// Highest valid z-index (held by the top item).
    #[inline]
    pub fn z_index_max(&self) -> i32 {
        self.z_index_min + self.len() as i32 - 1
    }

    /// Whether `item` is managed by this stack.
    pub fn contains(&self, item: ItemId) -> bool {
        self.entries.iter().any(|e| e.id == item)
    }

    /// Current z-index of `item`.
    pub fn z_index(&self, item: ItemId) -> Option<i32> {
        self.entries
            .iter()
            .find(|e| e.id == item)
            .map(|e| e.z_index)
    }

    /// Stack position of `item`; 0 is the top.
    pub fn position(&self, item: ItemId) -> Option<usize> {
        let z = self.z_index(item)?;
        let pos = self.z_index_max() - z;
        usize::try_from(pos).ok()
    }

    /// The item holding the maximum z-index.
    pub fn top(&self) -> ItemId {
        self.extreme(|a, b| a > b)
    }

    /// The item holding the minimum z-index.
    pub fn bottom(&self) -> ItemId {
        self.extreme(|a, b| a < b)
    }

    fn extreme(&self, better: impl Fn(i32, i32) -> bool) -> ItemId {
        let mut best = self.entries[0];
        for entry in &self.entries[1..] {
            if better(entry.z_index, best.z_index) {
                best = *entry;
            }
        }
        best.id
    }

    /// Items in insertion (container) order.
    pub fn items(&self) -> Vec<ItemId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    /// Items ordered from top to bottom.
    pub fn items_top_down(&self) -> Vec<ItemId> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.z_index.cmp(&a.z_index));
        sorted.into_iter().map(|e| e.id).collect()
    }

    /// `(item, z_index)` pairs in insertion order.
    pub fn z_indices(&self) -> Vec<(ItemId, i32)> {
        self.entries.iter().map(|e| (e.id, e.z_index)).collect()
    }

    /// Whether the z-indices are exactly the contiguous valid range.
    pub fn is_canonical(&self) -> bool {
        let mut zs: Vec<i32> = self.entries.iter().map(|e| e.z_index).collect();
        zs.sort_unstable();
        zs.iter()
            .enumerate()
            .all(|(i, &z)| z == self.z_index_min + i as i32)
    }

    /// Assign a contiguous block, highest first, to `items` in the order
    /// given. Handles not managed by the stack are skipped.
    pub fn set_stack(&mut self, items: &[ItemId]) {
        let total = self.len() as i32;
        let mut index = 0;
        for &id in items {
            if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
                entry.z_index = self.z_index_min + total - 1 - index;
                index += 1;
            }
        }
    }

    /// Mid-flight z-order update for one item.
    ///
    /// `Next` sinks `item` below every item that was under it; `Prev` lifts
    /// it above every item that was over it. Returns `false` for an unknown
    /// handle.
    pub fn displace(&mut self, item: ItemId, direction: StepDirection) -> bool {
        let Some(z_curr) = self.z_index(item) else {
            return false;
        };
        let sentinel = match direction {
            StepDirection::Next => self.z_index_min - 1,
            StepDirection::Prev => self.z_index_min + self.len() as i32,
        };
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == item) {
            entry.z_index = sentinel;
        }

        for entry in &mut self.entries {
            match direction {
                StepDirection::Next if entry.z_index < z_curr => entry.z_index += 1,
                StepDirection::Prev if entry.z_index > z_curr => entry.z_index -= 1,
                _ => {}
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(%item, from = z_curr, ?direction, "stack displace");
        true
    }

    /// Recompress the current relative order onto the valid range.
    ///
    /// Ties keep insertion order (earlier item ranks higher).
    pub fn normalize(&mut self) {
        let order = self.items_top_down();
        self.set_stack(&order);
    }

    /// Move `item` to the top.
    ///
    /// Returns `false` without touching anything when the item is already on
    /// top or is not managed by this stack.
    pub fn bring_to_front(&mut self, item: ItemId) -> bool {
        if !self.contains(item) || self.top() == item {
            return false;
        }
        self.displace(item, StepDirection::Prev);
        self.normalize();
        true
    }

    /// Rotate the stack by one and return the item that moved.
    pub fn step(&mut self, direction: StepDirection) -> ItemId {
        let item = match direction {
            StepDirection::Next => self.top(),
            StepDirection::Prev => self.bottom(),
        };
        self.displace(item, direction);
        self.normalize();
        item
    }

    /// Add `items` underneath the current minimum without restacking.
    ///
    /// The first new item gets `z_index_min - 1`, the next
    /// `z_index_min - 2`, and so on. Handles already managed (or repeated
    /// within `items`) are skipped. Returns the handles actually added.
    pub fn push_below(&mut self, items: &[ItemId]) -> Vec<ItemId> {
        let floor = self
            .entries
            .iter()
            .map(|e| e.z_index)
            .min()
            .unwrap_or(self.z_index_min)
            .min(self.z_index_min);
        let mut added = Vec::new();
        for &id in items {
            if self.contains(id) {
                continue;
            }
            let z_index = floor - 1 - added.len() as i32;
            self.entries.push(Entry { id, z_index });
            added.push(id);
        }
        added
    }

    /// Add `items` below the current stack and restack everything.
    pub fn append(&mut self, items: &[ItemId]) -> Vec<ItemId> {
        let added = self.push_below(items);
        self.normalize();
        #[cfg(feature = "tracing")]
        tracing::debug!(added = added.len(), total = self.len(), "stack append");
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: u64) -> Vec<ItemId> {
        (0..n).map(ItemId).collect()
    }

    fn abc() -> (Stack, ItemId, ItemId, ItemId) {
        let stack = Stack::initialize(&ids(3)).unwrap();
        (stack, ItemId(0), ItemId(1), ItemId(2))
    }

    #[test]
    fn rejects_empty_and_single() {
        assert_eq!(
            Stack::initialize(&[]).unwrap_err(),
            InitializationError::TooFewItems { found: 0 }
        );
        assert_eq!(
            Stack::initialize(&ids(1)).unwrap_err(),
            InitializationError::TooFewItems { found: 1 }
        );
    }

    #[test]
    fn duplicates_do_not_count_towards_size() {
        let err = Stack::initialize(&[ItemId(7), ItemId(7)]).unwrap_err();
        assert_eq!(err, InitializationError::TooFewItems { found: 1 });
    }

    #[test]
    fn first_item_is_on_top() {
        let (stack, a, b, c) = abc();
        assert_eq!(stack.z_index(a), Some(1002));
        assert_eq!(stack.z_index(b), Some(1001));
        assert_eq!(stack.z_index(c), Some(1000));
        assert_eq!(stack.top(), a);
        assert_eq!(stack.bottom(), c);
        assert_eq!(stack.position(a), Some(0));
        assert_eq!(stack.position(c), Some(2));
        assert!(stack.is_canonical());
    }

    #[test]
    fn custom_floor() {
        let stack = Stack::new(&ids(2), 5).unwrap();
        assert_eq!(stack.z_index_min(), 5);
        assert_eq!(stack.z_index_max(), 6);
        assert_eq!(stack.z_index(ItemId(0)), Some(6));
    }

    #[test]
    fn bring_to_front_top_is_noop() {
        let (mut stack, a, _, _) = abc();
        let before = stack.z_indices();
        assert!(!stack.bring_to_front(a));
        assert_eq!(stack.z_indices(), before);
    }

    #[test]
    fn bring_to_front_unknown_is_noop() {
        let (mut stack, ..) = abc();
        assert!(!stack.bring_to_front(ItemId(99)));
    }

    #[test]
    fn bring_to_front_middle_item() {
        let (mut stack, a, b, c) = abc();
        assert!(stack.bring_to_front(b));
        assert_eq!(stack.top(), b);
        assert_eq!(stack.z_index(a), Some(1001));
        assert_eq!(stack.z_index(c), Some(1000));
        assert!(stack.is_canonical());
    }

    #[test]
    fn bring_to_front_bottom_item() {
        let (mut stack, a, b, c) = abc();
        assert!(stack.bring_to_front(c));
        assert_eq!(stack.items_top_down(), vec![c, a, b]);
    }

    #[test]
    fn step_next_moves_top_to_bottom() {
        let (mut stack, a, b, c) = abc();
        assert_eq!(stack.step(StepDirection::Next), a);
        assert_eq!(stack.z_index(b), Some(1002));
        assert_eq!(stack.z_index(c), Some(1001));
        assert_eq!(stack.z_index(a), Some(1000));
    }

    #[test]
    fn step_prev_moves_bottom_to_top() {
        let (mut stack, a, b, c) = abc();
        assert_eq!(stack.step(StepDirection::Prev), c);
        assert_eq!(stack.items_top_down(), vec![c, a, b]);
    }

    #[test]
    fn step_round_trip_restores_assignment() {
        let mut stack = Stack::initialize(&ids(5)).unwrap();
        let before = stack.z_indices();
        stack.step(StepDirection::Next);
        stack.step(StepDirection::Prev);
        assert_eq!(stack.z_indices(), before);
    }

    #[test]
    fn displace_is_canonical_even_before_normalize() {
        let (mut stack, a, ..) = abc();
        assert!(stack.displace(a, StepDirection::Next));
        assert!(stack.is_canonical());
        assert_eq!(stack.bottom(), a);
    }

    #[test]
    fn push_below_then_normalize() {
        let (mut stack, a, b, c) = abc();
        let (d, e) = (ItemId(3), ItemId(4));
        assert_eq!(stack.push_below(&[d, e]), vec![d, e]);
        assert_eq!(stack.z_index(d), Some(999));
        assert_eq!(stack.z_index(e), Some(998));
        assert!(!stack.is_canonical());

        stack.normalize();
        assert!(stack.is_canonical());
        assert_eq!(stack.items_top_down(), vec![a, b, c, d, e]);
        assert_eq!(stack.z_index(e), Some(1000));
        assert_eq!(stack.z_index(a), Some(1004));
    }

    #[test]
    fn append_skips_known_handles() {
        let (mut stack, a, ..) = abc();
        let added = stack.append(&[a, ItemId(3), ItemId(3)]);
        assert_eq!(added, vec![ItemId(3)]);
        assert_eq!(stack.len(), 4);
        assert!(stack.is_canonical());
    }

    #[test]
    fn set_stack_ignores_foreign_handles() {
        let (mut stack, a, b, c) = abc();
        stack.set_stack(&[c, ItemId(42), b, a]);
        assert_eq!(stack.items_top_down(), vec![c, b, a]);
        assert!(stack.is_canonical());
    }

    #[test]
    fn items_keep_insertion_order() {
        let (mut stack, a, b, c) = abc();
        stack.step(StepDirection::Next);
        assert_eq!(stack.items(), vec![a, b, c]);
    }
}
