#![forbid(unsafe_code)]

//! In-memory container.
//!
//! Items are minted sequentially. Appended markup yields one item per
//! `<li>` start tag; everything else in the markup is kept verbatim but
//! otherwise ignored.

use baraja_core::ItemId;
use baraja_runtime::ElementSource;

/// An [`ElementSource`] backed by a vector of handles.
#[derive(Debug, Clone, Default)]
pub struct MemoryContainer {
    children: Vec<ItemId>,
    markup: Vec<String>,
    next_id: u64,
}

impl MemoryContainer {
    /// A container with `count` items, `item#0` first.
    pub fn with_items(count: usize) -> Self {
        let mut container = Self::default();
        for _ in 0..count {
            container.mint();
        }
        container
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Raw markup appended so far, one entry per call.
    pub fn markup(&self) -> &[String] {
        &self.markup
    }

    fn mint(&mut self) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.children.push(id);
        id
    }
}

/// Count `<li>` start tags, skipping lookalikes such as `<link>`.
pub fn count_list_items(markup: &str) -> usize {
    markup
        .match_indices("<li")
        .filter(|(at, tag)| {
            matches!(
                markup[at + tag.len()..].chars().next(),
                Some('>' | '/' | ' ' | '\t' | '\n' | '\r')
            )
        })
        .count()
}

impl ElementSource for MemoryContainer {
    fn items(&self) -> Vec<ItemId> {
        self.children.clone()
    }

    fn append_markup(&mut self, markup: &str) -> Vec<ItemId> {
        self.markup.push(markup.to_owned());
        (0..count_list_items(markup)).map(|_| self.mint()).collect()
    }
}
