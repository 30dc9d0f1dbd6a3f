#![forbid(unsafe_code)]

//! Headless renderer.
//!
//! [`HeadlessRenderer`] keeps the CSS text each item would carry and a
//! transcript of every property write, in application order. The
//! transcript hashes to a stable checksum so scenarios can be compared
//! across runs.

use std::collections::HashMap;

use baraja_core::{ItemId, StylePatch};
use baraja_runtime::Renderer;

/// Width reported for items without an explicit width.
pub const DEFAULT_ITEM_WIDTH: f64 = 200.0;

/// Current inline style of one item, as CSS text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssStyle {
    pub z_index: Option<String>,
    pub opacity: Option<String>,
    pub transform_origin: Option<String>,
    pub transition: Option<String>,
    pub transform: Option<String>,
}

/// A [`Renderer`] that records instead of drawing.
#[derive(Debug, Clone)]
pub struct HeadlessRenderer {
    default_width: f64,
    widths: HashMap<ItemId, f64>,
    styles: HashMap<ItemId, CssStyle>,
    applied: Vec<(ItemId, StylePatch)>,
    transcript: Vec<String>,
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::with_width(DEFAULT_ITEM_WIDTH)
    }

    /// Report `width` for every item.
    pub fn with_width(width: f64) -> Self {
        Self {
            default_width: width,
            widths: HashMap::new(),
            styles: HashMap::new(),
            applied: Vec::new(),
            transcript: Vec::new(),
        }
    }

    pub fn set_width(&mut self, item: ItemId, width: f64) {
        self.widths.insert(item, width);
    }

    pub fn style(&self, item: ItemId) -> Option<&CssStyle> {
        self.styles.get(&item)
    }

    /// The item's `transform` text, `"none"` when never set.
    pub fn transform(&self, item: ItemId) -> &str {
        self.style(item)
            .and_then(|s| s.transform.as_deref())
            .unwrap_or("none")
    }

    pub fn z_index(&self, item: ItemId) -> Option<i32> {
        self.style(item)?.z_index.as_deref()?.parse().ok()
    }

    /// Every patch received, in order.
    pub fn applied(&self) -> &[(ItemId, StylePatch)] {
        &self.applied
    }

    /// Patches received for one item.
    pub fn applied_to(&self, item: ItemId) -> Vec<&StylePatch> {
        self.applied
            .iter()
            .filter(|(i, _)| *i == item)
            .map(|(_, p)| p)
            .collect()
    }

    /// One line per property write: `item#0 transform: none`.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// BLAKE3 of the transcript, prefixed like `blake3:<hex>`.
    pub fn transcript_checksum(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for line in &self.transcript {
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }
        format!("blake3:{}", hasher.finalize().to_hex())
    }

    /// Forget the recorded patches and transcript; styles are kept.
    pub fn clear_log(&mut self) {
        self.applied.clear();
        self.transcript.clear();
    }

    fn write(&mut self, item: ItemId, property: &str, value: String) {
        self.transcript.push(format!("{item} {property}: {value}"));
        let style = self.styles.entry(item).or_default();
        let slot = match property {
            "z-index" => &mut style.z_index,
            "opacity" => &mut style.opacity,
            "transform-origin" => &mut style.transform_origin,
            "transition" => &mut style.transition,
            _ => &mut style.transform,
        };
        *slot = Some(value);
    }
}

impl Renderer for HeadlessRenderer {
    fn apply(&mut self, item: ItemId, patch: &StylePatch) {
        self.applied.push((item, patch.clone()));
        if let Some(z) = patch.z_index {
            self.write(item, "z-index", z.to_string());
        }
        if let Some(opacity) = patch.opacity {
            self.write(item, "opacity", opacity.to_string());
        }
        if let Some(origin) = patch.origin {
            self.write(item, "transform-origin", origin.to_string());
        }
        if let Some(transition) = &patch.transition {
            let text = transition
                .as_ref()
                .map_or_else(|| "none".to_owned(), ToString::to_string);
            self.write(item, "transition", text);
        }
        if let Some(transform) = patch.transform {
            self.write(item, "transform", transform.to_string());
        }
    }

    fn measure_width(&self, item: ItemId) -> f64 {
        self.widths.get(&item).copied().unwrap_or(self.default_width)
    }
}
