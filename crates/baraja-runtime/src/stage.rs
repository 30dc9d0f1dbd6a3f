#![forbid(unsafe_code)]

//! Renderer wrapper that remembers what it last applied.
//!
//! A transition only fires its end signal when the animated value actually
//! changes. [`Stage::apply`] compares each patch against the last known
//! state of the item and reports whether the host should be expected to
//! signal completion, and if so, after how long.

use std::collections::HashMap;

use baraja_core::{ItemId, Stack, StylePatch, Transform, TransformOrigin, Transition, TransitionProperty};
use web_time::Duration;

use crate::host::Renderer;

/// Last style values pushed for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemVisual {
    pub z_index: Option<i32>,
    pub opacity: f64,
    pub origin: Option<TransformOrigin>,
    pub transition: Option<Transition>,
    pub transform: Transform,
}

impl Default for ItemVisual {
    fn default() -> Self {
        Self {
            z_index: None,
            opacity: 1.0,
            origin: None,
            transition: None,
            transform: Transform::None,
        }
    }
}

fn same_transform(a: &Transform, b: &Transform) -> bool {
    a == b || (a.is_identity() && b.is_identity())
}

/// A [`Renderer`] plus the per-item state it was last given.
#[derive(Debug)]
pub struct Stage<R> {
    renderer: R,
    visuals: HashMap<ItemId, ItemVisual>,
}

impl<R: Renderer> Stage<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            visuals: HashMap::new(),
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub fn visual(&self, item: ItemId) -> Option<&ItemVisual> {
        self.visuals.get(&item)
    }

    pub fn measure_width(&self, item: ItemId) -> f64 {
        self.renderer.measure_width(item)
    }

    /// Forward `patch` to the renderer.
    ///
    /// Returns the expected transition time when the patch starts a visible
    /// transition, `None` when the item settles immediately (nothing
    /// animatable changed, no transition is set, or it has zero length).
    pub fn apply(&mut self, item: ItemId, patch: &StylePatch) -> Option<Duration> {
        if patch.is_empty() {
            return None;
        }
        self.renderer.apply(item, patch);

        let visual = self.visuals.entry(item).or_default();
        let mut transform_changed = false;
        let mut opacity_changed = false;

        if let Some(z) = patch.z_index {
            visual.z_index = Some(z);
        }
        if let Some(opacity) = patch.opacity {
            opacity_changed = opacity != visual.opacity;
            visual.opacity = opacity;
        }
        if let Some(origin) = patch.origin {
            visual.origin = Some(origin);
        }
        if let Some(transition) = &patch.transition {
            visual.transition = transition.clone();
        }
        if let Some(transform) = patch.transform {
            transform_changed = !same_transform(&transform, &visual.transform);
            visual.transform = transform;
        }

        let transition = visual.transition.as_ref()?;
        if transition.total().is_zero() {
            return None;
        }
        let animates = match transition.property {
            TransitionProperty::All => transform_changed || opacity_changed,
            TransitionProperty::Transform => transform_changed,
        };
        animates.then(|| transition.total())
    }

    /// Push z-indices that differ from what the renderer last received.
    pub fn sync_z(&mut self, stack: &Stack) {
        for (item, z) in stack.z_indices() {
            let known = self.visuals.get(&item).and_then(|v| v.z_index);
            if known != Some(z) {
                self.apply(item, &StylePatch::new().z_index(z));
            }
        }
    }
}
