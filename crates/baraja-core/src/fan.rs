#![forbid(unsafe_code)]

//! Fan geometry.
//!
//! [`compute_layout`] maps every item of a [`Stack`] to the transform it
//! should animate to when the fan opens. Items are addressed by stack
//! position: position 0 is the top item, position `n - 1` the bottom.
//!
//! # Formulas
//!
//! With `n` items and position `p`:
//!
//! - `step_angle = range / (n - 1)`
//! - `angle = base - step_angle * p` where `base = range / 2` when centered,
//!   otherwise `range`
//! - `step_translation = translation / (n - 1)`
//! - `translation_px = step_translation * (n - p - 1)`
//! - with an origin range, `origin_x = p * (max - min + step) / n + min`
//!   where `step = (max - min) / n`
//!
//! A left fan negates angle and translation and mirrors `origin_x` around
//! the middle of the range.
//!
//! Scatter adds `floor(u * step)` of extra angle and translation to every
//! position but the last, where `u` comes from a [`ScatterSource`].

use crate::scatter::ScatterSource;
use crate::settings::{Direction, ResolvedFanSettings};
use crate::stack::{ItemId, Stack};
use crate::style::{StylePatch, Transform, TransformOrigin, Transition, TransitionProperty};

/// Where one item should end up when the fan is open.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetTransform {
    pub item: ItemId,
    /// Stack position the geometry was derived from (0 = top).
    pub position: usize,
    pub origin: TransformOrigin,
    pub rotation_deg: f64,
    pub translation_px: f64,
    pub transition: Transition,
}

impl TargetTransform {
    pub fn transform(&self) -> Transform {
        Transform::fan(self.translation_px, self.rotation_deg)
    }

    /// Origin, transition, and transform as one renderer update.
    pub fn patch(&self) -> StylePatch {
        StylePatch::new()
            .origin(self.origin)
            .transition(self.transition.clone())
            .transform(self.transform())
    }
}

/// Per-item targets, in the stack's insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FanLayout {
    targets: Vec<TargetTransform>,
}

impl FanLayout {
    pub fn get(&self, item: ItemId) -> Option<&TargetTransform> {
        self.targets.iter().find(|t| t.item == item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetTransform> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Targets ordered by stack position (top first).
    pub fn by_position(&self) -> Vec<&TargetTransform> {
        let mut sorted: Vec<&TargetTransform> = self.targets.iter().collect();
        sorted.sort_by_key(|t| t.position);
        sorted
    }
}

impl IntoIterator for FanLayout {
    type Item = TargetTransform;
    type IntoIter = std::vec::IntoIter<TargetTransform>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.into_iter()
    }
}

/// Compute the open-fan target of every item in `stack`.
pub fn compute_layout(
    stack: &Stack,
    settings: &ResolvedFanSettings,
    scatter: &mut dyn ScatterSource,
) -> FanLayout {
    let total = stack.len();
    let n = total as f64;
    let step_left = settings.direction == Direction::Left;

    let step_angle = settings.range / (n - 1.0);
    let step_translation = settings.translation / (n - 1.0);
    let base = if settings.center {
        settings.range / 2.0
    } else {
        settings.range
    };

    let transition = Transition::new(
        TransitionProperty::Transform,
        settings.speed_duration(),
        settings.easing.clone(),
    );

    let mut targets = Vec::with_capacity(total);
    for (item, _) in stack.z_indices() {
        let position = stack.position(item).unwrap_or(0);
        let pos = position as f64;

        let origin_x = match settings.origin.range {
            Some(r) => {
                let step_origin = (r.max_x - r.min_x) / n;
                let x = pos * (r.max_x - r.min_x + step_origin) / n + r.min_x;
                if step_left { r.max_x + r.min_x - x } else { x }
            }
            None => settings.origin.x,
        };

        let mut angle = base - step_angle * pos;
        let mut translation = step_translation * (n - pos - 1.0);
        if step_left {
            angle = -angle;
            translation = -translation;
        }

        if settings.scatter {
            let extra_angle = (scatter.next_unit() * step_angle).floor();
            let extra_translation = (scatter.next_unit() * step_translation).floor();
            if position != total - 1 {
                if step_left {
                    angle += extra_angle;
                    translation -= extra_translation;
                } else {
                    angle -= extra_angle;
                    translation += extra_translation;
                }
            }
        }

        targets.push(TargetTransform {
            item,
            position,
            origin: TransformOrigin::new(origin_x, settings.origin.y),
            rotation_deg: angle,
            translation_px: translation,
            transition: transition.clone(),
        });
    }

    FanLayout { targets }
}
