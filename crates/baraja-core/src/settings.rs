#![forbid(unsafe_code)]

//! Fan settings and widget options.
//!
//! [`FanSettings`] is the caller-facing, partially filled value; every field
//! is optional. [`FanSettings::resolve`] merges it with a set of defaults
//! into a [`ResolvedFanSettings`] that the layout code consumes.
//!
//! # Falsy override
//!
//! Merging follows "value or default" semantics: a zero number, an empty
//! easing string, and `false` are all treated as unset and replaced by the
//! default. Two visible consequences:
//!
//! - `range: Some(0.0)` yields the default range, not a collapsed fan.
//! - `center: Some(false)` yields the default `center: true`; an
//!   off-center fan can only be requested by changing the defaults.

use web_time::Duration;

use crate::style::Easing;

/// Which side the fan opens towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl Direction {
    /// `-1.0` for left, `1.0` for right.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Horizontal origin range spread across stack positions.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OriginRange {
    pub min_x: f64,
    pub max_x: f64,
}

/// Caller-supplied transform origin (percent), all fields optional.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FanOrigin {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub min_x: Option<f64>,
    pub max_x: Option<f64>,
}

impl FanOrigin {
    /// A fixed origin point.
    #[must_use]
    pub fn point(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// A linear origin range with a fixed vertical position.
    #[must_use]
    pub fn range(min_x: f64, max_x: f64, y: f64) -> Self {
        Self {
            x: None,
            y: Some(y),
            min_x: Some(min_x),
            max_x: Some(max_x),
        }
    }
}

/// Fan settings as requested by a caller.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FanSettings {
    pub direction: Option<Direction>,
    pub origin: Option<FanOrigin>,
    /// Transition duration in milliseconds.
    pub speed: Option<u32>,
    pub easing: Option<Easing>,
    /// Total fan angle in degrees.
    pub range: Option<f64>,
    /// Total horizontal spread in pixels.
    pub translation: Option<f64>,
    pub center: Option<bool>,
    pub scatter: Option<bool>,
}

impl FanSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    #[must_use]
    pub fn origin(mut self, origin: FanOrigin) -> Self {
        self.origin = Some(origin);
        self
    }

    #[must_use]
    pub fn speed(mut self, ms: u32) -> Self {
        self.speed = Some(ms);
        self
    }

    #[must_use]
    pub fn easing(mut self, easing: impl Into<Easing>) -> Self {
        self.easing = Some(easing.into());
        self
    }

    #[must_use]
    pub fn range(mut self, degrees: f64) -> Self {
        self.range = Some(degrees);
        self
    }

    #[must_use]
    pub fn translation(mut self, px: f64) -> Self {
        self.translation = Some(px);
        self
    }

    #[must_use]
    pub fn center(mut self, center: bool) -> Self {
        self.center = Some(center);
        self
    }

    #[must_use]
    pub fn scatter(mut self, scatter: bool) -> Self {
        self.scatter = Some(scatter);
        self
    }

    /// Merge with `defaults` using falsy-override semantics.
    pub fn resolve(&self, defaults: &ResolvedFanSettings) -> ResolvedFanSettings {
        let origin = match self.origin {
            None => defaults.origin,
            Some(o) => {
                let range = match (o.min_x, o.max_x) {
                    (Some(min_x), Some(max_x)) if !min_x.is_falsy() && !max_x.is_falsy() => {
                        Some(OriginRange { min_x, max_x })
                    }
                    _ => None,
                };
                ResolvedOrigin {
                    x: or_default(o.x, defaults.origin.x),
                    y: or_default(o.y, defaults.origin.y),
                    range,
                }
            }
        };

        ResolvedFanSettings {
            direction: self.direction.unwrap_or(defaults.direction),
            origin,
            speed: or_default(self.speed, defaults.speed),
            easing: or_default(self.easing.clone(), defaults.easing.clone()),
            range: or_default(self.range, defaults.range),
            translation: or_default(self.translation, defaults.translation),
            center: or_default(self.center, defaults.center),
            scatter: or_default(self.scatter, defaults.scatter),
        }
    }
}

/// Values that read as "unset" under falsy-override merging.
trait Falsy {
    fn is_falsy(&self) -> bool;
}

impl Falsy for f64 {
    fn is_falsy(&self) -> bool {
        *self == 0.0 || self.is_nan()
    }
}

impl Falsy for u32 {
    fn is_falsy(&self) -> bool {
        *self == 0
    }
}

impl Falsy for bool {
    fn is_falsy(&self) -> bool {
        !*self
    }
}

impl Falsy for Easing {
    fn is_falsy(&self) -> bool {
        self.is_empty()
    }
}

fn or_default<T: Falsy>(value: Option<T>, default: T) -> T {
    match value {
        Some(v) if !v.is_falsy() => v,
        _ => default,
    }
}

/// Origin after merging.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedOrigin {
    pub x: f64,
    pub y: f64,
    pub range: Option<OriginRange>,
}

/// Fully populated fan settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResolvedFanSettings {
    pub direction: Direction,
    pub origin: ResolvedOrigin,
    /// Transition duration in milliseconds.
    pub speed: u32,
    pub easing: Easing,
    pub range: f64,
    pub translation: f64,
    pub center: bool,
    pub scatter: bool,
}

impl Default for ResolvedFanSettings {
    fn default() -> Self {
        Self {
            direction: Direction::Right,
            origin: ResolvedOrigin {
                x: 25.0,
                y: 100.0,
                range: None,
            },
            speed: 500,
            easing: Easing::EASE_OUT,
            range: 90.0,
            translation: 0.0,
            center: true,
            scatter: false,
        }
    }
}

impl ResolvedFanSettings {
    pub fn speed_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.speed))
    }
}

/// Widget-wide animation options.
///
/// Unlike [`FanSettings`], these merge by plain override: whatever the
/// caller sets wins, including zero.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BarajaOptions {
    pub easing: Easing,
    /// Transition duration in milliseconds.
    pub speed: u32,
}

impl Default for BarajaOptions {
    fn default() -> Self {
        Self {
            easing: Easing::EASE_IN_OUT,
            speed: 300,
        }
    }
}

impl BarajaOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn easing(mut self, easing: impl Into<Easing>) -> Self {
        self.easing = easing.into();
        self
    }

    #[must_use]
    pub fn speed(mut self, ms: u32) -> Self {
        self.speed = ms;
        self
    }

    pub fn speed_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.speed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(settings: FanSettings) -> ResolvedFanSettings {
        settings.resolve(&ResolvedFanSettings::default())
    }

    #[test]
    fn empty_settings_resolve_to_defaults() {
        assert_eq!(resolve(FanSettings::new()), ResolvedFanSettings::default());
    }

    #[test]
    fn explicit_values_override() {
        let r = resolve(
            FanSettings::new()
                .direction(Direction::Left)
                .speed(800)
                .easing("linear")
                .range(120.0)
                .translation(60.0)
                .scatter(true),
        );
        assert_eq!(r.direction, Direction::Left);
        assert_eq!(r.speed, 800);
        assert_eq!(r.easing, Easing::LINEAR);
        assert_eq!(r.range, 120.0);
        assert_eq!(r.translation, 60.0);
        assert!(r.scatter);
    }

    #[test]
    fn zero_and_empty_fall_back_to_defaults() {
        let r = resolve(
            FanSettings::new()
                .speed(0)
                .easing("")
                .range(0.0)
                .origin(FanOrigin::point(0.0, 0.0)),
        );
        assert_eq!(r.speed, 500);
        assert_eq!(r.easing, Easing::EASE_OUT);
        assert_eq!(r.range, 90.0);
        assert_eq!(r.origin.x, 25.0);
        assert_eq!(r.origin.y, 100.0);
    }

    #[test]
    fn center_false_is_overridden() {
        let r = resolve(FanSettings::new().center(false));
        assert!(r.center);

        let defaults = ResolvedFanSettings {
            center: false,
            ..ResolvedFanSettings::default()
        };
        assert!(!FanSettings::new().center(false).resolve(&defaults).center);
    }

    #[test]
    fn nan_range_is_unset() {
        assert_eq!(resolve(FanSettings::new().range(f64::NAN)).range, 90.0);
    }

    #[test]
    fn origin_range_needs_both_bounds() {
        let r = resolve(FanSettings::new().origin(FanOrigin::range(10.0, 90.0, 80.0)));
        assert_eq!(
            r.origin.range,
            Some(OriginRange {
                min_x: 10.0,
                max_x: 90.0
            })
        );
        assert_eq!(r.origin.y, 80.0);
        assert_eq!(r.origin.x, 25.0);

        let r = resolve(FanSettings::new().origin(FanOrigin::range(0.0, 90.0, 80.0)));
        assert_eq!(r.origin.range, None);
    }

    #[test]
    fn options_override_plainly() {
        let o = BarajaOptions::new().speed(0).easing("ease");
        assert_eq!(o.speed, 0);
        assert_eq!(o.easing, Easing::EASE);
        assert_eq!(BarajaOptions::default().speed_duration(), Duration::from_millis(300));
    }
}
