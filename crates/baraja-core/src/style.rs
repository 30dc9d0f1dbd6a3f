#![forbid(unsafe_code)]

//! Style values pushed to the renderer.
//!
//! Every value formats as the CSS text a browser renderer would assign, so a
//! host can forward `to_string()` directly to `element.style`.

use std::borrow::Cow;
use std::fmt;

use web_time::Duration;

/// Avoid printing `-0` for values that collapsed to zero.
fn tidy(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

// ---------------------------------------------------------------------------
// Transform
// ---------------------------------------------------------------------------

/// A 2D transform applied to an item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Identity (`none`).
    None,
    /// `scale(s)? translate(x px) rotate(a deg)`.
    Affine {
        scale: Option<f64>,
        translate_px: f64,
        rotate_deg: f64,
    },
}

impl Transform {
    /// Translation plus rotation, as used by the fan and navigation.
    #[must_use]
    pub const fn fan(translate_px: f64, rotate_deg: f64) -> Self {
        Self::Affine {
            scale: None,
            translate_px,
            rotate_deg,
        }
    }

    /// Scaled translation plus rotation, as used by entrance effects.
    #[must_use]
    pub const fn scaled(scale: f64, translate_px: f64, rotate_deg: f64) -> Self {
        Self::Affine {
            scale: Some(scale),
            translate_px,
            rotate_deg,
        }
    }

    /// Rotation in degrees (0 for identity).
    pub fn rotation_deg(&self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Affine { rotate_deg, .. } => *rotate_deg,
        }
    }

    /// Horizontal translation in pixels (0 for identity).
    pub fn translation_px(&self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Affine { translate_px, .. } => *translate_px,
        }
    }

    /// Whether this transform renders identically to `none`.
    pub fn is_identity(&self) -> bool {
        match self {
            Self::None => true,
            Self::Affine {
                scale,
                translate_px,
                rotate_deg,
            } => scale.is_none_or(|s| s == 1.0) && *translate_px == 0.0 && *rotate_deg == 0.0,
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Affine {
                scale,
                translate_px,
                rotate_deg,
            } => {
                if let Some(s) = scale {
                    write!(f, "scale({}) ", tidy(*s))?;
                }
                write!(
                    f,
                    "translate({}px) rotate({}deg)",
                    tidy(*translate_px),
                    tidy(*rotate_deg)
                )
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Transform origin
// ---------------------------------------------------------------------------

/// Transform origin in percent of the item box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformOrigin {
    pub x: f64,
    pub y: f64,
}

impl TransformOrigin {
    /// The box center (`50% 50%`).
    pub const CENTER: Self = Self { x: 50.0, y: 50.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for TransformOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}% {}%", tidy(self.x), tidy(self.y))
    }
}

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

/// CSS timing function text (`ease-out`, `cubic-bezier(...)`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Easing(Cow<'static, str>);

impl Easing {
    pub const EASE: Self = Self(Cow::Borrowed("ease"));
    pub const EASE_IN: Self = Self(Cow::Borrowed("ease-in"));
    pub const EASE_OUT: Self = Self(Cow::Borrowed("ease-out"));
    pub const EASE_IN_OUT: Self = Self(Cow::Borrowed("ease-in-out"));
    pub const LINEAR: Self = Self(Cow::Borrowed("linear"));

    pub fn new(text: impl Into<Cow<'static, str>>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty text counts as unset when merging settings.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Easing {
    fn default() -> Self {
        Self::EASE_IN_OUT
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Easing {
    fn from(text: &'static str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Easing {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// Which properties a transition animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionProperty {
    All,
    Transform,
}

impl fmt::Display for TransitionProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Transform => "transform",
        })
    }
}

/// A single-property CSS transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub property: TransitionProperty,
    pub duration: Duration,
    pub easing: Easing,
    pub delay: Duration,
}

impl Transition {
    #[must_use]
    pub fn new(property: TransitionProperty, duration: Duration, easing: Easing) -> Self {
        Self {
            property,
            duration,
            easing,
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Delay plus duration: when the transition is expected to end.
    pub fn total(&self) -> Duration {
        self.delay + self.duration
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}ms {} {}ms",
            self.property,
            self.duration.as_millis(),
            self.easing,
            self.delay.as_millis()
        )
    }
}

// ---------------------------------------------------------------------------
// Style patch
// ---------------------------------------------------------------------------

/// A partial style update for one item.
///
/// Renderers must apply fields in declaration order: in particular the
/// transition has to be in place before the transform changes, otherwise
/// the change is not animated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StylePatch {
    pub z_index: Option<i32>,
    pub opacity: Option<f64>,
    pub origin: Option<TransformOrigin>,
    /// `Some(None)` clears the transition (`transition: none`).
    pub transition: Option<Option<Transition>>,
    pub transform: Option<Transform>,
}

impl StylePatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn z_index(mut self, z: i32) -> Self {
        self.z_index = Some(z);
        self
    }

    #[must_use]
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity.clamp(0.0, 1.0));
        self
    }

    #[must_use]
    pub fn origin(mut self, origin: TransformOrigin) -> Self {
        self.origin = Some(origin);
        self
    }

    #[must_use]
    pub fn transition(mut self, transition: Transition) -> Self {
        self.transition = Some(Some(transition));
        self
    }

    #[must_use]
    pub fn no_transition(mut self) -> Self {
        self.transition = Some(None);
        self
    }

    #[must_use]
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
