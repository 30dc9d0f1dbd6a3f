#![forbid(unsafe_code)]

//! Core: stack model, fan geometry, and style values.
//!
//! # Role in Baraja
//! `baraja-core` is the pure layer. It owns the z-order of a set of opaque
//! item handles and the arithmetic that turns a stack plus [`FanSettings`]
//! into per-item target transforms. Nothing here touches a renderer or a
//! clock; `baraja-runtime` drives these types against a host.
//!
//! # Primary responsibilities
//! - **Stack**: contiguous z-order over item handles (front, step, append).
//! - **FanSettings**: defaults merged with falsy-override semantics.
//! - **Fan layout**: rotation, translation, and origin per stack position.
//! - **Style values**: transforms, origins, and transitions that format as
//!   CSS text.

pub mod error;
pub mod fan;
pub mod scatter;
pub mod settings;
pub mod stack;
pub mod style;

pub use error::InitializationError;
pub use fan::{FanLayout, TargetTransform, compute_layout};
pub use scatter::{FixedScatter, RandomScatter, ScatterSource};
pub use settings::{
    BarajaOptions, Direction, FanOrigin, FanSettings, OriginRange, ResolvedFanSettings,
    ResolvedOrigin,
};
pub use stack::{DEFAULT_Z_INDEX_MIN, ItemId, Stack, StepDirection};
pub use style::{Easing, StylePatch, Transform, TransformOrigin, Transition, TransitionProperty};
