#![forbid(unsafe_code)]

//! Baraja public facade crate.
//!
//! A card stack that fans out, steps through its items, brings any item to
//! the front, and animates newly appended items in. This crate re-exports
//! the types a host needs and offers a prelude for day-to-day use.
//!
//! The host implements [`Renderer`] (apply style patches, measure widths)
//! and [`ElementSource`] (enumerate items, append markup), then drives a
//! [`Baraja`] by reporting transition ends and advancing time.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use baraja_core::{
    BarajaOptions, Direction, Easing, FanLayout, FanOrigin, FanSettings, FixedScatter,
    InitializationError, ItemId, OriginRange, RandomScatter, ResolvedFanSettings, ScatterSource,
    Stack, StepDirection, StylePatch, TargetTransform, Transform, TransformOrigin, Transition,
    TransitionProperty, compute_layout,
};

// --- Runtime re-exports ----------------------------------------------------

pub use baraja_runtime::{
    Baraja, BarajaConfig, Completion, ConfigError, Dispatch, DispatchConfig, ElementSource,
    OperationKind, OperationState, Renderer, Request, Ticket,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type.
#[derive(Debug)]
pub enum Error {
    /// The container could not be taken over.
    Init(InitializationError),
    /// Configuration could not be loaded or failed validation.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Init(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<InitializationError> for Error {
    fn from(err: InitializationError) -> Self {
        Self::Init(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for Baraja APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Build a deck from a validated configuration.
///
/// # Errors
///
/// [`Error::Config`] when `config` fails validation, [`Error::Init`] when
/// the container holds fewer than two items.
pub fn build<S: ElementSource, R: Renderer>(
    source: S,
    renderer: R,
    config: BarajaConfig,
) -> Result<Baraja<S, R>> {
    let config = config.validated()?;
    Ok(Baraja::from_config(source, renderer, config)?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Baraja, BarajaConfig, BarajaOptions, Direction, Dispatch, ElementSource, Error,
        FanOrigin, FanSettings, ItemId, Renderer, Result, StylePatch,
    };

    pub use crate::{core, runtime};
}

pub use baraja_core as core;
pub use baraja_runtime as runtime;
