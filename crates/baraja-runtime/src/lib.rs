#![forbid(unsafe_code)]

//! Runtime: operation sequencing against a host renderer.
//!
//! # Role in Baraja
//! `baraja-runtime` turns the pure stack and fan arithmetic of
//! `baraja-core` into animated operations. It serializes requests, applies
//! style patches through a [`Renderer`], waits for the host to report
//! transition ends, and resolves a [`Ticket`] once per operation.
//!
//! # Primary responsibilities
//! - **Dispatcher**: one operation in flight; close-before-act; queueing.
//! - **Completion**: counted batches with a timeout fallback.
//! - **Stage**: knows which patches actually start a transition.
//! - **Config**: TOML/JSON loading of options and limits (`config` feature).
//!
//! # How it fits in the system
//! The host owns the clock and the document. It calls
//! [`Baraja::transition_end`] when an item's transition finishes and
//! [`Baraja::tick`] as time passes; everything else is driven from here.

pub mod baraja;
pub mod completion;
pub mod config;
pub mod dispatcher;
pub mod host;
pub mod stage;
pub mod waits;

pub use baraja::Baraja;
pub use completion::{Completion, CompletionBatch, OperationKind, Ticket, TicketSender};
pub use config::{BarajaConfig, ConfigError, DispatchConfig};
pub use dispatcher::{Dispatch, Dispatcher, OperationState, Request};
pub use host::{ElementSource, Renderer};
pub use stage::{ItemVisual, Stage};
pub use waits::{Wait, WaitKey, WaitTable};
