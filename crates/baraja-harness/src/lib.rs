#![forbid(unsafe_code)]

//! Harness: headless host fixtures for Baraja.
//!
//! # Role in Baraja
//! `baraja-harness` stands in for a document. [`HeadlessRenderer`] records
//! the CSS each item would carry, [`MemoryContainer`] mints item handles
//! from markup, and the drivers in [`driver`] deliver transition ends and
//! advance time the way a browser host would. Scenario tests in `tests/`
//! drive the full widget through these fixtures.

pub mod container;
pub mod driver;
pub mod logging;
pub mod renderer;

pub use container::{MemoryContainer, count_list_items};
pub use driver::{DriveReport, settle_cooperative, settle_framed, settle_silent};
pub use logging::{CapturedEvent, init_test_logging, with_captured_events};
pub use renderer::{CssStyle, DEFAULT_ITEM_WIDTH, HeadlessRenderer};

use baraja_core::BarajaOptions;
use baraja_runtime::Baraja;

/// The deck most scenarios start from.
pub type HeadlessDeck = Baraja<MemoryContainer, HeadlessRenderer>;

/// A deck over `count` fresh items with default options.
///
/// # Panics
///
/// If `count < 2`.
pub fn deck(count: usize) -> HeadlessDeck {
    match Baraja::initialize(
        MemoryContainer::with_items(count),
        HeadlessRenderer::new(),
        BarajaOptions::default(),
    ) {
        Ok(deck) => deck,
        Err(err) => panic!("fixture deck: {err}"),
    }
}
