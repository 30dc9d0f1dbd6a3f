#![no_main]

use arbitrary::Arbitrary;
use baraja_core::{BarajaOptions, FanSettings, FixedScatter, ItemId};
use baraja_harness::{HeadlessRenderer, MemoryContainer};
use baraja_runtime::{Baraja, Dispatch};
use libfuzzer_sys::fuzz_target;
use web_time::Duration;

#[derive(Debug, Arbitrary)]
enum Step {
    Fan { scatter: bool, left: bool },
    Close,
    Next,
    Previous,
    Front(u8),
    Click(u8),
    Add(u8),
    Signal(u8),
    Tick(u16),
}

#[derive(Debug, Arbitrary)]
struct Input {
    count: u8,
    speed: u16,
    unit: f64,
    steps: Vec<Step>,
}

fuzz_target!(|input: Input| {
    let count = usize::from(input.count % 12) + 2;
    let options = BarajaOptions::default().speed(u32::from(input.speed % 2000));
    let Ok(deck) = Baraja::initialize(
        MemoryContainer::with_items(count),
        HeadlessRenderer::new(),
        options,
    ) else {
        return;
    };
    let mut deck = deck.with_scatter(FixedScatter::new(input.unit));
    let mut tickets = Vec::new();

    for step in input.steps.into_iter().take(128) {
        let dispatch = match step {
            Step::Fan { scatter, left } => {
                let mut settings = FanSettings::new().scatter(scatter);
                if left {
                    settings = settings.direction(baraja_core::Direction::Left);
                }
                deck.fan(Some(settings))
            }
            Step::Close => deck.close(),
            Step::Next => deck.next(),
            Step::Previous => deck.previous(),
            Step::Front(b) => deck.front(ItemId(u64::from(b % 32))),
            Step::Click(b) => deck.click(ItemId(u64::from(b % 32))),
            Step::Add(n) => deck.add(&"<li></li>".repeat(usize::from(n % 4))),
            Step::Signal(b) => {
                deck.transition_end(ItemId(u64::from(b % 32)));
                Dispatch::Ignored
            }
            Step::Tick(ms) => {
                deck.tick(Duration::from_millis(u64::from(ms)));
                Dispatch::Ignored
            }
        };
        if let Some(ticket) = dispatch.into_ticket() {
            tickets.push(ticket);
        }
    }

    // Drain without host signals; every accepted request must resolve.
    baraja_harness::settle_silent(&mut deck);
    assert!(!deck.is_animating());
    assert!(deck.stack().is_canonical());
    for ticket in &tickets {
        assert_eq!(ticket.completion_count(), 1);
    }
});
