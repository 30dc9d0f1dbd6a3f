#![no_main]

use arbitrary::Arbitrary;
use baraja_core::{
    Direction, FanOrigin, FanSettings, FixedScatter, ItemId, ResolvedFanSettings, Stack,
    compute_layout,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    count: u8,
    left: bool,
    range: f64,
    translation: f64,
    origin: Option<(f64, f64)>,
    center: bool,
    scatter: bool,
    unit: f64,
}

fuzz_target!(|input: Input| {
    let count = usize::from(input.count % 64) + 2;
    let items: Vec<ItemId> = (0..count as u64).map(ItemId).collect();
    let Ok(stack) = Stack::initialize(&items) else {
        return;
    };

    let mut settings = FanSettings::new()
        .range(input.range)
        .translation(input.translation)
        .center(input.center)
        .scatter(input.scatter);
    if input.left {
        settings = settings.direction(Direction::Left);
    }
    if let Some((min, max)) = input.origin {
        settings = settings.origin(FanOrigin::range(min, max, 100.0));
    }
    let resolved = settings.resolve(&ResolvedFanSettings::default());

    let layout = compute_layout(&stack, &resolved, &mut FixedScatter::new(input.unit));
    assert_eq!(layout.len(), count);

    let mut positions: Vec<usize> = layout.iter().map(|t| t.position).collect();
    positions.sort_unstable();
    assert!(positions.iter().copied().eq(0..count), "positions must be a permutation");

    if !resolved.scatter && resolved.range.is_finite() && resolved.translation.is_finite() {
        // Mirror check: the right-hand layout negates to the left-hand one.
        let mut mirrored = resolved.clone();
        mirrored.direction = match resolved.direction {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        };
        let other = compute_layout(&stack, &mirrored, &mut FixedScatter::new(0.0));
        for (a, b) in layout.iter().zip(other.iter()) {
            assert_eq!(a.item, b.item);
            assert_eq!(a.rotation_deg, -b.rotation_deg);
            assert_eq!(a.translation_px, -b.translation_px);
        }
    }
});
