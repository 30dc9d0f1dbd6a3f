#![no_main]

use arbitrary::Arbitrary;
use baraja_core::{ItemId, Stack, StepDirection};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Front(u8),
    Next,
    Prev,
    Displace(u8, bool),
    Normalize,
    Append(Vec<u8>),
}

#[derive(Debug, Arbitrary)]
struct Input {
    items: Vec<u8>,
    z_index_min: i16,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let items: Vec<ItemId> = input.items.iter().map(|&b| ItemId(u64::from(b))).collect();
    let Ok(mut stack) = Stack::new(&items, i32::from(input.z_index_min)) else {
        return;
    };
    assert!(stack.is_canonical());

    for op in input.ops.into_iter().take(256) {
        match op {
            Op::Front(b) => {
                let item = ItemId(u64::from(b));
                let was_top = stack.top() == item;
                let moved = stack.bring_to_front(item);
                assert!(!(was_top && moved), "front of top item must be a no-op");
                if stack.contains(item) {
                    assert_eq!(stack.top(), item);
                }
                assert!(stack.is_canonical());
            }
            Op::Next => {
                let top = stack.top();
                assert_eq!(stack.step(StepDirection::Next), top);
                assert_eq!(stack.bottom(), top);
                assert!(stack.is_canonical());
            }
            Op::Prev => {
                let bottom = stack.bottom();
                assert_eq!(stack.step(StepDirection::Prev), bottom);
                assert_eq!(stack.top(), bottom);
                assert!(stack.is_canonical());
            }
            Op::Displace(b, next) => {
                let direction = if next { StepDirection::Next } else { StepDirection::Prev };
                stack.displace(ItemId(u64::from(b)), direction);
                assert!(stack.is_canonical());
            }
            Op::Normalize => {
                stack.normalize();
                assert!(stack.is_canonical());
            }
            Op::Append(bytes) => {
                let before = stack.len();
                let new: Vec<ItemId> = bytes.iter().map(|&b| ItemId(256 + u64::from(b))).collect();
                let added = stack.append(&new);
                assert_eq!(stack.len(), before + added.len());
                assert!(stack.is_canonical());
            }
        }
    }
});
