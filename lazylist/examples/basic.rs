// Example: windowing over a large list with a loading tail.
use lazylist::{Align, SlotKind, WindowEngine, WindowOptions};

fn main() {
    let mut engine = WindowEngine::new(WindowOptions::new(1_000_000, |_| 24).with_overscan(3));
    engine.set_viewport_and_scroll(240, 123_456);

    println!("total_extent={}", engine.total_extent());
    println!("window={:?}", engine.window().range);

    let mut slots = Vec::new();
    engine.collect_slots(&mut slots);
    println!("first_slot={:?}", slots.first());

    let off = engine.scroll_to_index_offset(999_999, Align::End);
    engine.set_scroll_offset_clamped(off);
    println!("after scroll_to_index: offset={}", engine.scroll_offset());

    // While more pages may exist, a synthetic loading slot trails the items.
    engine.set_loading_slot_visible(true);
    let tail = engine.slot_at(engine.slot_count() - 1);
    println!("tail={tail:?}");
    assert!(matches!(tail.map(|slot| slot.kind), Some(SlotKind::Loading)));
}
