use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::Cell;
use core::cmp;

use crate::fenwick::PrefixSums;
use crate::{
    Align, ScrollDirection, ScrollState, SlotKind, VirtualWindow, WindowOptions, WindowRange,
    WindowSlot,
};

/// A headless windowing engine for incrementally loaded lists.
///
/// This type is intentionally UI-agnostic:
/// - It does not hold any UI objects or items; it only knows counts and sizes.
/// - Your adapter drives it by providing viewport geometry and scroll offsets.
/// - Rendering is exposed via zero-allocation iteration (`for_each_slot*`).
///
/// Geometry queries are synchronous and pure: recomputing a window has no
/// side effects and is safe to do on every event.
///
/// While more pages may exist, one synthetic trailing loading slot
/// ([`SlotKind::Loading`]) follows the real items; it has a fixed estimated
/// size and participates in the total extent, which keeps scrollbar geometry
/// and "jump to end" targets stable while the tail is still being fetched.
#[derive(Clone, Debug)]
pub struct WindowEngine {
    options: WindowOptions,
    viewport_size: u32,
    scroll_offset: u64,
    is_scrolling: bool,
    scroll_direction: Option<ScrollDirection>,
    last_scroll_event_ms: Option<u64>,
    loading_slot_visible: bool,

    sizes: Vec<u32>,     // per-item sizes (the loading slot is tracked apart)
    measured: Vec<bool>, // parallel to `sizes`
    sums: PrefixSums,

    notify_depth: Cell<usize>,
    notify_pending: Cell<bool>,
}

impl WindowEngine {
    pub fn new(options: WindowOptions) -> Self {
        ldebug!(
            item_count = options.item_count,
            overscan = options.overscan,
            "WindowEngine::new"
        );
        let scroll_offset = options.initial_offset;
        let mut engine = Self {
            viewport_size: 0,
            scroll_offset,
            is_scrolling: false,
            scroll_direction: None,
            last_scroll_event_ms: None,
            loading_slot_visible: false,
            sizes: Vec::new(),
            measured: Vec::new(),
            sums: PrefixSums::from_sizes(&[], None),
            options,
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
        };
        engine.rebuild_sizes();
        engine
    }

    pub fn options(&self) -> &WindowOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: WindowOptions) {
        let prev_count = self.options.item_count;
        let prev_slot_size = self.options.loading_slot_size;
        let estimate_unchanged =
            Arc::ptr_eq(&self.options.estimate_size, &options.estimate_size);
        self.options = options;
        ltrace!(
            item_count = self.options.item_count,
            overscan = self.options.overscan,
            "WindowEngine::set_options"
        );

        if self.options.item_count != prev_count
            || !estimate_unchanged
            || (self.loading_slot_visible && self.options.loading_slot_size != prev_slot_size)
        {
            self.rebuild_sizes();
        }
        self.notify();
    }

    /// Clones the current options, applies `f`, then delegates to
    /// `set_options`, which decides what needs rebuilding.
    pub fn update_options(&mut self, f: impl FnOnce(&mut WindowOptions)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&WindowEngine, bool) + Send + Sync + 'static>,
    ) {
        self.options.on_change = on_change.map(|f| Arc::new(f) as _);
        self.notify();
    }

    fn notify_now(&self) {
        if let Some(cb) = &self.options.on_change {
            cb(self, self.is_scrolling);
        }
    }

    fn notify(&self) {
        if self.notify_depth.get() > 0 {
            self.notify_pending.set(true);
            return;
        }
        self.notify_now();
    }

    /// Batches multiple updates into a single `on_change` notification.
    ///
    /// On a typical frame an adapter updates the viewport, scroll offset, and
    /// item count together; without batching each setter would fire
    /// `on_change` separately.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 && self.notify_pending.replace(false) {
            self.notify_now();
        }
    }

    /// Number of real items currently known.
    pub fn item_count(&self) -> usize {
        self.options.item_count
    }

    /// Number of windowable slots: items plus the loading slot when visible.
    pub fn slot_count(&self) -> usize {
        self.options.item_count + self.loading_slot_visible as usize
    }

    pub fn set_item_count(&mut self, item_count: usize) {
        if self.options.item_count == item_count {
            return;
        }
        self.options.item_count = item_count;
        self.rebuild_sizes();
        self.notify();
    }

    /// Grows the list after a page append.
    ///
    /// Existing measurements are kept: pages only ever append, so item
    /// indices are stable.
    pub fn append_items(&mut self, appended: usize) {
        if appended == 0 {
            return;
        }
        let next = self.options.item_count.saturating_add(appended);
        self.set_item_count(next);
    }

    pub fn loading_slot_visible(&self) -> bool {
        self.loading_slot_visible
    }

    /// Shows or hides the synthetic trailing loading slot.
    ///
    /// Adapters toggle this from the data source's "has more" state.
    pub fn set_loading_slot_visible(&mut self, visible: bool) {
        if self.loading_slot_visible == visible {
            return;
        }
        self.loading_slot_visible = visible;
        self.rebuild_sums();
        self.notify();
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.options.overscan = overscan;
        self.notify();
    }

    pub fn set_estimate_size(&mut self, f: impl Fn(usize) -> u32 + Send + Sync + 'static) {
        self.options.estimate_size = Arc::new(f);
        self.rebuild_sizes();
        self.notify();
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.scroll_direction
    }

    pub fn set_is_scrolling(&mut self, is_scrolling: bool) {
        if self.is_scrolling == is_scrolling {
            return;
        }
        self.is_scrolling = is_scrolling;
        if !is_scrolling {
            self.scroll_direction = None;
            self.last_scroll_event_ms = None;
        }
        self.notify();
    }

    pub fn notify_scroll_event(&mut self, now_ms: u64) {
        self.last_scroll_event_ms = Some(now_ms);
        self.set_is_scrolling(true);
    }

    /// Debounced `is_scrolling` reset; call on every timer/frame tick.
    pub fn update_scrolling(&mut self, now_ms: u64) {
        if !self.is_scrolling {
            return;
        }
        let Some(last) = self.last_scroll_event_ms else {
            return;
        };
        if now_ms.saturating_sub(last) >= self.options.is_scrolling_reset_delay_ms {
            self.set_is_scrolling(false);
        }
    }

    pub fn viewport_size(&self) -> u32 {
        self.viewport_size
    }

    pub fn set_viewport_size(&mut self, size: u32) {
        if self.viewport_size == size {
            return;
        }
        self.viewport_size = size;
        self.notify();
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    pub fn set_scroll_offset(&mut self, offset: u64) {
        if self.scroll_offset == offset {
            return;
        }
        let prev = self.scroll_offset;
        self.scroll_offset = offset;
        self.scroll_direction = match offset.cmp(&prev) {
            cmp::Ordering::Greater => Some(ScrollDirection::Forward),
            cmp::Ordering::Less => Some(ScrollDirection::Backward),
            cmp::Ordering::Equal => self.scroll_direction,
        };
        self.notify();
    }

    pub fn set_scroll_offset_clamped(&mut self, offset: u64) {
        let clamped = self.clamp_scroll_offset(offset);
        self.set_scroll_offset(clamped);
    }

    /// Applies a scroll offset update from your UI layer (e.g. wheel/drag),
    /// and marks the engine as scrolling.
    pub fn apply_scroll_offset_event(&mut self, offset: u64, now_ms: u64) {
        ltrace!(offset, now_ms, "apply_scroll_offset_event");
        self.batch_update(|engine| {
            engine.set_scroll_offset(offset);
            engine.notify_scroll_event(now_ms);
        });
    }

    /// Same as `apply_scroll_offset_event`, but clamps the offset.
    pub fn apply_scroll_offset_event_clamped(&mut self, offset: u64, now_ms: u64) {
        ltrace!(offset, now_ms, "apply_scroll_offset_event_clamped");
        self.batch_update(|engine| {
            engine.set_scroll_offset_clamped(offset);
            engine.notify_scroll_event(now_ms);
        });
    }

    pub fn set_viewport_and_scroll(&mut self, viewport_size: u32, scroll_offset: u64) {
        self.batch_update(|engine| {
            engine.set_viewport_size(viewport_size);
            engine.set_scroll_offset(scroll_offset);
        });
    }

    /// Returns a snapshot of the current scroll state.
    pub fn scroll_state(&self) -> ScrollState {
        ScrollState {
            offset: self.scroll_offset,
            is_scrolling: self.is_scrolling,
        }
    }

    /// Restores scroll state from a previously captured snapshot.
    ///
    /// When `state.is_scrolling` is `true`, the internal scrolling timers are
    /// updated as if a scroll event happened at `now_ms`.
    pub fn restore_scroll_state(&mut self, state: ScrollState, now_ms: u64) {
        if state.is_scrolling {
            self.apply_scroll_offset_event_clamped(state.offset, now_ms);
            return;
        }
        self.batch_update(|engine| {
            engine.set_scroll_offset_clamped(state.offset);
            engine.set_is_scrolling(false);
        });
    }

    /// Replaces an item's estimated size with a measured one.
    ///
    /// When the measured item lies above the current scroll offset, the
    /// offset is nudged by the size delta so visible content does not jump.
    /// Returns the applied offset adjustment.
    pub fn measure(&mut self, index: usize, size: u32) -> i64 {
        if index >= self.options.item_count {
            return 0;
        }
        let cur = self.sizes[index];
        if cur == size {
            self.measured[index] = true;
            return 0;
        }
        ltrace!(index, size, "measure");
        let start = self.sums.prefix(index);
        self.sizes[index] = size;
        self.measured[index] = true;
        let delta = size as i64 - cur as i64;
        self.sums.adjust(index, delta);

        let applied = if start < self.scroll_offset {
            if delta > 0 {
                self.scroll_offset = self.scroll_offset.saturating_add(delta as u64);
            } else {
                self.scroll_offset = self.scroll_offset.saturating_sub((-delta) as u64);
            }
            delta
        } else {
            0
        };
        self.notify();
        applied
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.measured.get(index).copied().unwrap_or(false)
    }

    /// Full scrollable extent: the prefix sum over all slots, windowed or not.
    pub fn total_extent(&self) -> u64 {
        self.sums.total()
    }

    pub fn max_scroll_offset(&self) -> u64 {
        self.total_extent().saturating_sub(self.viewport_size as u64)
    }

    pub fn clamp_scroll_offset(&self, offset: u64) -> u64 {
        offset.min(self.max_scroll_offset())
    }

    /// The overscanned window for the current scroll offset and viewport.
    pub fn window(&self) -> VirtualWindow {
        self.window_for(self.scroll_offset, self.viewport_size)
    }

    /// Pure variant of [`Self::window`] for a hypothetical scroll state.
    pub fn window_for(&self, scroll_offset: u64, viewport_size: u32) -> VirtualWindow {
        VirtualWindow {
            range: self.range_for(scroll_offset, viewport_size, self.options.overscan),
            total_extent: self.total_extent(),
        }
    }

    /// The visible window with no overscan applied.
    pub fn visible_window(&self) -> VirtualWindow {
        VirtualWindow {
            range: self.range_for(self.scroll_offset, self.viewport_size, 0),
            total_extent: self.total_extent(),
        }
    }

    fn range_for(
        &self,
        scroll_offset: u64,
        viewport_size: u32,
        overscan: usize,
    ) -> Option<WindowRange> {
        let count = self.slot_count();
        if count == 0 || viewport_size == 0 {
            return None;
        }

        let view = viewport_size as u64;
        let offset = scroll_offset.min(self.total_extent().saturating_sub(view));
        let last_visible_offset = offset.saturating_add(view - 1);

        let first = self.sums.index_for_offset(offset).min(count - 1);
        let last = self
            .sums
            .index_for_offset(last_visible_offset)
            .min(count - 1);

        Some(WindowRange {
            start_index: first.saturating_sub(overscan),
            end_index: cmp::min(count - 1, last.saturating_add(overscan)),
        })
    }

    /// Index of the slot occupying `offset`, clamped to the last slot.
    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        let count = self.slot_count();
        if count == 0 {
            return None;
        }
        Some(self.sums.index_for_offset(offset).min(count - 1))
    }

    pub fn slot_at(&self, index: usize) -> Option<WindowSlot> {
        (index < self.slot_count()).then(|| self.slot(index))
    }

    pub fn slot_start(&self, index: usize) -> Option<u64> {
        (index < self.slot_count()).then(|| self.sums.prefix(index))
    }

    pub fn slot_size(&self, index: usize) -> Option<u32> {
        (index < self.slot_count()).then(|| self.slot_size_unchecked(index))
    }

    /// Iterates the windowed slots for the current scroll state.
    pub fn for_each_slot(&self, f: impl FnMut(WindowSlot)) {
        self.for_each_slot_for(self.scroll_offset, self.viewport_size, f);
    }

    /// Iterates the windowed slots for a hypothetical scroll state, without
    /// allocating. Each emitted slot carries its absolute start offset.
    pub fn for_each_slot_for(
        &self,
        scroll_offset: u64,
        viewport_size: u32,
        mut f: impl FnMut(WindowSlot),
    ) {
        let Some(range) = self.range_for(scroll_offset, viewport_size, self.options.overscan)
        else {
            return;
        };

        let mut start = self.sums.prefix(range.start_index);
        for index in range.start_index..=range.end_index {
            let size = self.slot_size_unchecked(index);
            f(WindowSlot {
                kind: self.slot_kind(index),
                index,
                start,
                size,
            });
            start = start.saturating_add(size as u64);
        }
    }

    /// Collects the windowed slots into `out` (clears `out` first).
    ///
    /// Convenience wrapper over [`Self::for_each_slot`]; adapters chasing
    /// allocations should prefer the iteration form with a reused buffer.
    pub fn collect_slots(&self, out: &mut Vec<WindowSlot>) {
        out.clear();
        self.for_each_slot(|slot| out.push(slot));
    }

    /// Computes the scroll offset that brings `index` into view.
    pub fn scroll_to_index_offset(&self, index: usize, align: Align) -> u64 {
        let count = self.slot_count();
        if count == 0 {
            return 0;
        }
        let index = index.min(count - 1);
        let start = self.sums.prefix(index);
        let size = self.slot_size_unchecked(index) as u64;
        let end = start.saturating_add(size);
        let view = self.viewport_size as u64;

        let target = match align {
            Align::Start => start,
            Align::End => end.saturating_sub(view),
            Align::Center => {
                let center = start.saturating_add(size / 2);
                center.saturating_sub(view / 2)
            }
            Align::Auto => {
                let cur = self.scroll_offset;
                let cur_end = cur.saturating_add(view);
                if start >= cur && end <= cur_end {
                    cur
                } else if start < cur {
                    start
                } else {
                    end.saturating_sub(view)
                }
            }
        };

        self.clamp_scroll_offset(target)
    }

    /// Scrolls to an index (no animation) and returns the applied offset.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> u64 {
        let offset = self.scroll_to_index_offset(index, align);
        self.set_scroll_offset(offset);
        offset
    }

    /// The clamped offset of the very end of the list.
    pub fn scroll_to_end_offset(&self) -> u64 {
        self.max_scroll_offset()
    }

    pub fn slot_kind(&self, index: usize) -> SlotKind {
        if index < self.options.item_count {
            SlotKind::Item
        } else {
            SlotKind::Loading
        }
    }

    fn slot(&self, index: usize) -> WindowSlot {
        WindowSlot {
            kind: self.slot_kind(index),
            index,
            start: self.sums.prefix(index),
            size: self.slot_size_unchecked(index),
        }
    }

    fn slot_size_unchecked(&self, index: usize) -> u32 {
        match self.sizes.get(index) {
            Some(&size) => size,
            None => self.options.loading_slot_size,
        }
    }

    fn rebuild_sizes(&mut self) {
        let count = self.options.item_count;
        ldebug!(count, "rebuild_sizes");
        self.sizes.truncate(count);
        self.measured.truncate(count);
        for i in 0..self.sizes.len() {
            if !self.measured[i] {
                self.sizes[i] = (self.options.estimate_size)(i);
            }
        }
        for i in self.sizes.len()..count {
            self.sizes.push((self.options.estimate_size)(i));
            self.measured.push(false);
        }
        self.rebuild_sums();
    }

    fn rebuild_sums(&mut self) {
        let tail = self
            .loading_slot_visible
            .then_some(self.options.loading_slot_size);
        self.sums = PrefixSums::from_sizes(&self.sizes, tail);
    }
}
