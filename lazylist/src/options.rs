use alloc::sync::Arc;

use crate::engine::WindowEngine;

/// A callback fired when an engine state update occurs.
///
/// The second argument is `is_scrolling`.
pub type OnChangeCallback = Arc<dyn Fn(&WindowEngine, bool) + Send + Sync>;

/// Estimated slot size for an item index, in scroll-axis units.
///
/// The estimate is used until the item is measured via
/// [`WindowEngine::measure`].
pub type SizeEstimator = Arc<dyn Fn(usize) -> u32 + Send + Sync>;

/// Configuration for [`crate::WindowEngine`].
///
/// Cheap to clone: closures are stored in `Arc`s so adapters can tweak a few
/// fields and call `WindowEngine::set_options` without reallocating them.
pub struct WindowOptions {
    /// Number of real items currently known.
    pub item_count: usize,
    pub estimate_size: SizeEstimator,
    /// Extra slots rendered beyond the visible viewport on each side, to
    /// reduce pop-in during fast scrolling.
    pub overscan: usize,
    /// Fixed estimated size of the synthetic trailing loading slot.
    pub loading_slot_size: u32,
    /// Initial scroll offset.
    pub initial_offset: u64,
    /// Optional callback fired when the engine's state changes.
    pub on_change: Option<OnChangeCallback>,
    /// Debounced fallback duration for resetting `is_scrolling` after the
    /// last scroll event.
    pub is_scrolling_reset_delay_ms: u64,
}

impl WindowOptions {
    /// Creates options for a list of `item_count` items.
    ///
    /// `estimate_size(i)` should return the estimated slot size in the scroll
    /// axis (e.g. row height for vertical lists).
    pub fn new(
        item_count: usize,
        estimate_size: impl Fn(usize) -> u32 + Send + Sync + 'static,
    ) -> Self {
        Self {
            item_count,
            estimate_size: Arc::new(estimate_size),
            overscan: 1,
            loading_slot_size: 64,
            initial_offset: 0,
            on_change: None,
            is_scrolling_reset_delay_ms: 150,
        }
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_loading_slot_size(mut self, size: u32) -> Self {
        self.loading_slot_size = size;
        self
    }

    pub fn with_initial_offset(mut self, initial_offset: u64) -> Self {
        self.initial_offset = initial_offset;
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&WindowEngine, bool) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_is_scrolling_reset_delay_ms(mut self, delay_ms: u64) -> Self {
        self.is_scrolling_reset_delay_ms = delay_ms;
        self
    }
}

impl Clone for WindowOptions {
    fn clone(&self) -> Self {
        Self {
            item_count: self.item_count,
            estimate_size: Arc::clone(&self.estimate_size),
            overscan: self.overscan,
            loading_slot_size: self.loading_slot_size,
            initial_offset: self.initial_offset,
            on_change: self.on_change.clone(),
            is_scrolling_reset_delay_ms: self.is_scrolling_reset_delay_ms,
        }
    }
}

impl core::fmt::Debug for WindowOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowOptions")
            .field("item_count", &self.item_count)
            .field("overscan", &self.overscan)
            .field("loading_slot_size", &self.loading_slot_size)
            .field("initial_offset", &self.initial_offset)
            .field(
                "is_scrolling_reset_delay_ms",
                &self.is_scrolling_reset_delay_ms,
            )
            .finish_non_exhaustive()
    }
}
