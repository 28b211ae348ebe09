#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    Auto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// What a window slot holds.
///
/// While more pages may exist, the engine appends one synthetic `Loading` slot
/// after the real items so the scrollable extent accounts for the pending tail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SlotKind {
    Item,
    Loading,
}

/// One renderable slot: absolute start offset and size in the scroll axis.
///
/// `start` is the running prefix sum of all prior slot sizes, so the render
/// surface can absolutely position each slot without reflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowSlot {
    pub kind: SlotKind,
    pub index: usize,
    pub start: u64,
    pub size: u32,
}

impl WindowSlot {
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.size as u64)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.kind, SlotKind::Loading)
    }
}

/// Inclusive range of slot indices selected for rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowRange {
    pub start_index: usize,
    pub end_index: usize, // inclusive
}

impl WindowRange {
    /// Number of slots in the range. Never zero: empty windows are
    /// represented as [`VirtualWindow::range`] `== None`.
    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index) + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index <= self.end_index
    }
}

/// A windowing result.
///
/// `range` is `None` exactly when nothing can render (no slots, or a zero
/// viewport). `total_extent` is the full prefix sum over all slots regardless
/// of how many are windowed; it determines the scrollable area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualWindow {
    pub range: Option<WindowRange>,
    pub total_extent: u64,
}

impl VirtualWindow {
    pub fn is_empty(&self) -> bool {
        self.range.is_none()
    }
}
