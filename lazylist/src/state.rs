/// A lightweight, serializable snapshot of the current scroll state.
///
/// Useful for restoring a list's position across view changes without
/// coupling the engine to any specific UI framework. With
/// `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    pub offset: u64,
    pub is_scrolling: bool,
}
