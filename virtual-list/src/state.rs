use crate::SelectionSnapshot;

/// A lightweight, serializable snapshot of the scroll geometry.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    pub scroll_top: u64,
    pub client_height: u32,
}

/// A combined snapshot of scroll geometry and selection.
///
/// Hosts that persist view state across sessions store this; the list itself never does.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListState {
    pub scroll: ScrollState,
    pub selection: SelectionSnapshot,
}
