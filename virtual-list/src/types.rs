#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    /// Scroll only as far as needed to bring the item fully into view.
    Auto,
}

/// The materialized index range plus the filler space reserved around it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportWindow {
    pub first_visible: usize,
    pub last_visible: usize, // exclusive
    /// Pixels of non-materialized content above the window.
    pub before: u64,
    /// Pixels of non-materialized content below the window.
    pub after: u64,
}

impl ViewportWindow {
    pub fn is_empty(&self) -> bool {
        self.first_visible >= self.last_visible
    }

    pub fn len(&self) -> usize {
        self.last_visible.saturating_sub(self.first_visible)
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.first_visible && index < self.last_visible
    }
}

/// Selection-derived flags of a materialized row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowState {
    pub selected: bool,
    pub lead: bool,
}

/// Where a materialized item sits.
///
/// `row` and `column` are grid coordinates (`column` is always 0 for single-column lists);
/// `offset` is the top of the visual row in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slot {
    pub index: usize,
    pub row: usize,
    pub column: usize,
    pub offset: u64,
}
