use crate::SelectionMode;

/// Configuration for [`crate::List`].
///
/// Plain data; hand a modified copy to `List::set_options` (or use `List::update_options`) and
/// the list decides what must be invalidated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListOptions {
    /// Skip per-item measurement; one calibrated height is used for every row.
    pub fixed_height: bool,
    /// Render from the first item until the container is filled, ignoring the scroll offset.
    pub auto_expand: bool,
    /// Items per visual row. `1` is a plain list; larger values lay items out as a grid.
    pub columns_per_row: usize,
    pub selection_mode: SelectionMode,
    /// Estimate used for rows that have not been measured yet.
    pub default_item_height: u32,
    /// Extra rows materialized after the last visible one.
    pub overscan: usize,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            fixed_height: true,
            auto_expand: false,
            columns_per_row: 1,
            selection_mode: SelectionMode::Multiple,
            default_item_height: 0,
            overscan: 1,
        }
    }
}

impl ListOptions {
    /// Options for a list whose rows have not been measured yet; `default_item_height` is the
    /// estimate used until then.
    pub fn new(default_item_height: u32) -> Self {
        Self {
            default_item_height,
            ..Self::default()
        }
    }

    pub fn with_fixed_height(mut self, fixed_height: bool) -> Self {
        self.fixed_height = fixed_height;
        self
    }

    pub fn with_auto_expand(mut self, auto_expand: bool) -> Self {
        self.auto_expand = auto_expand;
        self
    }

    pub fn with_columns_per_row(mut self, columns_per_row: usize) -> Self {
        self.columns_per_row = columns_per_row;
        self
    }

    pub fn with_selection_mode(mut self, selection_mode: SelectionMode) -> Self {
        self.selection_mode = selection_mode;
        self
    }

    pub fn with_default_item_height(mut self, height: u32) -> Self {
        self.default_item_height = height;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }
}
