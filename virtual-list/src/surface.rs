use alloc::vec::Vec;

use crate::{RowState, Slot};

/// The host framework's side of the list: it owns the visual nodes.
///
/// The list never inspects a `Row`; it only hands rows back to the surface to measure, position,
/// restyle, recycle or destroy them.
pub trait RenderSurface<T> {
    type Row;

    /// Creates a visual row for `cx.item`.
    fn create_row(&mut self, cx: RowContext<'_, T>) -> Self::Row;

    /// Returns the rendered height of `row` in pixels. Detached surfaces should return 0.
    fn measure(&mut self, row: &Self::Row) -> u32;

    fn destroy_row(&mut self, row: Self::Row);

    fn position_row(&mut self, row: &mut Self::Row, slot: Slot);

    /// Reserves scroll-region space for the content above and below the materialized window.
    fn set_filler_heights(&mut self, before: u64, after: u64);

    /// Rebinds an existing row to a different item (fixed-height lists only).
    ///
    /// Return `false` to refuse; the list then destroys `row` and creates a fresh one.
    fn recycle_row(&mut self, row: &mut Self::Row, cx: RowContext<'_, T>) -> bool {
        let _ = (row, cx);
        false
    }

    /// Called when selection/lead flags of a materialized row change.
    fn set_row_state(&mut self, row: &mut Self::Row, state: RowState) {
        let _ = (row, state);
    }

    /// Called when the list moves the scroll offset itself (scroll-into-view, anchoring).
    fn set_scroll_top(&mut self, scroll_top: u64) {
        let _ = scroll_top;
    }
}

/// What a surface gets when asked to build (or rebind) a row.
pub struct RowContext<'a, T> {
    pub index: usize,
    pub item: &'a T,
    pub state: RowState,
    queue: &'a mut SpliceQueue<T>,
}

impl<'a, T> RowContext<'a, T> {
    pub(crate) fn new(
        index: usize,
        item: &'a T,
        state: RowState,
        queue: &'a mut SpliceQueue<T>,
    ) -> Self {
        Self {
            index,
            item,
            state,
            queue,
        }
    }

    /// Requests a collection splice while a redraw is running.
    ///
    /// Queued splices are applied in order once the current redraw pass completes; arguments
    /// are validated at that point.
    pub fn defer_splice(&mut self, index: usize, remove_count: usize, items: impl IntoIterator<Item = T>) {
        self.queue.push(QueuedSplice {
            index,
            remove_count,
            items: items.into_iter().collect(),
        });
    }
}

impl<T> core::fmt::Debug for RowContext<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RowContext")
            .field("index", &self.index)
            .field("state", &self.state)
            .field("queued", &self.queue.len())
            .finish_non_exhaustive()
    }
}

pub(crate) struct QueuedSplice<T> {
    pub(crate) index: usize,
    pub(crate) remove_count: usize,
    pub(crate) items: Vec<T>,
}

pub(crate) struct SpliceQueue<T> {
    pending: Vec<QueuedSplice<T>>,
}

impl<T> SpliceQueue<T> {
    pub(crate) fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, splice: QueuedSplice<T>) {
        self.pending.push(splice);
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub(crate) fn take(&mut self) -> Vec<QueuedSplice<T>> {
        core::mem::take(&mut self.pending)
    }
}
