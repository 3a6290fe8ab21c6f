use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::anchor::ScrollAnchor;
use crate::surface::{QueuedSplice, RowContext, SpliceQueue};
use crate::{
    Align, Collection, HeightCache, ListError, ListOptions, ListState, ListenerId, RenderSurface,
    RowState, ScrollState, SelectionModel, Slot, SpliceEvent, ViewportWindow,
};

struct Materialized<R> {
    handle: R,
    state: RowState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct DragGesture {
    anchor: usize,
    /// Set once the pointer has moved off the anchor.
    extended: bool,
}

/// A virtualized list: windowing, lazy height caching and selection over a [`Collection`].
///
/// The list owns its collection, selection model and height cache, and drives a
/// [`RenderSurface`] so that only the rows intersecting the viewport exist at any time.
///
/// It is event driven: the host reports geometry with [`List::set_viewport_geometry`], mutates
/// items through [`List::splice`], and edits selection through [`List::update_selection`]. Each
/// of these runs to completion and leaves the surface consistent (or defers the redraw while a
/// batch is open).
///
/// In grid mode (`columns_per_row > 1`) the height cache is indexed by visual row; item indexes
/// map to rows with `index / columns_per_row`.
pub struct List<T, S: RenderSurface<T>> {
    options: ListOptions,
    items: Collection<T>,
    selection: SelectionModel,
    heights: HeightCache,
    surface: S,

    scroll_top: u64,
    client_height: u32,
    window: ViewportWindow,
    rows: BTreeMap<usize, Materialized<S::Row>>,
    calibrated: bool,

    batch_depth: usize,
    redrawing: bool,
    queue: SpliceQueue<T>,
    drag: Option<DragGesture>,
    redraw_count: u64,
}

impl<T, S: RenderSurface<T>> List<T, S> {
    /// Creates a list over `items`. Nothing is rendered until geometry is reported.
    pub fn new(
        items: impl Into<Collection<T>>,
        surface: S,
        options: ListOptions,
    ) -> Result<Self, ListError> {
        if options.columns_per_row == 0 {
            return Err(ListError::ColumnsPerRowZero);
        }
        let items = items.into();
        let len = items.len();
        vdebug!(
            len,
            fixed_height = options.fixed_height,
            auto_expand = options.auto_expand,
            columns = options.columns_per_row,
            "List::new"
        );
        Ok(Self {
            selection: SelectionModel::new(len, options.selection_mode),
            heights: HeightCache::new(
                len.div_ceil(options.columns_per_row),
                estimate(&options),
            ),
            items,
            surface,
            options,
            scroll_top: 0,
            client_height: 0,
            window: ViewportWindow::default(),
            rows: BTreeMap::new(),
            calibrated: false,
            batch_depth: 0,
            redrawing: false,
            queue: SpliceQueue::new(),
            drag: None,
            redraw_count: 0,
        })
    }

    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    /// Replaces the options, invalidating whatever depends on the fields that changed.
    pub fn set_options(&mut self, options: ListOptions) -> Result<(), ListError> {
        if options.columns_per_row == 0 {
            return Err(ListError::ColumnsPerRowZero);
        }
        let prev = core::mem::replace(&mut self.options, options);
        vtrace!(
            fixed_height = options.fixed_height,
            auto_expand = options.auto_expand,
            columns = options.columns_per_row,
            "List::set_options"
        );

        if prev.columns_per_row != options.columns_per_row {
            // Items reflow into different rows; nothing about the old rows carries over.
            for row in self.take_rows_outside(0, 0) {
                self.surface.destroy_row(row);
            }
            self.heights = HeightCache::new(self.row_count(), estimate(&options));
            self.calibrated = false;
        }
        if prev.fixed_height != options.fixed_height
            || prev.default_item_height != options.default_item_height
        {
            self.calibrated = false;
            if options.fixed_height {
                self.heights.clear_measurements();
            }
            self.heights.set_default_height(estimate(&options));
        }
        if prev.selection_mode != options.selection_mode {
            self.update_selection(|sm| sm.set_mode(options.selection_mode));
        }
        self.redraw();
        Ok(())
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut ListOptions)) -> Result<(), ListError> {
        let mut next = self.options;
        f(&mut next);
        self.set_options(next)
    }

    pub fn items(&self) -> &Collection<T> {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn height_cache(&self) -> &HeightCache {
        &self.heights
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn on_splice(
        &mut self,
        listener: impl Fn(&SpliceEvent<'_, T>) + Send + Sync + 'static,
    ) -> ListenerId {
        self.items.on_splice(listener)
    }

    pub fn unsubscribe_splice(&mut self, id: ListenerId) -> bool {
        self.items.unsubscribe(id)
    }

    /// Number of `redraw` runs that reached the surface (deferred calls are not counted).
    pub fn redraw_count(&self) -> u64 {
        self.redraw_count
    }

    pub fn columns_per_row(&self) -> usize {
        self.options.columns_per_row
    }

    /// Number of visual rows (the last one may be partially filled in grid mode).
    pub fn row_count(&self) -> usize {
        self.items.len().div_ceil(self.options.columns_per_row)
    }

    pub fn row_of(&self, index: usize) -> usize {
        index / self.options.columns_per_row
    }

    /// Item indexes laid out on visual row `row`, never reaching past the end of the list.
    pub fn indexes_of_row(&self, row: usize) -> core::ops::Range<usize> {
        let cols = self.options.columns_per_row;
        let len = self.items.len();
        let start = row.saturating_mul(cols).min(len);
        start..start.saturating_add(cols).min(len)
    }

    /// Splices the collection and keeps selection, heights, materialized rows and the scroll
    /// position consistent with it. Redraws unless a batch is open.
    pub fn splice(
        &mut self,
        index: usize,
        remove_count: usize,
        items: impl IntoIterator<Item = T>,
    ) -> Result<Vec<T>, ListError> {
        let removed = self.splice_without_redraw(index, remove_count, items)?;
        self.redraw();
        Ok(removed)
    }

    pub fn push(&mut self, item: T) {
        let len = self.items.len();
        // Appending at `len` is always in range.
        let _ = self.splice(len, 0, core::iter::once(item));
    }

    fn splice_without_redraw(
        &mut self,
        index: usize,
        remove_count: usize,
        items: impl IntoIterator<Item = T>,
    ) -> Result<Vec<T>, ListError> {
        let anchor = self.capture_anchor();
        let before = self.items.len();
        let removed = self.items.splice(index, remove_count, items)?;
        let added = self.items.len() + removed.len() - before;
        self.apply_splice(index, removed.len(), added, anchor);
        Ok(removed)
    }

    fn apply_splice(
        &mut self,
        index: usize,
        remove_count: usize,
        added: usize,
        anchor: Option<ScrollAnchor>,
    ) {
        let removed_end = index + remove_count;
        let new_len = self.items.len();

        let cols = self.options.columns_per_row;
        if cols == 1 {
            self.heights.splice(index, remove_count, added);
        } else {
            // Every row from the splice point on reflows.
            self.heights.set_len(new_len.div_ceil(cols));
            self.heights.truncate_measurements_from(index / cols);
        }

        let tail = self.rows.split_off(&index);
        for (i, row) in tail {
            if i < removed_end {
                self.surface.destroy_row(row.handle);
            } else {
                self.rows.insert(i - remove_count + added, row);
            }
        }

        if let Some(drag) = self.drag {
            self.drag = if drag.anchor < index {
                Some(drag)
            } else if drag.anchor >= removed_end {
                Some(DragGesture {
                    anchor: drag.anchor - remove_count + added,
                    ..drag
                })
            } else {
                None
            };
        }

        self.update_selection(|sm| sm.adjust_for_splice(index, remove_count, added));

        if let Some(anchor) = anchor.and_then(|a| a.remap_for_splice(index, remove_count, added, new_len)) {
            let top = self.heights.offset_of(self.row_of(anchor.index));
            let target = self.clamp_scroll_top(top.saturating_add(anchor.offset_in_item));
            if target != self.scroll_top {
                vtrace!(from = self.scroll_top, to = target, "anchored scroll after splice");
                self.scroll_top = target;
                self.surface.set_scroll_top(target);
            }
        }
    }

    fn capture_anchor(&self) -> Option<ScrollAnchor> {
        if self.options.auto_expand || self.items.is_empty() || self.scroll_top == 0 {
            return None;
        }
        let scroll = self.clamp_scroll_top(self.scroll_top);
        let row = self.heights.index_at_offset(scroll)?;
        let top = self.heights.offset_of(row);
        Some(ScrollAnchor {
            index: row * self.options.columns_per_row,
            offset_in_item: scroll - top,
        })
    }

    /// Runs a selection edit as one change batch, then pushes the resulting selected/lead flags
    /// to the materialized rows.
    ///
    /// The edit must leave the model's length equal to the collection's; `reset` and
    /// `adjust_for_splice` belong to [`List::splice`]. Debug builds assert this.
    pub fn update_selection<R>(&mut self, f: impl FnOnce(&mut SelectionModel) -> R) -> R {
        self.selection.begin_change();
        let out = f(&mut self.selection);
        debug_assert_eq!(
            self.selection.len(),
            self.items.len(),
            "selection length out of sync with the collection"
        );
        self.selection.end_change();
        if !self.selection.is_changing() {
            self.refresh_row_states();
        }
        out
    }

    /// Suppresses redraws until the matching `end_batch_updates`. Batches nest.
    pub fn start_batch_updates(&mut self) {
        self.batch_depth += 1;
    }

    /// Closes a batch; the outermost close runs exactly one redraw.
    pub fn end_batch_updates(&mut self) {
        debug_assert!(self.batch_depth > 0, "end_batch_updates without start");
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 {
            self.redraw();
        }
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    /// Runs `f` inside a batch so all of its splices and geometry updates share one redraw.
    pub fn batch_update<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.start_batch_updates();
        let out = f(self);
        self.end_batch_updates();
        out
    }

    pub fn scroll_top(&self) -> u64 {
        self.scroll_top
    }

    pub fn client_height(&self) -> u32 {
        self.client_height
    }

    /// The window produced by the last redraw.
    pub fn window(&self) -> ViewportWindow {
        self.window
    }

    pub fn total_height(&self) -> u64 {
        self.heights.total_height()
    }

    pub fn max_scroll_top(&self) -> u64 {
        self.max_scroll_top_for(self.client_height)
    }

    pub fn clamp_scroll_top(&self, scroll_top: u64) -> u64 {
        scroll_top.min(self.max_scroll_top())
    }

    fn max_scroll_top_for(&self, client_height: u32) -> u64 {
        self.heights
            .total_height()
            .saturating_sub(client_height as u64)
    }

    /// Reports scroll offset and viewport height from the host, then redraws.
    pub fn set_viewport_geometry(&mut self, scroll_top: u64, client_height: u32) {
        vtrace!(scroll_top, client_height, "set_viewport_geometry");
        self.scroll_top = scroll_top;
        self.client_height = client_height;
        self.redraw();
    }

    pub fn set_scroll_top(&mut self, scroll_top: u64) {
        self.set_viewport_geometry(scroll_top, self.client_height);
    }

    pub fn set_client_height(&mut self, client_height: u32) {
        self.set_viewport_geometry(self.scroll_top, client_height);
    }

    /// Strictly visible items for the current geometry (no overscan).
    pub fn visible_range(&self) -> core::ops::Range<usize> {
        let w = self.compute_window(self.scroll_top, self.client_height, 0);
        w.first_visible..w.last_visible
    }

    /// The window that a redraw at `scroll_top`/`client_height` would materialize.
    pub fn window_for(&self, scroll_top: u64, client_height: u32) -> ViewportWindow {
        self.compute_window(scroll_top, client_height, self.options.overscan)
    }

    fn compute_window(&self, scroll_top: u64, client_height: u32, overscan: usize) -> ViewportWindow {
        let len = self.items.len();
        let rows = self.row_count();
        let total = self.heights.total_height();
        if len == 0 || client_height == 0 {
            return ViewportWindow {
                first_visible: 0,
                last_visible: 0,
                before: 0,
                after: total,
            };
        }

        let view = client_height as u64;
        let (first_row, bottom) = if self.options.auto_expand {
            (0, view)
        } else {
            let scroll = scroll_top.min(self.max_scroll_top_for(client_height));
            let first = self.heights.index_at_offset(scroll).unwrap_or(0);
            (first, scroll.saturating_add(view))
        };

        let mut end_row = first_row;
        while end_row < rows && self.heights.offset_of(end_row) < bottom {
            end_row += 1;
        }
        let end_row = end_row.saturating_add(overscan).min(rows);

        let cols = self.options.columns_per_row;
        ViewportWindow {
            first_visible: first_row * cols,
            last_visible: end_row.saturating_mul(cols).min(len),
            before: self.heights.offset_of(first_row),
            after: total - self.heights.offset_of(end_row),
        }
    }

    /// Scrolls the minimum distance that shows `index` fully, then redraws.
    ///
    /// Returns the resulting scroll offset.
    pub fn scroll_index_into_view(&mut self, index: usize) -> u64 {
        self.scroll_to_index(index, Align::Auto)
    }

    /// Programmatically scrolls to an index and redraws if the offset changed.
    ///
    /// Returns the applied (clamped) offset. Out-of-range indexes leave the offset untouched.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> u64 {
        if index >= self.items.len() {
            vwarn!(index, len = self.items.len(), "scroll_to_index out of range");
            return self.scroll_top;
        }
        let target = self.scroll_to_index_offset(index, align);
        if target != self.scroll_top {
            self.scroll_top = target;
            self.surface.set_scroll_top(target);
            self.redraw();
        }
        target
    }

    /// Computes the offset `scroll_to_index` would apply, without applying it.
    pub fn scroll_to_index_offset(&self, index: usize, align: Align) -> u64 {
        let len = self.items.len();
        if len == 0 {
            return 0;
        }
        let row = self.row_of(index.min(len - 1));
        let top = self.heights.offset_of(row);
        let bottom = self.heights.offset_of(row + 1);
        let view = self.client_height as u64;

        let target = match align {
            Align::Start => top,
            Align::End => bottom.saturating_sub(view),
            Align::Center => {
                let center = top + (bottom - top) / 2;
                center.saturating_sub(view / 2)
            }
            Align::Auto => {
                let cur = self.clamp_scroll_top(self.scroll_top);
                let cur_end = cur.saturating_add(view);
                if top >= cur && bottom <= cur_end {
                    cur
                } else if top < cur {
                    top
                } else {
                    bottom.saturating_sub(view)
                }
            }
        };
        self.clamp_scroll_top(target)
    }

    /// Item under a point `y` pixels below the top of the viewport, in grid column `column`.
    pub fn index_at_viewport_point(&self, y: u64, column: usize) -> Option<usize> {
        let offset = self.clamp_scroll_top(self.scroll_top).saturating_add(y);
        if offset >= self.heights.total_height() {
            return None;
        }
        let row = self.heights.index_at_offset(offset)?;
        let cols = self.options.columns_per_row;
        let index = row * cols + column.min(cols - 1);
        (index < self.items.len()).then_some(index)
    }

    /// The item one viewport height below `index`, in the same column where possible.
    pub fn index_page_after(&self, index: usize) -> Option<usize> {
        let len = self.items.len();
        if index >= len {
            return None;
        }
        let row = self.row_of(index);
        let target = self
            .heights
            .offset_of(row)
            .saturating_add(self.client_height as u64);
        let mut next_row = self.heights.index_at_offset(target)?;
        if next_row == row {
            next_row = (row + 1).min(self.row_count() - 1);
        }
        Some(self.index_in_row(next_row, index % self.options.columns_per_row))
    }

    /// The item one viewport height above `index`, in the same column where possible.
    pub fn index_page_before(&self, index: usize) -> Option<usize> {
        if index >= self.items.len() {
            return None;
        }
        let row = self.row_of(index);
        let target = self
            .heights
            .offset_of(row)
            .saturating_sub(self.client_height as u64);
        let mut prev_row = self.heights.index_at_offset(target)?;
        if prev_row == row {
            prev_row = row.saturating_sub(1);
        }
        Some(self.index_in_row(prev_row, index % self.options.columns_per_row))
    }

    fn index_in_row(&self, row: usize, column: usize) -> usize {
        let range = self.indexes_of_row(row);
        (range.start + column).min(range.end.saturating_sub(1))
    }

    /// Reconciles materialized rows with the window for the current geometry.
    ///
    /// Deferred while a batch is open. Splices queued by the surface during the pass run after
    /// it, followed by another pass.
    pub fn redraw(&mut self) {
        if self.batch_depth > 0 || self.redrawing {
            return;
        }
        self.redrawing = true;
        self.redraw_count += 1;
        self.redraw_pass();
        while !self.queue.is_empty() {
            let queued = self.queue.take();
            vdebug!(count = queued.len(), "applying splices queued during redraw");
            for QueuedSplice {
                index,
                remove_count,
                items,
            } in queued
            {
                if let Err(_err) = self.splice_without_redraw(index, remove_count, items) {
                    vwarn!(error = %_err, "dropping queued splice");
                }
            }
            self.redraw_pass();
        }
        self.redrawing = false;
    }

    fn redraw_pass(&mut self) {
        if self.items.is_empty() || self.client_height == 0 {
            self.render_nothing();
            return;
        }

        // Without a configured estimate one real height is needed before a window can be sized.
        let needs_height = self.options.fixed_height || self.options.default_item_height == 0;
        if needs_height
            && !self.calibrated
            && self.calibrate().is_none()
            && self.options.default_item_height == 0
        {
            vdebug!("no item height available; rendering nothing");
            self.render_nothing();
            return;
        }

        let mut window = self.window_for(self.scroll_top, self.client_height);
        let stale = self.take_rows_outside(window.first_visible, window.last_visible);
        let mut spare = Vec::new();
        if self.options.fixed_height {
            spare = stale;
        } else {
            for row in stale {
                self.surface.destroy_row(row);
            }
        }

        // Measuring new rows can move the window; repeat until no new row changes a height.
        loop {
            let changed = self.materialize(window, &mut spare);
            if !changed {
                break;
            }
            let next = self.window_for(self.scroll_top, self.client_height);
            if next == window {
                break;
            }
            window = next;
        }
        for row in spare {
            self.surface.destroy_row(row);
        }
        for row in self.take_rows_outside(window.first_visible, window.last_visible) {
            self.surface.destroy_row(row);
        }

        vtrace!(
            first = window.first_visible,
            last = window.last_visible,
            before = window.before,
            after = window.after,
            "redraw"
        );
        self.position_rows();
        self.surface.set_filler_heights(window.before, window.after);
        self.window = window;
    }

    fn render_nothing(&mut self) {
        for row in self.take_rows_outside(0, 0) {
            self.surface.destroy_row(row);
        }
        self.window = self.compute_window(self.scroll_top, 0, 0);
        self.surface
            .set_filler_heights(self.window.before, self.window.after);
    }

    /// Creates rows missing from `window`. Returns `true` if measuring them changed a height.
    fn materialize(&mut self, window: ViewportWindow, spare: &mut Vec<S::Row>) -> bool {
        let cols = self.options.columns_per_row;
        let mut touched_rows: Vec<usize> = Vec::new();
        for index in window.first_visible..window.last_visible {
            if self.rows.contains_key(&index) {
                continue;
            }
            let state = row_state(&self.selection, index);
            let Some(handle) = acquire_row(
                &mut self.surface,
                &self.items,
                &mut self.queue,
                index,
                state,
                spare.pop(),
            ) else {
                continue;
            };
            self.rows.insert(index, Materialized { handle, state });
            let row = index / cols;
            if touched_rows.last() != Some(&row) {
                touched_rows.push(row);
            }
        }
        if self.options.fixed_height {
            return false;
        }
        let mut changed = false;
        let mut unmeasurable = false;
        for row in touched_rows {
            match self.measure_row(row) {
                Some(row_changed) => changed |= row_changed,
                None => unmeasurable = true,
            }
        }
        // Rows that cannot be laid out yet must not pull more rows into this pass.
        changed && !unmeasurable
    }

    fn position_rows(&mut self) {
        let cols = self.options.columns_per_row;
        for (&index, row) in self.rows.iter_mut() {
            let visual_row = index / cols;
            let slot = Slot {
                index,
                row: visual_row,
                column: index % cols,
                offset: self.heights.offset_of(visual_row),
            };
            self.surface.position_row(&mut row.handle, slot);
            let state = row_state(&self.selection, index);
            if state != row.state {
                row.state = state;
                self.surface.set_row_state(&mut row.handle, state);
            }
        }
    }

    fn refresh_row_states(&mut self) {
        for (&index, row) in self.rows.iter_mut() {
            let state = row_state(&self.selection, index);
            if state != row.state {
                row.state = state;
                self.surface.set_row_state(&mut row.handle, state);
            }
        }
    }

    /// Removes and returns every materialized row outside `[start, end)`.
    fn take_rows_outside(&mut self, start: usize, end: usize) -> Vec<S::Row> {
        let mut inside = self.rows.split_off(&start);
        let after = inside.split_off(&end.max(start));
        let before = core::mem::replace(&mut self.rows, inside);
        before
            .into_values()
            .chain(after.into_values())
            .map(|row| row.handle)
            .collect()
    }

    /// Indexes that currently have a visual row, ascending.
    pub fn materialized_indexes(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.keys().copied()
    }

    pub fn row(&self, index: usize) -> Option<&S::Row> {
        self.rows.get(&index).map(|row| &row.handle)
    }

    /// Measures the materialized row of `index` and, for variable-height lists, caches the
    /// result (redrawing when it changed a height).
    ///
    /// Returns `None` when `index` has no visual row.
    pub fn measure_item_height(&mut self, index: usize) -> Option<u32> {
        let height = self.surface.measure(&self.rows.get(&index)?.handle);
        if !self.options.fixed_height && self.measure_row(self.row_of(index)) == Some(true) {
            self.redraw();
        }
        Some(height)
    }

    /// Re-measures one representative row and adopts it as the height of every row.
    ///
    /// Returns the calibrated height, or `None` when the list is empty or the surface reported
    /// a zero height (for example while detached).
    pub fn calibrate_item_height(&mut self) -> Option<u32> {
        let before = self.heights.default_height();
        let height = self.calibrate()?;
        if height != before {
            self.redraw();
        }
        Some(height)
    }

    fn calibrate(&mut self) -> Option<u32> {
        let height = if let Some(row) = self.rows.values().next() {
            self.surface.measure(&row.handle)
        } else {
            let state = row_state(&self.selection, 0);
            let item = self.items.get(0)?;
            let row = self
                .surface
                .create_row(RowContext::new(0, item, state, &mut self.queue));
            let height = self.surface.measure(&row);
            self.surface.destroy_row(row);
            height
        };
        if height == 0 {
            vdebug!("calibration measured zero height; keeping estimate");
            return None;
        }
        vdebug!(height, "calibrated item height");
        self.heights.set_default_height(height);
        self.calibrated = true;
        Some(height)
    }

    /// Records the tallest materialized item of visual row `row`. Returns `Some(true)` when that
    /// changed a height, and `None` when the row measured zero (the estimate stays in place).
    fn measure_row(&mut self, row: usize) -> Option<bool> {
        let range = self.indexes_of_row(row);
        let mut tallest: Option<u32> = None;
        for m in self.rows.range(range).map(|(_, m)| m) {
            let h = self.surface.measure(&m.handle);
            tallest = Some(tallest.map_or(h, |t| t.max(h)));
        }
        match tallest {
            Some(0) => {
                vdebug!(row, "row measured zero height; keeping estimate");
                None
            }
            Some(h) => Some(self.heights.record_height(row, h)),
            None => Some(false),
        }
    }

    /// Starts a drag-selection gesture anchored at `index` and selects it.
    pub fn begin_drag_selection(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.drag = Some(DragGesture {
            anchor: index,
            extended: false,
        });
        self.update_selection(|sm| {
            sm.clear();
            sm.set_anchor(Some(index));
            sm.select_range(index, index)
        })
    }

    /// Starts a drag-selection gesture anchored at `index` without touching the selection.
    ///
    /// The selection is replaced only once the gesture is extended to another index, so a press
    /// on an already selected item keeps the selection until the pointer actually moves.
    pub fn arm_drag_selection(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.drag = Some(DragGesture {
            anchor: index,
            extended: false,
        });
        true
    }

    /// Extends the active gesture to `index`, selecting `anchor..=index`.
    ///
    /// A target without a visual row is scrolled into view (and so materialized) first. Moving
    /// within the anchor before the gesture has left it changes nothing.
    pub fn extend_drag_selection(&mut self, index: usize) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        if index >= self.items.len() || (!drag.extended && index == drag.anchor) {
            return false;
        }
        drag.extended = true;
        let anchor = drag.anchor;
        if !self.rows.contains_key(&index) {
            self.scroll_index_into_view(index);
        }
        self.update_selection(|sm| {
            sm.clear();
            sm.set_anchor(Some(anchor));
            sm.select_range(anchor, index)
        })
    }

    pub fn end_drag_selection(&mut self) -> bool {
        self.drag.take().is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether the active gesture has been extended past its anchor.
    pub fn drag_extended(&self) -> bool {
        self.drag.is_some_and(|drag| drag.extended)
    }

    pub fn state(&self) -> ListState {
        ListState {
            scroll: ScrollState {
                scroll_top: self.scroll_top,
                client_height: self.client_height,
            },
            selection: self.selection.snapshot(),
        }
    }

    /// Restores selection and geometry from a snapshot, then redraws once.
    pub fn restore_state(&mut self, state: &ListState) {
        self.batch_update(|list| {
            list.update_selection(|sm| sm.restore(&state.selection));
            list.set_viewport_geometry(state.scroll.scroll_top, state.scroll.client_height);
        });
    }
}

impl<T, S: RenderSurface<T>> Drop for List<T, S> {
    fn drop(&mut self) {
        for row in self.take_rows_outside(0, 0) {
            self.surface.destroy_row(row);
        }
    }
}

impl<T, S: RenderSurface<T>> core::fmt::Debug for List<T, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("List")
            .field("options", &self.options)
            .field("len", &self.items.len())
            .field("scroll_top", &self.scroll_top)
            .field("client_height", &self.client_height)
            .field("window", &self.window)
            .field("materialized", &self.rows.len())
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

fn estimate(options: &ListOptions) -> u32 {
    // A zero estimate would pull every unmeasured row into the window.
    options.default_item_height.max(1)
}

fn row_state(selection: &SelectionModel, index: usize) -> RowState {
    RowState {
        selected: selection.is_selected(index),
        lead: selection.lead_index() == Some(index),
    }
}

/// Rebinds a spare row to `index` or creates a new one.
fn acquire_row<T, S: RenderSurface<T>>(
    surface: &mut S,
    items: &Collection<T>,
    queue: &mut SpliceQueue<T>,
    index: usize,
    state: RowState,
    spare: Option<S::Row>,
) -> Option<S::Row> {
    let Some(item) = items.get(index) else {
        if let Some(row) = spare {
            surface.destroy_row(row);
        }
        return None;
    };
    if let Some(mut row) = spare {
        if surface.recycle_row(&mut row, RowContext::new(index, item, state, queue)) {
            return Some(row);
        }
        surface.destroy_row(row);
    }
    Some(surface.create_row(RowContext::new(index, item, state, queue)))
}
