use alloc::collections::{BTreeMap, BTreeSet};
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::observer::{ListenerId, Observers};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionMode {
    /// At most one selected index.
    Single,
    /// Any subset of indexes.
    #[default]
    Multiple,
}

/// One index whose membership differs from its state before the change batch began.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionDelta {
    pub index: usize,
    pub selected: bool,
}

/// Delivered once per outermost change batch that altered the model.
///
/// `changes` is sorted by index. It can be empty when only the lead/anchor moved or a splice
/// dropped selected items.
#[derive(Clone, Copy, Debug)]
pub struct SelectionChanged<'a> {
    pub changes: &'a [SelectionDelta],
    pub lead_index: Option<usize>,
    pub anchor_index: Option<usize>,
}

pub type SelectionListener = dyn Fn(&SelectionChanged<'_>) + Send + Sync;

/// A serializable copy of selection state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionSnapshot {
    pub selected: Vec<usize>,
    pub lead_index: Option<usize>,
    pub anchor_index: Option<usize>,
}

/// Tracks selected indexes plus the lead (focus) and anchor (range origin) of a list.
///
/// The model only knows the collection length. The owning list calls
/// [`SelectionModel::adjust_for_splice`] for every splice so indexes keep pointing at the same
/// logical items.
///
/// All mutators reject out-of-range indexes and return `false` without touching state.
pub struct SelectionModel {
    mode: SelectionMode,
    len: usize,
    selected: BTreeSet<usize>,
    lead: Option<usize>,
    anchor: Option<usize>,

    change_depth: usize,
    anchor_set_in_change: bool,
    // index -> membership before the current batch touched it
    touched: BTreeMap<usize, bool>,
    dirty: bool,
    observers: Observers<SelectionListener>,
}

impl SelectionModel {
    pub fn new(len: usize, mode: SelectionMode) -> Self {
        Self {
            mode,
            len,
            selected: BTreeSet::new(),
            lead: None,
            anchor: None,
            change_depth: 0,
            anchor_set_in_change: false,
            touched: BTreeMap::new(),
            dirty: false,
            observers: Observers::new(),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn is_multiple(&self) -> bool {
        self.mode == SelectionMode::Multiple
    }

    /// Switches the mode. Leaving multiple mode keeps the lead if it is selected, otherwise the
    /// lowest selected index.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        if mode == SelectionMode::Single && self.selected.len() > 1 {
            let keep = self
                .lead
                .filter(|i| self.selected.contains(i))
                .or_else(|| self.selected.first().copied());
            self.begin_change();
            self.clear_except(keep);
            self.end_change();
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops all state and adopts a new collection length.
    pub fn reset(&mut self, len: usize) {
        let had_state = !self.selected.is_empty() || self.lead.is_some() || self.anchor.is_some();
        self.begin_change();
        self.selected.clear();
        self.touched.clear();
        self.lead = None;
        self.anchor = None;
        self.len = len;
        if had_state {
            self.dirty = true;
        }
        self.end_change();
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn selected_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// The lowest selected index (the only one in single mode).
    pub fn selected_index(&self) -> Option<usize> {
        self.selected.first().copied()
    }

    /// Replaces the selection with `index` and moves lead and anchor to it.
    ///
    /// `None` clears the selection, the lead and the anchor.
    pub fn set_selected_index(&mut self, index: Option<usize>) -> bool {
        if let Some(i) = index {
            if !self.check_index(i) {
                return false;
            }
        }
        self.begin_change();
        self.clear_except(None);
        if let Some(i) = index {
            self.insert(i);
        }
        self.set_lead_inner(index);
        self.set_anchor_inner(index);
        self.end_change();
        true
    }

    /// Sets the membership of one index. In single mode selecting clears every other index.
    pub fn set_selected(&mut self, index: usize, selected: bool) -> bool {
        if !self.check_index(index) {
            return false;
        }
        self.begin_change();
        if selected {
            if self.mode == SelectionMode::Single {
                self.clear_except(None);
            }
            self.insert(index);
        } else {
            self.remove(index);
        }
        self.end_change();
        true
    }

    /// Flips the membership of `index` without disturbing any other index.
    ///
    /// Only available in multiple mode.
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.mode != SelectionMode::Multiple {
            vwarn!(index, "toggle rejected in single selection mode");
            return false;
        }
        if !self.check_index(index) {
            return false;
        }
        self.begin_change();
        if self.selected.contains(&index) {
            self.remove(index);
        } else {
            self.insert(index);
        }
        self.end_change();
        true
    }

    /// Selects every index in `[min(from, to), max(from, to)]`.
    ///
    /// The lead moves to `to`. The anchor moves to `from` unless it was already set earlier in
    /// the current change batch. In single mode only `to` ends up selected.
    pub fn select_range(&mut self, from: usize, to: usize) -> bool {
        if !self.check_index(from) || !self.check_index(to) {
            return false;
        }
        self.begin_change();
        match self.mode {
            SelectionMode::Single => {
                self.clear_except(None);
                self.insert(to);
            }
            SelectionMode::Multiple => {
                let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
                for i in lo..=hi {
                    self.insert(i);
                }
            }
        }
        if !self.anchor_set_in_change {
            self.set_anchor_inner(Some(from));
        }
        self.set_lead_inner(Some(to));
        self.end_change();
        true
    }

    pub fn select_all(&mut self) -> bool {
        if self.mode != SelectionMode::Multiple {
            return false;
        }
        self.begin_change();
        for i in 0..self.len {
            self.insert(i);
        }
        self.end_change();
        true
    }

    /// Unselects everything. Lead and anchor are kept.
    pub fn clear(&mut self) {
        self.begin_change();
        self.clear_except(None);
        self.end_change();
    }

    pub fn lead_index(&self) -> Option<usize> {
        self.lead
    }

    pub fn anchor_index(&self) -> Option<usize> {
        self.anchor
    }

    /// Moves keyboard focus without changing membership.
    pub fn set_lead(&mut self, index: Option<usize>) -> bool {
        if let Some(i) = index {
            if !self.check_index(i) {
                return false;
            }
        }
        self.begin_change();
        self.set_lead_inner(index);
        self.end_change();
        true
    }

    /// Moves the range origin without changing membership.
    pub fn set_anchor(&mut self, index: Option<usize>) -> bool {
        if let Some(i) = index {
            if !self.check_index(i) {
                return false;
            }
        }
        self.begin_change();
        self.set_anchor_inner(index);
        self.end_change();
        true
    }

    /// Remaps state after the collection spliced `remove_count` items at `index` and inserted
    /// `added_count` in their place.
    ///
    /// Selected indexes inside the removed span are dropped; later ones shift by the net delta.
    /// Lead/anchor inside the removed span fall back to `index`, clamped to the new length. Runs
    /// in time proportional to the number of selected indexes at or after `index`.
    pub fn adjust_for_splice(&mut self, index: usize, remove_count: usize, added_count: usize) -> bool {
        if index > self.len || remove_count > self.len - index {
            vwarn!(index, remove_count, len = self.len, "adjust_for_splice rejected");
            return false;
        }
        if remove_count == 0 && added_count == 0 {
            return true;
        }

        self.begin_change();
        let removed_end = index + remove_count;
        self.len = self.len - remove_count + added_count;

        let tail = self.selected.split_off(&index);
        for i in tail {
            if i >= removed_end {
                self.selected.insert(i - remove_count + added_count);
            } else {
                self.dirty = true;
            }
        }

        let touched_tail = self.touched.split_off(&index);
        for (i, was) in touched_tail {
            if i >= removed_end {
                self.touched.insert(i - remove_count + added_count, was);
            }
        }

        let len = self.len;
        let remap = |i: usize| -> Option<usize> {
            if i < index {
                Some(i)
            } else if i >= removed_end {
                Some(i - remove_count + added_count)
            } else if len == 0 {
                None
            } else {
                Some(index.min(len - 1))
            }
        };
        let lead = self.lead.and_then(remap);
        let anchor = self.anchor.and_then(remap);
        if lead != self.lead || anchor != self.anchor {
            self.lead = lead;
            self.anchor = anchor;
            self.dirty = true;
        }
        self.end_change();
        true
    }

    /// Starts a change batch. Batches nest; listeners run once at the outermost `end_change`.
    pub fn begin_change(&mut self) {
        if self.change_depth == 0 {
            self.anchor_set_in_change = false;
        }
        self.change_depth += 1;
    }

    pub fn end_change(&mut self) {
        debug_assert!(self.change_depth > 0, "end_change without begin_change");
        self.change_depth = self.change_depth.saturating_sub(1);
        if self.change_depth > 0 {
            return;
        }
        self.anchor_set_in_change = false;

        let touched = core::mem::take(&mut self.touched);
        let changes: Vec<SelectionDelta> = touched
            .into_iter()
            .filter_map(|(index, was)| {
                let selected = self.selected.contains(&index);
                (selected != was).then_some(SelectionDelta { index, selected })
            })
            .collect();

        if !self.dirty && changes.is_empty() {
            return;
        }
        self.dirty = false;
        vtrace!(
            changes = changes.len(),
            selected = self.selected.len(),
            "selection changed"
        );
        if self.observers.is_empty() {
            return;
        }
        let event = SelectionChanged {
            changes: &changes,
            lead_index: self.lead,
            anchor_index: self.anchor,
        };
        self.observers.for_each(|f| f(&event));
    }

    pub fn is_changing(&self) -> bool {
        self.change_depth > 0
    }

    pub fn on_selection_changed(
        &mut self,
        listener: impl Fn(&SelectionChanged<'_>) + Send + Sync + 'static,
    ) -> ListenerId {
        self.observers.subscribe(Arc::new(listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            selected: self.selected.iter().copied().collect(),
            lead_index: self.lead,
            anchor_index: self.anchor,
        }
    }

    /// Restores a snapshot. Indexes that no longer fit the current length are dropped.
    pub fn restore(&mut self, snapshot: &SelectionSnapshot) {
        let len = self.len;
        self.begin_change();
        self.clear_except(None);
        for &i in snapshot.selected.iter().filter(|&&i| i < len) {
            if self.mode == SelectionMode::Single && !self.selected.is_empty() {
                break;
            }
            self.insert(i);
        }
        self.set_lead_inner(snapshot.lead_index.filter(|&i| i < len));
        self.set_anchor_inner(snapshot.anchor_index.filter(|&i| i < len));
        self.end_change();
    }

    fn check_index(&self, index: usize) -> bool {
        if index >= self.len {
            vwarn!(index, len = self.len, "selection index out of range");
            return false;
        }
        true
    }

    fn insert(&mut self, index: usize) {
        if self.selected.insert(index) {
            self.touched.entry(index).or_insert(false);
        }
    }

    fn remove(&mut self, index: usize) {
        if self.selected.remove(&index) {
            self.touched.entry(index).or_insert(true);
        }
    }

    fn clear_except(&mut self, keep: Option<usize>) {
        let selected = core::mem::take(&mut self.selected);
        for i in selected {
            if Some(i) == keep {
                self.selected.insert(i);
            } else {
                self.touched.entry(i).or_insert(true);
            }
        }
    }

    fn set_lead_inner(&mut self, index: Option<usize>) {
        if self.lead != index {
            self.lead = index;
            self.dirty = true;
        }
    }

    fn set_anchor_inner(&mut self, index: Option<usize>) {
        if self.change_depth > 0 {
            self.anchor_set_in_change = true;
        }
        if self.anchor != index {
            self.anchor = index;
            self.dirty = true;
        }
    }
}

impl Default for SelectionModel {
    fn default() -> Self {
        Self::new(0, SelectionMode::default())
    }
}

impl core::fmt::Debug for SelectionModel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SelectionModel")
            .field("mode", &self.mode)
            .field("len", &self.len)
            .field("selected", &self.selected)
            .field("lead", &self.lead)
            .field("anchor", &self.anchor)
            .field("change_depth", &self.change_depth)
            .finish_non_exhaustive()
    }
}
