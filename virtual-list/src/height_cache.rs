use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::cell::RefCell;

/// Sparse per-index heights with a lazily rebuilt prefix-sum offset table.
///
/// Unmeasured indexes use `default_height`. The offset table is a valid prefix:
/// `offsets[i]` is the top of index `i` for every `i < offsets.len()`. Recording a height at
/// `i` only truncates the table to `i + 1` entries; queries extend it again from the last valid
/// checkpoint, so a burst of measurements costs one forward walk instead of one per call.
#[derive(Clone, Debug)]
pub struct HeightCache {
    len: usize,
    default_height: u32,
    measured: BTreeMap<usize, u32>,
    offsets: RefCell<Vec<u64>>,
}

impl HeightCache {
    pub fn new(len: usize, default_height: u32) -> Self {
        Self {
            len,
            default_height,
            measured: BTreeMap::new(),
            offsets: RefCell::new(alloc::vec![0]),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn default_height(&self) -> u32 {
        self.default_height
    }

    pub fn set_default_height(&mut self, height: u32) {
        if self.default_height == height {
            return;
        }
        vdebug!(height, "HeightCache::set_default_height");
        self.default_height = height;
        self.invalidate_from(0);
    }

    /// Height of `index`: the measured value if present, else the default estimate.
    pub fn height(&self, index: usize) -> u32 {
        self.measured
            .get(&index)
            .copied()
            .unwrap_or(self.default_height)
    }

    pub fn measured_height(&self, index: usize) -> Option<u32> {
        self.measured.get(&index).copied()
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.measured.contains_key(&index)
    }

    pub fn measured_count(&self) -> usize {
        self.measured.len()
    }

    /// `true` when every index uses the default height.
    pub fn is_uniform(&self) -> bool {
        self.measured.is_empty()
    }

    /// Stores a measured height. Returns `true` if the stored value changed.
    ///
    /// Out-of-range indexes are ignored.
    pub fn record_height(&mut self, index: usize, height: u32) -> bool {
        if index >= self.len {
            vwarn!(index, len = self.len, "record_height out of range");
            return false;
        }
        if self.measured.insert(index, height) == Some(height) {
            return false;
        }
        self.invalidate_from(index);
        true
    }

    pub fn clear_measurements(&mut self) {
        if self.measured.is_empty() {
            return;
        }
        self.measured.clear();
        self.invalidate_from(0);
    }

    /// Forgets measurements for `index` and everything after it.
    pub fn truncate_measurements_from(&mut self, index: usize) {
        let dropped = self.measured.split_off(&index);
        if !dropped.is_empty() {
            self.invalidate_from(index);
        }
    }

    /// Changes the length without remapping measurements (entries past the end are dropped).
    pub fn set_len(&mut self, len: usize) {
        if self.len == len {
            return;
        }
        let from = self.len.min(len);
        self.measured.retain(|&i, _| i < len);
        self.len = len;
        self.invalidate_from(from);
    }

    /// Remaps measurements after a splice of the backing collection.
    ///
    /// Entries for removed indexes are dropped, later entries shift by the net delta and the
    /// offset table is invalidated from `index` onward.
    pub fn splice(&mut self, index: usize, remove_count: usize, added_count: usize) {
        debug_assert!(
            index <= self.len && remove_count <= self.len - index,
            "HeightCache::splice out of range (index={index}, remove={remove_count}, len={})",
            self.len
        );
        let removed_end = index.saturating_add(remove_count);
        let tail = self.measured.split_off(&index);
        for (i, h) in tail {
            if i >= removed_end {
                self.measured.insert(i - remove_count + added_count, h);
            }
        }
        self.len = self.len.saturating_sub(remove_count) + added_count;
        self.invalidate_from(index);
    }

    /// Top of `index` in pixels. `index == len()` yields the total height; larger values are
    /// clamped to it.
    pub fn offset_of(&self, index: usize) -> u64 {
        let index = index.min(self.len);
        if self.measured.is_empty() {
            return index as u64 * self.default_height as u64;
        }
        self.ensure_offsets(index);
        self.offsets.borrow()[index]
    }

    pub fn total_height(&self) -> u64 {
        self.offset_of(self.len)
    }

    /// Index whose span contains `offset`, clamped to the last index.
    ///
    /// Returns `None` for an empty cache.
    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let last = self.len - 1;
        if self.measured.is_empty() {
            if self.default_height == 0 {
                return Some(0);
            }
            let i = offset / self.default_height as u64;
            return Some(usize::try_from(i).map_or(last, |i| i.min(last)));
        }

        self.ensure_offsets_past(offset);
        let offsets = self.offsets.borrow();
        // offsets[0] == 0 <= offset, so the partition point is at least 1.
        let consumed = offsets.partition_point(|&o| o <= offset);
        Some((consumed - 1).min(last))
    }

    /// Snapshot of measured entries (useful for persistence).
    pub fn export_measurements(&self) -> Vec<(usize, u32)> {
        self.measured.iter().map(|(&i, &h)| (i, h)).collect()
    }

    /// Replaces measured entries. Out-of-range entries are skipped.
    pub fn import_measurements(&mut self, entries: impl IntoIterator<Item = (usize, u32)>) {
        self.measured.clear();
        let len = self.len;
        self.measured
            .extend(entries.into_iter().filter(|&(i, _)| i < len));
        vdebug!(entries = self.measured.len(), "import_measurements");
        self.invalidate_from(0);
    }

    fn invalidate_from(&mut self, index: usize) {
        let offsets = self.offsets.get_mut();
        if offsets.len() > index + 1 {
            offsets.truncate(index + 1);
        }
    }

    /// Extends the table so that `offsets[target]` is valid.
    fn ensure_offsets(&self, target: usize) {
        let mut offsets = self.offsets.borrow_mut();
        if target < offsets.len() {
            return;
        }
        self.extend_offsets(&mut offsets, |i, _| i < target);
    }

    /// Extends the table until its last entry is past `offset` or it covers the whole list.
    fn ensure_offsets_past(&self, offset: u64) {
        let mut offsets = self.offsets.borrow_mut();
        if offsets.last().is_some_and(|&o| o > offset) {
            return;
        }
        self.extend_offsets(&mut offsets, |_, acc| acc <= offset);
    }

    /// Walks forward from the last valid checkpoint while `more(next_index, top)` holds.
    fn extend_offsets(&self, offsets: &mut Vec<u64>, mut more: impl FnMut(usize, u64) -> bool) {
        let mut i = offsets.len() - 1;
        let mut acc = offsets[i];
        vtrace!(from = i, "extend offsets");
        let mut measured = self.measured.range(i..).peekable();
        while i < self.len && more(i, acc) {
            let h = match measured.next_if(|&(&k, _)| k == i) {
                Some((_, &h)) => h,
                None => self.default_height,
            };
            acc = acc.saturating_add(h as u64);
            offsets.push(acc);
            i += 1;
        }
    }
}

impl Default for HeightCache {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
