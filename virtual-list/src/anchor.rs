/// A scroll anchor that preserves visual position across collection splices.
///
/// `index` is the first item of the topmost visible row; `offset_in_item` is how far the scroll
/// offset sits below that row's top.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollAnchor {
    pub index: usize,
    pub offset_in_item: u64,
}

impl ScrollAnchor {
    /// Maps the anchor through a splice of `remove_count` items at `index` that inserted
    /// `added_count` items, leaving a collection of `new_len` items.
    ///
    /// Splices at or below the anchored item leave the anchor index alone, so inserted content
    /// shows up in place. If the anchored item itself was removed the anchor moves to the
    /// splice point with no intra-item offset. Returns `None` when the collection became empty.
    pub fn remap_for_splice(
        self,
        index: usize,
        remove_count: usize,
        added_count: usize,
        new_len: usize,
    ) -> Option<Self> {
        if new_len == 0 {
            return None;
        }
        let removed_end = index.saturating_add(remove_count);
        let (mapped, offset_in_item) = if self.index < index {
            (self.index, self.offset_in_item)
        } else if self.index == index && remove_count == 0 {
            (self.index, self.offset_in_item)
        } else if self.index < removed_end {
            (index, 0)
        } else {
            (self.index - remove_count + added_count, self.offset_in_item)
        };
        Some(Self {
            index: mapped.min(new_len - 1),
            offset_in_item,
        })
    }
}
