use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::ListError;
use crate::observer::{ListenerId, Observers};

/// Describes one applied splice.
///
/// `removed` holds the items that were taken out, in their original order. Observers run after
/// the mutation is applied, so `Collection::len` already reflects the new length.
#[derive(Debug)]
pub struct SpliceEvent<'a, T> {
    pub index: usize,
    pub removed: &'a [T],
    pub added_count: usize,
}

impl<T> SpliceEvent<'_, T> {
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    /// Net change in length (`added - removed`).
    pub fn delta(&self) -> isize {
        self.added_count as isize - self.removed.len() as isize
    }
}

/// A splice listener.
pub type SpliceListener<T> = dyn Fn(&SpliceEvent<'_, T>) + Send + Sync;

/// An ordered, observable sequence of items.
///
/// [`Collection::splice`] is the only mutation primitive; every convenience mutator is expressed
/// as exactly one splice and therefore produces exactly one notification.
pub struct Collection<T> {
    items: Vec<T>,
    observers: Observers<SpliceListener<T>>,
}

impl<T> Collection<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            observers: Observers::new(),
        }
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            items,
            observers: Observers::new(),
        }
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

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.items.iter().position(|it| it == item)
    }

    /// Registers a listener that runs synchronously after every splice.
    pub fn on_splice(
        &mut self,
        listener: impl Fn(&SpliceEvent<'_, T>) + Send + Sync + 'static,
    ) -> ListenerId {
        self.observers.subscribe(Arc::new(listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.observers.len()
    }

    /// Removes `remove_count` items at `index` and inserts `items` in their place.
    ///
    /// Returns the removed items. Malformed arguments are rejected before anything is touched.
    pub fn splice(
        &mut self,
        index: usize,
        remove_count: usize,
        items: impl IntoIterator<Item = T>,
    ) -> Result<Vec<T>, ListError> {
        check_splice(index, remove_count, self.items.len())?;

        let before = self.items.len();
        let removed: Vec<T> = self
            .items
            .splice(index..index + remove_count, items)
            .collect();
        let added_count = self.items.len() + removed.len() - before;
        vtrace!(
            index,
            removed = removed.len(),
            added = added_count,
            "Collection::splice"
        );

        if !self.observers.is_empty() {
            let event = SpliceEvent {
                index,
                removed: &removed,
                added_count,
            };
            self.observers.for_each(|f| f(&event));
        }
        Ok(removed)
    }

    pub fn push(&mut self, item: T) {
        self.append(core::iter::once(item));
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) {
        self.append(items);
    }

    fn append(&mut self, items: impl IntoIterator<Item = T>) {
        let len = self.items.len();
        // Appending at `len` with nothing removed is always in range.
        let _ = self.splice(len, 0, items);
    }

    pub fn clear(&mut self) -> Vec<T> {
        let len = self.items.len();
        self.splice(0, len, core::iter::empty())
            .unwrap_or_default()
    }

    pub fn remove(&mut self, index: usize) -> Result<T, ListError> {
        self.replace_inner(index, None)
    }

    /// Swaps the item at `index` for `item` and returns the old one.
    pub fn replace(&mut self, index: usize, item: T) -> Result<T, ListError> {
        self.replace_inner(index, Some(item))
    }

    fn replace_inner(&mut self, index: usize, item: Option<T>) -> Result<T, ListError> {
        let len = self.items.len();
        if index >= len {
            vwarn!(index, len, "index out of range");
            return Err(ListError::IndexOutOfRange { index, len });
        }
        let mut removed = self.splice(index, 1, item)?;
        removed.pop().ok_or(ListError::IndexOutOfRange { index, len })
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T: Clone> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            observers: Observers::new(),
        }
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Collection")
            .field("items", &self.items)
            .field("listeners", &self.observers.len())
            .finish()
    }
}

pub(crate) fn check_splice(index: usize, remove_count: usize, len: usize) -> Result<(), ListError> {
    if index > len || remove_count > len - index {
        vwarn!(index, remove_count, len, "rejected splice");
        return Err(ListError::SpliceOutOfRange {
            index,
            remove_count,
            len,
        });
    }
    Ok(())
}
