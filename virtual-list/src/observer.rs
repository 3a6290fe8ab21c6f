use alloc::sync::Arc;
use alloc::vec::Vec;

/// Handle returned by `on_*` subscriptions; pass it back to `unsubscribe`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListenerId(u64);

/// An ordered list of synchronous listeners.
///
/// `F` is an unsized `dyn Fn(..)` type so events that borrow from the emitter can be delivered
/// without cloning.
pub(crate) struct Observers<F: ?Sized> {
    listeners: Vec<(ListenerId, Arc<F>)>,
    next_id: u64,
}

impl<F: ?Sized> Observers<F> {
    pub(crate) fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub(crate) fn subscribe(&mut self, listener: Arc<F>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Calls `f` for each listener, in subscription order.
    pub(crate) fn for_each(&self, mut f: impl FnMut(&F)) {
        for (_, listener) in &self.listeners {
            f(listener);
        }
    }
}

impl<F: ?Sized> core::fmt::Debug for Observers<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
