use std::fmt;

use serde::{Deserialize, Serialize};

/// Small integer identifying one live slot of a [`HandleAllocator`].
///
/// Handles are plain indices: any `usize` converts into one, and operations
/// on a handle that is not live are refused rather than panicking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PosetHandle(usize);

impl PosetHandle {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for PosetHandle {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl From<PosetHandle> for usize {
    fn from(handle: PosetHandle) -> Self {
        handle.0
    }
}

impl fmt::Display for PosetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Arena of slots with a free list.
///
/// Slots are never removed, only emptied, so a handle stays meaningful for
/// the lifetime of the allocator. Freed handles are reused last-freed-first.
#[derive(Debug, Clone)]
pub struct HandleAllocator<T> {
    slots: Vec<Option<T>>,
    free: Vec<PosetHandle>,
}

impl<T> Default for HandleAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HandleAllocator<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: Vec::new(), free: Vec::new() }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { slots: Vec::with_capacity(capacity), free: Vec::new() }
    }

    /// Stores `value` in the most recently freed slot, or in a new one.
    pub fn allocate(&mut self, value: T) -> PosetHandle {
        if let Some(handle) = self.free.pop() {
            self.slots[handle.index()] = Some(value);
            handle
        } else {
            let handle = PosetHandle(self.slots.len());
            self.slots.push(Some(value));
            handle
        }
    }

    /// Empties the slot and returns its value, or `None` if it was not live.
    pub fn free(&mut self, handle: PosetHandle) -> Option<T> {
        let value = self.slots.get_mut(handle.index())?.take()?;
        self.free.push(handle);
        Some(value)
    }

    #[must_use]
    pub fn is_live(&self, handle: PosetHandle) -> bool {
        self.get(handle).is_some()
    }

    #[must_use]
    pub fn get(&self, handle: PosetHandle) -> Option<&T> {
        self.slots.get(handle.index())?.as_ref()
    }

    pub fn get_mut(&mut self, handle: PosetHandle) -> Option<&mut T> {
        self.slots.get_mut(handle.index())?.as_mut()
    }

    /// Live handles in ascending order.
    pub fn handles(&self) -> impl Iterator<Item = PosetHandle> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(index, _)| PosetHandle(index))
    }

    /// Number of live slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_handles_are_sequential() {
        let mut slots = HandleAllocator::new();
        assert_eq!(slots.allocate('a'), PosetHandle::from(0));
        assert_eq!(slots.allocate('b'), PosetHandle::from(1));
        assert_eq!(slots.allocate('c'), PosetHandle::from(2));
        assert_eq!(slots.len(), 3);
    }

    #[test]
    fn freed_handles_are_reused_last_first() {
        let mut slots = HandleAllocator::new();
        let a = slots.allocate(1);
        let b = slots.allocate(2);
        let _c = slots.allocate(3);

        assert_eq!(slots.free(a), Some(1));
        assert_eq!(slots.free(b), Some(2));
        assert!(!slots.is_live(a));
        assert_eq!(slots.len(), 1);

        assert_eq!(slots.allocate(20), b);
        assert_eq!(slots.allocate(10), a);
        assert_eq!(slots.allocate(4), PosetHandle::from(3));
        assert_eq!(slots.get(a), Some(&10));
    }

    #[test]
    fn freeing_dead_or_unknown_handles_is_a_no_op() {
        let mut slots = HandleAllocator::new();
        let a = slots.allocate("x");
        assert_eq!(slots.free(PosetHandle::from(7)), None);
        assert_eq!(slots.free(a), Some("x"));
        assert_eq!(slots.free(a), None);

        // a double free must not put the handle on the free list twice
        let b = slots.allocate("y");
        let c = slots.allocate("z");
        assert_eq!(b, a);
        assert_ne!(c, a);
    }

    #[test]
    fn handles_lists_only_live_slots() {
        let mut slots = HandleAllocator::with_capacity(4);
        let a = slots.allocate(());
        let b = slots.allocate(());
        let c = slots.allocate(());
        slots.free(b);
        assert_eq!(slots.handles().collect::<Vec<_>>(), vec![a, c]);
        assert!(slots.get_mut(b).is_none());
    }
}
