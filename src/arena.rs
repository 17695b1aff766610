//! Slot storage for skip list nodes.
//!
//! Nodes refer to each other by slot index instead of by pointer. Freed slots
//! go onto a free list and are handed out again before the backing vector
//! grows, so indices stay stable for as long as a node is alive.

use std::collections::TryReserveError;

pub(crate) type NodeId = usize;

#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<NodeId>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Makes sure the next [`Arena::insert`] will not allocate.
    pub fn try_reserve_one(&mut self) -> Result<(), TryReserveError> {
        if self.free.is_empty() {
            self.slots.try_reserve(1)?;
        }
        Ok(())
    }

    pub fn insert(&mut self, value: T) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                debug_assert!(self.slots[index].is_none());
                self.slots[index] = Some(value);
                index
            }
            None => {
                self.slots.push(Some(value));
                self.slots.len() - 1
            }
        }
    }

    pub fn remove(&mut self, index: NodeId) -> Option<T> {
        let value = self.slots.get_mut(index)?.take()?;
        self.free.push(index);
        Some(value)
    }

    pub fn get(&self, index: NodeId) -> Option<&T> {
        self.slots.get(index)?.as_ref()
    }

    pub fn get_mut(&mut self, index: NodeId) -> Option<&mut T> {
        self.slots.get_mut(index)?.as_mut()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

impl<T> std::ops::Index<NodeId> for Arena<T> {
    type Output = T;

    fn index(&self, index: NodeId) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!("slot {index} is vacant"),
        }
    }
}

impl<T> std::ops::IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, index: NodeId) -> &mut T {
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("slot {index} is vacant"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut arena = Arena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");
        assert_eq!(arena.get(a), Some(&"a"));
        assert_eq!(arena[b], "b");
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        let _b = arena.insert(2);
        assert_eq!(arena.remove(a), Some(1));
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.len(), 1);

        let c = arena.insert(3);
        assert_eq!(c, a);
        assert_eq!(arena[c], 3);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn double_remove_is_harmless() {
        let mut arena = Arena::new();
        let a = arena.insert(10);
        assert_eq!(arena.remove(a), Some(10));
        assert_eq!(arena.remove(a), None);
        assert_eq!(arena.len(), 0);
        // only one free-list entry for the slot
        let b = arena.insert(11);
        let c = arena.insert(12);
        assert_ne!(b, c);
    }

    #[test]
    fn clear_resets_everything() {
        let mut arena = Arena::new();
        for i in 0..10 {
            arena.insert(i);
        }
        arena.clear();
        assert_eq!(arena.len(), 0);
        assert_eq!(arena.insert(99), 0);
    }

    #[test]
    #[should_panic(expected = "vacant")]
    fn indexing_vacant_slot_panics() {
        let mut arena = Arena::new();
        let a = arena.insert(5);
        arena.remove(a);
        let _ = arena[a];
    }
}
