//! Arena storage for tree nodes.
//!
//! Nodes live in one `Vec` and refer to each other by [`Handle`]. Trees only
//! grow until they are rebuilt from scratch, so the arena never frees slots;
//! a node that changes role is overwritten in place with [`Arena::replace`].

use std::ops::{Index, IndexMut};

/// Display identifier of a node, assigned in creation order starting at 1.
pub type NodeId = u32;

/// Position of a node inside its arena.
pub type Handle = usize;

/// Append-only node storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arena<T> {
    storage: Vec<T>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
        }
    }

    /// Store `item` and return its handle.
    #[inline]
    pub fn allocate(&mut self, item: T) -> Handle {
        self.storage.push(item);
        self.storage.len() - 1
    }

    #[inline]
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.storage.get(handle)
    }

    #[inline]
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.storage.get_mut(handle)
    }

    /// Overwrite the node at `handle`, returning the old one.
    pub fn replace(&mut self, handle: Handle, item: T) -> T {
        std::mem::replace(&mut self.storage[handle], item)
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn clear(&mut self) {
        self.storage.clear();
    }
}

impl<T> Index<Handle> for Arena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &T {
        &self.storage[handle]
    }
}

impl<T> IndexMut<Handle> for Arena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut T {
        &mut self.storage[handle]
    }
}

/// Hands out [`NodeId`]s in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdSequence {
    next: NodeId,
}

impl Default for IdSequence {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdSequence {
    pub fn next_id(&mut self) -> NodeId {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn reset(&mut self) {
        self.next = 1;
    }
}
