//! Storage families behind a hash table.
//!
//! The collision strategy picks one representation at construction time:
//! open-addressing slots, nested buckets, or linked chains. A table never
//! changes family afterwards.

use std::fmt;

use crate::hash::functions::CollisionStrategy;

// ============================================================================
// OPEN ADDRESSING
// ============================================================================

/// One cell of an open-addressing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Empty,
    /// A deleted key. Probes continue past it; inserts may reuse it.
    Tombstone,
    Occupied(i64),
}

impl Slot {
    /// True when an insert may claim this slot.
    pub fn is_free(&self) -> bool {
        matches!(self, Slot::Empty | Slot::Tombstone)
    }

    pub fn key(&self) -> Option<i64> {
        match self {
            Slot::Occupied(key) => Some(*key),
            _ => None,
        }
    }
}

// ============================================================================
// CHAINING
// ============================================================================

#[derive(Clone)]
struct Link {
    key: i64,
    next: Option<Box<Link>>,
}

/// Singly linked list of keys kept in insertion order.
#[derive(Clone, Default)]
pub struct Chain {
    head: Option<Box<Link>>,
    len: usize,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        std::iter::successors(self.head.as_deref(), |link| link.next.as_deref()).map(|link| link.key)
    }

    pub fn contains(&self, key: i64) -> bool {
        self.iter().any(|stored| stored == key)
    }

    /// Append `key` at the tail and return its position in the chain.
    pub fn push_back(&mut self, key: i64) -> usize {
        let mut cursor = &mut self.head;
        while let Some(link) = cursor {
            cursor = &mut link.next;
        }
        *cursor = Some(Box::new(Link { key, next: None }));
        self.len += 1;
        self.len - 1
    }

    /// Unlink the first occurrence of `key`, returning the position it had.
    pub fn remove(&mut self, key: i64) -> Option<usize> {
        let mut cursor = &mut self.head;
        let mut position = 0;
        while cursor.as_ref().is_some_and(|link| link.key != key) {
            cursor = &mut cursor.as_mut()?.next;
            position += 1;
        }
        let removed = cursor.take()?;
        *cursor = removed.next;
        self.len -= 1;
        Some(position)
    }
}

impl Drop for Chain {
    fn drop(&mut self) {
        let mut cursor = self.head.take();
        while let Some(mut link) = cursor {
            cursor = link.next.take();
        }
    }
}

impl PartialEq for Chain {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for Chain {}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl FromIterator<i64> for Chain {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let mut head = None;
        let mut len = 0;
        let mut tail = &mut head;
        for key in iter {
            let link = tail.insert(Box::new(Link { key, next: None }));
            tail = &mut link.next;
            len += 1;
        }
        Chain { head, len }
    }
}

// ============================================================================
// TABLE
// ============================================================================

/// The slots of a hash table, in the representation its strategy needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Table {
    Probing(Vec<Slot>),
    Nested(Vec<Vec<i64>>),
    Chained(Vec<Chain>),
}

impl Table {
    /// An empty table of `capacity` slots for `strategy`.
    pub fn new(strategy: CollisionStrategy, capacity: usize) -> Self {
        match strategy {
            CollisionStrategy::Nested => Table::Nested(vec![Vec::new(); capacity]),
            CollisionStrategy::Chaining => {
                Table::Chained((0..capacity).map(|_| Chain::new()).collect())
            }
            _ => Table::Probing(vec![Slot::Empty; capacity]),
        }
    }

    /// Number of slots.
    pub fn slot_count(&self) -> usize {
        match self {
            Table::Probing(slots) => slots.len(),
            Table::Nested(buckets) => buckets.len(),
            Table::Chained(chains) => chains.len(),
        }
    }

    /// Number of stored keys.
    pub fn key_count(&self) -> usize {
        match self {
            Table::Probing(slots) => slots.iter().filter(|slot| slot.key().is_some()).count(),
            Table::Nested(buckets) => buckets.iter().map(Vec::len).sum(),
            Table::Chained(chains) => chains.iter().map(Chain::len).sum(),
        }
    }

    /// Keys stored at `slot`, in bucket or chain order.
    pub fn keys_at(&self, slot: usize) -> Vec<i64> {
        match self {
            Table::Probing(slots) => slots.get(slot).and_then(Slot::key).into_iter().collect(),
            Table::Nested(buckets) => buckets.get(slot).cloned().unwrap_or_default(),
            Table::Chained(chains) => chains
                .get(slot)
                .map(|chain| chain.iter().collect())
                .unwrap_or_default(),
        }
    }

    /// Every stored key, slot by slot.
    pub fn keys(&self) -> Vec<i64> {
        (0..self.slot_count()).flat_map(|slot| self.keys_at(slot)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_appends_at_tail() {
        let mut chain = Chain::new();
        assert_eq!(chain.push_back(10), 0);
        assert_eq!(chain.push_back(20), 1);
        assert_eq!(chain.push_back(30), 2);
        assert_eq!(chain.iter().collect::<Vec<_>>(), vec![10, 20, 30]);
        assert!(chain.contains(20));
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_chain_remove() {
        let mut chain: Chain = [10, 20, 30, 40].into_iter().collect();
        assert_eq!(chain.remove(30), Some(2));
        assert_eq!(chain.remove(10), Some(0));
        assert_eq!(chain.remove(99), None);
        assert_eq!(chain.iter().collect::<Vec<_>>(), vec![20, 40]);
        assert_eq!(chain.remove(40), Some(1));
        assert_eq!(chain.remove(20), Some(0));
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
    }

    #[test]
    fn test_collected_chain_keeps_order_and_tail() {
        let mut chain: Chain = (1..=5).collect();
        assert_eq!(chain.len(), 5);
        assert_eq!(chain.iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(chain.push_back(6), 5);
        assert_eq!(chain.remove(1), Some(0));
        assert_eq!(chain.iter().collect::<Vec<_>>(), vec![2, 3, 4, 5, 6]);

        let empty: Chain = std::iter::empty().collect();
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);
    }

    #[test]
    fn test_long_chain_builds_and_drops() {
        let chain: Chain = (0..200_000).collect();
        assert_eq!(chain.len(), 200_000);
        assert_eq!(chain.iter().last(), Some(199_999));
        drop(chain);
    }

    #[test]
    fn test_table_families() {
        assert!(matches!(
            Table::new(CollisionStrategy::DoubleStep, 10),
            Table::Probing(ref slots) if slots.len() == 10
        ));
        assert!(matches!(Table::new(CollisionStrategy::Nested, 10), Table::Nested(_)));
        assert!(matches!(Table::new(CollisionStrategy::Chaining, 10), Table::Chained(_)));
    }

    #[test]
    fn test_key_count_ignores_tombstones() {
        let table = Table::Probing(vec![Slot::Occupied(11), Slot::Tombstone, Slot::Empty]);
        assert_eq!(table.key_count(), 1);
        assert_eq!(table.keys(), vec![11]);
        assert!(table.keys_at(1).is_empty());
    }
}
