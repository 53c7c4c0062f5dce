//! Sorted dense array searched by bisection.

use std::collections::HashSet;

use rand::Rng;

use crate::error::{InitResult, ModifyResult, StructureError, StructureResultExt};
use crate::validation::{fill_random, random_target, Candidate, StructureConfig};

/// Keys kept sorted ascending. Inserts and deletes shift the tail to keep
/// the order; lookups are O(log n).
///
/// # Examples
///
/// ```
/// use search_structures::{BinaryStructure, StructureConfig};
///
/// let mut binary = BinaryStructure::new(StructureConfig::new(10, 2).unwrap());
/// binary.insert(42).unwrap();
/// binary.insert(17).unwrap();
/// assert_eq!(binary.items(), &[17, 42]);
/// assert_eq!(binary.find(42), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryStructure {
    config: StructureConfig,
    items: Vec<i64>,
}

impl BinaryStructure {
    pub fn new(config: StructureConfig) -> Self {
        Self {
            config,
            items: Vec::new(),
        }
    }

    /// Create a structure from keys in any order; they are validated and sorted.
    pub fn with_items(config: StructureConfig, mut items: Vec<i64>) -> InitResult<Self> {
        config.check_keys(&items)?;
        if items.len() > config.capacity() {
            return Err(StructureError::invalid_document(
                "datos",
                &format!("{} keys exceed capacity {}", items.len(), config.capacity()),
            ));
        }
        items.sort_unstable();
        Ok(Self { config, items })
    }

    pub fn config(&self) -> &StructureConfig {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity()
    }

    pub fn key_length(&self) -> usize {
        self.config.key_length()
    }

    /// Stored keys, ascending.
    pub fn items(&self) -> &[i64] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.config.capacity()
    }

    /// First position whose key is not less than `value`.
    pub fn lower_bound(&self, value: i64) -> usize {
        self.items.partition_point(|&item| item < value)
    }

    /// Insert `value` at its sorted position and return that position.
    pub fn insert(&mut self, value: i64) -> ModifyResult<usize> {
        if self.is_full() {
            return Err(StructureError::Full(self.capacity()));
        }
        self.config.check_key(value)?;
        let index = self.lower_bound(value);
        if self.items.get(index) == Some(&value) {
            return Err(StructureError::DuplicateKey(value));
        }
        self.items.insert(index, value);
        tracing::debug!(value, index, "binary insert");
        Ok(index)
    }

    pub fn find(&self, value: i64) -> Option<usize> {
        let index = self.lower_bound(value);
        (self.items.get(index) == Some(&value)).then_some(index)
    }

    pub fn contains(&self, value: i64) -> bool {
        self.find(value).is_some()
    }

    /// Remove `value` and return the position it had.
    pub fn delete(&mut self, value: i64) -> ModifyResult<usize> {
        let index = self.find(value).ok_or(StructureError::KeyNotFound(value))?;
        self.items.remove(index);
        tracing::debug!(value, index, "binary delete");
        Ok(index)
    }

    pub fn generate_random(&mut self, count: usize) -> usize {
        self.generate_random_with(&mut rand::thread_rng(), count)
    }

    /// Add up to `count` distinct random keys, then restore the order.
    pub fn generate_random_with<R: Rng>(&mut self, rng: &mut R, count: usize) -> usize {
        let target = random_target(&self.config, &self.items, count);
        let mut existing: HashSet<i64> = self.items.iter().copied().collect();
        let mut fresh = Vec::with_capacity(target);
        let added = fill_random(rng, &self.config, target, None, |key| {
            if existing.insert(key) {
                fresh.push(key);
                Candidate::Added
            } else {
                Candidate::Rejected
            }
        });
        self.items.extend(fresh);
        self.items.sort_unstable();
        tracing::debug!(requested = count, added, "binary random fill");
        added
    }

    pub(crate) fn from_parts(capacity: i64, key_length: i64, items: Vec<i64>) -> InitResult<Self> {
        let config = StructureConfig::from_raw(capacity, key_length)?;
        Self::with_items(config, items).with_context("binaria")
    }
}
