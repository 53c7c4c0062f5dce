//! Unsorted dense array searched front to back.

use std::collections::HashSet;

use rand::Rng;

use crate::error::{InitResult, ModifyResult, StructureError, StructureResultExt};
use crate::validation::{fill_random, random_target, Candidate, StructureConfig};

/// Keys kept in insertion order; lookups scan the whole array.
///
/// # Examples
///
/// ```
/// use search_structures::{LinearStructure, StructureConfig};
///
/// let mut linear = LinearStructure::new(StructureConfig::new(10, 2).unwrap());
/// assert_eq!(linear.insert(42).unwrap(), 0);
/// assert_eq!(linear.insert(17).unwrap(), 1);
/// assert_eq!(linear.find(17), Some(1));
/// assert_eq!(linear.delete(42).unwrap(), 0);
/// assert_eq!(linear.items(), &[17]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearStructure {
    config: StructureConfig,
    items: Vec<i64>,
}

impl LinearStructure {
    /// Create an empty structure.
    pub fn new(config: StructureConfig) -> Self {
        Self {
            config,
            items: Vec::new(),
        }
    }

    /// Create a structure holding `items` in the given order.
    pub fn with_items(config: StructureConfig, items: Vec<i64>) -> InitResult<Self> {
        config.check_keys(&items)?;
        if items.len() > config.capacity() {
            return Err(StructureError::invalid_document(
                "datos",
                &format!("{} keys exceed capacity {}", items.len(), config.capacity()),
            ));
        }
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

    /// Append `value` and return its index.
    pub fn insert(&mut self, value: i64) -> ModifyResult<usize> {
        if self.is_full() {
            return Err(StructureError::Full(self.capacity()));
        }
        self.config.check_key(value)?;
        if self.contains(value) {
            return Err(StructureError::DuplicateKey(value));
        }
        self.items.push(value);
        tracing::debug!(value, index = self.items.len() - 1, "linear insert");
        Ok(self.items.len() - 1)
    }

    /// Index of `value`, scanning from the front.
    pub fn find(&self, value: i64) -> Option<usize> {
        self.items.iter().position(|&item| item == value)
    }

    pub fn contains(&self, value: i64) -> bool {
        self.find(value).is_some()
    }

    /// Remove `value`, closing the gap, and return the index it had.
    pub fn delete(&mut self, value: i64) -> ModifyResult<usize> {
        let index = self.find(value).ok_or(StructureError::KeyNotFound(value))?;
        self.items.remove(index);
        tracing::debug!(value, index, "linear delete");
        Ok(index)
    }

    /// Append up to `count` random keys; see [`generate_random_with`](Self::generate_random_with).
    pub fn generate_random(&mut self, count: usize) -> usize {
        self.generate_random_with(&mut rand::thread_rng(), count)
    }

    /// Append up to `count` distinct random keys of the configured length,
    /// bounded by free capacity. Returns how many were added.
    pub fn generate_random_with<R: Rng>(&mut self, rng: &mut R, count: usize) -> usize {
        let target = random_target(&self.config, &self.items, count);
        let mut existing: HashSet<i64> = self.items.iter().copied().collect();
        let items = &mut self.items;
        let added = fill_random(rng, &self.config, target, None, |key| {
            if existing.insert(key) {
                items.push(key);
                Candidate::Added
            } else {
                Candidate::Rejected
            }
        });
        tracing::debug!(requested = count, added, "linear random fill");
        added
    }

    pub(crate) fn from_parts(capacity: i64, key_length: i64, items: Vec<i64>) -> InitResult<Self> {
        let config = StructureConfig::from_raw(capacity, key_length)?;
        Self::with_items(config, items).with_context("lineal")
    }
}
