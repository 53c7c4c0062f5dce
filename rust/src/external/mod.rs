//! External-memory search over a sorted array split into fixed-size blocks.
//!
//! The sorted keys are cut into `block_count` blocks of `block_size` keys,
//! where `block_size = floor(sqrt(capacity))`. Each populated block has a
//! *base*, its largest key. A search first picks a block from the bases and
//! then looks inside that one block, simulating one index read plus one page
//! read.

pub mod search;

use std::collections::HashSet;
use std::marker::PhantomData;
use std::ops::Range;

use rand::Rng;

use crate::error::{InitResult, ModifyResult, StructureError, StructureResult, StructureResultExt};
use crate::validation::{fill_random, random_target, Candidate, StructureConfig};

pub use search::{BinaryBlocks, BlockSearch, SequentialBlocks};

/// Blocks scanned sequentially.
pub type ExternalSequentialStructure = ExternalStructure<SequentialBlocks>;

/// Blocks searched by bisection.
pub type ExternalBinaryStructure = ExternalStructure<BinaryBlocks>;

/// Result of a block search.
///
/// On a miss, `block` still names the last block inspected so a caller can
/// show how far the search went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSearchResult {
    /// Global position of the key.
    pub index: Option<usize>,
    pub block: Option<usize>,
    /// Position inside `block`.
    pub offset: Option<usize>,
}

impl BlockSearchResult {
    pub fn hit(index: usize, block: usize, offset: usize) -> Self {
        Self {
            index: Some(index),
            block: Some(block),
            offset: Some(offset),
        }
    }

    pub fn miss(block: Option<usize>) -> Self {
        Self {
            index: None,
            block,
            offset: None,
        }
    }

    pub fn found(&self) -> bool {
        self.index.is_some()
    }
}

/// Sorted keys grouped into blocks, searched with strategy `S`.
///
/// # Examples
///
/// ```
/// use search_structures::{ExternalBinaryStructure, StructureConfig};
///
/// let config = StructureConfig::new(100, 3).unwrap();
/// let mut external = ExternalBinaryStructure::new(config);
/// for key in (100..160).step_by(5) {
///     external.insert(key).unwrap();
/// }
/// assert_eq!(external.block_size(), 10);
/// assert_eq!(external.block_bases()[..2], [Some(145), Some(155)]);
///
/// let result = external.find(150);
/// assert!(result.found());
/// assert_eq!((result.block, result.offset), (Some(1), Some(0)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalStructure<S: BlockSearch> {
    config: StructureConfig,
    items: Vec<i64>,
    _search: PhantomData<S>,
}

impl<S: BlockSearch> ExternalStructure<S> {
    pub fn new(config: StructureConfig) -> Self {
        Self {
            config,
            items: Vec::new(),
            _search: PhantomData,
        }
    }

    /// Create a structure from keys in any order.
    pub fn with_items(config: StructureConfig, mut items: Vec<i64>) -> InitResult<Self> {
        config.check_keys(&items)?;
        if items.len() > config.capacity() {
            return Err(StructureError::invalid_document(
                "datos",
                &format!("{} keys exceed capacity {}", items.len(), config.capacity()),
            ));
        }
        items.sort_unstable();
        Ok(Self {
            config,
            items,
            _search: PhantomData,
        })
    }

    /// Persisted `tipo` of this structure.
    pub fn kind(&self) -> &'static str {
        S::KIND
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

    // ========================================================================
    // BLOCK LAYOUT
    // ========================================================================

    /// `floor(sqrt(capacity))`, at least 1.
    pub fn block_size(&self) -> usize {
        // exact for the perfect squares among the allowed capacities
        ((self.config.capacity() as f64).sqrt() as usize).max(1)
    }

    /// `ceil(capacity / block_size)`.
    pub fn block_count(&self) -> usize {
        self.config.capacity().div_ceil(self.block_size())
    }

    /// Positions of the stored keys that fall in `block`. Empty past the
    /// last populated block.
    pub fn block_range(&self, block: usize) -> Range<usize> {
        let start = (block * self.block_size()).min(self.items.len());
        let end = (start + self.block_size()).min(self.items.len());
        start..end
    }

    /// Stored keys of `block`.
    pub fn block(&self, block: usize) -> &[i64] {
        &self.items[self.block_range(block)]
    }

    /// All blocks. With `fill`, every block is padded with `None` up to
    /// `block_size` for display.
    pub fn get_blocks(&self, fill: bool) -> Vec<Vec<Option<i64>>> {
        (0..self.block_count())
            .map(|block| {
                let mut keys: Vec<Option<i64>> =
                    self.block(block).iter().copied().map(Some).collect();
                if fill {
                    keys.resize(self.block_size(), None);
                }
                keys
            })
            .collect()
    }

    /// Largest key of `block`, or `None` if the block is empty.
    pub fn block_base(&self, block: usize) -> Option<i64> {
        self.block(block).last().copied()
    }

    /// Base of every block, `None` for empty ones.
    pub fn block_bases(&self) -> Vec<Option<i64>> {
        (0..self.block_count())
            .map(|block| self.block_base(block))
            .collect()
    }

    /// Bases of the populated blocks only.
    pub fn populated_bases(&self) -> Vec<i64> {
        self.block_bases().into_iter().map_while(|base| base).collect()
    }

    /// Map a global position to `(block, offset)`.
    pub fn locate_index(&self, index: usize) -> StructureResult<(usize, usize)> {
        if index >= self.items.len() {
            return Err(StructureError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok((index / self.block_size(), index % self.block_size()))
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    /// Insert `value` at its sorted position and return that position.
    pub fn insert(&mut self, value: i64) -> ModifyResult<usize> {
        if self.is_full() {
            return Err(StructureError::Full(self.capacity()));
        }
        self.config.check_key(value)?;
        let index = self.items.partition_point(|&item| item < value);
        if self.items.get(index) == Some(&value) {
            return Err(StructureError::DuplicateKey(value));
        }
        self.items.insert(index, value);
        tracing::debug!(value, index, kind = S::KIND, "external insert");
        Ok(index)
    }

    /// Pick a block from the bases, then search inside it.
    pub fn find(&self, value: i64) -> BlockSearchResult {
        if !self.config.accepts(value) {
            return BlockSearchResult::miss(None);
        }
        let Some(block) = S::select_block(&self.populated_bases(), value) else {
            return BlockSearchResult::miss(None);
        };
        tracing::trace!(value, block, kind = S::KIND, "block selected");
        match S::scan_block(self.block(block), value) {
            Some(offset) => {
                BlockSearchResult::hit(block * self.block_size() + offset, block, offset)
            }
            None => BlockSearchResult::miss(Some(block)),
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        self.find(value).found()
    }

    /// Remove `value`, shifting later keys down, and return its old position.
    pub fn delete(&mut self, value: i64) -> ModifyResult<usize> {
        let index = self.items.partition_point(|&item| item < value);
        if self.items.get(index) != Some(&value) {
            return Err(StructureError::KeyNotFound(value));
        }
        self.items.remove(index);
        tracing::debug!(value, index, kind = S::KIND, "external delete");
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
        tracing::debug!(requested = count, added, kind = S::KIND, "external random fill");
        added
    }

    pub(crate) fn from_parts(capacity: i64, key_length: i64, items: Vec<i64>) -> InitResult<Self> {
        let config = StructureConfig::from_raw(capacity, key_length)?;
        Self::with_items(config, items).with_context(S::KIND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full<S: BlockSearch>() -> ExternalStructure<S> {
        let config = StructureConfig::new(100, 3).unwrap();
        ExternalStructure::with_items(config, (0..100).map(|i| 100 + 3 * i).collect()).unwrap()
    }

    #[test]
    fn test_block_geometry() {
        let ext = ExternalSequentialStructure::new(StructureConfig::new(10, 2).unwrap());
        assert_eq!(ext.block_size(), 3);
        assert_eq!(ext.block_count(), 4);

        let ext = ExternalSequentialStructure::new(StructureConfig::new(1, 2).unwrap());
        assert_eq!(ext.block_size(), 1);
        assert_eq!(ext.block_count(), 1);

        let ext = ExternalBinaryStructure::new(StructureConfig::new(1000, 4).unwrap());
        assert_eq!(ext.block_size(), 31);
        assert_eq!(ext.block_count(), 33);
    }

    #[test]
    fn test_blocks_and_bases() {
        let config = StructureConfig::new(10, 2).unwrap();
        let ext =
            ExternalSequentialStructure::with_items(config, vec![50, 10, 40, 20, 30]).unwrap();
        assert_eq!(
            ext.get_blocks(true),
            vec![
                vec![Some(10), Some(20), Some(30)],
                vec![Some(40), Some(50), None],
                vec![None, None, None],
                vec![None, None, None],
            ]
        );
        assert_eq!(ext.get_blocks(false)[1], vec![Some(40), Some(50)]);
        assert!(ext.get_blocks(false)[2].is_empty());
        assert_eq!(ext.block_bases(), vec![Some(30), Some(50), None, None]);
        assert_eq!(ext.populated_bases(), vec![30, 50]);
    }

    #[test]
    fn test_locate_index() {
        let ext = full::<BinaryBlocks>();
        assert_eq!(ext.locate_index(0).unwrap(), (0, 0));
        assert_eq!(ext.locate_index(57).unwrap(), (5, 7));
        assert!(matches!(
            ext.locate_index(100),
            Err(StructureError::IndexOutOfRange { index: 100, len: 100 })
        ));
    }

    #[test]
    fn test_binary_find_on_full_structure() {
        let ext = full::<BinaryBlocks>();
        for (index, &key) in ext.items().iter().enumerate() {
            let result = ext.find(key);
            assert!(result.found());
            assert_eq!(result.index, Some(index));
            assert_eq!(result.block, Some(index / 10));
            assert_eq!(result.offset, Some(index % 10));
        }
    }

    #[test]
    fn test_sequential_miss_reports_last_block() {
        let config = StructureConfig::new(10, 2).unwrap();
        let ext =
            ExternalSequentialStructure::with_items(config, vec![10, 20, 30, 40, 50]).unwrap();
        assert_eq!(ext.find(25), BlockSearchResult::miss(Some(0)));
        assert_eq!(ext.find(35), BlockSearchResult::miss(Some(1)));
        // past every base: the search ends in the last populated block
        assert_eq!(ext.find(99), BlockSearchResult::miss(Some(1)));
        assert_eq!(ext.find(5), BlockSearchResult::miss(None));
    }

    #[test]
    fn test_binary_miss_past_every_base() {
        let config = StructureConfig::new(10, 2).unwrap();
        let ext = ExternalBinaryStructure::with_items(config, vec![10, 20, 30, 40, 50]).unwrap();
        assert_eq!(ext.find(35), BlockSearchResult::miss(Some(1)));
        assert_eq!(ext.find(99), BlockSearchResult::miss(None));
    }

    #[test]
    fn test_empty_structure_finds_nothing() {
        let ext = ExternalSequentialStructure::new(StructureConfig::new(100, 2).unwrap());
        assert_eq!(ext.find(42), BlockSearchResult::miss(None));
    }

    #[test]
    fn test_insert_delete_keep_order() {
        let mut ext = ExternalSequentialStructure::new(StructureConfig::new(10, 2).unwrap());
        assert_eq!(ext.insert(40).unwrap(), 0);
        assert_eq!(ext.insert(20).unwrap(), 0);
        assert_eq!(ext.insert(30).unwrap(), 1);
        assert!(matches!(ext.insert(30), Err(StructureError::DuplicateKey(30))));
        assert_eq!(ext.delete(20).unwrap(), 0);
        assert_eq!(ext.items(), &[30, 40]);
        assert!(matches!(ext.delete(20), Err(StructureError::KeyNotFound(20))));
        assert_eq!(ext.kind(), "externa_secuencial");
    }
}
