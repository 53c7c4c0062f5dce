//! Block-level search strategies for external structures.
//!
//! A strategy sees only the bases (largest key) of the populated blocks and
//! the keys of one block at a time, the way a disk-backed search reads one
//! index page and then one data page.

use std::fmt::Debug;

/// How an external structure picks a block and scans inside it.
pub trait BlockSearch: Debug + Clone + Copy + PartialEq + Eq + Default {
    /// Persisted `tipo` of structures using this strategy.
    const KIND: &'static str;

    /// Block to inspect for `value`, given the bases of the populated blocks
    /// in order. `None` means no block can hold it.
    fn select_block(bases: &[i64], value: i64) -> Option<usize>;

    /// Offset of `value` inside one sorted block.
    fn scan_block(block: &[i64], value: i64) -> Option<usize>;
}

/// Scan bases left to right; scan inside the block linearly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SequentialBlocks;

impl BlockSearch for SequentialBlocks {
    const KIND: &'static str = "externa_secuencial";

    /// First block whose base is at least `value`. When every base is
    /// smaller, the last populated block, so a miss still reports where the
    /// search ended.
    fn select_block(bases: &[i64], value: i64) -> Option<usize> {
        bases
            .iter()
            .position(|&base| value <= base)
            .or_else(|| bases.len().checked_sub(1))
    }

    fn scan_block(block: &[i64], value: i64) -> Option<usize> {
        block.iter().position(|&key| key == value)
    }
}

/// Bisect over the bases; bisect inside the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BinaryBlocks;

impl BlockSearch for BinaryBlocks {
    const KIND: &'static str = "externa_binaria";

    /// Lower bound over the bases. `None` when `value` exceeds every base.
    fn select_block(bases: &[i64], value: i64) -> Option<usize> {
        let position = bases.partition_point(|&base| base < value);
        (position < bases.len()).then_some(position)
    }

    fn scan_block(block: &[i64], value: i64) -> Option<usize> {
        block.binary_search(&value).ok()
    }
}
