//! Resumable step-by-step searches for visual tracing.
//!
//! A cursor holds the whole state of one search and advances it by exactly
//! one comparison per [`SearchCursor::step`] call. Callers drive it from a
//! loop ([`run_to_end`]) or from their own timer, one step per tick. Cursors
//! borrow the searched keys, so the structure cannot change mid-trace.
//!
//! # Examples
//!
//! ```
//! use search_structures::stepper::{run_to_end, LinearCursor, Step};
//!
//! let keys = [31, 12, 58];
//! let mut cursor = LinearCursor::new(&keys, 58);
//! assert_eq!(
//!     run_to_end(&mut cursor),
//!     vec![Step::Visit(0), Step::Visit(1), Step::Found(2)]
//! );
//! ```

use std::cmp::Ordering;
use std::fmt::Debug;

use tracing::trace;

use crate::external::search::{BinaryBlocks, BlockSearch, SequentialBlocks};
use crate::external::ExternalStructure;

/// One step over a flat key slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Compared the key at this index and kept going.
    Visit(usize),
    /// The target is at this index.
    Found(usize),
    /// The search ran out of candidates.
    NotFound,
}

impl Step {
    pub fn is_final(&self) -> bool {
        !matches!(self, Step::Visit(_))
    }
}

/// A search that advances one comparison at a time.
///
/// Once the search is over, further calls to `step` repeat the final step.
pub trait SearchCursor {
    type Step: Copy + Debug + PartialEq;

    fn target(&self) -> i64;

    fn step(&mut self) -> Self::Step;

    fn is_finished(&self) -> bool;
}

/// Drive `cursor` until it finishes, collecting every step.
pub fn run_to_end<C: SearchCursor>(cursor: &mut C) -> Vec<C::Step> {
    let mut steps = Vec::new();
    while !cursor.is_finished() {
        steps.push(cursor.step());
    }
    steps
}

// ============================================================================
// LINEAR
// ============================================================================

/// Scans keys left to right.
#[derive(Debug, Clone)]
pub struct LinearCursor<'a> {
    keys: &'a [i64],
    target: i64,
    index: usize,
    outcome: Option<Step>,
}

impl<'a> LinearCursor<'a> {
    pub fn new(keys: &'a [i64], target: i64) -> Self {
        Self {
            keys,
            target,
            index: 0,
            outcome: None,
        }
    }

    /// Index the next step will compare.
    pub fn position(&self) -> usize {
        self.index
    }
}

impl SearchCursor for LinearCursor<'_> {
    type Step = Step;

    fn target(&self) -> i64 {
        self.target
    }

    fn step(&mut self) -> Step {
        if let Some(outcome) = self.outcome {
            return outcome;
        }
        let step = match self.keys.get(self.index) {
            None => Step::NotFound,
            Some(&key) if key == self.target => Step::Found(self.index),
            Some(_) => {
                self.index += 1;
                Step::Visit(self.index - 1)
            }
        };
        if step.is_final() {
            self.outcome = Some(step);
        }
        step
    }

    fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }
}

// ============================================================================
// BINARY
// ============================================================================

/// Bisects sorted keys.
#[derive(Debug, Clone)]
pub struct BinaryCursor<'a> {
    keys: &'a [i64],
    target: i64,
    low: usize,
    high: usize,
    outcome: Option<Step>,
}

impl<'a> BinaryCursor<'a> {
    /// `keys` must be sorted ascending.
    pub fn new(keys: &'a [i64], target: i64) -> Self {
        Self {
            keys,
            target,
            low: 0,
            high: keys.len(),
            outcome: None,
        }
    }

    /// Half-open range of indexes still in play.
    pub fn window(&self) -> (usize, usize) {
        (self.low, self.high)
    }
}

impl SearchCursor for BinaryCursor<'_> {
    type Step = Step;

    fn target(&self) -> i64 {
        self.target
    }

    fn step(&mut self) -> Step {
        if let Some(outcome) = self.outcome {
            return outcome;
        }
        let step = if self.low >= self.high {
            Step::NotFound
        } else {
            let mid = self.low + (self.high - self.low) / 2;
            match self.keys[mid].cmp(&self.target) {
                Ordering::Equal => Step::Found(mid),
                Ordering::Less => {
                    self.low = mid + 1;
                    Step::Visit(mid)
                }
                Ordering::Greater => {
                    self.high = mid;
                    Step::Visit(mid)
                }
            }
        };
        if step.is_final() {
            self.outcome = Some(step);
        }
        step
    }

    fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }
}

// ============================================================================
// EXTERNAL
// ============================================================================

/// Cursor over one block, matching the strategy's in-block scan.
#[derive(Debug, Clone)]
pub enum BlockCursor<'a> {
    Linear(LinearCursor<'a>),
    Binary(BinaryCursor<'a>),
}

impl SearchCursor for BlockCursor<'_> {
    type Step = Step;

    fn target(&self) -> i64 {
        match self {
            BlockCursor::Linear(cursor) => cursor.target(),
            BlockCursor::Binary(cursor) => cursor.target(),
        }
    }

    fn step(&mut self) -> Step {
        match self {
            BlockCursor::Linear(cursor) => cursor.step(),
            BlockCursor::Binary(cursor) => cursor.step(),
        }
    }

    fn is_finished(&self) -> bool {
        match self {
            BlockCursor::Linear(cursor) => cursor.is_finished(),
            BlockCursor::Binary(cursor) => cursor.is_finished(),
        }
    }
}

/// Block strategies that can trace their in-block scan.
pub trait SteppedBlocks: BlockSearch {
    fn block_cursor(block: &[i64], target: i64) -> BlockCursor<'_>;
}

impl SteppedBlocks for SequentialBlocks {
    fn block_cursor(block: &[i64], target: i64) -> BlockCursor<'_> {
        BlockCursor::Linear(LinearCursor::new(block, target))
    }
}

impl SteppedBlocks for BinaryBlocks {
    fn block_cursor(block: &[i64], target: i64) -> BlockCursor<'_> {
        BlockCursor::Binary(BinaryCursor::new(block, target))
    }
}

/// One step of an external block search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalStep {
    /// The block index pointed the search at this block.
    SelectBlock(usize),
    /// Compared the key at `offset` inside `block`.
    Visit { block: usize, offset: usize },
    Found {
        index: usize,
        block: usize,
        offset: usize,
    },
    /// `block` is the block that was scanned, if any.
    NotFound { block: Option<usize> },
}

impl ExternalStep {
    pub fn is_final(&self) -> bool {
        matches!(self, ExternalStep::Found { .. } | ExternalStep::NotFound { .. })
    }
}

#[derive(Debug, Clone)]
enum ExternalPhase<'a> {
    Start,
    Scanning { block: usize, cursor: BlockCursor<'a> },
    Done(ExternalStep),
}

/// Picks a block from the block bases, then scans inside it.
#[derive(Debug, Clone)]
pub struct ExternalCursor<'a, S: SteppedBlocks> {
    structure: &'a ExternalStructure<S>,
    target: i64,
    phase: ExternalPhase<'a>,
}

impl<'a, S: SteppedBlocks> ExternalCursor<'a, S> {
    pub fn new(structure: &'a ExternalStructure<S>, target: i64) -> Self {
        Self {
            structure,
            target,
            phase: ExternalPhase::Start,
        }
    }

    /// Block being scanned, once one was selected.
    pub fn current_block(&self) -> Option<usize> {
        match &self.phase {
            ExternalPhase::Scanning { block, .. } => Some(*block),
            ExternalPhase::Done(ExternalStep::Found { block, .. }) => Some(*block),
            ExternalPhase::Done(ExternalStep::NotFound { block }) => *block,
            _ => None,
        }
    }

    fn select(&mut self) -> ExternalStep {
        let structure = self.structure;
        let block = structure
            .config()
            .accepts(self.target)
            .then(|| S::select_block(&structure.populated_bases(), self.target))
            .flatten();

        match block {
            Some(block) => {
                trace!(target = self.target, block, kind = S::KIND, "stepper selected block");
                self.phase = ExternalPhase::Scanning {
                    block,
                    cursor: S::block_cursor(structure.block(block), self.target),
                };
                ExternalStep::SelectBlock(block)
            }
            None => self.finish(ExternalStep::NotFound { block: None }),
        }
    }

    fn finish(&mut self, step: ExternalStep) -> ExternalStep {
        self.phase = ExternalPhase::Done(step);
        step
    }
}

impl<S: SteppedBlocks> SearchCursor for ExternalCursor<'_, S> {
    type Step = ExternalStep;

    fn target(&self) -> i64 {
        self.target
    }

    fn step(&mut self) -> ExternalStep {
        if matches!(self.phase, ExternalPhase::Start) {
            return self.select();
        }
        let (block, scanned) = match &mut self.phase {
            ExternalPhase::Scanning { block, cursor } => (*block, cursor.step()),
            ExternalPhase::Done(step) => return *step,
            ExternalPhase::Start => return ExternalStep::NotFound { block: None },
        };

        match scanned {
            Step::Visit(offset) => ExternalStep::Visit { block, offset },
            Step::Found(offset) => self.finish(ExternalStep::Found {
                index: block * self.structure.block_size() + offset,
                block,
                offset,
            }),
            Step::NotFound => self.finish(ExternalStep::NotFound { block: Some(block) }),
        }
    }

    fn is_finished(&self) -> bool {
        matches!(self.phase, ExternalPhase::Done(_))
    }
}
