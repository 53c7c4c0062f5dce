//! Letter tries keyed by the five-bit code table.
//!
//! All three tries share the same contract, captured by [`LetterTrie`]:
//! letters are normalized to uppercase, inserted at most once, found by a
//! full depth-first search, and deleted by replaying the remaining
//! insertion history into a fresh tree.
//!
//! # Examples
//!
//! ```
//! use search_structures::{DigitalTree, LetterTrie};
//!
//! let mut tree = DigitalTree::new();
//! tree.insert('a').unwrap();
//! tree.insert('B').unwrap();
//! assert_eq!(tree.find('b'), vec![1, 2]);
//!
//! tree.delete('A').unwrap();
//! assert_eq!(tree.insertion_order(), &['B']);
//! ```

pub mod arena;
pub mod codes;
pub mod digital;
pub mod residue;
pub mod residue_multiple;

pub use arena::{Handle, NodeId};
pub use codes::{code_for, normalize_letter, CODE_LENGTH};
pub use digital::DigitalTree;
pub use residue::ResidueTree;
pub use residue_multiple::{BranchListing, ResidueMultipleTree};

use serde::Serialize;
use tracing::debug;

use crate::error::{ModifyResult, StructureError, StructureResult};
use arena::Arena;

/// Operations shared by the letter tries.
pub trait LetterTrie: Default + Sized {
    /// Persisted `tipo` of this trie.
    const KIND: &'static str;

    /// Insert `letter`, returning the node ids from the root to the node
    /// that now holds it.
    fn insert(&mut self, letter: char) -> ModifyResult<Vec<NodeId>>;

    /// Node ids from the root to the node holding `letter`, or an empty path
    /// when it is absent.
    fn find(&self, letter: char) -> Vec<NodeId>;

    /// Letters in the order they were accepted.
    fn insertion_order(&self) -> &[char];

    /// Drop every node and the insertion history.
    fn clear(&mut self);

    fn contains(&self, letter: char) -> bool {
        normalize_letter(letter)
            .map(|letter| self.insertion_order().contains(&letter))
            .unwrap_or(false)
    }

    fn len(&self) -> usize {
        self.insertion_order().len()
    }

    fn is_empty(&self) -> bool {
        self.insertion_order().is_empty()
    }

    /// Build a fresh tree by inserting `order` one letter at a time.
    fn rebuild(order: &[char]) -> StructureResult<Self> {
        let mut tree = Self::default();
        for &letter in order {
            tree.insert(letter)?;
        }
        Ok(tree)
    }

    /// Remove `letter` from the history and replace this tree with a rebuild
    /// of what is left.
    fn delete(&mut self, letter: char) -> ModifyResult<()> {
        let letter = normalize_letter(letter)?;
        if !self.insertion_order().contains(&letter) {
            return Err(StructureError::LetterNotFound(letter));
        }

        let remaining: Vec<char> = self
            .insertion_order()
            .iter()
            .copied()
            .filter(|&kept| kept != letter)
            .collect();
        *self = Self::rebuild(&remaining)?;

        debug!(kind = Self::KIND, %letter, remaining = remaining.len(), "deleted letter");
        Ok(())
    }
}

// ============================================================================
// BINARY NODES
// ============================================================================

/// Node of the digital and residue tries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BinaryNode {
    pub id: NodeId,
    pub value: Option<char>,
    pub left: Option<Handle>,
    pub right: Option<Handle>,
}

impl BinaryNode {
    pub fn new(id: NodeId, value: Option<char>) -> Self {
        Self {
            id,
            value,
            left: None,
            right: None,
        }
    }

    /// Child on the side selected by an ASCII `'0'` or `'1'`.
    pub fn child(&self, bit: u8) -> Option<Handle> {
        if bit == b'0' {
            self.left
        } else {
            self.right
        }
    }

    pub fn set_child(&mut self, bit: u8, child: Handle) {
        if bit == b'0' {
            self.left = Some(child);
        } else {
            self.right = Some(child);
        }
    }
}

/// One node of a binary trie as handed to a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeListing {
    pub id: NodeId,
    pub value: Option<char>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

/// Preorder listing of every node reachable from `root`.
pub(crate) fn list_binary(arena: &Arena<BinaryNode>, root: Option<Handle>) -> Vec<NodeListing> {
    let mut listing = Vec::with_capacity(arena.len());
    let mut stack: Vec<Handle> = root.into_iter().collect();
    while let Some(handle) = stack.pop() {
        let node = &arena[handle];
        listing.push(NodeListing {
            id: node.id,
            value: node.value,
            left: node.left.map(|child| arena[child].id),
            right: node.right.map(|child| arena[child].id),
        });
        stack.extend(node.right);
        stack.extend(node.left);
    }
    listing
}

/// Depth-first search, left before right, for the node holding `letter`.
pub(crate) fn binary_path(
    arena: &Arena<BinaryNode>,
    root: Option<Handle>,
    letter: char,
) -> Vec<NodeId> {
    fn visit(
        arena: &Arena<BinaryNode>,
        handle: Handle,
        letter: char,
        path: &mut Vec<NodeId>,
    ) -> bool {
        let node = &arena[handle];
        path.push(node.id);
        if node.value == Some(letter) {
            return true;
        }
        for child in [node.left, node.right].into_iter().flatten() {
            if visit(arena, child, letter, path) {
                return true;
            }
        }
        path.pop();
        false
    }

    let mut path = Vec::new();
    let Ok(letter) = normalize_letter(letter) else {
        return path;
    };
    if let Some(root) = root {
        visit(arena, root, letter, &mut path);
    }
    path
}
