//! Multi-residue trie: branches on two-bit chunks.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, trace};

use super::arena::{Arena, Handle, IdSequence, NodeId};
use super::codes::{coded, normalize_letter, CODE_LENGTH};
use super::LetterTrie;
use crate::error::{ModifyResult, StructureError};

/// Branch label read from `code` at bit `depth`: two bits while two remain,
/// otherwise the last bit alone.
fn chunk(code: &'static str, depth: usize) -> Option<&'static str> {
    let remaining = CODE_LENGTH.checked_sub(depth).filter(|&r| r > 0)?;
    let width = remaining.min(2);
    code.get(depth..depth + width)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BranchNode {
    id: NodeId,
    value: Option<char>,
    children: BTreeMap<&'static str, Handle>,
}

impl BranchNode {
    fn new(id: NodeId, value: Option<char>) -> Self {
        Self {
            id,
            value,
            children: BTreeMap::new(),
        }
    }
}

/// One node of a multi-residue trie as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchListing {
    pub id: NodeId,
    pub value: Option<char>,
    /// Child ids keyed by branch label (`"00"`..`"11"`, or `"0"`/`"1"`).
    pub children: BTreeMap<&'static str, NodeId>,
}

/// Residue trie with up to four children per node.
///
/// Codes are read two bits at a time, so the five-bit code of a letter
/// splits into the chunks `xx`, `xx`, `x`. Both two-bit levels hold
/// auxiliary nodes shared by every letter with the same prefix, and each
/// letter sits in a leaf three levels below the root.
///
/// # Examples
///
/// ```
/// use search_structures::{LetterTrie, ResidueMultipleTree};
///
/// let mut tree = ResidueMultipleTree::new();
/// tree.insert('A').unwrap(); // 00 00 1
/// tree.insert('B').unwrap(); // 00 01 0
///
/// let root = &tree.nodes()[0];
/// assert_eq!(root.value, None);
/// assert_eq!(root.children.keys().copied().collect::<Vec<_>>(), vec!["00"]);
/// assert_eq!(tree.find('A'), vec![1, 2, 3, 4]);
/// assert_eq!(tree.find('B'), vec![1, 2, 5, 6]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidueMultipleTree {
    nodes: Arena<BranchNode>,
    root: Handle,
    ids: IdSequence,
    order: Vec<char>,
}

impl Default for ResidueMultipleTree {
    fn default() -> Self {
        let mut ids = IdSequence::default();
        let mut nodes = Arena::new();
        let root = nodes.allocate(BranchNode::new(ids.next_id(), None));
        Self {
            nodes,
            root,
            ids,
            order: Vec::new(),
        }
    }
}

impl ResidueMultipleTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root_id(&self) -> NodeId {
        self.nodes[self.root].id
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Preorder listing, children in label order.
    pub fn nodes(&self) -> Vec<BranchListing> {
        let mut listing = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(handle) = stack.pop() {
            let node = &self.nodes[handle];
            listing.push(BranchListing {
                id: node.id,
                value: node.value,
                children: node
                    .children
                    .iter()
                    .map(|(&label, &child)| (label, self.nodes[child].id))
                    .collect(),
            });
            stack.extend(node.children.values().rev());
        }
        listing
    }

    fn allocate(&mut self, value: Option<char>) -> Handle {
        let id = self.ids.next_id();
        self.nodes.allocate(BranchNode::new(id, value))
    }

    /// Walk `code` from the root. Missing two-bit chunks get auxiliary
    /// nodes and the letter becomes a leaf under its final bit.
    fn place(&mut self, code: &'static str, letter: char) -> ModifyResult<Vec<NodeId>> {
        let mut node = self.root;
        let mut path = vec![self.nodes[node].id];
        let mut depth = 0;
        while let Some(label) = chunk(code, depth) {
            depth += label.len();
            let last = depth == CODE_LENGTH;
            node = match self.nodes[node].children.get(label) {
                Some(_) if last => return Err(StructureError::PositionOccupied(letter)),
                Some(&child) => child,
                None => {
                    let child = self.allocate(last.then_some(letter));
                    self.nodes[node].children.insert(label, child);
                    if !last {
                        trace!(aux = self.nodes[child].id, label, "auxiliary node");
                    }
                    child
                }
            };
            path.push(self.nodes[node].id);
        }
        Ok(path)
    }

    fn search(&self, handle: Handle, letter: char, path: &mut Vec<NodeId>) -> bool {
        let node = &self.nodes[handle];
        path.push(node.id);
        if node.value == Some(letter) {
            return true;
        }
        if node
            .children
            .values()
            .any(|&child| self.search(child, letter, path))
        {
            return true;
        }
        path.pop();
        false
    }
}

impl LetterTrie for ResidueMultipleTree {
    const KIND: &'static str = "residuo_multiple";

    fn insert(&mut self, letter: char) -> ModifyResult<Vec<NodeId>> {
        let (letter, code) = coded(letter)?;
        if self.order.contains(&letter) {
            return Err(StructureError::DuplicateLetter(letter));
        }

        let path = self.place(code, letter)?;
        self.order.push(letter);

        debug!(%letter, depth = path.len() - 1, "multi-residue insert");
        Ok(path)
    }

    fn find(&self, letter: char) -> Vec<NodeId> {
        let mut path = Vec::new();
        if let Ok(letter) = normalize_letter(letter) {
            self.search(self.root, letter, &mut path);
        }
        path
    }

    fn insertion_order(&self) -> &[char] {
        &self.order
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}
