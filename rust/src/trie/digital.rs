//! Digital trie: every node, the root included, may hold a letter.

use tracing::{debug, trace};

use super::arena::{Arena, Handle, IdSequence, NodeId};
use super::codes::coded;
use super::{binary_path, list_binary, BinaryNode, LetterTrie, NodeListing};
use crate::error::{ModifyResult, StructureError};

/// Binary trie where a letter settles in the first free slot along its code.
///
/// The first letter becomes the root. Each later letter follows its code
/// bits from the root (`0` left, `1` right) and stops at the first missing
/// child, so most letters sit well above depth five.
///
/// # Examples
///
/// ```
/// use search_structures::{DigitalTree, LetterTrie};
///
/// let mut tree = DigitalTree::new();
/// assert_eq!(tree.insert('A').unwrap(), vec![1]);
/// // B = 00010: the root has no left child yet
/// assert_eq!(tree.insert('B').unwrap(), vec![1, 2]);
/// // C = 00011: left to B, then left again
/// assert_eq!(tree.insert('C').unwrap(), vec![1, 2, 3]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DigitalTree {
    nodes: Arena<BinaryNode>,
    root: Option<Handle>,
    ids: IdSequence,
    order: Vec<char>,
}

impl DigitalTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the root, if any letter has been inserted.
    pub fn root_id(&self) -> Option<NodeId> {
        self.root.map(|root| self.nodes[root].id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Preorder listing of the nodes.
    pub fn nodes(&self) -> Vec<NodeListing> {
        list_binary(&self.nodes, self.root)
    }

    fn allocate(&mut self, value: Option<char>) -> Handle {
        let id = self.ids.next_id();
        self.nodes.allocate(BinaryNode::new(id, value))
    }

    fn accept(&mut self, letter: char, path: Vec<NodeId>) -> Vec<NodeId> {
        self.order.push(letter);
        debug!(%letter, depth = path.len() - 1, "digital insert");
        path
    }
}

impl LetterTrie for DigitalTree {
    const KIND: &'static str = "digital";

    fn insert(&mut self, letter: char) -> ModifyResult<Vec<NodeId>> {
        let (letter, code) = coded(letter)?;
        if self.order.contains(&letter) {
            return Err(StructureError::DuplicateLetter(letter));
        }

        let Some(mut current) = self.root else {
            let root = self.allocate(Some(letter));
            self.root = Some(root);
            let path = vec![self.nodes[root].id];
            return Ok(self.accept(letter, path));
        };

        let mut path = vec![self.nodes[current].id];
        for bit in code.bytes() {
            match self.nodes[current].child(bit) {
                Some(child) => {
                    current = child;
                    path.push(self.nodes[child].id);
                }
                None => {
                    let leaf = self.allocate(Some(letter));
                    self.nodes[current].set_child(bit, leaf);
                    path.push(self.nodes[leaf].id);
                    return Ok(self.accept(letter, path));
                }
            }
        }

        let node = &mut self.nodes[current];
        if node.value.is_some() {
            trace!(%letter, node = node.id, "code path ends on an occupied node");
            return Err(StructureError::PositionOccupied(letter));
        }
        node.value = Some(letter);
        Ok(self.accept(letter, path))
    }

    fn find(&self, letter: char) -> Vec<NodeId> {
        binary_path(&self.nodes, self.root, letter)
    }

    fn insertion_order(&self) -> &[char] {
        &self.order
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.ids.reset();
        self.order.clear();
    }
}
