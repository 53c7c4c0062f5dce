//! Residue trie: letters live in leaves under a valueless root.

use tracing::{debug, trace};

use super::arena::{Arena, Handle, IdSequence, NodeId};
use super::codes::coded;
use super::{binary_path, list_binary, BinaryNode, LetterTrie, NodeListing};
use crate::error::{ModifyResult, StructureError};

/// Binary trie whose collisions are split by auxiliary nodes.
///
/// A letter follows its code bits and becomes a leaf at the first missing
/// child. When the child on its path is a leaf already, that leaf turns into
/// an auxiliary node and both letters continue from the next bit below it.
///
/// # Examples
///
/// ```
/// use search_structures::{LetterTrie, ResidueTree};
///
/// let mut tree = ResidueTree::new();
/// // A = 00001, B = 00010
/// assert_eq!(tree.insert('A').unwrap(), vec![1, 2]);
/// // B collides with A at the root's left child, which becomes auxiliary
/// // node 3; both letters then descend until their codes part at bit four.
/// let path = tree.insert('B').unwrap();
/// assert_eq!(path.first(), Some(&1));
/// assert_eq!(tree.find('B'), path);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidueTree {
    nodes: Arena<BinaryNode>,
    root: Handle,
    ids: IdSequence,
    order: Vec<char>,
}

impl Default for ResidueTree {
    fn default() -> Self {
        let mut ids = IdSequence::default();
        let mut nodes = Arena::new();
        let root = nodes.allocate(BinaryNode::new(ids.next_id(), None));
        Self {
            nodes,
            root,
            ids,
            order: Vec::new(),
        }
    }
}

impl ResidueTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root_id(&self) -> NodeId {
        self.nodes[self.root].id
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Preorder listing of the nodes.
    pub fn nodes(&self) -> Vec<NodeListing> {
        list_binary(&self.nodes, Some(self.root))
    }

    fn allocate(&mut self, value: Option<char>) -> Handle {
        let id = self.ids.next_id();
        self.nodes.allocate(BinaryNode::new(id, value))
    }

    /// Place `letter` somewhere below `node`, reading `code` from bit
    /// `depth`. Returns the ids of the nodes entered below `node`.
    fn insert_below(
        &mut self,
        node: Handle,
        code: &[u8],
        depth: usize,
        letter: char,
    ) -> ModifyResult<Vec<NodeId>> {
        let Some(&bit) = code.get(depth) else {
            let target = &mut self.nodes[node];
            if target.value.is_some() {
                return Err(StructureError::PositionOccupied(letter));
            }
            target.value = Some(letter);
            return Ok(Vec::new());
        };

        let Some(child) = self.nodes[node].child(bit) else {
            let leaf = self.allocate(Some(letter));
            self.nodes[node].set_child(bit, leaf);
            return Ok(vec![self.nodes[leaf].id]);
        };

        if let Some(resident) = self.nodes[child].value {
            let aux_id = self.ids.next_id();
            self.nodes.replace(child, BinaryNode::new(aux_id, None));
            trace!(%resident, %letter, aux = aux_id, depth, "split leaf");

            let (_, resident_code) = coded(resident)?;
            self.insert_below(child, resident_code.as_bytes(), depth + 1, resident)?;
        }

        let mut path = vec![self.nodes[child].id];
        path.extend(self.insert_below(child, code, depth + 1, letter)?);
        Ok(path)
    }
}

impl LetterTrie for ResidueTree {
    const KIND: &'static str = "residuo";

    fn insert(&mut self, letter: char) -> ModifyResult<Vec<NodeId>> {
        let (letter, code) = coded(letter)?;
        if self.order.contains(&letter) {
            return Err(StructureError::DuplicateLetter(letter));
        }

        let mut path = vec![self.root_id()];
        path.extend(self.insert_below(self.root, code.as_bytes(), 0, letter)?);
        self.order.push(letter);

        debug!(%letter, depth = path.len() - 1, "residue insert");
        Ok(path)
    }

    fn find(&self, letter: char) -> Vec<NodeId> {
        binary_path(&self.nodes, Some(self.root), letter)
    }

    fn insertion_order(&self) -> &[char] {
        &self.order
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_auxiliary() {
        let tree = ResidueTree::new();
        assert_eq!(tree.root_id(), 1);
        assert_eq!(tree.nodes()[0].value, None);
        assert!(tree.find('A').is_empty());
    }

    #[test]
    fn test_leaf_created_at_first_missing_child() {
        let mut tree = ResidueTree::new();
        // A goes left, P = 10000 goes right
        assert_eq!(tree.insert('A').unwrap(), vec![1, 2]);
        assert_eq!(tree.insert('P').unwrap(), vec![1, 3]);
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn test_collision_splits_leaf() {
        // H = 01000 and I = 01001 share four bits
        let mut tree = ResidueTree::new();
        tree.insert('H').unwrap();
        let path = tree.insert('I').unwrap();

        // root, aux replacing H's leaf (left), aux for bit 1, bit 2, bit 3,
        // then I's own leaf on bit 4
        assert_eq!(path.len(), 6);
        assert_eq!(path[0], 1);
        assert_eq!(path[1], 3);
        assert_eq!(tree.find('I'), path);

        let h_path = tree.find('H');
        assert_eq!(h_path.len(), 6);
        assert_eq!(h_path[..5], path[..5]);

        let leaves: Vec<char> = tree.nodes().iter().filter_map(|n| n.value).collect();
        assert_eq!(leaves, vec!['H', 'I']);
        // only leaves hold letters
        for node in tree.nodes() {
            if node.value.is_some() {
                assert_eq!((node.left, node.right), (None, None));
            }
        }
    }

    #[test]
    fn test_split_reuses_leaf_slot() {
        let mut tree = ResidueTree::new();
        tree.insert('A').unwrap();
        tree.insert('B').unwrap();
        let listing = tree.nodes();
        assert_eq!(listing[0].left, Some(3));
        assert!(listing.iter().all(|n| n.id != 2));
    }

    #[test]
    fn test_clear_resets_root() {
        let mut tree = ResidueTree::rebuild(&['X', 'Y']).unwrap();
        tree.clear();
        assert_eq!(tree, ResidueTree::new());
    }
}
