//! Huffman coding tree built from a text's character frequencies.
//!
//! The tree is always a pure function of its source text: building twice
//! from the same text yields the same node ids, shape, and codes. Ties
//! between equal frequencies are broken by node id, so earlier characters
//! and earlier merges leave the queue first.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::error::{ModifyResult, StructureError, StructureResult};
use crate::trie::arena::{Arena, Handle, IdSequence, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
struct HuffNode {
    id: NodeId,
    frequency: usize,
    symbol: Option<char>,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl HuffNode {
    fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// One node of a Huffman tree as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HuffmanListing {
    pub id: NodeId,
    pub symbol: Option<char>,
    pub frequency: usize,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl HuffmanListing {
    /// `"A\n3"` for a leaf, the bare frequency for an internal node.
    pub fn label(&self) -> String {
        match self.symbol {
            Some(symbol) => format!("{}\n{}", symbol, self.frequency),
            None => self.frequency.to_string(),
        }
    }
}

/// Optimal prefix code over the characters of a text.
///
/// # Examples
///
/// ```
/// use search_structures::HuffmanTree;
///
/// let tree = HuffmanTree::from_text("aaab").unwrap();
/// assert_eq!(tree.frequencies()[&'A'], 3);
/// assert_eq!(tree.code_for('a'), Some("1"));
/// assert_eq!(tree.code_for('B'), Some("0"));
///
/// let bits = tree.encode("BAA").unwrap();
/// assert_eq!(bits, "011");
/// assert_eq!(tree.decode(&bits).unwrap(), "BAA");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HuffmanTree {
    nodes: Arena<HuffNode>,
    root: Option<Handle>,
    ids: IdSequence,
    frequencies: IndexMap<char, usize>,
    codes: BTreeMap<char, String>,
    text: String,
}

impl HuffmanTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from `text`.
    pub fn from_text(text: &str) -> StructureResult<Self> {
        let mut tree = Self::new();
        tree.build_from_text(text)?;
        Ok(tree)
    }

    /// Replace this tree with one built from `text` and return its codes.
    ///
    /// The text is uppercased first. Empty text is rejected and leaves the
    /// tree untouched.
    pub fn build_from_text(&mut self, text: &str) -> StructureResult<&BTreeMap<char, String>> {
        let text = text.to_uppercase();
        if text.is_empty() {
            return Err(StructureError::EmptyText);
        }

        let mut frequencies: IndexMap<char, usize> = IndexMap::new();
        for symbol in text.chars() {
            *frequencies.entry(symbol).or_insert(0) += 1;
        }

        let mut tree = Self::new();
        let mut queue = BinaryHeap::with_capacity(frequencies.len());
        for (&symbol, &frequency) in &frequencies {
            let leaf = tree.allocate(frequency, Some(symbol));
            queue.push(Reverse((frequency, tree.nodes[leaf].id, leaf)));
        }

        while queue.len() > 1 {
            let (Some(Reverse((f1, _, left))), Some(Reverse((f2, _, right)))) =
                (queue.pop(), queue.pop())
            else {
                break;
            };
            let parent = tree.allocate(f1 + f2, None);
            tree.nodes[parent].left = Some(left);
            tree.nodes[parent].right = Some(right);
            queue.push(Reverse((f1 + f2, tree.nodes[parent].id, parent)));
        }

        tree.root = queue.pop().map(|Reverse((_, _, root))| root);
        tree.frequencies = frequencies;
        tree.text = text;
        tree.assign_codes();

        debug!(
            symbols = tree.frequencies.len(),
            nodes = tree.nodes.len(),
            length = tree.text.chars().count(),
            "built huffman tree"
        );
        *self = tree;
        Ok(&self.codes)
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Normalized source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Code of every character, `'0'` for left edges and `'1'` for right.
    pub fn codes(&self) -> &BTreeMap<char, String> {
        &self.codes
    }

    pub fn code_for(&self, letter: char) -> Option<&str> {
        self.codes.get(&uppercase(letter)).map(String::as_str)
    }

    /// Character counts in order of first appearance.
    pub fn frequencies(&self) -> &IndexMap<char, usize> {
        &self.frequencies
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.root.map(|root| self.nodes[root].id)
    }

    /// Preorder listing of the nodes.
    pub fn nodes(&self) -> Vec<HuffmanListing> {
        let mut listing = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<Handle> = self.root.into_iter().collect();
        while let Some(handle) = stack.pop() {
            let node = &self.nodes[handle];
            listing.push(HuffmanListing {
                id: node.id,
                symbol: node.symbol,
                frequency: node.frequency,
                left: node.left.map(|child| self.nodes[child].id),
                right: node.right.map(|child| self.nodes[child].id),
            });
            stack.extend(node.right);
            stack.extend(node.left);
        }
        listing
    }

    /// Node ids from the root to the leaf holding `letter`, or an empty
    /// path when it is absent.
    pub fn find(&self, letter: char) -> Vec<NodeId> {
        let letter = uppercase(letter);
        let mut path = Vec::new();
        if let Some(root) = self.root {
            self.search(root, letter, &mut path);
        }
        path
    }

    /// Remove every occurrence of `letter` from the source text and rebuild.
    /// The tree is cleared when nothing is left.
    pub fn delete(&mut self, letter: char) -> ModifyResult<()> {
        if self.text.is_empty() {
            return Err(StructureError::EmptyTree);
        }
        let letter = uppercase(letter);
        if !self.text.contains(letter) {
            return Err(StructureError::LetterNotFound(letter));
        }

        let remaining: String = self.text.chars().filter(|&c| c != letter).collect();
        if remaining.is_empty() {
            self.clear();
        } else {
            self.build_from_text(&remaining)?;
        }
        debug!(%letter, remaining = remaining.chars().count(), "deleted huffman symbol");
        Ok(())
    }

    /// Concatenated codes of `message`'s characters.
    pub fn encode(&self, message: &str) -> StructureResult<String> {
        if self.is_empty() {
            return Err(StructureError::EmptyTree);
        }
        message
            .to_uppercase()
            .chars()
            .map(|symbol| {
                self.codes
                    .get(&symbol)
                    .map(String::as_str)
                    .ok_or(StructureError::LetterNotFound(symbol))
            })
            .collect()
    }

    /// Walk the tree along `bits`, emitting a character at every leaf.
    pub fn decode(&self, bits: &str) -> StructureResult<String> {
        let root = self.root.ok_or(StructureError::EmptyTree)?;
        let mut decoded = String::new();
        let mut current = root;

        for (position, bit) in bits.chars().enumerate() {
            let node = &self.nodes[current];
            let next = match bit {
                '0' if node.is_leaf() => Some(root),
                '0' => node.left,
                '1' => node.right,
                other => {
                    return Err(StructureError::InvalidCode(format!(
                        "'{}' at position {} is not a bit",
                        other, position
                    )))
                }
            };
            let next = next.ok_or_else(|| {
                StructureError::InvalidCode(format!("no branch for bit {} at position {}", bit, position))
            })?;

            let landed = &self.nodes[next];
            match landed.symbol {
                Some(symbol) if landed.is_leaf() => {
                    decoded.push(symbol);
                    current = root;
                }
                _ => current = next,
            }
        }

        if current != root {
            return Err(StructureError::InvalidCode(
                "bits end in the middle of a code".to_string(),
            ));
        }
        Ok(decoded)
    }

    /// Sum of code length times frequency over all characters, the number
    /// of bits needed to encode the source text.
    pub fn weighted_path_length(&self) -> usize {
        self.frequencies
            .iter()
            .map(|(symbol, frequency)| {
                frequency * self.codes.get(symbol).map_or(0, String::len)
            })
            .sum()
    }

    fn allocate(&mut self, frequency: usize, symbol: Option<char>) -> Handle {
        let id = self.ids.next_id();
        self.nodes.allocate(HuffNode {
            id,
            frequency,
            symbol,
            left: None,
            right: None,
        })
    }

    fn assign_codes(&mut self) {
        self.codes.clear();
        let mut stack: Vec<(Handle, String)> =
            self.root.map(|root| (root, String::new())).into_iter().collect();

        while let Some((handle, prefix)) = stack.pop() {
            let node = &self.nodes[handle];
            if let Some(symbol) = node.symbol {
                let code = if prefix.is_empty() { "0".to_string() } else { prefix };
                self.codes.insert(symbol, code);
                continue;
            }
            if let Some(right) = node.right {
                stack.push((right, format!("{}1", prefix)));
            }
            if let Some(left) = node.left {
                stack.push((left, format!("{}0", prefix)));
            }
        }
    }

    fn search(&self, handle: Handle, letter: char, path: &mut Vec<NodeId>) -> bool {
        let node = &self.nodes[handle];
        path.push(node.id);
        if node.symbol == Some(letter) {
            return true;
        }
        for child in [node.left, node.right].into_iter().flatten() {
            if self.search(child, letter, path) {
                return true;
            }
        }
        path.pop();
        false
    }
}

fn uppercase(letter: char) -> char {
    letter.to_uppercase().next().unwrap_or(letter)
}
