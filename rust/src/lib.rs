//! Classic search structures with step tracing and JSON persistence.
//!
//! This crate provides the engines behind an educational search visualizer:
//! linear and binary search over bounded key arrays, hash tables with four
//! hash functions and five collision strategies, external block search,
//! three letter tries keyed by five-bit codes, and a Huffman coding tree.
//! Every structure can be saved to and loaded from a JSON document, and the
//! array searches can be traced one comparison at a time.
//!
//! # Examples
//!
//! ```
//! use search_structures::{
//!     CollisionStrategy, HashFunction, HashStructure, Persistable, StructureConfig,
//! };
//!
//! let config = StructureConfig::new(10, 2).unwrap();
//! let mut table = HashStructure::new(config, HashFunction::Modular, CollisionStrategy::Linear);
//!
//! let first = table.insert(31).unwrap();
//! let second = table.insert(41).unwrap();
//! assert_eq!(first.index, 1);
//! assert_eq!((second.index, second.first_collision), (2, Some(1)));
//!
//! let reloaded = HashStructure::from_json(&table.to_json().unwrap()).unwrap();
//! assert_eq!(reloaded.find(41), Some(2));
//! ```

pub mod binary;
pub mod error;
pub mod external;
pub mod hash;
pub mod huffman;
pub mod linear;
pub mod persistence;
pub mod stepper;
pub mod trie;
pub mod validation;

pub use binary::BinaryStructure;
pub use error::{InitResult, ModifyResult, StructureError, StructureResult, StructureResultExt};
pub use external::search::{BinaryBlocks, BlockSearch, SequentialBlocks};
pub use external::{
    BlockSearchResult, ExternalBinaryStructure, ExternalSequentialStructure, ExternalStructure,
};
pub use hash::functions::{CollisionStrategy, HashFunction};
pub use hash::table::{Chain, Slot, Table};
pub use hash::{HashStructure, InsertOutcome};
pub use huffman::{HuffmanListing, HuffmanTree};
pub use linear::LinearStructure;
pub use persistence::{AnyStructure, Persistable, StructureDocument};
pub use stepper::{
    run_to_end, BinaryCursor, ExternalCursor, ExternalStep, LinearCursor, SearchCursor, Step,
};
pub use trie::{
    BranchListing, DigitalTree, LetterTrie, NodeId, NodeListing, ResidueMultipleTree,
    ResidueTree, CODE_LENGTH,
};
pub use validation::{
    StructureConfig, MAX_CAPACITY, MAX_KEY_LENGTH, MIN_KEY_LENGTH, RANDOM_ATTEMPTS_PER_KEY,
};
