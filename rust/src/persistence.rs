//! JSON documents for saving and loading structures.
//!
//! Every structure converts to a [`StructureDocument`], an enum tagged by the
//! `tipo` field, and back. Loading always rebuilds the structure through its
//! validating constructors, so a document that breaks any structural rule is
//! rejected with a [`StructureError`] instead of being coerced.
//!
//! # Examples
//!
//! ```
//! use search_structures::{LinearStructure, Persistable, StructureConfig};
//!
//! let mut linear = LinearStructure::new(StructureConfig::new(10, 2).unwrap());
//! linear.insert(42).unwrap();
//!
//! let json = linear.to_json().unwrap();
//! assert!(json.contains("\"tipo\": \"lineal\""));
//! assert_eq!(LinearStructure::from_json(&json).unwrap(), linear);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::binary::BinaryStructure;
use crate::error::{InitResult, StructureError, StructureResult};
use crate::external::search::{BinaryBlocks, SequentialBlocks};
use crate::external::{ExternalBinaryStructure, ExternalSequentialStructure, ExternalStructure};
use crate::hash::functions::{CollisionStrategy, HashFunction};
use crate::hash::table::{Chain, Slot, Table};
use crate::hash::HashStructure;
use crate::huffman::HuffmanTree;
use crate::linear::LinearStructure;
use crate::trie::{DigitalTree, LetterTrie, ResidueMultipleTree, ResidueTree};

// ============================================================================
// DOCUMENT MODEL
// ============================================================================

/// A saved structure, discriminated by `tipo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tipo")]
pub enum StructureDocument {
    #[serde(rename = "lineal")]
    Linear(KeysDocument),
    #[serde(rename = "binaria")]
    Binary(KeysDocument),
    #[serde(rename = "hash")]
    Hash(HashDocument),
    #[serde(rename = "externa_secuencial")]
    ExternalSequential(KeysDocument),
    #[serde(rename = "externa_binaria")]
    ExternalBinary(KeysDocument),
    #[serde(rename = "huffman")]
    Huffman(TextDocument),
    #[serde(rename = "digital")]
    Digital(LettersDocument),
    #[serde(rename = "residuo")]
    Residue(LettersDocument),
    #[serde(rename = "residuo_multiple")]
    ResidueMultiple(LettersDocument),
}

impl StructureDocument {
    /// The `tipo` this document is saved under.
    pub fn kind(&self) -> &'static str {
        match self {
            StructureDocument::Linear(_) => "lineal",
            StructureDocument::Binary(_) => "binaria",
            StructureDocument::Hash(_) => "hash",
            StructureDocument::ExternalSequential(_) => "externa_secuencial",
            StructureDocument::ExternalBinary(_) => "externa_binaria",
            StructureDocument::Huffman(_) => "huffman",
            StructureDocument::Digital(_) => "digital",
            StructureDocument::Residue(_) => "residuo",
            StructureDocument::ResidueMultiple(_) => "residuo_multiple",
        }
    }
}

/// Body of the linear, binary and external documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeysDocument {
    #[serde(rename = "capacidad")]
    pub capacity: i64,
    #[serde(rename = "longitud_clave")]
    pub key_length: i64,
    #[serde(rename = "datos")]
    pub items: Vec<i64>,
}

/// Body of a hash document. `slots` has one entry per table slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashDocument {
    #[serde(rename = "capacidad")]
    pub capacity: i64,
    #[serde(rename = "longitud_clave")]
    pub key_length: i64,
    #[serde(rename = "hash_func")]
    pub function: HashFunction,
    #[serde(rename = "colision")]
    pub strategy: CollisionStrategy,
    #[serde(rename = "datos")]
    pub slots: Vec<Option<SlotEntry>>,
}

/// A non-null hash slot: a key, a bucket or chain, or a tombstone marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotEntry {
    Key(i64),
    Bucket(Vec<i64>),
    Tombstone(TombstoneMarker),
}

/// The `{"t": 1}` object left where a key was deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TombstoneMarker {
    pub t: u8,
}

impl TombstoneMarker {
    pub const MARK: TombstoneMarker = TombstoneMarker { t: 1 };
}

/// Body of a Huffman document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDocument {
    #[serde(default)]
    pub text: String,
}

/// Body of a letter trie document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LettersDocument {
    pub insertion_order: Vec<char>,
}

// ============================================================================
// PERSISTABLE
// ============================================================================

/// Conversion between a structure and its document.
pub trait Persistable: Sized {
    /// The `tipo` this structure is saved under.
    const DOCUMENT_TYPE: &'static str;

    fn to_document(&self) -> StructureDocument;

    /// Rebuild a structure from `document`, revalidating everything.
    fn from_document(document: StructureDocument) -> InitResult<Self>;

    /// Pretty-printed JSON text of the document.
    fn to_json(&self) -> StructureResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    fn from_json(text: &str) -> InitResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Rebuild from parsed JSON, reporting a foreign `tipo` as
    /// [`StructureError::WrongKind`].
    fn from_value(value: Value) -> InitResult<Self> {
        let found = document_type(&value)?;
        if found != Self::DOCUMENT_TYPE {
            return Err(StructureError::wrong_kind(Self::DOCUMENT_TYPE, &found));
        }
        Self::from_document(serde_json::from_value(value)?)
    }

    fn save_to_path<P: AsRef<Path>>(&self, path: P) -> StructureResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        debug!(kind = Self::DOCUMENT_TYPE, path = %path.display(), "saved structure");
        Ok(())
    }

    fn load_from_path<P: AsRef<Path>>(path: P) -> InitResult<Self> {
        let path = path.as_ref();
        let loaded = Self::from_json(&fs::read_to_string(path)?)?;
        debug!(kind = Self::DOCUMENT_TYPE, path = %path.display(), "loaded structure");
        Ok(loaded)
    }
}

fn document_type(value: &Value) -> InitResult<String> {
    let object = value
        .as_object()
        .ok_or_else(|| StructureError::invalid_document("documento", "expected a JSON object"))?;
    object
        .get("tipo")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| StructureError::invalid_document("tipo", "missing or not a string"))
}

fn mismatch<T>(expected: &str, document: &StructureDocument) -> InitResult<T> {
    Err(StructureError::wrong_kind(expected, document.kind()))
}

fn keys_document(capacity: usize, key_length: usize, items: &[i64]) -> KeysDocument {
    KeysDocument {
        capacity: capacity as i64,
        key_length: key_length as i64,
        items: items.to_vec(),
    }
}

impl Persistable for LinearStructure {
    const DOCUMENT_TYPE: &'static str = "lineal";

    fn to_document(&self) -> StructureDocument {
        StructureDocument::Linear(keys_document(self.capacity(), self.key_length(), self.items()))
    }

    fn from_document(document: StructureDocument) -> InitResult<Self> {
        match document {
            StructureDocument::Linear(body) => {
                Self::from_parts(body.capacity, body.key_length, body.items)
            }
            other => mismatch(Self::DOCUMENT_TYPE, &other),
        }
    }
}

impl Persistable for BinaryStructure {
    const DOCUMENT_TYPE: &'static str = "binaria";

    fn to_document(&self) -> StructureDocument {
        StructureDocument::Binary(keys_document(self.capacity(), self.key_length(), self.items()))
    }

    fn from_document(document: StructureDocument) -> InitResult<Self> {
        match document {
            StructureDocument::Binary(body) => {
                Self::from_parts(body.capacity, body.key_length, body.items)
            }
            other => mismatch(Self::DOCUMENT_TYPE, &other),
        }
    }
}

macro_rules! external_persistable {
    ($search:ty, $variant:ident) => {
        impl Persistable for ExternalStructure<$search> {
            const DOCUMENT_TYPE: &'static str =
                <$search as crate::external::search::BlockSearch>::KIND;

            fn to_document(&self) -> StructureDocument {
                StructureDocument::$variant(keys_document(
                    self.capacity(),
                    self.key_length(),
                    self.items(),
                ))
            }

            fn from_document(document: StructureDocument) -> InitResult<Self> {
                match document {
                    StructureDocument::$variant(body) => {
                        Self::from_parts(body.capacity, body.key_length, body.items)
                    }
                    other => mismatch(Self::DOCUMENT_TYPE, &other),
                }
            }
        }
    };
}

external_persistable!(SequentialBlocks, ExternalSequential);
external_persistable!(BinaryBlocks, ExternalBinary);

fn slot_entries(table: &Table) -> Vec<Option<SlotEntry>> {
    match table {
        Table::Probing(slots) => slots
            .iter()
            .map(|slot| match slot {
                Slot::Empty => None,
                Slot::Tombstone => Some(SlotEntry::Tombstone(TombstoneMarker::MARK)),
                Slot::Occupied(key) => Some(SlotEntry::Key(*key)),
            })
            .collect(),
        Table::Nested(buckets) => buckets
            .iter()
            .map(|bucket| Some(SlotEntry::Bucket(bucket.clone())))
            .collect(),
        Table::Chained(chains) => chains
            .iter()
            .map(|chain| Some(SlotEntry::Bucket(chain.iter().collect())))
            .collect(),
    }
}

fn entry_error(index: usize, details: &str) -> StructureError {
    StructureError::invalid_document(&format!("datos[{}]", index), details)
}

fn probing_slot(index: usize, entry: Option<SlotEntry>) -> InitResult<Slot> {
    match entry {
        None => Ok(Slot::Empty),
        Some(SlotEntry::Key(key)) => Ok(Slot::Occupied(key)),
        Some(SlotEntry::Tombstone(marker)) if marker == TombstoneMarker::MARK => Ok(Slot::Tombstone),
        Some(SlotEntry::Tombstone(marker)) => Err(entry_error(
            index,
            &format!("tombstone marker must be {{\"t\": 1}}, found t = {}", marker.t),
        )),
        Some(SlotEntry::Bucket(_)) => Err(entry_error(index, "bucket in a probing table")),
    }
}

fn bucket_keys(index: usize, entry: Option<SlotEntry>) -> InitResult<Vec<i64>> {
    match entry {
        None => Ok(Vec::new()),
        Some(SlotEntry::Bucket(keys)) => Ok(keys),
        Some(_) => Err(entry_error(index, "expected a list of keys")),
    }
}

fn table_from_entries(
    strategy: CollisionStrategy,
    entries: Vec<Option<SlotEntry>>,
) -> InitResult<Table> {
    let indexed = entries.into_iter().enumerate();
    Ok(match strategy {
        CollisionStrategy::Nested => Table::Nested(
            indexed
                .map(|(index, entry)| bucket_keys(index, entry))
                .collect::<InitResult<_>>()?,
        ),
        CollisionStrategy::Chaining => Table::Chained(
            indexed
                .map(|(index, entry)| bucket_keys(index, entry).map(Chain::from_iter))
                .collect::<InitResult<_>>()?,
        ),
        _ => Table::Probing(
            indexed
                .map(|(index, entry)| probing_slot(index, entry))
                .collect::<InitResult<_>>()?,
        ),
    })
}

impl Persistable for HashStructure {
    const DOCUMENT_TYPE: &'static str = "hash";

    fn to_document(&self) -> StructureDocument {
        StructureDocument::Hash(HashDocument {
            capacity: self.capacity() as i64,
            key_length: self.key_length() as i64,
            function: self.function(),
            strategy: self.strategy(),
            slots: slot_entries(self.table()),
        })
    }

    fn from_document(document: StructureDocument) -> InitResult<Self> {
        match document {
            StructureDocument::Hash(body) => {
                let table = table_from_entries(body.strategy, body.slots)?;
                Self::from_parts(
                    body.capacity,
                    body.key_length,
                    body.function,
                    body.strategy,
                    table,
                )
            }
            other => mismatch(Self::DOCUMENT_TYPE, &other),
        }
    }
}

impl Persistable for HuffmanTree {
    const DOCUMENT_TYPE: &'static str = "huffman";

    fn to_document(&self) -> StructureDocument {
        StructureDocument::Huffman(TextDocument {
            text: self.text().to_string(),
        })
    }

    fn from_document(document: StructureDocument) -> InitResult<Self> {
        match document {
            StructureDocument::Huffman(body) if body.text.is_empty() => Ok(HuffmanTree::new()),
            StructureDocument::Huffman(body) => HuffmanTree::from_text(&body.text),
            other => mismatch(Self::DOCUMENT_TYPE, &other),
        }
    }
}

fn replay<T: LetterTrie>(order: &[char]) -> InitResult<T> {
    T::rebuild(order)
        .map_err(|e| StructureError::invalid_document("insertion_order", &e.to_string()))
}

macro_rules! trie_persistable {
    ($tree:ty, $variant:ident) => {
        impl Persistable for $tree {
            const DOCUMENT_TYPE: &'static str = <$tree as LetterTrie>::KIND;

            fn to_document(&self) -> StructureDocument {
                StructureDocument::$variant(LettersDocument {
                    insertion_order: self.insertion_order().to_vec(),
                })
            }

            fn from_document(document: StructureDocument) -> InitResult<Self> {
                match document {
                    StructureDocument::$variant(body) => replay(&body.insertion_order),
                    other => mismatch(Self::DOCUMENT_TYPE, &other),
                }
            }
        }
    };
}

trie_persistable!(DigitalTree, Digital);
trie_persistable!(ResidueTree, Residue);
trie_persistable!(ResidueMultipleTree, ResidueMultiple);

// ============================================================================
// ANY STRUCTURE
// ============================================================================

/// Any loadable structure, for callers that open a file without knowing
/// its `tipo` in advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyStructure {
    Linear(LinearStructure),
    Binary(BinaryStructure),
    Hash(HashStructure),
    ExternalSequential(ExternalSequentialStructure),
    ExternalBinary(ExternalBinaryStructure),
    Huffman(HuffmanTree),
    Digital(DigitalTree),
    Residue(ResidueTree),
    ResidueMultiple(ResidueMultipleTree),
}

impl AnyStructure {
    pub fn kind(&self) -> &'static str {
        match self {
            AnyStructure::Linear(_) => LinearStructure::DOCUMENT_TYPE,
            AnyStructure::Binary(_) => BinaryStructure::DOCUMENT_TYPE,
            AnyStructure::Hash(_) => HashStructure::DOCUMENT_TYPE,
            AnyStructure::ExternalSequential(_) => ExternalSequentialStructure::DOCUMENT_TYPE,
            AnyStructure::ExternalBinary(_) => ExternalBinaryStructure::DOCUMENT_TYPE,
            AnyStructure::Huffman(_) => HuffmanTree::DOCUMENT_TYPE,
            AnyStructure::Digital(_) => <DigitalTree as Persistable>::DOCUMENT_TYPE,
            AnyStructure::Residue(_) => <ResidueTree as Persistable>::DOCUMENT_TYPE,
            AnyStructure::ResidueMultiple(_) => {
                <ResidueMultipleTree as Persistable>::DOCUMENT_TYPE
            }
        }
    }

    pub fn to_document(&self) -> StructureDocument {
        match self {
            AnyStructure::Linear(s) => s.to_document(),
            AnyStructure::Binary(s) => s.to_document(),
            AnyStructure::Hash(s) => s.to_document(),
            AnyStructure::ExternalSequential(s) => s.to_document(),
            AnyStructure::ExternalBinary(s) => s.to_document(),
            AnyStructure::Huffman(s) => s.to_document(),
            AnyStructure::Digital(s) => s.to_document(),
            AnyStructure::Residue(s) => s.to_document(),
            AnyStructure::ResidueMultiple(s) => s.to_document(),
        }
    }

    pub fn from_document(document: StructureDocument) -> InitResult<Self> {
        Ok(match document {
            StructureDocument::Linear(_) => Self::Linear(LinearStructure::from_document(document)?),
            StructureDocument::Binary(_) => Self::Binary(BinaryStructure::from_document(document)?),
            StructureDocument::Hash(_) => Self::Hash(HashStructure::from_document(document)?),
            StructureDocument::ExternalSequential(_) => {
                Self::ExternalSequential(ExternalSequentialStructure::from_document(document)?)
            }
            StructureDocument::ExternalBinary(_) => {
                Self::ExternalBinary(ExternalBinaryStructure::from_document(document)?)
            }
            StructureDocument::Huffman(_) => Self::Huffman(HuffmanTree::from_document(document)?),
            StructureDocument::Digital(_) => Self::Digital(DigitalTree::from_document(document)?),
            StructureDocument::Residue(_) => Self::Residue(ResidueTree::from_document(document)?),
            StructureDocument::ResidueMultiple(_) => {
                Self::ResidueMultiple(ResidueMultipleTree::from_document(document)?)
            }
        })
    }

    pub fn to_json(&self) -> StructureResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    pub fn from_json(text: &str) -> InitResult<Self> {
        Self::from_document(serde_json::from_str(text)?)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> StructureResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        debug!(kind = self.kind(), path = %path.display(), "saved structure");
        Ok(())
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> InitResult<Self> {
        let path = path.as_ref();
        let loaded = Self::from_json(&fs::read_to_string(path)?)?;
        debug!(kind = loaded.kind(), path = %path.display(), "loaded structure");
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::StructureConfig;
    use std::sync::{Arc, Mutex};
    use serde_json::json;

    fn config(capacity: usize, key_length: usize) -> StructureConfig {
        StructureConfig::new(capacity, key_length).unwrap()
    }

    #[test]
    fn test_linear_document_shape() {
        let mut linear = LinearStructure::new(config(10, 2));
        linear.insert(42).unwrap();
        linear.insert(17).unwrap();
        let value: Value = serde_json::from_str(&linear.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"tipo": "lineal", "capacidad": 10, "longitud_clave": 2, "datos": [42, 17]})
        );
    }

    #[test]
    fn test_binary_load_sorts() {
        let loaded = BinaryStructure::from_value(
            json!({"tipo": "binaria", "capacidad": 10, "longitud_clave": 2, "datos": [50, 12, 31]}),
        )
        .unwrap();
        assert_eq!(loaded.items(), &[12, 31, 50]);
    }

    #[test]
    fn test_load_rejects_bad_data() {
        let cases = [
            json!({"tipo": "lineal", "capacidad": 20, "longitud_clave": 2, "datos": []}),
            json!({"tipo": "lineal", "capacidad": 10, "longitud_clave": 0, "datos": []}),
            json!({"tipo": "lineal", "capacidad": 10, "longitud_clave": 2, "datos": [123]}),
            json!({"tipo": "lineal", "capacidad": 10, "longitud_clave": 2, "datos": [12, 12]}),
            json!({"tipo": "lineal", "capacidad": 10, "longitud_clave": 1,
                   "datos": [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, -1]}),
            json!({"tipo": "lineal", "capacidad": 10, "longitud_clave": 2, "datos": "12"}),
        ];
        for case in cases {
            let err = LinearStructure::from_value(case.clone()).unwrap_err();
            assert!(err.is_validation_error(), "{} gave {:?}", case, err);
        }
    }

    #[test]
    fn test_wrong_kind() {
        let err = LinearStructure::from_value(
            json!({"tipo": "binaria", "capacidad": 10, "longitud_clave": 2, "datos": []}),
        )
        .unwrap_err();
        assert!(matches!(err, StructureError::WrongKind { .. }));

        let err = LinearStructure::from_value(json!({"capacidad": 10})).unwrap_err();
        assert!(matches!(err, StructureError::InvalidDocument(_)));

        let any = AnyStructure::from_json(r#"{"tipo": "arbol"}"#).unwrap_err();
        assert!(matches!(any, StructureError::Json(_)));
    }

    #[test]
    fn test_hash_probing_round_trip_keeps_tombstones() {
        let mut hash = HashStructure::new(config(10, 2), HashFunction::Modular, CollisionStrategy::Linear);
        hash.insert(11).unwrap();
        hash.insert(21).unwrap();
        hash.delete(11).unwrap();

        let value: Value = serde_json::from_str(&hash.to_json().unwrap()).unwrap();
        assert_eq!(value["hash_func"], "modular");
        assert_eq!(value["colision"], "secuencial");
        assert_eq!(value["datos"][0], Value::Null);
        assert_eq!(value["datos"][1], json!({"t": 1}));
        assert_eq!(value["datos"][2], json!(21));

        let loaded = HashStructure::from_value(value).unwrap();
        assert_eq!(loaded, hash);
        assert_eq!(loaded.find(21), Some(2));
    }

    #[test]
    fn test_hash_bucket_slots_accept_null_or_empty() {
        let mut datos = vec![Value::Null; 10];
        datos[3] = json!([13, 23]);
        datos[4] = json!([]);
        let loaded = HashStructure::from_value(json!({
            "tipo": "hash", "capacidad": 10, "longitud_clave": 2,
            "hash_func": "modular", "colision": "encadenamiento", "datos": datos
        }))
        .unwrap();
        assert_eq!(loaded.table().keys_at(3), vec![13, 23]);

        let written: Value = serde_json::from_str(&loaded.to_json().unwrap()).unwrap();
        assert_eq!(written["datos"][0], json!([]));
        assert_eq!(HashStructure::from_value(written).unwrap(), loaded);
    }

    #[test]
    fn test_hash_load_rejects_bad_tables() {
        let base = |strategy: &str, datos: Value| {
            json!({
                "tipo": "hash", "capacidad": 10, "longitud_clave": 2,
                "hash_func": "modular", "colision": strategy, "datos": datos
            })
        };
        let short = vec![Value::Null; 9];
        let mut bad_marker = vec![Value::Null; 10];
        bad_marker[0] = json!({"t": 2});
        let mut bucket_in_probing = vec![Value::Null; 10];
        bucket_in_probing[0] = json!([10]);
        let mut key_in_bucket_table = vec![Value::Null; 10];
        key_in_bucket_table[0] = json!(10);
        let mut misplaced = vec![Value::Null; 10];
        misplaced[0] = json!([11]);

        for (strategy, datos) in [
            ("secuencial", Value::from(short)),
            ("secuencial", Value::from(bad_marker)),
            ("doble", Value::from(bucket_in_probing)),
            ("anidados", Value::from(key_in_bucket_table)),
            ("anidados", Value::from(misplaced)),
        ] {
            let err = HashStructure::from_value(base(strategy, datos)).unwrap_err();
            assert!(err.is_validation_error(), "{:?}", err);
        }

        let err = HashStructure::from_value(base("circular", json!([]))).unwrap_err();
        assert!(matches!(err, StructureError::Json(_)));
    }

    #[test]
    fn test_external_documents() {
        let mut external = ExternalBinaryStructure::new(config(100, 2));
        external.insert(55).unwrap();
        external.insert(12).unwrap();
        let json = external.to_json().unwrap();
        assert!(json.contains("externa_binaria"));
        assert_eq!(ExternalBinaryStructure::from_json(&json).unwrap(), external);

        let err = ExternalSequentialStructure::from_json(&json).unwrap_err();
        assert!(matches!(err, StructureError::WrongKind { .. }));
    }

    #[test]
    fn test_huffman_document() {
        let tree = HuffmanTree::from_text("banana").unwrap();
        let value: Value = serde_json::from_str(&tree.to_json().unwrap()).unwrap();
        assert_eq!(value, json!({"tipo": "huffman", "text": "BANANA"}));
        assert_eq!(HuffmanTree::from_value(value).unwrap(), tree);

        let empty = HuffmanTree::from_value(json!({"tipo": "huffman"})).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_trie_documents() {
        let tree = ResidueMultipleTree::rebuild(&['Q', 'A', 'R']).unwrap();
        let value: Value = serde_json::from_str(&tree.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"tipo": "residuo_multiple", "insertion_order": ["Q", "A", "R"]})
        );
        assert_eq!(ResidueMultipleTree::from_value(value).unwrap(), tree);

        let digital = DigitalTree::rebuild(&['C', 'B']).unwrap();
        assert_eq!(DigitalTree::from_json(&digital.to_json().unwrap()).unwrap(), digital);

        let err = ResidueTree::from_value(json!({"tipo": "residuo", "insertion_order": ["A", "A"]}))
            .unwrap_err();
        assert!(matches!(err, StructureError::InvalidDocument(_)));
        let err = ResidueTree::from_value(json!({"tipo": "residuo", "insertion_order": ["1"]}))
            .unwrap_err();
        assert!(matches!(err, StructureError::InvalidDocument(_)));
    }

    #[test]
    fn test_any_structure_dispatch() {
        let hash = HashStructure::new(config(10, 1), HashFunction::Folding, CollisionStrategy::Nested);
        let any = AnyStructure::from_json(&hash.to_json().unwrap()).unwrap();
        assert_eq!(any.kind(), "hash");
        assert_eq!(any, AnyStructure::Hash(hash));

        let trie = AnyStructure::from_json(r#"{"tipo":"digital","insertion_order":["A"]}"#).unwrap();
        assert!(matches!(trie, AnyStructure::Digital(_)));
        assert_eq!(AnyStructure::from_document(trie.to_document()).unwrap(), trie);
    }

    #[test]
    fn test_save_and_load_path() {
        let path = std::env::temp_dir().join(format!(
            "search-structures-{}-persistence.json",
            std::process::id()
        ));
        let mut binary = BinaryStructure::new(config(10, 3));
        binary.insert(500).unwrap();
        binary.save_to_path(&path).unwrap();

        assert_eq!(BinaryStructure::load_from_path(&path).unwrap(), binary);
        assert_eq!(
            AnyStructure::load_from_path(&path).unwrap(),
            AnyStructure::Binary(binary)
        );
        fs::remove_file(&path).unwrap();

        let missing = BinaryStructure::load_from_path(&path).unwrap_err();
        assert!(matches!(missing, StructureError::Io(_)));
    }

    /// Collects every event as `field=value` pairs.
    struct EventLog(Arc<Mutex<Vec<String>>>);

    struct Fields(Vec<String>);

    impl tracing::field::Visit for Fields {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            self.0.push(format!("{}={:?}", field.name(), value));
        }
    }

    impl tracing::Subscriber for EventLog {
        fn enabled(&self, _: &tracing::Metadata<'_>) -> bool {
            true
        }
        fn new_span(&self, _: &tracing::span::Attributes<'_>) -> tracing::span::Id {
            tracing::span::Id::from_u64(1)
        }
        fn record(&self, _: &tracing::span::Id, _: &tracing::span::Record<'_>) {}
        fn record_follows_from(&self, _: &tracing::span::Id, _: &tracing::span::Id) {}
        fn event(&self, event: &tracing::Event<'_>) {
            let mut fields = Fields(Vec::new());
            event.record(&mut fields);
            self.0.lock().unwrap().push(fields.0.join(" "));
        }
        fn enter(&self, _: &tracing::span::Id) {}
        fn exit(&self, _: &tracing::span::Id) {}
    }

    #[test]
    fn test_any_structure_save_logs_and_reloads() {
        let path = std::env::temp_dir().join(format!(
            "search-structures-{}-any-save.json",
            std::process::id()
        ));
        let mut linear = LinearStructure::new(config(10, 2));
        linear.insert(64).unwrap();
        let any = AnyStructure::Linear(linear);

        let events = Arc::new(Mutex::new(Vec::new()));
        let subscriber = EventLog(Arc::clone(&events));
        tracing::subscriber::with_default(subscriber, || any.save_to_path(&path).unwrap());

        let events = events.lock().unwrap();
        assert!(
            events
                .iter()
                .any(|e| e.contains("message=saved structure") && e.contains(r#"kind="lineal""#)),
            "{:?}",
            events
        );
        assert_eq!(AnyStructure::load_from_path(&path).unwrap(), any);
        fs::remove_file(&path).unwrap();
    }
}
