//! Error handling and result types for search structure operations.
//!
//! Every engine reports failures through [`StructureError`]. Variants fall into
//! three groups: validation (bad construction parameters or loaded data),
//! operational (full, duplicate, missing key) and domain (letter tries and the
//! Huffman tree).

use thiserror::Error;

/// Error type for search structure operations.
#[derive(Debug, Error)]
pub enum StructureError {
    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------
    /// Capacity is not a power of ten in `1..=10000`.
    #[error("Invalid capacity: {0}")]
    InvalidCapacity(String),
    /// Key length is outside `1..=9`.
    #[error("Invalid key length: {0}")]
    InvalidKeyLength(String),
    /// A key does not have the configured digit count.
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    /// A letter is outside `A..=Z`.
    #[error("Invalid letter: {0}")]
    InvalidLetter(String),
    /// Loaded data violates a structural invariant.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// The document describes another kind of structure.
    #[error("Incompatible document: expected '{expected}', found '{found}'")]
    WrongKind { expected: String, found: String },
    /// The document is not well-formed JSON for any known structure.
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Reading or writing a structure file failed.
    #[error("File access failed: {0}")]
    Io(#[from] std::io::Error),

    // ------------------------------------------------------------------
    // Operational
    // ------------------------------------------------------------------
    /// The structure already holds `capacity` keys.
    #[error("Structure is full (capacity {0})")]
    Full(usize),
    /// The key is already stored.
    #[error("Duplicate key: {0}")]
    DuplicateKey(i64),
    /// The key is not stored.
    #[error("Key not found: {0}")]
    KeyNotFound(i64),
    /// Every probe attempt landed on an occupied slot.
    #[error("No free slot found for {key} after {attempts} probes")]
    TableFull { key: i64, attempts: usize },
    /// Sequential probing walked past the last slot of the table.
    #[error("Probe for {key} reached slot {index} beyond table capacity {capacity}")]
    ProbeOutOfBounds {
        key: i64,
        index: usize,
        capacity: usize,
    },
    /// A global position does not address a stored key.
    #[error("Index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    // ------------------------------------------------------------------
    // Domain
    // ------------------------------------------------------------------
    /// The letter was inserted before.
    #[error("Letter already inserted: {0}")]
    DuplicateLetter(char),
    /// The letter is not in the tree.
    #[error("Letter not in tree: {0}")]
    LetterNotFound(char),
    /// The letter's code path ends on a node that already holds a value.
    #[error("Cannot place letter {0}: position occupied")]
    PositionOccupied(char),
    /// Huffman input text is empty.
    #[error("Cannot build a Huffman tree from empty text")]
    EmptyText,
    /// The Huffman tree has not been built.
    #[error("Tree is empty")]
    EmptyTree,
    /// A bit string does not decode under the current Huffman codes.
    #[error("Invalid code: {0}")]
    InvalidCode(String),
}

impl StructureError {
    /// Create an InvalidCapacity error with context
    pub fn invalid_capacity(capacity: i64) -> Self {
        Self::InvalidCapacity(format!(
            "{} is not a power of 10 between 1 and {}",
            capacity,
            crate::validation::MAX_CAPACITY
        ))
    }

    /// Create an InvalidKeyLength error with context
    pub fn invalid_key_length(key_length: i64) -> Self {
        Self::InvalidKeyLength(format!(
            "{} is outside {}..={}",
            key_length,
            crate::validation::MIN_KEY_LENGTH,
            crate::validation::MAX_KEY_LENGTH
        ))
    }

    /// Create an InvalidKey error for a key with the wrong digit count
    pub fn invalid_key(key: i64, key_length: usize) -> Self {
        Self::InvalidKey(format!("{} does not have {} digits", key, key_length))
    }

    /// Create an InvalidDocument error with context
    pub fn invalid_document(context: &str, details: &str) -> Self {
        Self::InvalidDocument(format!("{}: {}", context, details))
    }

    /// Create a WrongKind error
    pub fn wrong_kind(expected: &str, found: &str) -> Self {
        Self::WrongKind {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Check if this error came from validating parameters or loaded data
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCapacity(_)
                | Self::InvalidKeyLength(_)
                | Self::InvalidKey(_)
                | Self::InvalidLetter(_)
                | Self::InvalidCode(_)
                | Self::InvalidDocument(_)
                | Self::WrongKind { .. }
                | Self::Json(_)
        )
    }

    /// Check if this error means no room was left for a new key
    pub fn is_capacity_error(&self) -> bool {
        matches!(
            self,
            Self::Full(_) | Self::TableFull { .. } | Self::ProbeOutOfBounds { .. }
        )
    }

    /// Check if this error reports a missing key or letter
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound(_) | Self::LetterNotFound(_))
    }

    /// Check if this error reports a key or letter that is already present
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateKey(_) | Self::DuplicateLetter(_))
    }
}

/// Public result type for structure operations that may fail
pub type StructureResult<T> = Result<T, StructureError>;

/// Result type for insert/delete operations
pub type ModifyResult<T> = Result<T, StructureError>;

/// Result type for construction and loading
pub type InitResult<T> = Result<T, StructureError>;

/// Result extension trait for attaching context to validation failures
pub trait StructureResultExt<T> {
    /// Prefix the message of a document error with `context`
    fn with_context(self, context: &str) -> StructureResult<T>;
}

impl<T> StructureResultExt<T> for StructureResult<T> {
    fn with_context(self, context: &str) -> StructureResult<T> {
        self.map_err(|e| match e {
            StructureError::InvalidDocument(msg) => StructureError::invalid_document(context, &msg),
            StructureError::InvalidKey(msg) => StructureError::invalid_document(context, &msg),
            StructureError::InvalidCapacity(msg) => {
                StructureError::InvalidCapacity(format!("{}: {}", context, msg))
            }
            StructureError::InvalidKeyLength(msg) => {
                StructureError::InvalidKeyLength(format!("{}: {}", context, msg))
            }
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_groups() {
        assert!(StructureError::invalid_capacity(20).is_validation_error());
        assert!(StructureError::Full(10).is_capacity_error());
        assert!(StructureError::KeyNotFound(12).is_not_found());
        assert!(StructureError::DuplicateLetter('A').is_duplicate());
        assert!(!StructureError::EmptyTree.is_validation_error());
    }

    #[test]
    fn test_with_context_prefixes_document_errors() {
        let result: StructureResult<()> = Err(StructureError::invalid_key(123, 2));
        let err = result.with_context("datos[0]").unwrap_err();
        assert!(matches!(err, StructureError::InvalidDocument(_)));
        assert!(err.to_string().contains("datos[0]"));
        assert!(err.to_string().contains("123 does not have 2 digits"));
    }

    #[test]
    fn test_with_context_leaves_operational_errors() {
        let result: StructureResult<()> = Err(StructureError::DuplicateKey(42));
        let err = result.with_context("ignored").unwrap_err();
        assert!(matches!(err, StructureError::DuplicateKey(42)));
    }
}
