//! Hash functions and collision-resolution selectors.
//!
//! Both selectors persist under their Spanish names (`"cuadrado"`,
//! `"secuencial"`, ...) and parse from them case-insensitively.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StructureError;
use crate::validation::digit_count;

/// Digits of `capacity - 1`, the width of a slot address.
pub(crate) fn address_width(capacity: usize) -> usize {
    digit_count(capacity as i64 - 1)
}

// ============================================================================
// HASH FUNCTIONS
// ============================================================================

/// Maps a key to its home slot in `[0, capacity)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashFunction {
    /// Mid-square: the `n` central digits of `key²`.
    #[serde(rename = "cuadrado")]
    MidSquare,
    /// `key mod capacity`.
    #[serde(rename = "modular")]
    Modular,
    /// Sum of the `n`-digit chunks of the zero-padded key.
    #[serde(rename = "plegamiento")]
    Folding,
    /// The last `n` digits of the key.
    #[serde(rename = "truncamiento")]
    Truncation,
}

impl HashFunction {
    pub const ALL: [HashFunction; 4] = [
        HashFunction::MidSquare,
        HashFunction::Modular,
        HashFunction::Folding,
        HashFunction::Truncation,
    ];

    /// Persisted name.
    pub fn name(&self) -> &'static str {
        match self {
            HashFunction::MidSquare => "cuadrado",
            HashFunction::Modular => "modular",
            HashFunction::Folding => "plegamiento",
            HashFunction::Truncation => "truncamiento",
        }
    }

    /// Home slot of `key` in a table of `capacity` slots, where `n` is the
    /// digit count of `capacity - 1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_structures::HashFunction;
    ///
    /// assert_eq!(HashFunction::Modular.apply(1234, 100), 34);
    /// assert_eq!(HashFunction::Truncation.apply(1234, 100), 34);
    /// assert_eq!(HashFunction::Folding.apply(1234, 100), 46);
    /// // 1234² = 1522756, centre digits "22"
    /// assert_eq!(HashFunction::MidSquare.apply(1234, 100), 22);
    /// ```
    pub fn apply(&self, key: i64, capacity: usize) -> usize {
        let width = address_width(capacity);
        let raw = match self {
            HashFunction::Modular => return key.rem_euclid(capacity as i64) as usize,
            HashFunction::Truncation => key.unsigned_abs() % 10_u64.pow(width as u32),
            HashFunction::Folding => {
                let digits = format!("{:0>width$}", key.unsigned_abs(), width = width);
                digits
                    .as_bytes()
                    .chunks(width)
                    .map(parse_digits)
                    .sum::<u64>()
            }
            HashFunction::MidSquare => {
                let square = key.unsigned_abs().pow(2);
                let digits = format!("{:0>width$}", square, width = width);
                let start = (digits.len() - width) / 2;
                parse_digits(&digits.as_bytes()[start..start + width])
            }
        };
        (raw % capacity as u64) as usize
    }
}

fn parse_digits(chunk: &[u8]) -> u64 {
    chunk
        .iter()
        .fold(0, |acc, &digit| acc * 10 + u64::from(digit - b'0'))
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashFunction {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|function| function.name() == lowered)
            .ok_or_else(|| {
                StructureError::invalid_document("hash_func", &format!("unsupported '{}'", s))
            })
    }
}

// ============================================================================
// COLLISION STRATEGIES
// ============================================================================

/// How a key finds a place once its home slot is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionStrategy {
    /// Probe `h + i`. The index is not wrapped, so a probe can run past the
    /// last slot; see [`StructureError::ProbeOutOfBounds`].
    #[serde(rename = "secuencial")]
    Linear,
    /// Probe `(h + 2i) mod capacity`.
    #[serde(rename = "doble")]
    DoubleStep,
    /// Probe `(h + i²) mod capacity`.
    #[serde(rename = "cuadrado")]
    Quadratic,
    /// A growable bucket per slot.
    #[serde(rename = "anidados")]
    Nested,
    /// A singly linked chain per slot, appended at the tail.
    #[serde(rename = "encadenamiento")]
    Chaining,
}

impl CollisionStrategy {
    pub const ALL: [CollisionStrategy; 5] = [
        CollisionStrategy::Linear,
        CollisionStrategy::DoubleStep,
        CollisionStrategy::Quadratic,
        CollisionStrategy::Nested,
        CollisionStrategy::Chaining,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CollisionStrategy::Linear => "secuencial",
            CollisionStrategy::DoubleStep => "doble",
            CollisionStrategy::Quadratic => "cuadrado",
            CollisionStrategy::Nested => "anidados",
            CollisionStrategy::Chaining => "encadenamiento",
        }
    }

    /// True for open-addressing strategies that store one key per slot.
    pub fn is_probing(&self) -> bool {
        !matches!(self, CollisionStrategy::Nested | CollisionStrategy::Chaining)
    }

    /// Slot visited on attempt `attempt` for a key whose home slot is `home`.
    /// Bucket strategies always answer `home`.
    pub fn probe(&self, home: usize, attempt: usize, capacity: usize) -> usize {
        if attempt == 0 {
            return home;
        }
        match self {
            CollisionStrategy::Linear => home + attempt,
            CollisionStrategy::DoubleStep => (home + 2 * attempt) % capacity,
            CollisionStrategy::Quadratic => (home + attempt * attempt) % capacity,
            CollisionStrategy::Nested | CollisionStrategy::Chaining => home,
        }
    }
}

impl fmt::Display for CollisionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CollisionStrategy {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name() == lowered)
            .ok_or_else(|| {
                StructureError::invalid_document("colision", &format!("unsupported '{}'", s))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_width() {
        assert_eq!(address_width(1), 1);
        assert_eq!(address_width(10), 1);
        assert_eq!(address_width(100), 2);
        assert_eq!(address_width(10_000), 4);
    }

    #[test]
    fn test_modular_handles_negative_keys() {
        assert_eq!(HashFunction::Modular.apply(-1, 10), 9);
        assert_eq!(HashFunction::Modular.apply(57, 10), 7);
    }

    #[test]
    fn test_truncation_pads_short_keys() {
        assert_eq!(HashFunction::Truncation.apply(7, 100), 7);
        assert_eq!(HashFunction::Truncation.apply(98765, 1000), 765);
        assert_eq!(HashFunction::Truncation.apply(-98765, 1000), 765);
    }

    #[test]
    fn test_folding_sums_chunks_left_to_right() {
        // "12345" -> 12 + 34 + 5
        assert_eq!(HashFunction::Folding.apply(12345, 100), 51);
        // "987654" -> 98 + 76 + 54 = 228
        assert_eq!(HashFunction::Folding.apply(987654, 100), 28);
        // single-digit address: every digit is a chunk
        assert_eq!(HashFunction::Folding.apply(999, 10), 7);
    }

    #[test]
    fn test_mid_square_takes_centre_digits() {
        // 25² = 625, width 1, start (3-1)/2 = 1 -> "2"
        assert_eq!(HashFunction::MidSquare.apply(25, 10), 2);
        // 13² = 169, width 2, start (3-2)/2 = 0 -> "16"
        assert_eq!(HashFunction::MidSquare.apply(13, 100), 16);
        // 3² = 9 padded to "09"
        assert_eq!(HashFunction::MidSquare.apply(3, 100), 9);
        // 4567² = 20857489, width 3, start (8-3)/2 = 2 -> "857"
        assert_eq!(HashFunction::MidSquare.apply(4567, 1000), 857);
    }

    #[test]
    fn test_capacity_one_always_slot_zero() {
        for function in HashFunction::ALL {
            assert_eq!(function.apply(8, 1), 0);
        }
    }

    #[test]
    fn test_probe_sequences() {
        assert_eq!(CollisionStrategy::Linear.probe(8, 3, 10), 11);
        assert_eq!(CollisionStrategy::DoubleStep.probe(8, 3, 10), 4);
        assert_eq!(CollisionStrategy::Quadratic.probe(8, 3, 10), 7);
        assert_eq!(CollisionStrategy::Nested.probe(8, 3, 10), 8);
        for strategy in CollisionStrategy::ALL {
            assert_eq!(strategy.probe(5, 0, 10), 5);
        }
    }

    #[test]
    fn test_names_round_trip() {
        for function in HashFunction::ALL {
            assert_eq!(function.name().parse::<HashFunction>().unwrap(), function);
        }
        for strategy in CollisionStrategy::ALL {
            assert_eq!(strategy.name().parse::<CollisionStrategy>().unwrap(), strategy);
        }
        assert_eq!("MODULAR".parse::<HashFunction>().unwrap(), HashFunction::Modular);
        assert!("lineal".parse::<CollisionStrategy>().is_err());
        assert!(CollisionStrategy::Quadratic.is_probing());
        assert!(!CollisionStrategy::Chaining.is_probing());
    }
}
