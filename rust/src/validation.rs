//! Validation rules shared by every capacity-bounded structure.
//!
//! This module owns [`StructureConfig`], the validated pair of capacity and
//! key length, together with the digit-count rules every stored key obeys and
//! the rejection-sampling loop behind `generate_random`.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use rand::Rng;

use crate::error::{InitResult, ModifyResult, StructureError, StructureResultExt};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Largest accepted capacity.
pub const MAX_CAPACITY: usize = 10_000;

/// Shortest accepted key length, in decimal digits.
pub const MIN_KEY_LENGTH: usize = 1;

/// Longest accepted key length, in decimal digits.
pub const MAX_KEY_LENGTH: usize = 9;

/// Attempts a probing hash table may spend per requested random key before
/// `generate_random` gives up.
pub const RANDOM_ATTEMPTS_PER_KEY: usize = 64;

// ============================================================================
// DIGIT HELPERS
// ============================================================================

/// Returns true when `n` is 1, 10, 100, ...
pub fn is_power_of_ten(mut n: i64) -> bool {
    if n <= 0 {
        return false;
    }
    while n % 10 == 0 {
        n /= 10;
    }
    n == 1
}

/// Number of decimal digits in `|value|`. Zero has one digit.
pub fn digit_count(value: i64) -> usize {
    let mut n = value.unsigned_abs();
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Validated construction parameters of a capacity-bounded structure.
///
/// # Examples
///
/// ```
/// use search_structures::StructureConfig;
///
/// let config = StructureConfig::new(100, 3).unwrap();
/// assert!(config.accepts(123));
/// assert!(!config.accepts(12));
/// assert!(StructureConfig::new(50, 3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StructureConfig {
    capacity: usize,
    key_length: usize,
}

impl StructureConfig {
    /// Validate `capacity` (power of ten, at most [`MAX_CAPACITY`]) and
    /// `key_length` (in `MIN_KEY_LENGTH..=MAX_KEY_LENGTH`).
    pub fn new(capacity: usize, key_length: usize) -> InitResult<Self> {
        let capacity = i64::try_from(capacity).unwrap_or(i64::MAX);
        let key_length = i64::try_from(key_length).unwrap_or(i64::MAX);
        Self::from_raw(capacity, key_length)
    }

    /// Build a config with capacity `10^exponent`.
    pub fn from_exponent(exponent: u32, key_length: usize) -> InitResult<Self> {
        let capacity = 10_usize
            .checked_pow(exponent)
            .ok_or_else(|| StructureError::InvalidCapacity(format!("10^{} overflows", exponent)))?;
        Self::new(capacity, key_length)
    }

    /// Validate parameters as they arrive from a loaded document, where
    /// negative values are representable.
    pub(crate) fn from_raw(capacity: i64, key_length: i64) -> InitResult<Self> {
        if !is_power_of_ten(capacity) || capacity > MAX_CAPACITY as i64 {
            return Err(StructureError::invalid_capacity(capacity));
        }
        if key_length < MIN_KEY_LENGTH as i64 || key_length > MAX_KEY_LENGTH as i64 {
            return Err(StructureError::invalid_key_length(key_length));
        }
        Ok(Self {
            capacity: capacity as usize,
            key_length: key_length as usize,
        })
    }

    /// Maximum number of keys (or table slots).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Required digit count of every key.
    pub fn key_length(&self) -> usize {
        self.key_length
    }

    /// Returns true when `value` has exactly `key_length` digits.
    pub fn accepts(&self, value: i64) -> bool {
        digit_count(value) == self.key_length
    }

    /// Fail with [`StructureError::InvalidKey`] unless `value` is accepted.
    pub fn check_key(&self, value: i64) -> ModifyResult<()> {
        if self.accepts(value) {
            Ok(())
        } else {
            Err(StructureError::invalid_key(value, self.key_length))
        }
    }

    /// Non-negative keys of the configured length. One-digit keys include 0.
    pub fn key_range(&self) -> RangeInclusive<i64> {
        let upper = 10_i64.pow(self.key_length as u32) - 1;
        let lower = if self.key_length == 1 {
            0
        } else {
            10_i64.pow(self.key_length as u32 - 1)
        };
        lower..=upper
    }

    /// Number of distinct keys `generate_random` can draw from.
    pub fn key_space(&self) -> usize {
        let range = self.key_range();
        (range.end() - range.start() + 1) as usize
    }

    /// Draw one key uniformly from [`key_range`](Self::key_range).
    pub fn random_key<R: Rng>(&self, rng: &mut R) -> i64 {
        rng.gen_range(self.key_range())
    }

    /// Check a batch of loaded keys: digit count and uniqueness, reporting the
    /// offending position.
    pub(crate) fn check_keys<'a, I>(&self, keys: I) -> InitResult<()>
    where
        I: IntoIterator<Item = &'a i64>,
    {
        let mut seen = HashSet::new();
        for (position, &key) in keys.into_iter().enumerate() {
            self.check_key(key)
                .with_context(&format!("datos[{}]", position))?;
            if !seen.insert(key) {
                return Err(StructureError::invalid_document(
                    &format!("datos[{}]", position),
                    &format!("duplicate key {}", key),
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// RANDOM FILL
// ============================================================================

/// Outcome of offering one random candidate to a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Candidate {
    Added,
    Rejected,
}

/// Rejection-sampling loop shared by every `generate_random`.
///
/// Draws keys until `target` of them were accepted by `offer`. With a
/// `budget`, stops after that many draws even if fewer keys were added.
pub(crate) fn fill_random<R, F>(
    rng: &mut R,
    config: &StructureConfig,
    target: usize,
    budget: Option<usize>,
    mut offer: F,
) -> usize
where
    R: Rng,
    F: FnMut(i64) -> Candidate,
{
    let mut added = 0;
    let mut draws = 0;
    while added < target {
        if let Some(limit) = budget {
            if draws >= limit {
                tracing::warn!(added, target, draws, "random fill ran out of attempts");
                break;
            }
        }
        draws += 1;
        if offer(config.random_key(rng)) == Candidate::Added {
            added += 1;
        }
    }
    added
}

/// How many random keys a structure holding `keys` can take when asked for
/// `count`: bounded by free capacity and by the unused key space.
pub(crate) fn random_target<'a, I>(config: &StructureConfig, keys: I, count: usize) -> usize
where
    I: IntoIterator<Item = &'a i64>,
{
    let range = config.key_range();
    let (len, drawable) = keys.into_iter().fold((0, 0), |(len, drawable), key| {
        (len + 1, drawable + usize::from(range.contains(key)))
    });
    let free = config.capacity().saturating_sub(len);
    let unused = config.key_space().saturating_sub(drawable);
    if unused < count.min(free) {
        tracing::warn!(count, free, unused, "key space limits random fill");
    }
    count.min(free).min(unused)
}
