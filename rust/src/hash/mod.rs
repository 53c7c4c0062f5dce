//! Fixed-size hash table with pluggable hash functions and collision
//! strategies.
//!
//! Open-addressing strategies (`secuencial`, `doble`, `cuadrado`) store one
//! key per slot and leave tombstones behind on delete. Bucket strategies
//! (`anidados`, `encadenamiento`) store any number of keys per slot and never
//! report the table full.

pub mod functions;
pub mod table;

use rand::Rng;

use crate::error::{InitResult, ModifyResult, StructureError, StructureResultExt};
use crate::validation::{
    fill_random, random_target, Candidate, StructureConfig, RANDOM_ATTEMPTS_PER_KEY,
};

pub use functions::{CollisionStrategy, HashFunction};
pub use table::{Chain, Slot, Table};

/// Where an insert placed its key and what it ran into on the way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Slot that now holds the key.
    pub index: usize,
    /// First slot found occupied on the way, if any.
    pub first_collision: Option<usize>,
    /// Slots probed, or for bucket strategies the key's position in its
    /// bucket plus one.
    pub attempts: usize,
}

/// Hash table over integer keys of a fixed digit length.
///
/// # Examples
///
/// ```
/// use search_structures::{CollisionStrategy, HashFunction, HashStructure, StructureConfig};
///
/// let config = StructureConfig::new(10, 2).unwrap();
/// let mut hash = HashStructure::new(config, HashFunction::Modular, CollisionStrategy::Quadratic);
///
/// let first = hash.insert(23).unwrap();
/// assert_eq!(first.index, 3);
/// assert_eq!(first.first_collision, None);
///
/// // 33 collides at 3 and lands on 3 + 1²
/// let second = hash.insert(33).unwrap();
/// assert_eq!((second.index, second.first_collision, second.attempts), (4, Some(3), 2));
/// assert_eq!(hash.find(33), Some(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashStructure {
    config: StructureConfig,
    function: HashFunction,
    strategy: CollisionStrategy,
    table: Table,
}

impl HashStructure {
    /// Create an empty table with `config.capacity()` slots.
    pub fn new(config: StructureConfig, function: HashFunction, strategy: CollisionStrategy) -> Self {
        Self {
            config,
            function,
            strategy,
            table: Table::new(strategy, config.capacity()),
        }
    }

    /// Adopt an existing table after checking it against every invariant:
    /// family matches the strategy, slot count equals capacity, keys have the
    /// right length and are unique, bucket keys sit in their home slot.
    pub fn with_table(
        config: StructureConfig,
        function: HashFunction,
        strategy: CollisionStrategy,
        table: Table,
    ) -> InitResult<Self> {
        let family_matches = match table {
            Table::Probing(_) => strategy.is_probing(),
            Table::Nested(_) => strategy == CollisionStrategy::Nested,
            Table::Chained(_) => strategy == CollisionStrategy::Chaining,
        };
        if !family_matches {
            return Err(StructureError::invalid_document(
                "datos",
                &format!("slot layout does not match collision strategy '{}'", strategy),
            ));
        }
        if table.slot_count() != config.capacity() {
            return Err(StructureError::invalid_document(
                "datos",
                &format!(
                    "{} slots but capacity is {}",
                    table.slot_count(),
                    config.capacity()
                ),
            ));
        }
        config.check_keys(&table.keys())?;
        if !strategy.is_probing() {
            for slot in 0..table.slot_count() {
                if let Some(key) = table
                    .keys_at(slot)
                    .into_iter()
                    .find(|&key| function.apply(key, config.capacity()) != slot)
                {
                    return Err(StructureError::invalid_document(
                        &format!("datos[{}]", slot),
                        &format!("key {} does not hash to this slot", key),
                    ));
                }
            }
        }
        Ok(Self {
            config,
            function,
            strategy,
            table,
        })
    }

    pub fn config(&self) -> &StructureConfig {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity()
    }

    pub fn key_length(&self) -> usize {
        self.config.key_length()
    }

    pub fn function(&self) -> HashFunction {
        self.function
    }

    pub fn strategy(&self) -> CollisionStrategy {
        self.strategy
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Number of stored keys. Tombstones do not count.
    pub fn size(&self) -> usize {
        self.table.key_count()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Open-addressing tables are full at `capacity` keys; bucket tables never are.
    pub fn is_full(&self) -> bool {
        self.strategy.is_probing() && self.size() >= self.capacity()
    }

    pub fn load_factor(&self) -> f64 {
        self.size() as f64 / self.capacity() as f64
    }

    /// Every stored key, slot by slot.
    pub fn keys(&self) -> Vec<i64> {
        self.table.keys()
    }

    /// Home slot of `value` before any collision handling.
    pub fn hash_of(&self, value: i64) -> usize {
        self.function.apply(value, self.capacity())
    }

    /// Slot holding `value`, or `None`.
    ///
    /// Probing stops at the first empty slot, skips tombstones, and gives up
    /// after `capacity` attempts or when a sequential probe runs off the end.
    pub fn find(&self, value: i64) -> Option<usize> {
        if !self.config.accepts(value) {
            return None;
        }
        let home = self.hash_of(value);
        match &self.table {
            Table::Probing(slots) => {
                for attempt in 0..self.capacity() {
                    let index = self.strategy.probe(home, attempt, self.capacity());
                    match slots.get(index) {
                        None => {
                            tracing::trace!(value, index, "probe ran past the table");
                            return None;
                        }
                        Some(Slot::Empty) => return None,
                        Some(Slot::Occupied(key)) if *key == value => return Some(index),
                        Some(_) => {}
                    }
                }
                None
            }
            Table::Nested(buckets) => buckets[home].contains(&value).then_some(home),
            Table::Chained(chains) => chains[home].contains(value).then_some(home),
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        self.find(value).is_some()
    }

    /// Store `value` and report where it went.
    ///
    /// # Errors
    ///
    /// [`StructureError::Full`] when an open-addressing table holds `capacity`
    /// keys, [`StructureError::InvalidKey`], [`StructureError::DuplicateKey`],
    /// [`StructureError::TableFull`] when `capacity` probes found no free slot,
    /// and [`StructureError::ProbeOutOfBounds`] when a sequential probe walks
    /// past the last slot. The table is unchanged on error.
    pub fn insert(&mut self, value: i64) -> ModifyResult<InsertOutcome> {
        if self.is_full() {
            return Err(StructureError::Full(self.capacity()));
        }
        self.config.check_key(value)?;
        if self.contains(value) {
            return Err(StructureError::DuplicateKey(value));
        }
        let capacity = self.capacity();
        let home = self.hash_of(value);
        let outcome = match &mut self.table {
            Table::Probing(slots) => {
                let mut first_collision = None;
                let mut placed = None;
                for attempt in 0..capacity {
                    let index = self.strategy.probe(home, attempt, capacity);
                    let slot = slots.get_mut(index).ok_or(StructureError::ProbeOutOfBounds {
                        key: value,
                        index,
                        capacity,
                    })?;
                    tracing::trace!(value, index, attempt, ?slot, "probe");
                    if slot.is_free() {
                        *slot = Slot::Occupied(value);
                        placed = Some(InsertOutcome {
                            index,
                            first_collision,
                            attempts: attempt + 1,
                        });
                        break;
                    }
                    first_collision.get_or_insert(index);
                }
                placed.ok_or(StructureError::TableFull {
                    key: value,
                    attempts: capacity,
                })?
            }
            Table::Nested(buckets) => {
                let bucket = &mut buckets[home];
                let first_collision = (!bucket.is_empty()).then_some(home);
                bucket.push(value);
                InsertOutcome {
                    index: home,
                    first_collision,
                    attempts: bucket.len(),
                }
            }
            Table::Chained(chains) => {
                let chain = &mut chains[home];
                let first_collision = (!chain.is_empty()).then_some(home);
                let position = chain.push_back(value);
                InsertOutcome {
                    index: home,
                    first_collision,
                    attempts: position + 1,
                }
            }
        };
        tracing::debug!(
            value,
            index = outcome.index,
            attempts = outcome.attempts,
            strategy = %self.strategy,
            "hash insert"
        );
        Ok(outcome)
    }

    /// Remove `value` and return the slot it occupied. Open-addressing
    /// tables leave a tombstone; bucket tables unlink the key.
    pub fn delete(&mut self, value: i64) -> ModifyResult<usize> {
        let index = self.find(value).ok_or(StructureError::KeyNotFound(value))?;
        match &mut self.table {
            Table::Probing(slots) => slots[index] = Slot::Tombstone,
            Table::Nested(buckets) => buckets[index].retain(|&key| key != value),
            Table::Chained(chains) => {
                chains[index].remove(value);
            }
        }
        tracing::debug!(value, index, "hash delete");
        Ok(index)
    }

    pub fn generate_random(&mut self, count: usize) -> usize {
        self.generate_random_with(&mut rand::thread_rng(), count)
    }

    /// Insert up to `count` distinct random keys, bounded by the free
    /// capacity. Candidates the table cannot place are skipped; open
    /// addressing gives up after [`RANDOM_ATTEMPTS_PER_KEY`] draws per key.
    pub fn generate_random_with<R: Rng>(&mut self, rng: &mut R, count: usize) -> usize {
        let target = random_target(&self.config, &self.keys(), count);
        let budget = self
            .strategy
            .is_probing()
            .then(|| target.saturating_mul(RANDOM_ATTEMPTS_PER_KEY));
        let config = self.config;
        let added = fill_random(rng, &config, target, budget, |key| {
            if self.contains(key) {
                return Candidate::Rejected;
            }
            match self.insert(key) {
                Ok(_) => Candidate::Added,
                Err(err) => {
                    tracing::trace!(key, %err, "random key rejected");
                    Candidate::Rejected
                }
            }
        });
        tracing::debug!(requested = count, added, "hash random fill");
        added
    }

    pub(crate) fn from_parts(
        capacity: i64,
        key_length: i64,
        function: HashFunction,
        strategy: CollisionStrategy,
        table: Table,
    ) -> InitResult<Self> {
        let config = StructureConfig::from_raw(capacity, key_length)?;
        Self::with_table(config, function, strategy, table).with_context("hash")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn table(
        capacity: usize,
        key_length: usize,
        function: HashFunction,
        strategy: CollisionStrategy,
    ) -> HashStructure {
        HashStructure::new(
            StructureConfig::new(capacity, key_length).unwrap(),
            function,
            strategy,
        )
    }

    #[test]
    fn test_linear_probing_records_first_collision() {
        let mut hash = table(10, 2, HashFunction::Modular, CollisionStrategy::Linear);
        assert_eq!(hash.insert(12).unwrap().index, 2);
        hash.insert(13).unwrap();
        let outcome = hash.insert(22).unwrap();
        assert_eq!(outcome.index, 4);
        assert_eq!(outcome.first_collision, Some(2));
        assert_eq!(outcome.attempts, 3);
        assert_eq!(hash.find(22), Some(4));
    }

    #[test]
    fn test_double_step_wraps() {
        let mut hash = table(10, 2, HashFunction::Modular, CollisionStrategy::DoubleStep);
        hash.insert(18).unwrap();
        let outcome = hash.insert(28).unwrap();
        assert_eq!(outcome.index, 0);
        assert_eq!(outcome.first_collision, Some(8));
    }

    #[test]
    fn test_double_step_on_even_capacity_reaches_half_the_slots() {
        let mut hash = table(10, 2, HashFunction::Modular, CollisionStrategy::DoubleStep);
        for key in [10, 12, 14, 16, 18] {
            hash.insert(key).unwrap();
        }
        assert!(matches!(
            hash.insert(20),
            Err(StructureError::TableFull { key: 20, attempts: 10 })
        ));
        assert_eq!(hash.size(), 5);
    }

    #[test]
    fn test_sequential_probe_runs_off_the_end() {
        let mut hash = table(10, 2, HashFunction::Modular, CollisionStrategy::Linear);
        hash.insert(19).unwrap();
        let err = hash.insert(29).unwrap_err();
        assert!(matches!(
            err,
            StructureError::ProbeOutOfBounds { key: 29, index: 10, capacity: 10 }
        ));
        assert_eq!(hash.find(29), None);
        assert_eq!(hash.size(), 1);
    }

    #[test]
    fn test_tombstone_keeps_probe_chain() {
        let mut hash = table(10, 2, HashFunction::Modular, CollisionStrategy::Linear);
        hash.insert(11).unwrap();
        hash.insert(21).unwrap();
        assert_eq!(hash.delete(11).unwrap(), 1);
        assert_eq!(hash.table().keys_at(1), Vec::<i64>::new());
        assert!(matches!(hash.table(), Table::Probing(slots) if slots[1] == Slot::Tombstone));
        assert_eq!(hash.find(21), Some(2));
        // the tombstone is reused
        assert_eq!(hash.insert(31).unwrap().index, 1);
        assert!(matches!(hash.delete(11), Err(StructureError::KeyNotFound(11))));
    }

    #[test]
    fn test_probing_full_table() {
        let mut hash = table(10, 1, HashFunction::Modular, CollisionStrategy::Quadratic);
        for key in 0..10 {
            hash.insert(key).unwrap();
        }
        assert!(hash.is_full());
        assert!(matches!(hash.insert(5), Err(StructureError::Full(10))));
    }

    #[test]
    fn test_nested_buckets_grow_past_capacity() {
        let mut hash = table(1, 2, HashFunction::Modular, CollisionStrategy::Nested);
        let first = hash.insert(10).unwrap();
        assert_eq!(first.first_collision, None);
        let second = hash.insert(20).unwrap();
        assert_eq!((second.index, second.first_collision, second.attempts), (0, Some(0), 2));
        hash.insert(30).unwrap();
        assert_eq!(hash.size(), 3);
        assert!(!hash.is_full());
        assert_eq!(hash.delete(20).unwrap(), 0);
        assert_eq!(hash.table().keys_at(0), vec![10, 30]);
    }

    #[test]
    fn test_chaining_preserves_insertion_order() {
        let mut hash = table(10, 2, HashFunction::Modular, CollisionStrategy::Chaining);
        for key in [15, 25, 35, 16] {
            hash.insert(key).unwrap();
        }
        assert_eq!(hash.table().keys_at(5), vec![15, 25, 35]);
        assert_eq!(hash.find(35), Some(5));
        hash.delete(25).unwrap();
        assert_eq!(hash.table().keys_at(5), vec![15, 35]);
        assert_eq!(hash.find(25), None);
        assert!(matches!(hash.insert(15), Err(StructureError::DuplicateKey(15))));
    }

    #[test]
    fn test_find_rejects_wrong_length() {
        let mut hash = table(10, 2, HashFunction::Modular, CollisionStrategy::Linear);
        hash.insert(10).unwrap();
        assert_eq!(hash.find(100), None);
        assert!(matches!(hash.insert(100), Err(StructureError::InvalidKey(_))));
    }

    #[test]
    fn test_generate_random_terminates_near_full_load() {
        let mut rng = StdRng::seed_from_u64(11);
        for strategy in [
            CollisionStrategy::Linear,
            CollisionStrategy::DoubleStep,
            CollisionStrategy::Quadratic,
        ] {
            let mut hash = table(100, 4, HashFunction::MidSquare, strategy);
            let added = hash.generate_random_with(&mut rng, 500);
            assert!(added <= 100);
            assert_eq!(hash.size(), added);
        }
    }

    #[test]
    fn test_generate_random_chaining_fills_to_capacity() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut hash = table(10, 3, HashFunction::Folding, CollisionStrategy::Chaining);
        assert_eq!(hash.generate_random_with(&mut rng, 25), 10);
        assert_eq!(hash.size(), 10);
        for key in hash.keys() {
            assert_eq!(hash.find(key), Some(hash.hash_of(key)));
        }
    }

    #[test]
    fn test_with_table_rejects_misplaced_bucket_key() {
        let config = StructureConfig::new(10, 2).unwrap();
        let mut buckets = vec![Vec::new(); 10];
        buckets[3].push(14);
        let result = HashStructure::with_table(
            config,
            HashFunction::Modular,
            CollisionStrategy::Nested,
            Table::Nested(buckets),
        );
        assert!(matches!(result, Err(StructureError::InvalidDocument(_))));
    }

    #[test]
    fn test_with_table_rejects_wrong_family() {
        let config = StructureConfig::new(10, 2).unwrap();
        let result = HashStructure::with_table(
            config,
            HashFunction::Modular,
            CollisionStrategy::Chaining,
            Table::Probing(vec![Slot::Empty; 10]),
        );
        assert!(result.is_err());
    }
}
