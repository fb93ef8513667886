//! Sharded key/value accumulator for parallel score aggregation.
//!
//! Keys are routed to one of `S` shards by a fixed hash, and every shard is
//! an independently locked ordered map. Workers adding to keys in different
//! shards never contend; keys sharing a shard serialize on its lock.
//!
//! A handle returned by [`ShardedAccumulator::access`] keeps its shard locked
//! until dropped, so a worker must never hold two handles at once.

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use rustc_hash::FxBuildHasher;
use std::collections::BTreeMap;
use std::hash::{BuildHasher, Hash};

/// Exclusive handle on one accumulator entry. Releases the shard on drop.
pub type Access<'a, V> = MappedMutexGuard<'a, V>;

pub struct ShardedAccumulator<K, V, S = FxBuildHasher> {
    shards: Vec<Mutex<BTreeMap<K, V>>>,
    hasher: S,
}

impl<K, V> ShardedAccumulator<K, V>
where
    K: Ord + Hash,
    V: Default,
{
    /// `shard_count` of 0 is treated as 1.
    pub fn new(shard_count: usize) -> Self {
        Self::with_hasher(shard_count, FxBuildHasher)
    }
}

impl<K, V, S> ShardedAccumulator<K, V, S>
where
    K: Ord + Hash,
    V: Default,
    S: BuildHasher,
{
    pub fn with_hasher(shard_count: usize, hasher: S) -> Self {
        let shards = (0..shard_count.max(1)).map(|_| Mutex::new(BTreeMap::new())).collect();
        Self { shards, hasher }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard_of(&self, key: &K) -> usize {
        (self.hasher.hash_one(key) % self.shards.len() as u64) as usize
    }

    /// Lock the key's shard and return its entry, inserting `V::default()`
    /// when the key is new.
    pub fn access(&self, key: K) -> Access<'_, V> {
        let shard = self.shard_of(&key);
        MutexGuard::map(self.shards[shard].lock(), |map| map.entry(key).or_default())
    }

    /// Merge all shards into one map, locking shards one at a time in
    /// increasing index order. The result is a point-in-time snapshot;
    /// writes racing with the merge may or may not be included.
    pub fn build_ordinary_map(&self) -> BTreeMap<K, V>
    where
        K: Clone,
        V: Clone,
    {
        let mut merged = BTreeMap::new();
        for shard in &self.shards {
            let map = shard.lock();
            merged.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged
    }

    /// Consume the accumulator and merge without locking.
    pub fn into_ordinary_map(self) -> BTreeMap<K, V> {
        self.shards.into_iter().flat_map(Mutex::into_inner).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn zero_shards_clamped() {
        let acc: ShardedAccumulator<i32, f64> = ShardedAccumulator::new(0);
        assert_eq!(acc.shard_count(), 1);
        *acc.access(4) += 1.5;
        assert_eq!(acc.build_ordinary_map().get(&4), Some(&1.5));
    }

    #[test]
    fn access_creates_default_entry() {
        let acc: ShardedAccumulator<i32, i64> = ShardedAccumulator::new(4);
        {
            let entry = acc.access(9);
            assert_eq!(*entry, 0);
        }
        assert_eq!(acc.build_ordinary_map().into_iter().collect::<Vec<_>>(), vec![(9, 0)]);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let acc: ShardedAccumulator<i32, u64> = ShardedAccumulator::new(3);
        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for round in 0..500 {
                        for key in 0..20 {
                            *acc.access(key) += 1;
                        }
                        if round % 100 == 0 {
                            let _ = acc.build_ordinary_map();
                        }
                    }
                });
            }
        });
        let merged = acc.into_ordinary_map();
        assert_eq!(merged.len(), 20);
        assert!(merged.values().all(|&v| v == 8 * 500));
    }

    #[test]
    fn merged_map_is_ordered() {
        let acc: ShardedAccumulator<i32, f64> = ShardedAccumulator::new(5);
        for key in [17, -3, 8, 0, 42, 5] {
            *acc.access(key) += f64::from(key);
        }
        let keys: Vec<i32> = acc.build_ordinary_map().into_keys().collect();
        assert_eq!(keys, vec![-3, 0, 5, 8, 17, 42]);
    }
}
