//! Key indexes.
//!
//! Buffering operators remember keys they have seen: `distinct` and the set
//! operations keep a seen-set, `group_by` and `join` keep a [`Lookup`]. How a
//! key is located among the stored ones is decided by a [`KeyIndex`]:
//!
//! | Index | Lookup cost | Requirement |
//! |-------|-------------|-------------|
//! | [`HashedIndex`] | O(1) average | `K: Hash + Eq` |
//! | [`ScanIndex`] | O(n) | any [`Equaler`] |
//! | [`SortedIndex`] | O(log n) | any [`Comparer`] |
//!
//! An index does not own the keys. It stores positions into a slot vector
//! owned by the caller and reads keys back through a projection.
//!
//! [`Lookup`]: crate::Lookup

use std::hash::{BuildHasher, Hash};

use ahash::{HashMap, HashMapExt, RandomState};

use crate::compare::{Comparer, Equaler};

/// Locates keys among a caller-owned vector of slots.
pub trait KeyIndex<K> {
    /// Returns the position of the slot whose key matches `key`.
    fn position<S>(&self, slots: &[S], key_of: fn(&S) -> &K, key: &K) -> Option<usize>;

    /// Records the slot at `position`, which the caller has just pushed.
    fn record<S>(&mut self, slots: &[S], key_of: fn(&S) -> &K, position: usize);
}

/// Hash-bucketed index for `Hash + Eq` keys. The default.
#[derive(Debug, Clone, Default)]
pub struct HashedIndex {
    state: RandomState,
    buckets: HashMap<u64, Vec<usize>>,
}

impl HashedIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        HashedIndex {
            state: RandomState::new(),
            buckets: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq> KeyIndex<K> for HashedIndex {
    fn position<S>(&self, slots: &[S], key_of: fn(&S) -> &K, key: &K) -> Option<usize> {
        let hash = BuildHasher::hash_one(&self.state, key);
        self.buckets
            .get(&hash)?
            .iter()
            .copied()
            .find(|&i| key_of(&slots[i]) == key)
    }

    fn record<S>(&mut self, slots: &[S], key_of: fn(&S) -> &K, position: usize) {
        let hash = BuildHasher::hash_one(&self.state, key_of(&slots[position]));
        self.buckets.entry(hash).or_default().push(position);
    }
}

/// Linear-scan index driven by an [`Equaler`].
#[derive(Debug, Clone, Default)]
pub struct ScanIndex<Q> {
    equaler: Q,
}

impl<Q> ScanIndex<Q> {
    /// Creates an index comparing keys with `equaler`.
    pub fn new(equaler: Q) -> Self {
        ScanIndex { equaler }
    }
}

impl<K, Q: Equaler<K>> KeyIndex<K> for ScanIndex<Q> {
    fn position<S>(&self, slots: &[S], key_of: fn(&S) -> &K, key: &K) -> Option<usize> {
        slots
            .iter()
            .position(|slot| self.equaler.equal(key_of(slot), key))
    }

    fn record<S>(&mut self, _slots: &[S], _key_of: fn(&S) -> &K, _position: usize) {}
}

/// Binary-search index driven by a [`Comparer`].
///
/// Keeps slot positions sorted by key; keys the comparer ranks `Equal` are
/// the same key.
#[derive(Debug, Clone, Default)]
pub struct SortedIndex<C> {
    comparer: C,
    order: Vec<usize>,
}

impl<C> SortedIndex<C> {
    /// Creates an index ordering keys with `comparer`.
    pub fn new(comparer: C) -> Self {
        SortedIndex {
            comparer,
            order: Vec::new(),
        }
    }
}

impl<K, C: Comparer<K>> KeyIndex<K> for SortedIndex<C> {
    fn position<S>(&self, slots: &[S], key_of: fn(&S) -> &K, key: &K) -> Option<usize> {
        self.order
            .binary_search_by(|&i| self.comparer.compare(key_of(&slots[i]), key))
            .ok()
            .map(|at| self.order[at])
    }

    fn record<S>(&mut self, slots: &[S], key_of: fn(&S) -> &K, position: usize) {
        let key = key_of(&slots[position]);
        let at = match self
            .order
            .binary_search_by(|&i| self.comparer.compare(key_of(&slots[i]), key))
        {
            Ok(at) | Err(at) => at,
        };
        self.order.insert(at, position);
    }
}

fn identity<K>(key: &K) -> &K {
    key
}

/// A set of keys in first-inserted order.
#[derive(Debug, Clone)]
pub struct KeySet<K, I> {
    keys: Vec<K>,
    index: I,
}

impl<K, I: KeyIndex<K>> KeySet<K, I> {
    /// Creates an empty set locating keys through `index`.
    pub fn new(index: I) -> Self {
        KeySet {
            keys: Vec::new(),
            index,
        }
    }

    /// Returns the insertion position of `key`, if present.
    pub fn position(&self, key: &K) -> Option<usize> {
        self.index.position(&self.keys, identity, key)
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    /// Adds `key`. Returns `false` if an equivalent key was already present.
    pub fn insert(&mut self, key: K) -> bool {
        if self.contains(&key) {
            return false;
        }
        self.keys.push(key);
        self.index.record(&self.keys, identity, self.keys.len() - 1);
        true
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the keys in insertion order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{CaseInsensitive, NaturalOrder};

    #[test]
    fn hashed_set() {
        let mut set = KeySet::new(HashedIndex::new());
        assert!(set.insert("a"));
        assert!(set.insert("b"));
        assert!(!set.insert("a"));
        assert_eq!(set.position(&"b"), Some(1));
        assert_eq!(set.keys(), &["a", "b"]);
    }

    #[test]
    fn scan_set_uses_equaler() {
        let mut set = KeySet::new(ScanIndex::new(CaseInsensitive));
        assert!(set.insert("Apple".to_string()));
        assert!(!set.insert("APPLE".to_string()));
        assert!(set.contains(&"apple".to_string()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn sorted_set_keeps_insertion_positions() {
        let mut set = KeySet::new(SortedIndex::new(NaturalOrder));
        for key in [5, 1, 9, 1, 3, 9] {
            set.insert(key);
        }
        assert_eq!(set.keys(), &[5, 1, 9, 3]);
        assert_eq!(set.position(&3), Some(3));
        assert_eq!(set.position(&9), Some(2));
        assert_eq!(set.position(&4), None);
    }

    #[test]
    fn sorted_set_with_custom_comparer() {
        let by_tens = |a: &i32, b: &i32| (a / 10).cmp(&(b / 10));
        let mut set = KeySet::new(SortedIndex::new(by_tens));
        assert!(set.insert(12));
        assert!(!set.insert(19));
        assert!(set.insert(21));
        assert!(set.contains(&25));
    }
}
