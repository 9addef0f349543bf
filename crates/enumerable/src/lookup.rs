//! Groupings and lookups.
//!
//! A [`Lookup`] is an ordered multimap: each distinct key maps to a
//! [`Grouping`] holding every value produced for that key. Groupings appear in
//! the order their key was first seen and values keep their encounter order.
//! It is the backbone of `group_by`, `join`, `group_join` and `to_lookup`.
//!
//! ```
//! use enumerable::Query;
//!
//! let lookup = Query::from_vec(vec!["apple", "avocado", "banana", "blueberry", "cherry"])
//!     .to_lookup(|s| s.chars().next().unwrap())
//!     .unwrap();
//!
//! assert_eq!(lookup.len(), 3);
//! assert_eq!(lookup.values(&'b'), &["banana", "blueberry"]);
//! assert!(lookup.values(&'z').is_empty());
//! ```

use crate::enumerator::{Enumerator, IntoEnumerator};
use crate::error::Result;
use crate::index::{HashedIndex, KeyIndex};
use crate::source::IterEnumerator;

/// A key and the values that share it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Grouping<K, V> {
    key: K,
    values: Vec<V>,
}

impl<K, V> Grouping<K, V> {
    /// Creates a grouping.
    pub fn new(key: K, values: Vec<V>) -> Self {
        Grouping { key, values }
    }

    /// Returns the key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the values in encounter order.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the grouping has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates the values.
    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.values.iter()
    }

    /// Splits the grouping into its key and values.
    pub fn into_parts(self) -> (K, Vec<V>) {
        (self.key, self.values)
    }

    /// Returns the values, dropping the key.
    pub fn into_values(self) -> Vec<V> {
        self.values
    }
}

impl<K, V> IntoEnumerator for Grouping<K, V> {
    type Item = V;
    type IntoEnum = IterEnumerator<std::vec::IntoIter<V>>;

    fn into_enumerator(self) -> Self::IntoEnum {
        IterEnumerator::new(self.values)
    }
}

impl<'a, K, V> IntoIterator for &'a Grouping<K, V> {
    type Item = &'a V;
    type IntoIter = std::slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// An ordered, key-indexed collection of [`Grouping`]s.
///
/// Built once by a buffering operator and immutable afterwards. The key
/// index `I` decides key equivalence; see [`KeyIndex`].
#[derive(Debug, Clone)]
pub struct Lookup<K, V, I = HashedIndex> {
    groups: Vec<Grouping<K, V>>,
    index: I,
}

impl<K, V, I: KeyIndex<K>> Lookup<K, V, I> {
    pub(crate) fn with_index(index: I) -> Self {
        Lookup {
            groups: Vec::new(),
            index,
        }
    }

    /// Drains `source` completely, bucketing each element by its key.
    pub(crate) fn build<E, KF, VF>(
        mut source: E,
        mut key: KF,
        mut value: VF,
        index: I,
    ) -> Result<Self>
    where
        E: Enumerator,
        KF: FnMut(&E::Item) -> K,
        VF: FnMut(E::Item) -> V,
    {
        let mut lookup = Lookup::with_index(index);
        let mut seen = 0usize;
        while let Some(item) = source.try_next()? {
            let k = key(&item);
            lookup.push(k, value(item));
            seen += 1;
        }
        tracing::trace!(elements = seen, groups = lookup.len(), "materialized lookup");
        Ok(lookup)
    }

    pub(crate) fn push(&mut self, key: K, value: V) {
        match self.index.position(&self.groups, Grouping::key, &key) {
            Some(at) => self.groups[at].values.push(value),
            None => {
                self.groups.push(Grouping::new(key, vec![value]));
                self.index
                    .record(&self.groups, Grouping::key, self.groups.len() - 1);
            }
        }
    }

    /// Returns the number of groupings (distinct keys).
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if there are no groupings.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns `true` if a grouping exists for `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    /// Returns the grouping for `key`.
    pub fn get(&self, key: &K) -> Option<&Grouping<K, V>> {
        self.position(key).map(|at| &self.groups[at])
    }

    /// Returns the values for `key`, or an empty slice if the key is absent.
    pub fn values(&self, key: &K) -> &[V] {
        self.get(key).map(Grouping::values).unwrap_or(&[])
    }

    /// Iterates the keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.groups.iter().map(Grouping::key)
    }

    /// Iterates the groupings in first-seen key order.
    pub fn iter(&self) -> std::slice::Iter<'_, Grouping<K, V>> {
        self.groups.iter()
    }

    /// Returns the groupings in first-seen key order.
    pub fn groupings(&self) -> &[Grouping<K, V>] {
        &self.groups
    }

    pub(crate) fn position(&self, key: &K) -> Option<usize> {
        self.index.position(&self.groups, Grouping::key, key)
    }
}

impl<K, V, I> IntoIterator for Lookup<K, V, I> {
    type Item = Grouping<K, V>;
    type IntoIter = std::vec::IntoIter<Grouping<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl<'a, K, V, I> IntoIterator for &'a Lookup<K, V, I> {
    type Item = &'a Grouping<K, V>;
    type IntoIter = std::slice::Iter<'a, Grouping<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

impl<K, V, I> IntoEnumerator for Lookup<K, V, I> {
    type Item = Grouping<K, V>;
    type IntoEnum = IterEnumerator<std::vec::IntoIter<Grouping<K, V>>>;

    fn into_enumerator(self) -> Self::IntoEnum {
        IterEnumerator::new(self.groups)
    }
}

#[cfg(feature = "serde")]
impl<K: serde::Serialize, V: serde::Serialize, I> serde::Serialize for Lookup<K, V, I> {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::CaseInsensitive;
    use crate::index::{ScanIndex, SortedIndex};

    fn lookup_of(words: &[&'static str]) -> Lookup<usize, &'static str> {
        let mut lookup = Lookup::with_index(HashedIndex::new());
        for word in words {
            lookup.push(word.len(), *word);
        }
        lookup
    }

    #[test]
    fn groups_in_first_seen_order() {
        let lookup = lookup_of(&["one", "three", "two", "four", "six", "seven"]);
        let keys: Vec<usize> = lookup.keys().copied().collect();
        assert_eq!(keys, vec![3, 5, 4]);
        assert_eq!(lookup.values(&3), &["one", "two", "six"]);
        assert_eq!(lookup.values(&5), &["three", "seven"]);
    }

    #[test]
    fn absent_key() {
        let lookup = lookup_of(&["a"]);
        assert!(!lookup.contains(&7));
        assert!(lookup.get(&7).is_none());
        assert!(lookup.values(&7).is_empty());
    }

    #[test]
    fn equaler_keyed() {
        let mut lookup = Lookup::with_index(ScanIndex::new(CaseInsensitive));
        lookup.push("Red".to_string(), 1);
        lookup.push("RED".to_string(), 2);
        lookup.push("blue".to_string(), 3);

        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup.values(&"red".to_string()), &[1, 2]);
        assert_eq!(lookup.groupings()[0].key(), "Red");
    }

    #[test]
    fn comparer_keyed() {
        let mut lookup = Lookup::with_index(SortedIndex::new(|a: &i32, b: &i32| {
            (a / 10).cmp(&(b / 10))
        }));
        for n in [31, 12, 35, 17, 5] {
            lookup.push(n, n);
        }
        let groups: Vec<(i32, Vec<i32>)> = lookup
            .into_iter()
            .map(|g| g.into_parts())
            .collect();
        assert_eq!(groups, vec![(31, vec![31, 35]), (12, vec![12, 17]), (5, vec![5])]);
    }

    #[test]
    fn build_from_enumerator() {
        let lookup = Lookup::build(
            vec![1, 2, 3, 4, 5].into_enumerator(),
            |n| n % 2 == 0,
            |n| n * 10,
            HashedIndex::new(),
        )
        .unwrap();

        assert_eq!(lookup.values(&false), &[10, 30, 50]);
        assert_eq!(lookup.values(&true), &[20, 40]);
    }

    #[test]
    fn grouping_accessors() {
        let g = Grouping::new('k', vec![1, 2]);
        assert_eq!(g.key(), &'k');
        assert_eq!(g.len(), 2);
        assert!(!g.is_empty());
        assert_eq!(g.iter().sum::<i32>(), 3);
        assert_eq!(g.into_values(), vec![1, 2]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_groupings() {
        let lookup = lookup_of(&["ab", "c", "de"]);
        let json = serde_json::to_value(&lookup).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"key": 2, "values": ["ab", "de"]},
                {"key": 1, "values": ["c"]},
            ])
        );
    }
}
