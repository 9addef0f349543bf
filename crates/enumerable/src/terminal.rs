//! Terminal operators.
//!
//! Terminal operators drive the pipeline and return a value. They consume the
//! query and read only as much of it as they need: `any`, `first`,
//! `element_at` and `contains` stop at the deciding element, `single` stops
//! at the second match, and `sequence_equal` stops at the first mismatch.
//! Everything else reads to the end.
//!
//! Cardinality failures come back as distinct [`Error`] kinds so callers can
//! tell them apart:
//!
//! ```
//! use enumerable::{Error, Query};
//!
//! let odd = |n: &i32| n % 2 == 1;
//!
//! assert_eq!(Query::from_vec(vec![2, 4]).single_pred(odd), Err(Error::NoMatch));
//! assert_eq!(Query::from_vec(vec![1, 3]).single_pred(odd), Err(Error::MultipleMatch));
//! assert_eq!(Query::from_vec(vec![2, 4]).single_or_default_pred(odd), Ok(0));
//! ```

use std::hash::Hash;
use std::iter::Sum;

use ahash::{HashMap, HashMapExt};
use num_traits::ToPrimitive;
use tracing::trace;

use crate::compare::{Comparer, Equaler, Lesser};
use crate::enumerator::{Enumerator, IntoEnumerator};
use crate::error::{Error, Result};
use crate::index::{HashedIndex, ScanIndex};
use crate::lookup::Lookup;
use crate::pipeline::drain_all;
use crate::query::Query;

/// Keeps the first element for which `replaces(candidate, best)` never held.
fn pick<E, F>(mut source: E, mut replaces: F) -> Result<E::Item>
where
    E: Enumerator,
    F: FnMut(&E::Item, &E::Item) -> bool,
{
    let mut best = source.try_next()?.ok_or(Error::NoElements)?;
    while let Some(item) = source.try_next()? {
        if replaces(&item, &best) {
            best = item;
        }
    }
    Ok(best)
}

/// Like [`pick`], comparing by a key computed once per element.
fn pick_by<E, K, KF, F>(mut source: E, mut key: KF, mut replaces: F) -> Result<E::Item>
where
    E: Enumerator,
    KF: FnMut(&E::Item) -> K,
    F: FnMut(&K, &K) -> bool,
{
    let first = source.try_next()?.ok_or(Error::NoElements)?;
    let mut best_key = key(&first);
    let mut best = first;
    while let Some(item) = source.try_next()? {
        let k = key(&item);
        if replaces(&k, &best_key) {
            best = item;
            best_key = k;
        }
    }
    Ok(best)
}

impl<E: Enumerator> Query<E> {
    // ========================================================================
    // Folding
    // ========================================================================

    /// Folds the sequence left to right, seeded with its first element.
    ///
    /// Fails with [`Error::NoElements`] on an empty sequence.
    pub fn aggregate<F>(self, mut f: F) -> Result<E::Item>
    where
        F: FnMut(E::Item, E::Item) -> E::Item,
    {
        let mut source = self.into_enumerator();
        let mut acc = source.try_next()?.ok_or(Error::NoElements)?;
        while let Some(item) = source.try_next()? {
            acc = f(acc, item);
        }
        Ok(acc)
    }

    /// Folds the sequence left to right from `seed`.
    pub fn aggregate_seed<A, F>(self, seed: A, mut f: F) -> Result<A>
    where
        F: FnMut(A, E::Item) -> A,
    {
        let mut source = self.into_enumerator();
        let mut acc = seed;
        while let Some(item) = source.try_next()? {
            acc = f(acc, item);
        }
        Ok(acc)
    }

    /// [`aggregate_seed`](Self::aggregate_seed), then maps the result.
    pub fn aggregate_seed_sel<A, R, F, S>(self, seed: A, f: F, selector: S) -> Result<R>
    where
        F: FnMut(A, E::Item) -> A,
        S: FnOnce(A) -> R,
    {
        self.aggregate_seed(seed, f).map(selector)
    }

    /// Calls `f` on every element.
    pub fn for_each<F>(self, mut f: F) -> Result<()>
    where
        F: FnMut(E::Item),
    {
        let mut source = self.into_enumerator();
        while let Some(item) = source.try_next()? {
            f(item);
        }
        Ok(())
    }

    // ========================================================================
    // Counting and quantifiers
    // ========================================================================

    /// Number of elements.
    pub fn count(self) -> Result<usize> {
        self.aggregate_seed(0, |n, _| n + 1)
    }

    /// Number of elements satisfying `predicate`.
    pub fn count_pred<P>(self, predicate: P) -> Result<usize>
    where
        P: FnMut(&E::Item) -> bool,
    {
        self.filter(predicate).count()
    }

    /// `true` if there is at least one element. Pulls at most one.
    pub fn any(self) -> Result<bool> {
        Ok(self.into_enumerator().try_next()?.is_some())
    }

    /// `true` if some element satisfies `predicate`.
    pub fn any_pred<P>(self, predicate: P) -> Result<bool>
    where
        P: FnMut(&E::Item) -> bool,
    {
        self.filter(predicate).any()
    }

    /// `true` if every element satisfies `predicate`; `true` when empty.
    pub fn all<P>(self, mut predicate: P) -> Result<bool>
    where
        P: FnMut(&E::Item) -> bool,
    {
        Ok(!self.any_pred(move |item| !predicate(item))?)
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    /// Sum of the elements; the type's zero when empty.
    ///
    /// Overflow behaves as the element type's `Sum` does.
    pub fn sum(self) -> Result<E::Item>
    where
        E::Item: Sum<E::Item>,
    {
        self.into_iter().sum()
    }

    /// Sum of `selector` over the elements.
    pub fn sum_sel<U, F>(self, selector: F) -> Result<U>
    where
        U: Sum<U>,
        F: FnMut(E::Item) -> U,
    {
        self.select(selector).sum()
    }

    /// Arithmetic mean as `f64`.
    ///
    /// Fails with [`Error::NoElements`] on an empty sequence, and with
    /// [`Error::InvalidCast`] for an element with no `f64` representation.
    pub fn average(self) -> Result<f64>
    where
        E::Item: ToPrimitive,
    {
        let mut source = self.into_enumerator();
        let mut total = 0f64;
        let mut count = 0usize;
        while let Some(item) = source.try_next()? {
            total += item.to_f64().ok_or_else(Error::cast::<E::Item, f64>)?;
            count += 1;
        }
        if count == 0 {
            return Err(Error::NoElements);
        }
        Ok(total / count as f64)
    }

    /// Mean of `selector` over the elements.
    pub fn average_sel<U, F>(self, selector: F) -> Result<f64>
    where
        U: ToPrimitive,
        F: FnMut(E::Item) -> U,
    {
        self.select(selector).average()
    }

    // ========================================================================
    // Extremes
    //
    // Ties keep the element seen first. Empty input is `Error::NoElements`.
    // ========================================================================

    /// Smallest element.
    pub fn min(self) -> Result<E::Item>
    where
        E::Item: Ord,
    {
        pick(self.into_enumerator(), |candidate, best| candidate < best)
    }

    /// Smallest value of `selector`.
    pub fn min_sel<U, F>(self, selector: F) -> Result<U>
    where
        U: Ord,
        F: FnMut(E::Item) -> U,
    {
        self.select(selector).min()
    }

    /// Element with the smallest key.
    pub fn min_by<K, KF>(self, key: KF) -> Result<E::Item>
    where
        K: Ord,
        KF: FnMut(&E::Item) -> K,
    {
        pick_by(self.into_enumerator(), key, |candidate, best| candidate < best)
    }

    /// Smallest element under a strict "less than".
    pub fn min_ls<L>(self, lesser: L) -> Result<E::Item>
    where
        L: Lesser<E::Item>,
    {
        pick(self.into_enumerator(), |candidate, best| lesser.less(candidate, best))
    }

    /// Smallest element under a comparer.
    pub fn min_cmp<C>(self, comparer: C) -> Result<E::Item>
    where
        C: Comparer<E::Item>,
    {
        pick(self.into_enumerator(), |candidate, best| comparer.compare(candidate, best).is_lt())
    }

    /// Largest element.
    pub fn max(self) -> Result<E::Item>
    where
        E::Item: Ord,
    {
        pick(self.into_enumerator(), |candidate, best| candidate > best)
    }

    /// Largest value of `selector`.
    pub fn max_sel<U, F>(self, selector: F) -> Result<U>
    where
        U: Ord,
        F: FnMut(E::Item) -> U,
    {
        self.select(selector).max()
    }

    /// Element with the largest key.
    pub fn max_by<K, KF>(self, key: KF) -> Result<E::Item>
    where
        K: Ord,
        KF: FnMut(&E::Item) -> K,
    {
        pick_by(self.into_enumerator(), key, |candidate, best| candidate > best)
    }

    /// Largest element under a strict "less than".
    pub fn max_ls<L>(self, lesser: L) -> Result<E::Item>
    where
        L: Lesser<E::Item>,
    {
        pick(self.into_enumerator(), |candidate, best| lesser.less(best, candidate))
    }

    /// Largest element under a comparer.
    pub fn max_cmp<C>(self, comparer: C) -> Result<E::Item>
    where
        C: Comparer<E::Item>,
    {
        pick(self.into_enumerator(), |candidate, best| comparer.compare(candidate, best).is_gt())
    }

    // ========================================================================
    // Element access
    // ========================================================================

    /// First element, or [`Error::NoElements`].
    pub fn first(self) -> Result<E::Item> {
        self.into_enumerator().try_next()?.ok_or(Error::NoElements)
    }

    /// First element satisfying `predicate`, or [`Error::NoMatch`].
    pub fn first_pred<P>(self, predicate: P) -> Result<E::Item>
    where
        P: FnMut(&E::Item) -> bool,
    {
        self.filter(predicate).into_enumerator().try_next()?.ok_or(Error::NoMatch)
    }

    /// First element, or `Default` when empty.
    pub fn first_or_default(self) -> Result<E::Item>
    where
        E::Item: Default,
    {
        Ok(self.into_enumerator().try_next()?.unwrap_or_default())
    }

    /// First element satisfying `predicate`, or `Default`.
    pub fn first_or_default_pred<P>(self, predicate: P) -> Result<E::Item>
    where
        E::Item: Default,
        P: FnMut(&E::Item) -> bool,
    {
        self.filter(predicate).first_or_default()
    }

    fn last_opt(self) -> Result<Option<E::Item>> {
        let mut source = self.into_enumerator();
        let mut last = None;
        while let Some(item) = source.try_next()? {
            last = Some(item);
        }
        Ok(last)
    }

    /// Last element, or [`Error::NoElements`].
    pub fn last(self) -> Result<E::Item> {
        self.last_opt()?.ok_or(Error::NoElements)
    }

    /// Last element satisfying `predicate`, or [`Error::NoMatch`].
    pub fn last_pred<P>(self, predicate: P) -> Result<E::Item>
    where
        P: FnMut(&E::Item) -> bool,
    {
        self.filter(predicate).last_opt()?.ok_or(Error::NoMatch)
    }

    /// Last element, or `Default` when empty.
    pub fn last_or_default(self) -> Result<E::Item>
    where
        E::Item: Default,
    {
        Ok(self.last_opt()?.unwrap_or_default())
    }

    /// Last element satisfying `predicate`, or `Default`.
    pub fn last_or_default_pred<P>(self, predicate: P) -> Result<E::Item>
    where
        E::Item: Default,
        P: FnMut(&E::Item) -> bool,
    {
        Ok(self.filter(predicate).last_opt()?.unwrap_or_default())
    }

    /// `Ok(None)` for no elements, `Ok(Some(x))` for exactly one, and
    /// `Err(many)` as soon as a second element shows up.
    fn single_opt(self, many: Error) -> Result<Option<E::Item>> {
        let mut source = self.into_enumerator();
        let Some(only) = source.try_next()? else {
            return Ok(None);
        };
        if source.try_next()?.is_some() {
            return Err(many);
        }
        Ok(Some(only))
    }

    /// The only element.
    ///
    /// Fails with [`Error::NoElements`] when empty and
    /// [`Error::MultipleElements`] when there is more than one.
    pub fn single(self) -> Result<E::Item> {
        self.single_opt(Error::MultipleElements)?.ok_or(Error::NoElements)
    }

    /// The only element satisfying `predicate`.
    ///
    /// Fails with [`Error::NoMatch`] or [`Error::MultipleMatch`].
    pub fn single_pred<P>(self, predicate: P) -> Result<E::Item>
    where
        P: FnMut(&E::Item) -> bool,
    {
        self.filter(predicate).single_opt(Error::MultipleMatch)?.ok_or(Error::NoMatch)
    }

    /// The only element, or `Default` when empty.
    ///
    /// More than one element is still [`Error::MultipleElements`].
    pub fn single_or_default(self) -> Result<E::Item>
    where
        E::Item: Default,
    {
        Ok(self.single_opt(Error::MultipleElements)?.unwrap_or_default())
    }

    /// The only element satisfying `predicate`, or `Default` when none does.
    ///
    /// More than one match is still [`Error::MultipleMatch`].
    pub fn single_or_default_pred<P>(self, predicate: P) -> Result<E::Item>
    where
        E::Item: Default,
        P: FnMut(&E::Item) -> bool,
    {
        Ok(self.filter(predicate).single_opt(Error::MultipleMatch)?.unwrap_or_default())
    }

    /// Element at zero-based `index`, or [`Error::IndexOutOfRange`].
    pub fn element_at(self, index: usize) -> Result<E::Item> {
        self.skip(index)
            .into_enumerator()
            .try_next()?
            .ok_or(Error::IndexOutOfRange { index })
    }

    /// Element at zero-based `index`, or `Default` past the end.
    pub fn element_at_or_default(self, index: usize) -> Result<E::Item>
    where
        E::Item: Default,
    {
        self.skip(index).first_or_default()
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    /// `true` if some element equals `value`.
    pub fn contains(self, value: &E::Item) -> Result<bool>
    where
        E::Item: PartialEq,
    {
        self.any_pred(|item| item == value)
    }

    /// `true` if some element is equivalent to `value` under `equaler`.
    pub fn contains_eq<Q>(self, value: &E::Item, equaler: Q) -> Result<bool>
    where
        Q: Equaler<E::Item>,
    {
        self.any_pred(|item| equaler.equal(item, value))
    }

    /// `true` if both sequences have equal elements in the same order.
    ///
    /// Both sides are owned, so each is its own pass even when they were
    /// cloned from the same query.
    pub fn sequence_equal<B>(self, other: B) -> Result<bool>
    where
        B: IntoEnumerator,
        E::Item: PartialEq<B::Item>,
    {
        self.sequence_equal_eq(other, |a: &E::Item, b: &B::Item| a == b)
    }

    /// [`sequence_equal`](Self::sequence_equal) with a custom equivalence.
    pub fn sequence_equal_eq<B, F>(self, other: B, mut equal: F) -> Result<bool>
    where
        B: IntoEnumerator,
        F: FnMut(&E::Item, &B::Item) -> bool,
    {
        let mut left = self.into_enumerator();
        let mut right = other.into_enumerator();
        loop {
            match (left.try_next()?, right.try_next()?) {
                (Some(a), Some(b)) => {
                    if !equal(&a, &b) {
                        return Ok(false);
                    }
                }
                (None, None) => return Ok(true),
                _ => return Ok(false),
            }
        }
    }

    // ========================================================================
    // Materialization
    // ========================================================================

    /// Collects every element.
    pub fn to_vec(self) -> Result<Vec<E::Item>> {
        drain_all(self.into_enumerator())
    }

    /// Groups every element by key into a [`Lookup`]. Keys may repeat.
    pub fn to_lookup<K, KF>(self, key: KF) -> Result<Lookup<K, E::Item>>
    where
        K: Hash + Eq,
        KF: FnMut(&E::Item) -> K,
    {
        Lookup::build(self.into_enumerator(), key, |item| item, HashedIndex::new())
    }

    /// [`to_lookup`](Self::to_lookup), storing `value(item)`.
    pub fn to_lookup_sel<K, V, KF, VF>(self, key: KF, value: VF) -> Result<Lookup<K, V>>
    where
        K: Hash + Eq,
        KF: FnMut(&E::Item) -> K,
        VF: FnMut(E::Item) -> V,
    {
        Lookup::build(self.into_enumerator(), key, value, HashedIndex::new())
    }

    /// [`to_lookup`](Self::to_lookup) with a custom key equivalence.
    pub fn to_lookup_eq<K, KF, Q>(
        self,
        key: KF,
        equaler: Q,
    ) -> Result<Lookup<K, E::Item, ScanIndex<Q>>>
    where
        KF: FnMut(&E::Item) -> K,
        Q: Equaler<K>,
    {
        Lookup::build(self.into_enumerator(), key, |item| item, ScanIndex::new(equaler))
    }

    /// Collects into a map keyed by `key`.
    ///
    /// Keys must be unique: a repeated key fails with
    /// [`Error::DuplicateKey`] carrying the offending element's index.
    pub fn to_map<K, KF>(self, key: KF) -> Result<HashMap<K, E::Item>>
    where
        K: Hash + Eq,
        KF: FnMut(&E::Item) -> K,
    {
        self.to_map_sel(key, |item| item)
    }

    /// [`to_map`](Self::to_map), storing `value(item)`.
    pub fn to_map_sel<K, V, KF, VF>(self, mut key: KF, mut value: VF) -> Result<HashMap<K, V>>
    where
        K: Hash + Eq,
        KF: FnMut(&E::Item) -> K,
        VF: FnMut(E::Item) -> V,
    {
        let mut source = self.into_enumerator();
        let mut map = HashMap::with_capacity(source.size_hint().0);
        let mut index = 0usize;
        while let Some(item) = source.try_next()? {
            let k = key(&item);
            if map.contains_key(&k) {
                return Err(Error::DuplicateKey { index });
            }
            map.insert(k, value(item));
            index += 1;
        }
        trace!(entries = map.len(), "materialized map");
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{CaseInsensitive, NaturalOrder};

    fn q(values: &[i32]) -> Query<impl Enumerator<Item = i32> + Clone> {
        Query::from_vec(values.to_vec())
    }

    #[test]
    fn aggregate_forms() {
        let words = vec!["the", "quick", "brown", "fox"];
        let sentence = Query::from_vec(words.iter().map(|w| w.to_string()).collect())
            .aggregate(|acc, w| format!("{w} {acc}"))
            .unwrap();
        assert_eq!(sentence, "fox brown quick the");

        assert_eq!(q(&[]).aggregate(|a, b| a + b), Err(Error::NoElements));
        assert_eq!(q(&[1, 2, 3]).aggregate_seed(10, |a, b| a + b), Ok(16));
        assert_eq!(
            q(&[1, 2, 3]).aggregate_seed_sel(0, |a, b| a + b, |sum| sum * 2),
            Ok(12)
        );
    }

    #[test]
    fn counting() {
        assert_eq!(q(&[1, 2, 3]).count(), Ok(3));
        assert_eq!(q(&[1, 2, 3]).count_pred(|n| n % 2 == 1), Ok(2));
        assert_eq!(q(&[]).any(), Ok(false));
        assert_eq!(q(&[5]).any_pred(|n| *n > 4), Ok(true));
        assert_eq!(q(&[]).all(|n| *n > 100), Ok(true));
        assert_eq!(q(&[1, 200]).all(|n| *n > 100), Ok(false));
    }

    #[test]
    fn any_pulls_one() {
        let mut pulled = 0;
        let found = Query::from_fn(|| {
            pulled += 1;
            Some(pulled)
        })
        .any()
        .unwrap();
        assert!(found);
        assert_eq!(pulled, 1);
    }

    #[test]
    fn arithmetic() {
        assert_eq!(q(&[1, 2, 3]).sum(), Ok(6));
        assert_eq!(q(&[]).sum(), Ok(0));
        assert_eq!(q(&[1, 2]).sum_sel(|n| n as f64 * 0.5), Ok(1.5));
        assert_eq!(q(&[1, 2]).average(), Ok(1.5));
        assert_eq!(q(&[]).average(), Err(Error::NoElements));
        assert_eq!(q(&[1, 2, 4]).average_sel(|n| n * 2), Ok(14.0 / 3.0));
    }

    #[test]
    fn extremes() {
        assert_eq!(q(&[3, 1, 2]).min(), Ok(1));
        assert_eq!(q(&[3, 1, 2]).max(), Ok(3));
        assert_eq!(q(&[]).min(), Err(Error::NoElements));
        assert_eq!(q(&[3, -7, 2]).min_sel(|n| n.abs()), Ok(2));
        assert_eq!(q(&[3, -7, 2]).max_sel(|n| n.abs()), Ok(7));
        assert_eq!(q(&[3, 1, 2]).min_ls(|a: &i32, b: &i32| a < b), Ok(1));
        assert_eq!(q(&[3, 1, 2]).max_ls(|a: &i32, b: &i32| a < b), Ok(3));
        assert_eq!(q(&[3, 1, 2]).max_cmp(NaturalOrder), Ok(3));
        assert_eq!(q(&[3, 1, 2]).min_cmp(NaturalOrder), Ok(1));
    }

    #[test]
    fn extremes_by_key_keep_first() {
        let words = vec!["bb", "a", "cc", "d"];
        assert_eq!(Query::from_vec(words.clone()).min_by(|w| w.len()), Ok("a"));
        assert_eq!(Query::from_vec(words).max_by(|w| w.len()), Ok("bb"));
    }

    #[test]
    fn first_and_last() {
        assert_eq!(q(&[4, 5, 6]).first(), Ok(4));
        assert_eq!(q(&[]).first(), Err(Error::NoElements));
        assert_eq!(q(&[4, 5, 6]).first_pred(|n| *n > 4), Ok(5));
        assert_eq!(q(&[4, 5, 6]).first_pred(|n| *n > 9), Err(Error::NoMatch));
        assert_eq!(q(&[]).first_or_default(), Ok(0));
        assert_eq!(q(&[4, 5]).first_or_default_pred(|n| *n > 9), Ok(0));

        assert_eq!(q(&[4, 5, 6]).last(), Ok(6));
        assert_eq!(q(&[]).last(), Err(Error::NoElements));
        assert_eq!(q(&[4, 5, 6]).last_pred(|n| *n < 6), Ok(5));
        assert_eq!(q(&[4]).last_pred(|n| *n > 4), Err(Error::NoMatch));
        assert_eq!(q(&[]).last_or_default(), Ok(0));
        assert_eq!(q(&[4, 5]).last_or_default_pred(|n| *n == 4), Ok(4));
    }

    #[test]
    fn single_kinds() {
        assert_eq!(q(&[7]).single(), Ok(7));
        assert_eq!(q(&[]).single(), Err(Error::NoElements));
        assert_eq!(q(&[1, 2]).single(), Err(Error::MultipleElements));
        assert_eq!(q(&[]).single_or_default(), Ok(0));
        assert_eq!(q(&[1, 2]).single_or_default(), Err(Error::MultipleElements));
        assert_eq!(q(&[1, 2, 3]).single_pred(|n| *n == 2), Ok(2));
        assert_eq!(q(&[1, 2, 3]).single_or_default_pred(|n| *n > 2), Ok(3));
        assert_eq!(
            q(&[1, 2, 3]).single_or_default_pred(|n| *n > 1),
            Err(Error::MultipleMatch)
        );
    }

    #[test]
    fn element_access() {
        assert_eq!(q(&[1, 2, 3]).element_at(2), Ok(3));
        assert_eq!(
            q(&[1, 2, 3]).element_at(3),
            Err(Error::IndexOutOfRange { index: 3 })
        );
        assert_eq!(q(&[1, 2, 3]).element_at_or_default(9), Ok(0));
    }

    #[test]
    fn containment() {
        assert_eq!(q(&[1, 2, 3]).contains(&2), Ok(true));
        assert_eq!(q(&[1, 2, 3]).contains(&9), Ok(false));
        let words = Query::from_vec(vec!["Alpha", "Beta"]);
        assert_eq!(words.contains_eq(&"BETA", CaseInsensitive), Ok(true));
    }

    #[test]
    fn sequence_equality() {
        let base = q(&[1, 2, 3]);
        assert_eq!(base.clone().sequence_equal(base.clone()), Ok(true));
        assert_eq!(base.clone().sequence_equal(vec![1, 2]), Ok(false));
        assert_eq!(base.clone().sequence_equal(vec![1, 2, 3, 4]), Ok(false));
        assert_eq!(
            base.sequence_equal_eq(vec![-1, -2, -3], |a: &i32, b: &i32| *a == -b),
            Ok(true)
        );
    }

    #[test]
    fn lookups_and_maps() {
        let words = vec!["apple", "bob", "avocado", "cat"];
        let lookup = Query::from_vec(words.clone()).to_lookup(|w| w.len()).unwrap();
        assert_eq!(lookup.values(&3), &["bob", "cat"]);

        let lookup = Query::from_vec(words.clone())
            .to_lookup_sel(|w| w.chars().next(), |w| w.len())
            .unwrap();
        assert_eq!(lookup.values(&Some('a')), &[5, 7]);

        let lookup = Query::from_vec(vec!["A", "b", "a"])
            .to_lookup_eq(|w| *w, CaseInsensitive)
            .unwrap();
        assert_eq!(lookup.len(), 2);

        let map = Query::from_vec(words.clone()).to_map(|w| w.to_string()).unwrap();
        assert_eq!(map.get("bob"), Some(&"bob"));

        let clash = Query::from_vec(words).to_map_sel(|w| w.len(), |w| w.to_uppercase());
        assert_eq!(clash.unwrap_err(), Error::DuplicateKey { index: 3 });
    }

    #[test]
    fn for_each_visits_in_order() {
        let mut seen = Vec::new();
        q(&[3, 1, 2]).for_each(|n| seen.push(n)).unwrap();
        assert_eq!(seen, vec![3, 1, 2]);
    }
}
