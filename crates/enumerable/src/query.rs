//! The fluent query pipeline.
//!
//! A [`Query`] wraps an [`Enumerator`] and offers every operator as a method.
//! Lazy operators consume the query and return a new one wrapping a further
//! stage; nothing is evaluated until a terminal operator such as
//! [`Query::to_vec`] runs or the caller pulls elements.
//!
//! Stateless operators (`filter`, `select`, `take`, ...) hold at most one
//! element at a time. Buffering operators (`distinct`, `group_by`, `join`,
//! `order_by`, ...) are just as lazy to *build*, but do O(n) or
//! O(n log n) work on their first pull before producing anything. Avoid
//! them over unbounded sources.
//!
//! # Example
//!
//! ```
//! use enumerable::Query;
//!
//! let evens: Vec<i64> = Query::range(1, 10)
//!     .unwrap()
//!     .filter(|n| n % 2 == 0)
//!     .select(|n| n * n)
//!     .to_vec()
//!     .unwrap();
//!
//! assert_eq!(evens, vec![4, 16, 36, 64, 100]);
//! ```

use std::hash::Hash;

use crate::compare::{
    Comparer, Dir, Equaler, KeyComparer, Lesser, LesserComparer, NaturalOrder, Reversed,
    ThenComparer,
};
use crate::enumerator::{Cursor, Enumerable, Enumerator, IntoEnumerator};
use crate::error::{Error, Result};
use crate::group::{GroupBy, GroupJoin, Join};
use crate::index::{HashedIndex, KeyIndex, ScanIndex, SortedIndex};
use crate::lookup::Grouping;
use crate::order::{Ordered, Reverse, SkipLast, TakeLast};
use crate::pipeline::{
    Cast, Chunk, Concat, DefaultIfEmpty, Filter, FilterIdx, OfType, Plain, Select, SelectIdx,
    SelectMany, SelectManyRes, Skip, SkipWhile, Take, TakeWhile, WithIndex, Zip,
};
use crate::set::{Distinct, Except, Intersect};
use crate::source::{
    EmptyEnumerator, FromFn, IterEnumerator, Iterate, RangeEnumerator, RepeatEnumerator,
    SliceEnumerator,
};

/// Key projection that uses a clone of the element itself.
pub type SelfKey<T> = fn(&T) -> T;

/// Value projection that keeps the element unchanged.
pub type SelfValue<T> = fn(T) -> T;

/// Comparer ordering elements by a key in its natural order.
pub type ByKey<T, K, KF> = KeyComparer<T, K, KF, NaturalOrder>;

/// A single-element tail or head used by `append` and `prepend`.
pub type Single<T> = IterEnumerator<std::option::IntoIter<T>>;

fn clone_key<T: Clone>(item: &T) -> T {
    item.clone()
}

fn identity<T>(item: T) -> T {
    item
}

fn pair<A, B>(a: A, b: B) -> (A, B) {
    (a, b)
}

/// A lazy query over a sequence.
///
/// `Query` is `Clone` whenever its pipeline is, and a clone taken before
/// consumption is an independent pass over a reusable source.
#[derive(Debug, Clone)]
#[must_use = "queries are lazy and do nothing unless consumed"]
pub struct Query<E> {
    source: E,
}

impl<E> Query<E> {
    /// Wraps an enumerator.
    pub fn new(source: E) -> Self {
        Query { source }
    }
}

// ============================================================================
// Sources
// ============================================================================

impl<'a, T> Query<SliceEnumerator<'a, T>> {
    /// Queries a borrowed slice, yielding references.
    pub fn from_slice(items: &'a [T]) -> Self {
        Query::new(SliceEnumerator::new(items))
    }
}

impl<T> Query<IterEnumerator<std::vec::IntoIter<T>>> {
    /// Queries an owned vector.
    pub fn from_vec(items: Vec<T>) -> Self {
        Query::new(IterEnumerator::new(items))
    }
}

impl<I: Iterator> Query<IterEnumerator<I>> {
    /// Queries anything iterable.
    #[allow(clippy::should_implement_trait)]
    pub fn from_iter(iter: impl IntoIterator<IntoIter = I>) -> Self {
        Query::new(IterEnumerator::new(iter))
    }
}

impl Query<RangeEnumerator> {
    /// `count` consecutive integers starting at `start`.
    ///
    /// Fails immediately if `count` is negative or the last element would
    /// overflow `i64`.
    pub fn range(start: i64, count: i64) -> Result<Self> {
        Ok(Query::new(RangeEnumerator::new(start, count)?))
    }
}

impl<T: Clone> Query<RepeatEnumerator<T>> {
    /// `value` repeated `count` times. Fails immediately if `count` is negative.
    pub fn repeat(value: T, count: i64) -> Result<Self> {
        Ok(Query::new(RepeatEnumerator::new(value, count)?))
    }
}

impl<T> Query<EmptyEnumerator<T>> {
    /// A query with no elements.
    pub fn empty() -> Self {
        Query::new(EmptyEnumerator::new())
    }
}

impl<T, F> Query<FromFn<F>>
where
    F: FnMut() -> Option<T>,
{
    /// A generator that ends the first time `generator` returns `None`.
    ///
    /// The generator's state lives in the closure, so the query is
    /// single-pass.
    pub fn from_fn(generator: F) -> Self {
        Query::new(FromFn::new(generator))
    }
}

impl<T, F> Query<Iterate<T, F>>
where
    T: Clone,
    F: FnMut(&T) -> T,
{
    /// The unbounded sequence `seed, step(seed), step(step(seed)), ...`.
    pub fn iterate(seed: T, step: F) -> Self {
        Query::new(Iterate::new(seed, step))
    }
}

impl<E: Enumerator> Query<E> {
    // ========================================================================
    // Filtering and projection
    // ========================================================================

    /// Keeps the elements satisfying `predicate`.
    pub fn filter<P>(self, predicate: P) -> Query<Filter<E, P>>
    where
        P: FnMut(&E::Item) -> bool,
    {
        Query::new(Filter::new(self.source, predicate))
    }

    /// [`filter`](Self::filter) with the zero-based element index.
    pub fn filter_idx<P>(self, predicate: P) -> Query<FilterIdx<E, P>>
    where
        P: FnMut(&E::Item, usize) -> bool,
    {
        Query::new(FilterIdx::new(self.source, predicate))
    }

    /// Transforms each element.
    pub fn select<U, F>(self, selector: F) -> Query<Select<E, F>>
    where
        F: FnMut(E::Item) -> U,
    {
        Query::new(Select::new(self.source, selector))
    }

    /// [`select`](Self::select) with the zero-based element index.
    pub fn select_idx<U, F>(self, selector: F) -> Query<SelectIdx<E, F>>
    where
        F: FnMut(E::Item, usize) -> U,
    {
        Query::new(SelectIdx::new(self.source, selector))
    }

    /// Maps each element to a sequence and flattens the result one level.
    pub fn select_many<I, F>(self, selector: F) -> Query<SelectMany<E, F, I>>
    where
        I: IntoEnumerator,
        F: FnMut(E::Item) -> I,
    {
        Query::new(SelectMany::new(self.source, selector))
    }

    /// [`select_many`](Self::select_many) with the zero-based outer index.
    pub fn select_many_idx<I, F>(
        self,
        selector: F,
    ) -> Query<SelectMany<SelectIdx<E, F>, SelfValue<I>, I>>
    where
        I: IntoEnumerator,
        F: FnMut(E::Item, usize) -> I,
    {
        let flatten: SelfValue<I> = identity;
        Query::new(SelectMany::new(SelectIdx::new(self.source, selector), flatten))
    }

    /// Flattens with a result selector that sees both the outer element and
    /// each inner element.
    pub fn select_many_res<I, U, F, R>(
        self,
        collection: F,
        result: R,
    ) -> Query<SelectManyRes<E, F, I, R>>
    where
        I: IntoEnumerator,
        F: FnMut(&E::Item) -> I,
        R: FnMut(&E::Item, I::Item) -> U,
    {
        Query::new(SelectManyRes::new(self.source, collection, result))
    }

    /// Converts each element with `TryFrom`, failing at the first element
    /// that does not convert.
    pub fn cast<U>(self) -> Query<Cast<E, U>>
    where
        U: TryFrom<E::Item>,
    {
        Query::new(Cast::new(self.source))
    }

    /// Converts each element with `TryFrom`, dropping elements that do not
    /// convert.
    pub fn of_type<U>(self) -> Query<OfType<E, U>>
    where
        U: TryFrom<E::Item>,
    {
        Query::new(OfType::new(self.source))
    }

    // ========================================================================
    // Partitioning
    // ========================================================================

    /// The first `n` elements.
    pub fn take(self, n: usize) -> Query<Take<E>> {
        Query::new(Take::new(self.source, n))
    }

    /// Everything after the first `n` elements.
    pub fn skip(self, n: usize) -> Query<Skip<E>> {
        Query::new(Skip::new(self.source, n))
    }

    /// Elements up to, not including, the first that fails `predicate`.
    pub fn take_while<P>(self, predicate: P) -> Query<TakeWhile<E, Plain<P>>>
    where
        P: FnMut(&E::Item) -> bool,
    {
        Query::new(TakeWhile::new(self.source, Plain(predicate)))
    }

    /// [`take_while`](Self::take_while) with the zero-based element index.
    pub fn take_while_idx<P>(self, predicate: P) -> Query<TakeWhile<E, WithIndex<P>>>
    where
        P: FnMut(&E::Item, usize) -> bool,
    {
        Query::new(TakeWhile::new(self.source, WithIndex(predicate)))
    }

    /// Elements from the first that fails `predicate` onwards.
    pub fn skip_while<P>(self, predicate: P) -> Query<SkipWhile<E, Plain<P>>>
    where
        P: FnMut(&E::Item) -> bool,
    {
        Query::new(SkipWhile::new(self.source, Plain(predicate)))
    }

    /// [`skip_while`](Self::skip_while) with the zero-based element index.
    pub fn skip_while_idx<P>(self, predicate: P) -> Query<SkipWhile<E, WithIndex<P>>>
    where
        P: FnMut(&E::Item, usize) -> bool,
    {
        Query::new(SkipWhile::new(self.source, WithIndex(predicate)))
    }

    /// The last `n` elements. Reads the whole source on the first pull.
    pub fn take_last(self, n: usize) -> Query<TakeLast<E>> {
        Query::new(TakeLast::new(self.source, n))
    }

    /// Everything except the last `n` elements.
    pub fn skip_last(self, n: usize) -> Query<SkipLast<E>> {
        Query::new(SkipLast::new(self.source, n))
    }

    /// Splits the sequence into vectors of `size` elements; the last may be
    /// shorter.
    ///
    /// Fails immediately if `size` is zero.
    pub fn chunk(self, size: usize) -> Result<Query<Chunk<E>>> {
        if size == 0 {
            return Err(Error::InvalidChunkSize);
        }
        Ok(Query::new(Chunk::new(self.source, size)))
    }

    // ========================================================================
    // Combining
    // ========================================================================

    /// Pairs elements of both sequences in lockstep through `selector`,
    /// stopping at the end of the shorter one.
    pub fn zip<B, U, F>(self, other: B, selector: F) -> Query<Zip<E, B::IntoEnum, F>>
    where
        B: IntoEnumerator,
        F: FnMut(E::Item, B::Item) -> U,
    {
        Query::new(Zip::new(self.source, other.into_enumerator(), selector))
    }

    /// [`zip`](Self::zip) into tuples.
    #[allow(clippy::type_complexity)]
    pub fn zip_pairs<B>(
        self,
        other: B,
    ) -> Query<Zip<E, B::IntoEnum, fn(E::Item, B::Item) -> (E::Item, B::Item)>>
    where
        B: IntoEnumerator,
    {
        let selector: fn(E::Item, B::Item) -> (E::Item, B::Item) = pair;
        Query::new(Zip::new(self.source, other.into_enumerator(), selector))
    }

    /// This sequence followed by `other`.
    pub fn concat<B>(self, other: B) -> Query<Concat<E, B::IntoEnum>>
    where
        B: IntoEnumerator<Item = E::Item>,
    {
        Query::new(Concat::new(self.source, other.into_enumerator()))
    }

    /// This sequence followed by `value`.
    pub fn append(self, value: E::Item) -> Query<Concat<E, Single<E::Item>>> {
        Query::new(Concat::new(self.source, IterEnumerator::new(Some(value))))
    }

    /// `value` followed by this sequence.
    pub fn prepend(self, value: E::Item) -> Query<Concat<Single<E::Item>, E>> {
        Query::new(Concat::new(IterEnumerator::new(Some(value)), self.source))
    }

    /// A single `Default` element if this sequence is empty.
    pub fn default_if_empty(self) -> Query<DefaultIfEmpty<E>>
    where
        E::Item: Default,
    {
        self.default_if_empty_with(E::Item::default())
    }

    /// A single `value` if this sequence is empty.
    pub fn default_if_empty_with(self, value: E::Item) -> Query<DefaultIfEmpty<E>> {
        Query::new(DefaultIfEmpty::new(self.source, value))
    }

    // ========================================================================
    // Distinct and set operations
    // ========================================================================

    fn distinct_with<K, KF, I>(self, key: KF, index: I) -> Query<Distinct<E, KF, K, I>>
    where
        KF: FnMut(&E::Item) -> K,
        I: KeyIndex<K>,
    {
        Query::new(Distinct::new(self.source, key, index))
    }

    /// Drops repeated elements, keeping the first of each.
    pub fn distinct(self) -> Query<Distinct<E, SelfKey<E::Item>, E::Item, HashedIndex>>
    where
        E::Item: Clone + Hash + Eq,
    {
        let key: SelfKey<E::Item> = clone_key;
        self.distinct_with(key, HashedIndex::new())
    }

    /// [`distinct`](Self::distinct) with a custom equivalence.
    pub fn distinct_eq<Q>(
        self,
        equaler: Q,
    ) -> Query<Distinct<E, SelfKey<E::Item>, E::Item, ScanIndex<Q>>>
    where
        E::Item: Clone,
        Q: Equaler<E::Item>,
    {
        let key: SelfKey<E::Item> = clone_key;
        self.distinct_with(key, ScanIndex::new(equaler))
    }

    /// [`distinct`](Self::distinct) with a comparer; elements it ranks
    /// `Equal` are duplicates.
    pub fn distinct_cmp<C>(
        self,
        comparer: C,
    ) -> Query<Distinct<E, SelfKey<E::Item>, E::Item, SortedIndex<C>>>
    where
        E::Item: Clone,
        C: Comparer<E::Item>,
    {
        let key: SelfKey<E::Item> = clone_key;
        self.distinct_with(key, SortedIndex::new(comparer))
    }

    /// Drops elements whose key was already seen.
    pub fn distinct_by<K, KF>(self, key: KF) -> Query<Distinct<E, KF, K, HashedIndex>>
    where
        K: Hash + Eq,
        KF: FnMut(&E::Item) -> K,
    {
        self.distinct_with(key, HashedIndex::new())
    }

    /// [`distinct_by`](Self::distinct_by) with a custom key equivalence.
    pub fn distinct_by_eq<K, KF, Q>(
        self,
        key: KF,
        equaler: Q,
    ) -> Query<Distinct<E, KF, K, ScanIndex<Q>>>
    where
        KF: FnMut(&E::Item) -> K,
        Q: Equaler<K>,
    {
        self.distinct_with(key, ScanIndex::new(equaler))
    }

    /// [`distinct_by`](Self::distinct_by) with a key comparer.
    pub fn distinct_by_cmp<K, KF, C>(
        self,
        key: KF,
        comparer: C,
    ) -> Query<Distinct<E, KF, K, SortedIndex<C>>>
    where
        KF: FnMut(&E::Item) -> K,
        C: Comparer<K>,
    {
        self.distinct_with(key, SortedIndex::new(comparer))
    }

    /// Distinct elements of this sequence followed by those of `other`.
    #[allow(clippy::type_complexity)]
    pub fn union<B>(
        self,
        other: B,
    ) -> Query<Distinct<Concat<E, B::IntoEnum>, SelfKey<E::Item>, E::Item, HashedIndex>>
    where
        B: IntoEnumerator<Item = E::Item>,
        E::Item: Clone + Hash + Eq,
    {
        self.concat(other).distinct()
    }

    /// [`union`](Self::union) with a custom equivalence.
    #[allow(clippy::type_complexity)]
    pub fn union_eq<B, Q>(
        self,
        other: B,
        equaler: Q,
    ) -> Query<Distinct<Concat<E, B::IntoEnum>, SelfKey<E::Item>, E::Item, ScanIndex<Q>>>
    where
        B: IntoEnumerator<Item = E::Item>,
        E::Item: Clone,
        Q: Equaler<E::Item>,
    {
        self.concat(other).distinct_eq(equaler)
    }

    /// [`union`](Self::union) with a comparer.
    #[allow(clippy::type_complexity)]
    pub fn union_cmp<B, C>(
        self,
        other: B,
        comparer: C,
    ) -> Query<Distinct<Concat<E, B::IntoEnum>, SelfKey<E::Item>, E::Item, SortedIndex<C>>>
    where
        B: IntoEnumerator<Item = E::Item>,
        E::Item: Clone,
        C: Comparer<E::Item>,
    {
        self.concat(other).distinct_cmp(comparer)
    }

    /// [`union`](Self::union) comparing elements by key.
    pub fn union_by<B, K, KF>(
        self,
        other: B,
        key: KF,
    ) -> Query<Distinct<Concat<E, B::IntoEnum>, KF, K, HashedIndex>>
    where
        B: IntoEnumerator<Item = E::Item>,
        K: Hash + Eq,
        KF: FnMut(&E::Item) -> K,
    {
        self.concat(other).distinct_by(key)
    }

    fn intersect_with<B, K, KF, I>(
        self,
        other: B,
        key: KF,
        index: I,
    ) -> Query<Intersect<E, B::IntoEnum, KF, K, I>>
    where
        B: IntoEnumerator<Item = E::Item>,
        KF: FnMut(&E::Item) -> K,
        I: KeyIndex<K>,
    {
        Query::new(Intersect::new(self.source, other.into_enumerator(), key, index))
    }

    /// Distinct elements of this sequence that also occur in `other`, in
    /// this sequence's order. Reads `other` completely on the first pull.
    #[allow(clippy::type_complexity)]
    pub fn intersect<B>(
        self,
        other: B,
    ) -> Query<Intersect<E, B::IntoEnum, SelfKey<E::Item>, E::Item, HashedIndex>>
    where
        B: IntoEnumerator<Item = E::Item>,
        E::Item: Clone + Hash + Eq,
    {
        let key: SelfKey<E::Item> = clone_key;
        self.intersect_with(other, key, HashedIndex::new())
    }

    /// [`intersect`](Self::intersect) with a custom equivalence.
    #[allow(clippy::type_complexity)]
    pub fn intersect_eq<B, Q>(
        self,
        other: B,
        equaler: Q,
    ) -> Query<Intersect<E, B::IntoEnum, SelfKey<E::Item>, E::Item, ScanIndex<Q>>>
    where
        B: IntoEnumerator<Item = E::Item>,
        E::Item: Clone,
        Q: Equaler<E::Item>,
    {
        let key: SelfKey<E::Item> = clone_key;
        self.intersect_with(other, key, ScanIndex::new(equaler))
    }

    /// [`intersect`](Self::intersect) with a comparer.
    #[allow(clippy::type_complexity)]
    pub fn intersect_cmp<B, C>(
        self,
        other: B,
        comparer: C,
    ) -> Query<Intersect<E, B::IntoEnum, SelfKey<E::Item>, E::Item, SortedIndex<C>>>
    where
        B: IntoEnumerator<Item = E::Item>,
        E::Item: Clone,
        C: Comparer<E::Item>,
    {
        let key: SelfKey<E::Item> = clone_key;
        self.intersect_with(other, key, SortedIndex::new(comparer))
    }

    /// [`intersect`](Self::intersect) comparing elements by key.
    pub fn intersect_by<B, K, KF>(
        self,
        other: B,
        key: KF,
    ) -> Query<Intersect<E, B::IntoEnum, KF, K, HashedIndex>>
    where
        B: IntoEnumerator<Item = E::Item>,
        K: Hash + Eq,
        KF: FnMut(&E::Item) -> K,
    {
        self.intersect_with(other, key, HashedIndex::new())
    }

    fn except_with<B, K, KF, I>(
        self,
        other: B,
        key: KF,
        index: I,
    ) -> Query<Except<E, B::IntoEnum, KF, K, I>>
    where
        B: IntoEnumerator<Item = E::Item>,
        KF: FnMut(&E::Item) -> K,
        I: KeyIndex<K>,
    {
        Query::new(Except::new(self.source, other.into_enumerator(), key, index))
    }

    /// Distinct elements of this sequence that do not occur in `other`, in
    /// this sequence's order. Reads `other` completely on the first pull.
    #[allow(clippy::type_complexity)]
    pub fn except<B>(
        self,
        other: B,
    ) -> Query<Except<E, B::IntoEnum, SelfKey<E::Item>, E::Item, HashedIndex>>
    where
        B: IntoEnumerator<Item = E::Item>,
        E::Item: Clone + Hash + Eq,
    {
        let key: SelfKey<E::Item> = clone_key;
        self.except_with(other, key, HashedIndex::new())
    }

    /// [`except`](Self::except) with a custom equivalence.
    #[allow(clippy::type_complexity)]
    pub fn except_eq<B, Q>(
        self,
        other: B,
        equaler: Q,
    ) -> Query<Except<E, B::IntoEnum, SelfKey<E::Item>, E::Item, ScanIndex<Q>>>
    where
        B: IntoEnumerator<Item = E::Item>,
        E::Item: Clone,
        Q: Equaler<E::Item>,
    {
        let key: SelfKey<E::Item> = clone_key;
        self.except_with(other, key, ScanIndex::new(equaler))
    }

    /// [`except`](Self::except) with a comparer.
    #[allow(clippy::type_complexity)]
    pub fn except_cmp<B, C>(
        self,
        other: B,
        comparer: C,
    ) -> Query<Except<E, B::IntoEnum, SelfKey<E::Item>, E::Item, SortedIndex<C>>>
    where
        B: IntoEnumerator<Item = E::Item>,
        E::Item: Clone,
        C: Comparer<E::Item>,
    {
        let key: SelfKey<E::Item> = clone_key;
        self.except_with(other, key, SortedIndex::new(comparer))
    }

    /// [`except`](Self::except) comparing elements by key.
    pub fn except_by<B, K, KF>(
        self,
        other: B,
        key: KF,
    ) -> Query<Except<E, B::IntoEnum, KF, K, HashedIndex>>
    where
        B: IntoEnumerator<Item = E::Item>,
        K: Hash + Eq,
        KF: FnMut(&E::Item) -> K,
    {
        self.except_with(other, key, HashedIndex::new())
    }

    // ========================================================================
    // Grouping and joins
    // ========================================================================

    /// Groups elements by key. Groups come out in the order their key was
    /// first seen; values keep their encounter order.
    ///
    /// Reads the whole source on the first pull.
    ///
    /// ```
    /// use enumerable::Query;
    ///
    /// let groups: Vec<(i32, Vec<i32>)> = Query::from_vec(vec![35, 44, 200, 3987])
    ///     .group_by(|n| n % 2)
    ///     .select(|g| g.into_parts())
    ///     .to_vec()
    ///     .unwrap();
    ///
    /// assert_eq!(groups, vec![(1, vec![35, 3987]), (0, vec![44, 200])]);
    /// ```
    #[allow(clippy::type_complexity)]
    pub fn group_by<K, KF>(
        self,
        key: KF,
    ) -> Query<GroupBy<E, KF, SelfValue<E::Item>, K, E::Item, HashedIndex>>
    where
        K: Hash + Eq,
        KF: FnMut(&E::Item) -> K,
    {
        let value: SelfValue<E::Item> = identity;
        Query::new(GroupBy::new(self.source, key, value, HashedIndex::new()))
    }

    /// [`group_by`](Self::group_by) with a custom key equivalence.
    #[allow(clippy::type_complexity)]
    pub fn group_by_eq<K, KF, Q>(
        self,
        key: KF,
        equaler: Q,
    ) -> Query<GroupBy<E, KF, SelfValue<E::Item>, K, E::Item, ScanIndex<Q>>>
    where
        KF: FnMut(&E::Item) -> K,
        Q: Equaler<K>,
    {
        let value: SelfValue<E::Item> = identity;
        Query::new(GroupBy::new(self.source, key, value, ScanIndex::new(equaler)))
    }

    /// [`group_by`](Self::group_by) with a key comparer.
    #[allow(clippy::type_complexity)]
    pub fn group_by_cmp<K, KF, C>(
        self,
        key: KF,
        comparer: C,
    ) -> Query<GroupBy<E, KF, SelfValue<E::Item>, K, E::Item, SortedIndex<C>>>
    where
        KF: FnMut(&E::Item) -> K,
        C: Comparer<K>,
    {
        let value: SelfValue<E::Item> = identity;
        Query::new(GroupBy::new(self.source, key, value, SortedIndex::new(comparer)))
    }

    /// [`group_by`](Self::group_by), storing `element(item)` in each group.
    pub fn group_by_sel<K, V, KF, VF>(
        self,
        key: KF,
        element: VF,
    ) -> Query<GroupBy<E, KF, VF, K, V, HashedIndex>>
    where
        K: Hash + Eq,
        KF: FnMut(&E::Item) -> K,
        VF: FnMut(E::Item) -> V,
    {
        Query::new(GroupBy::new(self.source, key, element, HashedIndex::new()))
    }

    /// [`group_by_sel`](Self::group_by_sel) with a custom key equivalence.
    pub fn group_by_sel_eq<K, V, KF, VF, Q>(
        self,
        key: KF,
        element: VF,
        equaler: Q,
    ) -> Query<GroupBy<E, KF, VF, K, V, ScanIndex<Q>>>
    where
        KF: FnMut(&E::Item) -> K,
        VF: FnMut(E::Item) -> V,
        Q: Equaler<K>,
    {
        Query::new(GroupBy::new(self.source, key, element, ScanIndex::new(equaler)))
    }

    /// [`group_by`](Self::group_by), feeding each group through `result`.
    #[allow(clippy::type_complexity)]
    pub fn group_by_res<K, KF, R, RF>(
        self,
        key: KF,
        result: RF,
    ) -> Query<Select<GroupBy<E, KF, SelfValue<E::Item>, K, E::Item, HashedIndex>, RF>>
    where
        K: Hash + Eq,
        KF: FnMut(&E::Item) -> K,
        RF: FnMut(Grouping<K, E::Item>) -> R,
    {
        self.group_by(key).select(result)
    }

    /// Inner equi-join against `inner`.
    ///
    /// Reads `inner` completely on the first pull, then streams this
    /// sequence. Yields one result per matching pair: outer order first,
    /// then inner order. Unmatched elements on either side are dropped.
    #[allow(clippy::type_complexity)]
    pub fn join<N, K, U, OK, IK, R>(
        self,
        inner: N,
        outer_key: OK,
        inner_key: IK,
        result: R,
    ) -> Query<Join<E, N::IntoEnum, OK, IK, R, K, HashedIndex>>
    where
        N: IntoEnumerator,
        K: Hash + Eq,
        OK: FnMut(&E::Item) -> K,
        IK: FnMut(&N::Item) -> K,
        R: FnMut(&E::Item, &N::Item) -> U,
    {
        Query::new(Join::new(
            self.source,
            inner.into_enumerator(),
            outer_key,
            inner_key,
            result,
            HashedIndex::new(),
        ))
    }

    /// [`join`](Self::join) with a custom key equivalence.
    #[allow(clippy::type_complexity)]
    pub fn join_eq<N, K, U, OK, IK, R, Q>(
        self,
        inner: N,
        outer_key: OK,
        inner_key: IK,
        result: R,
        equaler: Q,
    ) -> Query<Join<E, N::IntoEnum, OK, IK, R, K, ScanIndex<Q>>>
    where
        N: IntoEnumerator,
        OK: FnMut(&E::Item) -> K,
        IK: FnMut(&N::Item) -> K,
        R: FnMut(&E::Item, &N::Item) -> U,
        Q: Equaler<K>,
    {
        Query::new(Join::new(
            self.source,
            inner.into_enumerator(),
            outer_key,
            inner_key,
            result,
            ScanIndex::new(equaler),
        ))
    }

    /// Left outer group-join against `inner`.
    ///
    /// Yields exactly one result per element of this sequence, paired with
    /// the (possibly empty) slice of matching inner elements.
    #[allow(clippy::type_complexity)]
    pub fn group_join<N, K, U, OK, IK, R>(
        self,
        inner: N,
        outer_key: OK,
        inner_key: IK,
        result: R,
    ) -> Query<GroupJoin<E, N::IntoEnum, OK, IK, R, K, HashedIndex>>
    where
        N: IntoEnumerator,
        K: Hash + Eq,
        OK: FnMut(&E::Item) -> K,
        IK: FnMut(&N::Item) -> K,
        R: FnMut(E::Item, &[N::Item]) -> U,
    {
        Query::new(GroupJoin::new(
            self.source,
            inner.into_enumerator(),
            outer_key,
            inner_key,
            result,
            HashedIndex::new(),
        ))
    }

    /// [`group_join`](Self::group_join) with a custom key equivalence.
    #[allow(clippy::type_complexity)]
    pub fn group_join_eq<N, K, U, OK, IK, R, Q>(
        self,
        inner: N,
        outer_key: OK,
        inner_key: IK,
        result: R,
        equaler: Q,
    ) -> Query<GroupJoin<E, N::IntoEnum, OK, IK, R, K, ScanIndex<Q>>>
    where
        N: IntoEnumerator,
        OK: FnMut(&E::Item) -> K,
        IK: FnMut(&N::Item) -> K,
        R: FnMut(E::Item, &[N::Item]) -> U,
        Q: Equaler<K>,
    {
        Query::new(GroupJoin::new(
            self.source,
            inner.into_enumerator(),
            outer_key,
            inner_key,
            result,
            ScanIndex::new(equaler),
        ))
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    /// Sorts elements in their natural order. The sort is stable.
    pub fn order(self) -> Query<Ordered<E, NaturalOrder>>
    where
        E::Item: Ord,
    {
        Query::new(Ordered::new(self.source, NaturalOrder))
    }

    /// Sorts elements in reverse natural order.
    pub fn order_desc(self) -> Query<Ordered<E, Reversed<NaturalOrder>>>
    where
        E::Item: Ord,
    {
        Query::new(Ordered::new(self.source, Reversed(NaturalOrder)))
    }

    /// Sorts elements with a three-way comparer.
    pub fn order_cmp<C>(self, comparer: C) -> Query<Ordered<E, C>>
    where
        C: Comparer<E::Item>,
    {
        Query::new(Ordered::new(self.source, comparer))
    }

    /// Sorts elements with a strict "less than" relation.
    pub fn order_ls<L>(self, lesser: L) -> Query<Ordered<E, LesserComparer<L>>>
    where
        L: Lesser<E::Item>,
    {
        Query::new(Ordered::new(self.source, LesserComparer(lesser)))
    }

    /// Sorts by key, ascending.
    pub fn order_by<K, KF>(self, key: KF) -> Query<Ordered<E, ByKey<E::Item, K, KF>>>
    where
        K: Ord,
        KF: Fn(&E::Item) -> K,
    {
        self.order_by_dir(key, Dir::Asc)
    }

    /// Sorts by key, descending.
    pub fn order_by_desc<K, KF>(self, key: KF) -> Query<Ordered<E, ByKey<E::Item, K, KF>>>
    where
        K: Ord,
        KF: Fn(&E::Item) -> K,
    {
        self.order_by_dir(key, Dir::Desc)
    }

    /// Sorts by key in the given direction.
    pub fn order_by_dir<K, KF>(self, key: KF, dir: Dir) -> Query<Ordered<E, ByKey<E::Item, K, KF>>>
    where
        K: Ord,
        KF: Fn(&E::Item) -> K,
    {
        Query::new(Ordered::new(self.source, KeyComparer::new(key, NaturalOrder, dir)))
    }

    /// Sorts by key using a key comparer.
    pub fn order_by_cmp<K, KF, C>(
        self,
        key: KF,
        comparer: C,
    ) -> Query<Ordered<E, KeyComparer<E::Item, K, KF, C>>>
    where
        KF: Fn(&E::Item) -> K,
        C: Comparer<K>,
    {
        Query::new(Ordered::new(self.source, KeyComparer::new(key, comparer, Dir::Asc)))
    }

    /// Sorts by key using a strict "less than" on keys.
    #[allow(clippy::type_complexity)]
    pub fn order_by_ls<K, KF, L>(
        self,
        key: KF,
        lesser: L,
    ) -> Query<Ordered<E, KeyComparer<E::Item, K, KF, LesserComparer<L>>>>
    where
        KF: Fn(&E::Item) -> K,
        L: Lesser<K>,
    {
        Query::new(Ordered::new(
            self.source,
            KeyComparer::new(key, LesserComparer(lesser), Dir::Asc),
        ))
    }

    /// Yields the elements back to front. Reads the whole source on the
    /// first pull.
    pub fn reverse(self) -> Query<Reverse<E>> {
        Query::new(Reverse::new(self.source))
    }

    // ========================================================================
    // Passes
    // ========================================================================

    /// Erases the pipeline type.
    pub fn boxed<'a>(self) -> Query<Box<dyn Enumerator<Item = E::Item> + 'a>>
    where
        E: 'a,
    {
        Query::new(Box::new(self.source))
    }

    /// Starts an `advance()`/`current()` pass over a copy of the pipeline,
    /// leaving this query untouched.
    pub fn cursor(&self) -> Cursor<E>
    where
        E: Clone,
    {
        Cursor::new(self.source.clone())
    }

    /// Turns the query into an `advance()`/`current()` cursor.
    pub fn into_cursor(self) -> Cursor<E> {
        Cursor::new(self.source)
    }
}

impl<E, C> Query<Ordered<E, C>>
where
    E: Enumerator,
    C: Comparer<E::Item>,
{
    /// Breaks ties of the previous ordering by key, ascending.
    ///
    /// Elements equal under every key keep their original order.
    #[allow(clippy::type_complexity)]
    pub fn then_by<K, KF>(
        self,
        key: KF,
    ) -> Query<Ordered<E, ThenComparer<C, ByKey<E::Item, K, KF>>>>
    where
        K: Ord,
        KF: Fn(&E::Item) -> K,
    {
        self.then_by_dir(key, Dir::Asc)
    }

    /// Breaks ties of the previous ordering by key, descending.
    #[allow(clippy::type_complexity)]
    pub fn then_by_desc<K, KF>(
        self,
        key: KF,
    ) -> Query<Ordered<E, ThenComparer<C, ByKey<E::Item, K, KF>>>>
    where
        K: Ord,
        KF: Fn(&E::Item) -> K,
    {
        self.then_by_dir(key, Dir::Desc)
    }

    /// Breaks ties of the previous ordering by key in the given direction.
    #[allow(clippy::type_complexity)]
    pub fn then_by_dir<K, KF>(
        self,
        key: KF,
        dir: Dir,
    ) -> Query<Ordered<E, ThenComparer<C, ByKey<E::Item, K, KF>>>>
    where
        K: Ord,
        KF: Fn(&E::Item) -> K,
    {
        Query::new(self.source.then(KeyComparer::new(key, NaturalOrder, dir)))
    }

    /// Breaks ties of the previous ordering by key using a key comparer.
    #[allow(clippy::type_complexity)]
    pub fn then_by_cmp<K, KF, C2>(
        self,
        key: KF,
        comparer: C2,
    ) -> Query<Ordered<E, ThenComparer<C, KeyComparer<E::Item, K, KF, C2>>>>
    where
        KF: Fn(&E::Item) -> K,
        C2: Comparer<K>,
    {
        Query::new(self.source.then(KeyComparer::new(key, comparer, Dir::Asc)))
    }

    /// Breaks ties of the previous ordering by key using a strict
    /// "less than" on keys.
    #[allow(clippy::type_complexity)]
    pub fn then_by_ls<K, KF, L>(
        self,
        key: KF,
        lesser: L,
    ) -> Query<Ordered<E, ThenComparer<C, KeyComparer<E::Item, K, KF, LesserComparer<L>>>>>
    where
        KF: Fn(&E::Item) -> K,
        L: Lesser<K>,
    {
        Query::new(self.source.then(KeyComparer::new(key, LesserComparer(lesser), Dir::Asc)))
    }
}

impl<E: Enumerator> Enumerator for Query<E> {
    type Item = E::Item;

    fn try_next(&mut self) -> Result<Option<E::Item>> {
        self.source.try_next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}

impl<E: Enumerator> IntoEnumerator for Query<E> {
    type Item = E::Item;
    type IntoEnum = E;

    fn into_enumerator(self) -> E {
        self.source
    }
}

impl<E: Enumerator + Clone> Enumerable for Query<E> {
    type Item = E::Item;
    type Enumerator = E;

    fn enumerate(&self) -> E {
        self.source.clone()
    }
}

impl<E: Enumerator> IntoIterator for Query<E> {
    type Item = Result<E::Item>;
    type IntoIter = Iter<E>;

    fn into_iter(self) -> Iter<E> {
        Iter {
            source: self.source,
            done: false,
        }
    }
}

/// Standard iterator over a query's results.
///
/// Yields `Err` at most once; iteration ends after an error.
#[derive(Debug, Clone)]
pub struct Iter<E> {
    source: E,
    done: bool,
}

impl<E: Enumerator> Iterator for Iter<E> {
    type Item = Result<E::Item>;

    fn next(&mut self) -> Option<Result<E::Item>> {
        if self.done {
            return None;
        }
        match self.source.try_next() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            let (_, upper) = self.source.size_hint();
            (0, upper.and_then(|u| u.checked_add(1)))
        }
    }
}

impl<E: Enumerator> std::iter::FusedIterator for Iter<E> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::CaseInsensitive;

    #[derive(Debug, Clone, PartialEq)]
    struct Task {
        name: &'static str,
        priority: u8,
        done: bool,
    }

    fn sample_tasks() -> Vec<Task> {
        vec![
            Task { name: "Write docs", priority: 3, done: false },
            Task { name: "Fix bug", priority: 5, done: false },
            Task { name: "Review PR", priority: 3, done: true },
            Task { name: "Urgent Task", priority: 5, done: true },
            Task { name: "Old task", priority: 1, done: false },
        ]
    }

    fn names<'a, E: Enumerator<Item = &'a Task>>(query: Query<E>) -> Vec<&'static str> {
        query.select(|t| t.name).to_vec().unwrap()
    }

    #[test]
    fn nothing_runs_until_pulled() {
        let mut calls = 0;
        let query = Query::from_vec(vec![1, 2, 3]).select(|n| {
            calls += 1;
            n * 2
        });
        let mut cursor = query.into_cursor();
        assert!(cursor.advance().unwrap());
        drop(cursor);
        assert_eq!(calls, 1);
    }

    #[test]
    fn filter_then_order() {
        let tasks = sample_tasks();
        let query = Query::from_slice(&tasks)
            .filter(|t| !t.done)
            .order_by_desc(|t| t.priority);
        assert_eq!(names(query), vec!["Fix bug", "Write docs", "Old task"]);
    }

    #[test]
    fn order_then_by() {
        let tasks = sample_tasks();
        let query = Query::from_slice(&tasks)
            .order_by_desc(|t| t.priority)
            .then_by(|t| t.name);
        assert_eq!(
            names(query),
            vec!["Fix bug", "Urgent Task", "Review PR", "Write docs", "Old task"]
        );
    }

    #[test]
    fn then_by_with_comparer() {
        let words = vec!["b", "B", "a", "A"];
        let sorted = Query::from_vec(words)
            .order_by(|w| w.len())
            .then_by_cmp(|w| *w, CaseInsensitive)
            .to_vec()
            .unwrap();
        assert_eq!(sorted, vec!["a", "A", "b", "B"]);
    }

    #[test]
    fn order_by_ls_and_dir() {
        let sorted = Query::from_vec(vec![3, 1, 2])
            .order_by_ls(|n| *n, |a: &i32, b: &i32| a > b)
            .to_vec()
            .unwrap();
        assert_eq!(sorted, vec![3, 2, 1]);

        let sorted = Query::from_vec(vec![3, 1, 2])
            .order_by_dir(|n| *n, Dir::Desc)
            .to_vec()
            .unwrap();
        assert_eq!(sorted, vec![3, 2, 1]);
    }

    #[test]
    fn group_by_priority() {
        let tasks = sample_tasks();
        let groups: Vec<(u8, usize)> = Query::from_slice(&tasks)
            .group_by_res(|t| t.priority, |g| (*g.key(), g.len()))
            .to_vec()
            .unwrap();
        assert_eq!(groups, vec![(3, 2), (5, 2), (1, 1)]);
    }

    #[test]
    fn group_by_sel_eq() {
        let groups: Vec<(&str, Vec<usize>)> = Query::from_vec(vec!["Ab", "ab", "c", "AB"])
            .group_by_sel_eq(|s| *s, |s| s.len(), CaseInsensitive)
            .select(|g| g.into_parts())
            .to_vec()
            .unwrap();
        assert_eq!(groups, vec![("Ab", vec![2, 2, 2]), ("c", vec![1])]);
    }

    #[test]
    fn set_operations() {
        let a = vec![1, 2, 2, 3, 4];
        let b = vec![3, 4, 5];
        let union = Query::from_vec(a.clone()).union(b.clone()).to_vec().unwrap();
        assert_eq!(union, vec![1, 2, 3, 4, 5]);
        let both = Query::from_vec(a.clone()).intersect(b.clone()).to_vec().unwrap();
        assert_eq!(both, vec![3, 4]);
        let only_a = Query::from_vec(a).except(b).to_vec().unwrap();
        assert_eq!(only_a, vec![1, 2]);
    }

    #[test]
    fn set_operations_by_key() {
        let tasks = sample_tasks();
        let firsts = names(Query::from_slice(&tasks).distinct_by(|t| t.priority));
        assert_eq!(firsts, vec!["Write docs", "Fix bug", "Old task"]);

        let urgent = [&tasks[3]];
        let rest = names(Query::from_slice(&tasks).except_by(urgent, |t| t.priority));
        assert_eq!(rest, vec!["Write docs", "Old task"]);
    }

    #[test]
    fn distinct_variants() {
        let words = vec!["a", "A", "b", "a"];
        assert_eq!(
            Query::from_vec(words.clone()).distinct().to_vec().unwrap(),
            vec!["a", "A", "b"]
        );
        assert_eq!(
            Query::from_vec(words.clone()).distinct_eq(CaseInsensitive).to_vec().unwrap(),
            vec!["a", "b"]
        );
        assert_eq!(
            Query::from_vec(words).distinct_cmp(CaseInsensitive).to_vec().unwrap(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn join_and_group_join() {
        let owners = vec![(1, "ann"), (2, "bob")];
        let pets = vec![(1, "rex"), (1, "tom"), (3, "kit")];

        let pairs = Query::from_vec(owners.clone())
            .join(pets.clone(), |o| o.0, |p| p.0, |o, p| format!("{}-{}", o.1, p.1))
            .to_vec()
            .unwrap();
        assert_eq!(pairs, vec!["ann-rex", "ann-tom"]);

        let counts = Query::from_vec(owners)
            .group_join(pets, |o| o.0, |p| p.0, |o, ps| (o.1, ps.len()))
            .to_vec()
            .unwrap();
        assert_eq!(counts, vec![("ann", 2), ("bob", 0)]);
    }

    #[test]
    fn select_many_variants() {
        let flat = Query::from_vec(vec![vec![1, 2], vec![], vec![3]])
            .select_many(|v| v)
            .to_vec()
            .unwrap();
        assert_eq!(flat, vec![1, 2, 3]);

        let tagged = Query::from_vec(vec!["ab", "c"])
            .select_many_idx(|s, i| s.chars().map(|c| (i, c)).collect::<Vec<_>>())
            .to_vec()
            .unwrap();
        assert_eq!(tagged, vec![(0, 'a'), (0, 'b'), (1, 'c')]);
    }

    #[test]
    fn partitioning() {
        let q = || Query::range(1, 6).unwrap();
        assert_eq!(q().take(2).to_vec().unwrap(), vec![1, 2]);
        assert_eq!(q().skip(4).to_vec().unwrap(), vec![5, 6]);
        assert_eq!(q().take_while(|n| *n < 3).to_vec().unwrap(), vec![1, 2]);
        assert_eq!(q().skip_while_idx(|_, i| i < 5).to_vec().unwrap(), vec![6]);
        assert_eq!(q().take_last(2).to_vec().unwrap(), vec![5, 6]);
        assert_eq!(q().skip_last(4).to_vec().unwrap(), vec![1, 2]);
        assert_eq!(q().reverse().take(1).to_vec().unwrap(), vec![6]);
    }

    #[test]
    fn chunk_rejects_zero() {
        assert_eq!(Query::from_vec(vec![1]).chunk(0).err(), Some(Error::InvalidChunkSize));
        let chunks = Query::from_vec(vec![1, 2, 3]).chunk(2).unwrap().to_vec().unwrap();
        assert_eq!(chunks, vec![vec![1, 2], vec![3]]);
    }

    #[test]
    fn unbounded_sources_with_take() {
        let powers = Query::iterate(1u32, |n| n * 2).take(5).to_vec().unwrap();
        assert_eq!(powers, vec![1, 2, 4, 8, 16]);

        let mut n = 0;
        let counted = Query::from_fn(move || {
            n += 1;
            Some(n)
        })
        .skip(2)
        .take(2)
        .to_vec()
        .unwrap();
        assert_eq!(counted, vec![3, 4]);
    }

    #[test]
    fn iter_size_hint_saturates() {
        let iter = Query::iterate(0u64, |n| n + 1).take(usize::MAX).into_iter();
        assert_eq!(iter.size_hint(), (0, None));

        let mut iter = Query::from_vec(vec![1, 2]).into_iter();
        assert_eq!(iter.size_hint(), (0, Some(3)));
        assert_eq!(iter.by_ref().count(), 2);
        assert_eq!(iter.size_hint(), (0, Some(0)));
    }

    #[test]
    fn iterate_stops_stepping_at_take() {
        let bytes = Query::iterate(1u8, |n| n * 2).take(8).to_vec().unwrap();
        assert_eq!(bytes.last(), Some(&128));
    }

    #[test]
    fn combining() {
        let zipped = Query::from_vec(vec![1, 2, 3]).zip_pairs(vec!['a', 'b']).to_vec().unwrap();
        assert_eq!(zipped, vec![(1, 'a'), (2, 'b')]);

        let framed = Query::from_vec(vec![2])
            .prepend(1)
            .append(3)
            .concat(Query::repeat(4, 2).unwrap())
            .to_vec()
            .unwrap();
        assert_eq!(framed, vec![1, 2, 3, 4, 4]);

        let filled = Query::<EmptyEnumerator<i32>>::empty().default_if_empty().to_vec().unwrap();
        assert_eq!(filled, vec![0]);
    }

    #[test]
    fn cast_and_of_type() {
        let values = vec![1i64, 300, 2];
        let err = Query::from_vec(values.clone()).cast::<u8>().to_vec().unwrap_err();
        assert!(matches!(err, Error::InvalidCast { .. }));
        let fits = Query::from_vec(values).of_type::<u8>().to_vec().unwrap();
        assert_eq!(fits, vec![1, 2]);
    }

    #[test]
    fn reusable_query_restarts() {
        let data = [3, 1, 2];
        let query = Query::from_slice(&data).order();
        let mut first = query.cursor();
        assert!(first.advance().unwrap());
        assert_eq!(first.current(), Some(&&1));

        let second = Query::new(query.enumerate()).to_vec().unwrap();
        assert_eq!(second, vec![&1, &2, &3]);
        assert!(first.advance().unwrap());
        assert_eq!(first.current(), Some(&&2));
    }

    #[test]
    fn std_iterator_interop() {
        let total: Result<i32> = Query::from_vec(vec![1, 2, 3]).into_iter().sum();
        assert_eq!(total, Ok(6));

        let mut iter = Query::from_vec(vec![1i64, 500]).cast::<u8>().into_iter();
        assert_eq!(iter.next(), Some(Ok(1)));
        assert!(matches!(iter.next(), Some(Err(Error::InvalidCast { .. }))));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn boxed_erases_type() {
        let queries: Vec<Query<Box<dyn Enumerator<Item = i32>>>> = vec![
            Query::from_vec(vec![1, 2]).boxed(),
            Query::from_vec(vec![3, 4]).filter(|n| n % 2 == 0).boxed(),
        ];
        let sums: Vec<i32> = queries.into_iter().map(|q| q.sum().unwrap()).collect();
        assert_eq!(sums, vec![3, 4]);
    }
}
