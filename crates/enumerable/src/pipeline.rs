//! Stateless pipeline stages.
//!
//! Each stage wraps an upstream enumerator and transforms elements one at a
//! time as they are pulled. None of them buffer more than a single element,
//! so they are safe to compose with unbounded sources.

use std::marker::PhantomData;

use crate::enumerator::{Enumerator, IntoEnumerator};
use crate::error::{Error, Result};

/// Drains an enumerator into a vector.
pub(crate) fn drain_all<E: Enumerator>(mut source: E) -> Result<Vec<E::Item>> {
    let (lower, _) = source.size_hint();
    let mut buffer = Vec::with_capacity(lower);
    while let Some(item) = source.try_next()? {
        buffer.push(item);
    }
    Ok(buffer)
}

/// Lifecycle of a stage that buffers its whole input on the first pull.
#[derive(Clone)]
pub(crate) enum Stage<S, T> {
    Pending(S),
    Draining(std::vec::IntoIter<T>),
    Done,
}

impl<S, T> Stage<S, T> {
    /// Runs `fill` on the first pull, then yields from the buffer it returned.
    ///
    /// If `fill` fails the stage is left exhausted.
    pub(crate) fn pull(&mut self, fill: impl FnOnce(S) -> Result<Vec<T>>) -> Result<Option<T>> {
        if matches!(self, Stage::Pending(_)) {
            if let Stage::Pending(state) = std::mem::replace(self, Stage::Done) {
                *self = Stage::Draining(fill(state)?.into_iter());
            }
        }
        match self {
            Stage::Draining(buffer) => {
                let next = buffer.next();
                if next.is_none() {
                    *self = Stage::Done;
                }
                Ok(next)
            }
            Stage::Pending(_) | Stage::Done => Ok(None),
        }
    }

    pub(crate) fn size_hint(&self) -> Option<(usize, Option<usize>)> {
        match self {
            Stage::Pending(_) => None,
            Stage::Draining(buffer) => Some(buffer.size_hint()),
            Stage::Done => Some((0, Some(0))),
        }
    }
}

/// A predicate over an element and its zero-based index.
///
/// Lets `take_while`/`skip_while` share one stage for the plain and the
/// index-aware form.
pub trait ElementPredicate<T> {
    /// Tests the element at `index`.
    fn test(&mut self, item: &T, index: usize) -> bool;
}

/// Adapts `FnMut(&T) -> bool`, ignoring the index.
#[derive(Clone)]
pub struct Plain<P>(pub(crate) P);

impl<T, P: FnMut(&T) -> bool> ElementPredicate<T> for Plain<P> {
    fn test(&mut self, item: &T, _index: usize) -> bool {
        (self.0)(item)
    }
}

/// Adapts `FnMut(&T, usize) -> bool`.
#[derive(Clone)]
pub struct WithIndex<P>(pub(crate) P);

impl<T, P: FnMut(&T, usize) -> bool> ElementPredicate<T> for WithIndex<P> {
    fn test(&mut self, item: &T, index: usize) -> bool {
        (self.0)(item, index)
    }
}

/// Forwards elements satisfying a predicate. Built by `Query::filter`.
#[derive(Clone)]
pub struct Filter<E, P> {
    source: E,
    predicate: P,
}

impl<E, P> Filter<E, P> {
    pub(crate) fn new(source: E, predicate: P) -> Self {
        Filter { source, predicate }
    }
}

impl<E, P> Enumerator for Filter<E, P>
where
    E: Enumerator,
    P: FnMut(&E::Item) -> bool,
{
    type Item = E::Item;

    fn try_next(&mut self) -> Result<Option<E::Item>> {
        while let Some(item) = self.source.try_next()? {
            if (self.predicate)(&item) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.source.size_hint().1)
    }
}

/// [`Filter`] with the zero-based upstream index passed to the predicate.
#[derive(Clone)]
pub struct FilterIdx<E, P> {
    source: E,
    predicate: P,
    index: usize,
}

impl<E, P> FilterIdx<E, P> {
    pub(crate) fn new(source: E, predicate: P) -> Self {
        FilterIdx {
            source,
            predicate,
            index: 0,
        }
    }
}

impl<E, P> Enumerator for FilterIdx<E, P>
where
    E: Enumerator,
    P: FnMut(&E::Item, usize) -> bool,
{
    type Item = E::Item;

    fn try_next(&mut self) -> Result<Option<E::Item>> {
        while let Some(item) = self.source.try_next()? {
            let index = self.index;
            self.index += 1;
            if (self.predicate)(&item, index) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.source.size_hint().1)
    }
}

/// Projects each element. Built by `Query::select`.
#[derive(Clone)]
pub struct Select<E, F> {
    source: E,
    selector: F,
}

impl<E, F> Select<E, F> {
    pub(crate) fn new(source: E, selector: F) -> Self {
        Select { source, selector }
    }
}

impl<E, F, U> Enumerator for Select<E, F>
where
    E: Enumerator,
    F: FnMut(E::Item) -> U,
{
    type Item = U;

    fn try_next(&mut self) -> Result<Option<U>> {
        Ok(self.source.try_next()?.map(&mut self.selector))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}

/// [`Select`] with a zero-based running index.
#[derive(Clone)]
pub struct SelectIdx<E, F> {
    source: E,
    selector: F,
    index: usize,
}

impl<E, F> SelectIdx<E, F> {
    pub(crate) fn new(source: E, selector: F) -> Self {
        SelectIdx {
            source,
            selector,
            index: 0,
        }
    }
}

impl<E, F, U> Enumerator for SelectIdx<E, F>
where
    E: Enumerator,
    F: FnMut(E::Item, usize) -> U,
{
    type Item = U;

    fn try_next(&mut self) -> Result<Option<U>> {
        match self.source.try_next()? {
            Some(item) => {
                let index = self.index;
                self.index += 1;
                Ok(Some((self.selector)(item, index)))
            }
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}

/// Flattens one level of nesting. Built by `Query::select_many`.
///
/// Each inner sequence is drained before the next outer element is pulled.
pub struct SelectMany<E, F, I: IntoEnumerator> {
    source: E,
    selector: F,
    inner: Option<I::IntoEnum>,
}

impl<E, F, I: IntoEnumerator> SelectMany<E, F, I> {
    pub(crate) fn new(source: E, selector: F) -> Self {
        SelectMany {
            source,
            selector,
            inner: None,
        }
    }
}

impl<E: Clone, F: Clone, I> Clone for SelectMany<E, F, I>
where
    I: IntoEnumerator,
    I::IntoEnum: Clone,
{
    fn clone(&self) -> Self {
        SelectMany {
            source: self.source.clone(),
            selector: self.selector.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<E, F, I> Enumerator for SelectMany<E, F, I>
where
    E: Enumerator,
    F: FnMut(E::Item) -> I,
    I: IntoEnumerator,
{
    type Item = I::Item;

    fn try_next(&mut self) -> Result<Option<I::Item>> {
        loop {
            if let Some(inner) = &mut self.inner {
                if let Some(item) = inner.try_next()? {
                    return Ok(Some(item));
                }
                self.inner = None;
            }
            match self.source.try_next()? {
                Some(outer) => self.inner = Some((self.selector)(outer).into_enumerator()),
                None => return Ok(None),
            }
        }
    }
}

/// Flattens with a result selector that also sees the outer element.
/// Built by `Query::select_many_res`.
pub struct SelectManyRes<E: Enumerator, F, I: IntoEnumerator, R> {
    source: E,
    collection: F,
    result: R,
    current: Option<(E::Item, I::IntoEnum)>,
}

impl<E: Enumerator, F, I: IntoEnumerator, R> SelectManyRes<E, F, I, R> {
    pub(crate) fn new(source: E, collection: F, result: R) -> Self {
        SelectManyRes {
            source,
            collection,
            result,
            current: None,
        }
    }
}

impl<E, F, I, R> Clone for SelectManyRes<E, F, I, R>
where
    E: Enumerator + Clone,
    E::Item: Clone,
    F: Clone,
    I: IntoEnumerator,
    I::IntoEnum: Clone,
    R: Clone,
{
    fn clone(&self) -> Self {
        SelectManyRes {
            source: self.source.clone(),
            collection: self.collection.clone(),
            result: self.result.clone(),
            current: self.current.clone(),
        }
    }
}

impl<E, F, I, R, U> Enumerator for SelectManyRes<E, F, I, R>
where
    E: Enumerator,
    F: FnMut(&E::Item) -> I,
    I: IntoEnumerator,
    R: FnMut(&E::Item, I::Item) -> U,
{
    type Item = U;

    fn try_next(&mut self) -> Result<Option<U>> {
        loop {
            if let Some((outer, inner)) = &mut self.current {
                if let Some(item) = inner.try_next()? {
                    return Ok(Some((self.result)(&*outer, item)));
                }
                self.current = None;
            }
            match self.source.try_next()? {
                Some(outer) => {
                    let inner = (self.collection)(&outer).into_enumerator();
                    self.current = Some((outer, inner));
                }
                None => return Ok(None),
            }
        }
    }
}

/// Forwards at most `n` elements. Built by `Query::take`.
#[derive(Clone)]
pub struct Take<E> {
    source: E,
    remaining: usize,
}

impl<E> Take<E> {
    pub(crate) fn new(source: E, n: usize) -> Self {
        Take {
            source,
            remaining: n,
        }
    }
}

impl<E: Enumerator> Enumerator for Take<E> {
    type Item = E::Item;

    fn try_next(&mut self) -> Result<Option<E::Item>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        let next = self.source.try_next()?;
        match next {
            Some(_) => self.remaining -= 1,
            None => self.remaining = 0,
        }
        Ok(next)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.source.size_hint();
        let upper = upper.map_or(self.remaining, |u| u.min(self.remaining));
        (lower.min(self.remaining), Some(upper))
    }
}

/// Drops the first `n` elements. Built by `Query::skip`.
#[derive(Clone)]
pub struct Skip<E> {
    source: E,
    remaining: usize,
}

impl<E> Skip<E> {
    pub(crate) fn new(source: E, n: usize) -> Self {
        Skip {
            source,
            remaining: n,
        }
    }
}

impl<E: Enumerator> Enumerator for Skip<E> {
    type Item = E::Item;

    fn try_next(&mut self) -> Result<Option<E::Item>> {
        while self.remaining > 0 {
            self.remaining -= 1;
            if self.source.try_next()?.is_none() {
                self.remaining = 0;
                return Ok(None);
            }
        }
        self.source.try_next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.source.size_hint();
        (
            lower.saturating_sub(self.remaining),
            upper.map(|u| u.saturating_sub(self.remaining)),
        )
    }
}

/// Forwards elements until the predicate first fails.
///
/// The predicate is not consulted again after it fails once.
#[derive(Clone)]
pub struct TakeWhile<E, P> {
    source: E,
    predicate: P,
    index: usize,
    done: bool,
}

impl<E, P> TakeWhile<E, P> {
    pub(crate) fn new(source: E, predicate: P) -> Self {
        TakeWhile {
            source,
            predicate,
            index: 0,
            done: false,
        }
    }
}

impl<E, P> Enumerator for TakeWhile<E, P>
where
    E: Enumerator,
    P: ElementPredicate<E::Item>,
{
    type Item = E::Item;

    fn try_next(&mut self) -> Result<Option<E::Item>> {
        if self.done {
            return Ok(None);
        }
        match self.source.try_next()? {
            Some(item) => {
                let index = self.index;
                self.index += 1;
                if self.predicate.test(&item, index) {
                    Ok(Some(item))
                } else {
                    self.done = true;
                    Ok(None)
                }
            }
            None => {
                self.done = true;
                Ok(None)
            }
        }
    }
}

/// Drops elements until the predicate first fails, then forwards the rest.
///
/// The predicate is not consulted again after it fails once.
#[derive(Clone)]
pub struct SkipWhile<E, P> {
    source: E,
    predicate: P,
    index: usize,
    skipping: bool,
}

impl<E, P> SkipWhile<E, P> {
    pub(crate) fn new(source: E, predicate: P) -> Self {
        SkipWhile {
            source,
            predicate,
            index: 0,
            skipping: true,
        }
    }
}

impl<E, P> Enumerator for SkipWhile<E, P>
where
    E: Enumerator,
    P: ElementPredicate<E::Item>,
{
    type Item = E::Item;

    fn try_next(&mut self) -> Result<Option<E::Item>> {
        if !self.skipping {
            return self.source.try_next();
        }
        while let Some(item) = self.source.try_next()? {
            let index = self.index;
            self.index += 1;
            if !self.predicate.test(&item, index) {
                self.skipping = false;
                return Ok(Some(item));
            }
        }
        Ok(None)
    }
}

/// Pairs two sequences in lockstep. Built by `Query::zip`.
///
/// Ends as soon as either side is exhausted; the longer side is not drained.
#[derive(Clone)]
pub struct Zip<A, B, F> {
    first: A,
    second: B,
    selector: F,
    done: bool,
}

impl<A, B, F> Zip<A, B, F> {
    pub(crate) fn new(first: A, second: B, selector: F) -> Self {
        Zip {
            first,
            second,
            selector,
            done: false,
        }
    }
}

impl<A, B, F, U> Enumerator for Zip<A, B, F>
where
    A: Enumerator,
    B: Enumerator,
    F: FnMut(A::Item, B::Item) -> U,
{
    type Item = U;

    fn try_next(&mut self) -> Result<Option<U>> {
        if self.done {
            return Ok(None);
        }
        let Some(a) = self.first.try_next()? else {
            self.done = true;
            return Ok(None);
        };
        let Some(b) = self.second.try_next()? else {
            self.done = true;
            return Ok(None);
        };
        Ok(Some((self.selector)(a, b)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (a_lower, a_upper) = self.first.size_hint();
        let (b_lower, b_upper) = self.second.size_hint();
        let upper = match (a_upper, b_upper) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        (a_lower.min(b_lower), upper)
    }
}

/// Drains the first sequence, then the second. Built by `Query::concat`.
#[derive(Clone)]
pub struct Concat<A, B> {
    first: A,
    second: B,
    first_done: bool,
}

impl<A, B> Concat<A, B> {
    pub(crate) fn new(first: A, second: B) -> Self {
        Concat {
            first,
            second,
            first_done: false,
        }
    }
}

impl<A, B> Enumerator for Concat<A, B>
where
    A: Enumerator,
    B: Enumerator<Item = A::Item>,
{
    type Item = A::Item;

    fn try_next(&mut self) -> Result<Option<A::Item>> {
        if !self.first_done {
            if let Some(item) = self.first.try_next()? {
                return Ok(Some(item));
            }
            self.first_done = true;
        }
        self.second.try_next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (a_lower, a_upper) = self.first.size_hint();
        let (b_lower, b_upper) = self.second.size_hint();
        let upper = match (a_upper, b_upper) {
            (Some(a), Some(b)) => a.checked_add(b),
            _ => None,
        };
        (a_lower.saturating_add(b_lower), upper)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefaultState {
    Start,
    Passthrough,
    Done,
}

/// Yields a single default element when the upstream is empty.
/// Built by `Query::default_if_empty`.
#[derive(Clone)]
pub struct DefaultIfEmpty<E: Enumerator> {
    source: E,
    default: Option<E::Item>,
    state: DefaultState,
}

impl<E: Enumerator> DefaultIfEmpty<E> {
    pub(crate) fn new(source: E, default: E::Item) -> Self {
        DefaultIfEmpty {
            source,
            default: Some(default),
            state: DefaultState::Start,
        }
    }
}

impl<E: Enumerator> Enumerator for DefaultIfEmpty<E> {
    type Item = E::Item;

    fn try_next(&mut self) -> Result<Option<E::Item>> {
        match self.state {
            DefaultState::Start => match self.source.try_next()? {
                Some(item) => {
                    self.state = DefaultState::Passthrough;
                    self.default = None;
                    Ok(Some(item))
                }
                None => {
                    self.state = DefaultState::Done;
                    Ok(self.default.take())
                }
            },
            DefaultState::Passthrough => self.source.try_next(),
            DefaultState::Done => Ok(None),
        }
    }
}

/// Converts each element with [`TryFrom`], failing on the first element that
/// does not convert. Built by `Query::cast`.
pub struct Cast<E, U> {
    source: E,
    _target: PhantomData<fn() -> U>,
}

impl<E, U> Cast<E, U> {
    pub(crate) fn new(source: E) -> Self {
        Cast {
            source,
            _target: PhantomData,
        }
    }
}

impl<E: Clone, U> Clone for Cast<E, U> {
    fn clone(&self) -> Self {
        Cast::new(self.source.clone())
    }
}

impl<E, U> Enumerator for Cast<E, U>
where
    E: Enumerator,
    U: TryFrom<E::Item>,
{
    type Item = U;

    fn try_next(&mut self) -> Result<Option<U>> {
        match self.source.try_next()? {
            Some(item) => U::try_from(item)
                .map(Some)
                .map_err(|_| Error::cast::<E::Item, U>()),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}

/// Keeps only the elements that convert with [`TryFrom`].
/// Built by `Query::of_type`.
pub struct OfType<E, U> {
    source: E,
    _target: PhantomData<fn() -> U>,
}

impl<E, U> OfType<E, U> {
    pub(crate) fn new(source: E) -> Self {
        OfType {
            source,
            _target: PhantomData,
        }
    }
}

impl<E: Clone, U> Clone for OfType<E, U> {
    fn clone(&self) -> Self {
        OfType::new(self.source.clone())
    }
}

impl<E, U> Enumerator for OfType<E, U>
where
    E: Enumerator,
    U: TryFrom<E::Item>,
{
    type Item = U;

    fn try_next(&mut self) -> Result<Option<U>> {
        while let Some(item) = self.source.try_next()? {
            if let Ok(converted) = U::try_from(item) {
                return Ok(Some(converted));
            }
        }
        Ok(None)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.source.size_hint().1)
    }
}

/// Groups consecutive elements into vectors of at most `size`.
/// Built by `Query::chunk`.
#[derive(Clone)]
pub struct Chunk<E> {
    source: E,
    size: usize,
    done: bool,
}

impl<E> Chunk<E> {
    pub(crate) fn new(source: E, size: usize) -> Self {
        Chunk {
            source,
            size,
            done: false,
        }
    }
}

impl<E: Enumerator> Enumerator for Chunk<E> {
    type Item = Vec<E::Item>;

    fn try_next(&mut self) -> Result<Option<Vec<E::Item>>> {
        if self.done {
            return Ok(None);
        }
        let mut chunk = Vec::with_capacity(self.size);
        while chunk.len() < self.size {
            match self.source.try_next()? {
                Some(item) => chunk.push(item),
                None => {
                    self.done = true;
                    break;
                }
            }
        }
        if chunk.is_empty() {
            Ok(None)
        } else {
            Ok(Some(chunk))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FromFn, IterEnumerator};

    fn src(values: Vec<i32>) -> IterEnumerator<std::vec::IntoIter<i32>> {
        IterEnumerator::new(values)
    }

    fn drain<E: Enumerator>(mut e: E) -> Vec<E::Item> {
        let mut out = Vec::new();
        while let Some(item) = e.try_next().unwrap() {
            out.push(item);
        }
        out
    }

    #[test]
    fn filter_keeps_order() {
        let e = Filter::new(src(vec![1, 2, 3, 4, 5, 6]), |n: &i32| n % 2 == 0);
        assert_eq!(drain(e), vec![2, 4, 6]);
    }

    #[test]
    fn filter_idx_sees_upstream_index() {
        let e = FilterIdx::new(src(vec![10, 20, 30, 40]), |_: &i32, i: usize| i % 2 == 1);
        assert_eq!(drain(e), vec![20, 40]);
    }

    #[test]
    fn select_idx_counts_from_zero() {
        let e = SelectIdx::new(src(vec![7, 8]), |n: i32, i: usize| (i, n));
        assert_eq!(drain(e), vec![(0, 7), (1, 8)]);
    }

    #[test]
    fn select_many_drains_each_inner() {
        let e = SelectMany::new(src(vec![1, 0, 3]), |n: i32| vec![n; n as usize]);
        assert_eq!(drain(e), vec![1, 3, 3, 3]);
    }

    #[test]
    fn select_many_res_sees_outer() {
        let e = SelectManyRes::new(
            src(vec![1, 2]),
            |n: &i32| vec!['a'; *n as usize],
            |n: &i32, c: char| format!("{n}{c}"),
        );
        assert_eq!(drain(e), vec!["1a", "2a", "2a"]);
    }

    #[test]
    fn take_and_skip_bounds() {
        assert_eq!(drain(Take::new(src(vec![1, 2, 3]), 2)), vec![1, 2]);
        assert_eq!(drain(Take::new(src(vec![1, 2, 3]), 0)), Vec::<i32>::new());
        assert_eq!(drain(Take::new(src(vec![1]), 5)), vec![1]);
        assert_eq!(drain(Skip::new(src(vec![1, 2, 3]), 2)), vec![3]);
        assert_eq!(drain(Skip::new(src(vec![1, 2, 3]), 0)), vec![1, 2, 3]);
        assert_eq!(drain(Skip::new(src(vec![1, 2, 3]), 9)), Vec::<i32>::new());
    }

    #[test]
    fn take_does_not_pull_past_limit() {
        let mut pulled = 0;
        let counting = FromFn::new(|| {
            pulled += 1;
            Some(pulled)
        });
        assert_eq!(drain(Take::new(counting, 3)), vec![1, 2, 3]);
        assert_eq!(pulled, 3);
    }

    #[test]
    fn take_while_never_retests() {
        let e = TakeWhile::new(src(vec![1, 2, 5, 1, 2]), Plain(|n: &i32| *n < 3));
        assert_eq!(drain(e), vec![1, 2]);
    }

    #[test]
    fn skip_while_never_retests() {
        let e = SkipWhile::new(src(vec![1, 2, 5, 1, 2]), Plain(|n: &i32| *n < 3));
        assert_eq!(drain(e), vec![5, 1, 2]);
    }

    #[test]
    fn take_while_with_index() {
        let e = TakeWhile::new(src(vec![5, 5, 5, 5]), WithIndex(|_: &i32, i: usize| i < 2));
        assert_eq!(drain(e), vec![5, 5]);
    }

    #[test]
    fn stage_fills_once() {
        let mut fills = 0;
        let mut stage: Stage<Vec<i32>, i32> = Stage::Pending(vec![3, 1, 2]);
        let mut out = Vec::new();
        while let Some(n) = stage
            .pull(|mut v| {
                fills += 1;
                v.sort();
                Ok(v)
            })
            .unwrap()
        {
            out.push(n);
        }
        assert_eq!(out, vec![1, 2, 3]);
        assert_eq!(fills, 1);
        assert_eq!(stage.size_hint(), Some((0, Some(0))));
    }

    #[test]
    fn stage_failed_fill_is_exhausted() {
        let mut stage: Stage<(), i32> = Stage::Pending(());
        assert_eq!(stage.pull(|_| Err(Error::NoElements)), Err(Error::NoElements));
        assert_eq!(stage.pull(|_| Ok(vec![1])), Ok(None));
    }

    #[test]
    fn zip_stops_at_shorter() {
        let e = Zip::new(src(vec![1, 2, 3]), src(vec![10, 20]), |a: i32, b: i32| a + b);
        assert_eq!(drain(e), vec![11, 22]);
    }

    #[test]
    fn concat_in_order() {
        let e = Concat::new(src(vec![1, 2]), src(vec![3]));
        assert_eq!(e.size_hint(), (3, Some(3)));
        assert_eq!(drain(e), vec![1, 2, 3]);
    }

    #[test]
    fn default_if_empty() {
        assert_eq!(drain(DefaultIfEmpty::new(src(vec![]), 9)), vec![9]);
        assert_eq!(drain(DefaultIfEmpty::new(src(vec![1, 2]), 9)), vec![1, 2]);

        let mut e = DefaultIfEmpty::new(src(vec![]), 9);
        assert_eq!(e.try_next().unwrap(), Some(9));
        assert_eq!(e.try_next().unwrap(), None);
        assert_eq!(e.try_next().unwrap(), None);
    }

    #[test]
    fn cast_fails_at_offending_element() {
        let mut e: Cast<_, u8> = Cast::new(src(vec![1, 300, 2]));
        assert_eq!(e.try_next().unwrap(), Some(1u8));
        assert_eq!(e.try_next().unwrap_err(), Error::cast::<i32, u8>());
    }

    #[test]
    fn of_type_drops_failures() {
        let e: OfType<_, u8> = OfType::new(src(vec![1, -1, 300, 2]));
        assert_eq!(drain(e), vec![1u8, 2]);
    }

    #[test]
    fn chunk_last_may_be_short() {
        let e = Chunk::new(src(vec![1, 2, 3, 4, 5]), 2);
        assert_eq!(drain(e), vec![vec![1, 2], vec![3, 4], vec![5]]);
    }
}
