//! Source enumerators.
//!
//! Sources adapt an in-memory container or a generator function to the
//! [`Enumerator`] protocol. They are the leaves of every pipeline.

use crate::enumerator::Enumerator;
use crate::error::{Error, Result};

/// Iterates a borrowed slice by index.
#[derive(Debug)]
pub struct SliceEnumerator<'a, T> {
    items: &'a [T],
    index: usize,
}

impl<'a, T> SliceEnumerator<'a, T> {
    pub(crate) fn new(items: &'a [T]) -> Self {
        SliceEnumerator { items, index: 0 }
    }
}

impl<T> Clone for SliceEnumerator<'_, T> {
    fn clone(&self) -> Self {
        SliceEnumerator {
            items: self.items,
            index: self.index,
        }
    }
}

impl<'a, T> Enumerator for SliceEnumerator<'a, T> {
    type Item = &'a T;

    fn try_next(&mut self) -> Result<Option<&'a T>> {
        if self.index < self.items.len() {
            let item = &self.items[self.index];
            self.index += 1;
            Ok(Some(item))
        } else {
            Ok(None)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.items.len() - self.index;
        (remaining, Some(remaining))
    }
}

/// Adapts a standard iterator.
///
/// The iterator is fused so exhaustion stays sticky even for iterators that
/// would resume after returning `None`.
#[derive(Debug, Clone)]
pub struct IterEnumerator<I> {
    iter: std::iter::Fuse<I>,
}

impl<I: Iterator> IterEnumerator<I> {
    pub(crate) fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
        IterEnumerator {
            iter: iter.into_iter().fuse(),
        }
    }
}

impl<I: Iterator> Enumerator for IterEnumerator<I> {
    type Item = I::Item;

    fn try_next(&mut self) -> Result<Option<I::Item>> {
        Ok(self.iter.next())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// `count` consecutive integers starting at `start`.
#[derive(Debug, Clone)]
pub struct RangeEnumerator {
    next: i64,
    remaining: u64,
}

impl RangeEnumerator {
    /// Validates the range up front: a negative count, or a last element past
    /// `i64::MAX`, is rejected before anything is pulled.
    pub(crate) fn new(start: i64, count: i64) -> Result<Self> {
        if count < 0 {
            return Err(Error::NegativeCount {
                name: "count",
                count,
            });
        }
        if count > 0 && start.checked_add(count - 1).is_none() {
            return Err(Error::RangeOverflow { start, count });
        }
        Ok(RangeEnumerator {
            next: start,
            remaining: count as u64,
        })
    }
}

impl Enumerator for RangeEnumerator {
    type Item = i64;

    fn try_next(&mut self) -> Result<Option<i64>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        let current = self.next;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.next += 1;
        }
        Ok(Some(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

/// One value repeated `count` times.
#[derive(Debug, Clone)]
pub struct RepeatEnumerator<T> {
    value: T,
    remaining: u64,
}

impl<T: Clone> RepeatEnumerator<T> {
    pub(crate) fn new(value: T, count: i64) -> Result<Self> {
        let remaining = u64::try_from(count).map_err(|_| Error::NegativeCount {
            name: "count",
            count,
        })?;
        Ok(RepeatEnumerator { value, remaining })
    }
}

impl<T: Clone> Enumerator for RepeatEnumerator<T> {
    type Item = T;

    fn try_next(&mut self) -> Result<Option<T>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        Ok(Some(self.value.clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

/// An enumerator with no elements.
#[derive(Debug)]
pub struct EmptyEnumerator<T> {
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T> EmptyEnumerator<T> {
    pub(crate) fn new() -> Self {
        EmptyEnumerator {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T> Clone for EmptyEnumerator<T> {
    fn clone(&self) -> Self {
        EmptyEnumerator::new()
    }
}

impl<T> Enumerator for EmptyEnumerator<T> {
    type Item = T;

    fn try_next(&mut self) -> Result<Option<T>> {
        Ok(None)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(0))
    }
}

/// A generator driven by a closure.
///
/// The generator ends the first time the closure returns `None` and is never
/// called again after that. Its state lives in the closure, so a clone taken
/// mid-pass continues from the same point rather than restarting.
#[derive(Clone)]
pub struct FromFn<F> {
    generator: F,
    done: bool,
}

impl<T, F> FromFn<F>
where
    F: FnMut() -> Option<T>,
{
    pub(crate) fn new(generator: F) -> Self {
        FromFn {
            generator,
            done: false,
        }
    }
}

impl<T, F> Enumerator for FromFn<F>
where
    F: FnMut() -> Option<T>,
{
    type Item = T;

    fn try_next(&mut self) -> Result<Option<T>> {
        if self.done {
            return Ok(None);
        }
        let next = (self.generator)();
        if next.is_none() {
            self.done = true;
        }
        Ok(next)
    }
}

/// An unbounded sequence `seed, step(seed), step(step(seed)), ...`.
///
/// `step` runs on the previously yielded element only when the following
/// element is pulled.
#[derive(Clone)]
pub struct Iterate<T, F> {
    last: T,
    started: bool,
    step: F,
}

impl<T, F> Iterate<T, F>
where
    T: Clone,
    F: FnMut(&T) -> T,
{
    pub(crate) fn new(seed: T, step: F) -> Self {
        Iterate {
            last: seed,
            started: false,
            step,
        }
    }
}

impl<T, F> Enumerator for Iterate<T, F>
where
    T: Clone,
    F: FnMut(&T) -> T,
{
    type Item = T;

    fn try_next(&mut self) -> Result<Option<T>> {
        if self.started {
            self.last = (self.step)(&self.last);
        } else {
            self.started = true;
        }
        Ok(Some(self.last.clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
