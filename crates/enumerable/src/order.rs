//! Ordering stages.
//!
//! [`Ordered`] is produced by `order`/`order_by` and friends. It reads its
//! source to the end on the first pull and performs a single stable sort.
//! Tie-breakers added with `then_by` compose into the comparer before
//! anything is pulled, so a chain of keys is still one sort and equal
//! elements keep their original order.
//!
//! ```
//! use enumerable::Query;
//!
//! let people = vec![("bo", 31), ("al", 25), ("cy", 31), ("di", 25)];
//! let sorted = Query::from_vec(people)
//!     .order_by_desc(|p| p.1)
//!     .then_by(|p| p.0)
//!     .to_vec()
//!     .unwrap();
//!
//! assert_eq!(sorted, vec![("bo", 31), ("cy", 31), ("al", 25), ("di", 25)]);
//! ```

use std::collections::VecDeque;

use tracing::trace;

use crate::compare::{Comparer, ThenComparer};
use crate::enumerator::Enumerator;
use crate::error::Result;
use crate::pipeline::{drain_all, Stage};

/// A stably sorted view of its source.
#[derive(Clone)]
pub struct Ordered<E: Enumerator, C> {
    stage: Stage<E, E::Item>,
    comparer: C,
}

impl<E: Enumerator, C> Ordered<E, C> {
    pub(crate) fn new(source: E, comparer: C) -> Self {
        Ordered {
            stage: Stage::Pending(source),
            comparer,
        }
    }

    /// Appends a tie-breaker consulted when the current comparer ranks two
    /// elements equal.
    pub(crate) fn then<C2>(self, secondary: C2) -> Ordered<E, ThenComparer<C, C2>> {
        Ordered {
            stage: self.stage,
            comparer: ThenComparer::new(self.comparer, secondary),
        }
    }
}

impl<E, C> Enumerator for Ordered<E, C>
where
    E: Enumerator,
    C: Comparer<E::Item>,
{
    type Item = E::Item;

    fn try_next(&mut self) -> Result<Option<E::Item>> {
        let comparer = &self.comparer;
        self.stage.pull(|source| {
            let mut buffer = drain_all(source)?;
            buffer.sort_by(|a, b| comparer.compare(a, b));
            trace!(elements = buffer.len(), "sorted buffer");
            Ok(buffer)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.stage.size_hint().unwrap_or((0, None))
    }
}

/// Yields its source back to front. Built by `Query::reverse`.
#[derive(Clone)]
pub struct Reverse<E: Enumerator> {
    stage: Stage<E, E::Item>,
}

impl<E: Enumerator> Reverse<E> {
    pub(crate) fn new(source: E) -> Self {
        Reverse {
            stage: Stage::Pending(source),
        }
    }
}

impl<E: Enumerator> Enumerator for Reverse<E> {
    type Item = E::Item;

    fn try_next(&mut self) -> Result<Option<E::Item>> {
        self.stage.pull(|source| {
            let mut buffer = drain_all(source)?;
            buffer.reverse();
            trace!(elements = buffer.len(), "reversed buffer");
            Ok(buffer)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.stage.size_hint().unwrap_or((0, None))
    }
}

/// The last `n` elements of its source. Built by `Query::take_last`.
#[derive(Clone)]
pub struct TakeLast<E: Enumerator> {
    stage: Stage<E, E::Item>,
    n: usize,
}

impl<E: Enumerator> TakeLast<E> {
    pub(crate) fn new(source: E, n: usize) -> Self {
        TakeLast {
            stage: Stage::Pending(source),
            n,
        }
    }
}

impl<E: Enumerator> Enumerator for TakeLast<E> {
    type Item = E::Item;

    fn try_next(&mut self) -> Result<Option<E::Item>> {
        let n = self.n;
        self.stage.pull(|mut source| {
            let mut window = VecDeque::with_capacity(n);
            if n > 0 {
                while let Some(item) = source.try_next()? {
                    if window.len() == n {
                        window.pop_front();
                    }
                    window.push_back(item);
                }
            }
            Ok(window.into())
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.stage.size_hint().unwrap_or((0, Some(self.n)))
    }
}

/// Everything but the last `n` elements of its source.
///
/// Streams with a delay of `n` elements rather than buffering the whole
/// source. Built by `Query::skip_last`.
#[derive(Clone)]
pub struct SkipLast<E: Enumerator> {
    source: E,
    window: VecDeque<E::Item>,
    n: usize,
}

impl<E: Enumerator> SkipLast<E> {
    pub(crate) fn new(source: E, n: usize) -> Self {
        SkipLast {
            source,
            window: VecDeque::with_capacity(n.saturating_add(1).min(1024)),
            n,
        }
    }
}

impl<E: Enumerator> Enumerator for SkipLast<E> {
    type Item = E::Item;

    fn try_next(&mut self) -> Result<Option<E::Item>> {
        while let Some(item) = self.source.try_next()? {
            self.window.push_back(item);
            if self.window.len() > self.n {
                return Ok(self.window.pop_front());
            }
        }
        self.window.clear();
        Ok(None)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.source.size_hint();
        let buffered = self.window.len();
        let lower = lower.saturating_add(buffered).saturating_sub(self.n);
        let upper = upper.and_then(|u| u.checked_add(buffered)).map(|u| u.saturating_sub(self.n));
        (lower, upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{KeyComparer, NaturalOrder, Reversed};
    use crate::enumerator::IntoEnumerator;
    use crate::Dir;

    fn drain<E: Enumerator>(mut e: E) -> Vec<E::Item> {
        let mut out = Vec::new();
        while let Some(item) = e.try_next().unwrap() {
            out.push(item);
        }
        out
    }

    #[test]
    fn sorts_on_first_pull() {
        let e = Ordered::new(vec![3, 1, 2].into_enumerator(), NaturalOrder);
        assert_eq!(drain(e), vec![1, 2, 3]);
    }

    #[test]
    fn sort_is_stable() {
        let pairs = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')];
        let by_first = KeyComparer::new(|p: &(i32, char)| p.0, NaturalOrder, Dir::Asc);
        let e = Ordered::new(pairs.into_enumerator(), by_first);
        assert_eq!(drain(e), vec![(1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
    }

    #[test]
    fn then_breaks_ties() {
        let pairs = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')];
        let by_first = KeyComparer::new(|p: &(i32, char)| p.0, NaturalOrder, Dir::Asc);
        let by_second = KeyComparer::new(|p: &(i32, char)| p.1, NaturalOrder, Dir::Desc);
        let e = Ordered::new(pairs.into_enumerator(), by_first).then(by_second);
        assert_eq!(drain(e), vec![(1, 'd'), (1, 'b'), (2, 'c'), (2, 'a')]);
    }

    #[test]
    fn descending() {
        let e = Ordered::new(vec![3, 1, 2].into_enumerator(), Reversed(NaturalOrder));
        assert_eq!(drain(e), vec![3, 2, 1]);
    }

    #[test]
    fn reverse() {
        assert_eq!(drain(Reverse::new(vec![1, 2, 3].into_enumerator())), vec![3, 2, 1]);
    }

    #[test]
    fn take_last() {
        assert_eq!(drain(TakeLast::new(vec![1, 2, 3, 4].into_enumerator(), 2)), vec![3, 4]);
        assert_eq!(drain(TakeLast::new(vec![1, 2].into_enumerator(), 5)), vec![1, 2]);
        assert!(drain(TakeLast::new(vec![1, 2].into_enumerator(), 0)).is_empty());
    }

    #[test]
    fn skip_last() {
        assert_eq!(drain(SkipLast::new(vec![1, 2, 3, 4].into_enumerator(), 1)), vec![1, 2, 3]);
        assert!(drain(SkipLast::new(vec![1, 2].into_enumerator(), 5)).is_empty());
        assert_eq!(drain(SkipLast::new(vec![1, 2].into_enumerator(), 0)), vec![1, 2]);
    }

    #[test]
    fn skip_last_over_unbounded_source() {
        let firsts = crate::Query::iterate(0u64, |n| n + 1)
            .skip_last(2)
            .take(10)
            .into_iter()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(firsts, (0..10).collect::<Vec<u64>>());
    }
}
