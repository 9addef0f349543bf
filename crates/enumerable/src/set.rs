//! Set operation stages: `distinct`, `union`, `intersect` and `except`.
//!
//! Every stage projects elements to a key and remembers keys in a
//! [`KeySet`]. The first occurrence of a key wins, and output keeps the
//! encounter order of the first sequence. `union` is `concat` followed by
//! [`Distinct`], so it needs no stage of its own.
//!
//! `intersect` and `except` read the second sequence completely on the first
//! pull. The first sequence is always streamed.

use tracing::trace;

use crate::enumerator::Enumerator;
use crate::error::Result;
use crate::index::{KeyIndex, KeySet};

/// Suppresses elements whose key was already produced.
#[derive(Clone)]
pub struct Distinct<E, KF, K, I> {
    source: E,
    key: KF,
    seen: KeySet<K, I>,
}

impl<E, KF, K, I: KeyIndex<K>> Distinct<E, KF, K, I> {
    pub(crate) fn new(source: E, key: KF, index: I) -> Self {
        Distinct {
            source,
            key,
            seen: KeySet::new(index),
        }
    }
}

impl<E, KF, K, I> Enumerator for Distinct<E, KF, K, I>
where
    E: Enumerator,
    KF: FnMut(&E::Item) -> K,
    I: KeyIndex<K>,
{
    type Item = E::Item;

    fn try_next(&mut self) -> Result<Option<E::Item>> {
        while let Some(item) = self.source.try_next()? {
            if self.seen.insert((self.key)(&item)) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.source.size_hint().1)
    }
}

/// Reads `second` to the end, collecting its keys.
fn collect_keys<B, KF, K, I>(mut second: B, key: &mut KF, keys: &mut KeySet<K, I>) -> Result<()>
where
    B: Enumerator,
    KF: FnMut(&B::Item) -> K,
    I: KeyIndex<K>,
{
    let mut pulled = 0usize;
    while let Some(item) = second.try_next()? {
        keys.insert(key(&item));
        pulled += 1;
    }
    trace!(elements = pulled, keys = keys.len(), "materialized key set");
    Ok(())
}

/// Elements of the first sequence whose key also occurs in the second,
/// each key at most once.
#[derive(Clone)]
pub struct Intersect<A, B, KF, K, I> {
    first: A,
    second: Option<B>,
    key: KF,
    keys: KeySet<K, I>,
    emitted: Vec<bool>,
    failed: bool,
}

impl<A, B, KF, K, I: KeyIndex<K>> Intersect<A, B, KF, K, I> {
    pub(crate) fn new(first: A, second: B, key: KF, index: I) -> Self {
        Intersect {
            first,
            second: Some(second),
            key,
            keys: KeySet::new(index),
            emitted: Vec::new(),
            failed: false,
        }
    }
}

impl<A, B, KF, K, I> Enumerator for Intersect<A, B, KF, K, I>
where
    A: Enumerator,
    B: Enumerator<Item = A::Item>,
    KF: FnMut(&A::Item) -> K,
    I: KeyIndex<K>,
{
    type Item = A::Item;

    fn try_next(&mut self) -> Result<Option<A::Item>> {
        if self.failed {
            return Ok(None);
        }
        if let Some(second) = self.second.take() {
            if let Err(err) = collect_keys(second, &mut self.key, &mut self.keys) {
                self.failed = true;
                return Err(err);
            }
            self.emitted = vec![false; self.keys.len()];
        }
        if self.keys.is_empty() {
            return Ok(None);
        }
        while let Some(item) = self.first.try_next()? {
            if let Some(at) = self.keys.position(&(self.key)(&item)) {
                if !self.emitted[at] {
                    self.emitted[at] = true;
                    return Ok(Some(item));
                }
            }
        }
        Ok(None)
    }
}

/// Elements of the first sequence whose key does not occur in the second,
/// each key at most once.
#[derive(Clone)]
pub struct Except<A, B, KF, K, I> {
    first: A,
    second: Option<B>,
    key: KF,
    keys: KeySet<K, I>,
    failed: bool,
}

impl<A, B, KF, K, I: KeyIndex<K>> Except<A, B, KF, K, I> {
    pub(crate) fn new(first: A, second: B, key: KF, index: I) -> Self {
        Except {
            first,
            second: Some(second),
            key,
            keys: KeySet::new(index),
            failed: false,
        }
    }
}

impl<A, B, KF, K, I> Enumerator for Except<A, B, KF, K, I>
where
    A: Enumerator,
    B: Enumerator<Item = A::Item>,
    KF: FnMut(&A::Item) -> K,
    I: KeyIndex<K>,
{
    type Item = A::Item;

    fn try_next(&mut self) -> Result<Option<A::Item>> {
        if self.failed {
            return Ok(None);
        }
        if let Some(second) = self.second.take() {
            if let Err(err) = collect_keys(second, &mut self.key, &mut self.keys) {
                self.failed = true;
                return Err(err);
            }
        }
        // Keys of produced elements join the set, which keeps the output distinct.
        while let Some(item) = self.first.try_next()? {
            if self.keys.insert((self.key)(&item)) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.first.size_hint().1)
    }
}
