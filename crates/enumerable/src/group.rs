//! Grouping and join stages.
//!
//! All three stages are built on [`Lookup`]. `GroupBy` drains its source into
//! a lookup on the first pull and then hands out the groupings. `Join` and
//! `GroupJoin` build a lookup over the inner sequence on the first pull and
//! stream the outer sequence against it.

use crate::enumerator::Enumerator;
use crate::error::Result;
use crate::index::KeyIndex;
use crate::lookup::{Grouping, Lookup};
use crate::pipeline::Stage;

/// Groups elements by key, in first-seen key order. Built by `Query::group_by`.
#[derive(Clone)]
pub struct GroupBy<E, KF, VF, K, V, I> {
    stage: Stage<(E, I), Grouping<K, V>>,
    key: KF,
    value: VF,
}

impl<E, KF, VF, K, V, I> GroupBy<E, KF, VF, K, V, I> {
    pub(crate) fn new(source: E, key: KF, value: VF, index: I) -> Self {
        GroupBy {
            stage: Stage::Pending((source, index)),
            key,
            value,
        }
    }
}

impl<E, KF, VF, K, V, I> Enumerator for GroupBy<E, KF, VF, K, V, I>
where
    E: Enumerator,
    KF: FnMut(&E::Item) -> K,
    VF: FnMut(E::Item) -> V,
    I: KeyIndex<K>,
{
    type Item = Grouping<K, V>;

    fn try_next(&mut self) -> Result<Option<Grouping<K, V>>> {
        let key = &mut self.key;
        let value = &mut self.value;
        self.stage.pull(|(source, index)| {
            let lookup = Lookup::build(source, key, value, index)?;
            Ok(lookup.into_iter().collect())
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.stage.size_hint().unwrap_or((0, None))
    }
}

/// Builds the inner lookup of a join on first use.
#[derive(Clone)]
enum Inner<N, K, U, I> {
    Pending(N, I),
    Built(Lookup<K, U, I>),
    Failed,
}

impl<N, K, I> Inner<N, K, N::Item, I>
where
    N: Enumerator,
    I: KeyIndex<K>,
{
    fn lookup<IK>(&mut self, inner_key: &mut IK) -> Result<Option<&Lookup<K, N::Item, I>>>
    where
        IK: FnMut(&N::Item) -> K,
    {
        if matches!(self, Inner::Pending(..)) {
            if let Inner::Pending(source, index) = std::mem::replace(self, Inner::Failed) {
                *self = Inner::Built(Lookup::build(source, inner_key, |u| u, index)?);
            }
        }
        match self {
            Inner::Built(lookup) => Ok(Some(&*lookup)),
            Inner::Pending(..) | Inner::Failed => Ok(None),
        }
    }
}

/// Inner equi-join. Built by `Query::join`.
///
/// For each outer element, in order, one result is produced per matching
/// inner element, in inner order.
#[derive(Clone)]
pub struct Join<O: Enumerator, N: Enumerator, OK, IK, R, K, I> {
    outer: O,
    inner: Inner<N, K, N::Item, I>,
    outer_key: OK,
    inner_key: IK,
    result: R,
    current: Option<(O::Item, usize, usize)>,
}

impl<O: Enumerator, N: Enumerator, OK, IK, R, K, I> Join<O, N, OK, IK, R, K, I> {
    pub(crate) fn new(
        outer: O,
        inner: N,
        outer_key: OK,
        inner_key: IK,
        result: R,
        index: I,
    ) -> Self {
        Join {
            outer,
            inner: Inner::Pending(inner, index),
            outer_key,
            inner_key,
            result,
            current: None,
        }
    }
}

impl<O, N, OK, IK, R, K, I, U> Enumerator for Join<O, N, OK, IK, R, K, I>
where
    O: Enumerator,
    N: Enumerator,
    OK: FnMut(&O::Item) -> K,
    IK: FnMut(&N::Item) -> K,
    R: FnMut(&O::Item, &N::Item) -> U,
    I: KeyIndex<K>,
{
    type Item = U;

    fn try_next(&mut self) -> Result<Option<U>> {
        let Some(lookup) = self.inner.lookup(&mut self.inner_key)? else {
            return Ok(None);
        };
        loop {
            if let Some((outer, group, next)) = &mut self.current {
                let matches = lookup.groupings()[*group].values();
                if let Some(inner) = matches.get(*next) {
                    *next += 1;
                    return Ok(Some((self.result)(&*outer, inner)));
                }
                self.current = None;
            }
            match self.outer.try_next()? {
                Some(outer) => {
                    if let Some(group) = lookup.position(&(self.outer_key)(&outer)) {
                        self.current = Some((outer, group, 0));
                    }
                }
                None => return Ok(None),
            }
        }
    }
}

/// Left outer group-join. Built by `Query::group_join`.
///
/// Produces exactly one result per outer element; unmatched outer elements
/// see an empty slice.
#[derive(Clone)]
pub struct GroupJoin<O, N: Enumerator, OK, IK, R, K, I> {
    outer: O,
    inner: Inner<N, K, N::Item, I>,
    outer_key: OK,
    inner_key: IK,
    result: R,
}

impl<O, N: Enumerator, OK, IK, R, K, I> GroupJoin<O, N, OK, IK, R, K, I> {
    pub(crate) fn new(
        outer: O,
        inner: N,
        outer_key: OK,
        inner_key: IK,
        result: R,
        index: I,
    ) -> Self {
        GroupJoin {
            outer,
            inner: Inner::Pending(inner, index),
            outer_key,
            inner_key,
            result,
        }
    }
}

impl<O, N, OK, IK, R, K, I, U> Enumerator for GroupJoin<O, N, OK, IK, R, K, I>
where
    O: Enumerator,
    N: Enumerator,
    OK: FnMut(&O::Item) -> K,
    IK: FnMut(&N::Item) -> K,
    R: FnMut(O::Item, &[N::Item]) -> U,
    I: KeyIndex<K>,
{
    type Item = U;

    fn try_next(&mut self) -> Result<Option<U>> {
        let Some(lookup) = self.inner.lookup(&mut self.inner_key)? else {
            return Ok(None);
        };
        match self.outer.try_next()? {
            Some(outer) => {
                let matches = lookup.values(&(self.outer_key)(&outer));
                Ok(Some((self.result)(outer, matches)))
            }
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.outer.size_hint()
    }
}
