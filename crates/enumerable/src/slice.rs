//! Slice convenience layer.
//!
//! Functions here take an optional slice and run a whole pipeline in one
//! call. `None` stands for an absent sequence and is kept distinct from an
//! empty one: an absent input gives an absent output, an empty input gives
//! an empty vector.
//!
//! ```
//! use enumerable::slice;
//!
//! let none: Option<&[i32]> = None;
//! assert_eq!(slice::select(none, |n| n * 2), Ok(None));
//! assert_eq!(slice::select(Some(&[]), |n: &i32| n * 2), Ok(Some(vec![])));
//! assert_eq!(slice::select(Some(&[1, 2]), |n| n * 2), Ok(Some(vec![2, 4])));
//! ```
//!
//! For a second operand, `intersect` treats `None` as empty and `except`
//! treats it as "nothing to remove". The other two-sequence functions fail
//! with [`Error::MissingArgument`].

use std::hash::Hash;

use crate::enumerator::Enumerator;
use crate::error::{Error, Result};
use crate::lookup::Grouping;
use crate::query::Query;
use crate::source::SliceEnumerator;

/// Runs the pipeline produced by `build` over `items`.
///
/// Returns `Ok(None)` without calling `build` when `items` is `None`.
pub fn query<'a, T, E, F>(items: Option<&'a [T]>, build: F) -> Result<Option<Vec<E::Item>>>
where
    E: Enumerator,
    F: FnOnce(Query<SliceEnumerator<'a, T>>) -> Query<E>,
{
    match items {
        Some(items) => build(Query::from_slice(items)).to_vec().map(Some),
        None => Ok(None),
    }
}

fn second<'a, T>(items: Option<&'a [T]>, name: &'static str) -> Result<&'a [T]> {
    items.ok_or(Error::MissingArgument(name))
}

/// Projects each element.
pub fn select<T, U, F>(items: Option<&[T]>, mut selector: F) -> Result<Option<Vec<U>>>
where
    F: FnMut(&T) -> U,
{
    query(items, |q| q.select(move |item| selector(item)))
}

/// Keeps the elements satisfying `predicate`.
pub fn filter<T, P>(items: Option<&[T]>, mut predicate: P) -> Result<Option<Vec<T>>>
where
    T: Clone,
    P: FnMut(&T) -> bool,
{
    query(items, |q| q.filter(move |item| predicate(*item)).select(T::clone))
}

/// Drops repeated elements, keeping the first of each.
pub fn distinct<T>(items: Option<&[T]>) -> Result<Option<Vec<T>>>
where
    T: Clone + Hash + Eq,
{
    query(items, |q| q.distinct().select(T::clone))
}

/// Stable sort by key.
pub fn order_by<T, K, KF>(items: Option<&[T]>, key: KF) -> Result<Option<Vec<T>>>
where
    T: Clone,
    K: Ord,
    KF: Fn(&T) -> K,
{
    query(items, |q| q.order_by(move |item| key(*item)).select(T::clone))
}

/// Groups by key in first-seen key order.
pub fn group_by<T, K, KF>(items: Option<&[T]>, mut key: KF) -> Result<Option<Vec<Grouping<K, T>>>>
where
    T: Clone,
    K: Hash + Eq,
    KF: FnMut(&T) -> K,
{
    query(items, |q| q.group_by_sel(move |item| key(*item), T::clone))
}

/// `first` followed by `second`.
pub fn concat<'a, T: Clone>(
    first: Option<&'a [T]>,
    other: Option<&'a [T]>,
) -> Result<Option<Vec<T>>> {
    if first.is_none() {
        return Ok(None);
    }
    let other = second(other, "second")?;
    query(first, |q| q.concat(other).select(T::clone))
}

/// Distinct elements of both slices, `first` before `second`.
pub fn union<'a, T>(first: Option<&'a [T]>, other: Option<&'a [T]>) -> Result<Option<Vec<T>>>
where
    T: Clone + Hash + Eq,
{
    if first.is_none() {
        return Ok(None);
    }
    let other = second(other, "second")?;
    query(first, |q| q.union(other).select(T::clone))
}

/// Distinct elements of `first` that also occur in `second`.
///
/// An absent `second` yields an empty vector.
pub fn intersect<'a, T>(first: Option<&'a [T]>, other: Option<&'a [T]>) -> Result<Option<Vec<T>>>
where
    T: Clone + Hash + Eq,
{
    let other = other.unwrap_or(&[]);
    query(first, |q| q.intersect(other).select(T::clone))
}

/// Distinct elements of `first` that do not occur in `second`.
///
/// An absent `second` leaves `first` as it is, duplicates included.
pub fn except<'a, T>(first: Option<&'a [T]>, other: Option<&'a [T]>) -> Result<Option<Vec<T>>>
where
    T: Clone + Hash + Eq,
{
    match other {
        Some(other) => query(first, |q| q.except(other).select(T::clone)),
        None => Ok(first.map(<[T]>::to_vec)),
    }
}

/// Inner equi-join of `outer` against `inner`.
pub fn join<O, I, K, U, OK, IK, R>(
    outer: Option<&[O]>,
    inner: Option<&[I]>,
    mut outer_key: OK,
    mut inner_key: IK,
    mut result: R,
) -> Result<Option<Vec<U>>>
where
    K: Hash + Eq,
    OK: FnMut(&O) -> K,
    IK: FnMut(&I) -> K,
    R: FnMut(&O, &I) -> U,
{
    if outer.is_none() {
        return Ok(None);
    }
    let inner = second(inner, "inner")?;
    query(outer, |q| {
        q.join(
            inner,
            move |o| outer_key(*o),
            move |i| inner_key(*i),
            move |o, i| result(*o, *i),
        )
    })
}

/// Left outer group-join of `outer` against `inner`.
pub fn group_join<O, I, K, U, OK, IK, R>(
    outer: Option<&[O]>,
    inner: Option<&[I]>,
    mut outer_key: OK,
    mut inner_key: IK,
    mut result: R,
) -> Result<Option<Vec<U>>>
where
    K: Hash + Eq,
    OK: FnMut(&O) -> K,
    IK: FnMut(&I) -> K,
    R: FnMut(&O, &[&I]) -> U,
{
    if outer.is_none() {
        return Ok(None);
    }
    let inner = second(inner, "inner")?;
    query(outer, |q| {
        q.group_join(
            inner,
            move |o| outer_key(*o),
            move |i| inner_key(*i),
            move |o, matches| result(o, matches),
        )
    })
}

/// Pairs elements of both slices through `selector`, up to the shorter
/// length.
pub fn zip<A, B, U, F>(
    first: Option<&[A]>,
    other: Option<&[B]>,
    mut selector: F,
) -> Result<Option<Vec<U>>>
where
    F: FnMut(&A, &B) -> U,
{
    if first.is_none() {
        return Ok(None);
    }
    let other = second(other, "second")?;
    query(first, |q| q.zip(other, move |a, b| selector(a, b)))
}

/// Folds left to right, seeded with the first element.
///
/// An absent or empty slice gives `T::default()`.
///
/// ```
/// use enumerable::slice;
///
/// let words = ["the", "quick", "brown", "fox"].map(String::from);
/// let sentence = slice::aggregate(Some(&words), |acc, w| format!("{w} {acc}"));
/// assert_eq!(sentence, "fox brown quick the");
/// assert_eq!(slice::aggregate(None::<&[String]>, |acc, _| acc), "");
/// ```
pub fn aggregate<T, F>(items: Option<&[T]>, mut f: F) -> T
where
    T: Clone + Default,
    F: FnMut(T, &T) -> T,
{
    match items.and_then(<[T]>::split_first) {
        Some((head, rest)) => rest.iter().fold(head.clone(), |acc, item| f(acc, item)),
        None => T::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Must;

    const NONE: Option<&[i32]> = None;

    #[test]
    fn nil_and_empty_stay_apart() {
        assert_eq!(filter(NONE, |_| true), Ok(None));
        assert_eq!(filter(Some(&[]), |_: &i32| true), Ok(Some(vec![])));
        assert_eq!(distinct(NONE), Ok(None));
        assert_eq!(order_by(Some(&[] as &[i32]), |n| *n), Ok(Some(vec![])));
    }

    #[test]
    fn unary_wrappers() {
        let data = [3, 1, 3, 2];
        assert_eq!(filter(Some(&data), |n| *n > 1).must(), Some(vec![3, 3, 2]));
        assert_eq!(distinct(Some(&data)).must(), Some(vec![3, 1, 2]));
        assert_eq!(order_by(Some(&data), |n| *n).must(), Some(vec![1, 2, 3, 3]));

        let groups = group_by(Some(&data), |n| n % 2).must().unwrap_or_default();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].values(), &[3, 1, 3]);
    }

    #[test]
    fn custom_pipeline() {
        let data = [5, 6, 7, 8];
        let out = query(Some(&data), |q| q.skip(1).take(2).select(|n| n * 10)).must();
        assert_eq!(out, Some(vec![60, 70]));
    }

    #[test]
    fn second_operand_absent() {
        let a = [1, 1, 2];
        assert_eq!(intersect(Some(&a), None), Ok(Some(vec![])));
        assert_eq!(except(Some(&a), None), Ok(Some(vec![1, 1, 2])));
        assert_eq!(union(Some(&a), None), Err(Error::MissingArgument("second")));
        assert_eq!(concat(Some(&a), None), Err(Error::MissingArgument("second")));
        assert_eq!(
            zip(Some(&a), NONE, |x, y| x + y),
            Err(Error::MissingArgument("second"))
        );
    }

    #[test]
    fn first_operand_absent() {
        let b = [1];
        assert_eq!(union(NONE, Some(&b)), Ok(None));
        assert_eq!(intersect(NONE, Some(&b)), Ok(None));
        assert_eq!(except(NONE, Some(&b)), Ok(None));
        assert_eq!(concat(NONE, NONE), Ok(None));
    }

    #[test]
    fn binary_wrappers() {
        let a = [1, 2, 3];
        let b = [2, 3, 4];
        assert_eq!(concat(Some(&a), Some(&b)).must(), Some(vec![1, 2, 3, 2, 3, 4]));
        assert_eq!(union(Some(&a), Some(&b)).must(), Some(vec![1, 2, 3, 4]));
        assert_eq!(intersect(Some(&a), Some(&b)).must(), Some(vec![2, 3]));
        assert_eq!(except(Some(&a), Some(&b)).must(), Some(vec![1]));
        assert_eq!(zip(Some(&a), Some(&b), |x, y| x * y).must(), Some(vec![2, 6, 12]));
    }

    #[test]
    fn joins() {
        let people = ["ann", "bob"];
        let pets = [("rex", "ann"), ("kit", "cy")];

        let pairs = join(Some(&people), Some(&pets), |p| *p, |pet| pet.1, |p, pet| {
            format!("{p}-{}", pet.0)
        });
        assert_eq!(pairs.must(), Some(vec!["ann-rex".to_string()]));

        let counts = group_join(Some(&people), Some(&pets), |p| *p, |pet| pet.1, |p, ps| {
            (*p, ps.len())
        });
        assert_eq!(counts.must(), Some(vec![("ann", 1), ("bob", 0)]));

        let missing = join(Some(&people), None::<&[(&str, &str)]>, |p| *p, |pet| pet.1, |_, _| ());
        assert_eq!(missing, Err(Error::MissingArgument("inner")));
    }

    #[test]
    fn aggregate_defaults() {
        assert_eq!(aggregate(Some(&[1, 2, 3]), |acc, n| acc + n), 6);
        assert_eq!(aggregate(Some(&[] as &[i32]), |acc, n| acc + n), 0);
        assert_eq!(aggregate(NONE, |acc, n| acc + n), 0);
    }
}
