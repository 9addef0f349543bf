//! Comparison strategies.
//!
//! Operators that need to decide whether two elements are "the same" or in
//! which order they belong take a strategy value instead of relying on a
//! fixed trait bound:
//!
//! - [`Equaler`]: equivalence (`distinct_eq`, `group_by_eq`, `join_eq`, ...)
//! - [`Lesser`]: strict weak ordering (`order_by_ls`, `min_ls`, ...)
//! - [`Comparer`]: three-way ordering (`order_by_cmp`, `distinct_cmp`, ...)
//!
//! All three are implemented for plain closures, so
//! `|a: &i32, b: &i32| a % 10 == b % 10` is a valid equaler. The named
//! strategies in this module are stateless values and can be shared freely.
//!
//! The library does not check that a strategy is a valid equivalence or
//! ordering. A broken strategy gives unspecified grouping or sorting, not an
//! error.

use std::cmp::Ordering;
use std::marker::PhantomData;

/// Which way a key comparer sorts. Defaults to ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    #[default]
    Asc,
    Desc,
}

impl Dir {
    /// Flips `ordering` for `Desc`.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }
}

// ============================================================================
// Strategy traits
// ============================================================================

/// Decides whether two values are equivalent.
pub trait Equaler<T: ?Sized> {
    /// Returns `true` if `a` and `b` belong to the same equivalence class.
    fn equal(&self, a: &T, b: &T) -> bool;
}

/// Decides whether one value sorts strictly before another.
pub trait Lesser<T: ?Sized> {
    /// Returns `true` if `a` is strictly less than `b`.
    fn less(&self, a: &T, b: &T) -> bool;
}

/// Three-way comparison of two values.
pub trait Comparer<T: ?Sized> {
    /// Compares `a` with `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T: ?Sized, F> Equaler<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn equal(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

impl<T: ?Sized, F> Lesser<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn less(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

impl<T: ?Sized, F> Comparer<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

// ============================================================================
// Default strategies
// ============================================================================

/// Structural equality through [`PartialEq`]. The default equaler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeepEqualer;

impl<T: PartialEq + ?Sized> Equaler<T> for DeepEqualer {
    fn equal(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

/// Natural ordering through [`Ord`]. The default comparer and lesser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparer<T> for NaturalOrder {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T: Ord + ?Sized> Lesser<T> for NaturalOrder {
    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

/// Case-insensitive string equality and ordering.
///
/// Characters are folded with [`char::to_lowercase`] before comparison, so
/// `"Straße"` and `"STRASSE"` are not equal but `"Ärger"` and `"ärger"` are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaseInsensitive;

impl CaseInsensitive {
    fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
        s.chars().flat_map(char::to_lowercase)
    }
}

impl<S: AsRef<str> + ?Sized> Equaler<S> for CaseInsensitive {
    fn equal(&self, a: &S, b: &S) -> bool {
        Self::folded(a.as_ref()).eq(Self::folded(b.as_ref()))
    }
}

impl<S: AsRef<str> + ?Sized> Comparer<S> for CaseInsensitive {
    fn compare(&self, a: &S, b: &S) -> Ordering {
        Self::folded(a.as_ref()).cmp(Self::folded(b.as_ref()))
    }
}

impl<S: AsRef<str> + ?Sized> Lesser<S> for CaseInsensitive {
    fn less(&self, a: &S, b: &S) -> bool {
        Comparer::compare(self, a, b) == Ordering::Less
    }
}

// ============================================================================
// Adapters
// ============================================================================

/// Reverses another comparer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reversed<C>(pub C);

impl<T: ?Sized, C: Comparer<T>> Comparer<T> for Reversed<C> {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(a, b).reverse()
    }
}

/// Builds a three-way comparer out of a [`Lesser`].
///
/// `a` and `b` compare equal when neither is less than the other.
#[derive(Debug, Clone, Copy, Default)]
pub struct LesserComparer<L>(pub L);

impl<T: ?Sized, L: Lesser<T>> Comparer<T> for LesserComparer<L> {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        if self.0.less(a, b) {
            Ordering::Less
        } else if self.0.less(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

/// Treats values a comparer ranks as `Equal` as equivalent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComparerEqualer<C>(pub C);

impl<T: ?Sized, C: Comparer<T>> Equaler<T> for ComparerEqualer<C> {
    fn equal(&self, a: &T, b: &T) -> bool {
        self.0.compare(a, b) == Ordering::Equal
    }
}

/// Compares elements by a projected key.
///
/// One link of the sort chain built by `order_by` and `then_by`.
pub struct KeyComparer<T: ?Sized, K, KF, C> {
    key: KF,
    comparer: C,
    dir: Dir,
    _marker: PhantomData<fn(&T) -> K>,
}

impl<T: ?Sized, K, KF, C> KeyComparer<T, K, KF, C>
where
    KF: Fn(&T) -> K,
    C: Comparer<K>,
{
    /// Creates a key comparer.
    pub fn new(key: KF, comparer: C, dir: Dir) -> Self {
        KeyComparer {
            key,
            comparer,
            dir,
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized, K, KF: Clone, C: Clone> Clone for KeyComparer<T, K, KF, C> {
    fn clone(&self) -> Self {
        KeyComparer {
            key: self.key.clone(),
            comparer: self.comparer.clone(),
            dir: self.dir,
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized, K, KF, C> Comparer<T> for KeyComparer<T, K, KF, C>
where
    KF: Fn(&T) -> K,
    C: Comparer<K>,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        let ordering = self.comparer.compare(&(self.key)(a), &(self.key)(b));
        self.dir.apply(ordering)
    }
}

/// Breaks ties of a primary comparer with a secondary one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThenComparer<A, B> {
    primary: A,
    secondary: B,
}

impl<A, B> ThenComparer<A, B> {
    /// Chains `secondary` behind `primary`.
    pub fn new(primary: A, secondary: B) -> Self {
        ThenComparer { primary, secondary }
    }
}

impl<T: ?Sized, A: Comparer<T>, B: Comparer<T>> Comparer<T> for ThenComparer<A, B> {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.primary
            .compare(a, b)
            .then_with(|| self.secondary.compare(a, b))
    }
}
