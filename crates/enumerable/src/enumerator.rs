//! The single-pass cursor protocol.
//!
//! Every source and operator in this crate is an [`Enumerator`]: a pull-based
//! cursor that produces one element per [`try_next`](Enumerator::try_next)
//! call. Nothing is computed until an element is pulled.
//!
//! [`Cursor`] layers the classic `advance()` / `current()` protocol on top of
//! any enumerator, and [`Enumerable`] describes a reusable source that can
//! start a fresh pass on demand.

use crate::error::Result;

/// A single-pass, pull-based sequence.
///
/// Implementations must keep returning `Ok(None)` once they are exhausted;
/// they never panic or start producing elements again.
pub trait Enumerator {
    /// The element type.
    type Item;

    /// Pulls the next element.
    ///
    /// Returns `Ok(None)` when the sequence is exhausted, or an error raised
    /// while producing the element.
    fn try_next(&mut self) -> Result<Option<Self::Item>>;

    /// Returns bounds on the remaining number of elements.
    ///
    /// The default is `(0, None)`, which is correct for every enumerator.
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}

impl<E: Enumerator + ?Sized> Enumerator for Box<E> {
    type Item = E::Item;

    fn try_next(&mut self) -> Result<Option<Self::Item>> {
        (**self).try_next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (**self).size_hint()
    }
}

impl<E: Enumerator + ?Sized> Enumerator for &mut E {
    type Item = E::Item;

    fn try_next(&mut self) -> Result<Option<Self::Item>> {
        (**self).try_next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (**self).size_hint()
    }
}

/// Conversion into an [`Enumerator`].
///
/// Operators that take a second sequence (`concat`, `zip`, `union`, `join`,
/// the inner sequences of `select_many`, ...) accept anything implementing
/// this trait: another [`Query`](crate::Query), a `Vec`, a slice, an array,
/// a [`Lookup`](crate::Lookup) or a [`Grouping`](crate::Grouping).
pub trait IntoEnumerator {
    /// The element type.
    type Item;
    /// The enumerator produced.
    type IntoEnum: Enumerator<Item = Self::Item>;

    /// Converts `self` into an enumerator.
    fn into_enumerator(self) -> Self::IntoEnum;
}

impl<T> IntoEnumerator for Vec<T> {
    type Item = T;
    type IntoEnum = crate::source::IterEnumerator<std::vec::IntoIter<T>>;

    fn into_enumerator(self) -> Self::IntoEnum {
        crate::source::IterEnumerator::new(self)
    }
}

impl<T, const N: usize> IntoEnumerator for [T; N] {
    type Item = T;
    type IntoEnum = crate::source::IterEnumerator<std::array::IntoIter<T, N>>;

    fn into_enumerator(self) -> Self::IntoEnum {
        crate::source::IterEnumerator::new(self)
    }
}

impl<'a, T> IntoEnumerator for &'a [T] {
    type Item = &'a T;
    type IntoEnum = crate::source::SliceEnumerator<'a, T>;

    fn into_enumerator(self) -> Self::IntoEnum {
        crate::source::SliceEnumerator::new(self)
    }
}

impl<'a, T> IntoEnumerator for &'a Vec<T> {
    type Item = &'a T;
    type IntoEnum = crate::source::SliceEnumerator<'a, T>;

    fn into_enumerator(self) -> Self::IntoEnum {
        crate::source::SliceEnumerator::new(self)
    }
}

/// A reusable source that can start any number of independent passes.
///
/// Each call to [`enumerate`](Enumerable::enumerate) returns a fresh
/// enumerator positioned before the first element. Passes must not overlap
/// with mutation of the backing data.
pub trait Enumerable {
    /// The element type.
    type Item;
    /// The enumerator produced for each pass.
    type Enumerator: Enumerator<Item = Self::Item>;

    /// Starts a new pass.
    fn enumerate(&self) -> Self::Enumerator;
}

impl<'a, T> Enumerable for &'a [T] {
    type Item = &'a T;
    type Enumerator = crate::source::SliceEnumerator<'a, T>;

    fn enumerate(&self) -> Self::Enumerator {
        crate::source::SliceEnumerator::new(self)
    }
}

/// The `advance()` / `current()` view of an enumerator.
///
/// Before the first successful [`advance`](Cursor::advance), and after the
/// sequence is exhausted, there is no current element. An error also
/// exhausts the cursor: later advances return `Ok(false)`.
///
/// ```
/// use enumerable::Query;
///
/// let mut cursor = Query::from_vec(vec![1, 2]).into_cursor();
/// assert_eq!(cursor.current(), None);
/// assert!(cursor.advance().unwrap());
/// assert_eq!(cursor.current(), Some(&1));
/// assert!(cursor.advance().unwrap());
/// assert!(!cursor.advance().unwrap());
/// assert!(!cursor.advance().unwrap());
/// assert_eq!(cursor.current(), None);
/// ```
#[derive(Debug, Clone)]
pub struct Cursor<E: Enumerator> {
    source: E,
    current: Option<E::Item>,
    finished: bool,
}

impl<E: Enumerator> Cursor<E> {
    /// Wraps an enumerator.
    pub fn new(source: E) -> Self {
        Cursor {
            source,
            current: None,
            finished: false,
        }
    }

    /// Moves to the next element.
    ///
    /// Returns `Ok(true)` if a new current element is available.
    pub fn advance(&mut self) -> Result<bool> {
        if self.finished {
            self.current = None;
            return Ok(false);
        }
        match self.source.try_next() {
            Ok(Some(item)) => {
                self.current = Some(item);
                Ok(true)
            }
            Ok(None) => {
                self.finish();
                Ok(false)
            }
            Err(err) => {
                self.finish();
                Err(err)
            }
        }
    }

    /// Returns the current element, if the last advance produced one.
    pub fn current(&self) -> Option<&E::Item> {
        self.current.as_ref()
    }

    /// Takes ownership of the current element.
    ///
    /// The cursor has no current element afterwards, until the next advance.
    pub fn take_current(&mut self) -> Option<E::Item> {
        self.current.take()
    }

    /// Returns `true` once the sequence is exhausted.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns the wrapped enumerator.
    pub fn into_inner(self) -> E {
        self.source
    }

    fn finish(&mut self) {
        self.finished = true;
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    /// Yields one element, then fails.
    struct Failing {
        pulled: bool,
    }

    impl Enumerator for Failing {
        type Item = i32;

        fn try_next(&mut self) -> Result<Option<i32>> {
            if self.pulled {
                Err(Error::NoElements)
            } else {
                self.pulled = true;
                Ok(Some(7))
            }
        }
    }

    #[test]
    fn cursor_before_first_advance() {
        let cursor = Cursor::new(vec![1].into_enumerator());
        assert_eq!(cursor.current(), None);
        assert!(!cursor.is_finished());
    }

    #[test]
    fn cursor_exhaustion_is_sticky() {
        let mut cursor = Cursor::new(vec!["a"].into_enumerator());
        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.current(), Some(&"a"));
        for _ in 0..3 {
            assert!(!cursor.advance().unwrap());
            assert_eq!(cursor.current(), None);
        }
        assert!(cursor.is_finished());
    }

    #[test]
    fn cursor_error_exhausts() {
        let mut cursor = Cursor::new(Failing { pulled: false });
        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.take_current(), Some(7));
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.advance(), Err(Error::NoElements));
        assert_eq!(cursor.advance(), Ok(false));
    }

    #[test]
    fn slice_enumerable_restarts() {
        let data = [1, 2, 3];
        let source: &[i32] = &data;

        let mut first = source.enumerate();
        assert_eq!(first.try_next().unwrap(), Some(&1));

        let mut second = source.enumerate();
        assert_eq!(second.try_next().unwrap(), Some(&1));
        assert_eq!(first.try_next().unwrap(), Some(&2));
    }

    #[test]
    fn boxed_enumerator() {
        let mut boxed: Box<dyn Enumerator<Item = i32>> = Box::new(vec![5, 6].into_enumerator());
        assert_eq!(boxed.size_hint(), (2, Some(2)));
        assert_eq!(boxed.try_next().unwrap(), Some(5));
    }
}
