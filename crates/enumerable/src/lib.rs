//! Enumerable - Lazy, composable query operators for in-memory sequences.
//!
//! Enumerable provides a fluent API for building pipelines over slices,
//! vectors, iterators and generated ranges. It supports:
//!
//! - Lazy stateless operators: filter, select, take, skip, zip, concat, chunk
//! - Buffering operators: distinct, set algebra, group_by, join, order_by
//! - Terminal operators: aggregates, element access, quantifiers, collection
//! - Pluggable key equivalence and ordering strategies
//! - Typed errors for configuration and cardinality failures
//!
//! # Quick Start
//!
//! ```rust
//! use enumerable::Query;
//!
//! struct Task {
//!     name: &'static str,
//!     priority: i32,
//!     archived: bool,
//! }
//!
//! let tasks = vec![
//!     Task { name: "Write docs", priority: 3, archived: false },
//!     Task { name: "Fix bug", priority: 5, archived: false },
//!     Task { name: "Old task", priority: 1, archived: true },
//! ];
//!
//! let names = Query::from_slice(&tasks)
//!     .filter(|t| !t.archived && t.priority >= 3)
//!     .order_by_desc(|t| t.priority)
//!     .select(|t| t.name)
//!     .to_vec()
//!     .unwrap();
//!
//! assert_eq!(names, vec!["Fix bug", "Write docs"]);
//! ```
//!
//! # Evaluation Model
//!
//! Building a query never reads the source. Elements are pulled one at a
//! time through the [`Enumerator`] protocol, either by a terminal operator,
//! by iterating the query, or through a [`Cursor`]:
//!
//! ```text
//! source -> stage -> stage -> ... -> terminal
//!            pulls one element per request, back to front
//! ```
//!
//! - **Stateless stages** hold at most one pending element
//! - **Buffering stages** read their whole input on the first pull
//! - **Errors** surface at the pull that hit them; the failing stage is
//!   then exhausted
//!
//! # Strategies
//!
//! Key equivalence and ordering are separate from the operators:
//!
//! | Strategy | Used by |
//! |----------|---------|
//! | [`Equaler`] | `distinct_eq`, `group_by_eq`, `join_eq`, `contains_eq`, ... |
//! | [`Lesser`] | `order_ls`, `min_ls`, `then_by_ls`, ... |
//! | [`Comparer`] | `order_cmp`, `distinct_cmp`, `max_cmp`, ... |
//!
//! The default for keys is hashing ([`HashedIndex`]); an [`Equaler`] falls
//! back to a linear scan ([`ScanIndex`]) and a [`Comparer`] to binary search
//! ([`SortedIndex`]).
//!
//! # Absent Sequences
//!
//! The [`slice`] module works on `Option<&[T]>` and keeps an absent input
//! apart from an empty one throughout.

mod compare;
mod enumerator;
mod error;
mod group;
mod index;
mod lookup;
mod order;
mod pipeline;
mod query;
mod set;
pub mod slice;
mod source;
mod terminal;

// Re-export public API
pub use compare::{
    CaseInsensitive, Comparer, ComparerEqualer, DeepEqualer, Dir, Equaler, KeyComparer, Lesser,
    LesserComparer, NaturalOrder, Reversed, ThenComparer,
};
pub use enumerator::{Cursor, Enumerable, Enumerator, IntoEnumerator};
pub use error::{Error, Must, Result};
pub use group::{GroupBy, GroupJoin, Join};
pub use index::{HashedIndex, KeyIndex, KeySet, ScanIndex, SortedIndex};
pub use lookup::{Grouping, Lookup};
pub use order::{Ordered, Reverse, SkipLast, TakeLast};
pub use pipeline::{
    Cast, Chunk, Concat, DefaultIfEmpty, ElementPredicate, Filter, FilterIdx, OfType, Plain,
    Select, SelectIdx, SelectMany, SelectManyRes, Skip, SkipWhile, Take, TakeWhile, WithIndex, Zip,
};
pub use query::{ByKey, Iter, Query, SelfKey, SelfValue, Single};
pub use set::{Distinct, Except, Intersect};
pub use source::{
    EmptyEnumerator, FromFn, IterEnumerator, Iterate, RangeEnumerator, RepeatEnumerator,
    SliceEnumerator,
};
