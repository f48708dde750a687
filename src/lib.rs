//! hashed-table: a single-threaded, string-keyed hash table using open
//! addressing with linear probing.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small associative container whose whole interest is the
//!   table itself: hashing, probing, growth, and iteration that stays
//!   correct when the slot array is reallocated.
//! - Pieces:
//!   - `hash`: 64-bit FNV-1a as a `Hasher`/`BuildHasher` pair; the
//!     default hasher for every table.
//!   - `table`: `Table<V, S>`, a flat array of slots, each empty or
//!     holding an owned key and its value, plus the cursors over it.
//!   - `error`: `TableError`, the only failure type.
//!
//! Constraints
//! - Capacity is a power of two so the start slot is `hash & (cap - 1)`.
//! - The table doubles before an insert that begins at half load, so
//!   `len < capacity` always holds and every probe meets an empty slot.
//! - Keys are unique and immutable after insert; only values change.
//! - There is no removal, so probe chains never need tombstones.
//!
//! Ownership
//! - The table owns a copy of every key. `set` returns the table's copy
//!   so callers can hold on to the canonical key.
//! - Values are a type parameter. A `&T` value leaves lifetime entirely
//!   to the caller; owned values come back through `insert` (displaced
//!   value) or by consuming the table with `into_iter`.
//!
//! Iteration and growth
//! - Growth reallocates the slot array. Every cursor borrows the table,
//!   so the borrow checker rejects a `set` while a cursor is live;
//!   invalidation by growth cannot be expressed.
//!
//! Failure
//! - Slot arrays and key copies are allocated fallibly. Running out of
//!   memory returns `TableError::OutOfMemory` and leaves the table as it
//!   was: a failed grow keeps the old array, a failed key copy keeps
//!   `len` and occupancy. Doubling past `usize::MAX` is
//!   `TableError::CapacityOverflow`.
//! - A missing key is `None`, not an error.
//!
//! Notes and non-goals
//! - No removal, no concurrent access, no serialization.
//! - FNV-1a is unseeded; adversarial key sets can force long probe
//!   chains. The table is meant for trusted input. Supply another
//!   `BuildHasher` via `with_hasher` if that matters.

mod error;
pub mod hash;
pub mod table;
mod table_proptest;

// Public surface
pub use error::TableError;
pub use hash::{FnvBuildHasher, FnvHasher};
pub use table::{IntoIter, Iter, IterMut, Keys, Table, Values, INITIAL_CAPACITY};
