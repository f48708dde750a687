//! Table: string-keyed open addressing with linear probing.

use crate::error::TableError;
use crate::hash::FnvBuildHasher;
use core::fmt;
use core::hash::{BuildHasher, Hasher};
use core::iter::FusedIterator;
use core::mem;

/// Slot count of a table created with [`Table::new`].
pub const INITIAL_CAPACITY: usize = 16;

// Empty iff `None`. The key of an occupied slot is never rewritten.
type Slot<V> = Option<(String, V)>;

/// Outcome of a linear probe: the slot holding the key, or the first
/// empty slot where it would go.
enum Probe {
    Occupied(usize),
    Vacant(usize),
}

impl Probe {
    fn index(&self) -> usize {
        match *self {
            Probe::Occupied(i) | Probe::Vacant(i) => i,
        }
    }
}

fn hash_key<S: BuildHasher>(hasher: &S, key: &str) -> u64 {
    // Raw bytes only; `str::hash` would append a terminator byte.
    let mut h = hasher.build_hasher();
    h.write(key.as_bytes());
    h.finish()
}

/// Walk forward from `hash & mask`, wrapping, until the key or an empty
/// slot is found. Terminates because at least one slot is always empty.
fn probe<V>(slots: &[Slot<V>], hash: u64, key: &str) -> Probe {
    let mask = slots.len() - 1;
    let mut i = (hash as usize) & mask;
    loop {
        match &slots[i] {
            None => return Probe::Vacant(i),
            Some((k, _)) if k == key => return Probe::Occupied(i),
            Some(_) => i = (i + 1) & mask,
        }
    }
}

fn alloc_slots<V>(capacity: usize) -> Result<Vec<Slot<V>>, TableError> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(capacity)?;
    slots.resize_with(capacity, || None);
    Ok(slots)
}

// The only overflow check on the grow path; `expand` takes its result as-is.
fn grown_capacity(capacity: usize) -> Result<usize, TableError> {
    capacity
        .checked_mul(2)
        .ok_or(TableError::CapacityOverflow)
}

fn copy_key(key: &str) -> Result<String, TableError> {
    let mut owned = String::new();
    owned.try_reserve_exact(key.len())?;
    owned.push_str(key);
    Ok(owned)
}

/// A string-keyed hash table.
///
/// Keys are copied into storage owned by the table. Values are whatever
/// `V` the caller picks: owned data, a `Box`, or a borrowed `&T` whose
/// lifetime the caller manages. Displaced values come back from
/// [`Table::insert`] and every value can be reclaimed by consuming the
/// table with [`IntoIterator`].
///
/// The slot count is always a power of two and the table doubles before
/// an insert would take it past half full.
///
/// Cursors borrow the table, so it cannot grow under a live iterator:
///
/// ```compile_fail
/// use hashed_table::Table;
///
/// let mut t = Table::new().unwrap();
/// t.set("a", 1).unwrap();
/// for (_k, _v) in t.iter() {
///     t.set("b", 2).unwrap();
/// }
/// ```
pub struct Table<V, S = FnvBuildHasher> {
    hasher: S,
    slots: Vec<Slot<V>>,
    len: usize,
}

impl<V> Table<V> {
    /// Empty table with [`INITIAL_CAPACITY`] slots and FNV-1a hashing.
    ///
    /// ```
    /// use hashed_table::Table;
    ///
    /// let mut counts = Table::new()?;
    /// counts.set("fox", 1)?;
    /// assert_eq!(counts.get("fox"), Some(&1));
    /// assert_eq!(counts.get("dog"), None);
    /// # Ok::<(), hashed_table::TableError>(())
    /// ```
    pub fn new() -> Result<Self, TableError> {
        Self::with_capacity_and_hasher(INITIAL_CAPACITY, FnvBuildHasher)
    }

    /// Empty table with at least `capacity` slots (rounded up to a power
    /// of two, minimum one).
    pub fn with_capacity(capacity: usize) -> Result<Self, TableError> {
        Self::with_capacity_and_hasher(capacity, FnvBuildHasher)
    }
}

impl<V, S> Table<V, S>
where
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Result<Self, TableError> {
        Self::with_capacity_and_hasher(INITIAL_CAPACITY, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Result<Self, TableError> {
        let capacity = capacity
            .max(1)
            .checked_next_power_of_two()
            .ok_or(TableError::CapacityOverflow)?;
        Ok(Self {
            hasher,
            slots: alloc_slots(capacity)?,
            len: 0,
        })
    }

    /// Number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total slot count; always a power of two and greater than `len()`.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn find(&self, key: &str) -> Option<usize> {
        let hash = hash_key(&self.hasher, key);
        match probe(&self.slots, hash, key) {
            Probe::Occupied(i) => Some(i),
            Probe::Vacant(_) => None,
        }
    }

    /// Value stored under `key`, or `None` if the key is absent.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let i = self.find(key)?;
        self.slots[i].as_mut().map(|(_, v)| v)
    }

    /// Stored key and value for `key`. The returned key is the table's
    /// own copy.
    pub fn get_key_value(&self, key: &str) -> Option<(&str, &V)> {
        let i = self.find(key)?;
        self.slots[i].as_ref().map(|(k, v)| (k.as_str(), v))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Map `key` to `value`, returning the table's copy of the key.
    ///
    /// An existing key keeps its storage and only the value is replaced
    /// (the old value is dropped; use [`Table::insert`] to get it back).
    /// A new key is copied into owned storage. On error the table is
    /// unchanged.
    pub fn set(&mut self, key: &str, value: V) -> Result<&str, TableError> {
        let (entry, _previous) = self.insert_entry(key, value)?;
        Ok(entry.0.as_str())
    }

    /// Like [`Table::set`] but hands back the value previously stored
    /// under `key`.
    pub fn insert(&mut self, key: &str, value: V) -> Result<Option<V>, TableError> {
        let (_, previous) = self.insert_entry(key, value)?;
        Ok(previous)
    }

    fn insert_entry(
        &mut self,
        key: &str,
        value: V,
    ) -> Result<(&mut (String, V), Option<V>), TableError> {
        // Grow before probing, even if the key turns out to be present.
        if self.len >= self.capacity() / 2 {
            self.expand()?;
        }

        let hash = hash_key(&self.hasher, key);
        match probe(&self.slots, hash, key) {
            Probe::Occupied(i) => {
                let entry = self.slots[i]
                    .as_mut()
                    .expect("probe reported an occupied slot");
                let previous = mem::replace(&mut entry.1, value);
                Ok((entry, Some(previous)))
            }
            Probe::Vacant(i) => {
                let owned = copy_key(key)?;
                self.len += 1;
                self.debug_check();
                let entry = self.slots[i].insert((owned, value));
                Ok((entry, None))
            }
        }
    }

    /// Double the slot count and reinsert every entry. Keys move into the
    /// new array without being copied. All-or-nothing: on error the old
    /// array and capacity are untouched.
    fn expand(&mut self) -> Result<(), TableError> {
        let capacity = grown_capacity(self.capacity())?;
        let mut slots = alloc_slots(capacity)?;

        for (key, value) in mem::take(&mut self.slots).into_iter().flatten() {
            let hash = hash_key(&self.hasher, &key);
            let i = probe(&slots, hash, &key).index();
            debug_assert!(slots[i].is_none(), "duplicate key during rehash");
            slots[i] = Some((key, value));
        }

        self.slots = slots;
        self.debug_check();
        Ok(())
    }

    #[inline]
    fn debug_check(&self) {
        debug_assert!(self.capacity().is_power_of_two());
        debug_assert!(self.len < self.capacity());
    }
}

impl<V, S> Table<V, S> {
    /// Cursor over `(key, value)` in slot order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            slots: self.slots.iter_mut(),
            remaining: self.len,
        }
    }

    pub fn keys(&self) -> Keys<'_, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, V> {
        Values { inner: self.iter() }
    }
}

impl<V: fmt::Debug, S> fmt::Debug for Table<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over shared entries of a [`Table`].
///
/// Yields each occupied slot exactly once in physical slot order, then
/// `None` forever.
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Some((k, v)) = slot {
                self.remaining -= 1;
                return Some((k.as_str(), v));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

/// Iterator over entries of a [`Table`] with mutable values.
pub struct IterMut<'a, V> {
    slots: core::slice::IterMut<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (&'a str, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Some((k, v)) = slot {
                self.remaining -= 1;
                return Some((k.as_str(), v));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}
impl<V> FusedIterator for IterMut<'_, V> {}

/// Owning iterator; hands every key and value back to the caller.
pub struct IntoIter<V> {
    slots: std::vec::IntoIter<Slot<V>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = (String, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if slot.is_some() {
                self.remaining -= 1;
                return slot;
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}
impl<V> FusedIterator for IntoIter<V> {}

pub struct Keys<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<&'a str> {
        self.inner.next().map(|(k, _)| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}
impl<V> FusedIterator for Keys<'_, V> {}

pub struct Values<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}
impl<V> FusedIterator for Values<'_, V> {}

impl<V, S> IntoIterator for Table<V, S> {
    type Item = (String, V);
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> IntoIter<V> {
        IntoIter {
            slots: self.slots.into_iter(),
            remaining: self.len,
        }
    }
}

impl<'a, V, S> IntoIterator for &'a Table<V, S> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

impl<'a, V, S> IntoIterator for &'a mut Table<V, S> {
    type Item = (&'a str, &'a mut V);
    type IntoIter = IterMut<'a, V>;

    fn into_iter(self) -> IterMut<'a, V> {
        self.iter_mut()
    }
}
