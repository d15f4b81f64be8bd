//! A raw open-addressing hash table with linear probing.
//!
//! [`HashTable`] stores values in a single contiguous array of slots. Every
//! value lives on the probe sequence that starts at `hash % capacity`, and
//! every slot between that start and the value's slot is occupied. Removal
//! uses backward-shift deletion so this holds without tombstones.

use alloc::alloc::handle_alloc_error;
use alloc::vec::Vec;
use core::alloc::Layout;
use core::fmt::Debug;
use core::iter::FusedIterator;

use crate::error::TryReserveError;

/// Number of slots allocated by [`HashTable::new`].
pub const DEFAULT_CAPACITY: usize = 16;

/// Largest number of entries `capacity` slots may hold (load factor 0.75).
///
/// Always strictly less than `capacity`, so a table never fills up and every
/// probe meets a free slot eventually.
#[inline(always)]
fn max_load(capacity: usize) -> usize {
    ((capacity as u128 * 3) / 4) as usize
}

/// Smallest slot count that holds `entries` entries under the load factor.
#[inline(always)]
fn slots_for(entries: usize) -> Result<usize, TryReserveError> {
    let slots = (entries as u128 * 4).div_ceil(3);
    usize::try_from(slots)
        .map(|slots| slots.max(1))
        .map_err(|_| TryReserveError::CapacityOverflow)
}

/// Returns true if `home` lies in the cyclic range `(hole, next]`.
#[inline(always)]
fn in_cyclic_range(home: usize, hole: usize, next: usize) -> bool {
    if hole <= next {
        hole < home && home <= next
    } else {
        hole < home || home <= next
    }
}

#[derive(Clone)]
struct Slot<V> {
    hash: u64,
    value: V,
}

fn allocate<V>(slots: usize) -> Result<Vec<Option<Slot<V>>>, TryReserveError> {
    Layout::array::<Option<Slot<V>>>(slots).map_err(|_| TryReserveError::CapacityOverflow)?;

    let mut storage = Vec::new();
    storage
        .try_reserve_exact(slots)
        .map_err(|_| TryReserveError::AllocError { slots })?;
    storage.resize_with(slots, || None);
    Ok(storage)
}

#[cold]
#[inline(never)]
fn allocation_failure<V>(err: TryReserveError) -> ! {
    match err {
        TryReserveError::AllocError { slots } => match Layout::array::<Option<Slot<V>>>(slots) {
            Ok(layout) => handle_alloc_error(layout),
            Err(_) => panic!("capacity overflow"),
        },
        TryReserveError::CapacityOverflow => panic!("capacity overflow"),
    }
}

/// Probe-length histogram for a table.
///
/// `counts[d]` is the number of entries stored `d` slots past their home
/// slot.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram {
    /// Number of entries per displacement.
    pub counts: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Returns the longest displacement of any entry, or `None` if the table
    /// is empty.
    pub fn max_displacement(&self) -> Option<usize> {
        self.counts.iter().rposition(|&count| count != 0)
    }

    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            std::println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        std::println!(
            "probe histogram ({} entries):",
            self.counts.iter().sum::<usize>()
        );
        for (displacement, &count) in self.counts.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            std::println!(
                "{:>3} | {} ({})",
                displacement,
                "█".repeat(width),
                count
            );
        }
    }
}

/// Debug statistics for hash table analysis.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of entries currently in the table
    pub populated: usize,
    /// Number of slots allocated
    pub capacity: usize,
    /// Number of entries the table holds before it grows
    pub max_load: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Longest distance of any entry from its home slot
    pub max_probe_length: usize,
    /// Mean distance of entries from their home slot
    pub mean_probe_length: f64,
    /// Total memory in bytes used by the slot array
    pub total_bytes: usize,
    /// Bytes held by empty slots
    pub wasted_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        std::println!("=== Hash Table Debug Statistics ===");
        std::println!(
            "Population: {}/{} slots ({:.2}% load factor, grows past {})",
            self.populated,
            self.capacity,
            self.load_factor * 100.0,
            self.max_load
        );
        std::println!(
            "Probe length: max {}, mean {:.3}",
            self.max_probe_length,
            self.mean_probe_length
        );
        std::println!("Total Allocated: {} bytes", self.total_bytes);
        std::println!(
            "Memory: {} bytes wasted ({:.02}%)",
            self.wasted_bytes,
            if self.total_bytes == 0 {
                0.0
            } else {
                (self.wasted_bytes as f64 / self.total_bytes as f64) * 100.0
            }
        );
    }
}

/// An open-addressing hash table using linear probing.
///
/// `HashTable<V>` stores values of type `V`. Like a raw table, it requires
/// you to provide both the hash value and an equality predicate for each
/// operation; [`HashMap`](crate::HashMap) builds the usual keyed interface on
/// top of it.
///
/// The table grows by doubling whenever admitting one more entry would push
/// the load factor above 0.75. It never shrinks, except that
/// [`clear`](Self::clear) returns it to the slot count it was created with.
///
/// ## Example
///
/// ```rust
/// use probe_hash::hash::hash_int;
/// use probe_hash::hash_table::Entry;
/// use probe_hash::hash_table::HashTable;
///
/// #[derive(Debug, PartialEq)]
/// struct Person {
///     id: u64,
///     name: String,
/// }
///
/// let mut table = HashTable::new();
/// let hash = hash_int(&123u64);
///
/// match table.entry(hash, |p: &Person| p.id == 123) {
///     Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     Entry::Occupied(_) => unreachable!(),
/// }
///
/// assert_eq!(table.find(hash, |p| p.id == 123).map(|p| p.name.as_str()), Some("Alice"));
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    slots: Vec<Option<Slot<V>>>,
    populated: usize,
    initial_capacity: usize,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;

        let slots = self
            .slots
            .iter()
            .map(|slot| match slot {
                Some(slot) => format!("{:016x}", slot.hash),
                None => String::from("................"),
            })
            .collect::<Vec<_>>();

        f.debug_struct("HashTable")
            .field("slots", &slots)
            .field("populated", &self.populated)
            .field("capacity", &self.slots.len())
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with [`DEFAULT_CAPACITY`] slots.
    pub fn new() -> Self {
        Self::with_slots(DEFAULT_CAPACITY)
    }

    /// Creates an empty table that holds at least `capacity` entries before
    /// it grows.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(100);
    /// assert!(table.capacity() >= 100);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(table) => table,
            Err(err) => allocation_failure::<V>(err),
        }
    }

    /// Fallible version of [`with_capacity`](Self::with_capacity).
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let slots = slots_for(capacity)?;
        Ok(Self {
            slots: allocate(slots)?,
            populated: 0,
            initial_capacity: slots,
        })
    }

    fn with_slots(slots: usize) -> Self {
        match allocate(slots) {
            Ok(storage) => Self {
                slots: storage,
                populated: 0,
                initial_capacity: slots,
            },
            Err(err) => allocation_failure::<V>(err),
        }
    }

    /// Returns the number of slots in the table.
    ///
    /// At most three quarters of them are ever occupied.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of elements in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table contains no elements.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    #[inline(always)]
    fn home(&self, hash: u64) -> usize {
        (hash % self.slots.len() as u64) as usize
    }

    #[inline(always)]
    fn next_index(&self, index: usize) -> usize {
        if index + 1 == self.slots.len() {
            0
        } else {
            index + 1
        }
    }

    /// Walks the probe sequence for `hash`.
    ///
    /// Returns `Ok(index)` of the matching slot, or `Err(index)` of the first
    /// free slot, which is where the value would be inserted.
    #[inline]
    fn probe(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Result<usize, usize> {
        let mut index = self.home(hash);
        loop {
            match &self.slots[index] {
                None => return Err(index),
                Some(slot) if slot.hash == hash && eq(&slot.value) => return Ok(index),
                Some(_) => index = self.next_index(index),
            }
        }
    }

    /// Stores `slot` in the first free slot of its probe sequence.
    ///
    /// The caller guarantees no equal value is present.
    fn place(&mut self, slot: Slot<V>) {
        let mut index = self.home(slot.hash);
        while self.slots[index].is_some() {
            index = self.next_index(index);
        }
        self.slots[index] = Some(slot);
        self.populated += 1;
    }

    /// Finds a value in the table by hash and equality predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash::hash_int;
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(hash_int(&42u64), |&n: &u64| n == 42).or_insert(42);
    ///
    /// assert_eq!(table.find(hash_int(&42u64), |&n| n == 42), Some(&42));
    /// assert_eq!(table.find(hash_int(&99u64), |&n| n == 99), None);
    /// ```
    #[inline]
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        if self.populated == 0 {
            return None;
        }

        let index = self.probe(hash, eq).ok()?;
        self.slots[index].as_ref().map(|slot| &slot.value)
    }

    /// Finds a value in the table by hash and equality predicate, returning a
    /// mutable reference.
    #[inline]
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        if self.populated == 0 {
            return None;
        }

        let index = self.probe(hash, eq).ok()?;
        self.slots[index].as_mut().map(|slot| &mut slot.value)
    }

    /// Gets an entry for the given hash and equality predicate.
    ///
    /// If admitting one more entry would exceed the load factor, the table
    /// grows first, so a returned [`VacantEntry`] can always be filled
    /// without further reorganization.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash::hash_str;
    /// # use probe_hash::hash_table::Entry;
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// let hash = hash_str("hello");
    ///
    /// match table.entry(hash, |s: &String| s == "hello") {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert("hello".to_string());
    ///     }
    ///     Entry::Occupied(mut entry) => {
    ///         *entry.get_mut() = "updated".to_string();
    ///     }
    /// }
    ///
    /// assert_eq!(table.len(), 1);
    /// ```
    #[inline]
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        self.reserve(1);
        match self.probe(hash, eq) {
            Ok(index) => Entry::Occupied(OccupiedEntry { table: self, index }),
            Err(index) => Entry::Vacant(VacantEntry {
                table: self,
                hash,
                index,
            }),
        }
    }

    /// Removes and returns a value from the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash::hash_int;
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(hash_int(&42u64), |&n: &u64| n == 42).or_insert(42);
    ///
    /// assert_eq!(table.remove(hash_int(&42u64), |&n| n == 42), Some(42));
    /// assert!(table.is_empty());
    /// assert_eq!(table.remove(hash_int(&42u64), |&n| n == 42), None);
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        if self.populated == 0 {
            return None;
        }

        let index = self.probe(hash, eq).ok()?;
        Some(self.remove_at(index))
    }

    /// Empties the slot at `index` and closes the gap it leaves.
    ///
    /// Each later member of the cluster whose home slot is not in
    /// `(hole, next]` would become unreachable behind the hole, so it is
    /// shifted back into it and the hole moves forward.
    fn remove_at(&mut self, index: usize) -> V {
        let removed = match self.slots[index].take() {
            Some(slot) => slot.value,
            None => unreachable!("removing an empty slot"),
        };
        self.populated -= 1;

        let mut hole = index;
        let mut next = self.next_index(hole);
        while let Some(slot) = &self.slots[next] {
            let home = self.home(slot.hash);
            if !in_cyclic_range(home, hole, next) {
                self.slots.swap(hole, next);
                hole = next;
            }
            next = self.next_index(next);
        }

        removed
    }

    /// Removes every value for which `keep` returns `false`, returning how
    /// many were removed.
    ///
    /// Each value is offered to `keep` exactly once. The surviving values are
    /// re-placed into a fresh slot array of the same capacity, so the order
    /// of the scan is unaffected by the removals it performs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash::hash_int;
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// for n in 0..10u64 {
    ///     table.entry(hash_int(&n), |&v: &u64| v == n).or_insert(n);
    /// }
    ///
    /// assert_eq!(table.retain(|n| *n % 2 == 1), 5);
    /// assert_eq!(table.len(), 5);
    /// assert!(table.find(hash_int(&4u64), |&v| v == 4).is_none());
    /// ```
    pub fn retain(&mut self, mut keep: impl FnMut(&mut V) -> bool) -> usize {
        if self.populated == 0 {
            return 0;
        }

        let fresh = match allocate(self.slots.len()) {
            Ok(storage) => storage,
            Err(err) => allocation_failure::<V>(err),
        };
        let snapshot = core::mem::replace(&mut self.slots, fresh);
        let before = self.populated;
        self.populated = 0;

        for mut slot in snapshot.into_iter().flatten() {
            if keep(&mut slot.value) {
                self.place(slot);
            }
        }

        let removed = before - self.populated;
        log::trace!(
            "retain removed {} of {} entries ({} slots)",
            removed,
            before,
            self.slots.len()
        );
        removed
    }

    /// Removes all elements and returns the table to the slot count it was
    /// created with.
    ///
    /// A table that has grown therefore gives its extra slots back.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash::hash_int;
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// let initial = table.capacity();
    /// for n in 0..100u64 {
    ///     table.entry(hash_int(&n), |&v: &u64| v == n).or_insert(n);
    /// }
    /// assert!(table.capacity() > initial);
    ///
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), initial);
    /// ```
    pub fn clear(&mut self) {
        if self.slots.len() == self.initial_capacity {
            self.slots.iter_mut().for_each(|slot| *slot = None);
        } else {
            self.slots = match allocate(self.initial_capacity) {
                Ok(storage) => storage,
                Err(err) => allocation_failure::<V>(err),
            };
        }

        log::trace!(
            "cleared {} entries, capacity reset to {} slots",
            self.populated,
            self.initial_capacity
        );
        self.populated = 0;
    }

    /// Reserves capacity for at least `additional` more elements.
    ///
    /// The slot count keeps doubling until `self.len() + additional` entries
    /// fit under the load factor. Does nothing if capacity is already
    /// sufficient.
    ///
    /// # Panics
    ///
    /// Panics if the new slot count overflows `usize`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<i32> = HashTable::new();
    /// table.reserve(50);
    /// assert!(table.capacity() * 3 / 4 >= 50);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        if let Err(err) = self.grow_for(additional) {
            allocation_failure::<V>(err);
        }
    }

    /// Tries to reserve capacity for at least `additional` more elements.
    ///
    /// On error the table is left unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::TryReserveError;
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u8> = HashTable::new();
    /// assert_eq!(table.try_reserve(usize::MAX), Err(TryReserveError::CapacityOverflow));
    /// assert_eq!(table.try_reserve(10), Ok(()));
    /// ```
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.grow_for(additional).inspect_err(|err| {
            log::warn!(
                "failed to reserve {} additional entries ({} slots, {} entries): {}",
                additional,
                self.slots.len(),
                self.populated,
                err
            );
        })
    }

    fn grow_for(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let required = self
            .populated
            .checked_add(additional)
            .ok_or(TryReserveError::CapacityOverflow)?;
        if required <= max_load(self.slots.len()) {
            return Ok(());
        }

        let mut capacity = self.slots.len();
        while max_load(capacity) < required {
            capacity = capacity
                .checked_mul(2)
                .ok_or(TryReserveError::CapacityOverflow)?;
        }

        self.resize_rehash(capacity)
    }

    #[cold]
    fn resize_rehash(&mut self, capacity: usize) -> Result<(), TryReserveError> {
        debug_assert!(capacity > self.slots.len());

        let fresh = allocate(capacity)?;
        let old = core::mem::replace(&mut self.slots, fresh);
        log::debug!(
            "growing hash table from {} to {} slots ({} entries)",
            old.len(),
            capacity,
            self.populated
        );

        self.populated = 0;
        for slot in old.into_iter().flatten() {
            self.place(slot);
        }

        Ok(())
    }

    /// Returns an iterator over all values in the table.
    ///
    /// Values are yielded in slot order, which depends on the hashes and the
    /// current capacity rather than on insertion order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator over mutable references to all values in the
    /// table.
    ///
    /// The caller must not change values in a way that alters their hash or
    /// their answer to the equality predicates used to find them.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            slots: self.slots.iter_mut(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator that removes and yields all values from the table.
    ///
    /// After `drain()` is dropped the table is empty, even if the iterator
    /// was not fully consumed. Capacity is retained.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash::hash_str;
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table
    ///     .entry(hash_str("key1"), |s: &String| s == "key1")
    ///     .or_insert("key1".to_string());
    ///
    /// let values: Vec<String> = table.drain().collect();
    /// assert!(table.is_empty());
    /// assert_eq!(values.len(), 1);
    /// ```
    pub fn drain(&mut self) -> Drain<'_, V> {
        Drain {
            table: self,
            index: 0,
        }
    }

    /// Returns a cursor positioned before the first occupied slot.
    ///
    /// The cursor holds the table mutably borrowed, so the table cannot be
    /// restructured while it is alive.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash::hash_int;
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// for n in 0..4u64 {
    ///     table.entry(hash_int(&n), |&v: &u64| v == n).or_insert(n);
    /// }
    ///
    /// let mut cursor = table.cursor();
    /// while cursor.move_next() {
    ///     if let Some(value) = cursor.current_mut() {
    ///         *value *= 10;
    ///     }
    /// }
    ///
    /// assert_eq!(table.iter().sum::<u64>(), 60);
    /// ```
    pub fn cursor(&mut self) -> Cursor<'_, V> {
        Cursor {
            table: self,
            next: 0,
            current: None,
        }
    }

    /// Computes a histogram of displacements (distance from home slot) for
    /// the current table state.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let capacity = self.slots.len();
        let mut counts = alloc::vec![0usize; 1];

        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(slot) = slot {
                let displacement = (index + capacity - self.home(slot.hash)) % capacity;
                if displacement >= counts.len() {
                    counts.resize(displacement + 1, 0);
                }
                counts[displacement] += 1;
            }
        }

        ProbeHistogram { counts }
    }

    /// Returns detailed utilization statistics for debugging.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let histogram = self.probe_histogram();
        let capacity = self.slots.len();
        let total_probe: usize = histogram
            .counts
            .iter()
            .enumerate()
            .map(|(displacement, count)| displacement * count)
            .sum();
        let slot_size = core::mem::size_of::<Option<Slot<V>>>();

        DebugStats {
            populated: self.populated,
            capacity,
            max_load: max_load(capacity),
            load_factor: self.populated as f64 / capacity as f64,
            max_probe_length: histogram.max_displacement().unwrap_or(0),
            mean_probe_length: if self.populated == 0 {
                0.0
            } else {
                total_probe as f64 / self.populated as f64
            },
            total_bytes: capacity * slot_size,
            wasted_bytes: (capacity - self.populated) * slot_size,
        }
    }
}

impl<V> IntoIterator for HashTable<V> {
    type Item = V;
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> IntoIter<V> {
        IntoIter {
            remaining: self.populated,
            slots: self.slots.into_iter(),
        }
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// A vacant entry - no matching value is present in the table
    Vacant(VacantEntry<'a, V>),
    /// An occupied entry - a matching value is present in the table
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash::hash_str;
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// let hash = hash_str("key");
    ///
    /// let value = table
    ///     .entry(hash, |s: &String| s == "key")
    ///     .or_insert("key".to_string());
    /// assert_eq!(value, "key");
    ///
    /// let existing = table
    ///     .entry(hash, |s: &String| s == "key")
    ///     .or_insert("other".to_string());
    /// assert_eq!(existing, "key");
    /// ```
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from a closure if the entry is vacant and
    /// returns a mutable reference to the value in the entry.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to an occupied entry's value and returns it. Returns
    /// `None` without inserting anything if the entry is vacant.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Option<&'a mut V> {
        match self {
            Entry::Occupied(entry) => {
                let value = entry.into_mut();
                f(value);
                Some(value)
            }
            Entry::Vacant(_) => None,
        }
    }

    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the hash table.
///
/// Holds the first free slot on the probe sequence of its hash.
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
    index: usize,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Inserts a value into the vacant entry and returns a mutable reference to
    /// it.
    pub fn insert(self, value: V) -> &'a mut V {
        let VacantEntry { table, hash, index } = self;
        table.populated += 1;
        debug_assert!(table.populated <= max_load(table.slots.len()));

        let slot = &mut table.slots[index];
        debug_assert!(slot.is_none());
        &mut slot.insert(Slot { hash, value }).value
    }
}

/// A view into an occupied entry in the hash table.
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        match &self.table.slots[self.index] {
            Some(slot) => &slot.value,
            None => unreachable!("occupied entry points at an empty slot"),
        }
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        match &mut self.table.slots[self.index] {
            Some(slot) => &mut slot.value,
            None => unreachable!("occupied entry points at an empty slot"),
        }
    }

    /// Converts the entry into a mutable reference to the value, bound to the
    /// table's lifetime.
    pub fn into_mut(self) -> &'a mut V {
        let OccupiedEntry { table, index } = self;
        match &mut table.slots[index] {
            Some(slot) => &mut slot.value,
            None => unreachable!("occupied entry points at an empty slot"),
        }
    }

    /// Removes the value from the table and returns it.
    pub fn remove(self) -> V {
        self.table.remove_at(self.index)
    }
}

/// A cursor over the occupied slots of a [`HashTable`].
///
/// Created by [`HashTable::cursor`]. The cursor starts before the first
/// occupied slot; each [`move_next`](Self::move_next) advances it to the next
/// one in slot order.
pub struct Cursor<'a, V> {
    table: &'a mut HashTable<V>,
    next: usize,
    current: Option<usize>,
}

impl<V> Cursor<'_, V> {
    /// Advances to the next occupied slot. Returns `false`, and leaves the
    /// cursor without a current value, once every slot has been visited.
    pub fn move_next(&mut self) -> bool {
        while self.next < self.table.slots.len() {
            let index = self.next;
            self.next += 1;
            if self.table.slots[index].is_some() {
                self.current = Some(index);
                return true;
            }
        }

        self.current = None;
        false
    }

    /// Returns the value under the cursor.
    pub fn current(&self) -> Option<&V> {
        let index = self.current?;
        self.table.slots[index].as_ref().map(|slot| &slot.value)
    }

    /// Returns the value under the cursor mutably.
    pub fn current_mut(&mut self) -> Option<&mut V> {
        let index = self.current?;
        self.table.slots[index].as_mut().map(|slot| &mut slot.value)
    }
}

/// An iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Option<Slot<V>>>,
    remaining: usize,
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if let Some(slot) = slot {
                self.remaining -= 1;
                return Some(&slot.value);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

/// A mutable iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`iter_mut`] method on [`HashTable`].
///
/// [`iter_mut`]: HashTable::iter_mut
pub struct IterMut<'a, V> {
    slots: core::slice::IterMut<'a, Option<Slot<V>>>,
    remaining: usize,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if let Some(slot) = slot {
                self.remaining -= 1;
                return Some(&mut slot.value);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}
impl<V> FusedIterator for IterMut<'_, V> {}

/// An owning iterator over the values of a [`HashTable`].
pub struct IntoIter<V> {
    slots: alloc::vec::IntoIter<Option<Slot<V>>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.slots.by_ref() {
            if let Some(slot) = slot {
                self.remaining -= 1;
                return Some(slot.value);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}
impl<V> FusedIterator for IntoIter<V> {}

/// A draining iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`].
/// It yields owned `V` values and empties the table as it iterates.
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<V> Drop for Drain<'_, V> {
    fn drop(&mut self) {
        for _ in &mut *self {}
        log::trace!("drained table ({} slots)", self.table.slots.len());
    }
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.table.populated == 0 {
            return None;
        }

        while self.index < self.table.slots.len() {
            let index = self.index;
            self.index += 1;
            if let Some(slot) = self.table.slots[index].take() {
                self.table.populated -= 1;
                return Some(slot.value);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.populated, Some(self.table.populated))
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}
