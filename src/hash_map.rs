use core::fmt::Debug;
use core::iter::FusedIterator;

use crate::error::TryReserveError;
use crate::hash::KeyHasher;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;

/// A hash map implemented on top of the linear-probing [`HashTable`].
///
/// `HashMap<K, V, H>` stores key-value pairs where keys implement `Eq` and
/// are hashed by a [`KeyHasher`] `H` fixed for the lifetime of the map. The
/// hasher can be a plain function such as [`hash_int`](crate::hash::hash_int),
/// a closure, or any [`BuildHasher`](core::hash::BuildHasher) wrapped in
/// [`BuildHasherAdapter`](crate::hash::BuildHasherAdapter).
///
/// # Performance Characteristics
///
/// - **Memory**: one `u64` hash and the `Option` discriminant per slot, plus
///   the size of `(K, V)`; at least a quarter of the slots are always empty
/// - **Lookups**: expected O(1), probing consecutive slots from `hash %
///   capacity`
#[derive(Clone)]
pub struct HashMap<K, V, H> {
    table: HashTable<(K, V)>,
    hasher: H,
}

impl<K, V, H> Debug for HashMap<K, V, H>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V, H> HashMap<K, V, H> {
    /// Creates a new hash map that hashes keys with `hasher`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashMap;
    /// use probe_hash::hash::hash_int;
    ///
    /// let map: HashMap<i32, String, _> = HashMap::with_hasher(hash_int::<i32>);
    /// assert!(map.is_empty());
    /// ```
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            table: HashTable::new(),
            hasher,
        }
    }

    /// Creates a new hash map that holds at least `capacity` entries before
    /// it grows.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashMap;
    /// use probe_hash::hash::hash_int;
    ///
    /// let map: HashMap<u64, String, _> = HashMap::with_capacity_and_hasher(100, hash_int::<u64>);
    /// assert!(map.capacity() >= 100);
    /// ```
    pub fn with_capacity_and_hasher(capacity: usize, hasher: H) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hasher,
        }
    }

    /// Returns a reference to the map's key hasher.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashMap;
    /// # use probe_hash::hash::hash_int;
    /// #
    /// let mut map = HashMap::with_hasher(hash_int::<i32>);
    /// assert_eq!(map.len(), 0);
    /// map.insert(1, "a");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the underlying table.
    ///
    /// The map grows once it would hold more than three quarters of this
    /// many entries.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes all elements from the map.
    ///
    /// The map returns to the slot count it was created with.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashMap;
    /// # use probe_hash::hash::hash_int;
    /// #
    /// let mut map = HashMap::with_hasher(hash_int::<i32>);
    /// let initial = map.capacity();
    /// for i in 0..100 {
    ///     map.insert(i, i);
    /// }
    ///
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), initial);
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Reserves capacity for at least `additional` more elements.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Tries to reserve capacity for at least `additional` more elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashMap;
    /// # use probe_hash::TryReserveError;
    /// # use probe_hash::hash::hash_int;
    /// #
    /// let mut map: HashMap<u8, u8, _> = HashMap::with_hasher(hash_int::<u8>);
    /// assert_eq!(map.try_reserve(200), Ok(()));
    /// assert_eq!(map.try_reserve(usize::MAX), Err(TryReserveError::CapacityOverflow));
    /// ```
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.table.try_reserve(additional)
    }

    /// Keeps only the entries for which `keep` returns `true`.
    ///
    /// `keep` is called exactly once per entry.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.table.retain(|(k, v)| keep(&*k, v));
    }

    /// Removes every entry for which `pred` returns `true` and returns how
    /// many were removed.
    ///
    /// `pred` sees every entry exactly once, however the removals reshape
    /// the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashMap;
    /// # use probe_hash::hash::hash_int;
    /// #
    /// let mut map = HashMap::with_hasher(hash_int::<u32>);
    /// for k in 0..1000 {
    ///     map.insert(k, k * 10);
    /// }
    ///
    /// assert_eq!(map.erase_if(|k, _| k % 2 == 0), 500);
    /// assert_eq!(map.len(), 500);
    /// assert!(map.keys().all(|k| k % 2 == 1));
    /// ```
    pub fn erase_if<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.table.retain(|(k, v)| !pred(&*k, &*v))
    }

    /// Returns an iterator over the key-value pairs of the map, in slot
    /// order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashMap;
    /// # use probe_hash::hash::hash_int;
    /// #
    /// let mut map = HashMap::with_hasher(hash_int::<i32>);
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    ///
    /// let mut pairs: Vec<_> = map.iter().collect();
    /// pairs.sort();
    /// assert_eq!(pairs, vec![(&1, &"a"), (&2, &"b")]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the key-value pairs of the map with mutable
    /// references to the values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Returns an iterator over the keys of the map.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the map.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable references to the values of the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashMap;
    /// # use probe_hash::hash::hash_int;
    /// #
    /// let mut map = HashMap::with_hasher(hash_int::<i32>);
    /// map.insert(1, 10);
    /// map.insert(2, 20);
    ///
    /// for value in map.values_mut() {
    ///     *value += 1;
    /// }
    /// assert_eq!(map.get(&2), Some(&21));
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Clears the map, returning all key-value pairs as an iterator.
    ///
    /// Capacity is retained.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Returns a cursor positioned before the first entry.
    ///
    /// The cursor exclusively borrows the map, so entries cannot be added or
    /// removed until it is dropped, but values can be replaced in place.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashMap;
    /// # use probe_hash::hash::hash_int;
    /// #
    /// let mut map = HashMap::with_hasher(hash_int::<i32>);
    /// map.insert(1, "one");
    /// map.insert(2, "two");
    ///
    /// let mut cursor = map.cursor();
    /// while cursor.move_next() {
    ///     if let Some((&k, _)) = cursor.current() {
    ///         if k == 2 {
    ///             assert_eq!(cursor.set_value("zwei"), Some("two"));
    ///         }
    ///     }
    /// }
    ///
    /// assert_eq!(map.get(&2), Some(&"zwei"));
    /// ```
    pub fn cursor(&mut self) -> Cursor<'_, K, V> {
        Cursor {
            inner: self.table.cursor(),
        }
    }

    /// Computes a histogram of how far each entry sits from its home slot.
    #[cfg(feature = "stats")]
    pub fn probe_histogram(&self) -> crate::hash_table::ProbeHistogram {
        self.table.probe_histogram()
    }

    /// Returns utilization statistics of the underlying table.
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats()
    }
}

impl<K, V, H> HashMap<K, V, H>
where
    K: Eq,
    H: KeyHasher<K>,
{
    /// Inserts a key-value pair into the map.
    ///
    /// If the map already had this key, the value is replaced, the old value
    /// is returned and the length is unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashMap;
    /// # use probe_hash::hash::hash_int;
    /// #
    /// let mut map = HashMap::with_hasher(hash_int::<i32>);
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map.get(&37), Some(&"b"));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hasher.hash_key(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(mut entry) => {
                let old_value = core::mem::replace(&mut entry.get_mut().1, value);
                Some(old_value)
            }
            TableEntry::Vacant(entry) => {
                entry.insert((key, value));
                None
            }
        }
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashMap;
    /// # use probe_hash::hash::hash_int;
    /// #
    /// let mut map = HashMap::with_hasher(hash_int::<i32>);
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = self.hasher.hash_key(key);
        self.table.find(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns the stored key and value corresponding to the key.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let hash = self.hasher.hash_key(key);
        self.table.find(hash, |(k, _)| k == key).map(|(k, v)| (k, v))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.hasher.hash_key(key);
        self.table
            .find_mut(hash, |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// Removing an absent key is a no-op.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashMap;
    /// # use probe_hash::hash::hash_int;
    /// #
    /// let mut map = HashMap::with_hasher(hash_int::<i32>);
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was previously in the map.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.hasher.hash_key(key);
        self.table.remove(hash, |(k, _)| k == key)
    }

    /// Gets the given key's corresponding entry in the map for in-place
    /// manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::HashMap;
    /// # use probe_hash::hash::hash_str;
    /// #
    /// let mut letters = HashMap::with_hasher(hash_str::<String>);
    /// for word in ["apple", "avocado", "banana"] {
    ///     let first = word[..1].to_string();
    ///     *letters.entry(first).or_insert(0) += 1;
    /// }
    ///
    /// assert_eq!(letters.get(&"a".to_string()), Some(&2));
    /// assert_eq!(letters.get(&"b".to_string()), Some(&1));
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let hash = self.hasher.hash_key(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        }
    }
}

impl<K, V, H> HashMap<K, V, H>
where
    H: Default,
{
    /// Creates a new hash map using the default key hasher.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashMap;
    /// use probe_hash::hash::DefaultHasher;
    ///
    /// let mut map: HashMap<&str, i32, DefaultHasher> = HashMap::new();
    /// map.insert("a", 1);
    /// assert_eq!(map.get(&"a"), Some(&1));
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(H::default())
    }

    /// Creates a new hash map with the specified capacity using the default
    /// key hasher.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, H::default())
    }
}

impl<K, V, H> Default for HashMap<K, V, H>
where
    H: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H> PartialEq for HashMap<K, V, H>
where
    K: Eq,
    V: PartialEq,
    H: KeyHasher<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|other_v| v == other_v))
    }
}

impl<K, V, H> Eq for HashMap<K, V, H>
where
    K: Eq,
    V: Eq,
    H: KeyHasher<K>,
{
}

impl<K, V, H> Extend<(K, V)> for HashMap<K, V, H>
where
    K: Eq,
    H: KeyHasher<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, H> FromIterator<(K, V)> for HashMap<K, V, H>
where
    K: Eq,
    H: KeyHasher<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, H> IntoIterator for HashMap<K, V, H> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K, V, H> IntoIterator for &'a HashMap<K, V, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, H> IntoIterator for &'a mut HashMap<K, V, H> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

/// A view into a single entry in the map, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashMap`].
///
/// [`entry`]: HashMap::entry
pub enum Entry<'a, K, V> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts a default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from a closure if the entry is vacant and
    /// returns a mutable reference.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the map.
pub struct VacantEntry<'a, K, V> {
    entry: crate::hash_table::VacantEntry<'a, (K, V)>,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a value.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts the value into the map and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.entry.insert((self.key, value)).1
    }
}

/// A view into an occupied entry in the map.
pub struct OccupiedEntry<'a, K, V> {
    entry: crate::hash_table::OccupiedEntry<'a, (K, V)>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        &self.entry.get().0
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.entry.get().1
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.entry.get_mut().1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.entry.into_mut().1
    }

    /// Inserts a value into the entry and returns the old value.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(&mut self.entry.get_mut().1, value)
    }

    /// Removes the entry from the map and returns the value.
    pub fn remove(self) -> V {
        self.entry.remove().1
    }

    /// Removes the entry from the map and returns the key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.remove()
    }
}

/// A cursor over the entries of a [`HashMap`].
///
/// Created by [`HashMap::cursor`]. It starts before the first entry; call
/// [`move_next`](Self::move_next) to advance.
pub struct Cursor<'a, K, V> {
    inner: crate::hash_table::Cursor<'a, (K, V)>,
}

impl<K, V> Cursor<'_, K, V> {
    /// Advances to the next entry, returning `false` once the map is
    /// exhausted.
    pub fn move_next(&mut self) -> bool {
        self.inner.move_next()
    }

    /// Returns the entry under the cursor.
    pub fn current(&self) -> Option<(&K, &V)> {
        self.inner.current().map(|(k, v)| (k, v))
    }

    /// Returns the entry under the cursor with a mutable value.
    pub fn current_mut(&mut self) -> Option<(&K, &mut V)> {
        self.inner.current_mut().map(|(k, v)| (&*k, v))
    }

    /// Replaces the value under the cursor, returning the old one.
    ///
    /// Returns `None` and drops `value` if the cursor is not positioned on
    /// an entry.
    pub fn set_value(&mut self, value: V) -> Option<V> {
        self.inner
            .current_mut()
            .map(|(_, v)| core::mem::replace(v, value))
    }
}

/// An iterator over the key-value pairs of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// A mutable iterator over the key-value pairs of a `HashMap`.
pub struct IterMut<'a, K, V> {
    inner: crate::hash_table::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (&*k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// A mutable iterator over the values of a `HashMap`.
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

/// An owning iterator over the key-value pairs of a `HashMap`.
pub struct IntoIter<K, V> {
    inner: crate::hash_table::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

/// A draining iterator over the key-value pairs of a `HashMap`.
pub struct Drain<'a, K, V> {
    inner: crate::hash_table::Drain<'a, (K, V)>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {}

#[cfg(test)]
mod tests {
    use core::hash::BuildHasher;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use rand::rngs::SmallRng;
    use siphasher::sip::SipHasher;

    use super::*;
    use crate::hash::BuildHasherAdapter;
    use crate::hash::hash_int;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap_or(0),
                k2: rng.try_next_u64().unwrap_or(0),
            }
        }
    }

    type SipMap<K, V> = HashMap<K, V, BuildHasherAdapter<SipHashBuilder>>;

    fn sip_map<K, V>() -> SipMap<K, V> {
        HashMap::with_hasher(BuildHasherAdapter(SipHashBuilder::default()))
    }

    #[test]
    fn test_new_and_with_hasher() {
        let map: SipMap<i32, String> = HashMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.capacity(), crate::DEFAULT_CAPACITY);

        let map2 = HashMap::<i32, String, _>::with_hasher(hash_int::<i32>);
        assert!(map2.is_empty());
    }

    #[test]
    fn test_with_capacity() {
        let map: SipMap<i32, String> = HashMap::with_capacity(100);
        assert!(map.capacity() * 3 / 4 >= 100);
        assert!(map.is_empty());

        let map2 = HashMap::<i32, String, _>::with_capacity_and_hasher(200, hash_int::<i32>);
        assert!(map2.capacity() * 3 / 4 >= 200);
    }

    #[test]
    fn set_set_delete_scenario() {
        let mut map = HashMap::with_hasher(hash_int::<i32>);
        map.insert(1, "a");
        map.insert(2, "b");
        map.remove(&1);

        assert_eq!(map.get(&1), None);
        assert_eq!(map.get(&2), Some(&"b"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn thousand_sequential_keys_then_erase_evens() {
        let mut map = HashMap::with_hasher(hash_int::<i32>);
        for k in 0..1000 {
            map.insert(k, k * 3);
        }
        assert_eq!(map.len(), 1000);
        for k in 0..1000 {
            assert_eq!(map.get(&k), Some(&(k * 3)));
        }

        assert_eq!(map.erase_if(|k, _| k % 2 == 0), 500);
        assert_eq!(map.len(), 500);
        for k in 0..1000 {
            assert_eq!(map.contains_key(&k), k % 2 == 1, "key {k}");
        }
    }

    #[test]
    fn test_insert_and_get() {
        let mut map = sip_map();

        assert_eq!(map.insert(1, "hello".to_string()), None);
        assert_eq!(map.len(), 1);
        assert!(!map.is_empty());

        assert_eq!(map.get(&1), Some(&"hello".to_string()));
        assert_eq!(map.get(&2), None);

        assert_eq!(
            map.insert(1, "world".to_string()),
            Some("hello".to_string())
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&"world".to_string()));
        assert_eq!(map.get_key_value(&1), Some((&1, &"world".to_string())));
    }

    #[test]
    fn overwrite_keeps_length() {
        let mut map = HashMap::with_hasher(hash_int::<u64>);
        for round in 0..5u64 {
            for k in 0..50u64 {
                map.insert(k, round);
            }
            assert_eq!(map.len(), 50);
        }
        assert!(map.values().all(|&v| v == 4));
    }

    #[test]
    fn test_get_mut() {
        let mut map = sip_map();
        map.insert(1, "hello".to_string());

        if let Some(value) = map.get_mut(&1) {
            value.push_str(" world");
        }

        assert_eq!(map.get(&1), Some(&"hello world".to_string()));
        assert_eq!(map.get_mut(&2), None);
    }

    #[test]
    fn test_contains_key() {
        let mut map = sip_map();
        assert!(!map.contains_key(&1));

        map.insert(1, "value".to_string());
        assert!(map.contains_key(&1));
        assert!(!map.contains_key(&2));
    }

    #[test]
    fn test_remove() {
        let mut map = sip_map();
        map.insert(1, "hello".to_string());
        map.insert(2, "world".to_string());

        assert_eq!(map.remove(&1), Some("hello".to_string()));
        assert_eq!(map.len(), 1);
        assert!(!map.contains_key(&1));
        assert!(map.contains_key(&2));

        assert_eq!(map.remove(&1), None);
        assert_eq!(map.remove(&3), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove_entry() {
        let mut map = sip_map();
        map.insert(1, "hello".to_string());

        assert_eq!(map.remove_entry(&1), Some((1, "hello".to_string())));
        assert_eq!(map.remove_entry(&1), None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut map = sip_map();
        let initial = map.capacity();
        for i in 0..100 {
            map.insert(i, i);
        }
        assert!(map.capacity() > initial);

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.capacity(), initial);
        assert_eq!(map.get(&5), None);

        map.insert(5, 50);
        assert_eq!(map.get(&5), Some(&50));
    }

    #[test]
    fn test_reserve() {
        let mut map: SipMap<i32, i32> = sip_map();
        map.reserve(100);
        let capacity = map.capacity();
        for i in 0..100 {
            map.insert(i, i);
        }
        assert_eq!(map.capacity(), capacity);
    }

    #[test]
    fn test_entry_api() {
        let mut map = sip_map();

        match map.entry(1) {
            Entry::Vacant(entry) => {
                assert_eq!(entry.key(), &1);
                entry.insert("one".to_string());
            }
            Entry::Occupied(_) => panic!("expected vacant"),
        }

        *map.entry(1).or_insert("uno".to_string()) += "!";
        assert_eq!(map.get(&1), Some(&"one!".to_string()));

        map.entry(2)
            .and_modify(|v| v.push('?'))
            .or_insert_with(|| "two".to_string());
        map.entry(2)
            .and_modify(|v| v.push('?'))
            .or_insert_with(|| "deux".to_string());
        assert_eq!(map.get(&2), Some(&"two?".to_string()));
        assert_eq!(map.entry(7).key(), &7);
    }

    #[test]
    fn test_entry_or_default() {
        let mut map: SipMap<&str, u32> = sip_map();
        for word in ["a", "b", "a", "c", "a"] {
            *map.entry(word).or_default() += 1;
        }
        assert_eq!(map.get(&"a"), Some(&3));
        assert_eq!(map.get(&"b"), Some(&1));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_occupied_entry() {
        let mut map = sip_map();
        map.insert(1, 10);
        map.insert(2, 20);

        match map.entry(1) {
            Entry::Occupied(mut entry) => {
                assert_eq!(entry.key(), &1);
                assert_eq!(entry.get(), &10);
                assert_eq!(entry.insert(11), 10);
                *entry.get_mut() += 1;
                assert_eq!(entry.remove(), 12);
            }
            Entry::Vacant(_) => panic!("expected occupied"),
        }
        assert!(!map.contains_key(&1));

        match map.entry(2) {
            Entry::Occupied(entry) => assert_eq!(entry.remove_entry(), (2, 20)),
            Entry::Vacant(_) => panic!("expected occupied"),
        }
        assert!(map.is_empty());
    }

    #[test]
    fn test_vacant_entry() {
        let mut map: SipMap<String, i32> = sip_map();
        match map.entry("key".to_string()) {
            Entry::Vacant(entry) => assert_eq!(entry.into_key(), "key"),
            Entry::Occupied(_) => panic!("expected vacant"),
        }
        assert!(map.is_empty());
    }

    #[test]
    fn test_iterators() {
        let mut map = sip_map();
        for i in 0..10 {
            map.insert(i, i * 10);
        }

        let iter = map.iter();
        assert_eq!(iter.len(), 10);
        let mut pairs: Vec<(i32, i32)> = iter.map(|(&k, &v)| (k, v)).collect();
        pairs.sort_unstable();
        assert_eq!(pairs, (0..10).map(|i| (i, i * 10)).collect::<Vec<_>>());

        let mut keys: Vec<i32> = map.keys().copied().collect();
        keys.sort_unstable();
        assert_eq!(keys, (0..10).collect::<Vec<_>>());

        assert_eq!(map.values().sum::<i32>(), 450);

        for (_, v) in map.iter_mut() {
            *v += 1;
        }
        for v in map.values_mut() {
            *v += 1;
        }
        for (_, v) in &mut map {
            *v += 1;
        }
        assert_eq!((&map).into_iter().map(|(_, v)| *v).sum::<i32>(), 480);

        let mut owned: Vec<(i32, i32)> = map.into_iter().collect();
        owned.sort_unstable();
        assert_eq!(owned[3], (3, 33));
    }

    #[test]
    fn test_drain() {
        let mut map = sip_map();
        for i in 0..10 {
            map.insert(i, i);
        }
        let capacity = map.capacity();

        let drain = map.drain();
        assert_eq!(drain.len(), 10);
        let mut drained: Vec<(i32, i32)> = drain.collect();
        drained.sort_unstable();
        assert_eq!(drained.len(), 10);
        assert!(map.is_empty());
        assert_eq!(map.capacity(), capacity);

        map.insert(1, 1);
        drop(map.drain());
        assert!(map.is_empty());
    }

    #[test]
    fn cursor_visits_every_entry_and_sets_values() {
        let mut map = HashMap::with_hasher(hash_int::<u32>);
        for k in 0..20u32 {
            map.insert(k, k);
        }

        let mut visited = Vec::new();
        let mut cursor = map.cursor();
        assert!(cursor.current().is_none());
        assert_eq!(cursor.set_value(0), None);
        while cursor.move_next() {
            let (&k, &v) = cursor.current().unwrap();
            assert_eq!(k, v);
            visited.push(k);
            assert_eq!(cursor.set_value(k * 100), Some(k));
            if let Some((_, v)) = cursor.current_mut() {
                *v += 1;
            }
        }
        assert!(!cursor.move_next());

        visited.sort_unstable();
        assert_eq!(visited, (0..20).collect::<Vec<_>>());
        for k in 0..20u32 {
            assert_eq!(map.get(&k), Some(&(k * 100 + 1)));
        }
    }

    #[test]
    fn cursor_on_empty_map() {
        let mut map: HashMap<u8, u8, _> = HashMap::with_hasher(hash_int::<u8>);
        let mut cursor = map.cursor();
        assert!(!cursor.move_next());
        assert!(cursor.current().is_none());
    }

    #[test]
    fn test_collision_handling() {
        let mut map = HashMap::with_hasher(|_: &u32| 7u64);

        for i in 0..200 {
            map.insert(i, i * 2);
        }
        assert_eq!(map.len(), 200);
        for i in 0..200 {
            assert_eq!(map.get(&i), Some(&(i * 2)));
        }

        for i in (0..200).step_by(2) {
            assert_eq!(map.remove(&i), Some(i * 2));
        }
        assert_eq!(map.len(), 100);
        for i in 0..200 {
            assert_eq!(map.get(&i).is_some(), i % 2 == 1);
        }
    }

    #[test]
    fn erase_if_in_colliding_clusters() {
        // Two hash values so clusters interleave and wrap.
        let mut map = HashMap::with_hasher(|k: &u32| u64::from(k % 2) * 15);
        for k in 0..12u32 {
            map.insert(k, k);
        }

        let mut seen = Vec::new();
        let removed = map.erase_if(|k, _| {
            seen.push(*k);
            k % 3 == 0
        });
        seen.sort_unstable();

        assert_eq!(seen, (0..12).collect::<Vec<_>>());
        assert_eq!(removed, 4);
        for k in 0..12u32 {
            assert_eq!(map.get(&k).is_some(), k % 3 != 0);
        }
    }

    #[test]
    fn test_retain() {
        let mut map = sip_map();
        for i in 0..50 {
            map.insert(i, i);
        }
        map.retain(|k, v| {
            *v *= 2;
            k % 5 == 0
        });
        assert_eq!(map.len(), 10);
        assert_eq!(map.get(&45), Some(&90));
        assert_eq!(map.get(&44), None);
    }

    #[test]
    fn test_string_keys() {
        let mut map = HashMap::with_hasher(crate::hash::hash_str::<String>);

        map.insert("hello".to_string(), 1);
        map.insert("world".to_string(), 2);
        map.insert("rust".to_string(), 3);

        assert_eq!(map.get(&"hello".to_string()), Some(&1));
        assert_eq!(map.get(&"world".to_string()), Some(&2));
        assert_eq!(map.get(&"rust".to_string()), Some(&3));
        assert_eq!(map.get(&"missing".to_string()), None);
    }

    #[test]
    fn test_default_trait() {
        let map: SipMap<i32, String> = HashMap::default();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_extend_from_iter_and_eq() {
        let map: SipMap<i32, i32> = (0..20).map(|i| (i, i * i)).collect();
        assert_eq!(map.len(), 20);

        let mut other: SipMap<i32, i32> = sip_map();
        other.extend((0..20).rev().map(|i| (i, i * i)));
        assert_eq!(map, other);

        other.insert(3, 0);
        assert_ne!(map, other);
        other.insert(3, 9);
        other.insert(99, 0);
        assert_ne!(map, other);
    }

    #[test]
    fn test_debug_and_clone() {
        let mut map = HashMap::with_hasher(hash_int::<i32>);
        map.insert(1, "a");
        assert_eq!(format!("{map:?}"), r#"{1: "a"}"#);

        let mut cloned = map.clone();
        cloned.insert(2, "b");
        assert_eq!(map.len(), 1);
        assert_eq!(cloned.len(), 2);
    }

    #[test]
    fn test_complex_values() {
        let mut map = sip_map();

        let vec1 = vec![1, 2, 3];
        let vec2 = vec![4, 5, 6];

        map.insert("first".to_string(), vec1.clone());
        map.insert("second".to_string(), vec2.clone());

        assert_eq!(map.get(&"first".to_string()), Some(&vec1));
        assert_eq!(map.get(&"second".to_string()), Some(&vec2));

        if let Some(v) = map.get_mut(&"first".to_string()) {
            v.push(4);
        }

        assert_eq!(map.get(&"first".to_string()), Some(&vec![1, 2, 3, 4]));
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn matches_hashbrown_under_random_operations() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let mut map = HashMap::with_capacity_and_hasher(0, hash_int::<u16>);
        let mut model = hashbrown::HashMap::new();

        for step in 0..20_000 {
            let key: u16 = rng.random_range(0..512);
            match rng.random_range(0..10) {
                0..=4 => {
                    let value: u32 = rng.random();
                    assert_eq!(map.insert(key, value), model.insert(key, value), "step {step}");
                }
                5..=7 => {
                    assert_eq!(map.remove(&key), model.remove(&key), "step {step}");
                }
                8 => {
                    assert_eq!(map.get(&key), model.get(&key), "step {step}");
                }
                _ => {
                    let modulus = rng.random_range(2..7u16);
                    let removed = map.erase_if(|k, _| k % modulus == 0);
                    let before = model.len();
                    model.retain(|k, _| k % modulus != 0);
                    assert_eq!(removed, before - model.len(), "step {step}");
                }
            }

            assert_eq!(map.len(), model.len(), "step {step}");
            assert!(map.len() * 4 <= map.capacity() * 3);
        }

        for (k, v) in &model {
            assert_eq!(map.get(k), Some(v));
        }
        assert_eq!(map.iter().count(), model.len());
    }
}
