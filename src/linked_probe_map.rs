use std::{
    borrow::Borrow,
    collections::hash_map::RandomState,
    fmt,
    hash::{BuildHasher, Hash},
    iter,
};

use tracing::trace;

use crate::{
    cursor::{Cursor, CursorMut},
    error::MapError,
    iter::{Iter, IterMut, Keys, Values, ValuesMut},
    slot::{END, Probe, Slot, slot_count_for},
};

/// Smallest logical capacity a table is ever sized for.
const MIN_LOGICAL_CAPACITY: usize = 2;

/// A hash map with linear probing that remembers insertion order.
///
/// Entries live directly in a slot array. Each occupied slot also carries the
/// indices of its insertion-order neighbors, so iteration walks a doubly linked
/// list threaded through the table instead of scanning it.
///
/// The map keeps at most one entry per `logical_capacity / 2` and allocates
/// `ceil(logical_capacity * 1.6)` slots. Removal does not leave tombstones:
/// the entries that followed the removed one in its probe cluster are taken
/// out and inserted again, which moves them to the end of the iteration
/// order.
///
/// ```
/// use linked_probe::LinkedProbeMap;
///
/// let mut map = LinkedProbeMap::new();
/// assert!(map.insert("a", 1));
/// assert!(!map.insert("a", 2));
/// assert_eq!(map.get("a"), Some(&1));
///
/// *map.get_or_insert_default("b") += 5;
/// assert_eq!(map.iter().collect::<Vec<_>>(), [(&"a", &1), (&"b", &5)]);
/// ```
///
/// Note: This implementation is not thread-safe.
pub struct LinkedProbeMap<K, V, S = RandomState> {
    /// The slot table; `None` marks an empty slot
    pub(crate) slots: Vec<Option<Slot<K, V>>>,
    /// Modulus for home slots and the basis of the growth threshold
    pub(crate) logical_capacity: usize,
    /// Number of occupied slots
    pub(crate) len: usize,
    /// First entry in insertion order, or `END`
    pub(crate) head: usize,
    /// Last entry in insertion order, or `END`
    pub(crate) tail: usize,
    /// Builds the hasher used for home slots
    hash_builder: S,
}

/// Allocates `count` empty slots.
fn empty_table<K, V>(count: usize) -> Vec<Option<Slot<K, V>>> {
    iter::repeat_with(|| None).take(count).collect()
}

impl<K, V> LinkedProbeMap<K, V, RandomState> {
    /// Creates an empty map with the smallest logical capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    /// Creates an empty map that holds `capacity` entries before its first rebuild.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<K, V, S> LinkedProbeMap<K, V, S> {
    /// Creates an empty map which will use the given hash builder.
    #[must_use]
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_logical_capacity_and_hasher(MIN_LOGICAL_CAPACITY, hash_builder)
    }

    /// Creates an empty map that holds `capacity` entries before its first rebuild,
    /// using the given hash builder.
    #[must_use]
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self::with_logical_capacity_and_hasher(capacity.saturating_mul(2), hash_builder)
    }

    /// Sizes the table for an exact logical capacity (clamped to the minimum).
    fn with_logical_capacity_and_hasher(logical_capacity: usize, hash_builder: S) -> Self {
        let logical_capacity = logical_capacity.max(MIN_LOGICAL_CAPACITY);
        Self {
            slots: empty_table(slot_count_for(logical_capacity)),
            logical_capacity,
            len: 0,
            head: END,
            tail: END,
            hash_builder,
        }
    }

    /// Returns the number of entries in the map
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the map holds no entries
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns how many entries fit before the next rebuild.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.logical_capacity / 2
    }

    /// Returns the modulus used to compute home slots.
    ///
    /// It starts at `2 * capacity` and doubles on every rebuild.
    #[must_use]
    pub const fn logical_capacity(&self) -> usize {
        self.logical_capacity
    }

    /// Returns the number of allocated slots, `ceil(logical_capacity * 1.6)`.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns `len / logical_capacity`, which never exceeds one half.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.logical_capacity as f64
    }

    /// Returns a reference to the map's hash builder.
    #[must_use]
    pub const fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Iterates over the entries in insertion order.
    #[must_use]
    #[allow(clippy::iter_without_into_iter)]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.slots, self.head, self.len)
    }

    /// Iterates over the entries in insertion order with mutable values.
    #[must_use]
    #[allow(clippy::iter_without_into_iter)]
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.slots, self.head, self.len)
    }

    /// Iterates over the keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Iterates over the values in insertion order.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Iterates over mutable values in insertion order.
    #[must_use]
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut { inner: self.iter_mut() }
    }

    /// Returns the oldest entry.
    #[must_use]
    pub fn front(&self) -> Option<(&K, &V)> {
        self.slot(self.head).map(|slot| (&slot.key, &slot.value))
    }

    /// Returns the newest entry.
    #[must_use]
    pub fn back(&self) -> Option<(&K, &V)> {
        self.slot(self.tail).map(|slot| (&slot.key, &slot.value))
    }

    /// Returns a cursor at the first entry in insertion order, or the end
    /// cursor if the map is empty.
    #[must_use]
    pub const fn cursor_front(&self) -> Cursor<'_, K, V, S> {
        Cursor::new(self, self.head)
    }

    /// Returns the past-the-end cursor.
    #[must_use]
    pub const fn cursor_end(&self) -> Cursor<'_, K, V, S> {
        Cursor::new(self, END)
    }

    /// Returns a mutable cursor at the first entry in insertion order.
    #[must_use]
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, K, V, S> {
        let head = self.head;
        CursorMut::new(self, head)
    }

    /// Removes every entry, oldest first. The logical capacity is kept.
    pub fn clear(&mut self) {
        while self.vacate(self.head).is_some() {}
    }

    /// The occupied slot at `index`, if any.
    pub(crate) fn slot(&self, index: usize) -> Option<&Slot<K, V>> {
        self.slots.get(index)?.as_ref()
    }

    /// The occupied slot at `index` for mutation, if any.
    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut Slot<K, V>> {
        self.slots.get_mut(index)?.as_mut()
    }

    /// Mutable access to a slot a probe reported as occupied.
    #[allow(clippy::indexing_slicing, clippy::unreachable)]
    fn occupied_mut(&mut self, index: usize) -> &mut Slot<K, V> {
        match &mut self.slots[index] {
            Some(slot) => slot,
            None => unreachable!("slot {index} was probed as occupied but is empty"),
        }
    }

    /// The slot after `index`, wrapping at the end of the table.
    fn next_slot(&self, index: usize) -> usize {
        let next = index.saturating_add(1);
        if next >= self.slots.len() { 0 } else { next }
    }

    /// Stores an entry in the empty slot at `index` and appends it to the
    /// insertion order.
    #[allow(clippy::indexing_slicing)]
    fn link_at(&mut self, index: usize, key: K, value: V) -> &mut Slot<K, V> {
        let prev = self.tail;
        match self.slots.get_mut(prev) {
            Some(Some(tail)) => tail.next = index,
            _ => self.head = index,
        }
        self.tail = index;
        self.len = self.len.saturating_add(1);
        self.slots[index].insert(Slot::new(key, value, prev))
    }

    /// Empties the slot at `index` and unlinks it from the insertion order.
    ///
    /// Returns `None` if the slot was already empty (this includes `END`).
    fn vacate(&mut self, index: usize) -> Option<(K, V)> {
        let slot = self.slots.get_mut(index)?.take()?;
        match self.slots.get_mut(slot.prev) {
            Some(Some(prev)) => prev.next = slot.next,
            _ => self.head = slot.next,
        }
        match self.slots.get_mut(slot.next) {
            Some(Some(next)) => next.prev = slot.prev,
            _ => self.tail = slot.prev,
        }
        self.len = self.len.saturating_sub(1);
        Some(slot.into_pair())
    }

    /// Removes every entry and returns them in insertion order.
    fn drain_ordered(&mut self) -> Vec<(K, V)> {
        let mut entries = Vec::with_capacity(self.len);
        while let Some(entry) = self.vacate(self.head) {
            entries.push(entry);
        }
        entries
    }
}

impl<K, V, S> LinkedProbeMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Builds a map from key-value pairs using the given hash builder.
    ///
    /// The map is sized for the number of pairs up front. When a key repeats,
    /// the first pair wins.
    #[must_use]
    pub fn from_iter_with_hasher<I>(iter: I, hash_builder: S) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let entries: Vec<(K, V)> = iter.into_iter().collect();
        let mut map = Self::with_capacity_and_hasher(entries.len(), hash_builder);
        map.extend(entries);
        map
    }

    /// Computes the home slot for a key: `hash(key) mod logical_capacity`.
    #[allow(clippy::arithmetic_side_effects)]
    pub(crate) fn home_slot<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized + Hash,
    {
        let hash = self.hash_builder.hash_one(key);
        let modulus = u64::try_from(self.logical_capacity).unwrap_or(u64::MAX);
        usize::try_from(hash % modulus).unwrap_or_default()
    }

    /// Probes linearly from the key's home slot until it finds the key or an
    /// empty slot.
    ///
    /// The table always has an empty slot because `len * 2 <= logical_capacity`
    /// and there are more slots than `logical_capacity`, so the probe ends.
    pub(crate) fn locate<Q>(&self, key: &Q) -> Probe
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let mut index = self.home_slot(key);
        loop {
            match self.slots.get(index) {
                Some(Some(slot)) if slot.key.borrow() == key => return Probe::Occupied(index),
                Some(Some(_)) => index = self.next_slot(index),
                None | Some(None) => return Probe::Vacant(index),
            }
        }
    }

    /// Inserts a key-value pair if the key is absent.
    ///
    /// Returns `false` and leaves the map untouched when the key is already
    /// present; the stored value is not replaced.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        match self.locate(&key) {
            Probe::Occupied(_) => false,
            Probe::Vacant(index) => {
                self.insert_vacant(index, key, value);
                true
            }
        }
    }

    /// Inserts an absent key whose probe stopped at `index`, growing first if
    /// the new entry would push the load factor above one half.
    fn insert_vacant(&mut self, index: usize, key: K, value: V) -> &mut Slot<K, V> {
        let index = if self.len.saturating_add(1).saturating_mul(2) > self.logical_capacity {
            self.rebuild_to(self.logical_capacity.saturating_mul(2));
            self.locate(&key).index()
        } else {
            index
        };
        self.link_at(index, key, value)
    }

    /// Returns a mutable reference to the value for `key`, inserting
    /// `V::default()` first if the key is absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Returns a mutable reference to the value for `key`, inserting the result
    /// of `default` first if the key is absent.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        match self.locate(&key) {
            Probe::Occupied(index) => &mut self.occupied_mut(index).value,
            Probe::Vacant(index) => &mut self.insert_vacant(index, key, default()).value,
        }
    }

    /// Retrieve a value for a given key
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Retrieve the stored key and its value
    #[must_use]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.locate(key) {
            Probe::Occupied(index) => self.slot(index).map(|slot| (&slot.key, &slot.value)),
            Probe::Vacant(_) => None,
        }
    }

    /// Get a mutable reference to a value for a given key
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.locate(key) {
            Probe::Occupied(index) => self.slot_mut(index).map(|slot| &mut slot.value),
            Probe::Vacant(_) => None,
        }
    }

    /// Returns true if the map contains the given key
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        matches!(self.locate(key), Probe::Occupied(_))
    }

    /// Returns the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if the key is absent.
    pub fn at<Q>(&self, key: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(key).ok_or(MapError::KeyNotFound)
    }

    /// Returns the value for `key` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if the key is absent.
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_mut(key).ok_or(MapError::KeyNotFound)
    }

    /// Returns a cursor at `key`, or the end cursor if the key is absent.
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> Cursor<'_, K, V, S>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.locate(key) {
            Probe::Occupied(index) => Cursor::new(self, index),
            Probe::Vacant(_) => self.cursor_end(),
        }
    }

    /// Returns a mutable cursor at `key`, or the end cursor if the key is absent.
    pub fn find_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V, S>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = match self.locate(key) {
            Probe::Occupied(index) => index,
            Probe::Vacant(_) => END,
        };
        CursorMut::new(self, index)
    }

    /// Removes a key from the map, returning its value if it was present.
    ///
    /// Entries that shared a probe cluster with the removed key and sat after
    /// it are reinserted, so they move to the end of the iteration order.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let Probe::Occupied(index) = self.locate(key) else {
            return None;
        };
        let entry = self.vacate(index)?;
        self.compact_after(index);
        Some(entry)
    }

    /// Restores the probe invariant after `hole` was emptied.
    ///
    /// Every entry in the run of occupied slots that follows the hole is taken
    /// out, then all of them are inserted again in the order they were found.
    fn compact_after(&mut self, hole: usize) {
        let mut displaced = Vec::new();
        let mut index = self.next_slot(hole);
        while let Some(entry) = self.vacate(index) {
            displaced.push(entry);
            index = self.next_slot(index);
        }
        if displaced.is_empty() {
            return;
        }
        trace!(hole, displaced = displaced.len(), "compacting probe cluster");
        for (key, value) in displaced {
            self.insert(key, value);
        }
    }

    /// Grows the table so that `additional` more entries fit without a rebuild.
    pub fn reserve(&mut self, additional: usize) {
        let needed = self.len.saturating_add(additional).saturating_mul(2);
        let mut logical_capacity = self.logical_capacity;
        while logical_capacity < needed {
            logical_capacity = logical_capacity.saturating_mul(2);
        }
        if logical_capacity != self.logical_capacity {
            self.rebuild_to(logical_capacity);
        }
    }

    /// Reallocates the table for a new logical capacity and reinserts every
    /// entry in insertion order.
    fn rebuild_to(&mut self, logical_capacity: usize) {
        trace!(
            from = self.logical_capacity,
            to = logical_capacity,
            len = self.len,
            "rebuilding slot table"
        );
        let entries = self.drain_ordered();
        self.logical_capacity = logical_capacity.max(MIN_LOGICAL_CAPACITY);
        self.slots = empty_table(slot_count_for(self.logical_capacity));
        for (key, value) in entries {
            let index = self.locate(&key).index();
            self.link_at(index, key, value);
        }
    }

    /// Panics if any structural invariant of the table is broken.
    #[cfg(test)]
    #[allow(clippy::panic, clippy::arithmetic_side_effects, clippy::indexing_slicing)]
    pub(crate) fn check_invariants(&self) {
        let occupied = self.slots.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(occupied, self.len, "len does not match occupied slots");
        assert!(self.len * 2 <= self.logical_capacity, "load factor above one half");
        assert_eq!(self.slots.len(), slot_count_for(self.logical_capacity));

        let mut visited = vec![false; self.slots.len()];
        let mut prev = END;
        let mut index = self.head;
        let mut steps = 0;
        while index != END {
            let Some(slot) = self.slot(index) else {
                panic!("insertion order links to empty slot {index}");
            };
            assert!(!visited[index], "slot {index} linked twice");
            visited[index] = true;
            assert_eq!(slot.prev, prev, "broken prev link at slot {index}");
            prev = index;
            index = slot.next;
            steps += 1;
        }
        assert_eq!(prev, self.tail, "tail is not the last linked slot");
        assert_eq!(steps, self.len, "insertion order misses entries");

        for (index, slot) in self.slots.iter().enumerate() {
            let Some(slot) = slot else { continue };
            let mut probe = self.home_slot(&slot.key);
            while probe != index {
                assert!(
                    self.slots[probe].is_some(),
                    "empty slot {probe} between home and slot {index}"
                );
                probe = self.next_slot(probe);
            }
        }
    }
}

impl<K, V, S> Default for LinkedProbeMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> Drop for LinkedProbeMap<K, V, S> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, V, S> Clone for LinkedProbeMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    fn clone(&self) -> Self {
        let mut map =
            Self::with_logical_capacity_and_hasher(self.logical_capacity, self.hash_builder.clone());
        map.extend(self.iter().map(|(key, value)| (key.clone(), value.clone())));
        map
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.hash_builder = source.hash_builder.clone();
        self.logical_capacity = source.logical_capacity;
        self.slots = empty_table(slot_count_for(self.logical_capacity));
        self.extend(source.iter().map(|(key, value)| (key.clone(), value.clone())));
    }
}

impl<K, V, S> PartialEq for LinkedProbeMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K, V, S> Eq for LinkedProbeMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> fmt::Debug for LinkedProbeMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> Extend<(K, V)> for LinkedProbeMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for LinkedProbeMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::from_iter_with_hasher(iter, S::default())
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for LinkedProbeMap<K, V, RandomState>
where
    K: Eq + Hash,
{
    fn from(entries: [(K, V); N]) -> Self {
        Self::from_iter(entries)
    }
}
