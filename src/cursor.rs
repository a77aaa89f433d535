use std::{fmt, ptr};

use crate::{
    LinkedProbeMap,
    iter::Iter,
    slot::{END, Slot},
};

/// A position in the insertion order of a [`LinkedProbeMap`].
///
/// A cursor either points at an entry or is the end cursor. It only moves
/// forward. Two cursors are equal when they belong to the same map and point
/// at the same slot, which makes `find(k) == cursor_end()` the "not found"
/// test.
///
/// The shared borrow on the map keeps every cursor valid for its whole
/// lifetime: operations that move or drop entries (`remove`, `clear`, table
/// rebuilds) need `&mut` access and cannot run while a cursor exists.
///
/// # Examples
///
/// ```
/// use linked_probe::LinkedProbeMap;
///
/// let map = LinkedProbeMap::from([("a", 1), ("b", 2)]);
///
/// let mut cursor = map.find("a");
/// assert_eq!(cursor.entry(), Some((&"a", &1)));
/// cursor.move_next();
/// assert_eq!(cursor.key(), Some(&"b"));
/// cursor.move_next();
/// assert!(cursor == map.cursor_end());
///
/// assert!(map.find("zzz").is_end());
/// ```
pub struct Cursor<'a, K, V, S> {
    /// The map the cursor walks
    map: &'a LinkedProbeMap<K, V, S>,
    /// Slot index of the current entry, or `END`
    index: usize,
}

impl<'a, K, V, S> Cursor<'a, K, V, S> {
    /// Creates a cursor at slot `index`.
    pub(crate) const fn new(map: &'a LinkedProbeMap<K, V, S>, index: usize) -> Self {
        Self { map, index }
    }

    /// The occupied slot under the cursor.
    fn current(&self) -> Option<&'a Slot<K, V>> {
        self.map.slot(self.index)
    }

    /// Returns true if the cursor is past the last entry.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.current().is_none()
    }

    /// Returns the entry under the cursor.
    #[must_use]
    pub fn entry(&self) -> Option<(&'a K, &'a V)> {
        self.current().map(|slot| (&slot.key, &slot.value))
    }

    /// Returns the key under the cursor.
    #[must_use]
    pub fn key(&self) -> Option<&'a K> {
        self.current().map(|slot| &slot.key)
    }

    /// Returns the value under the cursor.
    #[must_use]
    pub fn value(&self) -> Option<&'a V> {
        self.current().map(|slot| &slot.value)
    }

    /// Advances to the next entry in insertion order. At the end this is a no-op.
    pub fn move_next(&mut self) {
        self.index = self.current().map_or(END, |slot| slot.next);
    }

    /// Iterates from the cursor's entry to the end of the insertion order.
    #[must_use]
    pub fn iter(&self) -> Iter<'a, K, V> {
        let remaining = Iter::new(&self.map.slots, self.index, self.map.len).count();
        Iter::new(&self.map.slots, self.index, remaining)
    }
}

impl<K, V, S> Clone for Cursor<'_, K, V, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, S> Copy for Cursor<'_, K, V, S> {}

impl<K, V, S> PartialEq for Cursor<'_, K, V, S> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.map, other.map) && self.index == other.index
    }
}

impl<K, V, S> Eq for Cursor<'_, K, V, S> {}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for Cursor<'_, K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor").field("entry", &self.entry()).finish()
    }
}

/// A forward cursor over a [`LinkedProbeMap`] that can modify values.
///
/// Keys stay immutable. Created by [`LinkedProbeMap::find_mut`] and
/// [`LinkedProbeMap::cursor_front_mut`].
///
/// ```
/// use linked_probe::LinkedProbeMap;
///
/// let mut map = LinkedProbeMap::from([("a", 1), ("b", 2)]);
/// let mut cursor = map.cursor_front_mut();
/// while let Some(value) = cursor.value_mut() {
///     *value *= 10;
///     cursor.move_next();
/// }
/// assert_eq!(map.get("b"), Some(&20));
/// ```
pub struct CursorMut<'a, K, V, S> {
    /// The map the cursor walks
    map: &'a mut LinkedProbeMap<K, V, S>,
    /// Slot index of the current entry, or `END`
    index: usize,
}

impl<'a, K, V, S> CursorMut<'a, K, V, S> {
    /// Creates a cursor at slot `index`.
    pub(crate) const fn new(map: &'a mut LinkedProbeMap<K, V, S>, index: usize) -> Self {
        Self { map, index }
    }

    /// Returns true if the cursor is past the last entry.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.map.slot(self.index).is_none()
    }

    /// Returns the entry under the cursor.
    #[must_use]
    pub fn entry(&self) -> Option<(&K, &V)> {
        self.map.slot(self.index).map(|slot| (&slot.key, &slot.value))
    }

    /// Returns the entry under the cursor with a mutable value.
    pub fn entry_mut(&mut self) -> Option<(&K, &mut V)> {
        self.map.slot_mut(self.index).map(|slot| (&slot.key, &mut slot.value))
    }

    /// Returns the key under the cursor.
    #[must_use]
    pub fn key(&self) -> Option<&K> {
        self.map.slot(self.index).map(|slot| &slot.key)
    }

    /// Returns the value under the cursor mutably.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.map.slot_mut(self.index).map(|slot| &mut slot.value)
    }

    /// Consumes the cursor, keeping the value borrow for the map's lifetime.
    #[must_use]
    pub fn into_value_mut(self) -> Option<&'a mut V> {
        self.map.slot_mut(self.index).map(|slot| &mut slot.value)
    }

    /// Advances to the next entry in insertion order. At the end this is a no-op.
    pub fn move_next(&mut self) {
        self.index = self.map.slot(self.index).map_or(END, |slot| slot.next);
    }

    /// Returns a read-only cursor at the same position.
    #[must_use]
    pub fn as_cursor(&self) -> Cursor<'_, K, V, S> {
        Cursor::new(self.map, self.index)
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for CursorMut<'_, K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut").field("entry", &self.entry()).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{LinkedProbeMap, utils::BuildIdentityHasher};

    fn sample() -> LinkedProbeMap<u64, char, BuildIdentityHasher> {
        let mut map = LinkedProbeMap::with_capacity_and_hasher(8, BuildIdentityHasher);
        for (key, value) in [(4, 'd'), (1, 'a'), (3, 'c')] {
            map.insert(key, value);
        }
        map
    }

    #[test]
    fn test_walk_from_front_to_end() {
        let map = sample();
        let mut cursor = map.cursor_front();
        let mut seen = Vec::new();
        while let Some((key, value)) = cursor.entry() {
            seen.push((*key, *value));
            cursor.move_next();
        }
        assert_eq!(seen, [(4, 'd'), (1, 'a'), (3, 'c')]);
        assert!(cursor.is_end());
        assert_eq!(cursor, map.cursor_end());

        cursor.move_next();
        assert!(cursor.is_end());
    }

    #[test]
    fn test_find_equals_position_from_front() {
        let map = sample();
        let mut cursor = map.cursor_front();
        cursor.move_next();
        assert_eq!(cursor, map.find(&1));
        assert_ne!(cursor, map.find(&3));
        assert_eq!(map.find(&99), map.cursor_end());
    }

    #[test]
    fn test_cursors_of_different_maps_differ() {
        let a = sample();
        let b = sample();
        assert_ne!(a.find(&4), b.find(&4));
        assert_ne!(a.cursor_end(), b.cursor_end());
    }

    #[test]
    fn test_iter_from_cursor() {
        let map = sample();
        let rest: Vec<_> = map.find(&1).iter().map(|(key, _)| *key).collect();
        assert_eq!(rest, [1, 3]);
        assert_eq!(map.find(&1).iter().len(), 2);
        assert_eq!(map.cursor_end().iter().count(), 0);
    }

    #[test]
    fn test_empty_map_front_is_end() {
        let map: LinkedProbeMap<u64, char, BuildIdentityHasher> =
            LinkedProbeMap::with_hasher(BuildIdentityHasher);
        assert!(map.cursor_front().is_end());
        assert_eq!(map.cursor_front(), map.cursor_end());
    }

    #[test]
    fn test_find_mut_changes_value_only() {
        let mut map = sample();
        {
            let mut cursor = map.find_mut(&3);
            assert_eq!(cursor.key(), Some(&3));
            if let Some((_, value)) = cursor.entry_mut() {
                *value = 'z';
            }
            cursor.move_next();
            assert!(cursor.is_end());
            assert!(cursor.value_mut().is_none());
        }
        assert_eq!(map.get(&3), Some(&'z'));
        assert!(map.find_mut(&42).is_end());
    }

    #[test]
    fn test_into_value_mut() {
        let mut map = sample();
        if let Some(value) = map.find_mut(&4).into_value_mut() {
            *value = 'D';
        }
        assert_eq!(map.front(), Some((&4, &'D')));
    }

    #[test]
    fn test_as_cursor_matches_find() {
        let mut map = sample();
        let mut cursor = map.cursor_front_mut();
        cursor.move_next();
        assert_eq!(cursor.as_cursor().key(), Some(&1));
    }
}
