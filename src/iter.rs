//! Iterators over a [`LinkedProbeMap`] in insertion order.
//!
//! All of them follow the `next` links threaded through the slot table, never
//! the raw slot order.

use std::{fmt, iter::FusedIterator, mem};

use crate::{
    LinkedProbeMap,
    slot::{END, Slot},
};

/// An iterator over the entries of a `LinkedProbeMap`, oldest first.
///
/// Created by [`LinkedProbeMap::iter`].
pub struct Iter<'a, K, V> {
    /// The slot table being walked
    slots: &'a [Option<Slot<K, V>>],
    /// Slot index of the next entry to yield, or `END`
    next: usize,
    /// Entries left to yield
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    /// Starts a walk at `head`.
    pub(crate) const fn new(slots: &'a [Option<Slot<K, V>>], head: usize, len: usize) -> Self {
        Self { slots, next: head, remaining: len }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self { slots: self.slots, next: self.next, remaining: self.remaining }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.slots.get(self.next)?.as_ref()?;
        self.next = slot.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((&slot.key, &slot.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// A mutable iterator over the entries of a `LinkedProbeMap`, oldest first.
///
/// Created by [`LinkedProbeMap::iter_mut`].
pub struct IterMut<'a, K, V> {
    /// One borrow per slot, taken out as the walk reaches it
    slots: Vec<Option<&'a mut Slot<K, V>>>,
    /// Slot index of the next entry to yield, or `END`
    next: usize,
    /// Entries left to yield
    remaining: usize,
}

impl<'a, K, V> IterMut<'a, K, V> {
    /// Splits the table into per-slot borrows and starts a walk at `head`.
    pub(crate) fn new(slots: &'a mut [Option<Slot<K, V>>], head: usize, len: usize) -> Self {
        let slots = slots.iter_mut().map(Option::as_mut).collect();
        Self { slots, next: head, remaining: len }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.slots.get_mut(self.next)?.take()?;
        self.next = slot.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((&slot.key, &mut slot.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

impl<K, V> fmt::Debug for IterMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("remaining", &self.remaining).finish_non_exhaustive()
    }
}

/// An owning iterator over the entries of a `LinkedProbeMap`, oldest first.
///
/// Created by the `into_iter` method on [`LinkedProbeMap`].
pub struct IntoIter<K, V> {
    /// The slot table taken out of the map
    slots: Vec<Option<Slot<K, V>>>,
    /// Slot index of the next entry to yield, or `END`
    next: usize,
    /// Entries left to yield
    remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.slots.get_mut(self.next)?.take()?;
        self.next = slot.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(slot.into_pair())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter").field("remaining", &self.remaining).finish_non_exhaustive()
    }
}

/// An iterator over the keys of a `LinkedProbeMap`, oldest first.
pub struct Keys<'a, K, V> {
    /// The entry iterator being projected
    pub(crate) inner: Iter<'a, K, V>,
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.clone().map(|(key, _)| key)).finish()
    }
}

/// An iterator over the values of a `LinkedProbeMap`, oldest first.
pub struct Values<'a, K, V> {
    /// The entry iterator being projected
    pub(crate) inner: Iter<'a, K, V>,
}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.clone().map(|(_, value)| value)).finish()
    }
}

/// A mutable iterator over the values of a `LinkedProbeMap`, oldest first.
pub struct ValuesMut<'a, K, V> {
    /// The entry iterator being projected
    pub(crate) inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

impl<K, V> fmt::Debug for ValuesMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuesMut").field("inner", &self.inner).finish()
    }
}

impl<'a, K, V, S> IntoIterator for &'a LinkedProbeMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut LinkedProbeMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> IntoIterator for LinkedProbeMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        let remaining = mem::take(&mut self.len);
        let next = mem::replace(&mut self.head, END);
        self.tail = END;
        IntoIter { slots: mem::take(&mut self.slots), next, remaining }
    }
}
