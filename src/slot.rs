//! Slot records and probe results shared by the map, its iterators and cursors.

/// Index value meaning "no neighbor" in the insertion-order links.
///
/// `Vec::get(END)` is always `None`, so code that follows a link can treat the
/// sentinel and an out-of-range index the same way.
pub(crate) const END: usize = usize::MAX;

/// An occupied slot: the key-value pair plus its insertion-order links.
#[derive(Debug, Clone)]
pub(crate) struct Slot<K, V> {
    /// The key stored in this slot
    pub(crate) key: K,
    /// The value associated with the key
    pub(crate) value: V,
    /// Slot index of the entry inserted just before this one, or `END`
    pub(crate) prev: usize,
    /// Slot index of the entry inserted just after this one, or `END`
    pub(crate) next: usize,
}

impl<K, V> Slot<K, V> {
    /// Creates a slot that will be linked after `prev` as the new tail.
    pub(crate) const fn new(key: K, value: V, prev: usize) -> Self {
        Self { key, value, prev, next: END }
    }

    /// Consumes the slot, dropping its links.
    pub(crate) fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// Where a linear probe for a key stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Probe {
    /// The key lives at this slot index.
    Occupied(usize),
    /// The key is absent; this empty slot is where it would be placed.
    Vacant(usize),
}

impl Probe {
    /// The slot index the probe stopped at.
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Occupied(index) | Self::Vacant(index) => index,
        }
    }
}

/// Number of slots allocated for a given logical capacity: `ceil(capacity * 1.6)`.
pub(crate) const fn slot_count_for(logical_capacity: usize) -> usize {
    logical_capacity.saturating_mul(8).div_ceil(5)
}
