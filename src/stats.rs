//! Probe-length statistics for a [`LinkedProbeMap`].

use std::hash::{BuildHasher, Hash};

use crate::LinkedProbeMap;

/// A snapshot of how far entries sit from their home slots.
///
/// Displacement is the number of linear-probe steps from an entry's home slot
/// to the slot it occupies; a lookup for that key inspects `displacement + 1`
/// slots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeStats {
    /// Number of entries
    pub len: usize,
    /// The map's logical capacity at the time of the snapshot
    pub logical_capacity: usize,
    /// Number of allocated slots
    pub slot_count: usize,
    /// Largest displacement of any entry
    pub max_displacement: usize,
    /// Mean displacement over all entries, 0.0 for an empty map
    pub mean_displacement: f64,
    /// Length of the longest run of occupied slots
    pub longest_cluster: usize,
}

impl<K, V, S> LinkedProbeMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Measures displacement and clustering of the current table.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn probe_stats(&self) -> ProbeStats {
        let slot_count = self.slots.len();
        let mut total = 0_usize;
        let mut max_displacement = 0;
        let mut longest_cluster = 0;
        let mut run = 0;

        for (index, slot) in self.slots.iter().enumerate() {
            let Some(slot) = slot else {
                run = 0;
                continue;
            };
            run += 1;
            longest_cluster = longest_cluster.max(run);

            let home = self.home_slot(&slot.key);
            let displacement =
                if index >= home { index - home } else { slot_count - home + index };
            total = total.saturating_add(displacement);
            max_displacement = max_displacement.max(displacement);
        }

        let mean_displacement = if self.len == 0 { 0.0 } else { total as f64 / self.len as f64 };

        ProbeStats {
            len: self.len,
            logical_capacity: self.logical_capacity,
            slot_count,
            max_displacement,
            mean_displacement,
            longest_cluster,
        }
    }
}
