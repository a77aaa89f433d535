//! Utility hashers for `LinkedProbeMap`

use std::hash::{BuildHasher, Hasher};

/// A hasher that returns integer keys unchanged.
///
/// With it, a key's home slot is `key mod logical_capacity`, which makes probe
/// clusters easy to set up on purpose. Byte input (strings, slices) and
/// composite keys are folded FNV-style, so other key types still work, just
/// without that guarantee.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityHasher {
    /// The hash computed so far
    hash: u64,
}

/// FNV-1a offset basis
const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
/// FNV-1a prime
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

impl IdentityHasher {
    /// Folds one integer into the state; the first integer is kept as is.
    fn mix(&mut self, value: u64) {
        self.hash = self.hash.wrapping_mul(FNV_PRIME) ^ value;
    }
}

impl Hasher for IdentityHasher {
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        let mut hash = self.hash ^ FNV_OFFSET;
        for byte in bytes {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        self.hash = hash;
    }

    fn write_u8(&mut self, i: u8) {
        self.mix(u64::from(i));
    }

    fn write_u16(&mut self, i: u16) {
        self.mix(u64::from(i));
    }

    fn write_u32(&mut self, i: u32) {
        self.mix(u64::from(i));
    }

    fn write_u64(&mut self, i: u64) {
        self.mix(i);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn write_u128(&mut self, i: u128) {
        self.mix(i as u64);
    }

    fn write_usize(&mut self, i: usize) {
        self.mix(u64::try_from(i).unwrap_or(u64::MAX));
    }
}

/// Builds [`IdentityHasher`]s.
///
/// ```
/// use linked_probe::{BuildIdentityHasher, LinkedProbeMap};
///
/// let mut map = LinkedProbeMap::with_capacity_and_hasher(4, BuildIdentityHasher);
/// map.insert(1_u64, "a");
/// map.insert(9_u64, "b"); // same home slot as 1
/// assert_eq!(map.get(&9), Some(&"b"));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildIdentityHasher;

impl BuildHasher for BuildIdentityHasher {
    type Hasher = IdentityHasher;

    fn build_hasher(&self) -> Self::Hasher {
        IdentityHasher::default()
    }
}
