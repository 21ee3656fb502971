//! Branch-free counter-to-slot mapping.
//!
//! Capacities are even but not required to be powers of two, so the usual
//! `seq & (capacity - 1)` trick is unavailable. Instead we use the direct
//! remainder computation from "Faster Remainder by Direct Computation"
//! (Lemire, Kaser, Kurz, 2019): precompute `K = floor(2^64 / C) + 1` once,
//! then `idx = high64((K * seq mod 2^64) * C)`, which equals `seq mod C`
//! without a division instruction. The second step needs a 128-bit
//! widening multiply.
//!
//! The computation is exact for every 64-bit counter as long as the
//! divisor fits in 32 bits; inbox construction enforces that bound.

use crate::invariants::debug_assert_index_agrees;

/// Maps monotonically increasing sequence numbers onto `[0, capacity)`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SlotIndexer {
    capacity: u64,
    /// `floor(2^64 / capacity) + 1`, the precomputed reciprocal.
    fraction: u64,
}

impl SlotIndexer {
    /// Capacities above this bound would break the exactness guarantee of
    /// the reciprocal computation.
    pub(crate) const MAX_CAPACITY: u64 = 1 << 32;

    pub(crate) const fn new(capacity: u64) -> Self {
        assert!(capacity > 0 && capacity <= Self::MAX_CAPACITY);
        Self {
            capacity,
            fraction: u64::MAX / capacity + 1,
        }
    }

    /// Returns `seq % capacity`, division-free.
    #[inline]
    pub(crate) fn index(&self, seq: u64) -> usize {
        let low_bits = self.fraction.wrapping_mul(seq);
        let idx = ((u128::from(low_bits) * u128::from(self.capacity)) >> 64) as usize;
        debug_assert_index_agrees!(idx, seq, self.capacity);
        idx
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_capacities_exhaustive_prefix() {
        for capacity in [2u64, 4, 6, 8, 10, 12, 100, 1000, 4096] {
            let indexer = SlotIndexer::new(capacity);
            for seq in 0..10_000u64 {
                assert_eq!(
                    indexer.index(seq),
                    (seq % capacity) as usize,
                    "capacity {} seq {}",
                    capacity,
                    seq
                );
            }
        }
    }

    #[test]
    fn boundary_sequences() {
        for capacity in [2u64, 4, 6, 30, 1024, 1_000_000, SlotIndexer::MAX_CAPACITY] {
            let indexer = SlotIndexer::new(capacity);
            for seq in [
                0,
                1,
                capacity - 1,
                capacity,
                capacity + 1,
                u64::MAX / 2,
                u64::MAX - capacity,
                u64::MAX - 1,
                u64::MAX,
            ] {
                assert_eq!(
                    indexer.index(seq),
                    (seq % capacity) as usize,
                    "capacity {} seq {}",
                    capacity,
                    seq
                );
            }
        }
    }

    #[test]
    fn non_power_of_two_wrap() {
        // The whole point of the reciprocal: correct wrapping for a
        // capacity with no mask.
        let indexer = SlotIndexer::new(6);
        let observed: Vec<usize> = (0..14).map(|seq| indexer.index(seq)).collect();
        assert_eq!(observed, [0, 1, 2, 3, 4, 5, 0, 1, 2, 3, 4, 5, 0, 1]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// The reciprocal computation equals `%` for every counter
            /// value and every legal (even, bounded) capacity.
            #[test]
            fn reciprocal_matches_modulo(
                seq in any::<u64>(),
                half in 1u64..=(SlotIndexer::MAX_CAPACITY / 2),
            ) {
                let capacity = half * 2;
                let indexer = SlotIndexer::new(capacity);
                prop_assert_eq!(indexer.index(seq) as u64, seq % capacity);
            }
        }
    }
}
