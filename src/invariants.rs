//! Debug assertion macros for the counter and index protocol.
//!
//! Active only in debug builds; release builds compile them away.

/// Assert that a computed slot index lies inside the slot array.
macro_rules! debug_assert_index_in_bounds {
    ($idx:expr, $capacity:expr) => {
        debug_assert!(
            $idx < $capacity,
            "slot index {} out of bounds for capacity {}",
            $idx,
            $capacity
        )
    };
}

/// Assert that the reciprocal computation agrees with `%`.
///
/// Checked inside `SlotIndexer::index` on every call in debug builds.
macro_rules! debug_assert_index_agrees {
    ($idx:expr, $seq:expr, $capacity:expr) => {
        debug_assert!(
            $idx as u64 == $seq % $capacity,
            "reciprocal index {} != {} % {} = {}",
            $idx,
            $seq,
            $capacity,
            $seq % $capacity
        )
    };
}

/// Assert that a non-shared operation really had the counter to itself.
///
/// On the single-producer and single-consumer paths the counter value
/// observed at the start of the call must still be current when the call
/// advances it; a mismatch means a second thread is using a non-shared
/// variant on this inbox.
macro_rules! debug_assert_exclusive_counter {
    ($role:literal, $observed:expr, $advanced_from:expr) => {
        debug_assert!(
            $observed == $advanced_from,
            "second {} detected on a non-shared path (counter moved {} -> {})",
            $role,
            $observed,
            $advanced_from
        )
    };
}

pub(crate) use debug_assert_exclusive_counter;
pub(crate) use debug_assert_index_agrees;
pub(crate) use debug_assert_index_in_bounds;
