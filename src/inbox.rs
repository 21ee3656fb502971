use crate::index::SlotIndexer;
use crate::invariants::{debug_assert_exclusive_counter, debug_assert_index_in_bounds};
use crate::report;
use crate::slot::Slot;
use crate::{Backoff, Config, Metrics, MetricsSnapshot};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

// =============================================================================
// MEMORY ORDERING & SYNCHRONIZATION STRATEGY
// =============================================================================
//
// The inbox has no queue-wide lock; all coordination is per slot, through
// the three flags in each slot header. The two u64 ticket counters only
// assign slots to operations.
//
// ## Ticket counters
//
// `write_seq` (producer) and `read_seq` (consumer) are unbounded u64
// sequence numbers, mapped to a slot index with the reciprocal in
// `SlotIndexer`. At 10 billion messages/second, wrapping u64 takes ~58
// years, so wrap-around is not handled.
//
// ## Publish protocol (per slot)
//
// **Producer:**
// 1. Claim: CAS `occupied` false -> true, Acquire. The Acquire pairs with
//    the consumer's Release in `Slot::release`, so the payload bytes of
//    the previous occupant are dead before we overwrite them.
// 2. Write the payload (plain store - the claim grants exclusivity).
// 3. Store `ready = true`, Release. Pairs with the consumer's Acquire
//    load of `ready` and publishes the payload bytes.
//
// **Consumer:**
// 1. Check `occupied` Relaxed, then `ready` Acquire. The double check
//    exists because a producer may have claimed the slot but not finished
//    the copy; `occupied` alone must never be consumed.
// 2. Copy the payload out.
// 3. Store `ready = false` Relaxed, then `occupied = false` Release,
//    handing the slot back to producers.
//
// ## Counter orderings
//
// Ticket claims (`fetch_add`) are Acquire; counter advances after a
// completed operation are Release. The counters carry no payload
// visibility themselves - the `ready` flag covers exactly the payload of
// its own slot, and no inter-slot ordering is promised.
//
// ## Shared consumers
//
// The shared read paths serialize competing consumers per slot with the
// `shared_locked` CAS; `read_seq` is advanced only while that lock is
// held, so at most one consumer drains any given slot occurrence. Two
// consumers can still drain distinct slots concurrently.
//
// =============================================================================

/// Error returned by inbox construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InboxError {
    /// Capacity must be non-zero, even and at most 2^32.
    #[error("inbox capacity must be non-zero, even and at most 2^32 (got {capacity})")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
    },
    /// Inbox names are used for lookup and must not be empty.
    #[error("inbox name must not be empty")]
    EmptyName,
}

impl InboxError {
    /// Short uppercase tag for the `debug-log` diagnostic sink.
    pub fn tag(&self) -> &'static str {
        match self {
            InboxError::InvalidCapacity { .. } => "INBOX_INCORRECT_SIZE",
            InboxError::EmptyName => "INBOX_EMPTY_NAME",
        }
    }
}

/// A fixed-capacity, lock-free ring of message slots.
///
/// Producers and consumers exchange fixed-layout `T` values with bounded
/// latency and no kernel synchronization. Four operation pairs are
/// provided: non-blocking and spinning writes, and non-blocking and
/// spinning reads in single-consumer and shared (multi-consumer) flavors.
///
/// The non-shared variants (`try_write`, `try_read`, `read_spin`) demand
/// exactly one thread in the corresponding role; the shared read variants
/// and `write_spin` are safe under concurrency within their role. Mixing
/// shared and non-shared *read* variants on the same inbox is not
/// supported: the non-shared readers never take the per-slot lock the
/// shared readers rely on.
///
/// Slots are laid out contiguously with no inter-slot padding, so very
/// small payloads can place adjacent slots on one cache line; pad `T` up
/// to a cache-line multiple if that matters for the workload.
#[repr(C)]
pub struct Inbox<T> {
    /// Producer ticket counter.
    write_seq: CacheAligned<AtomicU64>,
    /// Consumer ticket counter.
    read_seq: CacheAligned<AtomicU64>,

    // Immutable after construction. Starts on a fresh cache line because
    // the aligned counter above occupies a full 128-byte block, so the
    // hot counters never share a line with these or with each other.
    indexer: SlotIndexer,
    name: Box<str>,
    config: Config,
    metrics: Metrics,

    /// Contiguous slot storage.
    ///
    /// `Box<[Slot<T>]>` rather than `Vec<Slot<T>>`: the size is fixed at
    /// construction and the capacity field would be dead weight.
    slots: Box<[Slot<T>]>,
}

impl<T> Inbox<T> {
    /// Creates an inbox with `capacity` slots and default tunables.
    ///
    /// `capacity` must be non-zero, even and at most 2^32; `name` must be
    /// non-empty.
    ///
    /// # Example
    /// ```
    /// use mailring::Inbox;
    ///
    /// let inbox = Inbox::<u64>::new("telemetry", 512).unwrap();
    /// assert!(inbox.name_is("telemetry"));
    /// ```
    pub fn new(name: &str, capacity: usize) -> Result<Self, InboxError> {
        Self::with_config(name, Config::new(capacity))
    }

    /// Creates an inbox from a full [`Config`].
    pub fn with_config(name: &str, config: Config) -> Result<Self, InboxError> {
        let capacity = config.capacity;
        if capacity == 0 || capacity % 2 != 0 || capacity as u64 > SlotIndexer::MAX_CAPACITY {
            report::constructor_failure("INBOX_INCORRECT_SIZE");
            return Err(InboxError::InvalidCapacity { capacity });
        }
        if name.is_empty() {
            report::constructor_failure("INBOX_EMPTY_NAME");
            return Err(InboxError::EmptyName);
        }

        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, Slot::new);

        Ok(Self {
            write_seq: CacheAligned::new(AtomicU64::new(0)),
            read_seq: CacheAligned::new(AtomicU64::new(0)),
            indexer: SlotIndexer::new(capacity as u64),
            name: name.into(),
            config,
            metrics: Metrics::new(),
            slots: slots.into_boxed_slice(),
        })
    }

    // ---------------------------------------------------------------------
    // INTROSPECTION
    // ---------------------------------------------------------------------

    /// The inbox name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name equality.
    #[inline]
    pub fn name_is(&self, cmp: &str) -> bool {
        &*self.name == cmp
    }

    /// Number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.indexer.capacity()
    }

    /// Approximate number of outstanding messages (claimed tickets not
    /// yet consumed). Racy by nature; useful for drain loops and
    /// observability, not for synchronization.
    #[inline]
    pub fn len(&self) -> usize {
        let w = self.write_seq.load(Ordering::Relaxed);
        let r = self.read_seq.load(Ordering::Relaxed);
        w.wrapping_sub(r) as usize
    }

    /// True when no messages appear outstanding. Same caveats as
    /// [`Inbox::len`].
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the hit-ratio counters, all zeros unless
    /// [`Config::enable_metrics`] was set.
    pub fn metrics(&self) -> MetricsSnapshot {
        if self.config.enable_metrics {
            self.metrics.snapshot()
        } else {
            MetricsSnapshot::default()
        }
    }

    #[inline]
    fn slot(&self, seq: u64) -> &Slot<T> {
        let idx = self.indexer.index(seq);
        debug_assert_index_in_bounds!(idx, self.slots.len());
        &self.slots[idx]
    }
}

impl<T: Copy> Inbox<T> {
    // ---------------------------------------------------------------------
    // PRODUCER API
    // ---------------------------------------------------------------------

    /// Non-blocking write. Returns `true` if the message was published,
    /// `false` if the target slot is still occupied.
    ///
    /// On failure nothing advances: repeated calls keep attempting the
    /// same slot until a consumer frees it, which gives the caller prompt
    /// back-pressure feedback (see [`Inbox::metrics`] for the hit ratio).
    ///
    /// IMPORTANT: only one thread may write to the inbox through this
    /// method. Two concurrent callers can observe the same ticket and
    /// race for one slot; use [`Inbox::write_spin`] for multi-producer
    /// setups.
    pub fn try_write(&self, msg: T) -> bool {
        if self.config.enable_metrics {
            self.metrics.record_write_attempt();
        }

        let seq = self.write_seq.load(Ordering::Relaxed);
        let slot = self.slot(seq);
        if !slot.try_claim() {
            return false;
        }

        // SAFETY: the claim grants exclusive write access to the payload
        // until publish.
        unsafe { slot.write_payload(msg) };
        let prev = self.write_seq.fetch_add(1, Ordering::Release);
        debug_assert_exclusive_counter!("producer", seq, prev);
        slot.publish();

        if self.config.enable_metrics {
            self.metrics.record_write();
        }
        true
    }

    /// Spinning write. Claims one ticket unconditionally, then busy-waits
    /// on that specific slot until it can be claimed; does not return
    /// until the message is published.
    ///
    /// Ticket allocation is atomic, so any number of producers may call
    /// this concurrently. Note the counter advances even while the slot
    /// is still occupied: with more producers than free slots the writers
    /// queue up on future occupancies and wait for consumer progress.
    pub fn write_spin(&self, msg: T) {
        if self.config.enable_metrics {
            self.metrics.record_write_attempt();
        }

        let seq = self.write_seq.fetch_add(1, Ordering::Acquire);
        let slot = self.slot(seq);

        let mut backoff = Backoff::new();
        while !slot.try_claim_weak() {
            backoff.pause();
        }

        // SAFETY: the claim grants exclusive write access to the payload
        // until publish.
        unsafe { slot.write_payload(msg) };
        slot.publish();

        if self.config.enable_metrics {
            self.metrics.record_write();
        }
    }

    // ---------------------------------------------------------------------
    // CONSUMER API (single consumer)
    // ---------------------------------------------------------------------

    /// Non-blocking read. Returns the next message, or `None` when the
    /// next slot holds nothing consumable yet.
    ///
    /// IMPORTANT: only one thread may read from the inbox through the
    /// non-shared read methods; use [`Inbox::try_read_shared`] when
    /// several consumers drain the same inbox.
    pub fn try_read(&self) -> Option<T> {
        if self.config.enable_metrics {
            self.metrics.record_read_attempt();
        }

        let seq = self.read_seq.load(Ordering::Relaxed);
        let slot = self.slot(seq);

        // A claimed slot is not consumable until the payload is
        // published; `occupied` alone means the copy is still in flight.
        if !slot.has_data() || !slot.is_ready() {
            return None;
        }

        // SAFETY: OCCUPIED+READY observed via the Acquire load in
        // `is_ready`, and this thread is the inbox's only non-shared
        // consumer, so the payload is initialized and stable.
        let msg = unsafe { slot.read_payload() };
        slot.release();
        let prev = self.read_seq.fetch_add(1, Ordering::Release);
        debug_assert_exclusive_counter!("consumer", seq, prev);

        if self.config.enable_metrics {
            self.metrics.record_read();
        }
        Some(msg)
    }

    /// Spinning read. Claims one ticket unconditionally, then busy-waits
    /// until the corresponding slot becomes consumable.
    ///
    /// The claimed ticket may point at a message that has not been
    /// written yet; the call then spins until a producer publishes it.
    pub fn read_spin(&self) -> T {
        if self.config.enable_metrics {
            self.metrics.record_read_attempt();
        }

        let seq = self.read_seq.fetch_add(1, Ordering::Acquire);
        let slot = self.slot(seq);

        let mut backoff = Backoff::new();
        loop {
            if slot.has_data() && slot.is_ready() {
                // SAFETY: OCCUPIED+READY observed; the ticket claim makes
                // this thread the sole reader of this slot occurrence.
                let msg = unsafe { slot.read_payload() };
                slot.release();

                if self.config.enable_metrics {
                    self.metrics.record_read();
                }
                return msg;
            }
            backoff.pause();
        }
    }

    // ---------------------------------------------------------------------
    // CONSUMER API (shared)
    // ---------------------------------------------------------------------

    /// Non-blocking read safe under multiple concurrent consumers.
    ///
    /// Competing consumers are serialized per slot by a mutual-exclusion
    /// flag; the consumer counter advances only inside that lock, so each
    /// message is drained by exactly one consumer. Losing the lock race
    /// returns `None` immediately so the caller can retry or yield.
    pub fn try_read_shared(&self) -> Option<T> {
        if self.config.enable_metrics {
            self.metrics.record_read_attempt();
        }

        let msg = self.try_read_shared_core();
        if msg.is_some() && self.config.enable_metrics {
            self.metrics.record_read();
        }
        msg
    }

    /// Spinning read safe under multiple concurrent consumers: busy-loops
    /// over the non-blocking shared read until it drains one message.
    pub fn read_shared_spin(&self) -> T {
        if self.config.enable_metrics {
            self.metrics.record_read_attempt();
        }

        let mut backoff = Backoff::new();
        loop {
            if let Some(msg) = self.try_read_shared_core() {
                if self.config.enable_metrics {
                    self.metrics.record_read();
                }
                return msg;
            }
            backoff.pause();
        }
    }

    fn try_read_shared_core(&self) -> Option<T> {
        let seq = self.read_seq.load(Ordering::Relaxed);
        let slot = self.slot(seq);

        if !slot.try_lock_shared() {
            return None;
        }

        let msg = if slot.has_data() && slot.is_ready() {
            // SAFETY: OCCUPIED+READY observed and the shared lock is
            // held, so no other consumer touches this slot occurrence.
            let msg = unsafe { slot.read_payload() };
            self.read_seq.fetch_add(1, Ordering::Release);
            slot.release();
            Some(msg)
        } else {
            None
        };

        slot.unlock_shared();
        msg
    }
}

// ---------------------------------------------------------------------
// HELPER: 128-byte cache-aligned wrapper
// ---------------------------------------------------------------------

/// Wrapper type that ensures 128-byte alignment to prevent
/// prefetcher-induced false sharing on Intel/AMD CPUs (which may prefetch
/// adjacent cache lines).
#[repr(align(128))]
struct CacheAligned<T> {
    value: T,
}

impl<T> CacheAligned<T> {
    const fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T> std::ops::Deref for CacheAligned<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}
