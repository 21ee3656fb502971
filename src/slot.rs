use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicBool, Ordering};

/// One cell of the ring: a header of three independent atomic flags plus
/// an inline payload.
///
/// The flags drive a cyclic lifecycle per slot:
///
/// ```text
/// EMPTY --(producer claims)--> OCCUPIED --(producer publishes)-->
/// OCCUPIED+READY --(consumer releases)--> EMPTY
/// ```
///
/// `OCCUPIED` alone means a publish is in flight and the payload must not
/// be observed yet; `OCCUPIED+READY` is the consumable state. The third
/// flag, `shared_locked`, is a mutual-exclusion bit touched only by the
/// shared (multi-consumer) read paths.
pub(crate) struct Slot<T> {
    occupied: AtomicBool,
    ready: AtomicBool,
    shared_locked: AtomicBool,
    payload: UnsafeCell<MaybeUninit<T>>,
}

// Safety: access to `payload` is serialized by the flag protocol — a
// producer writes only between a successful claim and publish, a consumer
// reads only in the OCCUPIED+READY state before release.
unsafe impl<T: Send> Send for Slot<T> {}
unsafe impl<T: Send> Sync for Slot<T> {}

impl<T> Slot<T> {
    pub(crate) fn new() -> Self {
        Self {
            occupied: AtomicBool::new(false),
            ready: AtomicBool::new(false),
            shared_locked: AtomicBool::new(false),
            payload: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    // ---------------------------------------------------------------------
    // PRODUCER SIDE
    // ---------------------------------------------------------------------

    /// Attempt to reserve the slot for writing. Acquire on success pairs
    /// with the releasing consumer, so the producer sees the slot truly
    /// drained before reusing the payload bytes.
    #[inline]
    pub(crate) fn try_claim(&self) -> bool {
        self.occupied
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    /// Weak-CAS claim for spin loops that retry anyway.
    #[inline]
    pub(crate) fn try_claim_weak(&self) -> bool {
        self.occupied
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    /// Publish a fully written payload. The Release store pairs with the
    /// consumer's Acquire load of `ready`, making the payload visible.
    #[inline]
    pub(crate) fn publish(&self) {
        self.ready.store(true, Ordering::Release);
    }

    // ---------------------------------------------------------------------
    // CONSUMER SIDE
    // ---------------------------------------------------------------------

    /// Has a producer reserved this slot? Relaxed: this is only a cheap
    /// first gate, the Acquire load in [`Slot::is_ready`] does the
    /// synchronization.
    #[inline]
    pub(crate) fn has_data(&self) -> bool {
        self.occupied.load(Ordering::Relaxed)
    }

    /// Is the payload fully written? Acquire pairs with the producer's
    /// Release in [`Slot::publish`].
    #[inline]
    pub(crate) fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Return the slot to EMPTY after copying the payload out. The
    /// Release store on `occupied` pairs with the next producer's Acquire
    /// claim.
    #[inline]
    pub(crate) fn release(&self) {
        self.ready.store(false, Ordering::Relaxed);
        self.occupied.store(false, Ordering::Release);
    }

    // ---------------------------------------------------------------------
    // SHARED-CONSUMER LOCK
    // ---------------------------------------------------------------------

    /// Serialize competing consumers on this slot. Losing the CAS means
    /// another consumer currently owns the slot.
    #[inline]
    pub(crate) fn try_lock_shared(&self) -> bool {
        self.shared_locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    #[inline]
    pub(crate) fn unlock_shared(&self) {
        self.shared_locked.store(false, Ordering::Release);
    }

    // ---------------------------------------------------------------------
    // PAYLOAD
    // ---------------------------------------------------------------------

    /// Write the payload in place.
    ///
    /// # Safety
    ///
    /// Caller must hold the claim (a successful `try_claim*` with no
    /// intervening `publish`), which grants exclusive write access.
    #[inline]
    pub(crate) unsafe fn write_payload(&self, msg: T) {
        (*self.payload.get()).write(msg);
    }

    /// Copy the payload out.
    ///
    /// # Safety
    ///
    /// Caller must have observed OCCUPIED+READY (with the Acquire load in
    /// `is_ready`) and not yet released the slot; the payload is then
    /// initialized and no producer is writing it.
    #[inline]
    pub(crate) unsafe fn read_payload(&self) -> T
    where
        T: Copy,
    {
        (*self.payload.get()).assume_init()
    }
}
