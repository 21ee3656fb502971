use std::hint;

/// Progressive spin waiter for the spinning operation variants.
///
/// Executes exponentially growing batches of PAUSE hints, capped so a
/// long wait keeps polling at a steady rate. It never yields to the OS:
/// the spinning operations busy-wait by contract, and callers that want
/// scheduler cooperation should use the non-blocking variants with their
/// own retry policy on top.
#[derive(Debug)]
pub struct Backoff {
    step: u32,
}

impl Backoff {
    const STEP_LIMIT: u32 = 6; // 2^6 = 64 PAUSE hints per batch, max

    /// Creates a fresh backoff at the lightest step.
    #[inline]
    pub fn new() -> Self {
        Self { step: 0 }
    }

    /// Executes one batch of spin hints and escalates toward the cap.
    #[inline]
    pub fn pause(&mut self) {
        for _ in 0..(1u32 << self.step) {
            hint::spin_loop();
        }
        if self.step < Self::STEP_LIMIT {
            self.step += 1;
        }
    }

    /// Resets to the lightest step for the next wait cycle.
    #[inline]
    pub fn reset(&mut self) {
        self.step = 0;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}
