//! mailring - Lock-Free MPMC Message Passing over Ring-Buffer Inboxes
//!
//! An [`Inbox`] is a fixed-capacity ring of typed message slots with a
//! per-slot atomic flag protocol: no queue-wide lock, no kernel
//! synchronization, bounded latency. A [`Node`] bundles inboxes under a
//! name and adds a broadcast helper.
//!
//! # Key Features
//!
//! - Per-slot publish protocol (claim, copy, publish) - coordination
//!   never crosses slot boundaries
//! - Division-free slot indexing for any even capacity, power of two or
//!   not
//! - Non-blocking (`try_*`) and spinning variants of every operation
//! - Shared-read variants that serialize competing consumers per slot
//! - 128-byte counter alignment (prefetcher false sharing elimination)
//!
//! # Example
//!
//! ```
//! use mailring::Inbox;
//!
//! let inbox = Inbox::<[u8; 16]>::new("wire", 512).unwrap();
//!
//! // Non-blocking: `false` means the ring is full right now.
//! if !inbox.try_write(*b"0123456789abcdef") {
//!     // back-pressure
//! }
//!
//! // Spinning: does not return until a message is read.
//! let msg = inbox.read_spin();
//! assert_eq!(&msg, b"0123456789abcdef");
//! ```
//!
//! # Choosing an operation variant
//!
//! | writers | readers | write with | read with |
//! |---|---|---|---|
//! | 1 | 1 | `try_write` / `write_spin` | `try_read` / `read_spin` |
//! | N | 1 | `write_spin` | `try_read` / `read_spin` |
//! | N | N | `write_spin` | `try_read_shared` / `read_shared_spin` |
//!
//! Never mix shared and non-shared read variants on one inbox, and never
//! use `try_write` with more than one writer.

mod backoff;
mod config;
mod inbox;
mod index;
mod invariants;
mod metrics;
mod node;
mod report;
mod slot;

pub use backoff::Backoff;
pub use config::{Config, HIGH_THROUGHPUT_CONFIG, LOW_LATENCY_CONFIG};
pub use inbox::{Inbox, InboxError};
pub use metrics::{Metrics, MetricsSnapshot};
pub use node::{Node, NodeError};
