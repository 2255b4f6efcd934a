//! Payment-Status Storage
//!
//! Keyed storage for the payment reconciliation flow: the callback
//! receiver writes the latest payment record per invoice, the poller
//! reads it back. The contract is `put` (unconditional overwrite), `get`
//! and `remove` behind [`StatusStore`], with [`MemoryStore`] as the
//! process-local backend and
//! [`StatusIndex`] adding serde typing and key prefixes on top.
//!
//! Writes are last-write-wins with no ordering guarantee; a stale retry
//! can regress an observed status. That trade is part of the flow's
//! contract and is pinned by tests upstream rather than patched here.

pub mod error;
pub mod index;
pub mod memory;
pub mod traits;

pub use error::*;
pub use index::*;
pub use memory::*;
pub use traits::*;
