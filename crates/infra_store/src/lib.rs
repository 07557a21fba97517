//! In-memory store adapter for the allowance ledger
//!
//! Implements the `LedgerStore` port with lock-guarded tables, standing in
//! for an external transactional database: per-batch atomicity and a totally
//! ordered transaction log per account. Snapshots round-trip the whole
//! ledger through JSON for the settlement job.

pub mod error;
pub mod snapshot;
pub mod store;

pub use error::SnapshotError;
pub use snapshot::LedgerSnapshot;
pub use store::MemoryStore;
