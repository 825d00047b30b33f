//! Keeping indexes in step with the store of record.
//!
//! Two writers feed each index:
//!
//! - [`RebuildOrchestrator`] clears an index and refills it from a full read
//!   of the store. It is best effort: every failure is logged and reported in
//!   the returned [`RebuildOutcome`], never raised.
//! - [`IncrementalIndexer`] re-projects one entity after it was written and
//!   upserts it with read-after-write visibility. Failures are logged and left
//!   for the next rebuild to repair.
//!
//! # Rebuild and incremental writes
//!
//! Both writers of one entity type share a [`RebuildTracker`]. While a
//! rebuild runs, incremental calls only record the entity id. Once the refill
//! is done the orchestrator replays each recorded id against the store, so a
//! write that happened during the clear phase cannot be lost. A second
//! rebuild of the same type started while one is running is skipped.

mod incremental;
mod rebuild;
mod tracker;

pub use incremental::{IncrementalIndexer, IndexOutcome};
pub use rebuild::{RebuildOrchestrator, RebuildOutcome, RebuildStatus};
pub use tracker::{RebuildGuard, RebuildTracker};
