//! # Persistence Layer
//!
//! This crate owns the season snapshot: the JSON document every automation
//! run reads, rebuilds, and writes back.
//!
//! - **AwardSnapshot**: the persisted document, scores + ledger + run
//!   bookkeeping
//! - **SnapshotStore**: tolerant load, atomic save, lock-file guard
//!
//! ## Usage
//!
//! ```rust,no_run
//! use persistence::SnapshotStore;
//!
//! let store = SnapshotStore::new("brown-bell-data.json");
//! let _guard = store.lock()?;
//! let previous = store.load();
//! # let _ = previous;
//! # Ok::<(), persistence::StoreError>(())
//! ```

pub mod error;
pub mod snapshot;
pub mod store;

pub use error::{Result, StoreError};
pub use snapshot::{
    AutomationStats, AwardSnapshot, SnapshotPlayer, SnapshotTeam, SNAPSHOT_VERSION,
};
pub use store::{SnapshotStore, StoreLock};
