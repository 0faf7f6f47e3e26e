//! Sources of process records for the tree renderer.
//!
//! A [`ProcessDirectory`] hands out a consistent, ordered listing of records and resolves state
//! labels on demand. The renderer only ever reads from it.

mod live;
mod snapshot;

pub use live::LiveDirectory;
pub use pstree_snapshot::artifacts::ProcessRecord;
pub use snapshot::{SnapshotDirectory, capture_snapshot};

/// Label used when the state of a record cannot be resolved
pub const UNKNOWN_STATE: &str = "??";

pub trait ProcessDirectory {
    /// All records, in stable discovery order
    fn records(&self) -> &[ProcessRecord];

    /// Two-letter state code of the record with the given id, if it can be resolved
    fn lookup_state(&self, id: i32) -> Option<String>;

    fn count(&self) -> usize {
        self.records().len()
    }

    fn lookup(&self, id: i32) -> Option<&ProcessRecord> {
        self.records().iter().find(|record| record.id == id)
    }
}
