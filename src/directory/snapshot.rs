use super::{ProcessDirectory, ProcessRecord};
use crate::prelude::*;
use pstree_snapshot::artifacts::{ArtifactExt, ProcessSnapshot};
use std::collections::HashMap;
use std::path::Path;

/// Directory backed by an in-memory or previously saved [`ProcessSnapshot`]
#[derive(Debug, Clone, Default)]
pub struct SnapshotDirectory {
    snapshot: ProcessSnapshot,
}

impl SnapshotDirectory {
    pub fn new(snapshot: ProcessSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn from_records(records: Vec<ProcessRecord>) -> Self {
        Self::new(ProcessSnapshot::new(records))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let snapshot = ProcessSnapshot::load_from(path)
            .with_context(|| format!("Failed to load process snapshot {}", path.display()))?;
        debug!(
            "Snapshot {} holds {} records",
            path.display(),
            snapshot.records.len()
        );
        Ok(Self::new(snapshot))
    }

    pub fn snapshot(&self) -> &ProcessSnapshot {
        &self.snapshot
    }
}

impl ProcessDirectory for SnapshotDirectory {
    fn records(&self) -> &[ProcessRecord] {
        &self.snapshot.records
    }

    fn lookup_state(&self, id: i32) -> Option<String> {
        self.snapshot.states.get(&id).cloned()
    }
}

/// Freeze a directory into a snapshot, resolving every state label up front
pub fn capture_snapshot(directory: &dyn ProcessDirectory) -> ProcessSnapshot {
    let states: HashMap<i32, String> = directory
        .records()
        .iter()
        .filter_map(|record| {
            directory
                .lookup_state(record.id)
                .map(|state| (record.id, state))
        })
        .collect();

    ProcessSnapshot::new(directory.records().to_vec()).with_states(states)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> SnapshotDirectory {
        SnapshotDirectory::new(
            ProcessSnapshot::new(vec![
                ProcessRecord::process(1, 1, "init"),
                ProcessRecord::process(2, 1, "httpd"),
            ])
            .with_states(HashMap::from([(2, "RU".to_string())])),
        )
    }

    #[test]
    fn test_lookup() {
        let directory = directory();
        assert_eq!(directory.count(), 2);
        assert_eq!(directory.lookup(2).map(|r| r.command.as_str()), Some("httpd"));
        assert!(directory.lookup(3).is_none());
    }

    #[test]
    fn test_lookup_state() {
        let directory = directory();
        assert_eq!(directory.lookup_state(2).as_deref(), Some("RU"));
        assert_eq!(directory.lookup_state(1), None);
    }

    #[test]
    fn test_capture_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let captured = capture_snapshot(&directory());
        let path = captured.save_to(tmp.path()).unwrap();

        let loaded = SnapshotDirectory::load(&path).unwrap();
        assert_eq!(loaded.records(), directory().records());
        assert_eq!(loaded.lookup_state(2).as_deref(), Some("RU"));
    }

    #[test]
    fn test_load_garbage_has_context() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("ProcessSnapshot.msgpack");
        std::fs::write(&path, b"not msgpack").unwrap();

        let err = SnapshotDirectory::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to load process snapshot"));
    }
}
