use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single process or thread, as seen by the tree renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub id: i32,
    pub parent_id: i32,
    /// Thread-group id, shared by every thread of the same process
    pub tgid: i32,
    pub command: String,
}

impl ProcessRecord {
    pub fn new(id: i32, parent_id: i32, tgid: i32, command: impl Into<String>) -> Self {
        Self {
            id,
            parent_id,
            tgid,
            command: command.into(),
        }
    }

    /// A record that is its own thread-group leader
    pub fn process(id: i32, parent_id: i32, command: impl Into<String>) -> Self {
        Self::new(id, parent_id, id, command)
    }
}

/// Ordered listing of processes, persisted so that a tree can be rendered offline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSnapshot {
    /// Records in discovery order
    pub records: Vec<ProcessRecord>,
    /// State labels captured alongside the records, keyed by record id
    #[serde(default)]
    pub states: HashMap<i32, String>,
}

impl ProcessSnapshot {
    pub fn new(records: Vec<ProcessRecord>) -> Self {
        Self {
            records,
            states: HashMap::new(),
        }
    }

    pub fn with_states(mut self, states: HashMap<i32, String>) -> Self {
        self.states = states;
        self
    }
}

impl super::ArtifactExt for ProcessSnapshot {}
