//! ASCII rendering of process trees.

mod driver;
mod error;
mod grouping;
mod label;
mod render;

pub use driver::{PrintSummary, print_trees};
pub use error::TreeError;
pub use grouping::{GroupEntry, children_of};
pub use label::{label, label_width};
pub use render::{BranchRenderer, Connector, RenderReport};

use serde::{Deserialize, Serialize};

/// Capacity used for every limit when nothing else is configured
pub const DEFAULT_CAPACITY: usize = 1024;

/// What is printed next to each process name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderFlags {
    /// Append ` [pid]`, or ` [tgid]` when threads are grouped
    pub show_id: bool,
    /// Collapse threads of the same process into one `<count>name` entry
    pub group_threads: bool,
    /// Append the `[state]` of each process
    pub show_state: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RenderLimits {
    /// Maximum number of tree levels, the root being the first
    pub max_depth: usize,
    /// Maximum number of entries printed under a single process
    pub max_groups: usize,
    /// Maximum number of roots rendered by one command
    pub max_roots: usize,
}

impl Default for RenderLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_CAPACITY,
            max_groups: DEFAULT_CAPACITY,
            max_roots: DEFAULT_CAPACITY,
        }
    }
}
