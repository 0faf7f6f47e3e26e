use std::fmt;

/// Failures raised while rendering a process tree.
///
/// `DepthExceeded`, `GroupCapacityExceeded` and `CycleDetected` only stop the subtree they occur
/// in; the renderer collects them and keeps drawing the siblings. `AllocationFailure` aborts the
/// whole render of the current root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The requested root id is not in the directory
    UnknownRoot { id: i32 },
    /// Expanding `id` would go deeper than `max_depth`
    DepthExceeded { id: i32, max_depth: usize },
    /// `id` has more distinct child entries than `max_groups`
    GroupCapacityExceeded { id: i32, max_groups: usize },
    /// `id` is listed as a child of `parent_id` while already being one of its ancestors
    CycleDetected { id: i32, parent_id: i32 },
    /// More roots were requested than `max_roots`
    RootCapacityExceeded { requested: usize, max_roots: usize },
    AllocationFailure { id: i32 },
}

impl TreeError {
    /// Whether the error only invalidates one subtree
    pub fn is_subtree_local(&self) -> bool {
        matches!(
            self,
            TreeError::DepthExceeded { .. }
                | TreeError::GroupCapacityExceeded { .. }
                | TreeError::CycleDetected { .. }
        )
    }
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::UnknownRoot { id } => write!(f, "PID {id}: no such process"),
            TreeError::DepthExceeded { id, max_depth } => write!(
                f,
                "PID {id}: children not shown, tree is deeper than {max_depth} levels"
            ),
            TreeError::GroupCapacityExceeded { id, max_groups } => write!(
                f,
                "PID {id}: children not shown, more than {max_groups} entries at one level"
            ),
            TreeError::CycleDetected { id, parent_id } => write!(
                f,
                "PID {id}: parent cycle detected under PID {parent_id}, subtree skipped"
            ),
            TreeError::RootCapacityExceeded {
                requested,
                max_roots,
            } => write!(
                f,
                "{requested} root PIDs requested, at most {max_roots} are supported"
            ),
            TreeError::AllocationFailure { id } => {
                write!(f, "PID {id}: out of memory while listing children")
            }
        }
    }
}

impl std::error::Error for TreeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtree_local_errors() {
        assert!(TreeError::CycleDetected { id: 1, parent_id: 2 }.is_subtree_local());
        assert!(
            TreeError::DepthExceeded {
                id: 1,
                max_depth: 4
            }
            .is_subtree_local()
        );
        assert!(!TreeError::AllocationFailure { id: 1 }.is_subtree_local());
        assert!(!TreeError::UnknownRoot { id: 1 }.is_subtree_local());
    }

    #[test]
    fn test_unknown_root_message() {
        assert_eq!(
            TreeError::UnknownRoot { id: 9999 }.to_string(),
            "PID 9999: no such process"
        );
    }
}
