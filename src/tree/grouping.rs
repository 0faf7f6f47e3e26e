use super::TreeError;
use crate::directory::ProcessRecord;
use std::collections::HashMap;

/// One displayed child: the first record of its group and how many records the group holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupEntry<'a> {
    pub record: &'a ProcessRecord,
    pub count: usize,
}

/// Children of `node_id` in snapshot order.
///
/// With `group_threads`, siblings sharing a thread-group id collapse into the entry of the first
/// one seen, which keeps its position and accumulates the count. A record listed as its own parent
/// is never its own child.
pub fn children_of(
    node_id: i32,
    records: &[ProcessRecord],
    group_threads: bool,
    max_groups: usize,
) -> Result<Vec<GroupEntry<'_>>, TreeError> {
    let mut entries: Vec<GroupEntry<'_>> = Vec::new();
    // tgid -> index in `entries`
    let mut by_tgid: HashMap<i32, usize> = HashMap::new();

    let children = records
        .iter()
        .filter(|record| record.parent_id == node_id && record.id != node_id);

    for record in children {
        if group_threads {
            if let Some(&index) = by_tgid.get(&record.tgid) {
                entries[index].count += 1;
                continue;
            }
        }

        if entries.len() >= max_groups {
            return Err(TreeError::GroupCapacityExceeded {
                id: node_id,
                max_groups,
            });
        }
        entries
            .try_reserve(1)
            .map_err(|_| TreeError::AllocationFailure { id: node_id })?;
        if group_threads {
            by_tgid
                .try_reserve(1)
                .map_err(|_| TreeError::AllocationFailure { id: node_id })?;
            by_tgid.insert(record.tgid, entries.len());
        }
        entries.push(GroupEntry { record, count: 1 });
    }

    Ok(entries)
}
