use super::{ProcessDirectory, ProcessRecord};
use crate::prelude::*;

/// Synthetic root every kernel task ultimately descends from
const IDLE_TASK_PID: i32 = 0;
const IDLE_TASK_COMM: &str = "swapper";

/// Directory of the processes currently running on this machine
pub struct LiveDirectory {
    records: Vec<ProcessRecord>,
    #[cfg(not(target_os = "linux"))]
    system: sysinfo::System,
}

fn idle_task() -> ProcessRecord {
    ProcessRecord::process(IDLE_TASK_PID, IDLE_TASK_PID, IDLE_TASK_COMM)
}

#[cfg(target_os = "linux")]
mod linux {
    use super::*;
    use procfs::process::Process;

    /// Map a `/proc/<pid>/stat` state character to the two-letter code shown in the tree
    pub(super) fn state_label(state: char) -> &'static str {
        match state {
            'R' => "RU",
            'S' => "IN",
            'D' => "UN",
            'Z' => "ZO",
            'T' => "ST",
            't' => "TR",
            'X' | 'x' => "DE",
            'I' => "ID",
            'W' => "WA",
            'P' => "PA",
            _ => super::super::UNKNOWN_STATE,
        }
    }

    /// Every thread of every process, threads listed under the parent of their process
    pub(super) fn discover() -> Result<Vec<ProcessRecord>> {
        let mut records = vec![idle_task()];

        for process in procfs::process::all_processes().context("Failed to list /proc")? {
            // Processes can exit while we walk /proc
            let Ok(process) = process else { continue };
            let Ok(stat) = process.stat() else {
                debug!("Process {} vanished before its stat was read", process.pid);
                continue;
            };

            let tasks = match process.tasks() {
                Ok(tasks) => tasks,
                Err(err) => {
                    debug!("Cannot list threads of {}: {err}", stat.pid);
                    records.push(ProcessRecord::process(stat.pid, stat.ppid, stat.comm));
                    continue;
                }
            };

            for task in tasks.flatten() {
                let comm = match task.stat() {
                    Ok(task_stat) => task_stat.comm,
                    Err(_) => stat.comm.clone(),
                };
                records.push(ProcessRecord::new(task.tid, stat.ppid, stat.pid, comm));
            }
        }

        Ok(records)
    }

    pub(super) fn lookup_state(id: i32) -> Option<String> {
        let stat = Process::new(id).and_then(|process| process.stat()).ok()?;
        Some(state_label(stat.state).to_string())
    }
}

#[cfg(not(target_os = "linux"))]
mod fallback {
    use super::*;
    use sysinfo::{Pid, ProcessRefreshKind, ProcessStatus, RefreshKind, System};

    pub(super) fn state_label(status: ProcessStatus) -> &'static str {
        match status {
            ProcessStatus::Run => "RU",
            ProcessStatus::Sleep => "IN",
            ProcessStatus::UninterruptibleDiskSleep => "UN",
            ProcessStatus::Zombie => "ZO",
            ProcessStatus::Stop => "ST",
            ProcessStatus::Tracing => "TR",
            ProcessStatus::Dead => "DE",
            ProcessStatus::Idle => "ID",
            ProcessStatus::Waking => "WA",
            ProcessStatus::Parked => "PA",
            _ => super::super::UNKNOWN_STATE,
        }
    }

    /// Only processes are visible here, so every record is its own thread-group leader
    pub(super) fn discover() -> (Vec<ProcessRecord>, System) {
        let system = System::new_with_specifics(
            RefreshKind::nothing().with_processes(ProcessRefreshKind::nothing()),
        );

        let mut processes: Vec<_> = system.processes().values().collect();
        processes.sort_by_key(|process| process.pid());

        let mut records = vec![idle_task()];
        records.extend(processes.into_iter().map(|process| {
            let pid = process.pid().as_u32() as i32;
            let parent_id = process
                .parent()
                .map(|parent| parent.as_u32() as i32)
                .unwrap_or(IDLE_TASK_PID);
            ProcessRecord::process(pid, parent_id, process.name().to_string_lossy())
        }));

        (records, system)
    }

    pub(super) fn lookup_state(system: &System, id: i32) -> Option<String> {
        let process = system.process(Pid::from_u32(u32::try_from(id).ok()?))?;
        Some(state_label(process.status()).to_string())
    }
}

impl LiveDirectory {
    #[cfg(target_os = "linux")]
    pub fn discover() -> Result<Self> {
        let records = linux::discover()?;
        debug!("Discovered {} tasks from /proc", records.len());
        Ok(Self { records })
    }

    #[cfg(not(target_os = "linux"))]
    pub fn discover() -> Result<Self> {
        let (records, system) = fallback::discover();
        debug!("Discovered {} processes", records.len());
        Ok(Self { records, system })
    }
}

impl ProcessDirectory for LiveDirectory {
    fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    fn lookup_state(&self, id: i32) -> Option<String> {
        if id == IDLE_TASK_PID {
            return Some("RU".to_string());
        }

        #[cfg(target_os = "linux")]
        return linux::lookup_state(id);

        #[cfg(not(target_os = "linux"))]
        return fallback::lookup_state(&self.system, id);
    }
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;

    #[test]
    fn test_state_labels() {
        assert_eq!(linux::state_label('R'), "RU");
        assert_eq!(linux::state_label('S'), "IN");
        assert_eq!(linux::state_label('Z'), "ZO");
        assert_eq!(linux::state_label('?'), "??");
    }

    #[test_log::test]
    fn test_discover_contains_current_process() {
        let directory = LiveDirectory::discover().unwrap();
        let own_pid = std::process::id() as i32;

        let record = directory
            .lookup(own_pid)
            .expect("current process should be listed");
        assert_eq!(record.tgid, own_pid);
        assert_eq!(directory.records()[0], idle_task());
        assert!(directory.lookup_state(own_pid).is_some());
    }
}
