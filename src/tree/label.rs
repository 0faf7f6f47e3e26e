use super::RenderFlags;
use crate::directory::{ProcessDirectory, ProcessRecord, UNKNOWN_STATE};

/// Text printed for one tree node, e.g. `<4>java [1200][IN]`
pub fn label(
    record: &ProcessRecord,
    count: usize,
    flags: &RenderFlags,
    directory: &dyn ProcessDirectory,
) -> String {
    let mut label = String::new();

    if flags.group_threads && count > 1 {
        label.push_str(&format!("<{count}>"));
    }

    label.push_str(&record.command);

    if flags.show_id {
        let id = if flags.group_threads {
            record.tgid
        } else {
            record.id
        };
        label.push_str(&format!(" [{id}]"));
    }

    if flags.show_state {
        let state = directory
            .lookup_state(record.id)
            .unwrap_or_else(|| UNKNOWN_STATE.to_string());
        label.push_str(&format!("[{state}]"));
    }

    label
}

/// Number of terminal columns taken by a label
pub fn label_width(label: &str) -> usize {
    console::measure_text_width(label)
}
