use super::grouping::{GroupEntry, children_of};
use super::label::{label, label_width};
use super::{RenderFlags, RenderLimits, TreeError};
use crate::directory::{ProcessDirectory, ProcessRecord};
use log::debug;

/// Line drawing piece printed after a level's label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    Space,
    /// First child, drawn on the same line as its parent
    First,
    Branch,
    Last,
    /// Continuation bar under a parent that still has children to print
    Vertical,
}

impl Connector {
    pub fn glyph(self) -> &'static str {
        match self {
            Connector::Space => "    ",
            Connector::First => "-+- ",
            Connector::Branch => " |- ",
            Connector::Last => " `- ",
            Connector::Vertical => " |  ",
        }
    }
}

/// Drawing state of one ancestor on the current path
#[derive(Debug, Clone, Copy)]
struct Level {
    id: i32,
    /// Printed width of the ancestor's label
    width: usize,
    /// Connector drawn after that label on the lines below it
    connector: Connector,
}

/// Result of rendering one root
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderReport {
    /// Tree text, ending with a newline
    pub output: String,
    /// Subtrees that could not be expanded
    pub diagnostics: Vec<TreeError>,
}

/// Children of one node on the current path that are still to be drawn
#[derive(Debug)]
struct Frame<'a> {
    children: Vec<GroupEntry<'a>>,
    next: usize,
}

/// Walks a process tree depth first and draws it.
///
/// `levels` holds one entry per node on the path from the root to the node being printed, so
/// its length is always the depth of the next label. `frames` holds the pending children of every
/// node on that path that has any; the walk never recurses, so deep trees only grow these two
/// vectors.
pub struct BranchRenderer<'a> {
    directory: &'a dyn ProcessDirectory,
    flags: &'a RenderFlags,
    limits: &'a RenderLimits,
    levels: Vec<Level>,
    frames: Vec<Frame<'a>>,
    report: RenderReport,
}

impl<'a> BranchRenderer<'a> {
    pub fn new(
        directory: &'a dyn ProcessDirectory,
        flags: &'a RenderFlags,
        limits: &'a RenderLimits,
    ) -> Self {
        Self {
            directory,
            flags,
            limits,
            levels: Vec::new(),
            frames: Vec::new(),
            report: RenderReport::default(),
        }
    }

    /// Render the tree below `root`, `root` included.
    ///
    /// Only allocation failures abort the render; other failures are listed in the report and the
    /// remaining subtrees are still drawn.
    pub fn render(mut self, root: &ProcessRecord) -> Result<RenderReport, TreeError> {
        self.enter(GroupEntry { record: root, count: 1 }, true, true)?;

        while let Some(frame) = self.frames.last_mut() {
            let Some(&child) = frame.children.get(frame.next) else {
                self.frames.pop();
                self.levels.pop();
                continue;
            };
            let index = frame.next;
            frame.next += 1;
            let is_last = frame.next == frame.children.len();

            // The previous sibling's subtree ends its last line here
            if index > 0 {
                self.report.output.push('\n');
            }
            if let Some(level) = self.levels.last_mut() {
                level.connector = if is_last {
                    Connector::Last
                } else {
                    Connector::Branch
                };
            }

            self.enter(child, index == 0, is_last)?;
        }

        self.report.output.push('\n');
        Ok(self.report)
    }

    fn write_prefix(&mut self, is_first_child: bool) {
        if is_first_child && !self.levels.is_empty() {
            self.report.output.push_str(Connector::First.glyph());
            return;
        }

        for level in &self.levels {
            self.report.output.extend(std::iter::repeat_n(' ', level.width));
            self.report.output.push_str(level.connector.glyph());
        }
    }

    /// Draw the label of `entry` and schedule its children
    fn enter(
        &mut self,
        entry: GroupEntry<'_>,
        is_first_child: bool,
        is_last_child: bool,
    ) -> Result<(), TreeError> {
        self.write_prefix(is_first_child);

        let text = label(entry.record, entry.count, self.flags, self.directory);
        self.report.output.push_str(&text);

        // Lines printed below this node keep drawing the parent's branch only if more siblings follow
        if let Some(parent) = self.levels.last_mut() {
            parent.connector = if is_last_child {
                Connector::Space
            } else {
                Connector::Vertical
            };
        }

        let id = entry.record.id;
        self.levels
            .try_reserve(1)
            .map_err(|_| TreeError::AllocationFailure { id })?;
        self.levels.push(Level {
            id,
            width: label_width(&text),
            connector: Connector::Space,
        });

        let children = self.expand(id)?;
        if children.is_empty() {
            self.levels.pop();
            return Ok(());
        }

        self.frames
            .try_reserve(1)
            .map_err(|_| TreeError::AllocationFailure { id })?;
        self.frames.push(Frame { children, next: 0 });
        Ok(())
    }

    /// Children of `node_id` that can be drawn below it, reporting the ones that cannot
    fn expand(&mut self, node_id: i32) -> Result<Vec<GroupEntry<'a>>, TreeError> {
        let directory = self.directory;
        let children = match children_of(
            node_id,
            directory.records(),
            self.flags.group_threads,
            self.limits.max_groups,
        ) {
            Ok(children) => children,
            Err(err) if err.is_subtree_local() => {
                self.report_subtree_error(err);
                return Ok(Vec::new());
            }
            Err(err) => return Err(err),
        };

        let (cyclic, children): (Vec<GroupEntry<'a>>, Vec<GroupEntry<'a>>) = children
            .into_iter()
            .partition(|child| self.levels.iter().any(|level| level.id == child.record.id));
        for child in cyclic {
            self.report_subtree_error(TreeError::CycleDetected {
                id: child.record.id,
                parent_id: node_id,
            });
        }

        if !children.is_empty() && self.levels.len() >= self.limits.max_depth {
            self.report_subtree_error(TreeError::DepthExceeded {
                id: node_id,
                max_depth: self.limits.max_depth,
            });
            return Ok(Vec::new());
        }

        Ok(children)
    }

    fn report_subtree_error(&mut self, err: TreeError) {
        debug!("Skipping subtree: {err}");
        self.report.diagnostics.push(err);
    }
}
