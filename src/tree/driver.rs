use super::{BranchRenderer, RenderFlags, RenderLimits, RenderReport, TreeError};
use crate::directory::{ProcessDirectory, ProcessRecord};
use crate::prelude::*;
use std::io::Write;

/// Outcome of a [`print_trees`] call
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PrintSummary {
    /// Number of trees written to the output
    pub rendered: usize,
    /// Every failure that was reported, in the order it happened
    pub errors: Vec<TreeError>,
}

/// Print the tree of every requested root, or of the first record when `roots` is empty.
///
/// Unknown roots are reported in `out` and skipped. Subtrees that could not be drawn are reported
/// in `errors`, the rest of the output is unaffected.
pub fn print_trees(
    directory: &dyn ProcessDirectory,
    roots: &[i32],
    flags: &RenderFlags,
    limits: &RenderLimits,
    out: &mut dyn Write,
    errors: &mut dyn Write,
) -> Result<PrintSummary> {
    print_trees_with(directory, roots, limits, out, errors, |root| {
        BranchRenderer::new(directory, flags, limits).render(root)
    })
}

fn print_trees_with(
    directory: &dyn ProcessDirectory,
    roots: &[i32],
    limits: &RenderLimits,
    out: &mut dyn Write,
    errors: &mut dyn Write,
    mut render: impl FnMut(&ProcessRecord) -> Result<RenderReport, TreeError>,
) -> Result<PrintSummary> {
    if roots.len() > limits.max_roots {
        return Err(TreeError::RootCapacityExceeded {
            requested: roots.len(),
            max_roots: limits.max_roots,
        }
        .into());
    }

    let mut summary = PrintSummary::default();

    let resolved: Vec<&ProcessRecord> = if roots.is_empty() {
        directory.records().first().into_iter().collect()
    } else {
        roots
            .iter()
            .filter_map(|&id| match directory.lookup(id) {
                Some(record) => Some(record),
                None => {
                    summary.errors.push(TreeError::UnknownRoot { id });
                    None
                }
            })
            .collect()
    };
    for err in &summary.errors {
        writeln!(out, "{err}")?;
    }

    writeln!(
        out,
        "Total # of processes in the system : {}",
        directory.count()
    )?;

    for root in resolved {
        if summary.rendered > 0 {
            writeln!(out)?;
        }

        match render(root) {
            Ok(report) => {
                out.write_all(report.output.as_bytes())?;
                summary.rendered += 1;
                for err in report.diagnostics {
                    writeln!(errors, "pstree: {err}")?;
                    summary.errors.push(err);
                }
            }
            Err(err) => {
                error!("Rendering PID {} failed: {err}", root.id);
                writeln!(errors, "pstree: {err}")?;
                summary.errors.push(err);
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::SnapshotDirectory;

    fn directory() -> SnapshotDirectory {
        SnapshotDirectory::from_records(vec![
            ProcessRecord::process(1, 1, "init"),
            ProcessRecord::process(2, 1, "httpd"),
            ProcessRecord::process(3, 1, "swapd"),
            ProcessRecord::process(4, 2, "worker"),
        ])
    }

    fn run(roots: &[i32], limits: RenderLimits) -> (Result<PrintSummary>, String, String) {
        let mut out = Vec::new();
        let mut errors = Vec::new();
        let result = print_trees(
            &directory(),
            roots,
            &RenderFlags::default(),
            &limits,
            &mut out,
            &mut errors,
        );
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(errors).unwrap(),
        )
    }

    #[test_log::test]
    fn test_default_root_is_first_record() {
        let (summary, out, errors) = run(&[], RenderLimits::default());
        assert_eq!(summary.unwrap().rendered, 1);
        insta::assert_snapshot!(out, @r"
        Total # of processes in the system : 4
        init-+- httpd-+- worker
             `- swapd
        ");
        assert!(errors.is_empty());
    }

    #[test_log::test]
    fn test_unknown_root_does_not_stop_others() {
        let (summary, out, _) = run(&[1, 9999], RenderLimits::default());
        let summary = summary.unwrap();

        assert_eq!(summary.rendered, 1);
        assert_eq!(summary.errors, vec![TreeError::UnknownRoot { id: 9999 }]);
        assert_eq!(
            out,
            "PID 9999: no such process\n\
             Total # of processes in the system : 4\n\
             init-+- httpd-+- worker\n     `- swapd\n"
        );
    }

    #[test_log::test]
    fn test_roots_are_separated_by_blank_line() {
        let (summary, out, _) = run(&[2, 3], RenderLimits::default());
        assert_eq!(summary.unwrap().rendered, 2);
        assert_eq!(
            out,
            "Total # of processes in the system : 4\nhttpd-+- worker\n\nswapd\n"
        );
    }

    #[test_log::test]
    fn test_only_unknown_roots_renders_nothing() {
        let (summary, out, _) = run(&[42], RenderLimits::default());
        assert_eq!(summary.unwrap().rendered, 0);
        assert_eq!(
            out,
            "PID 42: no such process\nTotal # of processes in the system : 4\n"
        );
    }

    #[test_log::test]
    fn test_too_many_roots_is_an_error() {
        let limits = RenderLimits {
            max_roots: 2,
            ..Default::default()
        };
        let (summary, out, _) = run(&[1, 2, 3], limits);
        let err = summary.unwrap_err();
        assert_eq!(
            err.downcast_ref::<TreeError>(),
            Some(&TreeError::RootCapacityExceeded {
                requested: 3,
                max_roots: 2
            })
        );
        assert!(out.is_empty());
    }

    #[test_log::test]
    fn test_subtree_errors_go_to_error_stream() {
        let limits = RenderLimits {
            max_depth: 2,
            ..Default::default()
        };
        let (summary, out, errors) = run(&[1], limits);
        let summary = summary.unwrap();

        assert_eq!(
            out,
            "Total # of processes in the system : 4\ninit-+- httpd\n     `- swapd\n"
        );
        assert_eq!(
            errors,
            "pstree: PID 2: children not shown, tree is deeper than 2 levels\n"
        );
        assert_eq!(summary.errors.len(), 1);
    }

    #[test_log::test]
    fn test_allocation_failure_skips_only_that_root() {
        let directory = directory();
        let flags = RenderFlags::default();
        let limits = RenderLimits::default();
        let mut out = Vec::new();
        let mut errors = Vec::new();

        let summary = print_trees_with(&directory, &[2, 3], &limits, &mut out, &mut errors, |root| {
            if root.id == 2 {
                return Err(TreeError::AllocationFailure { id: 2 });
            }
            BranchRenderer::new(&directory, &flags, &limits).render(root)
        })
        .unwrap();

        assert_eq!(summary.rendered, 1);
        assert_eq!(summary.errors, vec![TreeError::AllocationFailure { id: 2 }]);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Total # of processes in the system : 4\nswapd\n"
        );
        assert_eq!(
            String::from_utf8(errors).unwrap(),
            "pstree: PID 2: out of memory while listing children\n"
        );
    }
}
