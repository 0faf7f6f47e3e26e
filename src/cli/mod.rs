use std::io::Write;
use std::path::PathBuf;

use crate::{
    config::PstreeConfig,
    directory::{LiveDirectory, ProcessDirectory, SnapshotDirectory, capture_snapshot},
    prelude::*,
    tree::{RenderFlags, RenderLimits, print_trees},
};
use clap::{
    Parser,
    builder::{Styles, styling},
};
use pstree_snapshot::artifacts::ArtifactExt;

fn create_styles() -> Styles {
    styling::Styles::styled()
        .header(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .usage(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .literal(styling::AnsiColor::Yellow.on_default() | styling::Effects::BOLD)
        .placeholder(styling::AnsiColor::Cyan.on_default())
}

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "pstree",
    version,
    about = "Print process list in tree",
    styles = create_styles()
)]
pub struct PstreeArgs {
    /// Print process ID (thread group ID with -g)
    #[arg(short = 'p')]
    pub show_id: bool,

    /// Print thread group instead of each thread
    #[arg(short = 'g')]
    pub group_threads: bool,

    /// Print task status
    #[arg(short = 's')]
    pub show_state: bool,

    /// Render a snapshot saved with --save-snapshot instead of the running system
    #[arg(long, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Save the process list to DIR before rendering it
    #[arg(long, value_name = "DIR")]
    pub save_snapshot: Option<PathBuf>,

    /// The configuration name to use
    /// If provided, the configuration will be loaded from ~/.config/pstree/{config-name}.yaml
    /// Otherwise, loads from ~/.config/pstree/config.yaml
    #[arg(long, env = "PSTREE_CONFIG_NAME")]
    pub config_name: Option<String>,

    /// Maximum number of tree levels
    #[arg(long, value_name = "LEVELS")]
    pub max_depth: Option<usize>,

    /// Maximum number of entries under one process
    #[arg(long, value_name = "COUNT")]
    pub max_groups: Option<usize>,

    /// Maximum number of root PIDs
    #[arg(long, value_name = "COUNT")]
    pub max_roots: Option<usize>,

    /// Root PIDs, defaults to the first task of the system
    #[arg(value_name = "PID")]
    pub pids: Vec<i32>,
}

impl PstreeArgs {
    pub fn render_flags(&self, config: &PstreeConfig) -> RenderFlags {
        RenderFlags {
            show_id: self.show_id || config.display.show_id,
            group_threads: self.group_threads || config.display.group_threads,
            show_state: self.show_state || config.display.show_state,
        }
    }

    pub fn render_limits(&self, config: &PstreeConfig) -> RenderLimits {
        RenderLimits {
            max_depth: self.max_depth.unwrap_or(config.limits.max_depth),
            max_groups: self.max_groups.unwrap_or(config.limits.max_groups),
            max_roots: self.max_roots.unwrap_or(config.limits.max_roots),
        }
    }
}

fn load_directory(args: &PstreeArgs) -> Result<Box<dyn ProcessDirectory>> {
    Ok(match &args.snapshot {
        Some(path) => Box::new(SnapshotDirectory::load(path)?),
        None => Box::new(LiveDirectory::discover()?),
    })
}

pub fn run(args: PstreeArgs, out: &mut dyn Write, errors: &mut dyn Write) -> Result<()> {
    let config = PstreeConfig::load(args.config_name.as_deref())?;
    let flags = args.render_flags(&config);
    let limits = args.render_limits(&config);
    debug!("Rendering with {flags:?} and {limits:?}");

    let directory = load_directory(&args)?;

    if let Some(folder) = &args.save_snapshot {
        let path = capture_snapshot(directory.as_ref())
            .save_to(folder)
            .context("Failed to save process snapshot")?;
        info!("Process snapshot saved to {}", path.display());
    }

    let summary = print_trees(
        directory.as_ref(),
        &args.pids,
        &flags,
        &limits,
        out,
        errors,
    )?;
    debug!(
        "Rendered {} trees with {} reported errors",
        summary.rendered,
        summary.errors.len()
    );

    Ok(())
}
