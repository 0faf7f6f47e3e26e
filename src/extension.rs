//! Registration of the `pstree` command with a hosting front-end.
//!
//! Nothing is registered implicitly: the host calls [`init`] once it has a [`CommandTable`] and
//! [`fini`] before tearing it down.

use std::collections::BTreeMap;
use std::io::Write;

use crate::cli::{self, PstreeArgs};
use crate::prelude::*;
use clap::Parser;
use itertools::Itertools;

pub const COMMAND_NAME: &str = "pstree";

pub type CommandHandler = fn(&[String], &mut dyn Write, &mut dyn Write) -> Result<()>;

/// A command a host can dispatch to, with the data needed for its help page
#[derive(Debug, Clone, Copy)]
pub struct CommandEntry {
    pub name: &'static str,
    pub summary: &'static str,
    pub synopsis: &'static str,
    pub description: &'static [&'static str],
    pub example: &'static [&'static str],
    pub handler: CommandHandler,
}

#[derive(Debug, Default)]
pub struct CommandTable {
    commands: BTreeMap<&'static str, CommandEntry>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: CommandEntry) -> Result<()> {
        ensure!(
            !self.commands.contains_key(entry.name),
            "Command {} is already registered",
            entry.name
        );
        debug!("Registering command {}", entry.name);
        self.commands.insert(entry.name, entry);
        Ok(())
    }

    pub fn unregister(&mut self, name: &str) -> Option<CommandEntry> {
        debug!("Unregistering command {name}");
        self.commands.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.commands.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    /// Run `name` with `args`, `args[0]` being the command name
    pub fn dispatch(
        &self,
        name: &str,
        args: &[String],
        out: &mut dyn Write,
        errors: &mut dyn Write,
    ) -> Result<()> {
        let Some(entry) = self.get(name) else {
            bail!(
                "Unknown command {name}, available commands: {}",
                self.names().join(", ")
            );
        };
        (entry.handler)(args, out, errors)
    }

    /// Help page in the NAME / SYNOPSIS / DESCRIPTION / EXAMPLE layout
    pub fn help_page(&self, name: &str) -> Option<String> {
        let entry = self.get(name)?;
        let mut page = format!(
            "NAME\n  {} - {}\n\nSYNOPSIS\n  {} {}\n\nDESCRIPTION\n",
            entry.name, entry.summary, entry.name, entry.synopsis
        );
        push_section_body(&mut page, entry.description);
        if !entry.example.is_empty() {
            page.push_str("\nEXAMPLE\n");
            push_section_body(&mut page, entry.example);
        }
        Some(page)
    }
}

fn push_section_body(page: &mut String, lines: &[&str]) {
    for line in lines {
        if line.is_empty() {
            page.push('\n');
        } else {
            page.push_str(&format!("  {line}\n"));
        }
    }
}

const DESCRIPTION: &[&str] = &[
    "This command prints process list in tree",
    "",
    "The list can be modified by the following options",
    "",
    "  -p  print process ID",
    "  -g  print thread group instead of each threads",
    "  -s  print task status",
];

const EXAMPLE: &[&str] = &[
    "Print out process list",
    "",
    "  $ pstree",
    "  init-+- swapd",
    "       |- httpd",
    "       `- ...",
];

fn run_pstree(args: &[String], out: &mut dyn Write, errors: &mut dyn Write) -> Result<()> {
    let args = match PstreeArgs::try_parse_from(args) {
        Ok(args) => args,
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                write!(out, "{err}")?;
                return Ok(());
            }
            _ => return Err(err.into()),
        },
    };
    cli::run(args, out, errors)
}

pub fn entry() -> CommandEntry {
    CommandEntry {
        name: COMMAND_NAME,
        summary: "print process list in tree",
        synopsis: "[-p][-g][-s] [pid] ...",
        description: DESCRIPTION,
        example: EXAMPLE,
        handler: run_pstree,
    }
}

/// Register the `pstree` command
pub fn init(table: &mut CommandTable) -> Result<()> {
    table.register(entry())
}

/// Remove the `pstree` command registered by [`init`]
pub fn fini(table: &mut CommandTable) {
    table.unregister(COMMAND_NAME);
}
