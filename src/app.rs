use std::io::Write;

use crate::extension::{self, COMMAND_NAME, CommandTable};
use crate::prelude::*;

/// Host the `pstree` command for the lifetime of one invocation.
///
/// `pstree help` prints the long help page, everything else goes through the command's own
/// argument parser.
pub fn run(args: &[String], out: &mut dyn Write, errors: &mut dyn Write) -> Result<()> {
    let mut table = CommandTable::new();
    extension::init(&mut table)?;

    let result = if args.get(1).map(String::as_str) == Some("help") {
        let page = table
            .help_page(COMMAND_NAME)
            .ok_or_else(|| anyhow!("No help available for {COMMAND_NAME}"))?;
        out.write_all(page.as_bytes()).map_err(Error::from)
    } else {
        table.dispatch(COMMAND_NAME, args, out, errors)
    };

    extension::fini(&mut table);
    result
}
