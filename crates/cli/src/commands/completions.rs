//! # CLI Completions Command
//!
//! Shell completions generation for the Roster CLI.

use std::io::Write;

use clap::Command;
use clap_complete::Shell;
use error::Result;

/// Write completions for `shell` to `out`.
pub fn write_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) -> Result<()> {
    clap_complete::generate(shell, cmd, "roster", out);
    out.flush()?;
    Ok(())
}

/// Generates shell completions for the CLI on stdout
pub fn completions(shell: Shell, cmd: &mut Command) -> Result<()> {
    write_completions(shell, cmd, &mut std::io::stdout())
}
