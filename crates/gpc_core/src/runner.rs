//! External command execution.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{GpcError, GpcResult};

/// Runs external programs to completion.
pub trait CommandRunner {
    /// Run `program` with `args`, optionally inside `cwd`.
    ///
    /// A non-zero exit status is an error.
    fn run(&self, program: &str, args: &[String], cwd: Option<&Path>) -> GpcResult<()>;
}

/// Spawns real processes, passing their output through to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String], cwd: Option<&Path>) -> GpcResult<()> {
        debug!("Running {} {}", program, args.join(" "));

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let status = command.status().map_err(|source| GpcError::CommandSpawn {
            program: program.to_string(),
            source,
        })?;

        if !status.success() {
            return Err(GpcError::CommandFailed {
                program: program.to_string(),
                status,
            });
        }

        Ok(())
    }
}
