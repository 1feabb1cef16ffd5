use crate::error::{LocError, Result};
use std::process::Command;
use tracing::debug;

/// Captured result of one external process invocation.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external programs (`gh`, `git`).
///
/// Every subprocess goes through this seam so the listing and counting
/// pipelines can be driven by scripted output in tests.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;

    /// Runs the command and returns its stdout, turning a non-zero exit into
    /// [`LocError::CommandFailed`].
    fn run_checked(&self, program: &str, args: &[&str]) -> Result<String> {
        let output = self.run(program, args)?;
        if !output.success() {
            return Err(LocError::CommandFailed {
                command: render_command(program, args),
                status: output
                    .code
                    .map_or_else(|| "signal".to_string(), |c| format!("status {c}")),
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

/// Blocking runner backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveRunner;

impl CommandRunner for LiveRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        debug!(command = %render_command(program, args), "running");
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| LocError::Spawn {
                program: program.to_string(),
                source,
            })?;
        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

pub fn render_command(program: &str, args: &[&str]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}
