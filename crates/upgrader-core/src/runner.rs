//! External command invocation for the compose CLI.
//!
//! Commands run in the chain directory so the compose CLI picks up
//! `docker-compose.yml` by convention. Output is not captured: stdout and
//! stderr are inherited so compose progress appears in the upgrader's own
//! log stream. There is no timeout; a hung command blocks the caller.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::CommandError;

/// Runs an external program to completion.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<(), CommandError>;
}

/// Spawns real processes with inherited stdout/stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<(), CommandError> {
        tracing::info!(
            "running command in {}: {} {}",
            cwd.display(),
            program,
            args.join(" ")
        );

        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| CommandError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if !status.success() {
            return Err(CommandError::ExitStatus {
                program: program.to_string(),
                status,
            });
        }
        Ok(())
    }
}

/// The container-orchestration CLI, e.g. `docker-compose` or `docker compose`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeCommand {
    program: String,
    leading_args: Vec<String>,
}

impl Default for ComposeCommand {
    fn default() -> Self {
        Self::new("docker-compose", Vec::new())
    }
}

impl ComposeCommand {
    pub fn new(program: impl Into<String>, leading_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            leading_args,
        }
    }

    /// Split a command line on whitespace. Returns `None` for a blank string.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self::new(program, words.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments that stop every service of the active configuration.
    pub fn down(&self) -> Vec<String> {
        self.with(&["down"])
    }

    /// Arguments that start every service in detached mode.
    pub fn up_detached(&self) -> Vec<String> {
        self.with(&["up", "-d"])
    }

    fn with(&self, tail: &[&str]) -> Vec<String> {
        self.leading_args
            .iter()
            .cloned()
            .chain(tail.iter().map(|s| s.to_string()))
            .collect()
    }
}
