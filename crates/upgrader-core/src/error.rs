use std::fmt;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Which of the two command-line directories a startup check refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirRole {
    Chain,
    Data,
}

impl fmt::Display for DirRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirRole::Chain => f.write_str("chain folder"),
            DirRole::Data => f.write_str("data folder"),
        }
    }
}

/// Startup and watch failures. Any of these ends the process.
#[derive(Debug, Error)]
pub enum UpgraderError {
    #[error("{role} does not exist: {}", .path.display())]
    MissingDirectory { role: DirRole, path: PathBuf },

    #[error("docker-compose.yml not found in chain folder: {}", .0.display())]
    MissingConfiguration(PathBuf),

    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),
}

/// An external command could not be launched or exited unsuccessfully.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status}")]
    ExitStatus { program: String, status: ExitStatus },
}

/// A failed upgrade attempt. The watch loop logs these and keeps going.
#[derive(Debug, Error)]
pub enum UpgradeError {
    #[error("failed to stop containers: {0}")]
    ContainerStop(#[source] CommandError),

    #[error("failed to back up docker-compose.yml: {0}")]
    BackupRename(#[source] std::io::Error),

    #[error("failed to promote docker-compose.yml-next (previous docker-compose.yml restored): {source}")]
    PromoteRename {
        #[source]
        source: std::io::Error,
    },

    #[error(
        "failed to promote next compose file AND failed to restore backup: {promote}, restore error: {restore}"
    )]
    Compensation {
        promote: std::io::Error,
        restore: std::io::Error,
    },

    #[error("failed to start containers: {0}")]
    ContainerStart(#[source] CommandError),
}

impl UpgradeError {
    /// True when the chain directory was left without a docker-compose.yml.
    pub fn needs_manual_recovery(&self) -> bool {
        matches!(self, UpgradeError::Compensation { .. })
    }
}

pub type Result<T> = std::result::Result<T, UpgraderError>;
