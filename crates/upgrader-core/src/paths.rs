use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Filename constants
// ---------------------------------------------------------------------------

/// Written into the data directory by the node when it halts for an upgrade.
pub const UPGRADE_MARKER: &str = "upgrade-info.json";

pub const ACTIVE_COMPOSE: &str = "docker-compose.yml";
pub const PENDING_COMPOSE: &str = "docker-compose.yml-next";
pub const BACKUP_COMPOSE: &str = "docker-compose.yml-backup";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn marker_path(data_dir: &Path) -> PathBuf {
    data_dir.join(UPGRADE_MARKER)
}

/// Returns true when `path` names the upgrade marker, regardless of directory.
pub fn is_marker(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == UPGRADE_MARKER)
}

/// The active / pending / backup compose files of one chain directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLayout {
    dir: PathBuf,
}

impl ChainLayout {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn active(&self) -> PathBuf {
        self.dir.join(ACTIVE_COMPOSE)
    }

    pub fn pending(&self) -> PathBuf {
        self.dir.join(PENDING_COMPOSE)
    }

    pub fn backup(&self) -> PathBuf {
        self.dir.join(BACKUP_COMPOSE)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
