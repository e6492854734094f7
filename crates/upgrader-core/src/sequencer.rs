//! The upgrade sequence triggered by each marker event.
//!
//! ```text
//! Idle ──marker──▶ Detected ──no -next──▶ NoOp ──▶ Idle
//!                     │
//!                     └──-next present──▶ Upgrading ──▶ Idle
//!                                           1. compose down
//!                                           2. active  → backup
//!                                           3. pending → active   (on failure: backup → active)
//!                                           4. compose up -d
//! ```
//!
//! Nothing is carried between markers: every call re-checks the chain
//! directory. Steps run strictly in order and the first failure ends the
//! attempt. Only step 3 has a compensating action.

use std::io;
use std::path::Path;
use std::thread;
use std::time::Duration;

use crate::error::UpgradeError;
use crate::paths::ChainLayout;
use crate::runner::{CommandRunner, ComposeCommand, SystemRunner};

/// Pause after a marker event so the writer can finish flushing it.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Existence checks and renames on the chain directory.
pub trait ConfigFiles {
    fn exists(&self, path: &Path) -> bool;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// `std::fs` on the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFiles;

impl ConfigFiles for LocalFiles {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeOutcome {
    /// No docker-compose.yml-next was present.
    Skipped,
    Upgraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    StopContainers,
    BackupActive,
    PromotePending,
    StartContainers,
}

impl Step {
    pub fn number(self) -> u8 {
        match self {
            Step::StopContainers => 1,
            Step::BackupActive => 2,
            Step::PromotePending => 3,
            Step::StartContainers => 4,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Step::StopContainers => "stopping containers with compose down",
            Step::BackupActive => {
                "backing up current docker-compose.yml to docker-compose.yml-backup"
            }
            Step::PromotePending => "promoting docker-compose.yml-next to docker-compose.yml",
            Step::StartContainers => "starting containers with compose up -d",
        }
    }
}

pub struct Sequencer<R = SystemRunner, F = LocalFiles> {
    layout: ChainLayout,
    compose: ComposeCommand,
    settle: Duration,
    runner: R,
    files: F,
}

impl Sequencer {
    /// A sequencer that spawns real processes and renames real files.
    pub fn new(layout: ChainLayout, compose: ComposeCommand) -> Self {
        Self::with_parts(layout, compose, SystemRunner, LocalFiles)
    }
}

impl<R: CommandRunner, F: ConfigFiles> Sequencer<R, F> {
    pub fn with_parts(layout: ChainLayout, compose: ComposeCommand, runner: R, files: F) -> Self {
        Self {
            layout,
            compose,
            settle: DEFAULT_SETTLE_DELAY,
            runner,
            files,
        }
    }

    pub fn settle_delay(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// React to one marker event: wait out the settle delay, then upgrade if a
    /// pending configuration is staged. The outcome is logged here; the
    /// result is returned for callers that need it.
    pub fn handle_marker(&self) -> Result<UpgradeOutcome, UpgradeError> {
        let result = self.attempt();
        match &result {
            Ok(UpgradeOutcome::Upgraded) => tracing::info!("upgrade completed successfully"),
            Ok(UpgradeOutcome::Skipped) => {}
            Err(e) if e.needs_manual_recovery() => {
                tracing::error!(
                    chain = %self.layout.dir().display(),
                    "upgrade failed: {e}"
                );
                tracing::error!(
                    "no docker-compose.yml is present in {}; restore it manually from {} before restarting services",
                    self.layout.dir().display(),
                    self.layout.backup().display()
                );
            }
            Err(e) => tracing::error!("upgrade failed: {e}"),
        }
        result
    }

    fn attempt(&self) -> Result<UpgradeOutcome, UpgradeError> {
        if !self.settle.is_zero() {
            thread::sleep(self.settle);
        }

        if !self.files.exists(&self.layout.pending()) {
            tracing::info!("no docker-compose.yml-next file found - upgrade skipped");
            return Ok(UpgradeOutcome::Skipped);
        }

        tracing::info!("found docker-compose.yml-next - proceeding with upgrade");
        self.perform_upgrade()?;
        Ok(UpgradeOutcome::Upgraded)
    }

    fn perform_upgrade(&self) -> Result<(), UpgradeError> {
        tracing::info!("starting docker compose upgrade sequence");
        let dir = self.layout.dir();
        let active = self.layout.active();
        let pending = self.layout.pending();
        let backup = self.layout.backup();

        log_step(Step::StopContainers);
        self.runner
            .run(self.compose.program(), &self.compose.down(), dir)
            .map_err(UpgradeError::ContainerStop)?;

        log_step(Step::BackupActive);
        self.files
            .rename(&active, &backup)
            .map_err(UpgradeError::BackupRename)?;

        log_step(Step::PromotePending);
        if let Err(promote) = self.files.rename(&pending, &active) {
            tracing::warn!("failed to promote next compose file, attempting to restore backup");
            return match self.files.rename(&backup, &active) {
                Ok(()) => Err(UpgradeError::PromoteRename { source: promote }),
                Err(restore) => Err(UpgradeError::Compensation { promote, restore }),
            };
        }

        log_step(Step::StartContainers);
        self.runner
            .run(self.compose.program(), &self.compose.up_detached(), dir)
            .map_err(UpgradeError::ContainerStart)?;

        Ok(())
    }
}

fn log_step(step: Step) {
    tracing::info!("Step {}: {}", step.number(), step.describe());
}
