//! `upgrader-core` — watch a chain's data directory for `upgrade-info.json`
//! and swap in the staged `docker-compose.yml-next`.
//!
//! ```text
//! validate_directories   ← once, before any watch exists
//!     │
//!     ▼
//! MarkerWatcher          ← notify subscription on the data dir
//!     │                     consume_events() runs on the caller's thread
//!     ▼
//! Sequencer              ← down, backup, promote, up
//!     │
//!     ▼
//! CommandRunner          ← compose CLI in the chain dir
//! ```

pub mod error;
pub mod paths;
pub mod runner;
pub mod sequencer;
pub mod validate;
pub mod watcher;

use std::path::PathBuf;
use std::time::Duration;

pub use error::{CommandError, DirRole, Result, UpgradeError, UpgraderError};
pub use paths::ChainLayout;
pub use runner::{CommandRunner, ComposeCommand, SystemRunner};
pub use sequencer::{ConfigFiles, LocalFiles, Sequencer, UpgradeOutcome, DEFAULT_SETTLE_DELAY};
pub use validate::validate_directories;
pub use watcher::{consume_events, marker_trigger, MarkerWatcher};

/// Everything a watch session needs, fixed for the life of the process.
#[derive(Debug, Clone)]
pub struct UpgraderConfig {
    pub chain_dir: PathBuf,
    pub data_dir: PathBuf,
    pub compose: ComposeCommand,
    pub settle_delay: Duration,
}

impl UpgraderConfig {
    pub fn new(chain_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            chain_dir: chain_dir.into(),
            data_dir: data_dir.into(),
            compose: ComposeCommand::default(),
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    pub fn layout(&self) -> ChainLayout {
        ChainLayout::new(&self.chain_dir)
    }

    pub fn sequencer(&self) -> Sequencer {
        Sequencer::new(self.layout(), self.compose.clone()).settle_delay(self.settle_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_to_docker_compose() {
        let config = UpgraderConfig::new("/chain", "/data");
        assert_eq!(config.compose, ComposeCommand::default());
        assert_eq!(config.settle_delay, Duration::from_millis(100));
        assert_eq!(
            config.layout().active(),
            PathBuf::from("/chain/docker-compose.yml")
        );
    }
}
