use std::path::Path;

use crate::error::{DirRole, Result, UpgraderError};
use crate::paths::ChainLayout;

/// Check that both directories exist and the chain directory holds an active
/// docker-compose.yml. Must pass before any watch is registered.
pub fn validate_directories(chain_dir: &Path, data_dir: &Path) -> Result<()> {
    require_dir(DirRole::Chain, chain_dir)?;
    require_dir(DirRole::Data, data_dir)?;

    let active = ChainLayout::new(chain_dir).active();
    if !active.exists() {
        return Err(UpgraderError::MissingConfiguration(active));
    }

    tracing::info!("validation passed - both directories exist and docker-compose.yml found");
    Ok(())
}

fn require_dir(role: DirRole, path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(UpgraderError::MissingDirectory {
            role,
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::ACTIVE_COMPOSE;
    use tempfile::TempDir;

    fn chain_with_compose() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(ACTIVE_COMPOSE), "services: {}\n").unwrap();
        dir
    }

    #[test]
    fn passes_with_valid_layout() {
        let chain = chain_with_compose();
        let data = TempDir::new().unwrap();
        validate_directories(chain.path(), data.path()).unwrap();
    }

    #[test]
    fn missing_chain_dir() {
        let root = TempDir::new().unwrap();
        let data = TempDir::new().unwrap();
        let chain = root.path().join("absent");

        let err = validate_directories(&chain, data.path()).unwrap_err();
        assert!(matches!(
            err,
            UpgraderError::MissingDirectory { role: DirRole::Chain, ref path } if *path == chain
        ));
    }

    #[test]
    fn missing_data_dir() {
        let chain = chain_with_compose();
        let root = TempDir::new().unwrap();
        let data = root.path().join("absent");

        let err = validate_directories(chain.path(), &data).unwrap_err();
        assert!(matches!(
            err,
            UpgraderError::MissingDirectory {
                role: DirRole::Data,
                ..
            }
        ));
    }

    #[test]
    fn chain_checked_before_data() {
        let root = TempDir::new().unwrap();
        let err = validate_directories(&root.path().join("a"), &root.path().join("b")).unwrap_err();
        assert!(matches!(
            err,
            UpgraderError::MissingDirectory {
                role: DirRole::Chain,
                ..
            }
        ));
    }

    #[test]
    fn missing_active_compose() {
        let chain = TempDir::new().unwrap();
        let data = TempDir::new().unwrap();
        std::fs::write(chain.path().join("docker-compose.yml-next"), "x").unwrap();

        let err = validate_directories(chain.path(), data.path()).unwrap_err();
        match err {
            UpgraderError::MissingConfiguration(path) => {
                assert_eq!(path, chain.path().join(ACTIVE_COMPOSE));
            }
            other => panic!("expected MissingConfiguration, got {other:?}"),
        }
    }
}
