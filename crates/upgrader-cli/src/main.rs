mod build_info;
mod run;

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use upgrader_core::{ComposeCommand, UpgraderConfig};

const LONG_ABOUT: &str = "\
Cosmos Docker Upgrader watches for upgrade-info.json files in a data directory
and automatically manages Docker Compose upgrades for Cosmos chains.

When upgrade-info.json appears:
- If docker-compose.yml-next exists: performs upgrade (down, backup, swap, up)
- If docker-compose.yml-next is missing: logs the event only";

#[derive(Parser)]
#[command(
    name = "cosmos-docker-upgrader",
    about = "Watches for upgrade-info.json and manages Docker Compose upgrades",
    long_about = LONG_ABOUT,
    version = build_info::LONG_VERSION
)]
struct Cli {
    /// Directory containing docker-compose.yml and docker-compose.yml-next
    #[arg(value_name = "CHAIN_DIR")]
    chain_dir: PathBuf,

    /// Directory to watch for upgrade-info.json
    #[arg(value_name = "DATA_DIR")]
    data_dir: PathBuf,

    /// Compose CLI to invoke (use "docker compose" for the v2 plugin)
    #[arg(long, value_name = "CMD", default_value = "docker-compose", value_parser = parse_compose)]
    compose_cmd: ComposeCommand,

    /// Milliseconds to wait after the marker appears before checking for -next
    #[arg(long, value_name = "MS", default_value_t = 100)]
    settle_ms: u64,
}

impl Cli {
    fn into_config(self) -> UpgraderConfig {
        UpgraderConfig {
            compose: self.compose_cmd,
            settle_delay: Duration::from_millis(self.settle_ms),
            ..UpgraderConfig::new(self.chain_dir, self.data_dir)
        }
    }
}

fn parse_compose(s: &str) -> Result<ComposeCommand, String> {
    ComposeCommand::parse(s).ok_or_else(|| "compose command must not be empty".to_string())
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .init();

    let config = cli.into_config();

    if let Err(e) = run::run(&config, &build_info::BUILD) {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_reproduce_docker_compose_with_short_settle() {
        let cli = Cli::try_parse_from(["cosmos-docker-upgrader", "/chain", "/data"]).unwrap();
        let config = cli.into_config();
        assert_eq!(config.chain_dir, PathBuf::from("/chain"));
        assert_eq!(config.data_dir, PathBuf::from("/data"));
        assert_eq!(config.compose, ComposeCommand::default());
        assert_eq!(config.settle_delay, Duration::from_millis(100));
    }

    #[test]
    fn compose_plugin_and_settle_override() {
        let cli = Cli::try_parse_from([
            "cosmos-docker-upgrader",
            "/chain",
            "/data",
            "--compose-cmd",
            "docker compose",
            "--settle-ms",
            "500",
        ])
        .unwrap();
        let config = cli.into_config();
        assert_eq!(config.compose.program(), "docker");
        assert_eq!(config.compose.down(), vec!["compose", "down"]);
        assert_eq!(config.settle_delay, Duration::from_millis(500));
    }

    #[test]
    fn requires_both_directories() {
        assert!(Cli::try_parse_from(["cosmos-docker-upgrader", "/chain"]).is_err());
        assert!(Cli::try_parse_from(["cosmos-docker-upgrader", "/a", "/b", "/c"]).is_err());
    }

    #[test]
    fn blank_compose_rejected() {
        assert!(
            Cli::try_parse_from(["cosmos-docker-upgrader", "/a", "/b", "--compose-cmd", " "])
                .is_err()
        );
    }
}
