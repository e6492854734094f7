use anyhow::Context;
use upgrader_core::{paths, validate_directories, ComposeCommand, MarkerWatcher, UpgraderConfig};

use crate::build_info::BuildInfo;

/// `cosmos-docker-upgrader <CHAIN_DIR> <DATA_DIR>` — validate, then watch.
///
/// Returns once the notification channel closes. Errors are limited to
/// startup: a failed upgrade is logged by the sequencer and the watch
/// carries on.
pub fn run(config: &UpgraderConfig, build: &BuildInfo) -> anyhow::Result<()> {
    tracing::info!(
        commit = build.git_commit,
        built = build.build_time,
        "starting cosmos docker upgrader {}",
        build.version
    );
    tracing::info!("chain folder: {}", config.chain_dir.display());
    tracing::info!("data folder: {}", config.data_dir.display());

    validate_directories(&config.chain_dir, &config.data_dir).context("validation failed")?;
    warn_if_compose_missing(&config.compose);

    let sequencer = config.sequencer();
    let watcher = MarkerWatcher::new(&config.data_dir).with_context(|| {
        format!(
            "failed to watch data folder {}",
            config.data_dir.display()
        )
    })?;

    let handled = watcher.run(|event| {
        tracing::debug!(path = ?event.paths, "marker event");
        // outcome is logged by the sequencer; the watch continues either way
        let _ = sequencer.handle_marker();
    });

    tracing::info!(
        markers = handled,
        "stopped watching for {}",
        paths::UPGRADE_MARKER
    );
    Ok(())
}

/// The compose CLI is only needed once an upgrade runs, so a missing binary is
/// a warning rather than a startup failure.
fn warn_if_compose_missing(compose: &ComposeCommand) {
    if which::which(compose.program()).is_err() {
        tracing::warn!(
            "'{}' not found on PATH; upgrades will fail until it is installed",
            compose.program()
        );
    }
}
