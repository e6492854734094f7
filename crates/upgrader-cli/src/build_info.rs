/// Version metadata stamped in at compile time by `build.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_time: &'static str,
    pub git_commit: &'static str,
}

pub const BUILD: BuildInfo = BuildInfo {
    version: env!("CARGO_PKG_VERSION"),
    build_time: env!("UPGRADER_BUILD_TIME"),
    git_commit: env!("UPGRADER_GIT_COMMIT"),
};

/// `--version` text: `<version> (built: <time>, commit: <rev>)`.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built: ",
    env!("UPGRADER_BUILD_TIME"),
    ", commit: ",
    env!("UPGRADER_GIT_COMMIT"),
    ")"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_version_is_assembled_from_build_info() {
        assert_eq!(
            LONG_VERSION,
            format!(
                "{} (built: {}, commit: {})",
                BUILD.version, BUILD.build_time, BUILD.git_commit
            )
        );
        assert!(!BUILD.git_commit.is_empty());
    }
}
