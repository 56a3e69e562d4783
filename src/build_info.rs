//! Compile-time build metadata for `--version` and the startup banner.

/// Semver package version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// VCS commit hash captured by `build.rs`.
pub const GIT_COMMIT: &str = env!("QUILL_BUILD_GIT_HASH");

/// Build timestamp captured by `build.rs`.
pub const BUILD_TIMESTAMP: &str = env!("QUILL_BUILD_TIMESTAMP");

/// One-line metadata shown under the welcome banner.
pub fn startup_metadata_line() -> String {
    format!("v{VERSION} ({GIT_COMMIT}, built {BUILD_TIMESTAMP})")
}

/// Block printed by `quill --version`.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("QUILL_BUILD_GIT_HASH"),
    "\nbuilt: ",
    env!("QUILL_BUILD_TIMESTAMP")
);
