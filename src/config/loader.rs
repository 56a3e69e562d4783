//! Top-level config loading pipeline.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ConfigError;

use super::env::apply_env_overrides;
use super::sources::{read_config_text_with_sources, ConfigSource};
use super::{config_root_dir, expand_home, Config};

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from `--config`).
pub fn load_config(path_override: Option<&Path>) -> Result<Config, ConfigError> {
    let (config, source) = load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
        dirs::home_dir,
    )?;
    info!(source = ?source, "configuration loaded");
    Ok(config)
}

pub(super) fn load_config_from_sources<FRead, FEnv, FRoot, FHome>(
    path_override: Option<&Path>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
    home_dir: FHome,
) -> Result<(Config, ConfigSource), ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
    FHome: Fn() -> Option<PathBuf>,
{
    let (text, source) = read_config_text_with_sources(path_override, &read_file, &config_root)?;
    let mut config: Config = toml::from_str(&text)?;
    apply_env_overrides(&mut config, &env_lookup)?;
    config.history.file = expand_home(&config.history.file, home_dir());
    if config.display.prompt.is_empty() {
        return Err(ConfigError::Invalid("display.prompt must not be empty".into()));
    }
    Ok((config, source))
}
