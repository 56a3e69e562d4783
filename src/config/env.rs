//! Environment-variable overrides.

use std::path::PathBuf;

use crate::error::ConfigError;

use super::Config;

pub(super) fn apply_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(path) = non_empty(env_lookup, "QUILL_HISTORY_FILE") {
        config.history.file = PathBuf::from(path);
    }
    if let Some(raw) = non_empty(env_lookup, "QUILL_MAX_HISTORY_LINES") {
        config.history.max_lines = raw.parse::<usize>().map_err(|_| {
            ConfigError::Invalid(format!(
                "invalid QUILL_MAX_HISTORY_LINES value `{raw}`: expected a non-negative integer"
            ))
        })?;
    }
    if let Some(prompt) = env_lookup("QUILL_PROMPT") {
        config.display.prompt = prompt;
    }
    if let Some(raw) = non_empty(env_lookup, "QUILL_DEBUG") {
        config.display.debug = parse_flag(&raw).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "invalid QUILL_DEBUG value `{raw}`: expected true/false, 1/0, yes/no or on/off"
            ))
        })?;
    }
    // https://no-color.org: any non-empty value disables color.
    if non_empty(env_lookup, "NO_COLOR").is_some() {
        config.display.color = false;
    }
    Ok(())
}

fn non_empty<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(name).filter(|value| !value.trim().is_empty())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
