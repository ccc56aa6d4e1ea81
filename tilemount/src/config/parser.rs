//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::coord::is_valid_extension;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [mount] section
    if let Some(section) = ini.section(Some("mount")) {
        if let Some(v) = section.get("extension") {
            let v = v.trim().trim_start_matches('.');
            if !v.is_empty() {
                if !is_valid_extension(v) {
                    return Err(invalid("mount", "extension", v, "must be alphanumeric, like 'png' or 'pbf'"));
                }
                config.mount.extension = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("strict_extension") {
            config.mount.strict_extension =
                parse_bool(v).ok_or_else(|| invalid("mount", "strict_extension", v, "must be true or false"))?;
        }
        if let Some(v) = section.get("attr_ttl") {
            config.mount.attr_ttl = match v.trim().parse::<u64>() {
                Ok(ttl) if ttl > 0 => ttl,
                _ => {
                    return Err(invalid(
                        "mount",
                        "attr_ttl",
                        v,
                        "must be a positive integer (seconds)",
                    ))
                }
            };
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse a boolean config value.
pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
