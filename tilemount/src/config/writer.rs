//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let extension = config.mount.extension.as_deref().unwrap_or("");
    let strict_extension = if config.mount.strict_extension {
        "true"
    } else {
        "false"
    };

    format!(
        r#"[mount]
; Extension of tile files in the mounted tree (e.g. png, jpg, pbf)
; If empty, derived from the store's metadata format, else png
extension = {}
; Refuse tile names whose extension differs from the one above (default: false)
strict_extension = {}
; Seconds the kernel may cache attributes and directory entries (default: 1)
attr_ttl = {}

[logging]
; Log file, truncated each time a mount starts
file = {}
"#,
        extension,
        strict_extension,
        config.mount.attr_ttl,
        path_to_string(&config.logging.file),
    )
}

/// Render a path for the config file, shortening the home directory to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            return format!("~/{}", rest.display());
        }
    }
    path.display().to_string()
}
