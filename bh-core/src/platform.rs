//! Per-user directories and the host description sent in the user agent.

use std::path::PathBuf;

use crate::constants::APP_NAME;
use crate::error::{BhError, BhResult};

/// Directory holding `config.toml`, e.g. `~/.config/Bullhorn` on Linux.
pub fn config_dir() -> BhResult<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or_else(|| BhError::MissingConfig("user config directory".into()))
}

/// Default log directory, e.g. `~/.local/share/Bullhorn/logs` on Linux.
pub fn default_log_dir() -> BhResult<PathBuf> {
    dirs::data_dir()
        .map(|base| base.join(APP_NAME).join("logs"))
        .ok_or_else(|| BhError::MissingConfig("user data directory".into()))
}

/// `OS/arch` of the running binary, such as `Linux/x86_64` or `macOS/aarch64`.
pub fn host_description() -> String {
    let os = match std::env::consts::OS {
        "macos" => "macOS",
        "windows" => "Windows",
        "linux" => "Linux",
        other => other,
    };
    format!("{os}/{}", std::env::consts::ARCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_description() {
        let host = host_description();
        let (os, arch) = host.split_once('/').unwrap();
        assert!(!os.is_empty());
        assert_eq!(arch, std::env::consts::ARCH);
    }

    #[test]
    fn test_dirs_are_namespaced() {
        if let Ok(dir) = config_dir() {
            assert!(dir.ends_with(APP_NAME));
        }
        if let Ok(dir) = default_log_dir() {
            assert!(dir.ends_with(format!("{APP_NAME}/logs")));
        }
    }
}
