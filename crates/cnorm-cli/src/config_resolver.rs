//! Picks the `cnorm.toml` a run reads.
//!
//! Lookup stops at the first existing file:
//!
//! 1. the file named by `--config`, used as given
//! 2. `cnorm.toml`, then `.cnorm.toml`, next to the checked sources
//! 3. `config.toml` in `$CNORM_CONFIG_DIR`, or in `~/.cnorm/` without it
//!
//! With none of them present the built-in style settings apply.

use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order.
pub const PROJECT_CONFIG_NAMES: &[&str] = &["cnorm.toml", ".cnorm.toml"];

const USER_CONFIG_NAME: &str = "config.toml";

/// Environment variable overriding the per-user config directory.
pub const CONFIG_DIR_ENV: &str = "CNORM_CONFIG_DIR";

/// How the settings file of a run was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Named on the command line; a missing file is a load error.
    Flag(PathBuf),
    /// Sits beside the sources under check.
    Project(PathBuf),
    /// Shared by every project of the user.
    User(PathBuf),
    /// No file: built-in style settings.
    Builtin,
}

impl ConfigOrigin {
    #[must_use]
    pub fn file(&self) -> Option<&Path> {
        match self {
            Self::Flag(file) | Self::Project(file) | Self::User(file) => Some(file),
            Self::Builtin => None,
        }
    }

    #[must_use]
    pub fn is_per_user(&self) -> bool {
        matches!(self, Self::User(_))
    }
}

/// Chooses the settings file for checking `target`.
///
/// Sources of a file target are looked up beside that file; `-` and bare
/// file names use the working directory.
#[must_use]
pub fn resolve(target: &Path, flag: Option<&Path>) -> ConfigOrigin {
    choose(&sources_dir(target), flag, user_config_dir().as_deref())
}

fn sources_dir(target: &Path) -> PathBuf {
    if target.is_dir() {
        return target.to_path_buf();
    }
    target
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

fn choose(sources: &Path, flag: Option<&Path>, user_dir: Option<&Path>) -> ConfigOrigin {
    if let Some(file) = flag {
        return ConfigOrigin::Flag(file.to_path_buf());
    }

    let project = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| sources.join(name))
        .find(|file| file.is_file());
    if let Some(file) = project {
        tracing::debug!("Reading style settings from {}", file.display());
        return ConfigOrigin::Project(file);
    }

    match user_dir.map(|dir| dir.join(USER_CONFIG_NAME)) {
        Some(file) if file.is_file() => {
            tracing::debug!("No project settings, falling back to {}", file.display());
            ConfigOrigin::User(file)
        }
        _ => ConfigOrigin::Builtin,
    }
}

/// `$CNORM_CONFIG_DIR` when set, else `~/.cnorm/`.
#[must_use]
pub fn user_config_dir() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) => Some(PathBuf::from(dir)),
        None => home::home_dir().map(|home| home.join(".cnorm")),
    }
}
