//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

use crate::config_resolver::PROJECT_CONFIG_NAMES;

const DEFAULT_CONFIG: &str = r#"# cnorm configuration
# Command-line flags take precedence over these values.

# Coding style version: "2020" or "2021"
style = "2021"

# Report strict-only rules (H3 constant macros under 2020)
strict = false

# Colored terminal output (also disabled by NO_COLOR)
color = true

# Read .gitignore files to skip build artifacts
gitignore = true

# Rule codes never reported, e.g. ["F6", "C1"]
suppress = []

[syscalls]
# When set, any other catalogued library call is reported
# allowed = ["malloc", "free", "write"]

# Library calls that are always reported
# disallowed = ["printf"]
"#;

/// Runs the init command in the current directory.
///
/// # Errors
///
/// Returns an error if a config already exists and `force` is not set, or
/// the file cannot be written.
pub fn run(force: bool) -> Result<()> {
    let path = write_default(Path::new("."), force)?;

    println!("Created {}", path.display());
    println!("\nNext steps:");
    println!("  1. Edit {} to pick a style and suppress rules", path.display());
    println!("  2. Run: cnorm");

    Ok(())
}

fn write_default(dir: &Path, force: bool) -> Result<std::path::PathBuf> {
    let config_path = dir.join(PROJECT_CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)?;
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnorm_core::{Config, StyleVersion};
    use tempfile::TempDir;

    #[test]
    fn default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.style, Some(StyleVersion::Cs2021));
        assert_eq!(config.strict, Some(false));
        assert!(config.suppress.is_empty());
        assert!(config.syscalls.allowed.is_empty());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = write_default(tmp.path(), false).unwrap();
        assert_eq!(path, tmp.path().join("cnorm.toml"));

        std::fs::write(&path, "strict = true\n").unwrap();
        assert!(write_default(tmp.path(), false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "strict = true\n");

        write_default(tmp.path(), true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
