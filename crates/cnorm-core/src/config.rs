//! Configuration types for cnorm.
//!
//! [`Config`] is the optional `cnorm.toml` file. [`Configuration`] is the
//! immutable value every checker receives; it is assembled once through
//! [`ConfigurationBuilder`] and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::str::FromStr;

/// One of the two coexisting convention rule-sets.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum StyleVersion {
    /// The 2020 coding style.
    #[serde(rename = "2020")]
    Cs2020,
    /// The 2021 coding style (default).
    #[default]
    #[serde(rename = "2021")]
    Cs2021,
}

impl StyleVersion {
    /// All supported versions, oldest first.
    pub const ALL: [Self; 2] = [Self::Cs2020, Self::Cs2021];

    /// The year this version is named after.
    #[must_use]
    pub fn year(self) -> &'static str {
        match self {
            Self::Cs2020 => "2020",
            Self::Cs2021 => "2021",
        }
    }
}

impl std::fmt::Display for StyleVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.year())
    }
}

impl FromStr for StyleVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let year = s.strip_prefix("cs-").unwrap_or(s);
        Self::ALL
            .into_iter()
            .find(|v| v.year() == year)
            .ok_or_else(|| ConfigError::UnknownStyle(s.to_string()))
    }
}

/// Immutable settings shared by every checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    style_version: StyleVersion,
    strict: bool,
    suppressed_codes: BTreeSet<String>,
    allowed_syscalls: BTreeSet<String>,
    disallowed_syscalls: BTreeSet<String>,
    use_color: bool,
    honor_gitignore: bool,
    stdin_is_header: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        ConfigurationBuilder::new().build()
    }
}

impl Configuration {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    /// Active style version.
    #[must_use]
    pub fn style_version(&self) -> StyleVersion {
        self.style_version
    }

    /// Whether strict-only rules are reported.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Whether `code` (version-free) is suppressed.
    #[must_use]
    pub fn is_suppressed(&self, code: &str) -> bool {
        self.suppressed_codes.contains(code)
    }

    /// Suppressed rule codes.
    #[must_use]
    pub fn suppressed_codes(&self) -> &BTreeSet<String> {
        &self.suppressed_codes
    }

    /// Allow-list of library calls; empty means "not configured".
    #[must_use]
    pub fn allowed_syscalls(&self) -> &BTreeSet<String> {
        &self.allowed_syscalls
    }

    /// Deny-list of library calls; empty means "not configured".
    #[must_use]
    pub fn disallowed_syscalls(&self) -> &BTreeSet<String> {
        &self.disallowed_syscalls
    }

    /// Whether diagnostics carry color metadata.
    #[must_use]
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Whether `.gitignore` files are read during traversal.
    #[must_use]
    pub fn honor_gitignore(&self) -> bool {
        self.honor_gitignore
    }

    /// Whether piped input is treated as a header unit.
    #[must_use]
    pub fn stdin_is_header(&self) -> bool {
        self.stdin_is_header
    }
}

/// Builder for [`Configuration`].
#[derive(Debug, Clone)]
pub struct ConfigurationBuilder {
    inner: Configuration,
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationBuilder {
    /// Starts from the defaults: style 2021, lenient, colored, gitignore on.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Configuration {
                style_version: StyleVersion::default(),
                strict: false,
                suppressed_codes: BTreeSet::new(),
                allowed_syscalls: BTreeSet::new(),
                disallowed_syscalls: BTreeSet::new(),
                use_color: true,
                honor_gitignore: true,
                stdin_is_header: false,
            },
        }
    }

    /// Starts from the values of a configuration file.
    #[must_use]
    pub fn from_file(config: &Config) -> Self {
        let mut builder = Self::new()
            .suppress_all(config.suppress.iter().cloned())
            .allow_syscalls(config.syscalls.allowed.iter().cloned())
            .disallow_syscalls(config.syscalls.disallowed.iter().cloned());
        if let Some(style) = config.style {
            builder = builder.style_version(style);
        }
        if let Some(strict) = config.strict {
            builder = builder.strict(strict);
        }
        if let Some(color) = config.color {
            builder = builder.use_color(color);
        }
        if let Some(gitignore) = config.gitignore {
            builder = builder.honor_gitignore(gitignore);
        }
        builder
    }

    /// Sets the active style version.
    #[must_use]
    pub fn style_version(mut self, version: StyleVersion) -> Self {
        self.inner.style_version = version;
        self
    }

    /// Enables or disables strict-only rules.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.inner.strict = strict;
        self
    }

    /// Suppresses one rule code.
    #[must_use]
    pub fn suppress(mut self, code: impl Into<String>) -> Self {
        self.inner.suppressed_codes.insert(code.into());
        self
    }

    /// Suppresses several rule codes.
    #[must_use]
    pub fn suppress_all<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner
            .suppressed_codes
            .extend(codes.into_iter().map(Into::into));
        self
    }

    /// Replaces the allow-list when `names` is non-empty.
    #[must_use]
    pub fn allow_syscalls<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = collect_names(names);
        if !names.is_empty() {
            self.inner.allowed_syscalls = names;
        }
        self
    }

    /// Replaces the deny-list when `names` is non-empty.
    #[must_use]
    pub fn disallow_syscalls<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = collect_names(names);
        if !names.is_empty() {
            self.inner.disallowed_syscalls = names;
        }
        self
    }

    /// Enables or disables color metadata.
    #[must_use]
    pub fn use_color(mut self, enabled: bool) -> Self {
        self.inner.use_color = enabled;
        self
    }

    /// Enables or disables `.gitignore` handling.
    #[must_use]
    pub fn honor_gitignore(mut self, enabled: bool) -> Self {
        self.inner.honor_gitignore = enabled;
        self
    }

    /// Treats piped input as a header unit.
    #[must_use]
    pub fn stdin_is_header(mut self, enabled: bool) -> Self {
        self.inner.stdin_is_header = enabled;
        self
    }

    /// Finalizes the configuration.
    #[must_use]
    pub fn build(self) -> Configuration {
        self.inner
    }
}

fn collect_names<I, S>(names: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names
        .into_iter()
        .map(Into::into)
        .map(|n: String| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

/// Contents of a `cnorm.toml` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Style version (`"2020"` or `"2021"`).
    #[serde(default)]
    pub style: Option<StyleVersion>,

    /// Report strict-only rules.
    #[serde(default)]
    pub strict: Option<bool>,

    /// Colored terminal output.
    #[serde(default)]
    pub color: Option<bool>,

    /// Read `.gitignore` files during traversal.
    #[serde(default)]
    pub gitignore: Option<bool>,

    /// Rule codes to suppress.
    #[serde(default)]
    pub suppress: Vec<String>,

    /// Library call lists.
    #[serde(default)]
    pub syscalls: SyscallConfig,
}

impl Config {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }
}

/// `[syscalls]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyscallConfig {
    /// Calls that are allowed; any other catalogued call is reported.
    #[serde(default)]
    pub allowed: Vec<String>,

    /// Calls that are always reported.
    #[serde(default)]
    pub disallowed: Vec<String>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Style version that is not supported.
    #[error("Unknown coding style {0:?} (supported: 2020, 2021)")]
    UnknownStyle(String),
}
