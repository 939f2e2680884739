//! Source units and the context handed to checkers.

use crate::config::Configuration;
use crate::utils::files::is_build_file_name;
use crate::utils::LineIndex;
use std::path::Path;

/// Identifier used for piped input.
pub const STDIN_IDENTIFIER: &str = "stdin";

/// What kind of file a unit is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// A `.c` file (or piped input by default).
    Source,
    /// A `.h` file, or piped input with the header override.
    Header,
    /// A build-description file (`Makefile`).
    BuildFile,
}

/// One fully loaded input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    identifier: String,
    text: String,
    kind: SourceKind,
}

impl SourceUnit {
    /// Creates a unit with an explicit kind.
    #[must_use]
    pub fn new(identifier: impl Into<String>, text: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            identifier: identifier.into(),
            text: text.into(),
            kind,
        }
    }

    /// Creates a unit from a path, deriving its kind from the file name.
    #[must_use]
    pub fn from_path(path: &Path, text: impl Into<String>) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        let kind = if is_build_file_name(&name) {
            SourceKind::BuildFile
        } else if name.ends_with(".h") {
            SourceKind::Header
        } else {
            SourceKind::Source
        };
        Self::new(path.display().to_string(), text, kind)
    }

    /// Creates the unit for piped input.
    #[must_use]
    pub fn stdin(text: impl Into<String>, is_header: bool) -> Self {
        let kind = if is_header {
            SourceKind::Header
        } else {
            SourceKind::Source
        };
        Self::new(STDIN_IDENTIFIER, text, kind)
    }

    /// File path or `stdin`.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Complete, unmodified content.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Kind of the unit.
    #[must_use]
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Whether header-only constructs are allowed in this unit.
    #[must_use]
    pub fn is_header(&self) -> bool {
        self.kind == SourceKind::Header
    }
}

/// Context provided to checkers.
#[derive(Debug, Clone)]
pub struct CheckContext<'a> {
    /// The unit being checked.
    pub unit: &'a SourceUnit,
    /// Active configuration.
    pub config: &'a Configuration,
    /// Line index over the unit's text.
    pub lines: LineIndex<'a>,
}

impl<'a> CheckContext<'a> {
    /// Creates a context for `unit`.
    #[must_use]
    pub fn new(unit: &'a SourceUnit, config: &'a Configuration) -> Self {
        Self {
            unit,
            config,
            lines: LineIndex::new(unit.text()),
        }
    }

    /// Shorthand for the unit's text.
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.unit.text()
    }

    /// Returns the 1-indexed line containing byte `offset`.
    #[must_use]
    pub fn line_of(&self, offset: usize) -> usize {
        self.lines.line_of(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_path() {
        assert_eq!(
            SourceUnit::from_path(Path::new("src/main.c"), "").kind(),
            SourceKind::Source
        );
        assert_eq!(
            SourceUnit::from_path(Path::new("include/my.h"), "").kind(),
            SourceKind::Header
        );
        assert_eq!(
            SourceUnit::from_path(Path::new("MAKEFILE"), "").kind(),
            SourceKind::BuildFile
        );
    }

    #[test]
    fn stdin_unit_honors_override() {
        let unit = SourceUnit::stdin("int x;\n", true);
        assert_eq!(unit.identifier(), STDIN_IDENTIFIER);
        assert!(unit.is_header());
        assert!(!SourceUnit::stdin("", false).is_header());
    }

    #[test]
    fn context_resolves_lines() {
        let unit = SourceUnit::stdin("a\nb\n", false);
        let config = Configuration::default();
        let ctx = CheckContext::new(&unit, &config);
        assert_eq!(ctx.line_of(0), 1);
        assert_eq!(ctx.line_of(2), 2);
    }
}
