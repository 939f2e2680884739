//! Core types for style diagnostics and results.

use miette::{Diagnostic as MietteDiagnostic, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};

use crate::utils::lines::LineIndex;

/// Severity level attached to a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational finding.
    Info,
    /// Minor convention breach.
    Minor,
    /// Major convention breach.
    Major,
}

impl Severity {
    /// Terminal color associated with this severity.
    #[must_use]
    pub fn color(self) -> SeverityColor {
        match self {
            Self::Major => SeverityColor::BrightRed,
            Self::Minor => SeverityColor::BrightGreen,
            Self::Info => SeverityColor::BrightBlue,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Major => write!(f, "major"),
            Self::Minor => write!(f, "minor"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// Color metadata carried by a diagnostic when coloring is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeverityColor {
    /// Used for major findings.
    BrightRed,
    /// Used for minor findings.
    BrightGreen,
    /// Used for informational findings.
    BrightBlue,
}

/// A single convention violation found in a source unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// File path, or `stdin` for piped input.
    pub unit_identifier: String,
    /// Line number (1-indexed), absent for file-wide findings.
    pub line: Option<usize>,
    /// Version-free rule code (e.g. "F4").
    pub rule_code: String,
    /// Description resolved for the active style version.
    pub description: String,
    /// Severity of the rule.
    pub severity: Severity,
    /// Present only when the configuration asks for colored output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<SeverityColor>,
}

impl Diagnostic {
    /// Line number as printed: the number, or `?` for file-wide findings.
    #[must_use]
    pub fn line_label(&self) -> String {
        self.line.map_or_else(|| "?".to_string(), |l| l.to_string())
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}::{} - {} ({})",
            self.unit_identifier,
            self.line_label(),
            self.rule_code,
            self.description,
            self.severity
        )
    }
}

/// Rich rendering of a [`Diagnostic`] against its source text.
#[derive(Debug, thiserror::Error, MietteDiagnostic)]
#[error("[{code}] {description}")]
pub struct DiagnosticReport {
    code: String,
    description: String,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("{severity}")]
    span: Option<SourceSpan>,
    severity: Severity,
    #[help]
    help: Option<String>,
}

impl DiagnosticReport {
    /// Builds a report, labelling the diagnostic's line inside `source`.
    #[must_use]
    pub fn new(diagnostic: &Diagnostic, source: &str) -> Self {
        let span = diagnostic
            .line
            .and_then(|line| LineIndex::new(source).line_span(line))
            .map(|(offset, length)| SourceSpan::from((offset, length)));
        let help = diagnostic
            .line
            .is_none()
            .then(|| format!("applies to the whole of {}", diagnostic.unit_identifier));
        Self {
            code: diagnostic.rule_code.clone(),
            description: diagnostic.description.clone(),
            source_code: NamedSource::new(&diagnostic.unit_identifier, source.to_string()),
            span,
            severity: diagnostic.severity,
            help,
        }
    }
}

/// Result of checking one or more source units.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All diagnostics, in discovery order.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of files checked.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts diagnostics as `(major, minor, info)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |s: Severity| self.diagnostics.iter().filter(|d| d.severity == s).count();
        (
            count(Severity::Major),
            count(Severity::Minor),
            count(Severity::Info),
        )
    }

    /// Returns the rule codes in discovery order.
    #[must_use]
    pub fn codes(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .map(|d| d.rule_code.as_str())
            .collect()
    }

    /// Adds diagnostics from another result.
    pub fn extend(&mut self, other: Self) {
        self.diagnostics.extend(other.diagnostics);
        self.files_checked += other.files_checked;
    }
}
