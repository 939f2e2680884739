//! Checker trait and the raw findings checkers produce.

use crate::config::StyleVersion;
use crate::context::{CheckContext, SourceKind};
use crate::registry::RuleCode;

/// A raw, unfiltered observation made by a checker.
///
/// Findings become [`Diagnostic`](crate::Diagnostic)s only after the
/// [`Emitter`](crate::Emitter) applies suppression, version and strict gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finding {
    /// Rule that was violated.
    pub code: RuleCode,
    /// Line number (1-indexed), `None` for file-wide findings.
    pub line: Option<usize>,
    /// Restricts the finding to one style version.
    pub version: Option<StyleVersion>,
}

impl Finding {
    /// A finding at a line.
    #[must_use]
    pub fn at(code: RuleCode, line: usize) -> Self {
        Self {
            code,
            line: Some(line),
            version: None,
        }
    }

    /// A file-wide finding.
    #[must_use]
    pub fn file(code: RuleCode) -> Self {
        Self {
            code,
            line: None,
            version: None,
        }
    }

    /// Restricts the finding to `version`.
    #[must_use]
    pub fn only_for(mut self, version: StyleVersion) -> Self {
        self.version = Some(version);
        self
    }
}

/// A checker run over every source unit of a matching kind.
///
/// Checkers never fail: malformed input simply yields fewer (or more)
/// findings.
///
/// # Example
///
/// ```ignore
/// use cnorm_core::{CheckContext, Checker, Finding, RuleCode};
///
/// pub struct NoGoto;
///
/// impl Checker for NoGoto {
///     fn name(&self) -> &'static str { "no-goto" }
///
///     fn check(&self, ctx: &CheckContext) -> Vec<Finding> {
///         ctx.text()
///             .lines()
///             .enumerate()
///             .filter(|(_, l)| l.contains("goto "))
///             .map(|(i, _)| Finding::at(RuleCode::C3, i + 1))
///             .collect()
///     }
/// }
/// ```
pub trait Checker: Send + Sync {
    /// Returns the kebab-case name of this checker.
    fn name(&self) -> &'static str;

    /// Returns a brief description of what this checker looks for.
    fn description(&self) -> &'static str {
        ""
    }

    /// Rule codes this checker can report.
    fn codes(&self) -> &'static [RuleCode] {
        &[]
    }

    /// Whether this checker runs on units of `kind`.
    ///
    /// By default checkers run on C sources and headers only.
    fn applies_to(&self, kind: SourceKind) -> bool {
        kind != SourceKind::BuildFile
    }

    /// Checks a single unit, returning findings in discovery order.
    fn check(&self, ctx: &CheckContext) -> Vec<Finding>;
}

/// Type alias for boxed Checker trait objects.
pub type CheckerBox = Box<dyn Checker>;
