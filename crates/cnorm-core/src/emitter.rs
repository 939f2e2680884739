//! Turns raw findings into diagnostics under the active configuration.

use crate::config::Configuration;
use crate::rule::Finding;
use crate::types::Diagnostic;

/// Applies suppression, style-version and strict gating to findings.
#[derive(Debug, Clone, Copy)]
pub struct Emitter<'a> {
    config: &'a Configuration,
}

impl<'a> Emitter<'a> {
    /// Creates an emitter for `config`.
    #[must_use]
    pub fn new(config: &'a Configuration) -> Self {
        Self { config }
    }

    /// Resolves one finding, or returns `None` if the configuration hides it.
    ///
    /// The gates are independent: a suppressed code, a finding pinned to
    /// another style version, a rule without a description for the active
    /// version, and a strict-only rule outside strict mode are all dropped.
    #[must_use]
    pub fn emit(&self, unit_identifier: &str, finding: &Finding) -> Option<Diagnostic> {
        let version = self.config.style_version();
        let def = finding.code.def();

        if self.config.is_suppressed(finding.code.as_str()) {
            return None;
        }
        if finding.version.is_some_and(|v| v != version) {
            return None;
        }
        let description = def.description(version)?;
        if def.strict_only && !self.config.is_strict() {
            return None;
        }

        Some(Diagnostic {
            unit_identifier: unit_identifier.to_string(),
            line: finding.line,
            rule_code: finding.code.as_str().to_string(),
            description: description.to_string(),
            severity: def.severity,
            color: self.config.use_color().then(|| def.severity.color()),
        })
    }

    /// Resolves findings in order, dropping the hidden ones.
    #[must_use]
    pub fn emit_all<'f, I>(&self, unit_identifier: &str, findings: I) -> Vec<Diagnostic>
    where
        I: IntoIterator<Item = &'f Finding>,
    {
        findings
            .into_iter()
            .filter_map(|f| self.emit(unit_identifier, f))
            .collect()
    }
}
