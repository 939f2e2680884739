//! Whole-file checks on line endings and trailing lines.

use cnorm_core::{CheckContext, Checker, Finding, RuleCode};

/// Rule name for line-endings.
pub const LINE_ENDINGS_NAME: &str = "line-endings";

/// Rule name for trailing-lines.
pub const TRAILING_LINES_NAME: &str = "trailing-lines";

/// Reports any carriage return in the file, once.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineEndings;

impl LineEndings {
    /// Creates the checker.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Checker for LineEndings {
    fn name(&self) -> &'static str {
        LINE_ENDINGS_NAME
    }

    fn description(&self) -> &'static str {
        "Requires UNIX line endings"
    }

    fn codes(&self) -> &'static [RuleCode] {
        &[RuleCode::G7, RuleCode::ImplicitLf]
    }

    fn check(&self, ctx: &CheckContext) -> Vec<Finding> {
        if !ctx.text().contains('\r') {
            return Vec::new();
        }
        vec![
            Finding::file(RuleCode::G7),
            Finding::file(RuleCode::ImplicitLf),
        ]
    }
}

/// Requires exactly one line break at the end of the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrailingLines;

impl TrailingLines {
    /// Creates the checker.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Checker for TrailingLines {
    fn name(&self) -> &'static str {
        TRAILING_LINES_NAME
    }

    fn description(&self) -> &'static str {
        "Requires a single trailing line break"
    }

    fn codes(&self) -> &'static [RuleCode] {
        &[RuleCode::A3, RuleCode::G9]
    }

    fn check(&self, ctx: &CheckContext) -> Vec<Finding> {
        let text = ctx.text();
        let last_line = ctx.line_of(text.len());
        let mut findings = Vec::new();

        if !text.trim_end_matches([' ', '\t']).ends_with('\n') {
            findings.push(Finding::at(RuleCode::A3, last_line));
        }
        if text.ends_with("\n\n") {
            findings.push(Finding::at(RuleCode::G9, last_line));
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnorm_core::{Configuration, SourceUnit};

    fn check<C: Checker>(checker: C, text: &str) -> Vec<Finding> {
        let unit = SourceUnit::stdin(text, false);
        let config = Configuration::default();
        checker.check(&CheckContext::new(&unit, &config))
    }

    #[test]
    fn carriage_return_reported_once() {
        assert_eq!(check(LineEndings, "a\r\nb\r\nc\r\n").len(), 2);
        assert!(check(LineEndings, "a\nb\n").is_empty());
    }

    #[test]
    fn missing_final_newline() {
        assert_eq!(
            check(TrailingLines, "int x;"),
            vec![Finding::at(RuleCode::A3, 1)]
        );
        assert_eq!(
            check(TrailingLines, "int x;\n  \t"),
            vec![Finding::at(RuleCode::A3, 2)]
        );
        assert_eq!(check(TrailingLines, ""), vec![Finding::at(RuleCode::A3, 1)]);
    }

    #[test]
    fn trailing_blank_lines() {
        assert!(check(TrailingLines, "int x;\n").is_empty());
        assert_eq!(
            check(TrailingLines, "int x;\n\n"),
            vec![Finding::at(RuleCode::G9, 3)]
        );
        assert_eq!(
            check(TrailingLines, "\n\n"),
            vec![Finding::at(RuleCode::G9, 3)]
        );
    }
}
