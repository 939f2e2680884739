//! Checks run on every function definition.
//!
//! # Detected Patterns
//!
//! - Bodies longer than 20 lines (F4; `>` under 2020, `>=` under 2021)
//! - Detached pointer star in the signature (V3)
//! - Names outside `snake_case` (F2)
//! - More than four parameters, or no explicit `void` (F5)
//! - Opening brace on the signature line (L3)
//! - A sixth and further definition in one file (O3)
//! - Comments in the body (F6)
//! - More than one blank line in the body (L6)
//! - Anything but a single blank line between two definitions (G2)

use crate::function_scanner::{FunctionRecord, FunctionScanner};
use cnorm_core::utils::compile_static;
use cnorm_core::{CheckContext, Checker, Finding, RuleCode, StyleVersion};
use regex::Regex;
use std::sync::OnceLock;

/// Rule name for function-implementations.
pub const NAME: &str = "function-implementations";

/// Line limit for function bodies.
pub const MAX_BODY_LINES: usize = 20;

/// Definitions allowed per file before O3 fires.
pub const MAX_FUNCTIONS: usize = 5;

/// Commas allowed in a parameter list.
pub const MAX_PARAMETER_COMMAS: usize = 3;

fn snake_case() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile_static(r"^[a-z][a-z_0-9]*$"))
}

/// Checks function definitions found by the function scanner.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionImplementations;

impl FunctionImplementations {
    /// Creates the checker.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Checker for FunctionImplementations {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Checks length, naming, parameters and spacing of function definitions"
    }

    fn codes(&self) -> &'static [RuleCode] {
        &[
            RuleCode::F4,
            RuleCode::V3,
            RuleCode::F2,
            RuleCode::F5,
            RuleCode::L3,
            RuleCode::O3,
            RuleCode::F6,
            RuleCode::L6,
            RuleCode::G2,
        ]
    }

    fn check(&self, ctx: &CheckContext) -> Vec<Finding> {
        let text = ctx.text();
        let mut findings = Vec::new();
        let mut previous_end: Option<usize> = None;
        let mut definitions = 0;

        for (index, function) in FunctionScanner::new(text).enumerate() {
            definitions += 1;
            let line = function.signature_end_line;

            let span = function.body_line_span();
            if span > MAX_BODY_LINES {
                report_versioned(&mut findings, line, StyleVersion::Cs2020);
            }
            if span >= MAX_BODY_LINES {
                report_versioned(&mut findings, line, StyleVersion::Cs2021);
            }
            let mut report = |code| findings.push(Finding::at(code, line));

            if has_detached_star(&function) {
                report(RuleCode::V3);
            }
            if !snake_case().is_match(function.name) {
                report(RuleCode::F2);
            }
            if has_bad_parameters(function.parameters_text) {
                report(RuleCode::F5);
            }
            if !function.separator.contains('\n') {
                report(RuleCode::L3);
            }
            if index >= MAX_FUNCTIONS {
                report(RuleCode::O3);
            }
            if function.has_comment {
                report(RuleCode::F6);
            }
            if has_blank_line_runs(function.body_text) {
                report(RuleCode::L6);
            }
            if let Some(end) = previous_end {
                if is_badly_separated(text.get(end..function.match_start).unwrap_or_default()) {
                    report(RuleCode::G2);
                }
            }

            previous_end = Some(function.match_end);
        }

        tracing::trace!(
            "{}: {} function definitions",
            ctx.unit.identifier(),
            definitions
        );
        findings
    }
}

fn report_versioned(findings: &mut Vec<Finding>, line: usize, version: StyleVersion) {
    findings.push(Finding::at(RuleCode::F4, line).only_for(version));
}

fn has_detached_star(function: &FunctionRecord<'_>) -> bool {
    function.pointer_marker.starts_with('*') && function.pointer_marker.ends_with(' ')
}

fn has_bad_parameters(parameters: &str) -> bool {
    parameters.matches(',').count() > MAX_PARAMETER_COMMAS || parameters.trim().is_empty()
}

/// More than one `\n\n` in the body once leading and trailing breaks go.
fn has_blank_line_runs(body: &str) -> bool {
    body.trim_matches(['\r', '\n']).matches("\n\n").count() > 1
}

/// Blank-only text between two definitions must hold exactly one `\n`.
fn is_badly_separated(between: &str) -> bool {
    let blanks_removed: String = between.chars().filter(|c| !matches!(c, ' ' | '\t')).collect();
    let only_breaks = blanks_removed.chars().all(|c| matches!(c, '\n' | '\r'));
    only_breaks && blanks_removed.matches('\n').count() != 1
}
