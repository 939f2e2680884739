//! Single forward pass over the physical lines of a C unit.
//!
//! Lines opening with a comment marker (`/*`, `**`, `*/`) are skipped. Two
//! bits of state cross lines: whether an include guard was seen, and whether
//! the previous line opened an indented control statement.

use crate::syscalls::{find_calls, report_count};
use cnorm_core::utils::{compile_static, physical_lines, strip_terminator};
use cnorm_core::{CheckContext, Checker, Finding, RuleCode};
use regex::Regex;
use std::sync::OnceLock;

/// Rule name for line-scanner.
pub const NAME: &str = "line-scanner";

/// Columns allowed per line, terminator excluded.
pub const MAX_COLUMNS: usize = 80;

/// Width of a tab when counting columns.
pub const TAB_WIDTH: usize = 4;

struct Patterns {
    constant_macro: Regex,
    define: Regex,
    static_inline: Regex,
    conditional: Regex,
    pragma_once: Regex,
    deep_condition: Regex,
    deep_else_if: Regex,
    keyword_paren: Regex,
    lone_brace: Regex,
    control_statement: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        constant_macro: compile_static(r"^\s*#define [A-Za-z0-9]+ "),
        define: compile_static(r"^\s*#define"),
        static_inline: compile_static(r"^(?:static inline|inline static)"),
        conditional: compile_static(r"^\s*#if"),
        pragma_once: compile_static(r"^\s*#pragma once$"),
        deep_condition: compile_static(r"(?:\t|    ){3,}(?:while|for|if)"),
        deep_else_if: compile_static(r"(?:\t|    ){2,}\}?\s*else if"),
        keyword_paren: compile_static(r"(?:while|for|if|return)\("),
        lone_brace: compile_static(r"^\s+\{"),
        control_statement: compile_static(r"^(?:\t|    )(?:while|for|if)"),
    })
}

/// Counts columns with tabs expanded. The line terminator (`\n`, `\r\n`
/// or a lone `\r`) takes no column.
#[must_use]
pub fn column_count(line: &str) -> usize {
    strip_terminator(line)
        .chars()
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

/// Returns true if `line` is indented with tabs, or with spaces that are not
/// a multiple of four.
#[must_use]
pub fn has_bad_indentation(line: &str) -> bool {
    if line.contains('\t') {
        return true;
    }
    let spaces = line.len() - line.trim_start_matches(' ').len();
    spaces > 0 && (spaces % 4 != 0 || spaces == line.len())
}

/// Returns true if whitespace precedes the terminator ending `line`.
///
/// Terminators are stripped the same way as for [`column_count`]; an
/// unterminated last line is never reported.
#[must_use]
pub fn has_trailing_whitespace(line: &str) -> bool {
    let content = strip_terminator(line);
    content.len() < line.len() && content.ends_with(char::is_whitespace)
}

fn is_pragma_once(line: &str) -> bool {
    let line = line.strip_suffix('\n').unwrap_or(line);
    patterns().pragma_once.is_match(line)
}

/// Per-line checks, include-guard detection and library-call reporting.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineScanner;

impl LineScanner {
    /// Creates the checker.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Checker for LineScanner {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Checks length, indentation, spacing and directives line by line"
    }

    fn codes(&self) -> &'static [RuleCode] {
        &[
            RuleCode::H3,
            RuleCode::C2,
            RuleCode::Syscall,
            RuleCode::F3,
            RuleCode::L2,
            RuleCode::C1,
            RuleCode::C3,
            RuleCode::L3,
            RuleCode::G8,
            RuleCode::ImplicitL001,
            RuleCode::H2,
        ]
    }

    fn check(&self, ctx: &CheckContext) -> Vec<Finding> {
        let p = patterns();
        let is_header = ctx.unit.is_header();
        let mut findings = Vec::new();
        let mut has_include_guard = false;
        let mut was_control_statement = false;

        for (index, line) in physical_lines(ctx.text()).enumerate() {
            let line_nb = index + 1;
            let mut report = |code| findings.push(Finding::at(code, line_nb));

            if line.starts_with("/*") || line.starts_with("**") || line.starts_with("*/") {
                continue;
            }

            if p.constant_macro.is_match(line) {
                report(RuleCode::H3);
            }
            if p.define.is_match(line) && !is_header {
                report(RuleCode::C2);
            }
            if p.static_inline.is_match(line) && !is_header {
                report(RuleCode::C2);
            }

            if p.conditional.is_match(line) || is_pragma_once(line) {
                has_include_guard = true;
            }

            for call in find_calls(line) {
                for _ in 0..report_count(call.name, ctx.config) {
                    report(RuleCode::Syscall);
                }
            }

            if column_count(line) > MAX_COLUMNS {
                report(RuleCode::F3);
            }
            if has_bad_indentation(line) {
                report(RuleCode::L2);
            }

            if p.deep_condition.is_match(line) {
                report(RuleCode::C1);
            }
            if p.deep_else_if.is_match(line) {
                report(RuleCode::C1);
            }

            if line.contains("goto ") {
                report(RuleCode::C3);
            }

            if p.keyword_paren.is_match(line) {
                report(RuleCode::L3);
            }
            if was_control_statement && p.lone_brace.is_match(line) {
                report(RuleCode::L3);
            }
            was_control_statement = p.control_statement.is_match(line);

            if has_trailing_whitespace(line) {
                report(RuleCode::G8);
                report(RuleCode::ImplicitL001);
            }
        }

        if is_header && !has_include_guard {
            findings.push(Finding::file(RuleCode::H2));
        }

        findings
    }
}
