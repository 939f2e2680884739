//! Reports `else` split from its braces across lines.

use cnorm_core::utils::compile_static;
use cnorm_core::{CheckContext, Checker, Finding, RuleCode};
use regex::Regex;
use std::sync::OnceLock;

/// Rule name for else-placement.
pub const NAME: &str = "else-placement";

/// `}` at the end of a line with `else` opening the next one.
fn else_after_brace_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile_static(r"\}[ \t]*\r?\n[ \t]*else[ \t]+?"))
}

/// `else` (or `else if (...)`) with its `{` on the next line.
fn brace_after_else_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile_static(r"[ \t]else(?:\r?\n|[ \t]+?.*?\r?\n)[ \t]*?\{"))
}

/// Reports misplaced `else` keywords (L3).
#[derive(Debug, Clone, Copy, Default)]
pub struct ElsePlacement;

impl ElsePlacement {
    /// Creates the checker.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Checker for ElsePlacement {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Requires `} else {` on a single line"
    }

    fn codes(&self) -> &'static [RuleCode] {
        &[RuleCode::L3]
    }

    fn check(&self, ctx: &CheckContext) -> Vec<Finding> {
        let text = ctx.text();
        else_after_brace_line()
            .find_iter(text)
            .chain(brace_after_else_line().find_iter(text))
            .map(|m| Finding::at(RuleCode::L3, ctx.line_of(m.start())))
            .collect()
    }
}
