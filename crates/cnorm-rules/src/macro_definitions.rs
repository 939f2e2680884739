//! Recognizer for function-like macros expanding to a braced block.
//!
//! `#define NAME(args) {` (optionally `({`, with blanks or escaped line
//! breaks before the brace) is reported as H3.

use cnorm_core::utils::compile_static;
use cnorm_core::{CheckContext, Checker, Finding, RuleCode};
use regex::Regex;
use std::sync::OnceLock;

/// Rule name for macro-definitions.
pub const NAME: &str = "macro-definitions";

fn block_macro() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        compile_static(
            r"(?:^|\n)#define ([A-Za-z0-9]+)\([^\n]+\)(?:\\\r?\n|[ \t])*?\(?(?:\\\r?\n|[ \t])*?\{",
        )
    })
}

/// A block macro found in a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroRecord<'a> {
    /// Macro name.
    pub macro_name: &'a str,
    /// Line of the `#define`.
    pub definition_line: usize,
}

/// Finds every block macro in `ctx`.
#[must_use]
pub fn find_block_macros<'a>(ctx: &CheckContext<'a>) -> Vec<MacroRecord<'a>> {
    let text = ctx.text();
    block_macro()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?;
            Some(MacroRecord {
                macro_name: name.as_str(),
                definition_line: ctx.line_of(whole.start() + 1),
            })
        })
        .collect()
}

/// Reports macros used as multi-statement blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct MacroDefinitions;

impl MacroDefinitions {
    /// Creates the checker.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Checker for MacroDefinitions {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Reports function-like macros with a braced body"
    }

    fn codes(&self) -> &'static [RuleCode] {
        &[RuleCode::H3]
    }

    fn check(&self, ctx: &CheckContext) -> Vec<Finding> {
        find_block_macros(ctx)
            .into_iter()
            .map(|record| Finding::at(RuleCode::H3, record.definition_line))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnorm_core::{Configuration, SourceUnit};

    fn records(text: &str) -> Vec<(String, usize)> {
        let unit = SourceUnit::stdin(text, true);
        let config = Configuration::default();
        let ctx = CheckContext::new(&unit, &config);
        find_block_macros(&ctx)
            .into_iter()
            .map(|r| (r.macro_name.to_string(), r.definition_line))
            .collect()
    }

    #[test]
    fn finds_braced_macro() {
        assert_eq!(
            records("#define SWAP(a, b) { int t = a; a = b; b = t; }\n"),
            vec![("SWAP".to_string(), 1)]
        );
    }

    #[test]
    fn finds_macro_after_continuation() {
        let text = "int x;\n\n#define LOG(m) \\\n    ({ \\\n    puts(m); })\n";
        assert_eq!(records(text), vec![("LOG".to_string(), 3)]);
    }

    #[test]
    fn ignores_expression_macros() {
        assert!(records("#define MAX(a, b) ((a) > (b) ? (a) : (b))\n").is_empty());
        assert!(records("#define SIZE 42\n").is_empty());
        assert!(records("  #define F(x) { x }\n").is_empty());
    }

    #[test]
    fn underscores_are_not_part_of_the_name_class() {
        assert!(records("#define MY_MACRO(x) { x; }\n").is_empty());
    }
}
