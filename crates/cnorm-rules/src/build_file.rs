//! Column limit for build files.

use crate::line_scanner::{column_count, MAX_COLUMNS};
use cnorm_core::utils::physical_lines;
use cnorm_core::{CheckContext, Checker, Finding, RuleCode, SourceKind, StyleVersion};

/// Rule name for build-file-columns.
pub const NAME: &str = "build-file-columns";

/// Reports over-long lines in Makefiles (2021 only).
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildFileColumns;

impl BuildFileColumns {
    /// Creates the checker.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Checker for BuildFileColumns {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Limits Makefile lines to 80 columns"
    }

    fn codes(&self) -> &'static [RuleCode] {
        &[RuleCode::F3]
    }

    fn applies_to(&self, kind: SourceKind) -> bool {
        kind == SourceKind::BuildFile
    }

    fn check(&self, ctx: &CheckContext) -> Vec<Finding> {
        physical_lines(ctx.text())
            .enumerate()
            .filter(|(_, line)| column_count(line) > MAX_COLUMNS)
            .map(|(index, _)| Finding::at(RuleCode::F3, index + 1).only_for(StyleVersion::Cs2021))
            .collect()
    }
}
