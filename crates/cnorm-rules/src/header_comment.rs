//! Recognizers for the mandated header comment.
//!
//! C units must open with:
//!
//! ```text
//! /*
//! ** EPITECH PROJECT, 2021
//! ** <project>
//! ** File description:
//! ** <description>
//! */
//! ```
//!
//! Build files use the same layout with `##` in place of every comment
//! marker.

use cnorm_core::utils::compile_static;
use cnorm_core::{CheckContext, Checker, Finding, RuleCode, SourceKind, StyleVersion};
use regex::Regex;
use std::sync::OnceLock;

/// Rule name for header-comment.
pub const NAME: &str = "header-comment";

/// Rule name for build-file-header.
pub const BUILD_FILE_NAME: &str = "build-file-header";

fn source_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        compile_static(
            r"^/\*\n\*\* EPITECH PROJECT, [0-9]{4}\n\*\* (.*)\n\*\* File description:\n\*\* (.*)\n\*/",
        )
    })
}

fn build_file_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        compile_static(
            r"^##\n## EPITECH PROJECT, [0-9]{4}\n## (.*)\n## File description:\n## (.*)\n##",
        )
    })
}

/// Returns true if `text` opens with the C header comment.
#[must_use]
pub fn has_source_header(text: &str) -> bool {
    source_header().is_match(text)
}

/// Returns true if `text` opens with the build-file header comment.
#[must_use]
pub fn has_build_file_header(text: &str) -> bool {
    build_file_header().is_match(text)
}

/// Reports a missing or malformed header in C units.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderComment;

impl HeaderComment {
    /// Creates the checker.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Checker for HeaderComment {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Requires the header comment at the top of C files"
    }

    fn codes(&self) -> &'static [RuleCode] {
        &[RuleCode::G1]
    }

    fn check(&self, ctx: &CheckContext) -> Vec<Finding> {
        if has_source_header(ctx.text()) {
            return Vec::new();
        }
        StyleVersion::ALL
            .into_iter()
            .map(|version| Finding::file(RuleCode::G1).only_for(version))
            .collect()
    }
}

/// Reports a missing or malformed header in build files (2021 only).
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildFileHeader;

impl BuildFileHeader {
    /// Creates the checker.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Checker for BuildFileHeader {
    fn name(&self) -> &'static str {
        BUILD_FILE_NAME
    }

    fn description(&self) -> &'static str {
        "Requires the header comment at the top of Makefiles"
    }

    fn codes(&self) -> &'static [RuleCode] {
        &[RuleCode::G1]
    }

    fn applies_to(&self, kind: SourceKind) -> bool {
        kind == SourceKind::BuildFile
    }

    fn check(&self, ctx: &CheckContext) -> Vec<Finding> {
        if has_build_file_header(ctx.text()) {
            return Vec::new();
        }
        vec![Finding::file(RuleCode::G1).only_for(StyleVersion::Cs2021)]
    }
}
