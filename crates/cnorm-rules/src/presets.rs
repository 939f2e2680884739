//! Checker sets in reporting order.

use crate::{
    BuildFileColumns, BuildFileHeader, ElsePlacement, FunctionImplementations, HeaderComment,
    LineEndings, LineScanner, MacroDefinitions, TrailingLines,
};
use cnorm_core::CheckerBox;

/// Returns the checkers run on C sources and headers.
///
/// Order:
/// - `line-endings` (G7, `implicit_LF`)
/// - `trailing-lines` (A3, G9)
/// - `header-comment` (G1)
/// - `function-implementations` (F2, F4, F5, F6, G2, L3, L6, O3, V3)
/// - `macro-definitions` (H3)
/// - `else-placement` (L3)
/// - `line-scanner` (C1, C2, C3, F3, G8, H2, H3, L2, L3, `implicit_L001`, syscall)
#[must_use]
pub fn source_checkers() -> Vec<CheckerBox> {
    vec![
        Box::new(LineEndings::new()),
        Box::new(TrailingLines::new()),
        Box::new(HeaderComment::new()),
        Box::new(FunctionImplementations::new()),
        Box::new(MacroDefinitions::new()),
        Box::new(ElsePlacement::new()),
        Box::new(LineScanner::new()),
    ]
}

/// Returns the checkers run on Makefiles.
#[must_use]
pub fn build_file_checkers() -> Vec<CheckerBox> {
    vec![
        Box::new(BuildFileHeader::new()),
        Box::new(BuildFileColumns::new()),
    ]
}

/// Returns all available checkers.
#[must_use]
pub fn all_checkers() -> Vec<CheckerBox> {
    let mut checkers = source_checkers();
    checkers.extend(build_file_checkers());
    checkers
}
