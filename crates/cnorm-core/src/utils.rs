//! Text and path helpers shared by the analyzer and the checkers.

pub mod exclusion;
pub mod files;
pub mod lines;

use regex::Regex;

#[doc(inline)]
pub use exclusion::{ExclusionPattern, ExclusionSet};
#[doc(inline)]
pub use lines::{physical_lines, strip_terminator, LineIndex};

/// Compiles a pattern that ships with the binary.
///
/// # Panics
///
/// Panics if `pattern` is not a valid regex, which is a programming error.
#[must_use]
#[allow(clippy::expect_used)]
pub fn compile_static(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern must compile")
}
