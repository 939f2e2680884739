//! # cnorm-rules
//!
//! Built-in checkers for cnorm.
//!
//! Each checker recognizes one family of C constructs with lexical
//! heuristics and reports raw findings; the analyzer's emitter resolves them
//! against the active style version.
//!
//! ## Available Checkers
//!
//! | Name | Codes | Description |
//! |------|-------|-------------|
//! | `line-endings` | G7, `implicit_LF` | Forbids carriage returns |
//! | `trailing-lines` | A3, G9 | Requires a single final line break |
//! | `header-comment` | G1 | Requires the header comment |
//! | `function-implementations` | F2, F4, F5, F6, G2, L3, L6, O3, V3 | Checks function definitions |
//! | `macro-definitions` | H3 | Forbids block macros |
//! | `else-placement` | L3 | Requires `} else {` on one line |
//! | `line-scanner` | C1, C2, C3, F3, G8, H2, H3, L2, L3, `implicit_L001`, syscall | Per-line checks |
//! | `build-file-header` | G1 | Requires the Makefile header |
//! | `build-file-columns` | F3 | Limits Makefile line length |
//!
//! ## Usage
//!
//! ```ignore
//! use cnorm_core::{Analyzer, Configuration};
//! use cnorm_rules::all_checkers;
//!
//! let analyzer = Analyzer::builder()
//!     .config(Configuration::default())
//!     .checkers(all_checkers())
//!     .build();
//! let result = analyzer.analyze(".")?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod build_file;
mod else_placement;
mod file_endings;
mod function_implementations;
mod header_comment;
mod line_scanner;
mod macro_definitions;
mod presets;

pub mod function_scanner;
pub mod syscalls;

pub use build_file::BuildFileColumns;
pub use else_placement::ElsePlacement;
pub use file_endings::{LineEndings, TrailingLines};
pub use function_implementations::FunctionImplementations;
pub use function_scanner::{scan_functions, FunctionRecord, FunctionScanner};
pub use header_comment::{has_build_file_header, has_source_header, BuildFileHeader, HeaderComment};
pub use line_scanner::LineScanner;
pub use macro_definitions::{find_block_macros, MacroDefinitions, MacroRecord};
pub use presets::{all_checkers, build_file_checkers, source_checkers};

/// Re-export core types for convenience.
pub use cnorm_core::{Checker, Finding, RuleCode};
