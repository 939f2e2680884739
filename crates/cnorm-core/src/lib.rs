//! # cnorm-core
//!
//! Core framework for checking C sources against a coding convention with
//! lexical heuristics.
//!
//! This crate provides the foundational types for building style checkers:
//!
//! - [`Checker`] trait for per-unit checks producing raw [`Finding`]s
//! - [`RuleCode`] / [`RuleDef`] catalog with per-version descriptions
//! - [`Emitter`] applying suppression, version and strict gating
//! - [`Analyzer`] for walking directory trees and orchestrating checks
//! - [`Diagnostic`] for representing emitted violations
//!
//! ## Example
//!
//! ```ignore
//! use cnorm_core::{Analyzer, Configuration, StyleVersion};
//!
//! let analyzer = Analyzer::builder()
//!     .config(Configuration::builder().style_version(StyleVersion::Cs2020).build())
//!     .checker(MyChecker)
//!     .build();
//!
//! let result = analyzer.analyze("./src")?;
//! for diagnostic in &result.diagnostics {
//!     println!("{diagnostic}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod emitter;
mod registry;
mod rule;
mod types;

/// Text and path helpers shared by checkers and the analyzer.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{
    Config, ConfigError, Configuration, ConfigurationBuilder, StyleVersion, SyscallConfig,
};
pub use context::{CheckContext, SourceKind, SourceUnit, STDIN_IDENTIFIER};
pub use emitter::Emitter;
pub use registry::{catalog, RuleCode, RuleDef, UnknownRuleCode};
pub use rule::{Checker, CheckerBox, Finding};
pub use types::{Diagnostic, DiagnosticReport, LintResult, Severity, SeverityColor};
