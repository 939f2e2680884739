//! Core analyzer for orchestrating checks over files and directory trees.

use crate::config::Configuration;
use crate::context::{CheckContext, SourceUnit};
use crate::emitter::Emitter;
use crate::registry::RuleCode;
use crate::rule::{Checker, CheckerBox, Finding};
use crate::types::{Diagnostic, LintResult};
use crate::utils::exclusion::{normalize, IGNORE_FILE_NAME};
use crate::utils::files::{
    is_build_file_name, is_c_source_name, is_elf, is_snake_case_dir_name,
    is_snake_case_source_name, is_unwanted_name,
};
use crate::utils::ExclusionSet;

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The target path does not exist, or vanished during traversal.
    #[error("{}: No such file or directory", .0.display())]
    NotFound(PathBuf),

    /// IO error reading a file.
    #[error("{}: {source}", .path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },

    /// Directory traversal error.
    #[error("{0}")]
    Walk(#[from] walkdir::Error),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    config: Option<Configuration>,
    checkers: Vec<CheckerBox>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Configuration) -> Self {
        self.config = Some(config);
        self
    }

    /// Adds a checker.
    #[must_use]
    pub fn checker<C: Checker + 'static>(mut self, checker: C) -> Self {
        self.checkers.push(Box::new(checker));
        self
    }

    /// Adds several boxed checkers, keeping their order.
    #[must_use]
    pub fn checkers<I>(mut self, checkers: I) -> Self
    where
        I: IntoIterator<Item = CheckerBox>,
    {
        self.checkers.extend(checkers);
        self
    }

    /// Builds the analyzer.
    #[must_use]
    pub fn build(self) -> Analyzer {
        Analyzer {
            config: self.config.unwrap_or_default(),
            checkers: self.checkers,
        }
    }
}

/// The main analyzer: runs every checker over each unit and emits
/// diagnostics under one [`Configuration`].
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    config: Configuration,
    checkers: Vec<CheckerBox>,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Returns the number of registered checkers.
    #[must_use]
    pub fn checker_count(&self) -> usize {
        self.checkers.len()
    }

    /// Runs every applicable checker over `unit`.
    ///
    /// Diagnostics come out in checker order, and in discovery order within
    /// each checker.
    #[must_use]
    pub fn check_unit(&self, unit: &SourceUnit) -> Vec<Diagnostic> {
        debug!("Checking: {}", unit.identifier());
        let ctx = CheckContext::new(unit, &self.config);
        let emitter = Emitter::new(&self.config);
        self.checkers
            .iter()
            .filter(|checker| checker.applies_to(unit.kind()))
            .flat_map(|checker| {
                let findings = checker.check(&ctx);
                emitter.emit_all(unit.identifier(), &findings)
            })
            .collect()
    }

    /// Checks text read from standard input.
    #[must_use]
    pub fn check_stdin(&self, text: &str) -> LintResult {
        let unit = SourceUnit::stdin(text, self.config.stdin_is_header());
        LintResult {
            diagnostics: self.check_unit(&unit),
            files_checked: 1,
        }
    }

    /// Checks a file or walks a directory tree.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::NotFound`] if `target` does not exist or an
    /// entry vanishes mid-walk, and other variants for traversal failures.
    pub fn analyze(&self, target: impl AsRef<Path>) -> Result<LintResult, AnalyzerError> {
        let target = target.as_ref();
        info!("Starting analysis at {:?}", target);

        if !target.exists() {
            return Err(AnalyzerError::NotFound(target.to_path_buf()));
        }

        let mut result = LintResult::new();
        if target.is_dir() {
            self.walk(target, &mut result)?;
        } else {
            self.analyze_file(target, &mut result)?;
        }

        info!(
            "Analysis complete: {} diagnostics in {} files",
            result.diagnostics.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Reads and checks one file, deriving its kind from its name.
    fn analyze_file(&self, path: &Path, result: &mut LintResult) -> Result<(), AnalyzerError> {
        let Some(bytes) = read_entry(path)? else {
            return Ok(());
        };
        let unit = SourceUnit::from_path(path, String::from_utf8_lossy(&bytes));
        result.diagnostics.extend(self.check_unit(&unit));
        result.files_checked += 1;
        Ok(())
    }

    /// Walks `root` depth-first in listing order.
    fn walk(&self, root: &Path, result: &mut LintResult) -> Result<(), AnalyzerError> {
        let cwd = std::env::current_dir().map_err(|source| AnalyzerError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        let absolute = |path: &Path| normalize(&cwd.join(path));

        // frames[d] holds the exclusions active inside the directory at depth d.
        let mut frames: Vec<ExclusionSet> = Vec::new();

        let walker = WalkDir::new(root).into_iter().filter_entry(is_visited);
        for entry in walker {
            let entry = entry.map_err(walk_error)?;
            let path = entry.path();
            let depth = entry.depth();
            let name = entry.file_name().to_string_lossy();

            if entry.file_type().is_dir() {
                frames.truncate(depth);
                let inherited = frames.last().cloned().unwrap_or_default();
                frames.push(self.load_exclusions(&absolute(path), inherited));

                if depth > 0 && !is_snake_case_dir_name(&name) {
                    self.report(result, path, RuleCode::O4);
                }
                continue;
            }

            if !path.is_file() {
                debug!("Skipping non-regular entry: {}", path.display());
                continue;
            }

            if is_build_file_name(&name) {
                self.analyze_file(path, result)?;
            } else if is_c_source_name(&name) {
                if !is_snake_case_source_name(&name) {
                    self.report(result, path, RuleCode::O4);
                }
                self.analyze_file(path, result)?;
            } else {
                let excluded = frames
                    .get(depth.saturating_sub(1))
                    .is_some_and(|set| set.is_excluded(&absolute(path)));
                if excluded {
                    debug!("Excluding: {}", path.display());
                    continue;
                }
                if is_unwanted_name(&name) || self.is_elf_file(path)? {
                    self.report(result, path, RuleCode::O1);
                }
            }
        }

        Ok(())
    }

    /// Extends `inherited` with the exclusion file of `dir`, if any.
    fn load_exclusions(&self, dir: &Path, inherited: ExclusionSet) -> ExclusionSet {
        if !self.config.honor_gitignore() {
            return inherited;
        }
        let ignore_file = dir.join(IGNORE_FILE_NAME);
        if !ignore_file.is_file() {
            return inherited;
        }
        match std::fs::read(&ignore_file) {
            Ok(bytes) => {
                let set = inherited.with_ignore_file(dir, &String::from_utf8_lossy(&bytes));
                debug!(
                    "Loaded {} exclusion patterns from {}",
                    set.len(),
                    ignore_file.display()
                );
                set
            }
            Err(e) => {
                warn!("Failed to read {}: {}", ignore_file.display(), e);
                inherited
            }
        }
    }

    fn is_elf_file(&self, path: &Path) -> Result<bool, AnalyzerError> {
        match is_elf(path) {
            Ok(elf) => Ok(elf),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(AnalyzerError::NotFound(path.to_path_buf()))
            }
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                Ok(false)
            }
        }
    }

    /// Emits a file-wide finding for a path found during traversal.
    fn report(&self, result: &mut LintResult, path: &Path, code: RuleCode) {
        let identifier = path.display().to_string();
        if let Some(diagnostic) = Emitter::new(&self.config).emit(&identifier, &Finding::file(code))
        {
            result.diagnostics.push(diagnostic);
        }
    }
}

/// Directories starting with `.` and `tests` next to a `.git` are not entered.
fn is_visited(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        debug!("Skipping hidden directory: {}", entry.path().display());
        return false;
    }
    if name == "tests"
        && entry
            .path()
            .parent()
            .is_some_and(|parent| parent.join(".git").exists())
    {
        debug!("Skipping tests directory: {}", entry.path().display());
        return false;
    }
    true
}

/// Reads a file, treating a vanished file as fatal and any other failure as
/// a warning.
fn read_entry(path: &Path) -> Result<Option<Vec<u8>>, AnalyzerError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(AnalyzerError::NotFound(path.to_path_buf()))
        }
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            Ok(None)
        }
    }
}

fn walk_error(error: walkdir::Error) -> AnalyzerError {
    let vanished = error
        .io_error()
        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound);
    match (vanished, error.path()) {
        (true, Some(path)) => AnalyzerError::NotFound(path.to_path_buf()),
        _ => AnalyzerError::Walk(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SourceKind;
    use std::fs;

    struct GotoChecker;

    impl Checker for GotoChecker {
        fn name(&self) -> &'static str {
            "goto"
        }

        fn check(&self, ctx: &CheckContext) -> Vec<Finding> {
            ctx.text()
                .lines()
                .enumerate()
                .filter(|(_, line)| line.contains("goto "))
                .map(|(i, _)| Finding::at(RuleCode::C3, i + 1))
                .collect()
        }
    }

    struct BuildFileChecker;

    impl Checker for BuildFileChecker {
        fn name(&self) -> &'static str {
            "build"
        }

        fn applies_to(&self, kind: SourceKind) -> bool {
            kind == SourceKind::BuildFile
        }

        fn check(&self, _ctx: &CheckContext) -> Vec<Finding> {
            vec![Finding::file(RuleCode::G1)]
        }
    }

    fn analyzer() -> Analyzer {
        Analyzer::builder()
            .config(Configuration::builder().use_color(false).build())
            .checker(GotoChecker)
            .checker(BuildFileChecker)
            .build()
    }

    fn codes(result: &LintResult) -> Vec<(String, String)> {
        result
            .diagnostics
            .iter()
            .map(|d| {
                let name = Path::new(&d.unit_identifier)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                (name, d.rule_code.clone())
            })
            .collect()
    }

    #[test]
    fn test_builder() {
        let analyzer = analyzer();
        assert_eq!(analyzer.checker_count(), 2);
        assert!(!analyzer.config().use_color());
    }

    #[test]
    fn checkers_respect_source_kind() {
        let analyzer = analyzer();
        let unit = SourceUnit::new("Makefile", "goto x\n", SourceKind::BuildFile);
        let diags = analyzer.check_unit(&unit);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule_code, "G1");
    }

    #[test]
    fn stdin_identifier() {
        let result = analyzer().check_stdin("int f(void)\n{\n    goto end;\n}\n");
        assert_eq!(result.files_checked, 1);
        assert_eq!(result.diagnostics[0].unit_identifier, "stdin");
        assert_eq!(result.diagnostics[0].line, Some(3));
    }

    #[test]
    fn missing_target_is_not_found() {
        let err = analyzer()
            .analyze("/definitely/not/here")
            .expect_err("missing path");
        assert!(matches!(err, AnalyzerError::NotFound(_)));
        assert_eq!(
            err.to_string(),
            "/definitely/not/here: No such file or directory"
        );
    }

    #[test]
    fn walks_tree_and_reports_names() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        fs::create_dir(root.join("Src")).expect("mkdir");
        fs::write(root.join("Src/BadName.c"), "goto x;\n").expect("write");
        fs::write(root.join("good.h"), "").expect("write");
        fs::write(root.join("main.o"), "").expect("write");
        fs::write(root.join("Makefile"), "").expect("write");
        fs::create_dir(root.join(".hidden")).expect("mkdir");
        fs::write(root.join(".hidden/x.o"), "").expect("write");

        let result = analyzer().analyze(root).expect("analyze");
        let mut found = codes(&result);
        found.sort();
        assert_eq!(
            found,
            vec![
                ("BadName.c".to_string(), "C3".to_string()),
                ("BadName.c".to_string(), "O4".to_string()),
                ("Makefile".to_string(), "G1".to_string()),
                ("Src".to_string(), "O4".to_string()),
                ("main.o".to_string(), "O1".to_string()),
            ]
        );
        assert_eq!(result.files_checked, 3);
    }

    #[test]
    fn tests_dir_skipped_next_to_git() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        fs::create_dir(root.join(".git")).expect("mkdir");
        fs::create_dir(root.join("tests")).expect("mkdir");
        fs::write(root.join("tests/t.o"), "").expect("write");

        let result = analyzer().analyze(root).expect("analyze");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn ignore_file_excludes_artifacts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        fs::write(root.join(IGNORE_FILE_NAME), "*.o # objects\n").expect("write");
        fs::create_dir(root.join("sub")).expect("mkdir");
        fs::write(root.join("sub/a.o"), "").expect("write");
        fs::write(root.join("sub/core.swp"), "").expect("write");

        let result = analyzer().analyze(root).expect("analyze");
        assert_eq!(
            codes(&result),
            vec![("core.swp".to_string(), "O1".to_string())]
        );

        let no_ignore = Analyzer::builder()
            .config(Configuration::builder().honor_gitignore(false).build())
            .build();
        let result = no_ignore.analyze(root).expect("analyze");
        assert_eq!(result.diagnostics.len(), 2);
    }

    #[test]
    fn elf_files_are_unwanted() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("a_binary"), b"\x7fELF\x02\x01").expect("write");
        fs::write(dir.path().join("notes"), b"hello").expect("write");

        let result = analyzer().analyze(dir.path()).expect("analyze");
        assert_eq!(
            codes(&result),
            vec![("a_binary".to_string(), "O1".to_string())]
        );
    }

    #[test]
    fn single_file_target() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("Weird.c");
        fs::write(&file, "goto a;\r\ngoto b;").expect("write");

        let result = analyzer().analyze(&file).expect("analyze");
        assert_eq!(result.files_checked, 1);
        let lines: Vec<Option<usize>> = result.diagnostics.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![Some(1), Some(2)]);
    }
}
