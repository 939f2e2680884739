//! Exclusion patterns read from `.gitignore` files.
//!
//! Patterns support two wildcards:
//! - `*` matches one or more characters inside a path segment
//! - `**` matches any run of characters, `/` included
//!
//! Everything else is literal. Each pattern is compiled once into an
//! anchored [`Regex`]. Only the "unwanted file" check consults these
//! patterns; C sources are checked whether excluded or not.

use regex::Regex;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Name of the per-directory exclusion file.
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// Error compiling an exclusion pattern.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatternError {
    /// The pattern is empty after trimming.
    #[error("empty exclusion pattern")]
    Empty,

    /// The translated expression was rejected by the regex engine.
    #[error("invalid exclusion pattern: {0}")]
    Invalid(#[from] regex::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Star,
    DoubleStar,
}

/// A compiled exclusion glob.
#[derive(Debug, Clone)]
pub struct ExclusionPattern {
    source: String,
    regex: Regex,
}

impl ExclusionPattern {
    /// Compiles a glob into an anchored regex.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Empty`] for a blank pattern and
    /// [`PatternError::Invalid`] if the translation does not compile.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        if pattern.trim().is_empty() {
            return Err(PatternError::Empty);
        }
        let body: String = tokenize(pattern)
            .iter()
            .map(|token| match token {
                Token::Literal(literal) => regex::escape(literal),
                Token::Star => "[^/]+".to_string(),
                Token::DoubleStar => ".*".to_string(),
            })
            .collect();
        Ok(Self {
            source: pattern.to_string(),
            regex: Regex::new(&format!("^(?s:{body})$"))?,
        })
    }

    /// Returns the pattern text this glob was compiled from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Checks whether the whole of `text` matches this glob.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Splits a glob into literal, `*` and `**` tokens.
fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '*' {
            literal.push(c);
            continue;
        }
        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(&mut literal)));
        }
        if chars.peek() == Some(&'*') {
            chars.next();
            tokens.push(Token::DoubleStar);
        } else {
            tokens.push(Token::Star);
        }
    }
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}

/// The exclusion patterns active for one directory subtree.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    patterns: Vec<ExclusionPattern>,
}

impl ExclusionSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of this set extended with the patterns of an
    /// exclusion file located in `dir`.
    #[must_use]
    pub fn with_ignore_file(&self, dir: &Path, content: &str) -> Self {
        let mut set = self.clone();
        set.patterns.extend(parse_ignore_file(dir, content));
        set
    }

    /// Number of active patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if no pattern is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Checks `path` (absolute) and its file name against every pattern.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        let full = path.to_string_lossy();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        self.patterns
            .iter()
            .any(|p| p.matches(&full) || p.matches(&name))
    }
}

/// Parses the lines of an exclusion file found in `dir`.
///
/// Text after `#` is dropped and blank lines are ignored. Patterns containing
/// `/` are anchored to `dir`; the rest match anywhere below it. Patterns that
/// fail to compile are skipped.
#[must_use]
pub fn parse_ignore_file(dir: &Path, content: &str) -> Vec<ExclusionPattern> {
    content
        .lines()
        .filter_map(|line| {
            let pattern = line.split('#').next().unwrap_or_default().trim();
            if pattern.is_empty() {
                return None;
            }
            let pattern = if pattern.contains('/') {
                normalize(&dir.join(pattern.trim_start_matches('/')))
                    .to_string_lossy()
                    .into_owned()
            } else {
                pattern.to_string()
            };
            match ExclusionPattern::compile(&pattern) {
                Ok(compiled) => Some(compiled),
                Err(e) => {
                    debug!("Skipping exclusion pattern {:?}: {}", pattern, e);
                    None
                }
            }
        })
        .collect()
}

/// Lexically normalizes a path: drops `.` and resolves `..` without touching
/// the file system.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, text: &str) -> bool {
        ExclusionPattern::compile(pattern)
            .map(|p| p.matches(text))
            .unwrap_or(false)
    }

    #[test]
    fn literal_pattern_matches_exactly() {
        assert!(matches("a.out", "a.out"));
        assert!(!matches("a.out", "a.outs"));
        assert!(!matches("a.out", "xa.out"));
    }

    #[test]
    fn star_stays_inside_segment() {
        assert!(matches("*.o", "main.o"));
        assert!(!matches("*.o", "src/main.o"));
        assert!(!matches("*.o", ".o"));
    }

    #[test]
    fn double_star_crosses_segments() {
        assert!(matches("/p/**.o", "/p/src/deep/main.o"));
        assert!(matches("/p/build/**", "/p/build/"));
        assert!(!matches("/p/**.o", "/q/main.o"));
    }

    #[test]
    fn empty_pattern_fails_to_compile() {
        assert!(matches!(
            ExclusionPattern::compile("  "),
            Err(PatternError::Empty)
        ));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        assert!(matches("a+b(1).o", "a+b(1).o"));
        assert!(!matches("a.o", "abo"));
        assert!(matches("[x]*", "[x]y"));
    }

    #[test]
    fn repeated_double_stars_match_in_linear_time() {
        let pattern = ExclusionPattern::compile("/**a**a**a**a**a**a**b").unwrap();
        let path = format!("/{}", "a".repeat(5000));
        let started = std::time::Instant::now();
        assert!(!pattern.matches(&path));
        assert!(pattern.matches(&format!("{path}b")));
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
    }

    #[test]
    fn tokenizer_splits_wildcards() {
        assert_eq!(
            tokenize("src/**/*.o"),
            vec![
                Token::Literal("src/".to_string()),
                Token::DoubleStar,
                Token::Literal("/".to_string()),
                Token::Star,
                Token::Literal(".o".to_string()),
            ]
        );
    }

    #[test]
    fn ignore_file_strips_comments_and_blanks() {
        let dir = Path::new("/project");
        let patterns = parse_ignore_file(dir, "# build output\n*.o # objects\n\n   \nbin/app\n");
        let sources: Vec<&str> = patterns.iter().map(ExclusionPattern::as_str).collect();
        assert_eq!(sources, vec!["*.o", "/project/bin/app"]);
    }

    #[test]
    fn anchored_patterns_are_normalized() {
        let dir = Path::new("/project/sub");
        let patterns = parse_ignore_file(dir, "/out/../a.out\n./lib/*.a\n");
        let sources: Vec<&str> = patterns.iter().map(ExclusionPattern::as_str).collect();
        assert_eq!(sources, vec!["/project/sub/a.out", "/project/sub/lib/*.a"]);
    }

    #[test]
    fn set_matches_file_name_or_full_path() {
        let set = ExclusionSet::new().with_ignore_file(Path::new("/p"), "*.o\nbin/tool\n");
        assert_eq!(set.len(), 2);
        assert!(set.is_excluded(Path::new("/p/deep/x.o")));
        assert!(set.is_excluded(Path::new("/p/bin/tool")));
        assert!(!set.is_excluded(Path::new("/p/other/tool")));
    }

    #[test]
    fn nested_sets_inherit_parent_patterns() {
        let parent = ExclusionSet::new().with_ignore_file(Path::new("/p"), "*.o\n");
        let child = parent.with_ignore_file(Path::new("/p/sub"), "*.a\n");
        assert_eq!(parent.len(), 1);
        assert!(child.is_excluded(Path::new("/p/sub/x.o")));
        assert!(child.is_excluded(Path::new("/p/sub/x.a")));
    }
}
