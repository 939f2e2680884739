//! File-name conventions used during directory traversal.

use super::compile_static;
use regex::Regex;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

/// Leading bytes of an ELF binary.
pub const ELF_MAGIC: &[u8; 4] = b"\x7fELF";

fn unwanted_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile_static(r"^vgcore\.|\.(o|a|so|d|gcda|gcno|swp|elf|obj)$|^#.*#$|~$"))
}

fn source_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile_static(r"^[a-z][a-z_0-9]*\.(c|h)$"))
}

/// Returns true for `.c` and `.h` file names.
#[must_use]
pub fn is_c_source_name(name: &str) -> bool {
    name.ends_with(".c") || name.ends_with(".h")
}

/// Returns true for build-description files (`Makefile`, any case).
#[must_use]
pub fn is_build_file_name(name: &str) -> bool {
    name.eq_ignore_ascii_case("makefile")
}

/// Checks a C file name against `^[a-z][a-z_0-9]*\.(c|h)$`.
#[must_use]
pub fn is_snake_case_source_name(name: &str) -> bool {
    source_name_regex().is_match(name)
}

/// Checks that a directory name starts with a lowercase ASCII letter.
///
/// Only the first character is inspected.
#[must_use]
pub fn is_snake_case_dir_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_lowercase())
}

/// Returns true for build artefacts and editor leftovers.
#[must_use]
pub fn is_unwanted_name(name: &str) -> bool {
    unwanted_name_regex().is_match(name)
}

/// Checks whether the file at `path` starts with the ELF magic.
///
/// # Errors
///
/// Returns the I/O error if the file cannot be opened or read.
pub fn is_elf(path: &Path) -> std::io::Result<bool> {
    let mut magic = [0_u8; 4];
    let mut file = std::fs::File::open(path)?;
    match file.read_exact(&mut magic) {
        Ok(()) => Ok(&magic == ELF_MAGIC),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_names() {
        assert!(is_snake_case_source_name("my_file2.c"));
        assert!(is_snake_case_source_name("a.h"));
        assert!(!is_snake_case_source_name("MyFile.c"));
        assert!(!is_snake_case_source_name("2file.c"));
        assert!(!is_snake_case_source_name("my-file.c"));
    }

    #[test]
    fn dir_names_check_first_char_only() {
        assert!(is_snake_case_dir_name("src"));
        assert!(is_snake_case_dir_name("lib-Extra"));
        assert!(!is_snake_case_dir_name("Src"));
        assert!(!is_snake_case_dir_name(""));
    }

    #[test]
    fn unwanted_names() {
        for name in ["main.o", "libmy.a", "vgcore.1234", "#notes#", "file.c~", "x.gcno"] {
            assert!(is_unwanted_name(name), "{name}");
        }
        for name in ["main.c", "README.md", "notes#", "vgcore"] {
            assert!(!is_unwanted_name(name), "{name}");
        }
    }

    #[test]
    fn build_file_names() {
        assert!(is_build_file_name("Makefile"));
        assert!(is_build_file_name("makefile"));
        assert!(!is_build_file_name("Makefile.am"));
    }

    #[test]
    fn elf_detection_reads_magic() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("a.out");
        std::fs::write(&bin, b"\x7fELF\x02\x01").unwrap();
        let short = dir.path().join("tiny");
        std::fs::write(&short, b"\x7f").unwrap();
        assert!(is_elf(&bin).unwrap());
        assert!(!is_elf(&short).unwrap());
    }
}
