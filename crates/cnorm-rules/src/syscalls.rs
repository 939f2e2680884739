//! Classifier for standard-library calls.
//!
//! A call is an identifier from [`CATALOG`] followed by optional blanks and
//! `(`. Each call is checked against the configured allow-list and deny-list
//! independently, so a single call may be reported twice.

use cnorm_core::Configuration;

/// Library functions recognized as calls, sorted for binary search.
pub const CATALOG: &[&str] = &[
    "abort", "abs", "acos", "aligned_alloc", "asctime", "asin", "asprintf", "assert", "atan",
    "atan2", "atexit", "atof", "atoi", "atol", "atoll", "bsearch", "bsearch_r", "calloc", "ceil",
    "clearerr", "clock", "closedir", "cos", "cosh", "ctime", "difftime", "div", "dprintf", "exit",
    "exp", "fabs", "fclose", "feof", "fflush", "fgetc", "fgetpos", "fgets", "floor", "fmod",
    "fopen", "fprintf", "fputc", "fputs", "fread", "free", "freopen", "frexp", "fscanf", "fseek",
    "fsetpos", "ftell", "fwrite", "getc", "getchar", "getenv", "getgrgid", "getpwuid", "gets",
    "gmtime", "inpunct", "isalnum", "isalpha", "iscntrl", "isdigit", "isgraph", "islower",
    "isprint", "isspace", "isupper", "isxdigit", "labs", "ldexp", "ldiv", "llabs", "lldiv",
    "localeconv", "localtime", "log", "log10", "longjmp", "lstat", "mallinfo", "malloc",
    "malloc_info", "malloc_stats", "malloc_trim", "mallopt", "mblen", "mbrk", "mbstowcs", "mbtowc",
    "memalign", "memcmp", "memcpy", "memmove", "memset", "mktime", "modf", "opendir", "perror",
    "posix_memalign", "pow", "printf", "putc", "putchar", "puts", "pvalloc", "qsort", "qsort_r",
    "raise", "rand", "readdir", "readlink", "realloc", "remove", "rename", "rewind", "sbrk",
    "scanf", "scranf", "setbuf", "setjmp", "setlocale", "setvbuf", "sigaction", "signal", "sin",
    "sinh", "snprintf", "sprintf", "sqrt", "srand", "sscanf", "stat", "strcasestr", "strcat",
    "strchr", "strcmp", "strcoll", "strcpy", "strcspn", "strdup", "strerrir", "strftime", "strlen",
    "strncasestr", "strncat", "strncmp", "strncpy", "strnlen", "strpbrk", "strrchr", "strsep",
    "strsignal", "strspn", "strstr", "strtod", "strtof", "strtoimax", "strtok", "strtok_r",
    "strtol", "strtold", "strtoll", "strtolower", "strtoq", "strtoul", "strtoull", "strtoumax",
    "strtoupper", "strtouq", "strverscmp", "strxfrm", "strxfrm_l", "system", "tan", "tanh", "time",
    "tmpfile", "tmpnam", "tolower", "toupper", "ungetc", "valloc", "vfprintf", "vprintf",
    "vsnprintf", "vsprintf", "wbrk", "wcstombs", "wctomb", "write",
];

/// Returns true if `name` is a catalogued library function.
#[must_use]
pub fn is_catalogued(name: &str) -> bool {
    CATALOG.binary_search(&name).is_ok()
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// A catalogued call found in a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyscallMatch<'a> {
    /// Called function.
    pub name: &'a str,
    /// Byte offset of the name within the line.
    pub offset: usize,
}

/// Finds catalogued calls in `line`, left to right.
///
/// The character before a call is part of its match, so a call whose
/// preceding character ended the previous match (as in `free(free(p))`) is
/// not reported separately.
#[must_use]
pub fn find_calls(line: &str) -> Vec<SyscallMatch<'_>> {
    let bytes = line.as_bytes();
    let mut found = Vec::new();
    let mut consumed = 0;
    let mut i = 0;

    while i < bytes.len() {
        if !is_word_byte(bytes[i]) {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && is_word_byte(bytes[i]) {
            i += 1;
        }
        let prefix_ok = start == 0 || start > consumed;
        let name = &line[start..i];
        if !prefix_ok || !is_catalogued(name) {
            continue;
        }
        let mut j = i;
        while j < bytes.len() && (bytes[j] == b' ' || bytes[j] == b'\t') {
            j += 1;
        }
        if bytes.get(j) == Some(&b'(') {
            found.push(SyscallMatch {
                name,
                offset: start,
            });
            consumed = j + 1;
            i = j + 1;
        }
    }

    found
}

/// Number of reports `name` earns under `config`: one for a call missing
/// from a non-empty allow-list, one for a call on the deny-list.
#[must_use]
pub fn report_count(name: &str, config: &Configuration) -> usize {
    let allowed = config.allowed_syscalls();
    let disallowed = config.disallowed_syscalls();
    let not_allowed = !allowed.is_empty() && !allowed.contains(name);
    let denied = disallowed.contains(name);
    usize::from(not_allowed) + usize::from(denied)
}
