//! Linear scanner extracting function definitions from raw C text.
//!
//! Candidates start only at the beginning of a line. A signature is a run of
//! type words separated by one or two spaces, a pointer marker made of `*`
//! and spaces, the function name and `(`. The parameter list runs to the
//! first `)` and may not contain `{`, so parameters holding parentheses
//! (function pointers) are not recognized. The body is delimited by brace
//! depth, ignoring braces inside strings, character literals and comments.
//!
//! Matching braces are resolved in a single pass over the text before any
//! candidate is tried, so scanning stays linear on unbalanced input.

use cnorm_core::utils::LineIndex;
use std::collections::HashMap;

/// One function definition found in a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRecord<'a> {
    /// Function name.
    pub name: &'a str,
    /// Stars and spaces between the last type word and the name.
    pub pointer_marker: &'a str,
    /// Text between the parentheses.
    pub parameters_text: &'a str,
    /// Whitespace between `)` and `{`.
    pub separator: &'a str,
    /// Text between the body braces.
    pub body_text: &'a str,
    /// Line where the parameter list begins.
    pub signature_end_line: usize,
    /// Line of the opening brace.
    pub body_start_line: usize,
    /// Line of the closing brace.
    pub body_end_line: usize,
    /// Whether the body holds a `//` or `/* */` comment.
    pub has_comment: bool,
    /// Offset where the match begins, including the line break before it.
    pub match_start: usize,
    /// Offset just past the closing brace.
    pub match_end: usize,
}

impl FunctionRecord<'_> {
    /// Body lines strictly between the brace lines.
    #[must_use]
    pub fn body_line_span(&self) -> usize {
        self.body_end_line
            .saturating_sub(self.body_start_line)
            .saturating_sub(1)
    }
}

/// Iterator over the function definitions of a text, in order.
#[derive(Debug, Clone)]
pub struct FunctionScanner<'a> {
    text: &'a str,
    lines: LineIndex<'a>,
    braces: BraceMap,
    next_start: Option<usize>,
    // Last parameter start looked up, with the first `)` or `{` after it.
    parameter_stop: Option<(usize, Option<usize>)>,
}

impl<'a> FunctionScanner<'a> {
    /// Scans `text` from the beginning.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            lines: LineIndex::new(text),
            braces: BraceMap::new(text.as_bytes()),
            next_start: Some(0),
            parameter_stop: None,
        }
    }

    /// Next line start at or after `from` that is preceded by `\n`.
    fn line_start_after(&self, from: usize) -> Option<usize> {
        self.text
            .get(from..)?
            .find('\n')
            .map(|i| from + i + 1)
    }

    /// First `)` or `{` at or after `from`. Starts only move forward, so
    /// each byte is examined once across the whole scan.
    fn parameter_stop(&mut self, from: usize) -> Option<usize> {
        if let Some((cached_from, stop)) = self.parameter_stop {
            if cached_from <= from && stop.map_or(true, |stop| stop >= from) {
                return stop;
            }
        }
        let stop = self.text.as_bytes()[from..]
            .iter()
            .position(|&b| b == b')' || b == b'{')
            .map(|i| from + i);
        self.parameter_stop = Some((from, stop));
        stop
    }

    fn record_at(&mut self, start: usize) -> Option<FunctionRecord<'a>> {
        let text = self.text;
        let bytes = text.as_bytes();

        let signature = parse_signature(text, start)?;
        let params_start = signature.open_paren + 1;

        let close_paren = self.parameter_stop(params_start)?;
        if bytes[close_paren] != b')' {
            return None;
        }

        let sep_start = close_paren + 1;
        let open_brace = skip_separator(text, sep_start);
        if bytes.get(open_brace) != Some(&b'{') {
            return None;
        }

        let body = self.braces.body(open_brace)?;

        Some(FunctionRecord {
            name: signature.name,
            pointer_marker: signature.pointer_marker,
            parameters_text: &text[params_start..close_paren],
            separator: &text[sep_start..open_brace],
            body_text: &text[open_brace + 1..body.close],
            signature_end_line: self.lines.line_of(params_start),
            body_start_line: self.lines.line_of(open_brace),
            body_end_line: self.lines.line_of(body.close),
            has_comment: body.has_comment,
            match_start: start.saturating_sub(1),
            match_end: body.close + 1,
        })
    }
}

impl<'a> Iterator for FunctionScanner<'a> {
    type Item = FunctionRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut start = self.next_start?;
        loop {
            if let Some(record) = self.record_at(start) {
                self.next_start = self.line_start_after(record.match_end);
                return Some(record);
            }
            match self.line_start_after(start) {
                Some(next) => start = next,
                None => {
                    self.next_start = None;
                    return None;
                }
            }
        }
    }
}

/// Returns the function definitions of `text`.
#[must_use]
pub fn scan_functions(text: &str) -> Vec<FunctionRecord<'_>> {
    FunctionScanner::new(text).collect()
}

struct Signature<'a> {
    name: &'a str,
    pointer_marker: &'a str,
    open_paren: usize,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn take_while_from(text: &str, from: usize, pred: impl Fn(char) -> bool) -> usize {
    text[from..]
        .char_indices()
        .find(|&(_, c)| !pred(c))
        .map_or(text.len(), |(i, _)| from + i)
}

/// Parses `word (sep word)* marker name (` starting exactly at `start`.
fn parse_signature(text: &str, start: usize) -> Option<Signature<'_>> {
    let mut pos = take_while_from(text, start, is_word_char);
    if pos == start {
        return None;
    }

    // Separators seen so far, each followed by a word.
    let mut separators: Vec<&str> = Vec::new();
    let mut name_start;
    loop {
        let sep_end = take_while_from(text, pos, |c| c == '*' || c == ' ');
        if sep_end == pos {
            return None;
        }
        let word_end = take_while_from(text, sep_end, is_word_char);
        if word_end == sep_end {
            return None;
        }
        separators.push(&text[pos..sep_end]);
        name_start = sep_end;
        pos = word_end;

        match text[pos..].chars().next() {
            Some('(') => break,
            Some('*' | ' ') => continue,
            _ => return None,
        }
    }

    let (&marker, type_separators) = separators.split_last()?;
    if !type_separators.iter().all(|s| *s == " " || *s == "  ") {
        return None;
    }
    Some(Signature {
        name: &text[name_start..pos],
        pointer_marker: marker,
        open_paren: pos,
    })
}

/// Skips blanks, line breaks and escaped line breaks.
fn skip_separator(text: &str, from: usize) -> usize {
    let bytes = text.as_bytes();
    let mut pos = from;
    loop {
        match bytes.get(pos) {
            Some(b'\\') if matches!(bytes.get(pos + 1), Some(b'\r' | b'\n')) => pos += 2,
            Some(_) => match text[pos..].chars().next() {
                Some(c) if c.is_whitespace() => pos += c.len_utf8(),
                _ => return pos,
            },
            None => return pos,
        }
    }
}

struct Body {
    close: usize,
    has_comment: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    LineComment,
    BlockComment,
    Str,
    Char,
}

/// Matching braces and comment starts of a whole text.
#[derive(Debug, Clone, Default)]
struct BraceMap {
    closes: HashMap<usize, usize>,
    comment_starts: Vec<usize>,
}

impl BraceMap {
    /// Pairs every `{` in code with its `}`. Unmatched braces are left out.
    fn new(bytes: &[u8]) -> Self {
        let mut map = Self::default();
        let mut open: Vec<usize> = Vec::new();
        let mut state = State::Code;
        let mut pos = 0;

        while pos < bytes.len() {
            let b = bytes[pos];
            let next = bytes.get(pos + 1).copied();
            match state {
                State::Code => match b {
                    b'/' if next == Some(b'/') => {
                        state = State::LineComment;
                        map.comment_starts.push(pos);
                        pos += 1;
                    }
                    b'/' if next == Some(b'*') => {
                        state = State::BlockComment;
                        map.comment_starts.push(pos);
                        pos += 1;
                    }
                    b'"' => state = State::Str,
                    b'\'' => state = State::Char,
                    b'{' => open.push(pos),
                    b'}' => {
                        if let Some(start) = open.pop() {
                            map.closes.insert(start, pos);
                        }
                    }
                    _ => {}
                },
                State::LineComment => {
                    if b == b'\n' {
                        state = State::Code;
                    }
                }
                State::BlockComment => {
                    if b == b'*' && next == Some(b'/') {
                        state = State::Code;
                        pos += 1;
                    }
                }
                State::Str | State::Char => {
                    let quote = if state == State::Str { b'"' } else { b'\'' };
                    if b == b'\\' {
                        pos += 1;
                    } else if b == quote || b == b'\n' {
                        state = State::Code;
                    }
                }
            }
            pos += 1;
        }

        map
    }

    /// The body opened by the `{` at `open`, if it is closed.
    fn body(&self, open: usize) -> Option<Body> {
        let close = *self.closes.get(&open)?;
        let first = self.comment_starts.partition_point(|&c| c <= open);
        let has_comment = self
            .comment_starts
            .get(first)
            .is_some_and(|&c| c < close);
        Some(Body { close, has_comment })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_definition() {
        let text = "int main(void)\n{\n    return 0;\n}\n";
        let records = scan_functions(text);
        assert_eq!(records.len(), 1);
        let f = &records[0];
        assert_eq!(f.name, "main");
        assert_eq!(f.pointer_marker, " ");
        assert_eq!(f.parameters_text, "void");
        assert_eq!(f.separator, "\n");
        assert_eq!(f.body_text, "\n    return 0;\n");
        assert_eq!(f.signature_end_line, 1);
        assert_eq!(f.body_start_line, 2);
        assert_eq!(f.body_end_line, 4);
        assert_eq!(f.body_line_span(), 1);
        assert_eq!(f.match_start, 0);
    }

    #[test]
    fn qualifiers_and_pointer_marker() {
        let text = "static const char *get_name(int id)\n{\n}\n";
        let f = &scan_functions(text)[0];
        assert_eq!(f.name, "get_name");
        assert_eq!(f.pointer_marker, " *");

        let text = "char* dup(char const *s)\n{\n}\n";
        let f = &scan_functions(text)[0];
        assert_eq!(f.name, "dup");
        assert_eq!(f.pointer_marker, "* ");
    }

    #[test]
    fn one_line_definition() {
        let text = "int Foo(int a,int b,int c,int d,int e){return 0;}";
        let f = &scan_functions(text)[0];
        assert_eq!(f.name, "Foo");
        assert_eq!(f.separator, "");
        assert_eq!(f.body_text, "return 0;");
        assert_eq!(f.body_line_span(), 0);
    }

    #[test]
    fn indented_or_untyped_lines_are_not_candidates() {
        assert!(scan_functions("    int f(void)\n{\n}\n").is_empty());
        assert!(scan_functions("main(void)\n{\n}\n").is_empty());
        assert!(scan_functions("int\tf(void)\n{\n}\n").is_empty());
    }

    #[test]
    fn prototypes_are_skipped() {
        let text = "int f(void);\nint g(void)\n{\n}\n";
        let records = scan_functions(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "g");
        assert_eq!(records[0].match_start, 12);
    }

    #[test]
    fn star_between_type_words_is_rejected() {
        assert!(scan_functions("int *const f(void)\n{\n}\n").is_empty());
    }

    #[test]
    fn function_pointer_parameters_are_a_blind_spot() {
        let text = "void apply(int (*fn)(int))\n{\n}\n";
        assert!(scan_functions(text).is_empty());
    }

    #[test]
    fn braces_in_strings_and_comments_do_not_close() {
        let text = "int f(void)\n{\n    char *s = \"}\";\n    char c = '}';\n    /* } */\n    return 0;\n}\nint g(void)\n{\n}\n";
        let records = scan_functions(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].body_end_line, 7);
        assert!(records[0].has_comment);
        assert!(!records[1].has_comment);
    }

    #[test]
    fn nested_blocks() {
        let text = "int f(int a)\n{\n    if (a) {\n        return 1;\n    }\n    return 0;\n}\n";
        let f = &scan_functions(text)[0];
        assert_eq!(f.body_end_line, 7);
        assert_eq!(f.body_line_span(), 4);
    }

    #[test]
    fn unbalanced_input_scans_in_linear_time() {
        let text = "int f(void)\n{\n".repeat(20_000);
        let started = std::time::Instant::now();
        assert!(scan_functions(&text).is_empty());
        let text = "int f(\n".repeat(20_000);
        assert!(scan_functions(&text).is_empty());
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }

    #[test]
    fn stray_closing_brace_does_not_break_later_bodies() {
        let text = "}\nint f(void)\n{\n    // note\n}\nint g(void)\n{\n}\n";
        let records = scan_functions(text);
        assert_eq!(records.len(), 2);
        assert!(records[0].has_comment);
        assert!(!records[1].has_comment);
    }

    #[test]
    fn unclosed_body_yields_nothing() {
        assert!(scan_functions("int f(void)\n{\n    return 0;\n").is_empty());
    }

    #[test]
    fn crlf_counts_one_line() {
        let text = "int f(void)\r\n{\r\n    return 0;\r\n}\r\n";
        let f = &scan_functions(text)[0];
        assert_eq!(f.body_start_line, 2);
        assert_eq!(f.body_end_line, 4);
        assert_eq!(f.separator, "\r\n");
    }

    #[test]
    fn escaped_newline_separator() {
        let text = "int f(void) \\\n{\n}\n";
        let f = &scan_functions(text)[0];
        assert_eq!(f.separator, " \\\n");
    }

    #[test]
    fn multiline_parameters() {
        let text = "int f(int a,\n      int b)\n{\n}\n";
        let f = &scan_functions(text)[0];
        assert_eq!(f.parameters_text, "int a,\n      int b");
        assert_eq!(f.signature_end_line, 1);
        assert_eq!(f.body_start_line, 3);
    }
}
