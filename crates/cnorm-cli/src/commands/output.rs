//! Shared output formatting for lint results.

use anyhow::Result;
use cnorm_core::{Diagnostic, DiagnosticReport, LintResult, SeverityColor, STDIN_IDENTIFIER};
use miette::{GraphicalReportHandler, GraphicalTheme};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::collections::HashMap;

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `stdin_text` is the piped input, used by the rich format to quote
/// diagnostics reported against `stdin`.
///
/// # Errors
///
/// Returns an error if JSON serialization or report rendering fails.
pub fn print(
    result: &LintResult,
    format: OutputFormat,
    stdin_text: Option<&str>,
    use_color: bool,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for diagnostic in &result.diagnostics {
                println!("{}", text_line(diagnostic));
            }
        }
        OutputFormat::Json => println!("{}", json(result)?),
        OutputFormat::Rich => print_rich(result, stdin_text, use_color)?,
    }
    Ok(())
}

/// One diagnostic line, painted when the diagnostic carries a color.
fn text_line(diagnostic: &Diagnostic) -> String {
    let line = diagnostic.to_string();
    match diagnostic.color {
        None => line,
        Some(SeverityColor::BrightRed) => line.bright_red().to_string(),
        Some(SeverityColor::BrightGreen) => line.bright_green().to_string(),
        Some(SeverityColor::BrightBlue) => line.bright_blue().to_string(),
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files_checked: usize,
    major: usize,
    minor: usize,
    info: usize,
    diagnostics: &'a [Diagnostic],
}

fn json(result: &LintResult) -> Result<String> {
    let (major, minor, info) = result.count_by_severity();
    let report = JsonReport {
        files_checked: result.files_checked,
        major,
        minor,
        info,
        diagnostics: &result.diagnostics,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn print_rich(result: &LintResult, stdin_text: Option<&str>, use_color: bool) -> Result<()> {
    let theme = if use_color {
        GraphicalTheme::unicode()
    } else {
        GraphicalTheme::unicode_nocolor()
    };
    let handler = GraphicalReportHandler::new_themed(theme);
    let mut sources: HashMap<&str, String> = HashMap::new();

    for diagnostic in &result.diagnostics {
        let source = if diagnostic.line.is_some() {
            sources
                .entry(diagnostic.unit_identifier.as_str())
                .or_insert_with(|| load_source(&diagnostic.unit_identifier, stdin_text))
                .as_str()
        } else {
            ""
        };
        let report = DiagnosticReport::new(diagnostic, source);
        let mut rendered = String::new();
        handler.render_report(&mut rendered, &report)?;
        println!("{rendered}");
    }
    Ok(())
}

fn load_source(identifier: &str, stdin_text: Option<&str>) -> String {
    if identifier == STDIN_IDENTIFIER {
        if let Some(text) = stdin_text {
            return text.to_string();
        }
    }
    match std::fs::read(identifier) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(error) => {
            tracing::warn!("Cannot quote {}: {}", identifier, error);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnorm_core::Severity;

    fn diagnostic(color: Option<SeverityColor>) -> Diagnostic {
        Diagnostic {
            unit_identifier: STDIN_IDENTIFIER.to_string(),
            line: Some(2),
            rule_code: "F2".to_string(),
            description: "function name should be in snake_case".to_string(),
            severity: Severity::Major,
            color,
        }
    }

    #[test]
    fn plain_text_line() {
        assert_eq!(
            text_line(&diagnostic(None)),
            "stdin:2::F2 - function name should be in snake_case (major)"
        );
    }

    #[test]
    fn colored_text_line() {
        let line = text_line(&diagnostic(Some(SeverityColor::BrightRed)));
        assert!(line.starts_with("\u{1b}[91m"));
        assert!(line.contains("stdin:2::F2"));
    }

    #[test]
    fn json_carries_counts() {
        let mut result = LintResult::new();
        result.files_checked = 1;
        result.diagnostics.push(diagnostic(None));
        let value: serde_json::Value = serde_json::from_str(&json(&result).unwrap()).unwrap();
        assert_eq!(value["files_checked"], 1);
        assert_eq!(value["major"], 1);
        assert_eq!(value["minor"], 0);
        assert_eq!(value["diagnostics"][0]["rule_code"], "F2");
        assert_eq!(value["diagnostics"][0]["severity"], "major");
        assert!(value["diagnostics"][0].get("color").is_none());
    }

    #[test]
    fn stdin_source_is_quoted() {
        assert_eq!(load_source(STDIN_IDENTIFIER, Some("int x;\n")), "int x;\n");
        assert_eq!(load_source("/nonexistent/a.c", None), "");
    }
}
