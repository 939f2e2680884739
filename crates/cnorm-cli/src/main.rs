//! cnorm CLI tool.
//!
//! Usage:
//! ```bash
//! cnorm [check] [OPTIONS] [PATH]
//! cnorm list-rules
//! cnorm init
//! ```

use clap::{Args, Parser, Subcommand};
use cnorm_core::{RuleCode, StyleVersion};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Exit status for fatal errors: a missing target, an unreadable or
/// malformed configuration file, unreadable standard input. Diagnostics
/// never change the exit status; usage errors exit through clap with 2.
const FATAL_EXIT_CODE: u8 = 84;

/// Heuristic checker for the Epitech C coding style
#[derive(Parser, Debug)]
#[command(name = "cnorm")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    check: CheckArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a file, a directory tree, or `-` for standard input (default)
    Check(CheckArgs),

    /// List every rule with its severity and style versions
    ListRules,

    /// Write a default cnorm.toml in the current directory
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Options of the check command.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// File or directory to check, or `-` for standard input
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Coding style version (also `--cs-2020`, `--cs-2021`)
    #[arg(long = "cs", value_name = "YEAR")]
    pub style: Option<StyleVersion>,

    /// Report strict-only rules
    #[arg(short, long)]
    pub strict: bool,

    /// Suppress a rule code (also `--no-<CODE>`), repeatable
    #[arg(long = "no", value_name = "CODE")]
    pub suppressed: Vec<RuleCode>,

    /// Only these library calls are allowed (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "CALLS")]
    pub allowed: Vec<String>,

    /// These library calls are reported (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "CALLS")]
    pub disallowed: Vec<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Do not read .gitignore files
    #[arg(long)]
    pub no_gitignore: bool,

    /// Treat standard input as a header file
    #[arg(long = "stdin-h")]
    pub stdin_header: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

impl CheckArgs {
    /// Whether the target is standard input.
    #[must_use]
    pub fn reads_stdin(&self) -> bool {
        self.path == Path::new("-")
    }
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One `file:line::CODE - description (severity)` line per diagnostic.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
    /// Graphical reports with source snippets.
    Rich,
}

/// Rewrites the attached flag spellings `--no-<CODE>` and `--cs-<YEAR>`
/// into `--no=<CODE>` and `--cs=<YEAR>`.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut after_separator = false;
    args.into_iter()
        .map(|arg| {
            if after_separator {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                after_separator = true;
                return arg;
            }
            if let Some(code) = text.strip_prefix("--no-") {
                if code != "color" && code != "gitignore" && !code.is_empty() {
                    return OsString::from(format!("--no={code}"));
                }
            }
            if let Some(year) = text.strip_prefix("--cs-") {
                return OsString::from(format!("--cs={year}"));
            }
            arg
        })
        .collect()
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Check(args)) => commands::check::run(&args, cli.config.as_deref()),
        None => commands::check::run(&cli.check, cli.config.as_deref()),
        Some(Commands::ListRules) => {
            commands::list_rules::run();
            Ok(())
        }
        Some(Commands::Init { force }) => commands::init::run(force),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        // Config load failures land here too and share the fatal status.
        Err(error) => {
            eprintln!("cnorm: {error:#}");
            ExitCode::from(FATAL_EXIT_CODE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        let args = normalize_args(args.iter().map(OsString::from));
        Cli::try_parse_from(args)
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn normalizes_attached_flags() {
        let args: Vec<OsString> = ["cnorm", "--no-F2", "--cs-2020", "--no-color", "--no-gitignore"]
            .iter()
            .map(OsString::from)
            .collect();
        assert_eq!(
            normalize_args(args),
            vec!["cnorm", "--no=F2", "--cs=2020", "--no-color", "--no-gitignore"]
        );
    }

    #[test]
    fn separator_stops_rewriting() {
        let args: Vec<OsString> = ["cnorm", "--", "--no-F2"].iter().map(OsString::from).collect();
        assert_eq!(normalize_args(args), vec!["cnorm", "--", "--no-F2"]);
    }

    #[test]
    fn check_is_the_default_command() {
        let cli = parse(&["cnorm", "src", "--no-F6", "--no", "C1", "--cs-2020", "-s"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.check.path, PathBuf::from("src"));
        assert_eq!(cli.check.suppressed, vec![RuleCode::F6, RuleCode::C1]);
        assert_eq!(cli.check.style, Some(StyleVersion::Cs2020));
        assert!(cli.check.strict);
    }

    #[test]
    fn explicit_check_subcommand() {
        let cli = parse(&["cnorm", "check", "-", "--stdin-h", "--format", "json"]).unwrap();
        let Some(Commands::Check(args)) = cli.command else {
            panic!("expected check");
        };
        assert!(args.reads_stdin());
        assert!(args.stdin_header);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn syscall_lists_are_comma_separated() {
        let cli = parse(&["cnorm", "--allowed", "malloc,free", "--disallowed=write"]).unwrap();
        assert_eq!(cli.check.allowed, vec!["malloc", "free"]);
        assert_eq!(cli.check.disallowed, vec!["write"]);
        assert_eq!(cli.check.path, PathBuf::from("."));
    }

    #[test]
    fn usage_errors() {
        assert!(parse(&["cnorm", "a", "b"]).is_err());
        assert!(parse(&["cnorm", "--no-Z9"]).is_err());
        assert!(parse(&["cnorm", "--cs-2019"]).is_err());
        assert!(parse(&["cnorm", "--unknown"]).is_err());
    }

    #[test]
    fn other_subcommands() {
        assert!(matches!(
            parse(&["cnorm", "list-rules"]).unwrap().command,
            Some(Commands::ListRules)
        ));
        assert!(matches!(
            parse(&["cnorm", "init", "--force"]).unwrap().command,
            Some(Commands::Init { force: true })
        ));
    }
}
