//! Check command implementation.

use anyhow::{Context, Result};
use cnorm_core::{Analyzer, Config, Configuration, ConfigurationBuilder};
use cnorm_rules::all_checkers;
use std::io::Read;
use std::path::Path;

use crate::config_resolver::{self, ConfigOrigin};
use crate::{CheckArgs, OutputFormat};

/// Runs the check command.
///
/// # Errors
///
/// Returns an error when the configuration file cannot be loaded, the
/// target does not exist, or standard input cannot be read.
pub fn run(args: &CheckArgs, config_path: Option<&Path>) -> Result<()> {
    let origin = config_resolver::resolve(&args.path, config_path);
    let file = load_config(&origin)?;
    let no_color_env = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    let config = configuration(args, file.as_ref(), no_color_env);

    let analyzer = Analyzer::builder()
        .config(config)
        .checkers(all_checkers())
        .build();

    tracing::debug!(
        "Checking {} with {} checkers (style {})",
        args.path.display(),
        analyzer.checker_count(),
        analyzer.config().style_version()
    );

    let (result, stdin_text) = if args.reads_stdin() {
        let text = read_stdin()?;
        (analyzer.check_stdin(&text), Some(text))
    } else {
        (analyzer.analyze(&args.path)?, None)
    };

    super::output::print(
        &result,
        args.format,
        stdin_text.as_deref(),
        analyzer.config().use_color(),
    )
}

fn load_config(origin: &ConfigOrigin) -> Result<Option<Config>> {
    let Some(path) = origin.file() else {
        return Ok(None);
    };
    if origin.is_per_user() {
        tracing::info!("Using per-user config: {}", path.display());
    }
    let config = Config::from_file(path)
        .with_context(|| format!("Failed to load config: {}", path.display()))?;
    Ok(Some(config))
}

/// Layers the command line over the configuration file over the defaults.
fn configuration(args: &CheckArgs, file: Option<&Config>, no_color_env: bool) -> Configuration {
    let mut builder = file.map_or_else(ConfigurationBuilder::new, ConfigurationBuilder::from_file);

    if let Some(style) = args.style {
        builder = builder.style_version(style);
    }
    if args.strict {
        builder = builder.strict(true);
    }
    if args.no_color || no_color_env || args.format == OutputFormat::Json {
        builder = builder.use_color(false);
    }
    if args.no_gitignore {
        builder = builder.honor_gitignore(false);
    }
    if args.stdin_header {
        builder = builder.stdin_is_header(true);
    }

    builder
        .suppress_all(args.suppressed.iter().map(|code| code.as_str()))
        .allow_syscalls(args.allowed.iter().cloned())
        .disallow_syscalls(args.disallowed.iter().cloned())
        .build()
}

fn read_stdin() -> Result<String> {
    let mut bytes = Vec::new();
    std::io::stdin()
        .read_to_end(&mut bytes)
        .context("Failed to read standard input")?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use cnorm_core::StyleVersion;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: CheckArgs,
    }

    fn args(argv: &[&str]) -> CheckArgs {
        let argv = std::iter::once("cnorm").chain(argv.iter().copied());
        Harness::parse_from(argv).args
    }

    #[test]
    fn defaults_without_file() {
        let config = configuration(&args(&[]), None, false);
        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn command_line_overrides_file() {
        let file = Config::parse(
            "style = \"2020\"\nstrict = false\nsuppress = [\"F6\"]\n[syscalls]\nallowed = [\"write\"]\n",
        )
        .unwrap();
        let config = configuration(
            &args(&["--cs", "2021", "--strict", "--no", "C1", "--allowed", "malloc,free"]),
            Some(&file),
            false,
        );
        assert_eq!(config.style_version(), StyleVersion::Cs2021);
        assert!(config.is_strict());
        assert!(config.is_suppressed("F6"));
        assert!(config.is_suppressed("C1"));
        let allowed: Vec<&str> = config.allowed_syscalls().iter().map(String::as_str).collect();
        assert_eq!(allowed, vec!["free", "malloc"]);
    }

    #[test]
    fn file_values_survive_absent_flags() {
        let file = Config::parse("style = \"2020\"\ngitignore = false\n[syscalls]\ndisallowed = [\"printf\"]\n")
            .unwrap();
        let config = configuration(&args(&[]), Some(&file), false);
        assert_eq!(config.style_version(), StyleVersion::Cs2020);
        assert!(!config.honor_gitignore());
        assert!(config.disallowed_syscalls().contains("printf"));
    }

    #[test]
    fn color_switches() {
        assert!(configuration(&args(&[]), None, false).use_color());
        assert!(!configuration(&args(&["--no-color"]), None, false).use_color());
        assert!(!configuration(&args(&[]), None, true).use_color());
        assert!(!configuration(&args(&["--format", "json"]), None, false).use_color());
    }

    #[test]
    fn stdin_and_gitignore_switches() {
        let config = configuration(&args(&["-", "--stdin-h", "--no-gitignore"]), None, false);
        assert!(config.stdin_is_header());
        assert!(!config.honor_gitignore());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let origin = ConfigOrigin::Flag("/nonexistent/cnorm.toml".into());
        let error = load_config(&origin).unwrap_err();
        assert!(error.to_string().contains("/nonexistent/cnorm.toml"));
        assert!(load_config(&ConfigOrigin::Builtin).unwrap().is_none());
    }
}
