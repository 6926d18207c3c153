use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod commands;
mod dispatch;
mod output;
mod task_file;

use cli::Cli;
use commands::config::load_config;
use commands::{CommandContext, CommandError};
use dispatch::{FileCommand, FileDispatch, StandaloneCommand, StandaloneDispatch};
use task_file::{resolve_path, TaskFile};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                eprintln!("{error_json:#}");
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

/// Installs the log subscriber on stderr.
///
/// Logging is off unless `RUST_LOG` is set; `--verbose` defaults it to `debug`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "off" };
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> commands::Result<()> {
    let ctx = CommandContext::from_cli(cli);

    // Config and completions work even when the config file is broken.
    if let Some(dispatch) = StandaloneDispatch::try_from_cli(cli) {
        return dispatch.execute(&ctx);
    }

    let config = load_config()?;
    let ctx = ctx.with_config(&config);

    let Some(dispatch) = FileDispatch::from_cli(cli) else {
        return Ok(());
    };
    let path = resolve_path(cli.file.as_deref(), &config)?;
    let file = TaskFile::open(path, &config.parse)?;
    dispatch.execute(&ctx, &file, &config)
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Filter(_) => "FILTER_ERROR",
        CommandError::Sort(_) => "SORT_ERROR",
        CommandError::InvalidConfig(_) | CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::NoTaskOnLine(_) => "NO_TASK",
        CommandError::File { .. } | CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    match e {
        CommandError::Config(_) | CommandError::InvalidConfig(_) => ExitCode::from(5),
        CommandError::Sort(_) => ExitCode::from(5),
        CommandError::Filter(_) => ExitCode::from(1),
        CommandError::NoTaskOnLine(_) => ExitCode::from(1),
        CommandError::File { .. } | CommandError::Io(_) => ExitCode::from(3),
        CommandError::Json(_) => ExitCode::from(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::fs;
    use tempfile::TempDir;
    use todomd_core::config::ConfigError;
    use todomd_core::sort::SortError;

    /// Points `TMD_CONFIG` at `path` while `f` runs.
    fn with_config_path<T>(path: &std::path::Path, f: impl FnOnce() -> T) -> T {
        let original = env::var("TMD_CONFIG").ok();
        env::set_var("TMD_CONFIG", path);
        let result = f();
        match original {
            Some(value) => env::set_var("TMD_CONFIG", value),
            None => env::remove_var("TMD_CONFIG"),
        }
        result
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            error_code(&CommandError::Sort(SortError::UnsupportedProperty(
                "size".to_string()
            ))),
            "SORT_ERROR"
        );
        assert_eq!(
            error_code(&CommandError::InvalidConfig(ConfigError::ZeroTabSize)),
            "CONFIG_ERROR"
        );
        assert_eq!(error_code(&CommandError::NoTaskOnLine(3)), "NO_TASK");
    }

    #[test]
    #[serial]
    fn test_load_config_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = with_config_path(&dir.path().join("missing.toml"), load_config).unwrap();
        assert!(config.default_file.is_none());
        assert_eq!(config.parse.tab_size, 4);
    }

    #[test]
    #[serial]
    fn test_load_config_rejects_zero_tab_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[parse]\ntab_size = 0\n").unwrap();

        let err = with_config_path(&path, load_config).unwrap_err();
        assert!(matches!(
            err,
            CommandError::InvalidConfig(ConfigError::ZeroTabSize)
        ));
    }

    #[test]
    #[serial]
    fn test_load_config_reports_bad_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[parse\n").unwrap();

        let err = with_config_path(&path, load_config).unwrap_err();
        assert!(matches!(err, CommandError::Config(_)));
    }

    #[test]
    #[serial]
    fn test_run_without_task_file() {
        let dir = TempDir::new().unwrap();
        let original_file = env::var("TMD_FILE").ok();
        env::remove_var("TMD_FILE");
        let cli = Cli::parse_from(["tmd", "--quiet", "list"]);

        let result = with_config_path(&dir.path().join("missing.toml"), || run(&cli));

        if let Some(value) = original_file {
            env::set_var("TMD_FILE", value);
        }
        assert!(matches!(result, Err(CommandError::Config(_))));
    }
}
