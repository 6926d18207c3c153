//! Command dispatch module for routing CLI commands to their handlers.
//!
//! Commands fall in two groups: standalone commands (config, completions,
//! help) that run without a task file, and file commands that need the loaded
//! config and a parsed task file.

use chrono::NaiveDate;

use crate::cli::{Cli, Commands, ConfigCommands, Shell};
use crate::commands::config::Config;
use crate::commands::groups::GroupKind;
use crate::commands::list::ListOptions;
use crate::commands::{self, CommandContext, CommandError, Result};
use crate::task_file::TaskFile;

/// Trait for commands that run without a task file.
pub trait StandaloneCommand {
    /// Execute the command.
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Trait for commands that work on a task file.
pub trait FileCommand {
    /// Execute the command against a parsed task file.
    fn execute(&self, ctx: &CommandContext, file: &TaskFile, config: &Config) -> Result<()>;
}

/// Commands that don't need a task file.
pub enum StandaloneDispatch<'a> {
    Config(&'a Option<ConfigCommands>),
    Completions(&'a Shell),
    Help,
}

impl<'a> StandaloneDispatch<'a> {
    /// Try to create a standalone dispatch from the CLI command.
    /// Returns None if the command needs a task file.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            Some(Commands::Completions { shell }) => Some(Self::Completions(shell)),
            None => Some(Self::Help),
            _ => None,
        }
    }
}

impl StandaloneCommand for StandaloneDispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("tmd - todo.md task files from the command line");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Init { force }) => commands::config::execute_init(ctx, *force),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
    }
}

/// Commands that work on a task file.
pub enum FileDispatch {
    List(ListOptions),
    Tree,
    Groups { kind: GroupKind, by_count: bool },
    Next { limit: usize },
    Toggle { line: usize },
    Archive,
    ResetRecurring { since: Option<NaiveDate> },
}

impl FileDispatch {
    /// Create a file dispatch from the CLI command.
    /// Returns None for standalone commands.
    pub fn from_cli(cli: &Cli) -> Option<Self> {
        let dispatch = match cli.command.as_ref()? {
            Commands::List {
                filter,
                sort,
                asc,
                all,
                limit,
            } => Self::List(ListOptions {
                filter: filter.clone(),
                sort: sort.clone(),
                ascending: *asc,
                all: *all,
                limit: *limit,
            }),
            Commands::Tree => Self::Tree,
            Commands::Tags { by_count } => Self::groups(GroupKind::Tags, *by_count),
            Commands::Projects { by_count } => Self::groups(GroupKind::Projects, *by_count),
            Commands::Contexts { by_count } => Self::groups(GroupKind::Contexts, *by_count),
            Commands::Next { limit } => Self::Next { limit: *limit },
            Commands::Toggle { line } => Self::Toggle {
                line: usize::try_from(*line).unwrap_or(usize::MAX),
            },
            Commands::Archive => Self::Archive,
            Commands::ResetRecurring { since } => Self::ResetRecurring { since: *since },
            Commands::Config { .. } | Commands::Completions { .. } => return None,
        };
        Some(dispatch)
    }

    fn groups(kind: GroupKind, by_count: bool) -> Self {
        Self::Groups { kind, by_count }
    }
}

impl FileCommand for FileDispatch {
    fn execute(&self, ctx: &CommandContext, file: &TaskFile, config: &Config) -> Result<()> {
        match self {
            Self::List(opts) => commands::list::execute(ctx, opts, file, &config.view),
            Self::Tree => commands::tree::execute(ctx, file),
            Self::Groups { kind, by_count } => {
                commands::groups::execute(ctx, *kind, *by_count, file, &config.view)
            }
            Self::Next { limit } => commands::next::execute(ctx, *limit, file),
            Self::Toggle { line } => commands::toggle::execute(ctx, *line, file, config),
            Self::Archive => {
                commands::archive::execute(ctx, file, config.default_archive_file.as_deref())
            }
            Self::ResetRecurring { since } => {
                commands::reset::execute(ctx, *since, file, &config.edit_config())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_standalone_commands() {
        let cli = Cli::parse_from(["tmd", "config", "path"]);
        assert!(matches!(
            StandaloneDispatch::try_from_cli(&cli),
            Some(StandaloneDispatch::Config(_))
        ));
        assert!(FileDispatch::from_cli(&cli).is_none());

        let cli = Cli::parse_from(["tmd"]);
        assert!(matches!(
            StandaloneDispatch::try_from_cli(&cli),
            Some(StandaloneDispatch::Help)
        ));
    }

    #[test]
    fn test_file_commands() {
        let cli = Cli::parse_from(["tmd", "list", "--asc", "--limit", "3"]);
        assert!(StandaloneDispatch::try_from_cli(&cli).is_none());
        match FileDispatch::from_cli(&cli) {
            Some(FileDispatch::List(opts)) => {
                assert!(opts.ascending);
                assert_eq!(opts.limit, Some(3));
            }
            _ => panic!("Expected List dispatch"),
        }

        let cli = Cli::parse_from(["tmd", "contexts", "--by-count"]);
        assert!(matches!(
            FileDispatch::from_cli(&cli),
            Some(FileDispatch::Groups {
                kind: GroupKind::Contexts,
                by_count: true
            })
        ));

        let cli = Cli::parse_from(["tmd", "toggle", "12"]);
        assert!(matches!(
            FileDispatch::from_cli(&cli),
            Some(FileDispatch::Toggle { line: 12 })
        ));
    }
}
