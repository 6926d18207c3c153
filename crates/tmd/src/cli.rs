//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the tmd CLI.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

/// tmd - Work with todo.md task files from the command line
#[derive(Parser, Debug)]
#[command(name = "tmd")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Task file (default: `default_file` from the config)
    #[arg(long, global = true, env = "TMD_FILE")]
    pub file: Option<PathBuf>,

    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tasks
    #[command(alias = "l", alias = "ls")]
    List {
        /// Filter expression (e.g., "#work & !$done")
        #[arg(short, long)]
        filter: Option<String>,

        /// Sort by property (priority, project, not-due, overdue, creation-date, completion-date)
        #[arg(short, long)]
        sort: Option<String>,

        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,

        /// Include completed tasks
        #[arg(short, long)]
        all: bool,

        /// Show at most this many tasks
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show tasks as an indentation tree
    #[command(alias = "t")]
    Tree,

    /// Group tasks by tag
    Tags {
        /// Largest groups first
        #[arg(long)]
        by_count: bool,
    },

    /// Group tasks by project
    #[command(alias = "p")]
    Projects {
        /// Largest groups first
        #[arg(long)]
        by_count: bool,
    },

    /// Group tasks by context
    Contexts {
        /// Largest groups first
        #[arg(long)]
        by_count: bool,
    },

    /// Show the tasks to work on next
    #[command(alias = "n")]
    Next {
        /// Number of tasks to show
        #[arg(short = 'n', long, default_value = "5")]
        limit: usize,
    },

    /// Toggle completion of the task on a line (1-based)
    #[command(alias = "d")]
    Toggle {
        /// Line number as shown by `tmd list`
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        line: u64,
    },

    /// Move completed, non-recurring tasks to the archive file
    Archive,

    /// Re-open recurring tasks and mark missed occurrences as overdue
    ResetRecurring {
        /// Date of the last visit (default: yesterday)
        #[arg(long)]
        since: Option<NaiveDate>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration (default)
    Show,

    /// Write a commented default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., parse.tab_size)
        key: String,

        /// Configuration value
        value: String,
    },

    /// Print config file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["tmd", "--verbose", "list"]);
        assert!(cli.verbose);
        assert!(!cli.quiet);
        assert!(!cli.json);

        let cli = Cli::parse_from(["tmd", "--quiet", "--json", "list"]);
        assert!(!cli.verbose);
        assert!(cli.quiet);
        assert!(cli.json);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["tmd", "-q", "-v", "list"]).is_err());
    }

    #[test]
    fn test_file_flag_after_subcommand() {
        let cli = Cli::parse_from(["tmd", "tree", "--file", "todo.md"]);
        assert_eq!(cli.file, Some(PathBuf::from("todo.md")));
    }

    #[test]
    fn test_list_alias() {
        let cli = Cli::parse_from(["tmd", "l"]);
        assert!(matches!(cli.command, Some(Commands::List { .. })));
        let cli = Cli::parse_from(["tmd", "ls"]);
        assert!(matches!(cli.command, Some(Commands::List { .. })));
    }

    #[test]
    fn test_list_with_options() {
        let cli = Cli::parse_from([
            "tmd", "list", "-f", "#work & a", "--sort", "priority", "--asc", "--all", "--limit",
            "10",
        ]);
        if let Some(Commands::List {
            filter,
            sort,
            asc,
            all,
            limit,
        }) = cli.command
        {
            assert_eq!(filter, Some("#work & a".to_string()));
            assert_eq!(sort, Some("priority".to_string()));
            assert!(asc);
            assert!(all);
            assert_eq!(limit, Some(10));
        } else {
            panic!("Expected List command");
        }
    }

    #[test]
    fn test_group_commands() {
        let cli = Cli::parse_from(["tmd", "tags", "--by-count"]);
        assert!(matches!(cli.command, Some(Commands::Tags { by_count: true })));

        let cli = Cli::parse_from(["tmd", "p"]);
        assert!(matches!(cli.command, Some(Commands::Projects { by_count: false })));
    }

    #[test]
    fn test_next_default_limit() {
        let cli = Cli::parse_from(["tmd", "next"]);
        assert!(matches!(cli.command, Some(Commands::Next { limit: 5 })));

        let cli = Cli::parse_from(["tmd", "next", "-n", "2"]);
        assert!(matches!(cli.command, Some(Commands::Next { limit: 2 })));
    }

    #[test]
    fn test_toggle_line_range() {
        assert!(Cli::try_parse_from(["tmd", "toggle", "1"]).is_ok());
        assert!(Cli::try_parse_from(["tmd", "toggle", "0"]).is_err());
        assert!(Cli::try_parse_from(["tmd", "toggle", "x"]).is_err());
    }

    #[test]
    fn test_reset_recurring_since() {
        let cli = Cli::parse_from(["tmd", "reset-recurring", "--since", "2024-01-08"]);
        if let Some(Commands::ResetRecurring { since }) = cli.command {
            assert_eq!(since, NaiveDate::from_ymd_opt(2024, 1, 8));
        } else {
            panic!("Expected ResetRecurring command");
        }

        assert!(Cli::try_parse_from(["tmd", "reset-recurring", "--since", "monday"]).is_err());
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::parse_from(["tmd", "config", "set", "parse.tab_size", "2"]);
        if let Some(Commands::Config {
            command: Some(ConfigCommands::Set { key, value }),
        }) = cli.command
        {
            assert_eq!(key, "parse.tab_size");
            assert_eq!(value, "2");
        } else {
            panic!("Expected Config Set command");
        }

        let cli = Cli::parse_from(["tmd", "config", "init", "--force"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                command: Some(ConfigCommands::Init { force: true })
            })
        ));
    }

    #[test]
    fn test_completions() {
        let cli = Cli::parse_from(["tmd", "completions", "zsh"]);
        if let Some(Commands::Completions { shell }) = cli.command {
            assert!(matches!(shell, Shell::Zsh));
        } else {
            panic!("Expected Completions command");
        }
    }
}
