//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/tmd/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use todomd_core::config::{EditConfig, ParseConfig};
use todomd_core::group::GroupSort;

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Keys accepted by `tmd config set`.
const CONFIG_KEYS: [&str; 11] = [
    "default_file",
    "default_archive_file",
    "parse.tab_size",
    "parse.done_symbol",
    "completion.add_completion_date",
    "completion.include_time",
    "completion.auto_archive",
    "view.show_completed",
    "view.show_recurring_completed",
    "view.group_sort",
    "output.color",
];

/// Suggestions further away than this are not offered.
const MAX_KEY_SUGGESTION_DISTANCE: usize = 3;

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# tmd - todo.md CLI Configuration

# Config schema version (do not modify)
version = 1

# Task file used when --file and TMD_FILE are not given
# default_file = "/home/me/todo.md"

# File that `tmd archive` appends completed tasks to
# default_archive_file = "/home/me/archive.md"

[parse]
# tab_size = 4              # Width of one indent level
# done_symbol = "x "        # Prefix marking a task as done

[completion]
# add_completion_date = false   # Mark done with {cm:DATE} instead of the done symbol
# include_time = false          # Use {cm:DATE}T{TIME}
# auto_archive = false          # `tmd toggle` moves newly completed tasks to default_archive_file

[view]
# show_completed = false            # Show completed tasks in `tmd list`
# show_recurring_completed = true   # Show completed recurring tasks when completed tasks are shown
# group_sort = "alphabetic"         # "alphabetic" or "count"

[output]
# color = true              # Enable colors (respects NO_COLOR env)
"#;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Task file used when none is given on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_file: Option<PathBuf>,

    /// File completed tasks are archived to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_archive_file: Option<PathBuf>,

    /// Parse settings.
    #[serde(default)]
    pub parse: ParseConfig,

    /// Completion settings.
    #[serde(default)]
    pub completion: CompletionConfig,

    /// List and group settings.
    #[serde(default)]
    pub view: ViewConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            default_file: None,
            default_archive_file: None,
            parse: ParseConfig::default(),
            completion: CompletionConfig::default(),
            view: ViewConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Edit settings built from `[parse]` and `[completion]`.
    pub fn edit_config(&self) -> EditConfig {
        EditConfig::from_parse_config(&self.parse).with_completion_date(
            self.completion.add_completion_date,
            self.completion.include_time,
        )
    }
}

/// Completion configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Mark done tasks with `{cm:DATE}`.
    pub add_completion_date: bool,

    /// Include the time in `{cm:…}`.
    pub include_time: bool,

    /// Move a task to the archive file as soon as `toggle` completes it.
    pub auto_archive: bool,
}

/// View configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Show completed tasks in lists.
    pub show_completed: bool,

    /// Show completed recurring tasks; only matters with `show_completed`.
    pub show_recurring_completed: bool,

    /// Ordering of grouped views.
    pub group_sort: GroupSort,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            show_completed: false,
            show_recurring_completed: true,
            group_sort: GroupSort::Alphabetic,
        }
    }
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/tmd/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("tmd"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("tmd"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path.
pub fn get_config_path() -> Result<PathBuf> {
    // Check for override env var first
    if let Ok(path) = env::var("TMD_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk.
///
/// A missing file yields the defaults.
///
/// # Errors
///
/// Returns a configuration error if the file cannot be read or parsed, or if
/// the `[parse]` values are invalid.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;
    config.parse.validate()?;

    tracing::debug!(path = %path.display(), version = config.version, "loaded config");
    migrate_config(config)
}

/// Migrates config to current version if needed.
/// Returns the config as-is if already at current version.
fn migrate_config(mut config: Config) -> Result<Config> {
    // Version 1 is the initial schema. Later versions add steps here:
    //
    // if config.version < 2 {
    //     config.version = 2;
    // }

    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Saves the configuration to disk.
fn save_config(config: &Config) -> Result<()> {
    let path = get_config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(&path, content)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    Ok(())
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        println!("Settings:");
        match &config.default_file {
            Some(file) => println!("  default_file: {}", file.display()),
            None => println!("  default_file: (not set)"),
        }
        if let Some(file) = &config.default_archive_file {
            println!("  default_archive_file: {}", file.display());
        }

        println!("\n[parse]");
        println!("  tab_size: {}", config.parse.tab_size);
        println!("  done_symbol: {:?}", config.parse.done_symbol);

        println!("\n[completion]");
        println!(
            "  add_completion_date: {}",
            config.completion.add_completion_date
        );
        println!("  include_time: {}", config.completion.include_time);
        println!("  auto_archive: {}", config.completion.auto_archive);

        println!("\n[view]");
        println!("  show_completed: {}", config.view.show_completed);
        println!(
            "  show_recurring_completed: {}",
            config.view.show_recurring_completed
        );
        println!("  group_sort: {}", group_sort_name(config.view.group_sort));

        if let Some(color) = config.output.color {
            println!("\n[output]");
            println!("  color: {}", color);
        }

        if !path.exists() {
            println!("\n(No config file exists. Run 'tmd config init' to create one.)");
        }
    }

    Ok(())
}

/// Executes the config init command.
///
/// Writes the commented default config. An existing file is kept unless
/// `force` is set.
pub fn execute_init(ctx: &CommandContext, force: bool) -> Result<()> {
    let path = get_config_path()?;

    if path.exists() && !force {
        return Err(CommandError::Config(format!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }
    fs::write(&path, DEFAULT_CONFIG)
        .map_err(|e| CommandError::Config(format!("Failed to create config file: {}", e)))?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Created default config at: {}", path.display());
    }

    Ok(())
}

/// Options for the config set command.
pub struct ConfigSetOptions {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

/// Executes the config set command.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let mut config = load_config()?;
    let path = get_config_path()?;

    apply_setting(&mut config, &opts.key, &opts.value)?;
    config.parse.validate()?;
    save_config(&config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "key": opts.key,
            "value": opts.value,
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Set {} = {}", opts.key, opts.value);
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Sets one dotted key on `config`.
fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "default_file" => config.default_file = Some(PathBuf::from(value)),
        "default_archive_file" => config.default_archive_file = Some(PathBuf::from(value)),
        "parse.tab_size" => {
            config.parse.tab_size = value.parse().map_err(|_| {
                CommandError::Config(format!("Invalid tab_size value '{}'", value))
            })?;
        }
        "parse.done_symbol" => config.parse.done_symbol = value.to_string(),
        "completion.add_completion_date" => {
            config.completion.add_completion_date = parse_bool(value)?;
        }
        "completion.include_time" => config.completion.include_time = parse_bool(value)?,
        "completion.auto_archive" => config.completion.auto_archive = parse_bool(value)?,
        "view.show_completed" => config.view.show_completed = parse_bool(value)?,
        "view.show_recurring_completed" => {
            config.view.show_recurring_completed = parse_bool(value)?;
        }
        "view.group_sort" => {
            config.view.group_sort = match value.to_lowercase().as_str() {
                "alphabetic" => GroupSort::Alphabetic,
                "count" => GroupSort::Count,
                _ => {
                    return Err(CommandError::Config(format!(
                        "Invalid group_sort value '{}'. Valid values: alphabetic, count",
                        value
                    )))
                }
            };
        }
        "output.color" => config.output.color = Some(parse_bool(value)?),
        _ => {
            let hint = suggest_key(key)
                .map(|suggestion| format!(" (did you mean '{}'?)", suggestion))
                .unwrap_or_default();
            return Err(CommandError::Config(format!(
                "Unknown config key '{}'{}. Valid keys: {}",
                key,
                hint,
                CONFIG_KEYS.join(", ")
            )));
        }
    }
    Ok(())
}

/// Finds the closest known config key.
fn suggest_key(key: &str) -> Option<&'static str> {
    CONFIG_KEYS
        .iter()
        .map(|candidate| (*candidate, strsim::levenshtein(key, candidate)))
        .filter(|(_, distance)| *distance <= MAX_KEY_SUGGESTION_DISTANCE)
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

fn group_sort_name(sort: GroupSort) -> &'static str {
    match sort {
        GroupSort::Alphabetic => "alphabetic",
        GroupSort::Count => "count",
    }
}

/// Parses a boolean value from string.
fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(CommandError::Config(format!(
            "Invalid boolean value '{}'. Use true/false, yes/no, 1/0, or on/off",
            s
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_true_values() {
        assert!(parse_bool("true").unwrap());
        assert!(parse_bool("True").unwrap());
        assert!(parse_bool("yes").unwrap());
        assert!(parse_bool("1").unwrap());
        assert!(parse_bool("on").unwrap());
    }

    #[test]
    fn test_parse_bool_false_values() {
        assert!(!parse_bool("false").unwrap());
        assert!(!parse_bool("FALSE").unwrap());
        assert!(!parse_bool("no").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(!parse_bool("off").unwrap());
    }

    #[test]
    fn test_parse_bool_invalid() {
        assert!(parse_bool("maybe").is_err());
        assert!(parse_bool("").is_err());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.default_file.is_none());
        assert_eq!(config.parse, ParseConfig::default());
        assert!(!config.view.show_completed);
        assert!(config.view.show_recurring_completed);
        assert_eq!(config.view.group_sort, GroupSort::Alphabetic);
        assert!(config.output.color.is_none());
    }

    #[test]
    fn test_default_config_file_parses_to_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.parse, ParseConfig::default());
        assert!(!config.completion.add_completion_date);
        assert!(!config.completion.auto_archive);
        assert!(!config.view.show_completed);
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
version = 1
default_file = "/tmp/todo.md"

[parse]
tab_size = 2
done_symbol = "- "

[completion]
add_completion_date = true

[view]
show_completed = true
group_sort = "count"

[output]
color = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default_file, Some(PathBuf::from("/tmp/todo.md")));
        assert_eq!(config.parse.tab_size, 2);
        assert_eq!(config.parse.done_symbol, "- ");
        assert!(config.completion.add_completion_date);
        assert!(!config.completion.include_time);
        assert!(config.view.show_completed);
        assert!(config.view.show_recurring_completed);
        assert_eq!(config.view.group_sort, GroupSort::Count);
        assert_eq!(config.output.color, Some(false));
    }

    #[test]
    fn test_config_deserialization_partial_parse_section() {
        let config: Config = toml::from_str("[parse]\ntab_size = 8\n").unwrap();
        assert_eq!(config.parse.tab_size, 8);
        assert_eq!(config.parse.done_symbol, "x ");
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.default_file = Some(PathBuf::from("todo.md"));
        config.output.color = Some(true);

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("version = 1"));
        assert!(toml_str.contains("default_file = \"todo.md\""));
        assert!(toml_str.contains("[parse]"));
        assert!(toml_str.contains("group_sort = \"alphabetic\""));
        assert!(toml_str.contains("color = true"));
    }

    #[test]
    fn test_edit_config_from_sections() {
        let mut config = Config::default();
        config.parse.done_symbol = "DONE ".to_string();
        config.completion.add_completion_date = true;
        config.completion.include_time = true;

        let edit = config.edit_config();
        assert_eq!(edit.done_symbol, "DONE ");
        assert!(edit.add_completion_date);
        assert!(edit.completion_date_include_time);
    }

    #[test]
    fn test_apply_setting() {
        let mut config = Config::default();
        apply_setting(&mut config, "parse.tab_size", "2").unwrap();
        apply_setting(&mut config, "view.group_sort", "Count").unwrap();
        apply_setting(&mut config, "output.color", "off").unwrap();
        apply_setting(&mut config, "default_archive_file", "done.md").unwrap();
        apply_setting(&mut config, "completion.auto_archive", "yes").unwrap();

        assert_eq!(config.parse.tab_size, 2);
        assert_eq!(config.view.group_sort, GroupSort::Count);
        assert_eq!(config.output.color, Some(false));
        assert_eq!(config.default_archive_file, Some(PathBuf::from("done.md")));
        assert!(config.completion.auto_archive);
    }

    #[test]
    fn test_apply_setting_invalid_values() {
        let mut config = Config::default();
        assert!(apply_setting(&mut config, "parse.tab_size", "four").is_err());
        assert!(apply_setting(&mut config, "view.group_sort", "size").is_err());
        assert!(apply_setting(&mut config, "view.show_completed", "maybe").is_err());
    }

    #[test]
    fn test_unknown_key_suggests_closest() {
        let mut config = Config::default();
        let err = apply_setting(&mut config, "parse.tabsize", "2").unwrap_err();
        assert!(err.to_string().contains("did you mean 'parse.tab_size'?"));

        assert_eq!(suggest_key("colour"), None);
        assert_eq!(suggest_key("output.colour"), Some("output.color"));
    }

    #[test]
    fn test_migrate_config_preserves_data() {
        let mut config = Config::default();
        config.version = 0;
        config.default_file = Some(PathBuf::from("todo.md"));
        config.parse.tab_size = 2;

        let migrated = migrate_config(config).unwrap();
        assert_eq!(migrated.version, CONFIG_VERSION);
        assert_eq!(migrated.default_file, Some(PathBuf::from("todo.md")));
        assert_eq!(migrated.parse.tab_size, 2);
    }

    #[test]
    fn test_config_deserialization_with_future_version() {
        let config: Config = toml::from_str("version = 999\n").unwrap();
        assert_eq!(config.version, 999);
    }
}
