//! Command-line interface for gpac-complete
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Dispatch of the `complete`, `init`, `cache` and `config` subcommands

pub mod completion;

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::completion::{CompletionEngine, FsPathCompleter};
use crate::config::{Config, LogLevel};
use crate::error::Result;
use crate::schema::{GpacBinary, SchemaCache, Snapshot};

/// Name the helper is installed under; the shell hooks call it back
pub const BIN_NAME: &str = "gpac-complete";

/// Tab completion for the gpac multimedia framework
#[derive(Parser, Debug)]
#[command(
    name = "gpac-complete",
    version,
    about = "Tab completion for gpac command lines",
    long_about = "Completes gpac filter names, filter options and their values, help topics,
protocol schemes and paths. Knowledge about the installed gpac is queried lazily and
cached on disk until the gpac version changes."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// gpac binary to query
    #[arg(long = "gpac", value_name = "BINARY", global = true)]
    pub gpac_binary: Option<String>,

    /// Schema cache file
    #[arg(long = "cache", value_name = "FILE", global = true)]
    pub cache_file: Option<PathBuf>,

    /// Keep the schema in memory only
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Very verbose mode (debug logging)
    #[arg(long = "vv", global = true)]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands for gpac-complete
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print completion candidates, one per line
    Complete {
        /// Cursor position in LINE, in characters
        #[arg(value_name = "CURSOR")]
        cursor: usize,

        /// The whole command line being edited
        #[arg(value_name = "LINE", allow_hyphen_values = true)]
        line: String,
    },

    /// Print the shell hook that wires gpac to this helper
    Init {
        /// Shell type (bash, zsh)
        #[arg(value_name = "SHELL")]
        shell: String,
    },

    /// Inspect or reset the schema cache
    Cache {
        /// Print the cached schema
        #[arg(long)]
        show: bool,

        /// Delete the cache file
        #[arg(long)]
        clear: bool,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load(args.config_file.as_deref())?;

        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {}", e);
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        Self::apply_args_to_config(&mut config, args);
        Ok(config)
    }

    /// Override configuration values with CLI arguments where provided
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        if let Some(binary) = &args.gpac_binary {
            config.gpac.binary = binary.clone();
        }

        if let Some(path) = &args.cache_file {
            config.cache.path = path.clone();
        }

        if args.no_cache {
            config.cache.enabled = false;
        }

        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else {
            config.logging.level
        };
    }

    /// Get the effective configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the selected subcommand
    pub fn handle_command(&self) -> Result<()> {
        match &self.args.command {
            Commands::Complete { cursor, line } => self.complete(line, *cursor),
            Commands::Init { shell } => {
                let mut out = io::stdout().lock();
                completion::generate_init(shell, &mut out)
            }
            Commands::Cache { show, clear } => self.handle_cache_command(*show, *clear),
            Commands::Config { show, validate } => self.handle_config_command(*show, *validate),
        }
    }

    /// Build a completion engine over the configured gpac and cache
    pub fn build_engine(&self) -> Result<CompletionEngine> {
        let adapter = Box::new(GpacBinary::new(self.config.gpac.binary.clone()));
        let schema = if self.config.cache.enabled {
            SchemaCache::open(&self.config.cache.path, adapter)?
        } else {
            SchemaCache::in_memory(adapter)
        };

        Ok(CompletionEngine::new(
            Box::new(schema),
            Box::new(FsPathCompleter::new()),
        ))
    }

    /// Print the candidates for `line`, one per line.
    ///
    /// Nothing is printed unless every candidate was computed.
    fn complete(&self, line: &str, cursor: usize) -> Result<()> {
        let candidates = self.build_engine()?.complete(line, cursor)?;

        let mut out = io::stdout().lock();
        for candidate in candidates {
            writeln!(out, "{candidate}")?;
        }
        Ok(())
    }

    /// Handle cache subcommand
    fn handle_cache_command(&self, show: bool, clear: bool) -> Result<()> {
        let path = &self.config.cache.path;

        if show {
            match Snapshot::load(path) {
                Some(snapshot) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
                None => println!("No schema cache at {}", path.display()),
            }
        }

        if clear {
            match fs::remove_file(path) {
                Ok(()) => println!("Removed {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    println!("No schema cache at {}", path.display())
                }
                Err(e) => return Err(e.into()),
            }
        }

        if !show && !clear {
            println!("Schema cache: {}", path.display());
        }
        Ok(())
    }

    /// Handle config subcommand
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file();
        }

        if show {
            self.show_config()?;
        }

        Ok(())
    }

    /// Validate configuration file
    fn validate_config_file(&self) {
        let path = self.get_config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("❌ Configuration file does not exist");
            return;
        }

        match Config::from_file(&path) {
            Ok(config) => match config.validate() {
                Ok(()) => println!("✅ Configuration is valid"),
                Err(e) => println!("❌ Configuration validation failed: {}", e),
            },
            Err(e) => println!("❌ Failed to load configuration: {}", e),
        }
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("Configuration file: {}", path.display());
        println!();
        println!("=== Effective Configuration ===");
        println!();
        println!("{}", self.config.to_toml()?);
        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interface(argv: &[&str]) -> CliInterface {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("absent.toml");
        let mut full = vec!["gpac-complete", "--config", config.to_str().unwrap()];
        full.extend_from_slice(argv);
        CliInterface::from_args(CliArgs::try_parse_from(full).unwrap()).unwrap()
    }

    #[test]
    fn test_complete_arguments() {
        let args = CliArgs::try_parse_from(["gpac-complete", "complete", "12", "gpac inspect"]).unwrap();
        match args.command {
            Commands::Complete { cursor, line } => {
                assert_eq!(cursor, 12);
                assert_eq!(line, "gpac inspect");
            }
            other => panic!("Expected complete, got {other:?}"),
        }
    }

    #[test]
    fn test_complete_line_may_start_with_dash() {
        let args = CliArgs::try_parse_from(["gpac-complete", "complete", "4", "-src"]).unwrap();
        assert!(matches!(args.command, Commands::Complete { ref line, .. } if line == "-src"));
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(CliArgs::try_parse_from(["gpac-complete"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CliArgs::try_parse_from([
            "gpac-complete",
            "cache",
            "--show",
            "--cache",
            "/tmp/x.json",
            "--vv",
        ])
        .unwrap();
        assert_eq!(args.cache_file, Some(PathBuf::from("/tmp/x.json")));
        assert!(args.very_verbose);
    }

    #[test]
    fn test_args_override_config() {
        let cli = interface(&[
            "--gpac",
            "/opt/gpac/bin/gpac",
            "--cache",
            "/tmp/schema.json",
            "--no-cache",
            "-v",
            "init",
            "bash",
        ]);
        assert_eq!(cli.config().gpac.binary, "/opt/gpac/bin/gpac");
        assert_eq!(cli.config().cache.path, PathBuf::from("/tmp/schema.json"));
        assert!(!cli.config().cache.enabled);
        assert_eq!(cli.config().logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_complete_with_missing_binary_fails() {
        let cli = interface(&["--gpac", "/nonexistent/gpac", "--no-cache", "complete", "5", "gpac "]);
        assert!(cli.handle_command().is_err());
    }
}
