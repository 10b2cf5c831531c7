//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the raf CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// raf - filter and sort Resident Advisor listing exports
#[derive(Parser, Debug)]
#[command(name = "raf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of a table
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
    /// Filter (and optionally sort) records read from JSON files or stdin
    #[command(alias = "f")]
    Filter {
        /// Input files holding a JSON array or an object with one ("-" for stdin)
        files: Vec<PathBuf>,

        /// Filter expression (e.g. "genre:contains_any:techno,house AND artists:has:charlotte")
        #[arg(short, long)]
        filter: Option<String>,

        /// Sort key: listingDate, score, title, or any field name
        #[arg(short, long)]
        sort: Option<String>,

        /// Sort ascending
        #[arg(long, conflicts_with = "desc")]
        asc: bool,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Limit results (default: 50, or filter.limit from config)
        #[arg(
            short,
            long,
            conflicts_with = "all",
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
        )]
        limit: Option<usize>,

        /// Show all matching records (no limit)
        #[arg(long)]
        all: bool,

        /// Key of the record array when the input is a JSON object
        #[arg(long)]
        items_key: Option<String>,
    },

    /// Parse a filter expression and show how it is read
    #[command(alias = "c")]
    Check {
        /// Filter expression to check
        expression: String,
    },

    /// List supported filter operators
    #[command(alias = "ops")]
    Operators,

    /// View and create configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
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
    /// Show current configuration
    Show,

    /// Print config file path
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
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
        let cli = Cli::parse_from(["raf", "--verbose", "operators"]);
        assert!(cli.verbose);
        assert!(!cli.quiet);
        assert!(!cli.json);

        let cli = Cli::parse_from(["raf", "--quiet", "--json", "operators"]);
        assert!(!cli.verbose);
        assert!(cli.quiet);
        assert!(cli.json);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["raf", "-v", "-q", "operators"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["raf", "check", "a:eq:1", "--json", "--no-color"]);
        assert!(cli.json);
        assert!(cli.no_color);
    }

    #[test]
    fn test_filter_command() {
        let cli = Cli::parse_from([
            "raf",
            "filter",
            "events.json",
            "more.json",
            "-f",
            "genre:eq:techno",
            "--sort",
            "score",
            "--asc",
            "--limit",
            "10",
            "--items-key",
            "results",
        ]);
        let Some(Commands::Filter {
            files,
            filter,
            sort,
            asc,
            desc,
            limit,
            all,
            items_key,
        }) = cli.command
        else {
            panic!("Expected Filter command");
        };
        assert_eq!(
            files,
            vec![PathBuf::from("events.json"), PathBuf::from("more.json")]
        );
        assert_eq!(filter.as_deref(), Some("genre:eq:techno"));
        assert_eq!(sort.as_deref(), Some("score"));
        assert!(asc);
        assert!(!desc);
        assert_eq!(limit, Some(10));
        assert!(!all);
        assert_eq!(items_key.as_deref(), Some("results"));
    }

    #[test]
    fn test_filter_alias_and_stdin() {
        let cli = Cli::parse_from(["raf", "f", "-"]);
        let Some(Commands::Filter { files, .. }) = cli.command else {
            panic!("Expected Filter command");
        };
        assert_eq!(files, vec![PathBuf::from("-")]);
    }

    #[test]
    fn test_asc_conflicts_with_desc() {
        assert!(Cli::try_parse_from(["raf", "filter", "--asc", "--desc"]).is_err());
    }

    #[test]
    fn test_limit_must_be_positive() {
        assert!(Cli::try_parse_from(["raf", "filter", "--limit", "0"]).is_err());
        assert!(Cli::try_parse_from(["raf", "filter", "--limit", "1"]).is_ok());
    }

    #[test]
    fn test_limit_conflicts_with_all() {
        assert!(Cli::try_parse_from(["raf", "filter", "--limit", "5", "--all"]).is_err());
    }

    #[test]
    fn test_check_command() {
        let cli = Cli::parse_from(["raf", "check", "genre:eq:techno OR price:lt:20"]);
        let Some(Commands::Check { expression }) = cli.command else {
            panic!("Expected Check command");
        };
        assert_eq!(expression, "genre:eq:techno OR price:lt:20");
    }

    #[test]
    fn test_operators_alias() {
        let cli = Cli::parse_from(["raf", "ops"]);
        assert!(matches!(cli.command, Some(Commands::Operators)));
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::parse_from(["raf", "config", "init", "--force"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                command: Some(ConfigCommands::Init { force: true })
            })
        ));

        let cli = Cli::parse_from(["raf", "config"]);
        assert!(matches!(cli.command, Some(Commands::Config { command: None })));
    }

    #[test]
    fn test_completions() {
        let cli = Cli::parse_from(["raf", "completions", "zsh"]);
        if let Some(Commands::Completions { shell }) = cli.command {
            assert!(matches!(shell, Shell::Zsh));
        } else {
            panic!("Expected Completions command");
        }
    }
}
