//! Command dispatch module for routing CLI commands to their handlers.

use ra_filter::SortDirection;

use crate::cli::{Cli, Commands, ConfigCommands};
use crate::commands::config::Config;
use crate::commands::filter::FilterOptions;
use crate::commands::{self, CommandContext, CommandError, Result};

/// Returns true if the command reads the config file.
///
/// `config path`, `config init` and `completions` must keep working when the
/// existing file is broken.
pub fn needs_config(cli: &Cli) -> bool {
    !matches!(
        &cli.command,
        Some(Commands::Config {
            command: Some(ConfigCommands::Path | ConfigCommands::Init { .. })
        }) | Some(Commands::Completions { .. })
    )
}

/// Runs the command selected on the command line.
pub fn execute(cli: &Cli, ctx: &CommandContext, config: &Config) -> Result<()> {
    match &cli.command {
        Some(Commands::Filter {
            files,
            filter,
            sort,
            asc,
            desc,
            limit,
            all,
            items_key,
        }) => {
            let direction = match (asc, desc) {
                (true, _) => Some(SortDirection::Ascending),
                (_, true) => Some(SortDirection::Descending),
                _ => None,
            };
            let opts = FilterOptions {
                files: files.clone(),
                filter: filter.clone(),
                sort: sort.clone(),
                direction,
                limit: *limit,
                all: *all,
                items_key: items_key.clone(),
            };
            commands::filter::execute(ctx, &opts, config)
        }
        Some(Commands::Check { expression }) => commands::check::execute(ctx, expression),
        Some(Commands::Operators) => commands::operators::execute(ctx),
        Some(Commands::Config { command }) => dispatch_config(ctx, command, config),
        Some(Commands::Completions { shell }) => {
            commands::completions::execute(shell).map_err(CommandError::Io)
        }
        None => {
            if !ctx.quiet {
                println!("raf - filter Resident Advisor listing exports");
                println!("Use --help for usage information");
            }
            Ok(())
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(
    ctx: &CommandContext,
    command: &Option<ConfigCommands>,
    config: &Config,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx, config),
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
        Some(ConfigCommands::Init { force }) => commands::config::execute_init(ctx, *force),
    }
}
