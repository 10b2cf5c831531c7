//! Logger setup.

use log::LevelFilter;

/// Picks the default log level from the verbosity flags.
fn default_level(verbose: bool, quiet: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    }
}

/// Installs `env_logger` on stderr. `RUST_LOG` overrides the flag-derived level.
pub fn init_logger(verbose: bool, quiet: bool) {
    let _ = env_logger::Builder::new()
        .filter_level(default_level(verbose, quiet))
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}
