use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod dispatch;
mod logger;
mod output;

use cli::Cli;
use commands::config::{load_config, Config};
use commands::{CommandContext, CommandError};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose, cli.quiet);

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
                match serde_json::to_string_pretty(&error_json) {
                    Ok(text) => eprintln!("{text}"),
                    Err(_) => eprintln!("{error_json}"),
                }
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::from(exit_status(&e))
        }
    }
}

fn run(cli: &Cli) -> commands::Result<()> {
    let config = if dispatch::needs_config(cli) {
        load_config()?
    } else {
        Config::default()
    };
    let ctx = CommandContext::from_cli(cli, &config);
    dispatch::execute(cli, &ctx, &config)
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Filter(_) => "FILTER_ERROR",
        CommandError::Record { .. } => "RECORD_ERROR",
        CommandError::InvalidJson { .. } | CommandError::Json(_) => "JSON_ERROR",
        CommandError::Input(_) => "INPUT_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
    }
}

/// Returns the process exit status for an error.
fn exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Filter(_) => 1,
        CommandError::InvalidJson { .. } | CommandError::Json(_) => 1,
        CommandError::Io(_) => 3,
        CommandError::Record { .. } | CommandError::Input(_) => 4,
        CommandError::Config(_) => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ra_filter::{parse, Record};

    fn filter_error() -> CommandError {
        CommandError::Filter(parse("genre:bogus:x").unwrap_err())
    }

    fn record_error() -> CommandError {
        let error = Record::from_json(&serde_json::json!([1])).unwrap_err();
        CommandError::Record {
            source_name: "stdin".to_string(),
            index: 0,
            error,
        }
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(error_code(&filter_error()), "FILTER_ERROR");
        assert_eq!(error_code(&record_error()), "RECORD_ERROR");
        assert_eq!(
            error_code(&CommandError::Input("x".to_string())),
            "INPUT_ERROR"
        );
        assert_eq!(
            error_code(&CommandError::Config("x".to_string())),
            "CONFIG_ERROR"
        );
    }

    #[test]
    fn test_exit_status() {
        assert_eq!(exit_status(&filter_error()), 1);
        assert_eq!(exit_status(&record_error()), 4);
        assert_eq!(exit_status(&CommandError::Input("x".to_string())), 4);
        assert_eq!(exit_status(&CommandError::Config("x".to_string())), 5);
        assert_eq!(
            exit_status(&CommandError::Io(std::io::Error::other("boom"))),
            3
        );

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            exit_status(&CommandError::InvalidJson {
                source_name: "stdin".to_string(),
                error: json_err,
            }),
            1
        );
    }

    #[test]
    fn test_record_error_message() {
        assert_eq!(
            record_error().to_string(),
            "invalid record 0 in stdin: expected a JSON object, found array"
        );
    }
}
