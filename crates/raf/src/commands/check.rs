//! Check command implementation.
//!
//! Parses a filter expression without reading any records, so a query can be
//! validated before it is used.

use ra_filter::parse;

use super::{CommandContext, Result};
use crate::output::{format_check_json, format_check_table};

/// Executes the check command.
///
/// # Errors
///
/// Returns [`super::CommandError::Filter`] if the expression does not parse.
pub fn execute(ctx: &CommandContext, expression: &str) -> Result<()> {
    let expression = parse(expression)?;

    if ctx.json_output {
        println!("{}", format_check_json(&expression)?);
    } else if !ctx.quiet {
        print!("{}", format_check_table(&expression, ctx.use_colors));
    }

    Ok(())
}
