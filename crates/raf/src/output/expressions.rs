//! Filter expression and operator output formatting.

use owo_colors::OwoColorize;
use ra_filter::{Condition, Expression, Operand, Operator};
use serde::Serialize;
use serde_json::json;

use super::helpers::{dim, pad};

/// JSON output structure for one condition.
#[derive(Serialize)]
pub struct ConditionOutput<'a> {
    pub field: &'a str,
    pub operator: &'static str,
    pub operand: serde_json::Value,
}

/// JSON output structure for the check command.
#[derive(Serialize)]
pub struct CheckOutput<'a> {
    pub valid: bool,
    pub canonical: String,
    pub matches_all: bool,
    pub conditions: Vec<ConditionOutput<'a>>,
}

/// JSON output structure for one operator.
#[derive(Serialize)]
pub struct OperatorOutput {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub operand: &'static str,
    pub description: &'static str,
}

fn operand_json(operand: &Operand) -> serde_json::Value {
    match operand {
        Operand::Values(values) => json!(values),
        Operand::Number(n) => json!(n),
        Operand::Range { low, high } => json!([low, high]),
    }
}

fn condition_output(condition: &Condition) -> ConditionOutput<'_> {
    ConditionOutput {
        field: &condition.field,
        operator: condition.operator.keyword(),
        operand: operand_json(&condition.operand),
    }
}

/// Short description of the operand an operator expects.
pub fn operand_shape(operator: Operator) -> &'static str {
    match operator {
        Operator::Between => "low,high",
        op if op.is_numeric() => "number",
        _ => "value[,value...]",
    }
}

/// Formats a parsed expression as JSON.
pub fn format_check_json(expression: &Expression) -> Result<String, serde_json::Error> {
    let output = CheckOutput {
        valid: true,
        canonical: expression.to_string(),
        matches_all: expression.is_all(),
        conditions: expression
            .conditions()
            .into_iter()
            .map(condition_output)
            .collect(),
    };
    serde_json::to_string_pretty(&output)
}

/// Formats a parsed expression as its canonical form followed by an indented tree.
pub fn format_check_table(expression: &Expression, use_colors: bool) -> String {
    if expression.is_all() {
        return "Empty filter: every record matches.\n".to_string();
    }

    let mut output = String::new();
    let canonical = expression.to_string();
    if use_colors {
        output.push_str(&format!("{}\n\n", canonical.green()));
    } else {
        output.push_str(&format!("{canonical}\n\n"));
    }
    write_tree(expression, 0, use_colors, &mut output);
    output
}

fn write_tree(expression: &Expression, depth: usize, use_colors: bool, out: &mut String) {
    let indent = "  ".repeat(depth);
    let keyword = |k: &str| {
        if use_colors {
            k.cyan().bold().to_string()
        } else {
            k.to_string()
        }
    };

    match expression {
        Expression::All => out.push_str(&format!("{indent}(all)\n")),
        Expression::Condition(c) => out.push_str(&format!(
            "{indent}{} {} {}\n",
            c.field,
            keyword(c.operator.keyword()),
            c.operand
        )),
        Expression::And(operands) | Expression::Or(operands) => {
            let name = if matches!(expression, Expression::And(_)) {
                "AND"
            } else {
                "OR"
            };
            out.push_str(&format!("{indent}{}\n", keyword(name)));
            for operand in operands {
                write_tree(operand, depth + 1, use_colors, out);
            }
        }
        Expression::Not(inner) => {
            out.push_str(&format!("{indent}{}\n", keyword("NOT")));
            write_tree(inner, depth + 1, use_colors, out);
        }
    }
}

/// Formats the operator table as JSON.
pub fn format_operators_json() -> Result<String, serde_json::Error> {
    let operators: Vec<OperatorOutput> = Operator::ALL
        .iter()
        .map(|&op| OperatorOutput {
            name: op.keyword(),
            aliases: op.aliases(),
            operand: operand_shape(op),
            description: op.description(),
        })
        .collect();
    serde_json::to_string_pretty(&json!({ "operators": operators }))
}

/// Formats the operator table for the terminal.
pub fn format_operators_table(use_colors: bool) -> String {
    let mut output = String::new();

    let header = "Operators";
    if use_colors {
        output.push_str(&format!("{}\n\n", header.green().bold()));
    } else {
        output.push_str(&format!("{header}\n\n"));
    }

    for op in Operator::ALL {
        let usage = format!("field:{}:{}", op.keyword(), operand_shape(op));
        let aliases = if op.aliases().is_empty() {
            String::new()
        } else {
            dim(&format!(" (alias: {})", op.aliases().join(", ")), use_colors)
        };
        output.push_str(&format!(
            "  {}{}{}\n",
            pad(&usage, 36),
            op.description(),
            aliases
        ));
    }

    output.push_str("\nCombine clauses with AND, OR and NOT (NOT binds tightest, then AND).\n");
    output
}
