//! Output formatting utilities for the raf CLI.
//!
//! - [`records`] - filtered record batches (table, JSON)
//! - [`expressions`] - parsed filters and the operator reference
//! - [`helpers`] - truncation, padding and cell rendering

mod expressions;
pub mod helpers;
mod records;

pub use expressions::{
    format_check_json, format_check_table, format_operators_json, format_operators_table,
};
pub use records::{format_records_json, format_records_table, BatchSummary};
