//! Record batch output formatting.

use ra_filter::Record;
use serde::Serialize;
use serde_json::Value as Json;

use super::helpers::{dim, format_cell, format_header, pad, truncate_str, MAX_COLUMN_WIDTH};

/// Counts describing one filter run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Records read from all inputs.
    pub total: usize,
    /// Records that matched the filter.
    pub matched: usize,
    /// Records printed after the limit was applied.
    pub returned: usize,
}

/// JSON output structure for the filter command.
#[derive(Serialize)]
pub struct RecordsOutput<'a> {
    #[serde(flatten)]
    pub summary: BatchSummary,
    pub records: Vec<&'a Json>,
}

/// Formats the selected raw records as JSON, in selection order.
pub fn format_records_json(
    raw: &[Json],
    selected: &[usize],
    summary: BatchSummary,
) -> Result<String, serde_json::Error> {
    let output = RecordsOutput {
        summary,
        records: selected.iter().map(|&idx| &raw[idx]).collect(),
    };
    serde_json::to_string_pretty(&output)
}

/// Formats the selected records as a table with the given columns.
pub fn format_records_table(
    records: &[Record],
    selected: &[usize],
    columns: &[String],
    summary: BatchSummary,
    use_colors: bool,
) -> String {
    if summary.matched == 0 {
        return format!("No matching records ({} read).\n", summary.total);
    }

    let rows: Vec<Vec<String>> = selected
        .iter()
        .map(|&idx| {
            columns
                .iter()
                .map(|col| truncate_str(&format_cell(records[idx].get(col)), MAX_COLUMN_WIDTH))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(col.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut output = String::new();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(col, &w)| format_header(col, w, use_colors))
        .collect();
    output.push_str(header.join("  ").trim_end());
    output.push('\n');

    for row in &rows {
        let cells: Vec<String> = row.iter().zip(&widths).map(|(c, &w)| pad(c, w)).collect();
        output.push_str(cells.join("  ").trim_end());
        output.push('\n');
    }

    let footer = if summary.returned < summary.matched {
        format!(
            "Showing {} of {} matching records ({} read, use --all to see everything)",
            summary.returned, summary.matched, summary.total
        )
    } else {
        format!(
            "{} matching records ({} read)",
            summary.matched, summary.total
        )
    };
    output.push('\n');
    output.push_str(&dim(&footer, use_colors));
    output.push('\n');

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use ra_filter::Value;
    use serde_json::json;

    fn records() -> Vec<Record> {
        vec![
            Record::new()
                .with("title", "Drumcode Night")
                .with("venue", "Printworks")
                .with("interestedCount", 480.0),
            Record::new().with("title", "Garden Party").with("venue", "Oval Space"),
            Record::new()
                .with("title", "Trance Classics")
                .with("genre", Value::list(["Trance"])),
        ]
    }

    fn columns() -> Vec<String> {
        vec!["title".to_string(), "venue".to_string(), "interestedCount".to_string()]
    }

    #[test]
    fn test_table_layout() {
        let summary = BatchSummary {
            total: 3,
            matched: 2,
            returned: 2,
        };
        let table = format_records_table(&records(), &[1, 0], &columns(), summary, false);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "title           venue       interestedCount");
        assert_eq!(lines[1], "Garden Party    Oval Space");
        assert_eq!(lines[2], "Drumcode Night  Printworks  480");
        assert_eq!(lines[4], "2 matching records (3 read)");
    }

    #[test]
    fn test_table_footer_when_limited() {
        let summary = BatchSummary {
            total: 3,
            matched: 3,
            returned: 1,
        };
        let table = format_records_table(&records(), &[0], &columns(), summary, false);
        assert!(table.contains("Showing 1 of 3 matching records"));
    }

    #[test]
    fn test_table_empty() {
        let summary = BatchSummary {
            total: 3,
            matched: 0,
            returned: 0,
        };
        let table = format_records_table(&records(), &[], &columns(), summary, false);
        assert_eq!(table, "No matching records (3 read).\n");
    }

    #[test]
    fn test_table_with_matches_but_nothing_returned() {
        let summary = BatchSummary {
            total: 3,
            matched: 2,
            returned: 0,
        };
        let table = format_records_table(&records(), &[], &columns(), summary, false);
        assert!(!table.contains("No matching records"));
        assert!(table.contains("Showing 0 of 2 matching records"));
    }

    #[test]
    fn test_table_truncates_long_cells() {
        let long = "x".repeat(100);
        let records = vec![Record::new().with("title", long.as_str())];
        let summary = BatchSummary {
            total: 1,
            matched: 1,
            returned: 1,
        };
        let table =
            format_records_table(&records, &[0], &["title".to_string()], summary, false);
        let row = table.lines().nth(1).unwrap();
        assert_eq!(row.chars().count(), MAX_COLUMN_WIDTH);
        assert!(row.ends_with("..."));
    }

    #[test]
    fn test_json_output_keeps_raw_records_in_order() {
        let raw = vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})];
        let summary = BatchSummary {
            total: 3,
            matched: 2,
            returned: 2,
        };
        let output = format_records_json(&raw, &[2, 0], summary).unwrap();
        let parsed: Json = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["total"], 3);
        assert_eq!(parsed["matched"], 2);
        assert_eq!(parsed["returned"], 2);
        assert_eq!(parsed["records"], json!([{"id": 3}, {"id": 1}]));
    }
}
