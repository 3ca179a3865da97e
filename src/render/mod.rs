//! Fetch-and-render for the read-only views: goals, transactions,
//! categories, and summaries.
//!
//! A view fetch follows the pages' pattern: GET a JSON array, clear the
//! current table, and append one row per record via a row template. Grouped
//! summary responses (period buckets wrapping per-category records) are
//! flattened to one row per inner record, repeating the period label and
//! the bucket total on each row.
//!
//! Failure policy differs from form submission on purpose: fetch and parse
//! errors are logged, never alerted — a stale or empty view is acceptable
//! degradation, so the current table is simply left unchanged.

pub mod chart;

use std::time::Duration;

use colored::Colorize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

// ---------------------------------------------------------------------------
// Rows and templates
// ---------------------------------------------------------------------------

/// One rendered table row, optionally linking to a details page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<String>,
    /// Details-page path for clickable rows (goals, transactions).
    pub detail: Option<String>,
}

impl Row {
    pub fn plain(cells: Vec<String>) -> Self {
        Self {
            cells,
            detail: None,
        }
    }

    pub fn linked(cells: Vec<String>, detail: String) -> Self {
        Self {
            cells,
            detail: Some(detail),
        }
    }
}

/// Read one cell value from a record. Strings render without quotes;
/// numbers and booleans via their JSON form; null and missing keys as an
/// empty cell.
pub fn cell(record: &Value, key: &str) -> String {
    match record.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

/// GET a JSON array of records.
///
/// Returns `None` on any transport, status, or parse failure — logged, not
/// alerted, so the caller leaves its current view unchanged.
pub fn fetch_rows(url: &Url, timeout: Duration) -> Option<Vec<Value>> {
    debug!(url = %url, "fetching rows");

    let response = match ureq::get(url.as_str()).timeout(timeout).call() {
        Ok(response) => response,
        Err(err) => {
            warn!(url = %url, error = %err, "row fetch failed, leaving view unchanged");
            return None;
        }
    };

    match response.into_json::<Value>() {
        Ok(Value::Array(records)) => Some(records),
        Ok(other) => {
            warn!(url = %url, body = %other, "expected a JSON array of records");
            None
        }
        Err(err) => {
            warn!(url = %url, error = %err, "unparseable row response");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Summary flattening
// ---------------------------------------------------------------------------

/// Flatten a grouped summary response to one row per inner record.
///
/// Each outer bucket is `{<period_key>, total_amount, summary: [{
/// category_name, amount}]}`; the period label and bucket total repeat on
/// every row the bucket produces.
pub fn grouped_rows(records: &[Value], period_key: &str) -> Vec<Row> {
    let mut rows = Vec::new();
    for bucket in records {
        let period = cell(bucket, period_key);
        let total = cell(bucket, "total_amount");
        let inner = bucket
            .get("summary")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for record in inner {
            rows.push(Row::plain(vec![
                period.clone(),
                cell(record, "category_name"),
                cell(record, "amount"),
                total.clone(),
            ]));
        }
    }
    rows
}

/// Rows for an ungrouped summary: no per-category split, so the bucket
/// total stands in for the amount and the category column reads
/// "All categories", matching the pages.
pub fn ungrouped_rows(records: &[Value], period_key: &str) -> Vec<Row> {
    records
        .iter()
        .map(|record| {
            let total = cell(record, "total_amount");
            Row::plain(vec![
                cell(record, period_key),
                "All categories".to_string(),
                total.clone(),
                total,
            ])
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Printing
// ---------------------------------------------------------------------------

/// Print a table with aligned columns; linked rows carry a trailing
/// details-page path.
pub fn print_table(headers: &[&str], rows: &[Row]) {
    if rows.is_empty() {
        println!("{}", "No records.".yellow());
        return;
    }

    let widths = column_widths(headers, rows);

    let header_line = headers
        .iter()
        .zip(widths.iter().copied())
        .map(|(h, w)| format!("{h:<w$}"))
        .collect::<Vec<_>>()
        .join("  ");
    println!("  {}", header_line.bold().cyan());
    println!("  {}", "-".repeat(header_line.len()));

    for row in rows {
        let line = row
            .cells
            .iter()
            .zip(widths.iter().copied())
            .map(|(c, w)| format!("{c:<w$}"))
            .collect::<Vec<_>>()
            .join("  ");
        match &row.detail {
            Some(detail) => println!("  {}  {}", line, format!("→ {detail}").dimmed()),
            None => println!("  {line}"),
        }
    }
}

/// Per-column display widths. Measured in characters, not bytes, so
/// non-ASCII category names keep the columns aligned.
fn column_widths(headers: &[&str], rows: &[Row]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.cells.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }
    widths
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn grouped_summary_flattens_one_row_per_inner_record() {
        let records = vec![json!({
            "month_number": 1,
            "total_amount": 100,
            "summary": [{"category_name": "Food", "amount": 40}]
        })];
        let rows = grouped_rows(&records, "month_number");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells, vec!["1", "Food", "40", "100"]);
    }

    #[test]
    fn grouped_summary_repeats_period_and_total() {
        let records = vec![json!({
            "day_number": 14,
            "total_amount": 90,
            "summary": [
                {"category_name": "Food", "amount": 60},
                {"category_name": "Transport", "amount": 30}
            ]
        })];
        let rows = grouped_rows(&records, "day_number");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cells, vec!["14", "Food", "60", "90"]);
        assert_eq!(rows[1].cells, vec!["14", "Transport", "30", "90"]);
    }

    #[test]
    fn ungrouped_summary_uses_total_for_both_amount_columns() {
        let records = vec![json!({"month_number": 3, "total_amount": 250})];
        let rows = ungrouped_rows(&records, "month_number");
        assert_eq!(rows[0].cells, vec!["3", "All categories", "250", "250"]);
    }

    #[test]
    fn bucket_without_inner_summary_produces_no_rows() {
        let records = vec![json!({"month_number": 2, "total_amount": 0})];
        assert!(grouped_rows(&records, "month_number").is_empty());
    }

    #[test]
    fn column_widths_count_characters_not_bytes() {
        // "Café" is five bytes but four characters wide.
        let rows = vec![Row::plain(vec!["Café".to_string(), "40".to_string()])];
        assert_eq!(column_widths(&["Cat", "Amount"], &rows), vec![4, 6]);
    }

    #[test]
    fn cell_renders_strings_bare_and_null_empty() {
        let record = json!({"name": "Vacation", "amount": 1500, "description": null});
        assert_eq!(cell(&record, "name"), "Vacation");
        assert_eq!(cell(&record, "amount"), "1500");
        assert_eq!(cell(&record, "description"), "");
        assert_eq!(cell(&record, "missing"), "");
    }
}
