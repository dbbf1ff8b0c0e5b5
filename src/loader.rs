use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::NaiveDate;
use phf::phf_map;

use crate::categories::{MetricKind, CATEGORIES};
use crate::error::DashboardError;
use crate::table::{Column, Table};

/// Name of the date column in the source file.
pub const DATE_COLUMN: &str = "date_";

/// Legacy header names carried over from the upstream export, mapped to
/// the canonical names the registry expects. Exact, case-sensitive match;
/// anything else passes through unchanged.
static RENAME_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "sb_sessions" => "sb_hardware_sessions",
    "sb_messages" => "sb_hardware_messages",
    "edc_sessions" => "edc_hardware_sessions",
    "edc_messages" => "edc_hardware_messages",
    "payment_acceptence_sessions" => "payment_acceptance_sessions",
    "payment_acceptence_messages" => "payment_acceptance_messages",
};

static TABLE: OnceLock<Table> = OnceLock::new();

thread_local! {
    static TEST_DATA_PATH: RefCell<Option<PathBuf>> = const { RefCell::new(None) };
}

#[cfg(test)]
pub fn set_test_data_path(path: PathBuf) {
    TEST_DATA_PATH.with(|p| *p.borrow_mut() = Some(path));
}

/// Load the dataset, caching it for the remainder of the process. The
/// first successful load wins; later calls return the cached table
/// without touching the filesystem again.
pub fn load(path: &Path) -> Result<&'static Table, DashboardError> {
    if let Some(table) = TABLE.get() {
        return Ok(table);
    }

    let path = TEST_DATA_PATH
        .with(|p| p.borrow().clone())
        .unwrap_or_else(|| path.to_path_buf());

    let table = parse_file(&path)?;
    Ok(TABLE.get_or_init(|| table))
}

/// Read and parse the source file into a validated, date-sorted table.
pub fn parse_file(path: &Path) -> Result<Table, DashboardError> {
    let content = fs::read_to_string(path).map_err(|e| {
        DashboardError::DataLoad(format!("could not read {}: {e}", path.display()))
    })?;
    let table = parse_delimited(&content)?;
    validate_schema(&table)?;
    Ok(table)
}

fn parse_delimited(content: &str) -> Result<Table, DashboardError> {
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());

    let header = lines
        .next()
        .ok_or_else(|| DashboardError::DataLoad("dataset is empty".to_string()))?;
    let headers: Vec<String> = header
        .split(',')
        .map(|h| {
            let h = strip_quotes(h.trim());
            RENAME_MAP.get(h).copied().unwrap_or(h).to_string()
        })
        .collect();

    let date_index = headers
        .iter()
        .position(|h| h == DATE_COLUMN)
        .ok_or_else(|| {
            DashboardError::DataLoad(format!("missing required column '{DATE_COLUMN}'"))
        })?;

    let mut rows: Vec<(NaiveDate, Vec<Option<u64>>)> = Vec::new();
    for (line_no, line) in lines.enumerate() {
        let cells: Vec<&str> = line.split(',').map(|c| strip_quotes(c.trim())).collect();
        if cells.len() != headers.len() {
            return Err(DashboardError::DataLoad(format!(
                "row {} has {} fields, expected {}",
                line_no + 2,
                cells.len(),
                headers.len()
            )));
        }

        let date = parse_date(cells[date_index]).ok_or_else(|| {
            DashboardError::DataLoad(format!(
                "row {}: unparseable date '{}'",
                line_no + 2,
                cells[date_index]
            ))
        })?;

        let mut values = Vec::with_capacity(headers.len() - 1);
        for (i, cell) in cells.iter().enumerate() {
            if i == date_index {
                continue;
            }
            if cell.is_empty() {
                values.push(None);
                continue;
            }
            let parsed = cell.parse::<u64>().map_err(|_| {
                DashboardError::DataLoad(format!(
                    "row {}, column '{}': expected a non-negative integer, got '{}'",
                    line_no + 2,
                    headers[i],
                    cell
                ))
            })?;
            values.push(Some(parsed));
        }
        rows.push((date, values));
    }

    let mut seen = HashSet::new();
    for (date, _) in &rows {
        if !seen.insert(*date) {
            return Err(DashboardError::DataLoad(format!("duplicate date {date}")));
        }
    }

    // Natural order for everything downstream is date ascending.
    rows.sort_by_key(|(date, _)| *date);

    let mut table = Table {
        dates: rows.iter().map(|(date, _)| *date).collect(),
        columns: headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_index)
            .map(|(_, name)| Column {
                name: name.clone(),
                values: Vec::with_capacity(rows.len()),
            })
            .collect(),
    };
    for (_, values) in &rows {
        for (column, value) in table.columns.iter_mut().zip(values) {
            column.values.push(*value);
        }
    }

    Ok(table)
}

/// Accept plain dates and datetime strings that carry a date prefix
/// (the upstream export has produced both over time).
fn parse_date(cell: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(cell, "%Y-%m-%d") {
        return Some(date);
    }
    if cell.len() >= 10 {
        if let Ok(date) = NaiveDate::parse_from_str(&cell[..10], "%Y-%m-%d") {
            return Some(date);
        }
    }
    None
}

fn strip_quotes(cell: &str) -> &str {
    cell.strip_prefix('"')
        .and_then(|c| c.strip_suffix('"'))
        .unwrap_or(cell)
}

/// Every registry prefix must have both counters present after renaming,
/// along with the overall totals.
fn validate_schema(table: &Table) -> Result<(), DashboardError> {
    let mut missing: Vec<String> = Vec::new();
    for required in ["overall_sessions", "overall_messages"] {
        if !table.has_column(required) {
            missing.push(required.to_string());
        }
    }
    for category in &CATEGORIES {
        for kind in [MetricKind::Sessions, MetricKind::Messages] {
            let column = kind.column_for(category.prefix);
            if !table.has_column(&column) {
                missing.push(column);
            }
        }
    }
    if !missing.is_empty() {
        return Err(DashboardError::DataLoad(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests;
