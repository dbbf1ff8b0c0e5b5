use chrono::NaiveDate;
use serde::Serialize;

use crate::categories::{label_for_column, Category, MetricKind};
use crate::error::DashboardError;
use crate::table::Table;

/// One long-form chart point: a date, the intent it belongs to, and the
/// plotted value. Recomputed per render cycle, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRecord {
    pub date: NaiveDate,
    pub intent: &'static str,
    pub value: f64,
}

/// Project the selected categories' wide columns into long form for
/// multi-series charting, then pad the batch so the chart axis covers 0
/// and 105% of the observed maximum.
///
/// Rows are emitted in the table's date-ascending order; within a row,
/// categories follow the order of `selected` as supplied, not registry
/// order. An empty selection yields an empty sequence; surfacing the
/// "select at least one category" notice is the caller's concern.
pub fn reshape(
    table: &Table,
    selected: &[&'static Category],
    kind: MetricKind,
) -> Result<Vec<LongRecord>, DashboardError> {
    if selected.is_empty() {
        return Ok(Vec::new());
    }

    // Resolve every source column up front: a miss is a registry/loader
    // schema mismatch and must fail loudly before anything is emitted.
    let mut columns = Vec::with_capacity(selected.len());
    for category in selected {
        let name = kind.column_for(category.prefix);
        let column = table
            .column(&name)
            .ok_or_else(|| DashboardError::ColumnNotFound(name.clone()))?;
        let intent = label_for_column(&name)
            .ok_or_else(|| DashboardError::ColumnNotFound(name.clone()))?;
        columns.push((intent, column));
    }

    let mut records = Vec::with_capacity(table.num_rows() * selected.len() + 2);
    for (row, date) in table.dates.iter().enumerate() {
        for &(intent, column) in &columns {
            let value = column.values[row].unwrap_or(0) as f64;
            records.push(LongRecord {
                date: *date,
                intent,
                value,
            });
        }
    }

    pad_for_chart(&mut records);
    Ok(records)
}

/// Append the two synthetic axis records: a zero floor and a 5% headroom
/// ceiling. Both sit at the minimum date under the first emitted record's
/// intent; placement is arbitrary as long as they land inside the plotted
/// domain, and this matches what the charts have always shown.
fn pad_for_chart(records: &mut Vec<LongRecord>) {
    if records.is_empty() {
        return;
    }

    let min_date = records.iter().map(|r| r.date).min().unwrap_or_default();
    let max_val = records.iter().map(|r| r.value).fold(0.0, f64::max);
    let intent = records[0].intent;

    records.push(LongRecord {
        date: min_date,
        intent,
        value: 0.0,
    });
    records.push(LongRecord {
        date: min_date,
        intent,
        value: max_val * 1.05,
    });
}
