use crate::error::DashboardError;
use crate::table::Table;

/// Sum a column across all rows. Null cells contribute 0 so partially
/// populated days still aggregate; an empty table sums to 0.
pub fn sum(table: &Table, column_name: &str) -> Result<u64, DashboardError> {
    let column = table
        .column(column_name)
        .ok_or_else(|| DashboardError::ColumnNotFound(column_name.to_string()))?;

    Ok(column.values.iter().map(|v| v.unwrap_or(0)).sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::table_from_rows;

    #[test]
    fn sums_a_column_across_all_rows() {
        let table = table_from_rows(&[
            ("2024-01-01", &[("overall_sessions", Some(5))]),
            ("2024-01-02", &[("overall_sessions", Some(7))]),
            ("2024-01-03", &[("overall_sessions", Some(3))]),
        ]);
        assert_eq!(sum(&table, "overall_sessions").unwrap(), 15);
    }

    #[test]
    fn empty_table_sums_to_zero() {
        let table = Table::default();
        let err = sum(&table, "overall_sessions").unwrap_err();
        assert!(matches!(err, DashboardError::ColumnNotFound(_)));

        let table = table_from_rows(&[]);
        assert!(table.is_empty());
    }

    #[test]
    fn empty_column_sums_to_zero() {
        let mut table = table_from_rows(&[("2024-01-01", &[("overall_sessions", Some(1))])]);
        table.dates.clear();
        table.columns[0].values.clear();
        assert_eq!(sum(&table, "overall_sessions").unwrap(), 0);
    }

    #[test]
    fn null_cells_contribute_zero() {
        let table = table_from_rows(&[
            ("2024-01-01", &[("refund_messages", Some(4))]),
            ("2024-01-02", &[("refund_messages", None)]),
            ("2024-01-03", &[("refund_messages", Some(6))]),
        ]);
        assert_eq!(sum(&table, "refund_messages").unwrap(), 10);
    }

    #[test]
    fn missing_column_is_rejected() {
        let table = table_from_rows(&[("2024-01-01", &[("overall_sessions", Some(1))])]);
        let err = sum(&table, "no_such_column").unwrap_err();
        assert!(format!("{err}").contains("no_such_column"));
    }
}
