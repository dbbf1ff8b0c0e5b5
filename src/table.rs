use chrono::NaiveDate;
use serde::Serialize;

/// One named integer column. `None` cells are nulls in the source data.
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<u64>>,
}

/// The in-memory dataset: one row per date, sorted ascending, plus a set
/// of named counter columns with one slot per row. Built once by the
/// loader and never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Table {
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn num_rows(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Exact-name column lookup.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

#[cfg(test)]
pub fn table_from_rows(rows: &[(&str, &[(&str, Option<u64>)])]) -> Table {
    // Test helper: build a table from (date, [(column, value)]) literals.
    let mut table = Table::default();
    for (date, cells) in rows {
        table
            .dates
            .push(NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid test date"));
        for (name, value) in *cells {
            match table.columns.iter_mut().find(|c| c.name == *name) {
                Some(column) => column.values.push(*value),
                None => table.columns.push(Column {
                    name: (*name).to_string(),
                    values: vec![*value],
                }),
            }
        }
    }
    table
}
