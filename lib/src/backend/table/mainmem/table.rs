use std::collections::HashSet;

use tracing::debug;

use crate::backend::{
    access::data::{record::Record, value::FieldValue},
    err::TableError,
};


/// An in-memory table: an ordered header plus rows addressed by their position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Record>,
}



// ==================================================================
//                            CREATION
// ==================================================================


impl Table {

    /// builds a table, checking that the header is unique and every row has one value per column.
    pub fn new(columns: Vec<String>, rows: Vec<Record>) -> Result<Table, TableError> {

        let mut seen: HashSet<&str> = HashSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(TableError::Shape(format!("the column '{name}' appears more than once in the header")));
            }
        }

        for (idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TableError::Shape(format!(
                    "row {idx} has {} values but the header has {} columns", row.len(), columns.len()
                )));
            }
        }

        Ok(Table { columns, rows })
    }

    /// convenience for building tables from string literals, every cell is inferred with `FieldValue::parse`
    pub fn from_strings(columns: &[&str], rows: &[&[&str]]) -> Result<Table, TableError> {
        let columns = columns.iter().map(|c| c.to_string()).collect();
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|v| FieldValue::parse(v)).collect())
            .collect();
        Table::new(columns, rows)
    }

    pub fn empty() -> Table { Table::default() }
}



// ==================================================================
//                            ACCESS
// ==================================================================


impl Table {
    pub fn columns(&self) -> &[String] { &self.columns }
    pub fn rows(&self) -> &[Record] { &self.rows }

    pub fn number_of_rows(&self) -> usize { self.rows.len() }
    pub fn number_of_cols(&self) -> usize { self.columns.len() }

    /// a table with no rows is empty, even when it still has a header
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn get_row(&self, row_index: usize) -> Option<&Record> { self.rows.get(row_index) }

    pub fn column_index(&self, column_name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column_name)
    }

    pub fn cell(&self, row_index: usize, column_name: &str) -> Option<&FieldValue> {
        let col = self.column_index(column_name)?;
        self.rows.get(row_index)?.get(col)
    }
}



// ==================================================================
//                           MODIFICATION
// ==================================================================


impl Table {

    /// replaces exactly one cell, returning the value it held before.
    pub fn update_cell(&mut self, row_index: usize, column_name: &str, value: FieldValue) -> Result<FieldValue, TableError> {

        let row_count = self.rows.len();
        if row_index >= row_count {
            return Err(TableError::Range { index: row_index, row_count });
        }

        let col = self.column_index(column_name)
            .ok_or_else(|| TableError::UnknownColumn(column_name.to_string()))?;

        debug!(row = row_index, column = column_name, value = %value, "updating cell");

        // the row length always matches the header, so the column slot exists
        self.rows[row_index]
            .set(col, value)
            .ok_or_else(|| TableError::UnknownColumn(column_name.to_string()))
    }

    /// swaps a whole row back in, used to undo a partially applied edit.
    pub(crate) fn replace_row(&mut self, row_index: usize, record: Record) -> Result<(), TableError> {
        let row_count = self.rows.len();
        if row_index >= row_count {
            return Err(TableError::Range { index: row_index, row_count });
        }
        if record.len() != self.columns.len() {
            return Err(TableError::Shape(format!(
                "row {row_index} has {} values but the header has {} columns", record.len(), self.columns.len()
            )));
        }
        self.rows[row_index] = record;
        Ok(())
    }
}



#[cfg(test)]
mod tests {
    use super::*;

    fn staff() -> Table {
        Table::from_strings(&["name", "title"], &[&["Ann", "Eng"], &["Bo", "Mgr"]]).unwrap()
    }

    #[test]
    fn rejects_ragged_rows() {
        let e = Table::from_strings(&["name", "title"], &[&["Ann"]]).unwrap_err();
        assert!(matches!(e, TableError::Shape(_)));
    }

    #[test]
    fn rejects_duplicate_columns() {
        let e = Table::from_strings(&["name", "name"], &[]).unwrap_err();
        assert!(matches!(e, TableError::Shape(_)));
    }

    #[test]
    fn update_cell_changes_only_the_target() {
        let mut t = staff();
        let before = t.clone();

        let old = t.update_cell(1, "title", FieldValue::from("Director")).unwrap();
        assert_eq!(old, FieldValue::from("Mgr"));

        assert_eq!(t.cell(1, "title"), Some(&FieldValue::from("Director")));
        assert_eq!(t.get_row(0), before.get_row(0));
        assert_eq!(t.cell(1, "name"), before.cell(1, "name"));
    }

    #[test]
    fn update_cell_checks_bounds_and_columns() {
        let mut t = staff();
        assert!(matches!(
            t.update_cell(5, "name", FieldValue::from("X")),
            Err(TableError::Range { index: 5, row_count: 2 })
        ));
        assert!(matches!(
            t.update_cell(0, "salary", FieldValue::from("X")),
            Err(TableError::UnknownColumn(c)) if c == "salary"
        ));
        assert_eq!(t, staff());
    }
}
