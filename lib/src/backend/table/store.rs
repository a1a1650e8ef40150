use std::path::Path;

use tracing::info;

use crate::backend::{
    access::data::{record::Record, value::FieldValue},
    err::TableError,
    io::delimited::{read_table, write_table},
    table::mainmem::table::Table,
};


/// Owns the table every other component reads and edits.
///
/// `load` and `persist` use the same delimited format, so persisting a table and loading it
/// back yields an equal table as long as no value contains the delimiter.
#[derive(Debug)]
pub struct TableStore {
    table: Table,
    delimiter: u8,
}


impl Default for TableStore {
    fn default() -> Self { TableStore::new(b',') }
}


impl TableStore {
    pub fn new(delimiter: u8) -> Self { TableStore { table: Table::empty(), delimiter } }

    pub fn with_table(table: Table, delimiter: u8) -> Self { TableStore { table, delimiter } }


    /// parses `source` and makes it the held table, replacing whatever was there.
    /// On failure the held table is left as it was.
    pub fn load(&mut self, source: &Path) -> Result<&Table, TableError> {
        let table = read_table(source, self.delimiter)?;
        info!(source = %source.display(), rows = table.number_of_rows(), columns = table.number_of_cols(), "loaded table");
        self.table = table;
        Ok(&self.table)
    }

    pub fn get(&self) -> &Table { &self.table }

    /// replaces the held table wholesale, rows are addressed 0..n-1 in their new order
    pub fn set(&mut self, table: Table) { self.table = table; }

    pub fn update_cell(&mut self, row_index: usize, column_name: &str, value: FieldValue) -> Result<FieldValue, TableError> {
        self.table.update_cell(row_index, column_name, value)
    }

    /// rewrites `destination` with the full held table
    pub fn persist(&self, destination: &Path) -> Result<(), TableError> {
        write_table(&self.table, destination, self.delimiter)?;
        info!(destination = %destination.display(), rows = self.table.number_of_rows(), "persisted table");
        Ok(())
    }


    pub fn is_empty(&self) -> bool { self.table.is_empty() }
    pub fn row_count(&self) -> usize { self.table.number_of_rows() }

    pub fn restore_row(&mut self, row_index: usize, record: Record) -> Result<(), TableError> {
        self.table.replace_row(row_index, record)
    }
}



#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn failed_load_keeps_the_held_table() {
        let dir = TempDir::new("roster_store").unwrap();
        let table = Table::from_strings(&["name"], &[&["Ann"]]).unwrap();
        let mut store = TableStore::with_table(table.clone(), b',');

        let e = store.load(&dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(e, TableError::Format { .. }));
        assert_eq!(store.get(), &table);
    }

    #[test]
    fn persist_into_a_missing_directory_is_an_io_error() {
        let dir = TempDir::new("roster_store").unwrap();
        let store = TableStore::default();
        let e = store.persist(&dir.path().join("absent").join("out.csv")).unwrap_err();
        assert!(matches!(e, TableError::Io { .. }));
    }
}
