use std::{io::Write, path::Path};

use rust_xlsxwriter::{Workbook, XlsxError};

use crate::backend::{access::data::value::FieldValue, err::TableError, table::mainmem::table::Table};


const MIN_COLUMN_WIDTH: f64 = 8.0;


fn to_io(destination: &Path, e: XlsxError) -> TableError {
    TableError::io(destination, std::io::Error::other(e.to_string()))
}

fn too_large(destination: &Path) -> TableError {
    TableError::io(destination, std::io::Error::other("the table does not fit in a worksheet"))
}


/// renders the table as a single-sheet workbook. The header goes in row 0,
/// numbers are written as numbers so spreadsheet formulas keep working on them.
pub fn workbook_bytes(table: &Table, destination: &Path) -> Result<Vec<u8>, TableError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    // set column widths
    for (col_idx, name) in table.columns().iter().enumerate() {
        let widest = table
            .rows()
            .iter()
            .filter_map(|r| r.get(col_idx))
            .map(|v| v.to_string().chars().count())
            .chain(std::iter::once(name.chars().count()))
            .max()
            .unwrap_or(0);

        let col_width = (widest as f64).max(MIN_COLUMN_WIDTH);
        let col_number = u16::try_from(col_idx).map_err(|_| too_large(destination))?;
        worksheet.set_column_width(col_number, col_width).map_err(|e| to_io(destination, e))?;
        worksheet.write_string(0, col_number, name).map_err(|e| to_io(destination, e))?;
    }

    for (row_idx, row) in table.rows().iter().enumerate() {
        let row_number = u32::try_from(row_idx + 1).map_err(|_| too_large(destination))?;

        for (col_idx, cell) in row.values().iter().enumerate() {
            let col_number = u16::try_from(col_idx).map_err(|_| too_large(destination))?;
            match cell {
                FieldValue::Integer(_) | FieldValue::Float(_) => {
                    let n = cell.as_f64().unwrap_or_default();
                    worksheet.write_number(row_number, col_number, n).map_err(|e| to_io(destination, e))?;
                }
                FieldValue::Text(s) => {
                    worksheet.write_string(row_number, col_number, s).map_err(|e| to_io(destination, e))?;
                }
            }
        }
    }

    workbook.save_to_buffer().map_err(|e| to_io(destination, e))
}


/// writes the workbook into an already opened destination
pub fn write_workbook_to<W: Write>(table: &Table, mut writer: W, destination: &Path) -> Result<(), TableError> {
    let bytes = workbook_bytes(table, destination)?;
    writer.write_all(&bytes).map_err(|e| TableError::io(destination, e))?;
    writer.flush().map_err(|e| TableError::io(destination, e))
}
