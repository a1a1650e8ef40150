use std::{
    fs::{self, File},
    io::{Read, Write},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::backend::{
    access::data::{record::Record, value::FieldValue},
    err::TableError,
    table::mainmem::table::Table,
};


// ---------------
//      IMPORT
// ----------------

/// reads a delimited file: the first line is the header, each line after it is one record.
pub fn read_table(path: &Path, delimiter: u8) -> Result<Table, TableError> {
    let file = File::open(path).map_err(
        |e| TableError::format(path, format!("unable to open the file ({e})"))
    )?;
    read_table_from(file, delimiter, path)
}


/// `origin` is only used to label errors.
pub fn read_table_from<R: Read>(reader: R, delimiter: u8, origin: &Path) -> Result<Table, TableError> {

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(reader);

    let header = reader.headers().map_err(|e| TableError::format(origin, e.to_string()))?;
    if header.is_empty() {
        return Err(TableError::format(origin, "missing header row"));
    }
    let columns: Vec<String> = header.iter().map(str::to_string).collect();

    let mut rows: Vec<Record> = Vec::new();
    for result in reader.records() {
        // the reader is not flexible, so a short or long line surfaces here
        let line = result.map_err(|e| TableError::format(origin, e.to_string()))?;
        rows.push(line.iter().map(FieldValue::parse).collect());
    }

    debug!(source = %origin.display(), rows = rows.len(), columns = columns.len(), "parsed delimited table");

    Table::new(columns, rows).map_err(|e| match e {
        TableError::Shape(reason) => TableError::format(origin, reason),
        other => other,
    })
}



// ---------------
//     EXPORT
// ---------------

/// writes the header and every record, in order, to `writer`.
pub fn write_table_to<W: Write>(table: &Table, writer: W, delimiter: u8, destination: &Path) -> Result<(), TableError> {

    let to_io = |e: csv::Error| TableError::io(destination, e.into());

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    writer.write_record(table.columns()).map_err(to_io)?;
    for row in table.rows() {
        writer.write_record(row.to_strings()).map_err(to_io)?;
    }
    writer.flush().map_err(|e| TableError::io(destination, e))?;
    Ok(())
}


/// replaces `path` with the table. The text goes to a sibling `.tmp` file first and is renamed
/// over `path`, so a failed write leaves the previous contents in place.
pub fn write_table(table: &Table, path: &Path, delimiter: u8) -> Result<(), TableError> {
    let mut buffer: Vec<u8> = Vec::new();
    write_table_to(table, &mut buffer, delimiter, path)?;

    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    let staged = fs::write(&staging, &buffer).and_then(|_| fs::rename(&staging, path));
    if let Err(e) = staged {
        // a partly written staging file is worthless, whichever step failed
        let _ = fs::remove_file(&staging);
        return Err(TableError::io(path, e));
    }
    Ok(())
}



#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Table, TableError> {
        read_table_from(text.as_bytes(), b',', Path::new("inline.csv"))
    }

    #[test]
    fn reads_header_and_rows() {
        let t = parse("name,title,age\nAnn,Eng,31\nBo,Mgr,45\n").unwrap();
        assert_eq!(t.columns(), ["name", "title", "age"]);
        assert_eq!(t.number_of_rows(), 2);
        assert_eq!(t.cell(1, "age"), Some(&FieldValue::Integer(45)));
    }

    #[test]
    fn header_only_is_an_empty_table() {
        let t = parse("name,title\n").unwrap();
        assert_eq!(t.number_of_cols(), 2);
        assert!(t.is_empty());
    }

    #[test]
    fn missing_header_is_a_format_error() {
        assert!(matches!(parse(""), Err(TableError::Format { .. })));
    }

    #[test]
    fn inconsistent_column_counts_are_a_format_error() {
        assert!(matches!(parse("name,title\nAnn\n"), Err(TableError::Format { .. })));
        assert!(matches!(parse("name,title\nAnn,Eng,extra\n"), Err(TableError::Format { .. })));
    }

    #[test]
    fn duplicate_header_is_a_format_error() {
        assert!(matches!(parse("name,name\nAnn,Bo\n"), Err(TableError::Format { .. })));
    }

    #[test]
    fn failed_rewrite_removes_the_staging_file() {
        let dir = tempdir::TempDir::new("roster_delimited").unwrap();
        let path = dir.path().join("employee_data.csv");
        fs::write(&path, "name\nAnn\n").unwrap();
        // a directory in place of the target makes the rename fail after the staging write
        let blocked = dir.path().join("blocked");
        fs::create_dir(&blocked).unwrap();
        fs::write(blocked.join("inner"), "x").unwrap();

        let t = Table::from_strings(&["name"], &[&["Bo"]]).unwrap();
        assert!(matches!(write_table(&t, &blocked, b','), Err(TableError::Io { .. })));
        assert!(!dir.path().join("blocked.tmp").exists());

        write_table(&t, &path, b',').unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "name\nBo\n");
        assert!(!dir.path().join("employee_data.csv.tmp").exists());
    }

    #[test]
    fn writes_with_a_custom_delimiter() {
        let t = Table::from_strings(&["name", "title"], &[&["Ann", "Eng"]]).unwrap();
        let mut out: Vec<u8> = Vec::new();
        write_table_to(&t, &mut out, b';', Path::new("inline.csv")).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "name;title\nAnn;Eng\n");
    }
}
