pub mod naming;

use std::{
    fs::{self, OpenOptions},
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::backend::{
    config::ExportFormat,
    err::TableError,
    io::{delimited::write_table_to, xlsx::write_workbook_to},
    table::mainmem::table::Table,
};

use naming::{sanitize, ExportNamer};


/// how many suffixes are tried before an export gives up
pub const MAX_EXPORT_ATTEMPTS: usize = 8;


/// where and how exported copies are written
#[derive(Debug, Clone)]
pub struct ExportTarget {
    pub dir: PathBuf,
    /// the exported file is named `<stem>_<suffix>.<extension>`
    pub stem: String,
    pub format: ExportFormat,
    pub delimiter: u8,
}


impl ExportTarget {
    /// names exports after the canonical file, e.g. `employee_data_<suffix>.csv`
    pub fn for_canonical(canonical: &Path, dir: PathBuf, format: ExportFormat, delimiter: u8) -> Self {
        let stem = canonical
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("export")
            .to_string();
        ExportTarget { dir, stem, format, delimiter }
    }

    fn extension(&self) -> &'static str {
        match self.format {
            ExportFormat::Delimited => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn file_name(&self, suffix: &str) -> String {
        format!("{}_{}.{}", self.stem, sanitize(suffix), self.extension())
    }
}


/// Writes `table` to a file that did not exist before the call and returns its path.
///
/// The file is created exclusively, so neither a prior export nor the canonical file is
/// ever overwritten. A name that is already taken asks `namer` for another suffix.
pub fn export_table(table: &Table, target: &ExportTarget, namer: &mut dyn ExportNamer) -> Result<PathBuf, TableError> {

    let mut last_tried = target.dir.clone();

    for attempt in 1..=MAX_EXPORT_ATTEMPTS {
        let destination = target.dir.join(target.file_name(&namer.suffix()));

        let file = match OpenOptions::new().write(true).create_new(true).open(&destination) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(attempt, destination = %destination.display(), "export name already taken");
                last_tried = destination;
                continue;
            }
            Err(e) => return Err(TableError::io(destination, e)),
        };

        let written = match target.format {
            ExportFormat::Delimited => write_table_to(table, file, target.delimiter, &destination),
            ExportFormat::Xlsx => write_workbook_to(table, file, &destination),
        };

        if let Err(e) = written {
            // don't leave a half written copy behind
            if let Err(cleanup) = fs::remove_file(&destination) {
                warn!(destination = %destination.display(), error = %cleanup, "unable to remove partial export");
            }
            return Err(e);
        }

        info!(destination = %destination.display(), rows = table.number_of_rows(), "exported table");
        return Ok(destination);
    }

    Err(TableError::io(
        last_tried,
        io::Error::new(ErrorKind::AlreadyExists, format!("no free export name after {MAX_EXPORT_ATTEMPTS} attempts")),
    ))
}
