//! The edit-and-persist workflow every operator action goes through.
//!
//! ```text
//!  Idle --SelectRow--> RowSelected --> FormOpen --SubmitEdit--> Persisted --> Idle
//!                                         |
//!                                         +------CancelEdit------------------> Idle
//! ```
//!
//! `RowSelected` only lives for the duration of a `SelectRow` action, as the [`Selection`]
//! handed to [`EditForm::open`]. `Persisted` is likewise the tail end of `SubmitEdit`.

pub mod form;

use std::{
    fmt::Display,
    mem,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::backend::{
    config::Config,
    err::TableError,
    export::{
        export_table,
        naming::{namer_for, ExportNamer},
        ExportTarget,
    },
    table::{mainmem::table::Table, store::TableStore},
};

pub use form::{EditForm, FormField, Selection};


/// everything an operator can ask the workflow to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Export,
    Import,
    /// the rows currently selected in the view, an edit needs exactly one
    SelectRow(Vec<usize>),
    EditField { column: String, text: String },
    SubmitEdit,
    CancelEdit,
}


/// The outcome of one action, meant to be shown to the operator as is.
#[derive(Debug)]
pub enum Report {
    Exported(PathBuf),
    Imported { rows: usize, source: PathBuf },
    /// the table wasn't empty, importing would have thrown away what it holds
    ImportSkipped { rows: usize },
    NoSelection,
    MultipleSelection(usize),
    FormOpened { row: usize },
    FieldEdited { column: String },
    Saved { row: usize, changed: usize, destination: PathBuf },
    EditCancelled { row: usize },
    NotEditing,
    Failed(TableError),
}

impl Report {
    pub fn is_failure(&self) -> bool { matches!(self, Report::Failed(_)) }

    /// the action was understood but there was nothing to do
    pub fn is_noop(&self) -> bool {
        matches!(self, Report::ImportSkipped { .. } | Report::NoSelection | Report::MultipleSelection(_) | Report::NotEditing)
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Report::Exported(path)
                => write!(f, "exported the table to '{}'", path.display()),
            Report::Imported { rows, source }
                => write!(f, "imported {rows} rows from '{}'", source.display()),
            Report::ImportSkipped { rows }
                => write!(f, "the table already holds {rows} rows, nothing was imported"),
            Report::NoSelection
                => write!(f, "no row is selected"),
            Report::MultipleSelection(n)
                => write!(f, "{n} rows are selected, select exactly one row to edit"),
            Report::FormOpened { row }
                => write!(f, "editing row {row}"),
            Report::FieldEdited { column }
                => write!(f, "'{column}' changed in the form"),
            Report::Saved { row, changed, destination }
                => write!(f, "saved row {row} ({changed} fields changed) to '{}'", destination.display()),
            Report::EditCancelled { row }
                => write!(f, "discarded the edits to row {row}"),
            Report::NotEditing
                => write!(f, "no edit form is open"),
            Report::Failed(e)
                => write!(f, "{e}"),
        }
    }
}


#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditState {
    #[default]
    Idle,
    FormOpen(EditForm),
}


pub struct Workflow {
    store: TableStore,
    canonical: PathBuf,
    export: ExportTarget,
    namer: Box<dyn ExportNamer>,
    state: EditState,
}


impl Workflow {
    pub fn new(store: TableStore, canonical: PathBuf, export: ExportTarget, namer: Box<dyn ExportNamer>) -> Self {
        Workflow { store, canonical, export, namer, state: EditState::Idle }
    }

    /// an empty store wired to the configured canonical file and export settings
    pub fn from_config(config: &Config) -> Result<Self, TableError> {
        let delimiter = config.delimiter_byte()?;
        let export = ExportTarget::for_canonical(
            &config.canonical_path,
            config.export_dir(),
            config.export_format,
            delimiter,
        );
        Ok(Workflow::new(
            TableStore::new(delimiter),
            config.canonical_path.clone(),
            export,
            namer_for(&config.export_suffix),
        ))
    }

    pub fn store(&self) -> &TableStore { &self.store }
    pub fn table(&self) -> &Table { self.store.get() }
    pub fn state(&self) -> &EditState { &self.state }
    pub fn canonical_path(&self) -> &Path { &self.canonical }

    pub fn form(&self) -> Option<&EditForm> {
        match &self.state {
            EditState::FormOpen(form) => Some(form),
            EditState::Idle => None,
        }
    }


    /// Runs one action to completion. Failures come back as [`Report::Failed`] and always leave
    /// the workflow `Idle`, discarding any open form.
    pub fn handle(&mut self, action: Action) -> Report {
        debug!(?action, "handling action");

        let result = match action {
            Action::Export => self.export(),
            Action::Import => self.import(),
            Action::SelectRow(rows) => self.select(&rows),
            Action::EditField { column, text } => self.edit_field(&column, text),
            Action::SubmitEdit => self.submit(),
            Action::CancelEdit => Ok(self.cancel()),
        };

        match result {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "action failed");
                self.state = EditState::Idle;
                Report::Failed(e)
            }
        }
    }


    fn export(&mut self) -> Result<Report, TableError> {
        let path = export_table(self.store.get(), &self.export, self.namer.as_mut())?;
        Ok(Report::Exported(path))
    }

    fn import(&mut self) -> Result<Report, TableError> {
        if !self.store.is_empty() {
            return Ok(Report::ImportSkipped { rows: self.store.row_count() });
        }
        let rows = self.store.load(&self.canonical)?.number_of_rows();
        Ok(Report::Imported { rows, source: self.canonical.clone() })
    }

    fn select(&mut self, rows: &[usize]) -> Result<Report, TableError> {
        let row = match rows {
            [] => return Ok(Report::NoSelection),
            [row] => *row,
            many => return Ok(Report::MultipleSelection(many.len())),
        };

        // Idle -> RowSelected
        let selection = Selection::capture(self.store.get(), row)?;

        if let EditState::FormOpen(open) = &self.state {
            debug!(row = open.row_index(), "discarding the open form");
        }

        // RowSelected -> FormOpen
        self.state = EditState::FormOpen(EditForm::open(selection, self.store.get().columns()));
        Ok(Report::FormOpened { row })
    }

    fn edit_field(&mut self, column: &str, text: String) -> Result<Report, TableError> {
        let EditState::FormOpen(form) = &mut self.state else { return Ok(Report::NotEditing) };
        form.set_field(column, text)?;
        Ok(Report::FieldEdited { column: column.to_string() })
    }

    /// Writes every field of the form into its row, then rewrites the canonical file.
    ///
    /// All or nothing: when any cell update or the rewrite fails the row is put back the way
    /// it was before the save, so the table and the canonical file keep agreeing.
    fn submit(&mut self) -> Result<Report, TableError> {
        let form = match mem::take(&mut self.state) {
            EditState::FormOpen(form) => form,
            EditState::Idle => return Ok(Report::NotEditing),
        };

        let row = form.row_index();
        let before = self.store.get().get_row(row).cloned().ok_or(TableError::Range {
            index: row,
            row_count: self.store.row_count(),
        })?;

        let saved = self.write_form(&form);

        if let Err(e) = saved {
            if let Err(restore) = self.store.restore_row(row, before) {
                warn!(row, error = %restore, "unable to roll back the row");
            }
            return Err(e);
        }

        Ok(Report::Saved { row, changed: form.modified_count(), destination: self.canonical.clone() })
    }

    fn write_form(&mut self, form: &EditForm) -> Result<(), TableError> {
        let row = form.row_index();
        for (column, value) in form.values() {
            self.store.update_cell(row, column, value)?;
        }
        self.store.persist(&self.canonical)
    }

    fn cancel(&mut self) -> Report {
        match mem::take(&mut self.state) {
            EditState::FormOpen(form) => Report::EditCancelled { row: form.row_index() },
            EditState::Idle => Report::NotEditing,
        }
    }
}



#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{config::ExportFormat, export::naming::MockExportNamer};
    use tempdir::TempDir;

    fn staff() -> Table {
        Table::from_strings(&["name", "title"], &[&["Ann", "Eng"], &["Bo", "Mgr"]]).unwrap()
    }

    fn workflow_in(dir: &Path, table: Table, namer: MockExportNamer) -> Workflow {
        let canonical = dir.join("employee_data.csv");
        let export = ExportTarget::for_canonical(&canonical, dir.to_path_buf(), ExportFormat::Delimited, b',');
        Workflow::new(TableStore::with_table(table, b','), canonical, export, Box::new(namer))
    }

    #[test]
    fn export_asks_the_namer_once_per_attempt() {
        let dir = TempDir::new("roster_workflow").unwrap();
        let mut namer = MockExportNamer::new();
        namer.expect_suffix().times(1).returning(|| "one".to_string());

        let mut wf = workflow_in(dir.path(), staff(), namer);
        let report = wf.handle(Action::Export);

        assert!(matches!(&report, Report::Exported(p) if p == &dir.path().join("employee_data_one.csv")));
        // the canonical file is never touched by an export
        assert!(!dir.path().join("employee_data.csv").exists());
    }

    #[test]
    fn form_actions_while_idle_are_noops() {
        let dir = TempDir::new("roster_workflow").unwrap();
        let mut wf = workflow_in(dir.path(), staff(), MockExportNamer::new());

        assert!(matches!(wf.handle(Action::SubmitEdit), Report::NotEditing));
        assert!(matches!(wf.handle(Action::CancelEdit), Report::NotEditing));
        assert!(matches!(
            wf.handle(Action::EditField { column: "name".into(), text: "X".into() }),
            Report::NotEditing
        ));
        assert_eq!(wf.table(), &staff());
    }

    #[test]
    fn failed_edit_returns_to_idle() {
        let dir = TempDir::new("roster_workflow").unwrap();
        let mut wf = workflow_in(dir.path(), staff(), MockExportNamer::new());

        wf.handle(Action::SelectRow(vec![0]));
        let report = wf.handle(Action::EditField { column: "salary".into(), text: "1".into() });

        assert!(matches!(report, Report::Failed(TableError::UnknownColumn(_))));
        assert_eq!(wf.state(), &EditState::Idle);
    }

    #[test]
    fn reselecting_replaces_the_open_form() {
        let dir = TempDir::new("roster_workflow").unwrap();
        let mut wf = workflow_in(dir.path(), staff(), MockExportNamer::new());

        wf.handle(Action::SelectRow(vec![0]));
        wf.handle(Action::EditField { column: "name".into(), text: "Anne".into() });
        wf.handle(Action::SelectRow(vec![1]));

        let form = wf.form().unwrap();
        assert_eq!(form.row_index(), 1);
        assert_eq!(form.field("name").unwrap().text, "Bo");
    }

    #[test]
    fn failed_export_discards_the_open_form() {
        let dir = TempDir::new("roster_workflow").unwrap();
        let canonical = dir.path().join("employee_data.csv");
        let export = ExportTarget::for_canonical(&canonical, dir.path().join("absent"), ExportFormat::Delimited, b',');
        let mut namer = MockExportNamer::new();
        namer.expect_suffix().times(1).returning(|| "x".to_string());
        let mut wf = Workflow::new(TableStore::with_table(staff(), b','), canonical, export, Box::new(namer));

        wf.handle(Action::SelectRow(vec![0]));
        assert!(matches!(wf.handle(Action::Export), Report::Failed(TableError::Io { .. })));
        assert_eq!(wf.state(), &EditState::Idle);
        assert_eq!(wf.table(), &staff());
    }
}
