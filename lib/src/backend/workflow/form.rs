use crate::backend::{
    access::data::{record::Record, value::FieldValue},
    err::TableError,
    table::mainmem::table::Table,
};


/// The row an operator picked, with its values as they were at that moment.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    row_index: usize,
    snapshot: Record,
}

impl Selection {
    /// captures row `row_index` of `table`
    pub fn capture(table: &Table, row_index: usize) -> Result<Selection, TableError> {
        let snapshot = table.get_row(row_index).cloned().ok_or(TableError::Range {
            index: row_index,
            row_count: table.number_of_rows(),
        })?;
        Ok(Selection { row_index, snapshot })
    }

    pub fn row_index(&self) -> usize { self.row_index }
    pub fn snapshot(&self) -> &Record { &self.snapshot }
}


#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub column: String,
    pub original: FieldValue,
    pub text: String,
}

impl FormField {
    pub fn is_modified(&self) -> bool { self.original.to_string() != self.text }
}


/// The editable copy of a selected row: one text field per column, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct EditForm {
    selection: Selection,
    fields: Vec<FormField>,
}

impl EditForm {
    pub fn open(selection: Selection, columns: &[String]) -> EditForm {
        let fields = columns
            .iter()
            .zip(selection.snapshot().values())
            .map(|(column, value)| FormField {
                column: column.clone(),
                original: value.clone(),
                text: value.to_string(),
            })
            .collect();
        EditForm { selection, fields }
    }

    pub fn row_index(&self) -> usize { self.selection.row_index() }
    pub fn fields(&self) -> &[FormField] { &self.fields }

    pub fn field(&self, column: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.column == column)
    }

    pub fn set_field(&mut self, column: &str, text: impl Into<String>) -> Result<(), TableError> {
        let field = self.fields
            .iter_mut()
            .find(|f| f.column == column)
            .ok_or_else(|| TableError::UnknownColumn(column.to_string()))?;
        field.text = text.into();
        Ok(())
    }

    /// every field as the value it will be stored as, untouched fields keep their original value
    pub fn values(&self) -> Vec<(&str, FieldValue)> {
        self.fields
            .iter()
            .map(|f| {
                let value = if f.is_modified() { FieldValue::parse(&f.text) } else { f.original.clone() };
                (f.column.as_str(), value)
            })
            .collect()
    }

    pub fn modified_count(&self) -> usize { self.fields.iter().filter(|f| f.is_modified()).count() }
}
