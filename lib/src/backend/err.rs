use std::{io, path::PathBuf};

use thiserror::Error;



#[derive(Debug, Error)]
pub enum TableError {

    /// the source is missing or can't be parsed into a table.
    /// first is the source path, second is what was wrong with it
    #[error("the table source '{}' is malformed: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    /// an in-memory table whose rows don't line up with its header
    #[error("malformed table: {0}")]
    Shape(String),

    #[error("row {index} is out of range, the table has {row_count} rows")]
    Range { index: usize, row_count: usize },

    #[error("the column '{0}' does not exist in the table")]
    UnknownColumn(String),

    /// thrown when writing a table (persist or export) fails
    #[error("an error has occurred with file {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid configuration: {0}")]
    Config(String),
}


impl TableError {
    pub(crate) fn format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        TableError::Format { path: path.into(), reason: reason.into() }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TableError::Io { path: path.into(), source }
    }
}
