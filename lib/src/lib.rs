pub mod backend;
pub use backend::table::mainmem::table::{self, Table};
pub use backend::table::store::TableStore;
pub use backend::access::data::{record::Record, value::FieldValue};
pub use backend::config::{Config, ExportFormat, SuffixStrategy, CANONICAL_FILE_NAME};
pub use backend::err::TableError;
pub use backend::export::{naming::{ExportNamer, FixedSuffix, RandomSuffix, TimestampSuffix}, ExportTarget};
pub use backend::workflow::{Action, EditForm, EditState, Report, Workflow};
