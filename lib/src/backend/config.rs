use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::backend::err::TableError;


/// the well-known name of the file the workflow loads from and saves back to
pub const CANONICAL_FILE_NAME: &str = "employee_data.csv";

const CONFIG_DIR_NAME: &str = "roster";
const CONFIG_FILE_NAME: &str = "config.json";


/// how exported copies get their collision-avoiding suffix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SuffixStrategy {
    /// a random alphanumeric token
    #[default]
    Random,
    /// the UTC time of the export, down to the millisecond
    Timestamp,
    /// always the same token, mostly useful for scripted exports
    Fixed(String),
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// the same delimited layout the canonical file uses
    #[default]
    Delimited,
    Xlsx,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub canonical_path: PathBuf,
    /// where exported copies are written, defaults to the directory holding the canonical file
    pub export_dir: Option<PathBuf>,
    pub delimiter: char,
    pub export_suffix: SuffixStrategy,
    pub export_format: ExportFormat,
}


impl Default for Config {
    fn default() -> Self {
        Config {
            canonical_path: PathBuf::from(CANONICAL_FILE_NAME),
            export_dir: None,
            delimiter: ',',
            export_suffix: SuffixStrategy::default(),
            export_format: ExportFormat::default(),
        }
    }
}


impl Config {

    /// reads a JSON configuration file. Missing keys fall back to their defaults.
    pub fn load(path: &Path) -> Result<Config, TableError> {
        let text = fs::read_to_string(path).map_err(
            |e| TableError::Config(format!("unable to read '{}': {e}", path.display()))
        )?;
        let config: Config = serde_json::from_str(&text).map_err(
            |e| TableError::Config(format!("'{}' is not a valid configuration: {e}", path.display()))
        )?;
        config.delimiter_byte()?;

        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// `<config dir>/roster/config.json`, e.g. `~/.config/roster/config.json` on linux
    pub fn default_location() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// uses `explicit` if given, otherwise the default location when a file exists there,
    /// otherwise the built in defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Config, TableError> {
        if let Some(path) = explicit { return Config::load(path) }

        match Config::default_location() {
            Some(path) if path.is_file() => Config::load(&path),
            _ => {
                debug!("no configuration file found, using defaults");
                Ok(Config::default())
            }
        }
    }

    /// the delimiter as the single byte the file format needs
    pub fn delimiter_byte(&self) -> Result<u8, TableError> {
        if self.delimiter.is_ascii() && !matches!(self.delimiter, '\n' | '\r' | '"') {
            Ok(self.delimiter as u8)
        } else {
            Err(TableError::Config(format!("the delimiter {:?} must be a single ascii character", self.delimiter)))
        }
    }

    pub fn export_dir(&self) -> PathBuf {
        match &self.export_dir {
            Some(dir) => dir.clone(),
            None => self.canonical_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        }
    }
}
