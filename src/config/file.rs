//! Config file discovery and loading.
//!
//! The config file is flat TOML: top-level keys match the config keys of
//! [`Arg`](super::Arg) descriptors.
//!
//! ```toml
//! nomad_addr = "https://nomad.example.com:4646"
//! nomad_namespace = "web"
//! roam_update_seconds = 5
//! roam_event_topics = ["Job", "Node:web-*"]
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// File name looked up in the home directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = ".roam.toml";

/// Default config file location (`~/.roam.toml`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}

/// Flattened key/value view of a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    path: Option<PathBuf>,
    values: HashMap<String, String>,
}

impl ConfigFile {
    /// A config file with no values, used when no file exists.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the config file.
    ///
    /// An explicit path must exist and parse. Without one, `~/.roam.toml` is
    /// read if present and silently skipped otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.is_file() => path,
                _ => return Ok(Self::empty()),
            },
        };

        let content = std::fs::read_to_string(&path).map_err(|e| Error::ConfigFile {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Self::parse(&content, &path)
    }

    /// Parse TOML content read from `path`.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let table: toml::Table = content.parse().map_err(|e: toml::de::Error| Error::ConfigFile {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;

        let values = table
            .iter()
            .filter_map(|(key, value)| stringify(value).map(|v| (key.to_lowercase(), v)))
            .collect();

        Ok(Self {
            path: Some(path.to_path_buf()),
            values,
        })
    }

    /// Path the values were read from, if a file was read.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Raw string value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn into_values(self) -> HashMap<String, String> {
        self.values
    }
}

/// Render a TOML value the way it would be typed on the command line.
///
/// Arrays of scalars are joined with commas; tables are not settings.
fn stringify(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(stringify).collect();
            Some(parts.join(","))
        }
        toml::Value::Table(_) => None,
    }
}
