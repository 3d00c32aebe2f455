//! Raw configuration sources.
//!
//! The resolver never reads process state directly. It asks a [`ConfigSource`]
//! for a flag value or a bound (environment / config file) value, so tests can
//! resolve against an in-memory source.

use std::collections::HashMap;

use super::file::ConfigFile;

/// Lookup interface the resolver reads raw values through.
///
/// Both lookups return `None` for absent *and* empty values.
pub trait ConfigSource {
    /// Value passed on the command line as `--<name>`.
    fn flag(&self, name: &str) -> Option<String>;

    /// Value bound to a config key: environment variable first, then config file.
    fn bound(&self, key: &str) -> Option<String>;
}

/// Flags, a captured environment and a parsed config file, layered in that order.
#[derive(Debug, Clone, Default)]
pub struct LayeredSource {
    flags: HashMap<String, String>,
    env: HashMap<String, String>,
    file: HashMap<String, String>,
}

impl LayeredSource {
    /// Create an empty source with no flags, environment or file values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every flag value from an iterator of `(name, value)` pairs.
    pub fn with_flags<K, V>(mut self, flags: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.flags
            .extend(flags.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set a single flag value.
    pub fn with_flag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.flags.insert(name.into(), value.into());
        self
    }

    /// Set a single environment variable.
    pub fn with_env_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }

    /// Capture the current process environment.
    pub fn with_process_env(mut self) -> Self {
        self.env.extend(std::env::vars());
        self
    }

    /// Layer the values of a loaded config file beneath the environment.
    pub fn with_file(mut self, file: ConfigFile) -> Self {
        self.file.extend(file.into_values());
        self
    }

    /// Set a single config file value.
    pub fn with_file_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.file.insert(key.into().to_lowercase(), value.into());
        self
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

impl ConfigSource for LayeredSource {
    fn flag(&self, name: &str) -> Option<String> {
        if name.is_empty() {
            return None;
        }
        non_empty(self.flags.get(name))
    }

    fn bound(&self, key: &str) -> Option<String> {
        non_empty(self.env.get(&key.to_uppercase()))
            .or_else(|| non_empty(self.file.get(&key.to_lowercase())))
    }
}
