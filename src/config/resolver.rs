//! Layered value resolution.
//!
//! Every lookup follows the same chain: CLI flag, then the bound
//! environment/config value, then (depending on the policy) a default or an
//! error. Resolution is pure: it reads only the [`ConfigSource`] it is given and
//! reports deprecated-key use as data instead of printing.

use std::fmt;

use super::args::Arg;
use super::source::ConfigSource;
use crate::{Error, Result};

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from CLI flag
    CliFlag,
    /// Value from environment variable or config file
    Bound,
    /// Built-in default value
    Default,
    /// Value from a deprecated config key
    Legacy(String),
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Bound => write!(f, "env/config"),
            ValueSource::Default => write!(f, "default"),
            ValueSource::Legacy(key) => write!(f, "legacy:{}", key),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    /// Create a new resolved value.
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }

    /// Check if the value came from a deprecated key.
    pub fn is_legacy(&self) -> bool {
        matches!(self.source, ValueSource::Legacy(_))
    }

    /// Transform the value, keeping its source.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
        Resolved::new(f(self.value), self.source)
    }
}

/// A setting whose config key was renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Legacy {
    pub current: Arg,
    pub legacy: Arg,
}

impl Legacy {
    pub const fn new(current: Arg, legacy: Arg) -> Self {
        Self { current, legacy }
    }

    /// Warning to surface when a value resolved through the legacy key.
    pub fn warning(&self) -> DeprecationWarning {
        DeprecationWarning {
            deprecated: self.legacy,
            replacement: self.current,
        }
    }
}

/// Non-fatal notice that a deprecated key supplied a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecationWarning {
    pub deprecated: Arg,
    pub replacement: Arg,
}

impl fmt::Display for DeprecationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "warning: use of {} env variable or {} in config file will be removed in a future release",
            self.deprecated.env_var(),
            self.deprecated.config_key
        )?;
        write!(
            f,
            "use {} env variable or {} in config file instead",
            self.replacement.env_var(),
            self.replacement.config_key
        )
    }
}

fn lookup(source: &dyn ConfigSource, arg: &Arg) -> Option<Resolved<String>> {
    if let Some(value) = source.flag(arg.cli_name) {
        return Some(Resolved::new(value, ValueSource::CliFlag));
    }
    source
        .bound(arg.config_key)
        .map(|value| Resolved::new(value, ValueSource::Bound))
}

/// Resolve a setting, falling back to `default` when no source sets it.
pub fn resolve_with_default(
    source: &dyn ConfigSource,
    arg: &Arg,
    default: &str,
) -> Resolved<String> {
    lookup(source, arg)
        .unwrap_or_else(|| Resolved::new(default.to_string(), ValueSource::Default))
}

/// Resolve a setting that has no default.
///
/// The error names the environment variable, config key and flag so the user
/// can set any one of them.
pub fn resolve_required(source: &dyn ConfigSource, arg: &Arg) -> Result<Resolved<String>> {
    lookup(source, arg).ok_or_else(|| Error::MissingConfiguration {
        env_var: arg.env_var(),
        config_key: arg.config_key.to_string(),
        flag: arg.cli_name.to_string(),
    })
}

/// Resolve a renamed setting: the current key first, then the legacy key.
///
/// A legacy hit is tagged [`ValueSource::Legacy`]; callers turn that into
/// [`Legacy::warning`]. When neither resolves, the error names the current key
/// only, so users are never pointed at the deprecated name.
pub fn resolve_with_legacy(source: &dyn ConfigSource, legacy: &Legacy) -> Result<Resolved<String>> {
    match resolve_required(source, &legacy.current) {
        Ok(resolved) => Ok(resolved),
        Err(err) => match resolve_required(source, &legacy.legacy) {
            Ok(old) => Ok(Resolved::new(
                old.value,
                ValueSource::Legacy(legacy.legacy.config_key.to_string()),
            )),
            Err(_) => Err(err),
        },
    }
}

/// Resolve a setting that has no CLI flag: environment/config, then default.
pub fn resolve_unflagged(source: &dyn ConfigSource, arg: &Arg, default: &str) -> Resolved<String> {
    source
        .bound(arg.config_key)
        .map(|value| Resolved::new(value, ValueSource::Bound))
        .unwrap_or_else(|| Resolved::new(default.to_string(), ValueSource::Default))
}
