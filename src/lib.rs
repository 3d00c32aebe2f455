//! Roam - bootstrap and configuration layer for a cluster-scheduler terminal dashboard.
//!
//! This library resolves the dashboard configuration from CLI flags, environment
//! variables and a config file, and runs the remote-session server that hands
//! each connected terminal its own dashboard instance.

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod logging;
pub mod session;

use std::path::PathBuf;
use std::time::Duration;

/// Library-level error type for Roam operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("set {env_var} env variable, {config_key} in config file, or --{flag} argument")]
    MissingConfiguration {
        env_var: String,
        config_key: String,
        flag: String,
    },

    #[error("token must be 36 characters, got {length}")]
    InvalidToken { length: usize },

    #[error("{0} cannot be parsed into topic")]
    InvalidTopicSyntax(String),

    #[error("error {stage} event jq query: {message}")]
    QueryCompileFailure { stage: &'static str, message: String },

    #[error("{setting} value {value} cannot be converted to a non-negative integer")]
    IntegerParseFailure { setting: &'static str, value: String },

    #[error("failed to bind to {addr}: {source}")]
    BindFailure {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("sessions did not close within {0:?} of shutdown")]
    ShutdownTimeout(Duration),

    #[error("config file {path}: {message}")]
    ConfigFile { path: PathBuf, message: String },

    #[error("invalid session handshake: {0}")]
    Handshake(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a bind failure for the given listen address.
    pub fn bind(addr: impl ToString, source: std::io::Error) -> Self {
        Error::BindFailure {
            addr: addr.to_string(),
            source,
        }
    }
}

/// Result type alias for Roam operations.
pub type Result<T> = std::result::Result<T, Error>;
