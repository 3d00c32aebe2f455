//! Configuration resolution for Roam.
//!
//! Every setting is described by an [`Arg`] pairing its CLI flag with its
//! config-file key. The environment variable is the upper-cased key.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flag (`--address`)
//! 2. Environment variable (`NOMAD_ADDR`)
//! 3. Config file value (`nomad_addr` in `~/.roam.toml`)
//! 4. Built-in default
//!
//! Address and token also accept legacy keys (`roam_addr`, `roam_token`).
//! A value found only under a legacy key still resolves, alongside a
//! [`DeprecationWarning`] naming the replacement.
//!
//! Use [`assemble`] to build the immutable [`DashboardConfig`].

pub mod args;
pub mod assemble;
pub mod file;
pub mod query;
pub mod resolver;
pub mod settings;
pub mod source;
pub mod topics;

pub use args::Arg;
pub use assemble::{Assembled, DashboardConfig, EventConfig, TlsConfig, assemble};
pub use file::{CONFIG_FILE_NAME, ConfigFile, default_config_path};
pub use query::{DEFAULT_EVENT_QUERY, EventQuery};
pub use resolver::{
    DeprecationWarning, Legacy, Resolved, ValueSource, resolve_required, resolve_unflagged,
    resolve_with_default, resolve_with_legacy,
};
pub use source::{ConfigSource, LayeredSource};
pub use topics::{EventTopics, Topic};
