//! CLI argument definitions for Roam.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::args;

/// Roam - terminal dashboard for a cluster scheduler.
///
/// Runs the dashboard in this terminal, or with `roam serve` hands every
/// connecting remote session its own dashboard.
///
/// Settings left unset here fall back to environment variables, then to
/// `~/.roam.toml`, then to built-in defaults.
#[derive(Parser, Debug)]
#[command(name = "roam")]
#[command(
    version,
    long_version = concat!(
        env!("CARGO_PKG_VERSION"),
        "\ncommit: ",
        env!("ROAM_GIT_COMMIT"),
        "\nbuilt:  ",
        env!("ROAM_BUILD_TIMESTAMP")
    ),
    about = "Terminal dashboard for a cluster scheduler, locally or over remote sessions",
    long_about = None
)]
pub struct Cli {
    /// Config file to read instead of ~/.roam.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Scheduler API address (NOMAD_ADDR)
    #[arg(long, global = true)]
    pub address: Option<String>,

    /// ACL token (NOMAD_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Region (NOMAD_REGION)
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Namespace (NOMAD_NAMESPACE)
    #[arg(long, global = true)]
    pub namespace: Option<String>,

    /// HTTP basic auth, user:password (NOMAD_HTTP_AUTH)
    #[arg(long, global = true)]
    pub http_auth: Option<String>,

    /// CA certificate file (NOMAD_CACERT)
    #[arg(long, global = true)]
    pub cacert: Option<String>,

    /// Directory of CA certificates (NOMAD_CAPATH)
    #[arg(long, global = true)]
    pub capath: Option<String>,

    /// Client certificate file (NOMAD_CLIENT_CERT)
    #[arg(long, global = true)]
    pub client_cert: Option<String>,

    /// Client key file (NOMAD_CLIENT_KEY)
    #[arg(long, global = true)]
    pub client_key: Option<String>,

    /// TLS server name (NOMAD_TLS_SERVER_NAME)
    #[arg(long, global = true)]
    pub tls_server_name: Option<String>,

    /// Skip TLS verification, "true" to enable (NOMAD_SKIP_VERIFY)
    #[arg(long, global = true)]
    pub skip_verify: Option<String>,

    /// Bytes back from the end of a log to start reading (ROAM_LOG_OFFSET)
    #[arg(long, global = true)]
    pub log_offset: Option<String>,

    /// Copy the full save path, "true" to enable (ROAM_COPY_SAVE_PATH)
    #[arg(long, global = true)]
    pub copy_save_path: Option<String>,

    /// Event topics, e.g. "Job:web,Allocation" (ROAM_EVENT_TOPICS)
    #[arg(long, global = true)]
    pub event_topics: Option<String>,

    /// Namespace for the event stream (ROAM_EVENT_NAMESPACE)
    #[arg(long, global = true)]
    pub event_namespace: Option<String>,

    /// jq query applied to events (ROAM_EVENT_JQ_QUERY)
    #[arg(long, global = true)]
    pub event_jq_query: Option<String>,

    /// Seconds between refreshes (ROAM_UPDATE_SECONDS)
    #[arg(long, global = true)]
    pub update: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Serve the dashboard to remote sessions
    Serve {
        /// Listen host (ROAM_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (ROAM_PORT)
        #[arg(long)]
        port: Option<String>,
    },

    /// Print the resolved configuration as JSON
    Config,
}

impl Cli {
    /// Flag values keyed by flag name, for the layered config source.
    ///
    /// Unset flags are omitted.
    pub fn flag_values(&self) -> Vec<(&'static str, String)> {
        let mut flags = vec![
            (args::ADDR.cli_name, &self.address),
            (args::TOKEN.cli_name, &self.token),
            (args::REGION.cli_name, &self.region),
            (args::NAMESPACE.cli_name, &self.namespace),
            (args::HTTP_AUTH.cli_name, &self.http_auth),
            (args::CACERT.cli_name, &self.cacert),
            (args::CAPATH.cli_name, &self.capath),
            (args::CLIENT_CERT.cli_name, &self.client_cert),
            (args::CLIENT_KEY.cli_name, &self.client_key),
            (args::TLS_SERVER_NAME.cli_name, &self.tls_server_name),
            (args::SKIP_VERIFY.cli_name, &self.skip_verify),
            (args::LOG_OFFSET.cli_name, &self.log_offset),
            (args::COPY_SAVE_PATH.cli_name, &self.copy_save_path),
            (args::EVENT_TOPICS.cli_name, &self.event_topics),
            (args::EVENT_NAMESPACE.cli_name, &self.event_namespace),
            (args::EVENT_JQ_QUERY.cli_name, &self.event_jq_query),
            (args::UPDATE_SECONDS.cli_name, &self.update),
        ];
        if let Some(Commands::Serve { host, port }) = &self.command {
            flags.push((args::HOST.cli_name, host));
            flags.push((args::PORT.cli_name, port));
        }

        flags
            .into_iter()
            .filter_map(|(name, value)| value.clone().map(|v| (name, v)))
            .collect()
    }
}
