//! Argument descriptors for every configurable setting.

/// Pairs a CLI flag name with its config-file key.
///
/// The environment variable read for a setting is the upper-cased config key,
/// so `nomad_addr` is read from `NOMAD_ADDR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arg {
    /// Long flag name, without the leading `--`
    pub cli_name: &'static str,
    /// Key in the config file
    pub config_key: &'static str,
}

impl Arg {
    pub const fn new(cli_name: &'static str, config_key: &'static str) -> Self {
        Self {
            cli_name,
            config_key,
        }
    }

    /// Environment variable name for this setting.
    pub fn env_var(&self) -> String {
        self.config_key.to_uppercase()
    }
}

pub const ADDR: Arg = Arg::new("address", "nomad_addr");
pub const LEGACY_ADDR: Arg = Arg::new("address", "roam_addr");
pub const TOKEN: Arg = Arg::new("token", "nomad_token");
pub const LEGACY_TOKEN: Arg = Arg::new("token", "roam_token");
pub const REGION: Arg = Arg::new("region", "nomad_region");
pub const NAMESPACE: Arg = Arg::new("namespace", "nomad_namespace");
pub const HTTP_AUTH: Arg = Arg::new("http-auth", "nomad_http_auth");
pub const CACERT: Arg = Arg::new("cacert", "nomad_cacert");
pub const CAPATH: Arg = Arg::new("capath", "nomad_capath");
pub const CLIENT_CERT: Arg = Arg::new("client-cert", "nomad_client_cert");
pub const CLIENT_KEY: Arg = Arg::new("client-key", "nomad_client_key");
pub const TLS_SERVER_NAME: Arg = Arg::new("tls-server-name", "nomad_tls_server_name");
pub const SKIP_VERIFY: Arg = Arg::new("skip-verify", "nomad_skip_verify");
pub const LOG_OFFSET: Arg = Arg::new("log-offset", "roam_log_offset");
pub const COPY_SAVE_PATH: Arg = Arg::new("copy-save-path", "roam_copy_save_path");
pub const EVENT_TOPICS: Arg = Arg::new("event-topics", "roam_event_topics");
pub const EVENT_NAMESPACE: Arg = Arg::new("event-namespace", "roam_event_namespace");
pub const EVENT_JQ_QUERY: Arg = Arg::new("event-jq-query", "roam_event_jq_query");
pub const UPDATE_SECONDS: Arg = Arg::new("update", "roam_update_seconds");
/// Logo color has no flag; only the config key is consulted.
pub const LOGO_COLOR: Arg = Arg::new("", "roam_logo_color");
pub const HOST: Arg = Arg::new("host", "roam_host");
pub const PORT: Arg = Arg::new("port", "roam_port");
