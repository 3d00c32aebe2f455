//! Assembly of the immutable dashboard configuration.

use std::time::Duration;

use super::query::EventQuery;
use super::settings::{self, ADDRESS_CHAIN, TOKEN_CHAIN};
use super::source::ConfigSource;
use super::topics::EventTopics;
use crate::Result;

/// Crate version reported by the dashboard.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit the binary was built from.
pub const COMMIT_SHA: &str = env!("ROAM_GIT_COMMIT");

/// TLS settings for the scheduler API client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsConfig {
    pub ca_cert: String,
    pub ca_path: String,
    pub client_cert: String,
    pub client_key: String,
    pub server_name: String,
    pub skip_verify: bool,
}

/// Event-stream settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventConfig {
    pub topics: EventTopics,
    pub namespace: String,
    pub query: EventQuery,
}

/// Everything the dashboard needs, resolved once and never changed.
///
/// The dashboard never reads flags, environment or config files itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub version: String,
    pub sha: String,
    /// Scheduler API address
    pub url: String,
    pub token: String,
    pub region: String,
    pub namespace: String,
    pub http_auth: String,
    pub tls: TlsConfig,
    /// Bytes back from the end of a log to start reading
    pub log_offset: u64,
    pub copy_save_path: bool,
    pub event: EventConfig,
    pub update_interval: Duration,
    pub logo_color: String,
}

impl DashboardConfig {
    /// Copy of this configuration with a different token.
    ///
    /// An invalid override is still applied; the validation failure comes back
    /// as a warning message instead of an error.
    pub fn with_override_token(&self, token: &str) -> (Self, Option<String>) {
        let warning = settings::validate_token(token)
            .err()
            .map(|e| e.to_string());
        let config = Self {
            token: token.to_string(),
            ..self.clone()
        };
        (config, warning)
    }

    /// Get the masked token for display purposes.
    pub fn masked_token(&self) -> Option<String> {
        if self.token.is_empty() {
            return None;
        }
        let chars: Vec<char> = self.token.chars().collect();
        let head: String = chars.iter().take(4).collect();
        if chars.len() <= 12 {
            Some(format!("{}...", head))
        } else {
            let tail: String = chars[chars.len() - 4..].iter().collect();
            Some(format!("{}...{}", head, tail))
        }
    }

    /// JSON view for `roam config`, with the token masked.
    pub fn to_json(&self) -> serde_json::Value {
        let topics: Vec<String> = self
            .event
            .topics
            .query_pairs()
            .into_iter()
            .map(|(_, value)| value)
            .collect();

        serde_json::json!({
            "version": self.version,
            "sha": self.sha,
            "url": self.url,
            "token": self.masked_token(),
            "region": self.region,
            "namespace": self.namespace,
            "http_auth": !self.http_auth.is_empty(),
            "tls": {
                "ca_cert": self.tls.ca_cert,
                "ca_path": self.tls.ca_path,
                "client_cert": self.tls.client_cert,
                "client_key": self.tls.client_key,
                "server_name": self.tls.server_name,
                "skip_verify": self.tls.skip_verify,
            },
            "log_offset": self.log_offset,
            "copy_save_path": self.copy_save_path,
            "event": {
                "topics": topics,
                "namespace": self.event.namespace,
                "query": self.event.query.source(),
            },
            "update_seconds": self.update_interval.as_secs(),
            "logo_color": self.logo_color,
        })
    }
}

/// A complete configuration plus the warnings produced while resolving it.
#[derive(Debug, Clone)]
pub struct Assembled {
    pub config: DashboardConfig,
    /// Deprecated-key and override-token notices, already formatted
    pub warnings: Vec<String>,
}

/// Resolve every setting and build the dashboard configuration.
///
/// `override_token`, when non-empty, replaces the resolved token; an invalid
/// override only adds a warning. Any other extractor failure aborts assembly.
pub fn assemble(source: &dyn ConfigSource, override_token: Option<&str>) -> Result<Assembled> {
    let mut warnings = Vec::new();

    let address = settings::address(source);
    if address.is_legacy() {
        warnings.push(ADDRESS_CHAIN.warning().to_string());
    }

    let token = settings::token(source)?;
    if token.is_legacy() {
        warnings.push(TOKEN_CHAIN.warning().to_string());
    }

    let config = DashboardConfig {
        version: VERSION.to_string(),
        sha: COMMIT_SHA.to_string(),
        url: address.value,
        token: token.value,
        region: settings::region(source),
        namespace: settings::namespace(source),
        http_auth: settings::http_auth(source),
        tls: TlsConfig {
            ca_cert: settings::ca_cert(source),
            ca_path: settings::ca_path(source),
            client_cert: settings::client_cert(source),
            client_key: settings::client_key(source),
            server_name: settings::tls_server_name(source),
            skip_verify: settings::skip_verify(source),
        },
        log_offset: settings::log_offset(source)?,
        copy_save_path: settings::copy_save_path(source),
        event: EventConfig {
            topics: settings::event_topics(source)?,
            namespace: settings::event_namespace(source),
            query: settings::event_query(source)?,
        },
        update_interval: settings::update_interval(source)?,
        logo_color: settings::logo_color(source),
    };

    let config = match override_token.filter(|t| !t.is_empty()) {
        Some(token) => {
            let (config, warning) = config.with_override_token(token);
            warnings.extend(warning);
            config
        }
        None => config,
    };

    Ok(Assembled { config, warnings })
}
