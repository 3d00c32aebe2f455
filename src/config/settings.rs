//! Typed setting extractors.
//!
//! Each extractor resolves one setting through the resolver and parses or
//! validates it. Extractors never print or exit: failures come back as
//! [`Error`] values for the entry point to report.

use std::time::Duration;

use super::args::{self, Arg};
use super::query::{DEFAULT_EVENT_QUERY, EventQuery};
use super::resolver::{
    Legacy, Resolved, ValueSource, resolve_required, resolve_unflagged, resolve_with_default,
    resolve_with_legacy,
};
use super::source::ConfigSource;
use super::topics::{DEFAULT_EVENT_TOPICS, EventTopics};
use crate::{Error, Result};

/// Scheduler address used when no address is configured anywhere.
pub const DEFAULT_ADDRESS: &str = "http://localhost:4646";

/// Required token length; tokens are UUIDs.
pub const TOKEN_LENGTH: usize = 36;

pub const DEFAULT_UPDATE_SECONDS: u64 = 2;
pub const DEFAULT_LOG_OFFSET: u64 = 1_000_000;
pub const DEFAULT_NAMESPACE: &str = "*";
pub const DEFAULT_EVENT_NAMESPACE: &str = "default";

pub const ADDRESS_CHAIN: Legacy = Legacy::new(args::ADDR, args::LEGACY_ADDR);
pub const TOKEN_CHAIN: Legacy = Legacy::new(args::TOKEN, args::LEGACY_TOKEN);

/// Check a token is either absent or exactly [`TOKEN_LENGTH`] characters.
pub fn validate_token(token: &str) -> Result<()> {
    let length = token.chars().count();
    if length > 0 && length != TOKEN_LENGTH {
        return Err(Error::InvalidToken { length });
    }
    Ok(())
}

/// Only a trimmed, case-insensitive `true` is true.
pub fn parse_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn parse_integer(setting: &'static str, value: &str) -> Result<u64> {
    value.parse().map_err(|_| Error::IntegerParseFailure {
        setting,
        value: value.to_string(),
    })
}

fn string_setting(source: &dyn ConfigSource, arg: &Arg, default: &str) -> String {
    resolve_with_default(source, arg, default).value
}

/// Scheduler address. Never fails: an unset address is the local default.
pub fn address(source: &dyn ConfigSource) -> Resolved<String> {
    resolve_with_legacy(source, &ADDRESS_CHAIN)
        .unwrap_or_else(|_| Resolved::new(DEFAULT_ADDRESS.to_string(), ValueSource::Default))
}

/// ACL token, empty when unset.
pub fn token(source: &dyn ConfigSource) -> Result<Resolved<String>> {
    let resolved = resolve_with_legacy(source, &TOKEN_CHAIN)
        .unwrap_or_else(|_| Resolved::new(String::new(), ValueSource::Default));
    validate_token(&resolved.value)?;
    Ok(resolved)
}

pub fn region(source: &dyn ConfigSource) -> String {
    string_setting(source, &args::REGION, "")
}

pub fn namespace(source: &dyn ConfigSource) -> String {
    string_setting(source, &args::NAMESPACE, DEFAULT_NAMESPACE)
}

pub fn http_auth(source: &dyn ConfigSource) -> String {
    string_setting(source, &args::HTTP_AUTH, "")
}

pub fn ca_cert(source: &dyn ConfigSource) -> String {
    string_setting(source, &args::CACERT, "")
}

pub fn ca_path(source: &dyn ConfigSource) -> String {
    string_setting(source, &args::CAPATH, "")
}

pub fn client_cert(source: &dyn ConfigSource) -> String {
    string_setting(source, &args::CLIENT_CERT, "")
}

pub fn client_key(source: &dyn ConfigSource) -> String {
    string_setting(source, &args::CLIENT_KEY, "")
}

pub fn tls_server_name(source: &dyn ConfigSource) -> String {
    string_setting(source, &args::TLS_SERVER_NAME, "")
}

pub fn skip_verify(source: &dyn ConfigSource) -> bool {
    parse_bool(&string_setting(source, &args::SKIP_VERIFY, "false"))
}

pub fn copy_save_path(source: &dyn ConfigSource) -> bool {
    parse_bool(&string_setting(source, &args::COPY_SAVE_PATH, "false"))
}

/// Number of bytes back from the end of a log to start reading.
pub fn log_offset(source: &dyn ConfigSource) -> Result<u64> {
    let value = string_setting(source, &args::LOG_OFFSET, &DEFAULT_LOG_OFFSET.to_string());
    parse_integer("log offset", &value)
}

/// Interval between dashboard refreshes.
pub fn update_interval(source: &dyn ConfigSource) -> Result<Duration> {
    let value = string_setting(
        source,
        &args::UPDATE_SECONDS,
        &DEFAULT_UPDATE_SECONDS.to_string(),
    );
    parse_integer("update", &value).map(Duration::from_secs)
}

pub fn event_topics(source: &dyn ConfigSource) -> Result<EventTopics> {
    EventTopics::parse(&string_setting(source, &args::EVENT_TOPICS, DEFAULT_EVENT_TOPICS))
}

pub fn event_namespace(source: &dyn ConfigSource) -> String {
    string_setting(source, &args::EVENT_NAMESPACE, DEFAULT_EVENT_NAMESPACE)
}

pub fn event_query(source: &dyn ConfigSource) -> Result<EventQuery> {
    EventQuery::compile(&string_setting(
        source,
        &args::EVENT_JQ_QUERY,
        DEFAULT_EVENT_QUERY,
    ))
}

pub fn logo_color(source: &dyn ConfigSource) -> String {
    resolve_unflagged(source, &args::LOGO_COLOR, "").value
}

/// Listen address for the session server, `host:port`.
pub fn listen_address(source: &dyn ConfigSource) -> Result<String> {
    let host = resolve_required(source, &args::HOST)?.value;
    let port = resolve_required(source, &args::PORT)?.value;
    let port = parse_integer("port", &port)?;
    let port = u16::try_from(port).map_err(|_| Error::IntegerParseFailure {
        setting: "port",
        value: port.to_string(),
    })?;
    Ok(format!("{}:{}", host, port))
}
