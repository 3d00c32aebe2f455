//! Session handshake wire format.
//!
//! A client opens a session by writing one newline-terminated JSON object:
//!
//! ```json
//! {"user":"alice","term":"xterm-256color","width":120,"height":40,"command":["<token>"]}
//! ```
//!
//! Everything after the newline is the terminal byte stream.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::{Error, Result};

/// Upper bound on the handshake line, newline included.
pub const MAX_HANDSHAKE_BYTES: usize = 16 * 1024;

fn default_width() -> u16 {
    80
}

fn default_height() -> u16 {
    24
}

/// Handshake sent by the client before the terminal stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub user: String,
    /// Terminal type, e.g. `xterm-256color`
    #[serde(default)]
    pub term: String,
    #[serde(default = "default_width")]
    pub width: u16,
    #[serde(default = "default_height")]
    pub height: u16,
    /// Public key the client authenticated with, if any
    #[serde(default)]
    pub public_key: Option<String>,
    /// Command words requested by the client
    #[serde(default)]
    pub command: Vec<String>,
}

impl SessionRequest {
    /// Encode as a handshake line, newline included.
    pub fn to_line(&self) -> Result<String> {
        let mut line = serde_json::to_string(self).map_err(|e| Error::Handshake(e.to_string()))?;
        line.push('\n');
        Ok(line)
    }
}

/// What the server knows about an opened session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub remote_addr: SocketAddr,
    pub user: String,
    /// Whether the client authenticated with a public key
    pub public_key: bool,
    pub term: String,
    pub width: u16,
    pub height: u16,
    pub command: Vec<String>,
}

impl SessionInfo {
    pub fn new(remote_addr: SocketAddr, request: SessionRequest) -> Self {
        Self {
            remote_addr,
            user: request.user,
            public_key: request.public_key.is_some_and(|k| !k.is_empty()),
            term: request.term,
            width: request.width,
            height: request.height,
            command: request.command,
        }
    }

    /// Token passed as the first command word, used to override the configured token.
    pub fn override_token(&self) -> Option<&str> {
        self.command
            .first()
            .map(String::as_str)
            .filter(|t| !t.is_empty())
    }
}

/// Read and decode the handshake line.
///
/// Bytes after the newline stay buffered in `reader`.
pub async fn read_handshake<R>(reader: &mut R) -> Result<SessionRequest>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let read = reader
        .take(MAX_HANDSHAKE_BYTES as u64)
        .read_line(&mut line)
        .await?;

    if read == 0 {
        return Err(Error::Handshake(
            "connection closed before handshake".to_string(),
        ));
    }
    if !line.ends_with('\n') {
        if read >= MAX_HANDSHAKE_BYTES {
            return Err(Error::Handshake(format!(
                "handshake exceeds {} bytes",
                MAX_HANDSHAKE_BYTES
            )));
        }
        return Err(Error::Handshake(
            "connection closed during handshake".to_string(),
        ));
    }

    serde_json::from_str(line.trim()).map_err(|e| Error::Handshake(e.to_string()))
}
