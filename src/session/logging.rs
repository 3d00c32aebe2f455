//! Connect/disconnect logging for sessions.

use std::net::SocketAddr;
use std::time::Instant;

use super::protocol::SessionInfo;

/// Logs a session's connect on creation and its disconnect on drop.
#[derive(Debug)]
pub struct ConnectionLog {
    remote_addr: SocketAddr,
    user: String,
    started: Instant,
}

impl ConnectionLog {
    pub fn start(info: &SessionInfo) -> Self {
        tracing::info!(
            user = %info.user,
            remote_addr = %info.remote_addr,
            public_key = info.public_key,
            term = %info.term,
            width = info.width,
            height = info.height,
            "session connected"
        );
        Self {
            remote_addr: info.remote_addr,
            user: info.user.clone(),
            started: Instant::now(),
        }
    }
}

impl Drop for ConnectionLog {
    fn drop(&mut self) {
        tracing::info!(
            user = %self.user,
            remote_addr = %self.remote_addr,
            duration_ms = self.started.elapsed().as_millis() as u64,
            "session disconnected"
        );
    }
}
