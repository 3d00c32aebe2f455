//! Session server: accept loop, per-session tasks and graceful shutdown.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::handler::{Handler, run_program};
use super::logging::ConnectionLog;
use super::protocol::{SessionInfo, read_handshake};
use crate::{Error, Result};

/// How long open sessions get to close after shutdown starts.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(30);

/// A client that has not sent its handshake by now is dropped.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Server lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Stopped,
    Listening,
    ShuttingDown,
}

/// A bound session server, ready to [`serve`](SessionServer::serve).
pub struct SessionServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    handler: Handler,
    grace_period: Duration,
    state: watch::Sender<ServerState>,
}

impl SessionServer {
    /// Bind the listen address. Fails with [`Error::BindFailure`].
    pub async fn bind(addr: &str, handler: Handler) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| Error::bind(addr, e))?;
        let local_addr = listener.local_addr().map_err(|e| Error::bind(addr, e))?;
        let (state, _) = watch::channel(ServerState::Stopped);

        Ok(Self {
            listener,
            local_addr,
            handler,
            grace_period: DEFAULT_GRACE_PERIOD,
            state,
        })
    }

    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Address actually bound; differs from the requested one for port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Watch lifecycle transitions.
    pub fn subscribe(&self) -> watch::Receiver<ServerState> {
        self.state.subscribe()
    }

    /// Accept sessions until `shutdown` fires, then drain.
    ///
    /// After `shutdown` no new connection is accepted. Open sessions are told
    /// to drain and get the grace period to finish; if any are still open
    /// when it elapses this returns [`Error::ShutdownTimeout`].
    pub async fn serve(self, shutdown: CancellationToken) -> Result<()> {
        let SessionServer {
            listener,
            local_addr,
            handler,
            grace_period,
            state,
        } = self;

        let tracker = TaskTracker::new();
        let draining = shutdown.child_token();

        state.send_replace(ServerState::Listening);
        tracing::info!(addr = %local_addr, "starting session server");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote_addr)) => {
                        let handler = handler.clone();
                        let draining = draining.clone();
                        tracker.spawn(async move {
                            if let Err(e) =
                                handle_connection(stream, remote_addr, handler, draining).await
                            {
                                tracing::warn!(remote_addr = %remote_addr, error = %e, "session failed");
                            }
                        });
                    }
                    Err(e) => tracing::warn!(error = %e, "failed to accept connection"),
                }
            }
        }

        drop(listener);
        state.send_replace(ServerState::ShuttingDown);
        tracing::info!(sessions = tracker.len(), "stopping session server");

        tracker.close();
        let drained = tokio::time::timeout(grace_period, tracker.wait()).await;
        state.send_replace(ServerState::Stopped);

        match drained {
            Ok(()) => {
                tracing::info!("session server stopped");
                Ok(())
            }
            Err(_) => {
                tracing::error!(
                    sessions = tracker.len(),
                    "sessions still open after grace period"
                );
                Err(Error::ShutdownTimeout(grace_period))
            }
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    remote_addr: SocketAddr,
    handler: Handler,
    draining: CancellationToken,
) -> Result<()> {
    let (read_half, write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let request = tokio::select! {
        _ = draining.cancelled() => return Ok(()),
        request = tokio::time::timeout(HANDSHAKE_TIMEOUT, read_handshake(&mut reader)) => {
            request.map_err(|_| Error::Handshake("timed out waiting for handshake".to_string()))??
        }
    };

    let info = SessionInfo::new(remote_addr, request);
    let _log = ConnectionLog::start(&info);
    let (model, options) = handler(&info);

    run_program(model, options, reader, write_half, draining).await?;
    Ok(())
}
