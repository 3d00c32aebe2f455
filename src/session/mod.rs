//! Remote-session server.
//!
//! Each TCP connection opens with a one-line JSON handshake describing the
//! remote terminal, after which the stream carries terminal bytes. Every
//! session gets its own dashboard model from the [`Handler`] factory.
//!
//! ## Lifecycle
//!
//! `Stopped -> Listening -> ShuttingDown -> Stopped`
//!
//! Shutdown stops the accept loop, asks open sessions to drain and waits for
//! them for at most the grace period ([`DEFAULT_GRACE_PERIOD`]).

pub mod handler;
pub mod logging;
pub mod protocol;
pub mod server;
pub mod signal;

pub use handler::{Handler, Model, ProgramOptions, Update, run_program};
pub use logging::ConnectionLog;
pub use protocol::{SessionInfo, SessionRequest, read_handshake};
pub use server::{DEFAULT_GRACE_PERIOD, ServerState, SessionServer};
pub use signal::shutdown_signal;
