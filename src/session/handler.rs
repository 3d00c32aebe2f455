//! Per-session program runner.
//!
//! A [`Model`] renders a frame and reacts to input bytes. [`run_program`]
//! drives one model over a byte stream until the model quits, the stream
//! closes, or the server starts draining.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use super::protocol::SessionInfo;

const ENTER_ALT_SCREEN: &[u8] = b"\x1b[?1049h";
const LEAVE_ALT_SCREEN: &[u8] = b"\x1b[?1049l";
const CLEAR_AND_HOME: &[u8] = b"\x1b[2J\x1b[H";

/// What the runner does after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    Continue,
    Quit,
}

/// Interactive program shown to one session.
pub trait Model: Send {
    /// Current frame. Lines are separated by `\n`.
    fn view(&self) -> String;

    /// Handle bytes typed by the client.
    fn update(&mut self, input: &[u8]) -> Update;

    /// Called once when the server starts shutting down.
    fn on_drain(&mut self) -> Update {
        Update::Quit
    }
}

/// Terminal options for a session's program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgramOptions {
    /// Render on the alternate screen and restore the terminal on exit
    pub alt_screen: bool,
}

/// Builds the model for a newly opened session.
pub type Handler = Arc<dyn Fn(&SessionInfo) -> (Box<dyn Model>, ProgramOptions) + Send + Sync>;

fn frame(view: &str) -> Vec<u8> {
    let mut out = CLEAR_AND_HOME.to_vec();
    out.extend_from_slice(view.replace('\n', "\r\n").as_bytes());
    out
}

/// Write one frame. Takes the rendered bytes so no model borrow is held
/// across the write.
async fn render<W>(writer: &mut W, bytes: Vec<u8>) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&bytes).await?;
    writer.flush().await
}

async fn drive<R, W>(
    model: &mut dyn Model,
    reader: &mut R,
    writer: &mut W,
    draining: &CancellationToken,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = [0u8; 1024];
    let mut drain_seen = false;

    let bytes = frame(&model.view());
    render(writer, bytes).await?;

    loop {
        tokio::select! {
            _ = draining.cancelled(), if !drain_seen => {
                drain_seen = true;
                if model.on_drain() == Update::Quit {
                    return Ok(());
                }
                let bytes = frame(&model.view());
                render(writer, bytes).await?;
            }
            read = reader.read(&mut buf) => {
                let n = read?;
                if n == 0 {
                    return Ok(());
                }
                if model.update(&buf[..n]) == Update::Quit {
                    return Ok(());
                }
                let bytes = frame(&model.view());
                render(writer, bytes).await?;
            }
        }
    }
}

/// Run `model` until it quits, the input closes, or `draining` fires and the
/// model agrees to stop.
pub async fn run_program<R, W>(
    mut model: Box<dyn Model>,
    options: ProgramOptions,
    mut reader: R,
    mut writer: W,
    draining: CancellationToken,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    if options.alt_screen {
        writer.write_all(ENTER_ALT_SCREEN).await?;
    }

    let result = drive(model.as_mut(), &mut reader, &mut writer, &draining).await;

    if options.alt_screen {
        // Best effort: the peer may already be gone.
        let _ = writer.write_all(LEAVE_ALT_SCREEN).await;
    }
    let _ = writer.flush().await;
    result
}
