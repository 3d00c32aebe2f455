//! Minimal dashboard model and the two ways of running it.
//!
//! The dashboard only ever sees a finished [`DashboardConfig`]. Remote
//! sessions get one model each through [`session_handler`]; local mode runs a
//! single model on the controlling terminal through [`run_local`].

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::Result;
use crate::config::DashboardConfig;
use crate::session::{
    Handler, Model, ProgramOptions, SessionInfo, Update, run_program, shutdown_signal,
};

const CTRL_C: u8 = 0x03;

/// Read-only overview of the configuration the dashboard would connect with.
pub struct Dashboard {
    config: Arc<DashboardConfig>,
    notice: Option<String>,
}

impl Dashboard {
    pub fn new(config: Arc<DashboardConfig>) -> Self {
        Self {
            config,
            notice: None,
        }
    }

    /// Show a notice line above the footer.
    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }
}

impl Model for Dashboard {
    fn view(&self) -> String {
        let config = &self.config;
        let mut lines = vec![
            format!("roam {} ({})", config.version, config.sha),
            String::new(),
            format!("address:    {}", config.url),
            format!(
                "token:      {}",
                config.masked_token().unwrap_or_else(|| "(none)".to_string())
            ),
            format!(
                "region:     {}",
                if config.region.is_empty() {
                    "(default)"
                } else {
                    config.region.as_str()
                }
            ),
            format!("namespace:  {}", config.namespace),
        ];

        let topics: Vec<String> = config
            .event
            .topics
            .query_pairs()
            .into_iter()
            .map(|(_, value)| value)
            .collect();
        lines.push(format!(
            "events:     {} in {}",
            topics.join(", "),
            config.event.namespace
        ));
        lines.push(format!(
            "refresh:    every {}s",
            config.update_interval.as_secs()
        ));

        if let Some(notice) = &self.notice {
            lines.push(String::new());
            lines.push(notice.clone());
        }

        lines.push(String::new());
        lines.push("press q to quit".to_string());
        lines.join("\n")
    }

    fn update(&mut self, input: &[u8]) -> Update {
        if input.iter().any(|&b| b == b'q' || b == CTRL_C) {
            Update::Quit
        } else {
            Update::Continue
        }
    }
}

/// Handler factory for remote sessions.
///
/// The first word of the session's command, if any, overrides the configured
/// token for that session only. An invalid override is applied anyway and
/// shown to the user as a warning.
pub fn session_handler(config: Arc<DashboardConfig>) -> Handler {
    Arc::new(move |info: &SessionInfo| {
        let model = match info.override_token() {
            Some(token) => {
                let (session_config, warning) = config.with_override_token(token);
                let dashboard = Dashboard::new(Arc::new(session_config));
                match warning {
                    Some(warning) => {
                        tracing::warn!(
                            remote_addr = %info.remote_addr,
                            warning = %warning,
                            "override token rejected"
                        );
                        dashboard.with_notice(format!("warning: {}", warning))
                    }
                    None => dashboard,
                }
            }
            None => Dashboard::new(Arc::clone(&config)),
        };
        let model: Box<dyn Model> = Box::new(model);
        (model, ProgramOptions { alt_screen: true })
    })
}

/// Restores cooked mode when dropped.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        crossterm::terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = crossterm::terminal::disable_raw_mode() {
            tracing::warn!(error = %e, "failed to restore terminal mode");
        }
    }
}

/// Run the dashboard on the local terminal until the user quits or the
/// process receives a termination signal.
pub async fn run_local(config: Arc<DashboardConfig>) -> Result<()> {
    let stop = CancellationToken::new();
    let signal = shutdown_signal();
    let signal_stop = stop.clone();
    tokio::spawn(async move {
        signal.await;
        signal_stop.cancel();
    });

    let _raw = RawModeGuard::enable()?;
    run_program(
        Box::new(Dashboard::new(config)),
        ProgramOptions { alt_screen: true },
        tokio::io::stdin(),
        tokio::io::stdout(),
        stop,
    )
    .await?;
    Ok(())
}
