//! Realtime event channel: a single Socket.IO connection for the whole
//! process, forwarding server events to the UI loop.

mod listener;
pub mod protocol;

use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::RealtimeConfig;
use crate::constants::REALTIME_CHANNEL_CAPACITY;

pub use listener::ListenerSettings;

/// Server events the dashboard reacts to.
pub const SUBSCRIBED_EVENTS: &[&str] = &[
    "work_plan_status",
    "work_plan_progress",
    "alert",
    "status",
    "command_sended",
    "obstacle",
    "robot.connected",
    "manual_command_response",
];

#[derive(Debug, thiserror::Error)]
pub enum RealtimeError {
    #[error("invalid realtime url: {0}")]
    InvalidUrl(String),

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("malformed frame: {0}")]
    Malformed(String),

    #[error("server refused namespace connect: {0}")]
    ConnectRefused(String),

    #[error("no traffic from server for {0} ms")]
    Silent(u64),
}

/// What the listener reports to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum RealtimeEvent {
    Connected,
    Disconnected,
    Message { name: String, payload: Value },
}

static STARTED: AtomicBool = AtomicBool::new(false);

/// Owner of the process-wide listener. Dropping it stops the connection.
#[derive(Debug)]
pub struct RealtimeHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl RealtimeHandle {
    /// Start the listener unless one is already running in this process.
    pub fn start(
        config: &RealtimeConfig,
    ) -> Option<(Self, mpsc::Receiver<RealtimeEvent>)> {
        if STARTED
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("realtime listener already running, not starting another");
            return None;
        }

        let (tx, rx) = mpsc::channel(REALTIME_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();
        let settings = ListenerSettings::from_config(config);
        let task = listener::spawn(settings, cancel.clone(), tx);
        Some((
            Self {
                cancel,
                task: Some(task),
            },
            rx,
        ))
    }

    /// Cancel the connection and wait for the task to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "realtime task ended abnormally");
            }
        }
    }
}

impl Drop for RealtimeHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
        STARTED.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn only_one_listener_per_process() {
        let config = RealtimeConfig {
            enabled: true,
            url: "http://127.0.0.1:9".into(),
            reconnect_attempts: 0,
            reconnect_delay_ms: 100,
        };
        let (first, _rx) = RealtimeHandle::start(&config).unwrap();
        assert!(RealtimeHandle::start(&config).is_none());
        first.shutdown().await;

        let (again, _rx) = RealtimeHandle::start(&config).unwrap();
        again.shutdown().await;
    }
}
