use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tokio_util::sync::CancellationToken;

use super::protocol::{self, Packet};
use super::{RealtimeError, RealtimeEvent, SUBSCRIBED_EVENTS};
use crate::config::RealtimeConfig;

/// Connection parameters for the listener task.
#[derive(Debug, Clone)]
pub struct ListenerSettings {
    pub url: String,
    /// Retries after a failed or dropped connection before giving up.
    pub reconnect_attempts: u32,
    pub reconnect_delay: Duration,
}

impl ListenerSettings {
    pub fn from_config(config: &RealtimeConfig) -> Self {
        Self {
            url: config.url.clone(),
            reconnect_attempts: config.reconnect_attempts,
            reconnect_delay: Duration::from_millis(config.reconnect_delay_ms),
        }
    }
}

pub fn spawn(
    settings: ListenerSettings,
    cancel: CancellationToken,
    tx: mpsc::Sender<RealtimeEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = run(settings, cancel.clone(), tx) => {
                tracing::info!("realtime listener finished");
            }
            _ = cancel.cancelled() => {
                tracing::info!("realtime listener cancelled");
            }
        }
    })
}

/// How one connection ended.
enum SessionEnd {
    /// Cancelled or the UI went away; stop for good.
    Shutdown,
    /// Dropped after the namespace connect succeeded.
    Lost(Option<RealtimeError>),
}

/// Connect, and reconnect with a fixed delay until the retry budget is
/// spent. The budget is restored after every successful connect.
pub async fn run(
    settings: ListenerSettings,
    cancel: CancellationToken,
    tx: mpsc::Sender<RealtimeEvent>,
) {
    let ws_url = match protocol::websocket_url(&settings.url) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!(error = %e, "realtime listener not started");
            return;
        }
    };
    let mut failures = 0u32;

    loop {
        if cancel.is_cancelled() {
            return;
        }
        tracing::info!(url = %ws_url, attempt = failures, "connecting realtime channel");

        match session(&ws_url, &cancel, &tx).await {
            Ok(SessionEnd::Shutdown) => return,
            Ok(SessionEnd::Lost(reason)) => {
                match reason {
                    Some(e) => tracing::warn!(error = %e, "realtime connection lost"),
                    None => tracing::warn!("realtime connection closed by server"),
                }
                if tx.send(RealtimeEvent::Disconnected).await.is_err() {
                    return;
                }
                failures = 0;
            }
            Err(e) => {
                tracing::warn!(error = %e, "realtime connect failed");
            }
        }

        if failures >= settings.reconnect_attempts {
            tracing::error!(
                attempts = settings.reconnect_attempts,
                "realtime reconnection attempts exhausted"
            );
            return;
        }
        failures += 1;

        tokio::select! {
            _ = tokio::time::sleep(settings.reconnect_delay) => {}
            _ = cancel.cancelled() => return,
        }
    }
}

/// One websocket connection. `Err` means the namespace connect never
/// completed.
async fn session(
    ws_url: &str,
    cancel: &CancellationToken,
    tx: &mpsc::Sender<RealtimeEvent>,
) -> Result<SessionEnd, RealtimeError> {
    let (stream, _) = connect_async(ws_url).await?;
    let (mut write, mut read) = stream.split();
    let mut connected = false;
    // until the open packet says otherwise
    let mut silence = Duration::from_secs(45);

    loop {
        let next = tokio::select! {
            next = tokio::time::timeout(silence, read.next()) => next,
            _ = cancel.cancelled() => {
                let _ = write.send(Message::text("41")).await;
                let _ = write.close().await;
                return Ok(SessionEnd::Shutdown);
            }
        };

        let msg = match next {
            Err(_) => return lost(connected, RealtimeError::Silent(silence.as_millis() as u64)),
            Ok(None) => return end(connected, None),
            Ok(Some(Err(e))) => return lost(connected, e.into()),
            Ok(Some(Ok(msg))) => msg,
        };

        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => return end(connected, None),
            _ => continue,
        };

        let packet = match protocol::decode(text.as_str()) {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!(error = %e, "skipping realtime frame");
                continue;
            }
        };

        match packet {
            Packet::Open(info) => {
                silence = Duration::from_millis(info.silence_limit_ms());
                tracing::debug!(sid = %info.sid, "engine.io session opened");
                write.send(Message::text(protocol::connect_frame())).await?;
            }
            Packet::Ping(payload) => {
                write.send(Message::text(protocol::pong_frame(&payload))).await?;
            }
            Packet::Connect => {
                connected = true;
                tracing::info!("realtime channel connected");
                if tx.send(RealtimeEvent::Connected).await.is_err() {
                    return Ok(SessionEnd::Shutdown);
                }
            }
            Packet::ConnectError(reason) => {
                return lost(connected, RealtimeError::ConnectRefused(reason));
            }
            Packet::Disconnect | Packet::Close => return end(connected, None),
            Packet::Event { name, payload } => {
                if !SUBSCRIBED_EVENTS.contains(&name.as_str()) {
                    tracing::trace!(event = %name, "ignoring unsubscribed event");
                    continue;
                }
                tracing::debug!(event = %name, "realtime event");
                if tx.send(RealtimeEvent::Message { name, payload }).await.is_err() {
                    return Ok(SessionEnd::Shutdown);
                }
            }
            Packet::Pong | Packet::Ignored => {}
        }
    }
}

fn lost(connected: bool, e: RealtimeError) -> Result<SessionEnd, RealtimeError> {
    if connected {
        Ok(SessionEnd::Lost(Some(e)))
    } else {
        Err(e)
    }
}

fn end(connected: bool, e: Option<RealtimeError>) -> Result<SessionEnd, RealtimeError> {
    match e {
        Some(e) => lost(connected, e),
        None if connected => Ok(SessionEnd::Lost(None)),
        None => Err(RealtimeError::Malformed("closed before namespace connect".into())),
    }
}
