//! Socket.IO v4 over Engine.IO v4 text frames.
//!
//! A frame is an Engine.IO type digit followed by its payload. Message
//! frames (`4`) carry a Socket.IO packet: another type digit, an optional
//! `/namespace,`, an optional ack id, then JSON.

use serde::Deserialize;
use serde_json::Value;

use super::RealtimeError;
use crate::constants::SOCKET_IO_PATH;

/// Handshake parameters from the Engine.IO open packet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenInfo {
    #[serde(default)]
    pub sid: String,
    #[serde(default = "default_ping_interval")]
    pub ping_interval: u64,
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout: u64,
}

fn default_ping_interval() -> u64 {
    25_000
}

fn default_ping_timeout() -> u64 {
    20_000
}

impl OpenInfo {
    /// How long the link may stay silent before it is considered dead.
    pub fn silence_limit_ms(&self) -> u64 {
        self.ping_interval + self.ping_timeout
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Open(OpenInfo),
    Close,
    Ping(String),
    Pong,
    /// Namespace connect acknowledged.
    Connect,
    /// Server closed the namespace.
    Disconnect,
    Event { name: String, payload: Value },
    ConnectError(String),
    /// Anything we accept but don't act on (acks, upgrade, noop).
    Ignored,
}

/// `http://host:port` → `ws://host:port/socket.io/?EIO=4&transport=websocket`.
pub fn websocket_url(base: &str) -> Result<String, RealtimeError> {
    let base = base.trim().trim_end_matches('/');
    let rest = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else if base.starts_with("ws://") || base.starts_with("wss://") {
        base.to_string()
    } else {
        return Err(RealtimeError::InvalidUrl(base.to_string()));
    };
    Ok(format!("{rest}{SOCKET_IO_PATH}?EIO=4&transport=websocket"))
}

/// Frame asking to join the default namespace.
pub fn connect_frame() -> &'static str {
    "40"
}

/// Reply to an Engine.IO ping, echoing its payload.
pub fn pong_frame(payload: &str) -> String {
    format!("3{payload}")
}

pub fn decode(frame: &str) -> Result<Packet, RealtimeError> {
    let mut chars = frame.chars();
    let kind = chars.next().ok_or_else(|| malformed(frame))?;
    let rest = chars.as_str();
    match kind {
        '0' => serde_json::from_str(rest)
            .map(Packet::Open)
            .map_err(|_| malformed(frame)),
        '1' => Ok(Packet::Close),
        '2' => Ok(Packet::Ping(rest.to_string())),
        '3' => Ok(Packet::Pong),
        '4' => decode_socket(rest).ok_or_else(|| malformed(frame)),
        '5' | '6' => Ok(Packet::Ignored),
        _ => Err(malformed(frame)),
    }
}

fn decode_socket(packet: &str) -> Option<Packet> {
    let mut chars = packet.chars();
    let kind = chars.next().filter(|k| ('0'..='6').contains(k))?;
    let mut rest = chars.as_str();

    if let Some(named) = rest.strip_prefix('/') {
        let (namespace, after) = named.split_once(',').unwrap_or((named, ""));
        // only the default namespace is joined
        if !namespace.is_empty() {
            return Some(Packet::Ignored);
        }
        rest = after;
    }
    let body = rest.trim_start_matches(|c: char| c.is_ascii_digit());

    match kind {
        '0' => Some(Packet::Connect),
        '1' => Some(Packet::Disconnect),
        '2' => {
            let mut args = match serde_json::from_str::<Value>(body).ok()? {
                Value::Array(args) => args.into_iter(),
                _ => return None,
            };
            let name = args.next()?.as_str()?.to_string();
            Some(Packet::Event {
                name,
                payload: args.next().unwrap_or(Value::Null),
            })
        }
        '4' => {
            let reason = serde_json::from_str::<Value>(body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| body.to_string());
            Some(Packet::ConnectError(reason))
        }
        '3' | '5' | '6' => Some(Packet::Ignored),
        _ => None,
    }
}

fn malformed(frame: &str) -> RealtimeError {
    let mut head: String = frame.chars().take(64).collect();
    if head.len() < frame.len() {
        head.push('…');
    }
    RealtimeError::Malformed(head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn websocket_url_from_http() {
        assert_eq!(
            websocket_url("http://localhost:3003/").unwrap(),
            "ws://localhost:3003/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(
            websocket_url("https://robot.example").unwrap(),
            "wss://robot.example/socket.io/?EIO=4&transport=websocket"
        );
        assert!(websocket_url("ftp://nope").is_err());
    }

    #[test]
    fn decodes_open() {
        let p = decode(r#"0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":5000,"maxPayload":1000000}"#)
            .unwrap();
        match p {
            Packet::Open(info) => {
                assert_eq!(info.sid, "abc");
                assert_eq!(info.silence_limit_ms(), 30_000);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn ping_is_answered_with_pong() {
        assert_eq!(decode("2").unwrap(), Packet::Ping(String::new()));
        assert_eq!(pong_frame(""), "3");
        assert_eq!(decode("2probe").unwrap(), Packet::Ping("probe".into()));
        assert_eq!(pong_frame("probe"), "3probe");
    }

    #[test]
    fn decodes_namespace_packets() {
        assert_eq!(decode(r#"40{"sid":"x"}"#).unwrap(), Packet::Connect);
        assert_eq!(decode("41").unwrap(), Packet::Disconnect);
        assert_eq!(
            decode(r#"44{"message":"Not authorized"}"#).unwrap(),
            Packet::ConnectError("Not authorized".into())
        );
    }

    #[test]
    fn decodes_events() {
        assert_eq!(
            decode(r#"42["alert",{"alert_type":"TEMP_HIGH","measured_value":31.2}]"#).unwrap(),
            Packet::Event {
                name: "alert".into(),
                payload: json!({"alert_type": "TEMP_HIGH", "measured_value": 31.2}),
            }
        );
        // ack id and explicit default namespace prefixes
        assert_eq!(
            decode(r#"4217["robot.connected",{"esp32_ip":"10.0.0.7"}]"#).unwrap(),
            Packet::Event {
                name: "robot.connected".into(),
                payload: json!({"esp32_ip": "10.0.0.7"}),
            }
        );
        assert_eq!(
            decode(r#"42/,["alert",{}]"#).unwrap(),
            Packet::Event {
                name: "alert".into(),
                payload: json!({}),
            }
        );
        // event without a payload
        assert_eq!(
            decode(r#"42["ping_robot"]"#).unwrap(),
            Packet::Event {
                name: "ping_robot".into(),
                payload: Value::Null,
            }
        );
    }

    #[test]
    fn other_namespaces_are_ignored() {
        assert_eq!(
            decode(r#"42/robot,17["robot.connected",{"esp32_ip":"10.0.0.7"}]"#).unwrap(),
            Packet::Ignored
        );
        assert_eq!(decode("40/admin,").unwrap(), Packet::Ignored);
        assert_eq!(decode("41/admin").unwrap(), Packet::Ignored);
        assert_eq!(decode(r#"44/admin,{"message":"nope"}"#).unwrap(), Packet::Ignored);
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode("").is_err());
        assert!(decode("9zzz").is_err());
        assert!(decode("42{not an array}").is_err());
        assert!(decode("42[17]").is_err());
        assert!(decode("0notjson").is_err());
    }

    #[test]
    fn ignores_upgrade_and_noop() {
        assert_eq!(decode("5").unwrap(), Packet::Ignored);
        assert_eq!(decode("6").unwrap(), Packet::Ignored);
        assert_eq!(decode("43[]").unwrap(), Packet::Ignored);
    }
}
