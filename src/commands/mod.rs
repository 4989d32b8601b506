//! Robot command intents and the press-and-hold key protocol.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use crate::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    Stop,
    Auto,
    Manual,
    FollowLineMode,
    TurnLeftForObstacleAvoid,
    TurnRightForObstacleAvoid,
}

impl CommandType {
    pub const ALL: [CommandType; 10] = [
        CommandType::Forward,
        CommandType::Backward,
        CommandType::TurnLeft,
        CommandType::TurnRight,
        CommandType::Stop,
        CommandType::Auto,
        CommandType::Manual,
        CommandType::FollowLineMode,
        CommandType::TurnLeftForObstacleAvoid,
        CommandType::TurnRightForObstacleAvoid,
    ];

    /// Wire code sent to `/commands/send`.
    pub fn code(self) -> &'static str {
        match self {
            CommandType::Forward => "FORWARD",
            CommandType::Backward => "BACKWARD",
            CommandType::TurnLeft => "TURN_LEFT",
            CommandType::TurnRight => "TURN_RIGHT",
            CommandType::Stop => "STOP",
            CommandType::Auto => "AUTO",
            CommandType::Manual => "MANUAL",
            CommandType::FollowLineMode => "FOLLOW_LINE_MODE",
            CommandType::TurnLeftForObstacleAvoid => "TURN_LEFT_FOR_OBSTACLE_AVOID",
            CommandType::TurnRightForObstacleAvoid => "TURN_RIGHT_FOR_OBSTACLE_AVOID",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    pub fn label(self) -> String {
        match self {
            CommandType::Forward => t!("command.forward").to_string(),
            CommandType::Backward => t!("command.backward").to_string(),
            CommandType::TurnLeft => t!("command.turn_left").to_string(),
            CommandType::TurnRight => t!("command.turn_right").to_string(),
            CommandType::Stop => t!("command.stop").to_string(),
            CommandType::Auto => t!("command.auto").to_string(),
            CommandType::Manual => t!("command.manual").to_string(),
            CommandType::FollowLineMode => t!("command.follow_line").to_string(),
            CommandType::TurnLeftForObstacleAvoid => t!("command.avoid_left").to_string(),
            CommandType::TurnRightForObstacleAvoid => t!("command.avoid_right").to_string(),
        }
    }

    /// Movement commands are held; everything else is a one-shot.
    pub fn is_movement(self) -> bool {
        matches!(
            self,
            CommandType::Forward
                | CommandType::Backward
                | CommandType::TurnLeft
                | CommandType::TurnRight
        )
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// What a key on the command screen means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIntent {
    /// Send on key-down, STOP on key-up.
    Hold(CommandType),
    /// Send once, unconditionally.
    Send(CommandType),
    /// Switch drive mode; sends only if the mode changes.
    Mode(DriveMode),
}

/// Keyboard map of the command screen (case-insensitive).
pub fn key_intent(c: char) -> Option<KeyIntent> {
    let intent = match c.to_ascii_uppercase() {
        'W' => KeyIntent::Hold(CommandType::Forward),
        'S' => KeyIntent::Hold(CommandType::Backward),
        'A' => KeyIntent::Hold(CommandType::TurnLeft),
        'D' => KeyIntent::Hold(CommandType::TurnRight),
        ' ' => KeyIntent::Send(CommandType::Stop),
        'Q' => KeyIntent::Send(CommandType::Auto),
        'E' => KeyIntent::Send(CommandType::Manual),
        'F' => KeyIntent::Send(CommandType::FollowLineMode),
        'Z' => KeyIntent::Send(CommandType::TurnLeftForObstacleAvoid),
        'X' => KeyIntent::Send(CommandType::TurnRightForObstacleAvoid),
        '1' => KeyIntent::Mode(DriveMode::Auto),
        '2' => KeyIntent::Mode(DriveMode::Manual),
        _ => return None,
    };
    Some(intent)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DriveMode {
    Auto,
    #[default]
    Manual,
}

impl DriveMode {
    pub fn command(self) -> CommandType {
        match self {
            DriveMode::Auto => CommandType::Auto,
            DriveMode::Manual => CommandType::Manual,
        }
    }
}

/// Currently held movement keys.
///
/// Terminals that report key releases drive `release` directly. Others
/// only repeat presses while a key is down. Such a hold gets a long grace
/// window for the terminal's initial repeat delay, then a short one between
/// repeats; missing either counts as a release.
#[derive(Debug, Clone)]
pub struct HoldTracker {
    held: HashMap<CommandType, Hold>,
    release_events: bool,
    initial_grace: Duration,
    repeat_timeout: Duration,
}

#[derive(Debug, Clone, Copy)]
struct Hold {
    last: Instant,
    repeating: bool,
}

impl HoldTracker {
    pub fn new(release_events: bool) -> Self {
        Self {
            held: HashMap::new(),
            release_events,
            initial_grace: Duration::from_millis(DEFAULT_HOLD_INITIAL_GRACE_MS),
            repeat_timeout: Duration::from_millis(DEFAULT_HOLD_REPEAT_TIMEOUT_MS),
        }
    }

    /// Override the release windows used when key-up is not reported.
    pub fn with_timeouts(mut self, initial_grace_ms: u64, repeat_timeout_ms: u64) -> Self {
        self.initial_grace = Duration::from_millis(initial_grace_ms);
        self.repeat_timeout = Duration::from_millis(repeat_timeout_ms);
        self
    }

    pub fn reports_releases(&self) -> bool {
        self.release_events
    }

    pub fn is_held(&self, cmd: CommandType) -> bool {
        self.held.contains_key(&cmd)
    }

    /// Key-down or repeat. Returns the command to send on the first press only.
    ///
    /// Non-movement commands are never held and pass straight through.
    pub fn press(&mut self, cmd: CommandType, now: Instant) -> Option<CommandType> {
        if !cmd.is_movement() {
            return Some(cmd);
        }
        match self.held.get_mut(&cmd) {
            Some(hold) => {
                hold.last = now;
                hold.repeating = true;
                None
            }
            None => {
                self.held.insert(
                    cmd,
                    Hold {
                        last: now,
                        repeating: false,
                    },
                );
                Some(cmd)
            }
        }
    }

    /// Key-up. Returns STOP if the key was held.
    pub fn release(&mut self, cmd: CommandType) -> Option<CommandType> {
        self.held.remove(&cmd).map(|_| CommandType::Stop)
    }

    /// Expire stale holds when releases are not reported; one STOP per hold.
    pub fn expire(&mut self, now: Instant) -> Vec<CommandType> {
        if self.release_events {
            return Vec::new();
        }
        let (initial, repeat) = (self.initial_grace, self.repeat_timeout);
        let before = self.held.len();
        self.held.retain(|_, hold| {
            let window = if hold.repeating { repeat } else { initial };
            now.saturating_duration_since(hold.last) < window
        });
        vec![CommandType::Stop; before - self.held.len()]
    }
}

/// Drive mode tracking for the mode switch.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeSwitch {
    mode: DriveMode,
}

impl ModeSwitch {
    pub fn mode(&self) -> DriveMode {
        self.mode
    }

    /// Switch to `mode`; the command to send if it actually changed.
    pub fn set(&mut self, mode: DriveMode) -> Option<CommandType> {
        if self.mode == mode {
            return None;
        }
        self.mode = mode;
        Some(mode.command())
    }
}

/// Result of one send, reported back to the UI.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub command: CommandType,
    pub error: Option<String>,
}

/// Transient success/failure line on the command screen.
#[derive(Debug, Clone)]
pub struct CommandBanner {
    pub text: String,
    pub ok: bool,
    pub until: Instant,
}

impl CommandBanner {
    pub fn from_outcome(outcome: &CommandOutcome, now: Instant) -> Self {
        let code = outcome.command.code();
        let (text, ok, ttl) = match &outcome.error {
            None => (
                t!("send.sent", command = code).to_string(),
                true,
                COMMAND_BANNER_OK_MS,
            ),
            Some(_) => (
                t!("send.failed", command = code).to_string(),
                false,
                COMMAND_BANNER_ERR_MS,
            ),
        };
        Self {
            text,
            ok,
            until: now + Duration::from_millis(ttl),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.until
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_roundtrip() {
        for cmd in CommandType::ALL {
            assert_eq!(CommandType::parse(cmd.code()), Some(cmd));
        }
        assert_eq!(CommandType::parse("JUMP"), None);
    }

    #[test]
    fn key_map() {
        assert_eq!(key_intent('w'), Some(KeyIntent::Hold(CommandType::Forward)));
        assert_eq!(key_intent('D'), Some(KeyIntent::Hold(CommandType::TurnRight)));
        assert_eq!(key_intent(' '), Some(KeyIntent::Send(CommandType::Stop)));
        assert_eq!(key_intent('q'), Some(KeyIntent::Send(CommandType::Auto)));
        assert_eq!(key_intent('E'), Some(KeyIntent::Send(CommandType::Manual)));
        assert_eq!(key_intent('k'), None);
    }

    #[test]
    fn hold_sends_once_and_stop_on_release() {
        let mut t = HoldTracker::new(true);
        let now = Instant::now();
        assert_eq!(t.press(CommandType::Forward, now), Some(CommandType::Forward));
        assert_eq!(t.press(CommandType::Forward, now), None);
        assert_eq!(t.press(CommandType::Forward, now), None);
        assert_eq!(t.release(CommandType::Forward), Some(CommandType::Stop));
        assert_eq!(t.release(CommandType::Forward), None);
        assert_eq!(t.press(CommandType::Forward, now), Some(CommandType::Forward));
    }

    #[test]
    fn one_shots_are_not_held() {
        let mut t = HoldTracker::new(true);
        let now = Instant::now();
        assert_eq!(t.press(CommandType::Stop, now), Some(CommandType::Stop));
        assert_eq!(t.press(CommandType::Stop, now), Some(CommandType::Stop));
        assert!(!t.is_held(CommandType::Stop));
    }

    #[test]
    fn independent_holds() {
        let mut t = HoldTracker::new(true);
        let now = Instant::now();
        assert!(t.press(CommandType::Forward, now).is_some());
        assert!(t.press(CommandType::TurnLeft, now).is_some());
        assert_eq!(t.release(CommandType::TurnLeft), Some(CommandType::Stop));
        assert!(t.is_held(CommandType::Forward));
    }

    #[test]
    fn stale_hold_expires_without_release_events() {
        let mut t = HoldTracker::new(false).with_timeouts(1000, 300);
        let start = Instant::now();
        let ms = Duration::from_millis;
        t.press(CommandType::Backward, start);
        t.press(CommandType::Backward, start + ms(500));
        assert!(t.expire(start + ms(799)).is_empty());
        assert_eq!(t.expire(start + ms(800)), vec![CommandType::Stop]);
        assert!(!t.is_held(CommandType::Backward));
    }

    #[test]
    fn slow_first_repeat_keeps_one_continuous_hold() {
        // 660 ms initial repeat delay, then a repeat every 33 ms
        let mut t = HoldTracker::new(false);
        let start = Instant::now();
        let mut sent = Vec::new();
        sent.extend(t.press(CommandType::Forward, start));
        for step in 1..=40u64 {
            let now = start + Duration::from_millis(step * 50);
            if step * 50 >= 660 {
                sent.extend(t.press(CommandType::Forward, now - Duration::from_millis(17)));
            }
            sent.extend(t.expire(now));
        }
        assert_eq!(sent, vec![CommandType::Forward]);
        assert!(t.is_held(CommandType::Forward));

        // key let go: repeats stop and one STOP follows
        let last = start + Duration::from_millis(40 * 50);
        sent.extend(t.expire(last + Duration::from_millis(DEFAULT_HOLD_REPEAT_TIMEOUT_MS)));
        assert_eq!(sent, vec![CommandType::Forward, CommandType::Stop]);
    }

    #[test]
    fn tap_without_repeat_stops_after_grace() {
        let mut t = HoldTracker::new(false);
        let start = Instant::now();
        let grace = Duration::from_millis(DEFAULT_HOLD_INITIAL_GRACE_MS);
        t.press(CommandType::TurnLeft, start);
        assert!(t.expire(start + grace - Duration::from_millis(1)).is_empty());
        assert_eq!(t.expire(start + grace), vec![CommandType::Stop]);
    }

    #[test]
    fn expiry_is_off_when_releases_are_reported() {
        let mut t = HoldTracker::new(true);
        let start = Instant::now();
        t.press(CommandType::Backward, start);
        assert!(t.expire(start + Duration::from_secs(60)).is_empty());
        assert!(t.is_held(CommandType::Backward));
    }

    #[test]
    fn mode_switch_sends_only_on_change() {
        let mut m = ModeSwitch::default();
        assert_eq!(m.mode(), DriveMode::Manual);
        assert_eq!(m.set(DriveMode::Manual), None);
        assert_eq!(m.set(DriveMode::Auto), Some(CommandType::Auto));
        assert_eq!(m.set(DriveMode::Auto), None);
        assert_eq!(m.set(DriveMode::Manual), Some(CommandType::Manual));
    }

    #[test]
    fn banner_lifetimes() {
        let now = Instant::now();
        let ok = CommandBanner::from_outcome(
            &CommandOutcome {
                command: CommandType::Stop,
                error: None,
            },
            now,
        );
        assert!(ok.ok);
        assert!(!ok.is_expired(now + Duration::from_millis(COMMAND_BANNER_OK_MS - 1)));
        assert!(ok.is_expired(now + Duration::from_millis(COMMAND_BANNER_OK_MS)));

        let err = CommandBanner::from_outcome(
            &CommandOutcome {
                command: CommandType::Stop,
                error: Some("timeout".into()),
            },
            now,
        );
        assert!(!err.ok);
        assert!(!err.is_expired(now + Duration::from_millis(COMMAND_BANNER_OK_MS)));
    }
}
