use std::time::Instant;

use crate::api::Resource;
use crate::commands::{CommandBanner, HoldTracker, ModeSwitch};
use crate::constants::*;
use crate::forms::{RfidForm, WorkPlanForm};
use crate::models::{CommandLog, ObstacleLog, RfidTag, RobotStatusEntry, WorkPlanSummary};
use crate::notifications::{LatestSnapshot, Toast, ToastQueue};
use crate::screens::{AlertLogScreen, MeasurementScreen, PageController, SingleExpansion};

use super::theme::Theme;

/// Which tab is currently active in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    AlertLogs,
    Commands,
    RfidTags,
    Obstacles,
    RobotStatus,
    WorkPlans,
    Measurements,
    SendCommand,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[
            Tab::Dashboard,
            Tab::AlertLogs,
            Tab::Commands,
            Tab::RfidTags,
            Tab::Obstacles,
            Tab::RobotStatus,
            Tab::WorkPlans,
            Tab::Measurements,
            Tab::SendCommand,
        ]
    }

    pub fn label(&self) -> String {
        match self {
            Tab::Dashboard => t!("tab.dashboard").to_string(),
            Tab::AlertLogs => t!("tab.alert_logs").to_string(),
            Tab::Commands => t!("tab.commands").to_string(),
            Tab::RfidTags => t!("tab.rfid_tags").to_string(),
            Tab::Obstacles => t!("tab.obstacles").to_string(),
            Tab::RobotStatus => t!("tab.robot_status").to_string(),
            Tab::WorkPlans => t!("tab.work_plans").to_string(),
            Tab::Measurements => t!("tab.measurements").to_string(),
            Tab::SendCommand => t!("tab.send_command").to_string(),
        }
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|t| t == self).unwrap_or(0)
    }

    /// The list endpoint behind a tab, if it has one.
    pub fn resource(&self) -> Option<Resource> {
        match self {
            Tab::AlertLogs => Some(Resource::AlertLogs),
            Tab::Commands => Some(Resource::Commands),
            Tab::RfidTags => Some(Resource::RfidTags),
            Tab::Obstacles => Some(Resource::ObstacleLogs),
            Tab::RobotStatus => Some(Resource::RobotStatus),
            Tab::WorkPlans => Some(Resource::WorkPlans),
            Tab::Measurements => Some(Resource::Measurements),
            Tab::Dashboard | Tab::SendCommand => None,
        }
    }
}

/// Page movement on a list tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNav {
    Next,
    Prev,
    First,
    Last,
    /// Refetch the current page.
    Reload,
    /// Back to page 1, refetching even if already there.
    Reset,
}

/// A destructive action waiting for a yes/no.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmAction {
    DeleteRfidTag { id: i64, label: String },
    DeleteWorkPlan { id: i64, label: String },
}

impl ConfirmAction {
    pub fn prompt(&self) -> String {
        match self {
            ConfirmAction::DeleteRfidTag { label, .. } => {
                t!("confirm.delete_tag", name = label).to_string()
            }
            ConfirmAction::DeleteWorkPlan { label, .. } => {
                t!("confirm.delete_plan", name = label).to_string()
            }
        }
    }
}

/// Popup that captures all input while open.
#[derive(Debug, Clone)]
pub enum Modal {
    RfidForm(RfidForm),
    WorkPlanForm(WorkPlanForm),
    Confirm(ConfirmAction),
    /// Generic failure notice; the cause is only logged.
    Error(String),
}

/// Central application state - the single source of truth.
pub struct AppState {
    pub active_tab: Tab,
    pub show_help: bool,
    pub help_scroll: usize,
    pub tick_count: u64,

    // ── Status message (shown in status bar) ───────────────────
    pub status_message: Option<(String, Instant)>,

    // ── List screens ────────────────────────────────────────────
    pub alert_logs: AlertLogScreen,
    pub commands: PageController<Vec<CommandLog>>,
    pub rfid_tags: PageController<Vec<RfidTag>>,
    pub obstacles: PageController<Vec<ObstacleLog>>,
    pub robot_status: PageController<Vec<RobotStatusEntry>>,
    pub work_plans: PageController<Vec<WorkPlanSummary>>,
    pub plan_expansion: SingleExpansion,
    pub measurements: MeasurementScreen,
    pub modal: Option<Modal>,

    // ── Realtime ───────────────────────────────────────────────
    pub snapshot: LatestSnapshot,
    pub toasts: ToastQueue,
    pub realtime_enabled: bool,

    // ── Robot control ──────────────────────────────────────────
    pub holds: HoldTracker,
    pub mode: ModeSwitch,
    pub banner: Option<CommandBanner>,

    // ── Theme / language ───────────────────────────────────────
    pub theme: Theme,
    pub current_lang: String,
    pub api_base_url: String,
}

impl AppState {
    pub fn new(theme: Theme, max_toasts: usize, holds: HoldTracker) -> Self {
        Self {
            active_tab: Tab::Dashboard,
            show_help: false,
            help_scroll: 0,
            tick_count: 0,
            status_message: None,
            alert_logs: AlertLogScreen::default(),
            commands: PageController::new(),
            rfid_tags: PageController::new(),
            obstacles: PageController::new(),
            robot_status: PageController::new(),
            work_plans: PageController::new(),
            plan_expansion: SingleExpansion::default(),
            measurements: MeasurementScreen::default(),
            modal: None,
            snapshot: LatestSnapshot::default(),
            toasts: ToastQueue::new(max_toasts),
            realtime_enabled: false,
            holds,
            mode: ModeSwitch::default(),
            banner: None,
            theme,
            current_lang: rust_i18n::locale().to_string(),
            api_base_url: String::new(),
        }
    }

    /// Cycle to the next built-in theme.
    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next_builtin();
    }

    /// Cycle to the next UI language.
    pub fn cycle_lang(&mut self) {
        let current_idx = LANGUAGES
            .iter()
            .position(|&l| l == self.current_lang)
            .unwrap_or(0);
        let next_lang = LANGUAGES[(current_idx + 1) % LANGUAGES.len()];
        rust_i18n::set_locale(next_lang);
        self.current_lang = next_lang.to_string();
    }

    /// Set a status bar message with automatic timestamp.
    pub fn set_status(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Drop the status message once it has been shown long enough.
    pub fn expire_status(&mut self, now: Instant) {
        if let Some((_, at)) = &self.status_message {
            if now.saturating_duration_since(*at).as_secs() >= STATUS_MESSAGE_TIMEOUT_SECS {
                self.status_message = None;
            }
        }
    }

    pub fn push_toast(&mut self, toast: Toast) {
        self.toasts.push(toast, Instant::now());
    }

    pub fn next_tab(&mut self) {
        let tabs = Tab::all();
        self.active_tab = tabs[(self.active_tab.index() + 1) % tabs.len()];
    }

    pub fn prev_tab(&mut self) {
        let tabs = Tab::all();
        self.active_tab = tabs[(self.active_tab.index() + tabs.len() - 1) % tabs.len()];
    }

    /// Apply `nav` to a list tab. Returns the page to fetch, already
    /// marked as loading.
    pub fn navigate(&mut self, tab: Tab, nav: PageNav) -> Option<u32> {
        fn step<C: Default>(c: &mut PageController<C>, nav: PageNav) -> Option<u32> {
            match nav {
                PageNav::Next => c.next_page(),
                PageNav::Prev => c.prev_page(),
                PageNav::First => c.first_page(),
                PageNav::Last => c.last_page(),
                PageNav::Reload => Some(c.request()),
                PageNav::Reset => Some(c.reset_to_first()),
            }
        }
        match tab {
            Tab::AlertLogs => step(&mut self.alert_logs.list, nav),
            Tab::Commands => step(&mut self.commands, nav),
            Tab::RfidTags => step(&mut self.rfid_tags, nav),
            Tab::Obstacles => step(&mut self.obstacles, nav),
            Tab::RobotStatus => step(&mut self.robot_status, nav),
            Tab::WorkPlans => step(&mut self.work_plans, nav),
            Tab::Measurements => step(&mut self.measurements.list, nav),
            Tab::Dashboard | Tab::SendCommand => None,
        }
    }

    /// Current page and total pages of a list tab.
    pub fn page_info(&self, tab: Tab) -> Option<(u32, u32, bool)> {
        fn info<C: Default>(c: &PageController<C>) -> Option<(u32, u32, bool)> {
            Some((c.page(), c.total_pages(), c.is_loading()))
        }
        match tab {
            Tab::AlertLogs => info(&self.alert_logs.list),
            Tab::Commands => info(&self.commands),
            Tab::RfidTags => info(&self.rfid_tags),
            Tab::Obstacles => info(&self.obstacles),
            Tab::RobotStatus => info(&self.robot_status),
            Tab::WorkPlans => info(&self.work_plans),
            Tab::Measurements => info(&self.measurements.list),
            Tab::Dashboard | Tab::SendCommand => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_state() -> AppState {
        AppState::new(Theme::default(), DEFAULT_MAX_TOASTS, HoldTracker::new(true))
    }

    #[test]
    fn tab_all_has_nine() {
        assert_eq!(Tab::all().len(), 9);
        assert_eq!(Tab::SendCommand.index(), 8);
    }

    #[test]
    fn next_tab_cycles() {
        let mut state = make_state();
        for expected in Tab::all().iter().skip(1) {
            state.next_tab();
            assert_eq!(state.active_tab, *expected);
        }
        state.next_tab();
        assert_eq!(state.active_tab, Tab::Dashboard);
    }

    #[test]
    fn prev_tab_wraps() {
        let mut state = make_state();
        state.prev_tab();
        assert_eq!(state.active_tab, Tab::SendCommand);
        state.prev_tab();
        assert_eq!(state.active_tab, Tab::Measurements);
    }

    #[test]
    fn only_list_tabs_have_resources() {
        assert_eq!(Tab::Dashboard.resource(), None);
        assert_eq!(Tab::SendCommand.resource(), None);
        assert_eq!(Tab::Obstacles.resource(), Some(Resource::ObstacleLogs));
        assert!(make_state().page_info(Tab::Dashboard).is_none());
        assert_eq!(make_state().page_info(Tab::WorkPlans), Some((1, 1, false)));
    }

    #[test]
    fn navigate_marks_the_page_loading() {
        let mut state = make_state();
        assert_eq!(state.navigate(Tab::Commands, PageNav::Next), None);
        assert_eq!(state.navigate(Tab::Commands, PageNav::Reload), Some(1));
        assert_eq!(state.page_info(Tab::Commands), Some((1, 1, true)));
        assert_eq!(state.navigate(Tab::SendCommand, PageNav::Reload), None);
    }

    #[test]
    fn status_message_expires() {
        let mut state = make_state();
        state.set_status("saved".into());
        let shown = state.status_message.as_ref().unwrap().1;
        state.expire_status(shown);
        assert!(state.status_message.is_some());
        state.expire_status(shown + std::time::Duration::from_secs(STATUS_MESSAGE_TIMEOUT_SECS));
        assert!(state.status_message.is_none());
    }
}
