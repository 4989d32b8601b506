//! Application struct and event loop.
//!
//! Owns the terminal, state, the REST client and the realtime listener.
//! Every network call runs as a spawned task and reports back over a
//! channel that the loop drains each tick.

use std::future::Future;
use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::alerts::{self, AlertLogTree};
use crate::api::{ApiClient, ApiError};
use crate::commands::{
    key_intent, CommandBanner, CommandOutcome, CommandType, DriveMode, HoldTracker, KeyIntent,
};
use crate::config::Config;
use crate::constants::*;
use crate::forms::{PlanField, RfidForm, RfidSubmission, TextField, WorkPlanForm};
use crate::models::*;
use crate::normalize;
use crate::notifications;
use crate::realtime::{RealtimeEvent, RealtimeHandle};
use crate::ui::{self, AppState, ConfirmAction, Modal, PageNav, Tab, Theme};

type Loaded<T> = Result<(T, u32), ApiError>;

/// A finished background request.
enum Fetched {
    AlertLogs(Loaded<AlertLogTree>),
    Commands(Loaded<Vec<CommandLog>>),
    RfidTags(Loaded<Vec<RfidTag>>),
    Obstacles(Loaded<Vec<ObstacleLog>>),
    RobotStatus(Loaded<Vec<RobotStatusEntry>>),
    WorkPlans(Loaded<Vec<WorkPlanSummary>>),
    Measurements(Loaded<Vec<MeasurementPlan>>),
    LatestCommand(Result<Option<CommandLog>, ApiError>),
    /// Tag list for the work plan form; `template` is the plan being re-applied.
    TagChoices {
        template: Option<WorkPlanSummary>,
        result: Result<Vec<RfidTag>, ApiError>,
    },
    Mutation {
        kind: Mutation,
        result: Result<(), ApiError>,
    },
}

fn split<T>(page: Page<T>) -> (Vec<T>, u32) {
    (page.items, page.total_pages)
}

impl Fetched {
    /// Normalize a list response for the screen behind `tab`.
    fn page(tab: Tab, body: Result<Value, ApiError>) -> Option<Self> {
        let fetched = match tab {
            Tab::AlertLogs => Fetched::AlertLogs(body.map(|b| {
                let (records, total) = normalize::page_records(&b);
                (alerts::aggregate(&records), total)
            })),
            Tab::Commands => {
                Fetched::Commands(body.map(|b| split(normalize::page(&b, normalize::command_log))))
            }
            Tab::RfidTags => {
                Fetched::RfidTags(body.map(|b| split(normalize::page(&b, normalize::rfid_tag))))
            }
            Tab::Obstacles => Fetched::Obstacles(
                body.map(|b| split(normalize::page(&b, normalize::obstacle_log))),
            ),
            Tab::RobotStatus => Fetched::RobotStatus(
                body.map(|b| split(normalize::page(&b, normalize::robot_status))),
            ),
            Tab::WorkPlans => Fetched::WorkPlans(
                body.map(|b| split(normalize::page(&b, normalize::work_plan_summary))),
            ),
            Tab::Measurements => Fetched::Measurements(
                body.map(|b| split(normalize::page(&b, normalize::measurement_plan))),
            ),
            Tab::Dashboard | Tab::SendCommand => return None,
        };
        Some(fetched)
    }
}

/// Create/update/delete requests and the screen each one refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mutation {
    TagCreated,
    TagUpdated,
    TagDeleted,
    PlanCreated,
    PlanDeleted,
}

impl Mutation {
    fn tab(self) -> Tab {
        match self {
            Mutation::TagCreated | Mutation::TagUpdated | Mutation::TagDeleted => Tab::RfidTags,
            Mutation::PlanCreated | Mutation::PlanDeleted => Tab::WorkPlans,
        }
    }

    /// New plans land on page 1; everything else reloads in place.
    fn refresh(self) -> PageNav {
        match self {
            Mutation::PlanCreated => PageNav::Reset,
            _ => PageNav::Reload,
        }
    }

    fn done_message(self) -> String {
        match self {
            Mutation::TagCreated => t!("mutation.tag_created").to_string(),
            Mutation::TagUpdated => t!("mutation.tag_updated").to_string(),
            Mutation::TagDeleted => t!("mutation.tag_deleted").to_string(),
            Mutation::PlanCreated => t!("mutation.plan_created").to_string(),
            Mutation::PlanDeleted => t!("mutation.plan_deleted").to_string(),
        }
    }
}

/// Shared line-editing keys. Returns true if the key was consumed.
fn edit_text(field: &mut TextField, key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => field.insert(c),
        KeyCode::Backspace => field.backspace(),
        KeyCode::Left => field.left(),
        KeyCode::Right => field.right(),
        _ => return false,
    }
    true
}

pub struct App {
    state: AppState,
    api: ApiClient,
    page_size: u32,

    // Channels
    fetch_tx: mpsc::UnboundedSender<Fetched>,
    fetch_rx: mpsc::UnboundedReceiver<Fetched>,
    command_tx: mpsc::UnboundedSender<CommandOutcome>,
    command_rx: mpsc::UnboundedReceiver<CommandOutcome>,

    // Realtime listener
    realtime: Option<RealtimeHandle>,
    realtime_rx: Option<mpsc::Receiver<RealtimeEvent>>,

    // Local loop state
    poll_interval: Option<Duration>,
    last_poll: Option<Instant>,
    keyboard_enhanced: bool,
}

impl App {
    /// Create a new App: HTTP client, theme, and the realtime listener
    /// unless it is disabled. Must run inside the tokio runtime.
    pub fn new(config: &Config) -> Result<Self> {
        let api = ApiClient::from_config(config).context("failed to build HTTP client")?;

        // Key-up events make press-and-hold exact; without them holds time out.
        let keyboard_enhanced = supports_keyboard_enhancement().unwrap_or(false);
        tracing::info!(keyboard_enhanced, "terminal capabilities probed");

        let mut state = AppState::new(
            Theme::resolve(&config.theme),
            config.toast.max_visible,
            HoldTracker::new(keyboard_enhanced)
                .with_timeouts(config.hold.initial_grace_ms, config.hold.repeat_timeout_ms),
        );
        state.api_base_url = config.api_base_url.clone();

        let (realtime, realtime_rx) = if config.realtime.enabled {
            match RealtimeHandle::start(&config.realtime) {
                Some((handle, rx)) => (Some(handle), Some(rx)),
                None => (None, None),
            }
        } else {
            tracing::info!("realtime listener disabled");
            (None, None)
        };
        state.realtime_enabled = realtime.is_some();

        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let poll_interval = (config.latest_command_poll_secs > 0)
            .then(|| Duration::from_secs(config.latest_command_poll_secs));

        Ok(Self {
            state,
            api,
            page_size: config.page_size,
            fetch_tx,
            fetch_rx,
            command_tx,
            command_rx,
            realtime,
            realtime_rx,
            poll_interval,
            last_poll: None,
            keyboard_enhanced,
        })
    }

    /// Run the main event loop. Returns when the user quits.
    pub async fn run(&mut self) -> Result<()> {
        // Terminal init
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        if self.keyboard_enhanced {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        // Main loop
        loop {
            terminal.draw(|frame| ui::render(frame, &self.state))?;

            self.drain_fetched();
            self.drain_command_outcomes();
            self.drain_realtime_events();

            if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
                if let Event::Key(key) = event::read()? {
                    if self.handle_key(key) {
                        break; // quit requested
                    }
                }
            }

            self.tick();
        }

        // Cleanup
        if self.keyboard_enhanced {
            execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
        }
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        if let Some(handle) = self.realtime.take() {
            handle.shutdown().await;
        }

        println!("\n{}\n", t!("app.stopped"));
        Ok(())
    }

    // ── Channel draining ─────────────────────────────────────────

    fn drain_fetched(&mut self) {
        while let Ok(fetched) = self.fetch_rx.try_recv() {
            match fetched {
                Fetched::AlertLogs(r) => self.state.alert_logs.apply(r),
                Fetched::Commands(r) => {
                    self.state.commands.apply(r);
                    self.state.commands.clamp_selection();
                }
                Fetched::RfidTags(r) => {
                    self.state.rfid_tags.apply(r);
                    self.state.rfid_tags.clamp_selection();
                }
                Fetched::Obstacles(r) => {
                    self.state.obstacles.apply(r);
                    self.state.obstacles.clamp_selection();
                }
                Fetched::RobotStatus(r) => {
                    self.state.robot_status.apply(r);
                    self.state.robot_status.clamp_selection();
                }
                Fetched::WorkPlans(r) => {
                    self.state.work_plans.apply(r);
                    self.state.work_plans.clamp_selection();
                }
                Fetched::Measurements(r) => self.state.measurements.apply(r),
                Fetched::LatestCommand(Ok(cmd)) => self.state.snapshot.set_last_command(cmd),
                Fetched::LatestCommand(Err(e)) => {
                    tracing::debug!(error = %e, "latest command poll failed");
                }
                Fetched::TagChoices { template, result } => match result {
                    Ok(tags) => {
                        if self.state.modal.is_none() {
                            let form = match template {
                                Some(plan) => WorkPlanForm::from_template(&plan, tags),
                                None => WorkPlanForm::new(tags),
                            };
                            self.state.modal = Some(Modal::WorkPlanForm(form));
                        }
                    }
                    Err(e) => self.fail("loading RFID tag choices", &e),
                },
                Fetched::Mutation { kind, result } => match result {
                    Ok(()) => {
                        tracing::info!(?kind, "mutation applied");
                        self.state.set_status(kind.done_message());
                        self.load(kind.tab(), kind.refresh());
                    }
                    Err(e) => self.fail("mutation", &e),
                },
            }
        }
    }

    fn drain_command_outcomes(&mut self) {
        while let Ok(outcome) = self.command_rx.try_recv() {
            if let Some(ref e) = outcome.error {
                tracing::warn!(command = %outcome.command, error = %e, "command send failed");
            }
            self.state.banner = Some(CommandBanner::from_outcome(&outcome, Instant::now()));
        }
    }

    fn drain_realtime_events(&mut self) {
        let Some(rx) = self.realtime_rx.as_mut() else {
            return;
        };
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        for event in events {
            self.state.snapshot.apply(&event);
            if let Some(toast) = notifications::toast_for(&event) {
                self.state.push_toast(toast);
            }
        }
    }

    /// Log the cause and show the generic error popup.
    fn fail(&mut self, what: &str, err: &ApiError) {
        tracing::warn!(error = %err, "{} failed", what);
        self.state.modal = Some(Modal::Error(t!("error.generic").to_string()));
    }

    // ── Dispatch ─────────────────────────────────────────────────

    /// Move a list tab's pager and fetch the resulting page.
    fn load(&mut self, tab: Tab, nav: PageNav) {
        let Some(resource) = tab.resource() else {
            return;
        };
        let Some(page) = self.state.navigate(tab, nav) else {
            return;
        };
        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        let limit = self.page_size;
        tokio::spawn(async move {
            let body = api.fetch_page(resource, page, limit).await;
            if let Some(fetched) = Fetched::page(tab, body) {
                let _ = tx.send(fetched);
            }
        });
    }

    fn poll_latest_command(&mut self) {
        self.last_poll = Some(Instant::now());
        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(Fetched::LatestCommand(api.latest_command().await));
        });
    }

    /// Fire one command; the outcome comes back as a banner.
    fn send_command(&self, command: CommandType) {
        tracing::info!(%command, "sending command");
        let api = self.api.clone();
        let tx = self.command_tx.clone();
        tokio::spawn(async move {
            let error = api.send_command(command.code()).await.err().map(|e| e.to_string());
            let _ = tx.send(CommandOutcome { command, error });
        });
    }

    fn mutate<F, Fut>(&self, kind: Mutation, op: F)
    where
        F: FnOnce(ApiClient) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), ApiError>> + Send + 'static,
    {
        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = op(api).await;
            let _ = tx.send(Fetched::Mutation { kind, result });
        });
    }

    /// Fetch the tag choices, then open the plan form.
    fn open_plan_form(&mut self, template: Option<WorkPlanSummary>) {
        self.state.set_status(t!("plan.loading_tags").to_string());
        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_all_rfid_tags().await;
            let _ = tx.send(Fetched::TagChoices { template, result });
        });
    }

    fn confirm(&mut self, action: ConfirmAction) {
        match action {
            ConfirmAction::DeleteRfidTag { id, .. } => {
                self.mutate(Mutation::TagDeleted, move |api| async move {
                    api.delete_rfid_tag(id).await
                });
            }
            ConfirmAction::DeleteWorkPlan { id, .. } => {
                self.mutate(Mutation::PlanDeleted, move |api| async move {
                    api.delete_work_plan(id).await
                });
            }
        }
    }

    /// Send STOP for every movement key still held.
    fn release_holds(&mut self) {
        for cmd in CommandType::ALL {
            if let Some(stop) = self.state.holds.release(cmd) {
                self.send_command(stop);
            }
        }
    }

    fn tab_changed(&mut self, from: Tab) {
        if from == Tab::SendCommand && self.state.active_tab != Tab::SendCommand {
            self.release_holds();
        }
        self.load(self.state.active_tab, PageNav::Reload);
    }

    // ── Key handling ─────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Releases only matter to held drive keys.
        if key.kind == KeyEventKind::Release {
            if self.state.active_tab == Tab::SendCommand
                && self.state.modal.is_none()
                && !self.state.show_help
            {
                self.handle_drive_release(key);
            }
            return false;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        // Help overlay mode (scrollable)
        if self.state.show_help {
            return self.handle_key_help(key);
        }

        // Modal popups capture all input
        if self.state.modal.is_some() {
            return self.handle_key_modal(key);
        }

        // Drive keys shadow the normal bindings on the command tab
        if self.state.active_tab == Tab::SendCommand && self.handle_key_send_command(key) {
            return false;
        }

        self.handle_key_normal(key)
    }

    fn handle_key_help(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                self.state.show_help = false;
                self.state.help_scroll = 0;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.help_scroll = self.state.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.help_scroll = (self.state.help_scroll + 1).min(HELP_POPUP_HEIGHT as usize);
            }
            KeyCode::PageUp => {
                self.state.help_scroll = self.state.help_scroll.saturating_sub(PAGE_SIZE);
            }
            KeyCode::PageDown => {
                self.state.help_scroll =
                    (self.state.help_scroll + PAGE_SIZE).min(HELP_POPUP_HEIGHT as usize);
            }
            KeyCode::Home => {
                self.state.help_scroll = 0;
            }
            _ => {}
        }
        false
    }

    fn handle_key_modal(&mut self, key: KeyEvent) -> bool {
        let Some(modal) = self.state.modal.take() else {
            return false;
        };
        self.state.modal = match modal {
            Modal::Error(msg) => match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => None,
                _ => Some(Modal::Error(msg)),
            },
            Modal::Confirm(action) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    self.confirm(action);
                    None
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => None,
                _ => Some(Modal::Confirm(action)),
            },
            Modal::RfidForm(form) => self.handle_key_rfid_form(form, key),
            Modal::WorkPlanForm(form) => self.handle_key_plan_form(form, key),
        };
        false
    }

    fn handle_key_rfid_form(&mut self, mut form: RfidForm, key: KeyEvent) -> Option<Modal> {
        match key.code {
            KeyCode::Esc => return None,
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Enter => match form.submit() {
                Ok(RfidSubmission::Create(tag)) => {
                    self.mutate(Mutation::TagCreated, move |api| async move {
                        api.create_rfid_tag(&tag).await
                    });
                    return None;
                }
                Ok(RfidSubmission::Update { id, patch }) => {
                    self.mutate(Mutation::TagUpdated, move |api| async move {
                        api.update_rfid_tag(id, &patch).await
                    });
                    return None;
                }
                Ok(RfidSubmission::Unchanged) => return None,
                Err(_) => {} // shown inline
            },
            _ => {
                edit_text(form.focused_mut(), &key);
            }
        }
        Some(Modal::RfidForm(form))
    }

    fn handle_key_plan_form(&mut self, mut form: WorkPlanForm, key: KeyEvent) -> Option<Modal> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return None,
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Enter => match form.submit() {
                Ok(plan) => {
                    self.mutate(Mutation::PlanCreated, move |api| async move {
                        api.create_work_plan(&plan).await
                    });
                    return None;
                }
                Err(_) => {} // shown inline
            },
            KeyCode::Char('n') if ctrl => form.add_item(),
            KeyCode::Char('d') if ctrl => {
                if form.remove_focused_item().is_ok() {
                    form.error = None;
                }
            }
            KeyCode::Left | KeyCode::Right if matches!(form.focused(), PlanField::ItemTag(_)) => {
                form.cycle_choice(key.code == KeyCode::Right);
            }
            _ => {
                if let Some(field) = form.focused_text_mut() {
                    edit_text(field, &key);
                }
            }
        }
        Some(Modal::WorkPlanForm(form))
    }

    /// Drive keys on the command tab. Returns true if the key was consumed.
    fn handle_key_send_command(&mut self, key: KeyEvent) -> bool {
        let KeyCode::Char(c) = key.code else {
            return false;
        };
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return false;
        }
        let Some(intent) = key_intent(c) else {
            return false;
        };

        match intent {
            KeyIntent::Hold(cmd) => {
                if let Some(cmd) = self.state.holds.press(cmd, Instant::now()) {
                    self.send_command(cmd);
                }
            }
            KeyIntent::Send(cmd) => {
                // Keep the mode indicator in step with unconditional sends.
                match cmd {
                    CommandType::Auto => {
                        let _ = self.state.mode.set(DriveMode::Auto);
                    }
                    CommandType::Manual => {
                        let _ = self.state.mode.set(DriveMode::Manual);
                    }
                    _ => {}
                }
                self.send_command(cmd);
            }
            KeyIntent::Mode(mode) => {
                if let Some(cmd) = self.state.mode.set(mode) {
                    self.send_command(cmd);
                }
            }
        }
        true
    }

    fn handle_drive_release(&mut self, key: KeyEvent) {
        if let KeyCode::Char(c) = key.code {
            if let Some(KeyIntent::Hold(cmd)) = key_intent(c) {
                if let Some(stop) = self.state.holds.release(cmd) {
                    self.send_command(stop);
                }
            }
        }
    }

    fn handle_key_normal(&mut self, key: KeyEvent) -> bool {
        let tab = self.state.active_tab;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,

            // Tab navigation
            KeyCode::Tab => {
                self.state.next_tab();
                self.tab_changed(tab);
            }
            KeyCode::BackTab => {
                self.state.prev_tab();
                self.tab_changed(tab);
            }
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                if let Some(&target) = Tab::all().get(idx) {
                    self.state.active_tab = target;
                    self.tab_changed(tab);
                }
            }

            // Cursor
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(true),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(false),

            // Pagination
            KeyCode::Left | KeyCode::Char('h') => self.load(tab, PageNav::Prev),
            KeyCode::Right | KeyCode::Char('l') => self.load(tab, PageNav::Next),
            KeyCode::Home => self.load(tab, PageNav::First),
            KeyCode::End => self.load(tab, PageNav::Last),
            KeyCode::Char('r') => self.load(tab, PageNav::Reload),

            KeyCode::Enter => self.toggle_at_cursor(),

            // RFID tag / work plan actions
            KeyCode::Char('n') if tab == Tab::RfidTags => {
                self.state.modal = Some(Modal::RfidForm(RfidForm::create()));
            }
            KeyCode::Char('n') if tab == Tab::WorkPlans => self.open_plan_form(None),
            KeyCode::Char('e') if tab == Tab::RfidTags => {
                if let Some(tag) = self.state.rfid_tags.selected_item() {
                    self.state.modal = Some(Modal::RfidForm(RfidForm::edit(tag)));
                }
            }
            KeyCode::Char('c') if tab == Tab::WorkPlans => {
                if let Some(plan) = self.state.work_plans.selected_item().cloned() {
                    self.open_plan_form(Some(plan));
                }
            }
            KeyCode::Char('x') if tab == Tab::RfidTags => {
                if let Some(tag) = self.state.rfid_tags.selected_item() {
                    self.state.modal = Some(Modal::Confirm(ConfirmAction::DeleteRfidTag {
                        id: tag.id,
                        label: tag.display_name(),
                    }));
                }
            }
            KeyCode::Char('x') if tab == Tab::WorkPlans => {
                if let Some(plan) = self.state.work_plans.selected_item() {
                    if plan.plan.status.is_deletable() {
                        self.state.modal = Some(Modal::Confirm(ConfirmAction::DeleteWorkPlan {
                            id: plan.plan.id,
                            label: format!("#{} {}", plan.plan.id, plan.plan.description),
                        }));
                    } else {
                        let status = plan.plan.status.label();
                        self.state
                            .set_status(t!("plan.not_deletable", status = status).to_string());
                    }
                }
            }

            // Toasts
            KeyCode::Char('d') => self.state.toasts.dismiss_latest(),

            // Theme / language / help
            KeyCode::Char('T') => {
                self.state.cycle_theme();
                let name = self.state.theme.name.clone();
                self.state.set_status(t!("status.theme_changed", name = name).to_string());
            }
            KeyCode::Char('L') => {
                self.state.cycle_lang();
                let lang = self.state.current_lang.clone();
                self.state.set_status(t!("status.lang_changed", lang = lang).to_string());
            }
            KeyCode::Char('?') => self.state.show_help = true,
            _ => {}
        }
        false
    }

    fn move_cursor(&mut self, up: bool) {
        let s = &mut self.state;
        match s.active_tab {
            Tab::AlertLogs if up => s.alert_logs.cursor_up(),
            Tab::AlertLogs => s.alert_logs.cursor_down(),
            Tab::Measurements if up => s.measurements.cursor_up(),
            Tab::Measurements => s.measurements.cursor_down(),
            Tab::Commands if up => s.commands.select_prev(),
            Tab::Commands => s.commands.select_next(),
            Tab::RfidTags if up => s.rfid_tags.select_prev(),
            Tab::RfidTags => s.rfid_tags.select_next(),
            Tab::Obstacles if up => s.obstacles.select_prev(),
            Tab::Obstacles => s.obstacles.select_next(),
            Tab::RobotStatus if up => s.robot_status.select_prev(),
            Tab::RobotStatus => s.robot_status.select_next(),
            Tab::WorkPlans if up => s.work_plans.select_prev(),
            Tab::WorkPlans => s.work_plans.select_next(),
            Tab::Dashboard | Tab::SendCommand => {}
        }
    }

    fn toggle_at_cursor(&mut self) {
        let s = &mut self.state;
        match s.active_tab {
            Tab::AlertLogs => s.alert_logs.toggle_at_cursor(),
            Tab::Measurements => s.measurements.toggle_at_cursor(),
            Tab::WorkPlans => {
                if let Some(id) = s.work_plans.selected_item().map(|p| p.plan.id) {
                    s.plan_expansion.toggle(id);
                }
            }
            _ => {}
        }
    }

    // ── Tick ─────────────────────────────────────────────────────

    fn tick(&mut self) {
        let now = Instant::now();
        self.state.tick_count = self.state.tick_count.wrapping_add(1);

        for stop in self.state.holds.expire(now) {
            self.send_command(stop);
        }

        self.state.toasts.prune(now);
        if self.state.banner.as_ref().is_some_and(|b| b.is_expired(now)) {
            self.state.banner = None;
        }
        self.state.expire_status(now);

        if let Some(interval) = self.poll_interval {
            let due = self
                .last_poll
                .map_or(true, |at| now.saturating_duration_since(at) >= interval);
            if due {
                self.poll_latest_command();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn alert_page_is_aggregated() {
        let body = json!({
            "data": [
                {"work_plan": {"work_plan_id": 3}, "rfid_tags": [
                    {"rfid_tag": {"rfid_tag_id": 1}, "alerts": [{"alert_id": 9}]}
                ]},
                {"work_plan": {}, "rfid_tags": []}
            ],
            "totalPages": 4
        });
        let Some(Fetched::AlertLogs(Ok((tree, total)))) = Fetched::page(Tab::AlertLogs, Ok(body))
        else {
            panic!("expected an alert tree");
        };
        assert_eq!(total, 4);
        assert_eq!(tree.plan_ids(), vec![3]);
    }

    #[test]
    fn list_page_drops_non_object_records() {
        let body = json!({
            "data": [{"id": 1, "command": "FORWARD"}, "junk", 7],
            "totalPages": 0
        });
        let Some(Fetched::Commands(Ok((items, total)))) = Fetched::page(Tab::Commands, Ok(body))
        else {
            panic!("expected commands");
        };
        assert_eq!(items.len(), 1);
        assert_eq!(total, 1);
    }

    #[test]
    fn tabs_without_lists_fetch_nothing() {
        assert!(Fetched::page(Tab::Dashboard, Ok(json!({}))).is_none());
        assert!(Fetched::page(Tab::SendCommand, Ok(json!({}))).is_none());
    }

    #[test]
    fn plan_creation_returns_to_first_page() {
        assert_eq!(Mutation::PlanCreated.refresh(), PageNav::Reset);
        assert_eq!(Mutation::PlanDeleted.refresh(), PageNav::Reload);
        assert_eq!(Mutation::TagUpdated.tab(), Tab::RfidTags);
    }

    #[test]
    fn text_editing_ignores_control_chords() {
        let mut field = TextField::default();
        assert!(edit_text(&mut field, &KeyEvent::from(KeyCode::Char('a'))));
        let ctrl_n = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL);
        assert!(!edit_text(&mut field, &ctrl_n));
        assert_eq!(field.value(), "a");
    }
}
