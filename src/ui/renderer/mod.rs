//! Renderer module: split into focused submodules.
//!
//! - `header`: Logo, tab strip, connection indicator
//! - `status_bar`: Bottom status bar with keybinds
//! - `dashboard`: Latest realtime snapshot
//! - `alert_logs`: Alert summary cards and the alert tree
//! - `tables`: Commands, RFID tags, obstacles, robot status
//! - `work_plans`: Work plan table with the expanded plan's items
//! - `measurements`: Collected readings per plan and location
//! - `send_command`: Manual control pad
//! - `overlays`: Help, toasts, forms, confirm and error popups
//! - `helpers`: Shared rendering utilities

mod alert_logs;
mod dashboard;
mod header;
pub mod helpers;
mod measurements;
mod overlays;
mod send_command;
mod status_bar;
mod tables;
mod work_plans;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use super::state::{AppState, Tab};

/// Top-level render function. Delegates to sub-renderers per tab.
pub fn render(frame: &mut Frame, state: &AppState) {
    let size = frame.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header bar
            Constraint::Min(10),   // Content area
            Constraint::Length(1), // Status bar
        ])
        .split(size);

    header::render_header(frame, main_chunks[0], state);
    status_bar::render_status_bar(frame, main_chunks[2], state);

    let content = main_chunks[1];
    match state.active_tab {
        Tab::Dashboard => dashboard::render_dashboard(frame, content, state),
        Tab::AlertLogs => alert_logs::render_alert_logs(frame, content, state),
        Tab::Commands => tables::render_commands(frame, content, state),
        Tab::RfidTags => tables::render_rfid_tags(frame, content, state),
        Tab::Obstacles => tables::render_obstacles(frame, content, state),
        Tab::RobotStatus => tables::render_robot_status(frame, content, state),
        Tab::WorkPlans => work_plans::render_work_plans(frame, content, state),
        Tab::Measurements => measurements::render_measurements(frame, content, state),
        Tab::SendCommand => send_command::render_send_command(frame, content, state),
    }

    if state.modal.is_some() {
        overlays::render_modal(frame, size, state);
    }

    if state.show_help {
        overlays::render_help_overlay(frame, size, state);
    }

    if !state.toasts.is_empty() {
        overlays::render_toasts(frame, content, state);
    }
}
