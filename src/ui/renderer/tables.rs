//! Plain paginated tables: commands, RFID tags, obstacle logs, robot status.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Cell, Row, Table, TableState},
    Frame,
};

use crate::commands::CommandType;
use crate::screens::PageController;
use crate::ui::state::AppState;
use crate::utils::{format_datetime, format_number, truncate_str};

use super::helpers::{paged_block, render_empty, render_scrollbar_bordered};

/// Shared frame of every table screen: title + pager, header, selection.
fn render_page<T>(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    title: &str,
    list: &PageController<Vec<T>>,
    headers: Vec<String>,
    widths: &[Constraint],
    row: impl Fn(&T) -> Vec<Cell<'static>>,
) {
    let t = &state.theme;
    let block = paged_block(title, list.page(), list.total_pages(), t);

    if list.items().is_empty() {
        render_empty(frame, area, block, list.is_loading(), state.tick_count, t);
        return;
    }

    let header = Row::new(
        headers
            .into_iter()
            .map(|h| Cell::from(h).style(t.table_header_style())),
    )
    .height(1);

    let rows: Vec<Row> = list
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == list.selected {
                t.table_row_selected()
            } else {
                t.table_row_normal()
            };
            Row::new(row(item)).style(style)
        })
        .collect();

    let table = Table::new(rows, widths.to_vec())
        .header(header)
        .block(block)
        .row_highlight_style(t.table_row_selected());

    let mut table_state = TableState::default();
    table_state.select(Some(list.selected));
    frame.render_stateful_widget(table, area, &mut table_state);

    render_scrollbar_bordered(frame, area, list.items().len(), list.selected);
}

pub fn render_commands(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let dim = Style::default().fg(t.text_dim);
    render_page(
        frame,
        area,
        state,
        &t!("title.commands"),
        &state.commands,
        vec![
            t!("col.id").to_string(),
            t!("col.command").to_string(),
            t!("col.timestamp").to_string(),
            t!("col.created_at").to_string(),
        ],
        &[
            Constraint::Length(8),
            Constraint::Min(24),
            Constraint::Length(21),
            Constraint::Length(21),
        ],
        |c| {
            let label = CommandType::parse(&c.command)
                .map(|cmd| cmd.label())
                .unwrap_or_else(|| c.command.clone());
            vec![
                Cell::from(c.id.to_string()).style(dim),
                Cell::from(label),
                Cell::from(format_datetime(&c.timestamp)),
                Cell::from(format_datetime(&c.created_at)).style(dim),
            ]
        },
    );
}

pub fn render_rfid_tags(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let dim = Style::default().fg(t.text_dim);
    let temp = Style::default().fg(t.temperature);
    let hum = Style::default().fg(t.humidity);
    render_page(
        frame,
        area,
        state,
        &t!("title.rfid_tags"),
        &state.rfid_tags,
        vec![
            t!("col.id").to_string(),
            t!("col.uid").to_string(),
            t!("col.location").to_string(),
            t!("col.description").to_string(),
            t!("col.ref_temp").to_string(),
            t!("col.ref_hum").to_string(),
            t!("col.updated_at").to_string(),
        ],
        &[
            Constraint::Length(6),
            Constraint::Length(14),
            Constraint::Length(20),
            Constraint::Min(20),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(21),
        ],
        |tag| {
            vec![
                Cell::from(tag.id.to_string()).style(dim),
                Cell::from(tag.uid.clone()),
                Cell::from(truncate_str(&tag.location_name, 20)),
                Cell::from(truncate_str(&tag.description, 40)).style(dim),
                Cell::from(format!("{} °C", format_number(tag.reference_temperature))).style(temp),
                Cell::from(format!("{} %", format_number(tag.reference_humidity))).style(hum),
                Cell::from(format_datetime(&tag.updated_at)).style(dim),
            ]
        },
    );
}

pub fn render_obstacles(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let dim = Style::default().fg(t.text_dim);
    let warn = Style::default().fg(t.warning);
    render_page(
        frame,
        area,
        state,
        &t!("title.obstacles"),
        &state.obstacles,
        vec![
            t!("col.id").to_string(),
            t!("col.center").to_string(),
            t!("col.left").to_string(),
            t!("col.right").to_string(),
            t!("col.suggestion").to_string(),
            t!("col.action").to_string(),
            t!("col.created_at").to_string(),
        ],
        &[
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Min(16),
            Constraint::Min(16),
            Constraint::Length(21),
        ],
        |o| {
            vec![
                Cell::from(o.id.to_string()).style(dim),
                Cell::from(format!("{} cm", format_number(o.center_distance))),
                Cell::from(format!("{} cm", format_number(o.left_distance))),
                Cell::from(format!("{} cm", format_number(o.right_distance))),
                Cell::from(o.suggestion_label()).style(warn),
                Cell::from(o.action_label()),
                Cell::from(format_datetime(&o.created_at)).style(dim),
            ]
        },
    );
}

pub fn render_robot_status(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let dim = Style::default().fg(t.text_dim);
    let (ok, idle) = (Style::default().fg(t.success), Style::default().fg(t.text_dim));
    render_page(
        frame,
        area,
        state,
        &t!("title.robot_status"),
        &state.robot_status,
        vec![
            t!("col.id").to_string(),
            t!("col.status").to_string(),
            t!("col.mode").to_string(),
            t!("col.message").to_string(),
            t!("col.timestamp").to_string(),
        ],
        &[
            Constraint::Length(6),
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Min(24),
            Constraint::Length(21),
        ],
        |s| {
            vec![
                Cell::from(s.id.to_string()).style(dim),
                Cell::from(s.status_label()).style(if s.is_running() { ok } else { idle }),
                Cell::from(s.mode_label()),
                Cell::from(truncate_str(&s.message, 60)),
                Cell::from(format_datetime(&s.timestamp)).style(dim),
            ]
        },
    );
}
