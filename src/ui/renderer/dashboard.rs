//! Dashboard tab: the latest realtime report of each kind.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::commands::CommandType;
use crate::models::LiveWorkPlan;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use crate::utils::{format_datetime, format_number, truncate_str};

use super::helpers::{plan_status_span, progress_bar};

pub fn render_dashboard(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(8), Constraint::Length(6)])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);
    render_robot_panel(frame, top[0], state);
    render_command_panel(frame, top[1], state);

    render_work_plan(frame, chunks[1], state);
    render_obstacle(frame, chunks[2], state);
}

fn panel<'a>(title: String, t: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(t.border_style())
        .title(Span::styled(format!(" {} ", title), t.header_style()))
}

fn label_value<'a>(label: String, value: String, style: Style, t: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<14}", label), Style::default().fg(t.text_dim)),
        Span::styled(value, style),
    ])
}

fn waiting<'a>(t: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        t!("dashboard.waiting").to_string(),
        Style::default().fg(t.text_muted),
    ))
}

fn render_robot_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let snap = &state.snapshot;

    let (conn, conn_color) = if !state.realtime_enabled {
        (t!("realtime.off"), t.text_muted)
    } else if snap.connected {
        (t!("realtime.online"), t.success)
    } else {
        (t!("realtime.offline"), t.danger)
    };

    let mut lines = vec![label_value(
        t!("field.connection").to_string(),
        format!("● {}", conn),
        Style::default().fg(conn_color).add_modifier(Modifier::BOLD),
        t,
    )];
    match &snap.robot_status {
        Some(s) => {
            let color = if s.is_running() { t.success } else { t.text_dim };
            lines.push(label_value(
                t!("field.status").to_string(),
                s.status_label(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
                t,
            ));
            lines.push(label_value(
                t!("field.mode").to_string(),
                s.mode_label(),
                Style::default().fg(t.text_primary),
                t,
            ));
            lines.push(label_value(
                t!("field.message").to_string(),
                truncate_str(&s.message, area.width.saturating_sub(18) as usize),
                Style::default().fg(t.text_dim),
                t,
            ));
        }
        None => lines.push(waiting(t)),
    }

    frame.render_widget(
        Paragraph::new(lines).block(panel(t!("dashboard.robot").to_string(), t)),
        area,
    );
}

fn render_command_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let lines = match &state.snapshot.last_command {
        Some(cmd) => {
            let label = CommandType::parse(&cmd.command)
                .map(|c| c.label())
                .unwrap_or_else(|| cmd.command.clone());
            vec![
                label_value(
                    t!("field.command").to_string(),
                    label,
                    Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
                    t,
                ),
                label_value(
                    t!("field.time").to_string(),
                    format_datetime(&cmd.timestamp),
                    Style::default().fg(t.text_primary),
                    t,
                ),
                label_value(
                    t!("field.id").to_string(),
                    cmd.id.to_string(),
                    Style::default().fg(t.text_dim),
                    t,
                ),
            ]
        }
        None => vec![waiting(t)],
    };
    frame.render_widget(
        Paragraph::new(lines).block(panel(t!("dashboard.last_command").to_string(), t)),
        area,
    );
}

fn render_work_plan(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let block = panel(t!("dashboard.work_plan").to_string(), t);

    let Some(plan) = &state.snapshot.work_plan else {
        frame.render_widget(Paragraph::new(waiting(t)).block(block), area);
        return;
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3)])
        .split(inner);

    let mut summary = vec![
        Span::styled(
            format!("#{} ", plan.id),
            Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            truncate_str(&plan.description, 30),
            Style::default().fg(t.text_primary),
        ),
        Span::raw("  "),
        plan_status_span(&plan.status, t),
        Span::raw("  "),
    ];
    summary.extend(progress_bar(&plan.progress, 20, t));
    let thresholds = Line::from(vec![
        Span::styled(
            format!("{}: ", t!("field.threshold")),
            Style::default().fg(t.text_dim),
        ),
        Span::styled(
            format!("±{} °C", format_number(plan.temp_threshold)),
            Style::default().fg(t.temperature),
        ),
        Span::raw("  "),
        Span::styled(
            format!("±{} %", format_number(plan.hum_threshold)),
            Style::default().fg(t.humidity),
        ),
        Span::styled(
            format!("   {}: ", t!("field.violations")),
            Style::default().fg(t.text_dim),
        ),
        Span::styled(plan.violation_count.to_string(), Style::default().fg(t.warning)),
    ]);
    frame.render_widget(Paragraph::new(vec![Line::from(summary), thresholds]), chunks[0]);

    render_locations(frame, chunks[1], plan, t);
}

/// Per-location progress; the newest complete reading is highlighted.
fn render_locations(frame: &mut Frame, area: Rect, plan: &LiveWorkPlan, t: &Theme) {
    let latest = plan.latest_reading().map(|l| l.rfid_tag_id);
    let reading = |v: Option<f64>, unit: &str| {
        v.map(|v| format!("{}{}", format_number(v), unit))
            .unwrap_or_else(|| crate::constants::MISSING_FIELD.to_string())
    };

    let header = Row::new(
        [
            t!("col.location"),
            t!("col.uid"),
            t!("col.collected"),
            t!("col.temperature"),
            t!("col.humidity"),
            t!("col.time"),
        ]
        .into_iter()
        .map(|h| Cell::from(h.to_string()).style(t.table_header_style())),
    );

    let rows: Vec<Row> = plan
        .locations
        .iter()
        .map(|l| {
            let style = if Some(l.rfid_tag_id) == latest {
                t.table_row_selected()
            } else {
                t.table_row_normal()
            };
            Row::new(vec![
                Cell::from(truncate_str(&l.location_name, 20)),
                Cell::from(l.uid.clone()).style(Style::default().fg(t.text_dim)),
                Cell::from(format!("{}/{}", l.current_measurements, l.measurement_frequency)),
                Cell::from(reading(l.latest_temperature, "°C"))
                    .style(Style::default().fg(t.temperature)),
                Cell::from(reading(l.latest_humidity, "%")).style(Style::default().fg(t.humidity)),
                Cell::from(format_datetime(&l.latest_created_at))
                    .style(Style::default().fg(t.text_dim)),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(16),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(21),
        ],
    )
    .header(header);
    frame.render_widget(table, area);
}

fn render_obstacle(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let lines = match &state.snapshot.obstacle {
        Some(o) => vec![
            Line::from(vec![
                Span::styled(format!("{}: ", t!("field.center")), Style::default().fg(t.text_dim)),
                Span::styled(
                    format!("{} cm", format_number(o.center_distance)),
                    Style::default().fg(t.warning).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("   {}: ", t!("field.left")), Style::default().fg(t.text_dim)),
                Span::raw(format!("{} cm", format_number(o.left_distance))),
                Span::styled(format!("   {}: ", t!("field.right")), Style::default().fg(t.text_dim)),
                Span::raw(format!("{} cm", format_number(o.right_distance))),
            ]),
            label_value(
                t!("field.suggestion").to_string(),
                o.suggestion_label(),
                Style::default().fg(t.warning),
                t,
            ),
            label_value(
                t!("field.action").to_string(),
                o.action_label(),
                Style::default().fg(t.text_primary),
                t,
            ),
            label_value(
                t!("field.time").to_string(),
                format_datetime(&o.created_at),
                Style::default().fg(t.text_dim),
                t,
            ),
        ],
        None => vec![waiting(t)],
    };
    frame.render_widget(
        Paragraph::new(lines).block(panel(t!("dashboard.obstacle").to_string(), t)),
        area,
    );
}
