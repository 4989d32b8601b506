//! Manual control tab: drive pad, one-shot commands, mode switch and the
//! result banner of the last send.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::commands::{CommandType, DriveMode};
use crate::ui::state::AppState;
use crate::utils::format_datetime;

pub fn render_send_command(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(9),
            Constraint::Length(7),
            Constraint::Min(3),
        ])
        .split(area);

    render_mode(frame, chunks[0], state);
    render_drive_pad(frame, chunks[1], state);
    render_one_shots(frame, chunks[2], state);
    render_banner(frame, chunks[3], state);
}

fn render_mode(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let current = state.mode.mode();
    let option = |key: &str, mode: DriveMode, label: String| {
        let active = current == mode;
        let style = if active {
            Style::default()
                .fg(t.bg_dark)
                .bg(t.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(t.text_dim)
        };
        vec![
            Span::styled(format!(" {} ", key), Style::default().fg(t.accent)),
            Span::styled(format!(" {} ", label), style),
            Span::raw("   "),
        ]
    };

    let mut spans = vec![Span::styled(
        format!("{}: ", t!("send.mode")),
        Style::default().fg(t.text_dim),
    )];
    spans.extend(option("1", DriveMode::Auto, t!("command.auto").to_string()));
    spans.extend(option("2", DriveMode::Manual, t!("command.manual").to_string()));

    let p = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style())
            .title(Span::styled(
                format!(" {} ", t!("title.send_command")),
                t.header_style(),
            )),
    );
    frame.render_widget(p, area);
}

/// One keycap: highlighted while its command is held.
fn keycap<'a>(state: &AppState, key: &str, cmd: CommandType) -> Vec<Span<'a>> {
    let t = &state.theme;
    let style = if state.holds.is_held(cmd) {
        Style::default()
            .fg(t.bg_dark)
            .bg(t.success)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(t.text_primary)
            .bg(t.bg_panel)
            .add_modifier(Modifier::BOLD)
    };
    vec![
        Span::styled(format!(" {} ", key), style),
        Span::styled(format!(" {:<12}", cmd.label()), Style::default().fg(t.text_dim)),
    ]
}

fn render_drive_pad(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let pad = " ".repeat(16);

    let mut top = vec![Span::raw(pad.clone())];
    top.extend(keycap(state, "W", CommandType::Forward));

    let mut middle = keycap(state, "A", CommandType::TurnLeft);
    middle.extend(keycap(state, "S", CommandType::Backward));
    middle.extend(keycap(state, "D", CommandType::TurnRight));

    let mut stop = vec![Span::raw(pad)];
    stop.extend(keycap(state, "␣", CommandType::Stop));

    let hint = if state.holds.reports_releases() {
        t!("send.hold_hint")
    } else {
        t!("send.hold_hint_fallback")
    };

    let lines = vec![
        Line::from(""),
        Line::from(top),
        Line::from(""),
        Line::from(middle),
        Line::from(""),
        Line::from(stop),
        Line::from(Span::styled(hint.to_string(), Style::default().fg(t.text_muted))),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style())
            .title(Span::styled(
                format!(" {} ", t!("send.drive")),
                Style::default().fg(t.text_dim),
            )),
    );
    frame.render_widget(p, area);
}

fn render_one_shots(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let mut first = keycap(state, "Q", CommandType::Auto);
    first.extend(keycap(state, "E", CommandType::Manual));
    first.extend(keycap(state, "F", CommandType::FollowLineMode));
    let mut second = keycap(state, "Z", CommandType::TurnLeftForObstacleAvoid);
    second.extend(keycap(state, "X", CommandType::TurnRightForObstacleAvoid));

    let lines = vec![Line::from(""), Line::from(first), Line::from(""), Line::from(second)];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style())
            .title(Span::styled(
                format!(" {} ", t!("send.commands")),
                Style::default().fg(t.text_dim),
            )),
    );
    frame.render_widget(p, area);
}

fn render_banner(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let mut lines = Vec::new();

    if let Some(banner) = &state.banner {
        let (icon, color) = if banner.ok {
            ("✓", t.success)
        } else {
            ("✗", t.danger)
        };
        lines.push(Line::from(Span::styled(
            format!("{} {}", icon, banner.text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
    }

    if let Some(cmd) = &state.snapshot.last_command {
        let label = CommandType::parse(&cmd.command)
            .map(|c| c.label())
            .unwrap_or_else(|| cmd.command.clone());
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}: ", t!("dashboard.last_command")),
                Style::default().fg(t.text_dim),
            ),
            Span::styled(label, Style::default().fg(t.text_primary)),
            Span::styled(
                format!("  {}", format_datetime(&cmd.timestamp)),
                Style::default().fg(t.text_dim),
            ),
        ]));
    }

    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style()),
    );
    frame.render_widget(p, area);
}
