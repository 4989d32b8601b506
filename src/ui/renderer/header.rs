//! Header bar: logo, tab strip, realtime connection state.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::state::{AppState, Tab};
use crate::utils::spinner_char;

pub fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(16), // Logo
            Constraint::Min(20),    // Tabs
            Constraint::Length(20), // Connection
        ])
        .split(area);

    let logo = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(t!("app.name").to_string(), t.header_style()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style()),
    );
    frame.render_widget(logo, chunks[0]);

    // Tabs, numbered by their shortcut key
    let mut tab_spans = vec![Span::raw(" ")];
    for (i, tab) in Tab::all().iter().enumerate() {
        let text = format!("{} {}", i + 1, tab.label());
        if *tab == state.active_tab {
            tab_spans.push(Span::styled(format!(" {text} "), t.tab_active_style()));
        } else {
            tab_spans.push(Span::styled(text, t.tab_inactive_style()));
        }
        if i < Tab::all().len() - 1 {
            tab_spans.push(Span::styled(" │ ", Style::default().fg(t.text_muted)));
        }
    }

    // Loading indicator for the active list
    if let Some((_, _, true)) = state.page_info(state.active_tab) {
        tab_spans.push(Span::raw("  "));
        tab_spans.push(Span::styled(
            spinner_char(state.tick_count).to_string(),
            Style::default().fg(t.accent),
        ));
    }

    let tab_line = Paragraph::new(Line::from(tab_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style()),
    );
    frame.render_widget(tab_line, chunks[1]);

    let (dot, label, color) = if !state.realtime_enabled {
        ("○", t!("realtime.off").to_string(), t.text_muted)
    } else if state.snapshot.connected {
        ("●", t!("realtime.online").to_string(), t.success)
    } else {
        ("●", t!("realtime.offline").to_string(), t.danger)
    };
    let conn = Paragraph::new(Line::from(vec![
        Span::styled(format!("{dot} "), Style::default().fg(color)),
        Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ]))
    .alignment(Alignment::Right)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style()),
    );
    frame.render_widget(conn, chunks[2]);
}
