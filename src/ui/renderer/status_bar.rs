//! Status bar at the bottom of the screen.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::state::{AppState, Tab};

pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;

    // Helper to create a keybind badge
    let badge = |key: &str, color: ratatui::style::Color| -> Span {
        Span::styled(
            format!(" {} ", key),
            Style::default()
                .fg(t.bg_dark)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        )
    };
    let dim =
        |text: &str| -> Span { Span::styled(text.to_string(), Style::default().fg(t.text_dim)) };

    let mut spans = vec![
        Span::raw(" "),
        badge("Esc", t.accent),
        dim(&t!("status.quit")),
        badge("Tab", t.accent),
        dim(&t!("status.switch")),
    ];

    if state.active_tab.resource().is_some() {
        spans.push(badge("←→", t.accent));
        spans.push(dim(&t!("status.page")));
        spans.push(badge("r", t.accent));
        spans.push(dim(&t!("status.reload")));
    }

    match state.active_tab {
        Tab::AlertLogs | Tab::Measurements | Tab::WorkPlans => {
            spans.push(badge("Enter", t.accent));
            spans.push(dim(&t!("status.expand")));
        }
        _ => {}
    }
    match state.active_tab {
        Tab::RfidTags => {
            spans.push(badge("n", t.success));
            spans.push(dim(&t!("status.new")));
            spans.push(badge("e", t.accent));
            spans.push(dim(&t!("status.edit")));
            spans.push(badge("x", t.danger));
            spans.push(dim(&t!("status.delete")));
        }
        Tab::WorkPlans => {
            spans.push(badge("n", t.success));
            spans.push(dim(&t!("status.new")));
            spans.push(badge("c", t.accent));
            spans.push(dim(&t!("status.reapply")));
            spans.push(badge("x", t.danger));
            spans.push(dim(&t!("status.delete")));
        }
        Tab::SendCommand => {
            spans.push(badge("WASD", t.warning));
            spans.push(dim(&t!("status.drive")));
            spans.push(badge("Space", t.danger));
            spans.push(dim(&t!("status.stop")));
        }
        _ => {}
    }

    spans.push(badge("T", t.accent));
    spans.push(dim(&format!(" {} ", t.name)));
    spans.push(badge("L", t.accent));
    spans.push(dim(&format!(" {} ", state.current_lang.to_uppercase())));
    spans.push(badge("?", t.accent));
    spans.push(dim(&t!("status.help")));

    if let Some((msg, _)) = &state.status_message {
        spans.push(Span::styled(
            format!("  {} ", msg),
            Style::default().fg(t.warning).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
