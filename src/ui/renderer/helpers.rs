//! Shared rendering helpers: list blocks, scroll windows, scrollbar, centered rect.

use ratatui::{
    layout::{Alignment, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

use crate::models::WorkPlanStatus;
use crate::ui::theme::Theme;
use crate::utils::spinner_char;

/// Bordered block titled with the screen name and `page/total`.
pub fn paged_block<'a>(title: &str, page: u32, total: u32, t: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(t.border_style())
        .title(Span::styled(format!(" {} ", title), t.header_style()))
        .title_bottom(
            Line::from(Span::styled(
                format!(" {} ", t!("page.of", page = page, total = total)),
                Style::default().fg(t.text_dim),
            ))
            .alignment(Alignment::Right),
        )
}

/// Centered "loading" or "no data" message for an empty list.
pub fn render_empty(frame: &mut Frame, area: Rect, block: Block, loading: bool, tick: u64, t: &Theme) {
    let text = if loading {
        format!("{} {}", spinner_char(tick), t!("list.loading"))
    } else {
        t!("list.empty").to_string()
    };
    let p = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(t.text_dim),
    )))
    .alignment(Alignment::Center)
    .block(block);
    frame.render_widget(p, area);
}

/// First row to draw so that `selected` stays inside a window of `height` rows.
pub fn scroll_offset(selected: usize, height: usize, total: usize) -> usize {
    if height == 0 || total <= height {
        return 0;
    }
    let max_offset = total - height;
    selected.saturating_sub(height - 1).min(max_offset)
}

pub fn plan_status_span<'a>(status: &WorkPlanStatus, t: &Theme) -> Span<'a> {
    Span::styled(status.label(), t.plan_status_style(status))
}

/// `[█████░░░░░] 50%` from a backend progress value.
pub fn progress_bar<'a>(progress: &str, width: usize, t: &Theme) -> Vec<Span<'a>> {
    let pct = progress.trim().parse::<f64>().unwrap_or(0.0).clamp(0.0, 100.0);
    let filled = ((pct / 100.0) * width as f64).round() as usize;
    vec![
        Span::styled(
            "█".repeat(filled),
            Style::default().fg(t.progress_color(pct)),
        ),
        Span::styled(
            "░".repeat(width.saturating_sub(filled)),
            Style::default().fg(t.text_muted),
        ),
        Span::styled(
            format!(" {:.0}%", pct),
            Style::default().fg(t.text_primary).add_modifier(Modifier::BOLD),
        ),
    ]
}

/// Render a vertical scrollbar inside a bordered area (1px vertical margin).
pub fn render_scrollbar_bordered(frame: &mut Frame, area: Rect, total: usize, position: usize) {
    let visible_height = area.height.saturating_sub(2) as usize;
    if total <= visible_height {
        return;
    }
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("▲"))
        .end_symbol(Some("▼"));
    let mut scrollbar_state = ScrollbarState::new(total).position(position);
    frame.render_stateful_widget(
        scrollbar,
        area.inner(Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut scrollbar_state,
    );
}

/// Return a `Rect` centered within `area` with the given dimensions.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
