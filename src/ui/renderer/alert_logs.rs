//! Alert logs tab: per-type summary cards above a collapsible
//! plan → location → alert tree.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::AlertType;
use crate::screens::TreeRow;
use crate::ui::state::AppState;
use crate::utils::{format_datetime, format_number, truncate_str};

use super::helpers::{
    paged_block, plan_status_span, render_empty, render_scrollbar_bordered, scroll_offset,
};

pub fn render_alert_logs(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    render_stats(frame, chunks[0], state);
    render_tree(frame, chunks[1], state);
}

fn render_stats(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let stats = state.alert_logs.stats();

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(area);

    let mut cards: Vec<(String, usize, ratatui::style::Color)> =
        vec![(t!("alerts.total").to_string(), stats.total, t.accent)];
    for kind in AlertType::KNOWN {
        cards.push((kind.label(), stats.count(&kind), t.alert_type_color(&kind)));
    }

    for ((label, count, color), cell) in cards.into_iter().zip(cells.iter()) {
        let card = Paragraph::new(Line::from(vec![
            Span::styled(
                format!(" {} ", count),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(label, Style::default().fg(t.text_dim)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
        frame.render_widget(card, *cell);
    }
}

fn render_tree(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let screen = &state.alert_logs;
    let block = paged_block(
        &t!("title.alert_logs"),
        screen.list.page(),
        screen.list.total_pages(),
        t,
    );

    let rows = screen.visible_rows();
    if rows.is_empty() {
        render_empty(frame, area, block, screen.list.is_loading(), state.tick_count, t);
        return;
    }

    let nodes = screen.tree().nodes();
    let selected = screen.list.selected;
    let inner_width = area.width.saturating_sub(4) as usize;

    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut spans = match *row {
                TreeRow::Plan { node } => {
                    let n = &nodes[node];
                    let marker = if screen.expansion.is_plan_open(n.plan.id) {
                        "▾"
                    } else {
                        "▸"
                    };
                    vec![
                        Span::styled(
                            format!("{} #{} ", marker, n.plan.id),
                            Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            truncate_str(&n.plan.description, inner_width / 3),
                            Style::default().fg(t.text_primary),
                        ),
                        Span::raw("  "),
                        plan_status_span(&n.plan.status, t),
                        Span::styled(
                            format!("  {}", t!("alerts.count", count = n.alert_count())),
                            Style::default().fg(t.warning),
                        ),
                        Span::styled(
                            format!("  {}", format_datetime(&n.plan.created_at)),
                            Style::default().fg(t.text_dim),
                        ),
                    ]
                }
                TreeRow::Tag { node, group } => {
                    let n = &nodes[node];
                    let g = &n.groups()[group];
                    let marker = if screen.expansion.is_tag_open(n.plan.id, g.tag.id) {
                        "▾"
                    } else {
                        "▸"
                    };
                    vec![
                        Span::styled(
                            format!("   {} {}", marker, g.tag.location_name),
                            Style::default().fg(t.text_primary),
                        ),
                        Span::styled(
                            format!(" ({})", g.tag.uid),
                            Style::default().fg(t.text_dim),
                        ),
                        Span::styled(
                            format!("  {}", t!("alerts.count", count = g.alerts.len())),
                            Style::default().fg(t.warning),
                        ),
                    ]
                }
                TreeRow::Alert { node, group, alert } => {
                    let a = &nodes[node].groups()[group].alerts[alert];
                    let color = t.alert_type_color(&a.alert_type);
                    let unit = a.alert_type.unit();
                    vec![
                        Span::styled("       ● ", Style::default().fg(color)),
                        Span::styled(
                            format!("{:<12}", a.alert_type.label()),
                            Style::default().fg(color).add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            format!(
                                " {}{} / {}{} ±{}{}",
                                format_number(a.measured_value),
                                unit,
                                format_number(a.reference_value),
                                unit,
                                format_number(a.threshold),
                                unit,
                            ),
                            Style::default().fg(t.text_primary),
                        ),
                        Span::styled(
                            format!("  #{}", a.measurement_number),
                            Style::default().fg(t.text_dim),
                        ),
                        Span::styled(
                            format!("  {}", format_datetime(&a.created_at)),
                            Style::default().fg(t.text_dim),
                        ),
                    ]
                }
            };
            if i == selected {
                spans.insert(0, Span::styled("▶", Style::default().fg(t.accent)));
                Line::from(spans).style(t.table_row_selected())
            } else {
                spans.insert(0, Span::raw(" "));
                Line::from(spans)
            }
        })
        .collect();

    let height = area.height.saturating_sub(2) as usize;
    let offset = scroll_offset(selected, height, lines.len());
    let total = lines.len();
    let visible: Vec<Line> = lines.into_iter().skip(offset).take(height).collect();

    frame.render_widget(Paragraph::new(visible).block(block), area);
    render_scrollbar_bordered(frame, area, total, selected);
}
