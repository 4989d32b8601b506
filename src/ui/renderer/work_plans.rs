//! Work plans tab: plan table with an item panel for the expanded plan.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::models::WorkPlanSummary;
use crate::ui::state::AppState;
use crate::utils::{format_datetime, format_number, truncate_str};

use super::helpers::{
    paged_block, plan_status_span, progress_bar, render_empty, render_scrollbar_bordered,
};

pub fn render_work_plans(frame: &mut Frame, area: Rect, state: &AppState) {
    let expanded = state
        .plan_expansion
        .open_id()
        .and_then(|id| state.work_plans.items().iter().find(|p| p.plan.id == id));

    match expanded {
        Some(plan) => {
            let detail_height = (plan.items.len() as u16 + 5).min(area.height / 2).max(6);
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(6), Constraint::Length(detail_height)])
                .split(area);
            render_table(frame, chunks[0], state);
            render_detail(frame, chunks[1], plan, state);
        }
        None => render_table(frame, area, state),
    }
}

fn render_table(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let list = &state.work_plans;
    let block = paged_block(&t!("title.work_plans"), list.page(), list.total_pages(), t);

    if list.items().is_empty() {
        render_empty(frame, area, block, list.is_loading(), state.tick_count, t);
        return;
    }

    let header = Row::new(
        [
            t!("col.id"),
            t!("col.description"),
            t!("col.status"),
            t!("col.progress"),
            t!("col.locations"),
            t!("col.updated_at"),
        ]
        .into_iter()
        .map(|h| Cell::from(h.to_string()).style(t.table_header_style())),
    )
    .height(1);

    let dim = Style::default().fg(t.text_dim);
    let rows: Vec<Row> = list
        .items()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let marker = if state.plan_expansion.is_open(p.plan.id) {
                "▾"
            } else {
                "▸"
            };
            let style = if i == list.selected {
                t.table_row_selected()
            } else {
                t.table_row_normal()
            };
            Row::new(vec![
                Cell::from(format!("{} {}", marker, p.plan.id)).style(dim),
                Cell::from(truncate_str(&p.plan.description, 40)),
                Cell::from(Line::from(plan_status_span(&p.plan.status, t))),
                Cell::from(Line::from(progress_bar(&p.progress, 12, t))),
                Cell::from(p.items.len().to_string()),
                Cell::from(format_datetime(&p.updated_at)).style(dim),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Min(20),
            Constraint::Length(14),
            Constraint::Length(18),
            Constraint::Length(10),
            Constraint::Length(21),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(t.table_row_selected());

    let mut table_state = TableState::default();
    table_state.select(Some(list.selected));
    frame.render_stateful_widget(table, area, &mut table_state);

    render_scrollbar_bordered(frame, area, list.items().len(), list.selected);
}

fn render_detail(frame: &mut Frame, area: Rect, plan: &WorkPlanSummary, state: &AppState) {
    let t = &state.theme;
    let dim = Style::default().fg(t.text_dim);

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{}: ", t!("field.threshold")), dim),
        Span::styled(
            format!("±{} °C", format_number(plan.plan.temp_threshold)),
            Style::default().fg(t.temperature),
        ),
        Span::raw("  "),
        Span::styled(
            format!("±{} %", format_number(plan.plan.hum_threshold)),
            Style::default().fg(t.humidity),
        ),
        Span::styled(format!("   {}: ", t!("field.violations")), dim),
        Span::styled(
            plan.plan.violation_count.to_string(),
            Style::default().fg(t.warning).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("   {}", format_datetime(&plan.plan.created_at)), dim),
    ])];

    if plan.items.is_empty() {
        lines.push(Line::from(Span::styled(t!("plan.no_items").to_string(), dim)));
    }
    for item in &plan.items {
        lines.push(Line::from(vec![
            Span::styled("  • ", Style::default().fg(t.accent)),
            Span::styled(item.location_name.clone(), Style::default().fg(t.text_primary)),
            Span::styled(format!(" ({})", item.uid), dim),
            Span::styled(
                format!("  ×{}", item.measurement_frequency),
                Style::default().fg(t.info),
            ),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(t.border_highlight_style())
        .title(Span::styled(
            format!(" #{} {} ", plan.plan.id, truncate_str(&plan.plan.description, 40)),
            t.header_style(),
        ));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
