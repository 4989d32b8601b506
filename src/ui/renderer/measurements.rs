//! Collected data tab: plan → location → reading rows.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::constants::MISSING_FIELD;
use crate::models::{Measurement, MeasurementItem};
use crate::screens::MeasurementRow;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use crate::utils::{format_datetime, format_number, truncate_str};

use super::helpers::{
    paged_block, plan_status_span, progress_bar, render_empty, render_scrollbar_bordered,
    scroll_offset,
};

pub fn render_measurements(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let screen = &state.measurements;
    let block = paged_block(
        &t!("title.measurements"),
        screen.list.page(),
        screen.list.total_pages(),
        t,
    );

    let rows = screen.visible_rows();
    if rows.is_empty() {
        render_empty(frame, area, block, screen.list.is_loading(), state.tick_count, t);
        return;
    }

    let plans = screen.list.items();
    let selected = screen.list.selected;
    let dim = Style::default().fg(t.text_dim);

    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut spans = match *row {
                MeasurementRow::Plan { plan } => {
                    let p = &plans[plan];
                    let marker = if screen.expansion.is_plan_open(p.plan.id) {
                        "▾"
                    } else {
                        "▸"
                    };
                    let mut spans = vec![
                        Span::styled(
                            format!("{} #{} ", marker, p.plan.id),
                            Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            truncate_str(&p.plan.description, 30),
                            Style::default().fg(t.text_primary),
                        ),
                        Span::raw("  "),
                        plan_status_span(&p.plan.status, t),
                        Span::raw("  "),
                    ];
                    spans.extend(progress_bar(&p.progress, 10, t));
                    spans.push(Span::styled(
                        format!(
                            "  {}",
                            t!(
                                "measure.collected",
                                done = p.completed_measurements(),
                                expected = p.expected_measurements()
                            )
                        ),
                        Style::default().fg(t.info),
                    ));
                    spans
                }
                MeasurementRow::Location { plan, item } => {
                    let p = &plans[plan];
                    let it = &p.items[item];
                    let marker = if screen.expansion.is_location_open(p.plan.id, it.tag.id) {
                        "▾"
                    } else {
                        "▸"
                    };
                    let done = it.measurements.iter().filter(|m| m.is_complete()).count();
                    let mut spans = vec![
                        Span::styled(
                            format!("   {} {}", marker, it.tag.location_name),
                            Style::default().fg(t.text_primary),
                        ),
                        Span::styled(format!(" ({})", it.tag.uid), dim),
                        Span::styled(
                            format!("  {}/{}", done, it.measurement_frequency),
                            Style::default().fg(t.info),
                        ),
                        Span::styled(
                            format!(
                                "  {} {}°C / {}%",
                                t!("field.reference"),
                                format_number(it.tag.reference_temperature),
                                format_number(it.tag.reference_humidity)
                            ),
                            dim,
                        ),
                    ];
                    if !it.measurements.is_empty() {
                        spans.extend(stats_spans(it, t));
                    }
                    spans
                }
                MeasurementRow::Reading {
                    plan,
                    item,
                    reading,
                } => reading_spans(&plans[plan].items[item].measurements[reading], t),
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

/// `avg 24.5°C / 61.2%  max 27°C / 70%` for one location.
fn stats_spans<'a>(it: &MeasurementItem, t: &Theme) -> Vec<Span<'a>> {
    let avg = |v: Option<f64>| v.map_or_else(|| MISSING_FIELD.to_string(), |v| format!("{v:.1}"));
    let max = |v: Option<f64>| v.map_or_else(|| MISSING_FIELD.to_string(), format_number);
    vec![
        Span::styled(format!("  {} ", t!("measure.avg")), Style::default().fg(t.text_dim)),
        Span::styled(
            format!("{}°C", avg(it.avg_temperature())),
            Style::default().fg(t.temperature),
        ),
        Span::styled(" / ", Style::default().fg(t.text_dim)),
        Span::styled(
            format!("{}%", avg(it.avg_humidity())),
            Style::default().fg(t.humidity),
        ),
        Span::styled(format!("  {} ", t!("measure.max")), Style::default().fg(t.text_dim)),
        Span::styled(
            format!("{}°C", max(it.max_temperature())),
            Style::default().fg(t.temperature),
        ),
        Span::styled(" / ", Style::default().fg(t.text_dim)),
        Span::styled(
            format!("{}%", max(it.max_humidity())),
            Style::default().fg(t.humidity),
        ),
    ]
}

fn reading_spans<'a>(m: &Measurement, t: &Theme) -> Vec<Span<'a>> {
    let value = |v: Option<f64>, unit: &str| match v {
        Some(v) => format!("{}{}", format_number(v), unit),
        None => MISSING_FIELD.to_string(),
    };
    vec![
        Span::styled(
            format!("       #{:<3}", m.measurement_number),
            Style::default().fg(t.text_dim),
        ),
        Span::styled(
            format!("{:>9}", value(m.temperature, "°C")),
            Style::default().fg(t.temperature),
        ),
        Span::styled(
            format!("{:>9}", value(m.humidity, "%")),
            Style::default().fg(t.humidity),
        ),
        Span::styled(
            format!("  {}", format_datetime(&m.created_at)),
            Style::default().fg(t.text_dim),
        ),
    ]
}
