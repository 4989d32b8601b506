//! Popup overlays: help, toast stack, RFID/work plan forms, confirm and
//! error dialogs.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::constants::*;
use crate::forms::{PlanField, RfidField, RfidForm, TextField, WorkPlanForm};
use crate::ui::state::{AppState, ConfirmAction, Modal};
use crate::ui::theme::Theme;

use super::helpers::centered_rect;

pub fn render_help_overlay(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let popup_area = centered_rect(HELP_POPUP_WIDTH, HELP_POPUP_HEIGHT, area);

    frame.render_widget(Clear, popup_area);

    let help_entry = |key: &str, desc: String, color: Color| -> Line {
        Line::from(vec![
            Span::styled(
                format!("  {:<18}", key),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(desc, Style::default().fg(t.text_primary)),
        ])
    };
    let section = |title: String| -> Line {
        Line::from(Span::styled(
            format!("  {}", title),
            Style::default()
                .fg(t.accent_secondary)
                .add_modifier(Modifier::BOLD),
        ))
    };

    let help_text = vec![
        Line::from(Span::styled(
            format!("  {}", t!("help.heading")),
            t.header_style(),
        )),
        Line::raw(""),
        section(t!("help.general").to_string()),
        help_entry("Tab / Shift+Tab", t!("help.switch_tabs").to_string(), t.accent),
        help_entry("1 - 9", t!("help.jump_tab").to_string(), t.accent),
        help_entry("Up/Down / j / k", t!("help.move").to_string(), t.accent),
        help_entry("←/→ Home/End", t!("help.pages").to_string(), t.accent),
        help_entry("r", t!("help.reload").to_string(), t.accent),
        help_entry("Enter", t!("help.expand").to_string(), t.accent),
        help_entry("d", t!("help.dismiss_toast").to_string(), t.accent),
        help_entry("T / L", t!("help.theme_lang").to_string(), t.accent),
        help_entry("q / Esc / Ctrl+C", t!("help.quit").to_string(), t.accent),
        Line::raw(""),
        section(t!("tab.rfid_tags").to_string()),
        help_entry("n / e", t!("help.tag_new_edit").to_string(), t.accent),
        help_entry("x", t!("help.delete").to_string(), t.danger),
        Line::raw(""),
        section(t!("tab.work_plans").to_string()),
        help_entry("n", t!("help.plan_new").to_string(), t.accent),
        help_entry("c", t!("help.plan_reapply").to_string(), t.accent),
        help_entry("x", t!("help.plan_delete").to_string(), t.danger),
        Line::raw(""),
        section(t!("tab.send_command").to_string()),
        help_entry("W A S D", t!("help.drive").to_string(), t.success),
        help_entry("Space", t!("help.stop").to_string(), t.warning),
        help_entry("Q / E / F", t!("help.one_shot").to_string(), t.accent),
        help_entry("Z / X", t!("help.avoid").to_string(), t.accent),
        help_entry("1 / 2", t!("help.mode").to_string(), t.accent),
        help_entry("Esc / Ctrl+C", t!("help.quit").to_string(), t.accent),
        Line::raw(""),
        section(t!("help.forms").to_string()),
        help_entry("Tab / ↑↓", t!("help.form_focus").to_string(), t.accent),
        help_entry("←/→", t!("help.form_choice").to_string(), t.accent),
        help_entry("Ctrl+N / Ctrl+D", t!("help.form_items").to_string(), t.accent),
        help_entry("Enter / Esc", t!("help.form_submit").to_string(), t.accent),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(
                    format!(" {} ", t!("title.help")),
                    t.header_style(),
                ))
                .borders(Borders::ALL)
                .border_style(t.border_highlight_style()),
        )
        .wrap(Wrap { trim: false })
        .scroll((state.help_scroll as u16, 0));

    frame.render_widget(help, popup_area);
}

/// Toasts stacked in the top-right corner, newest at the bottom.
pub fn render_toasts(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let width = TOAST_WIDTH.min(area.width);
    let text_width = width.saturating_sub(4).max(1) as usize;
    let mut y = area.y + 1;

    for toast in state.toasts.iter() {
        let color = t.toast_color(toast.kind);
        let mut lines = Vec::new();
        for line in &toast.lines {
            for wrapped in textwrap::wrap(line, text_width) {
                lines.push(Line::from(Span::styled(
                    wrapped.into_owned(),
                    Style::default().fg(t.text_primary),
                )));
            }
        }

        let height = lines.len() as u16 + 2;
        if y + height > area.y + area.height {
            break;
        }
        let rect = Rect {
            x: area.x + area.width.saturating_sub(width + 1),
            y,
            width,
            height,
        };
        y += height;

        frame.render_widget(Clear, rect);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(t.bg_panel))
            .title(Span::styled(
                format!(" {} ", toast.title),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        frame.render_widget(Paragraph::new(lines).block(block), rect);
    }
}

pub fn render_modal(frame: &mut Frame, area: Rect, state: &AppState) {
    match &state.modal {
        Some(Modal::RfidForm(form)) => render_rfid_form(frame, area, form, &state.theme),
        Some(Modal::WorkPlanForm(form)) => render_plan_form(frame, area, form, &state.theme),
        Some(Modal::Confirm(action)) => render_confirm(frame, area, action, &state.theme),
        Some(Modal::Error(msg)) => render_error(frame, area, msg, &state.theme),
        None => {}
    }
}

/// A labeled input line; the focused field shows its cursor.
fn input_line<'a>(label: String, field: &TextField, focused: bool, t: &Theme) -> Line<'a> {
    let label_style = if focused {
        Style::default().fg(t.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(t.text_dim)
    };
    let mut spans = vec![Span::styled(format!("  {:<22}", label), label_style)];
    let value = field.value();
    if focused {
        let (before, after) = value.split_at(field.cursor());
        let mut rest = after.chars();
        let under = rest.next().map(String::from).unwrap_or_else(|| " ".into());
        spans.push(Span::styled(before.to_string(), Style::default().fg(t.text_primary)));
        spans.push(Span::styled(
            under,
            Style::default().fg(t.bg_dark).bg(t.accent),
        ));
        spans.push(Span::styled(
            rest.as_str().to_string(),
            Style::default().fg(t.text_primary),
        ));
    } else {
        spans.push(Span::styled(value.to_string(), Style::default().fg(t.text_primary)));
    }
    Line::from(spans)
}

fn form_footer<'a>(error: Option<String>, t: &Theme) -> Vec<Line<'a>> {
    let mut lines = vec![Line::raw("")];
    if let Some(e) = error {
        lines.push(Line::from(Span::styled(
            format!("  ✗ {}", e),
            Style::default().fg(t.danger).add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(vec![
        Span::styled("  Enter ", Style::default().fg(t.accent).add_modifier(Modifier::BOLD)),
        Span::styled(format!("{}  ", t!("form.save")), Style::default().fg(t.text_dim)),
        Span::styled("Esc ", Style::default().fg(t.accent).add_modifier(Modifier::BOLD)),
        Span::styled(t!("form.cancel").to_string(), Style::default().fg(t.text_dim)),
    ]));
    lines
}

fn popup<'a>(frame: &mut Frame, area: Rect, title: String, height: u16, t: &Theme) -> (Rect, Block<'a>) {
    let popup_area = centered_rect(FORM_POPUP_WIDTH.min(area.width.saturating_sub(2)), height, area);
    frame.render_widget(Clear, popup_area);
    let block = Block::default()
        .title(Span::styled(format!(" {} ", title), t.header_style()))
        .borders(Borders::ALL)
        .border_style(t.border_highlight_style())
        .style(Style::default().bg(t.bg_panel));
    (popup_area, block)
}

fn render_rfid_form(frame: &mut Frame, area: Rect, form: &RfidForm, t: &Theme) {
    let title = if form.is_edit() {
        t!("rfid.edit_title")
    } else {
        t!("rfid.create_title")
    };

    let mut lines = vec![Line::raw("")];
    for (i, field) in RfidField::ALL.into_iter().enumerate() {
        lines.push(input_line(field.label(), form.field(field), i == form.focus, t));
    }
    lines.extend(form_footer(form.error.as_ref().map(|e| e.to_string()), t));

    let height = lines.len() as u16 + 2;
    let (rect, block) = popup(frame, area, title.to_string(), height, t);
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}

fn render_plan_form(frame: &mut Frame, area: Rect, form: &WorkPlanForm, t: &Theme) {
    let title = if form.reapply {
        t!("plan.reapply_title")
    } else {
        t!("plan.create_title")
    };
    let focused = form.focused();

    let mut lines = vec![
        Line::raw(""),
        input_line(
            t!("plan.description").to_string(),
            &form.description,
            focused == PlanField::Description,
            t,
        ),
        Line::raw(""),
        Line::from(Span::styled(
            format!("  {}", t!("plan.locations")),
            Style::default().fg(t.accent_secondary).add_modifier(Modifier::BOLD),
        )),
    ];

    for (i, item) in form.items.iter().enumerate() {
        let tag_focused = focused == PlanField::ItemTag(i);
        let choice_style = if tag_focused {
            Style::default().fg(t.bg_dark).bg(t.accent)
        } else {
            Style::default().fg(t.text_primary)
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:>2}. ", i + 1),
                Style::default().fg(if tag_focused { t.accent } else { t.text_dim }),
            ),
            Span::styled(if tag_focused { "◀ " } else { "  " }, Style::default().fg(t.accent)),
            Span::styled(form.choice_label(item), choice_style),
            Span::styled(if tag_focused { " ▶" } else { "" }, Style::default().fg(t.accent)),
        ]));
        lines.push(input_line(
            format!("      {}", t!("plan.frequency")),
            &item.frequency,
            focused == PlanField::ItemFrequency(i),
            t,
        ));
    }

    lines.push(Line::raw(""));
    lines.push(input_line(
        t!("plan.temp_threshold").to_string(),
        &form.temp_threshold,
        focused == PlanField::TempThreshold,
        t,
    ));
    lines.push(input_line(
        t!("plan.hum_threshold").to_string(),
        &form.hum_threshold,
        focused == PlanField::HumThreshold,
        t,
    ));
    lines.push(input_line(
        t!("plan.violation_count").to_string(),
        &form.violation_count,
        focused == PlanField::ViolationCount,
        t,
    ));
    lines.extend(form_footer(form.error.as_ref().map(|e| e.to_string()), t));

    let height = (lines.len() as u16 + 2).min(area.height);
    let (rect, block) = popup(frame, area, title.to_string(), height, t);

    // Keep the focused row in view when the form outgrows the screen.
    let inner_height = rect.height.saturating_sub(2) as usize;
    let focus_row = match focused {
        PlanField::Description => 1,
        PlanField::ItemTag(i) => 4 + i * 2,
        PlanField::ItemFrequency(i) => 5 + i * 2,
        _ => lines.len().saturating_sub(1),
    };
    let scroll = focus_row.saturating_sub(inner_height.saturating_sub(1));
    frame.render_widget(
        Paragraph::new(lines).block(block).scroll((scroll as u16, 0)),
        rect,
    );
}

fn render_confirm(frame: &mut Frame, area: Rect, action: &ConfirmAction, t: &Theme) {
    let popup_area = centered_rect(DIALOG_POPUP_WIDTH.min(area.width.saturating_sub(4)), 8, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", t!("confirm.title")),
            Style::default().fg(t.danger).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(t.danger))
        .style(Style::default().bg(t.bg_panel));

    let lines = vec![
        Line::raw(""),
        Line::from(Span::styled(
            format!("  {}", action.prompt()),
            Style::default().fg(t.text_primary),
        )),
        Line::raw(""),
        Line::from(vec![
            Span::styled(
                format!("  {} ", t!("confirm.sure")),
                Style::default().fg(t.text_dim),
            ),
            Span::styled("[y]", Style::default().fg(t.success).add_modifier(Modifier::BOLD)),
            Span::styled(" / ", Style::default().fg(t.text_dim)),
            Span::styled("[n]", Style::default().fg(t.danger).add_modifier(Modifier::BOLD)),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        popup_area,
    );
}

fn render_error(frame: &mut Frame, area: Rect, msg: &str, t: &Theme) {
    let popup_area = centered_rect(DIALOG_POPUP_WIDTH.min(area.width.saturating_sub(4)), 7, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", t!("error.title")),
            Style::default().fg(t.danger).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(t.danger))
        .style(Style::default().bg(t.bg_panel));

    let lines = vec![
        Line::raw(""),
        Line::from(Span::styled(
            format!("  {}", msg),
            Style::default().fg(t.text_primary),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            format!("  {}", t!("error.dismiss")),
            Style::default().fg(t.text_dim),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        popup_area,
    );
}
