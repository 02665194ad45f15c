use engine::{
    DeleteGate, EntityKind, ReferenceMaps, fields,
    forms::{FieldInput, FormModel},
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::{
    app::{FormMode, FormState},
    ui::theme::Theme,
};

pub fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height.min(area.height)),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width.min(area.width)),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

fn modal_block(title: String, color: ratatui::style::Color, theme: &Theme) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(theme.panel))
}

/// What a field shows: typed text as is, selections by their resolved name.
fn display_value(input: FieldInput, raw: &str, refs: &ReferenceMaps) -> String {
    match input {
        FieldInput::Text | FieldInput::Number | FieldInput::Date => raw.to_string(),
        FieldInput::Group if raw.is_empty() => "(choose)".to_string(),
        FieldInput::Group => raw.to_string(),
        FieldInput::Reference(_) if raw.is_empty() => "(choose)".to_string(),
        FieldInput::Reference(kind) => fields::parse_integer(raw)
            .and_then(|id| refs.get(kind)?.name(id))
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{raw}")),
    }
}

pub fn render_form<F: FormModel>(
    frame: &mut Frame<'_>,
    area: Rect,
    kind: EntityKind,
    form: &FormState<F>,
    refs: &ReferenceMaps,
    submitting: bool,
    theme: &Theme,
) {
    let title = match form.mode {
        FormMode::Create => format!(" New {kind} "),
        FormMode::Edit(id) => format!(" Edit {kind} #{id} "),
    };
    let values = form.form.values();
    let mut lines = Vec::new();
    for (index, (spec, raw)) in F::FIELDS.iter().zip(values).enumerate() {
        let focused = index == form.focus;
        let marker = if focused { "› " } else { "  " };
        let label_style = if focused {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text_muted)
        };
        let mut value = display_value(spec.input, raw, refs);
        if focused && matches!(spec.input, FieldInput::Group | FieldInput::Reference(_)) {
            value = format!("◂ {value} ▸");
        } else if focused {
            value.push('_');
        }
        lines.push(Line::from(vec![
            Span::styled(marker, label_style),
            Span::styled(format!("{:<14}", spec.label), label_style),
            Span::styled(value, Style::default().fg(theme.text)),
        ]));
    }

    lines.push(Line::from(""));
    if submitting {
        lines.push(Line::from(Span::styled(
            "Saving...",
            Style::default().fg(theme.warning),
        )));
    } else if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            err.as_str(),
            Style::default().fg(theme.error),
        )));
    }

    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let rect = centered_box(60, height, area);
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines)
            .block(modal_block(title, theme.accent, theme))
            .wrap(Wrap { trim: false }),
        rect,
    );
}

pub fn render_gate(
    frame: &mut Frame<'_>,
    area: Rect,
    kind: EntityKind,
    gate: &DeleteGate,
    theme: &Theme,
) {
    let Some(target) = gate.target() else {
        return;
    };
    let confirm = if gate.is_pending() {
        Span::styled("Deleting...", Style::default().fg(theme.warning))
    } else if gate.can_confirm() {
        Span::styled(
            "[Enter] Delete",
            Style::default()
                .fg(theme.error)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("[Enter] Delete", Style::default().fg(theme.text_muted))
    };

    let lines = vec![
        Line::from(vec![
            Span::raw(format!("Delete {kind} ")),
            Span::styled(
                target.name.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("?"),
        ]),
        Line::from(Span::styled(
            "Type the name exactly to confirm.",
            Style::default().fg(theme.text_muted),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", Style::default().fg(theme.accent)),
            Span::raw(gate.typed()),
            Span::styled("_", Style::default().fg(theme.accent)),
        ]),
        Line::from(""),
        Line::from(vec![
            confirm,
            Span::raw("   "),
            Span::styled("[Esc] Cancel", Style::default().fg(theme.text_muted)),
        ]),
    ];

    let rect = centered_box(56, 8, area);
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).block(modal_block(" Confirm delete ".to_string(), theme.error, theme)),
        rect,
    );
}

pub fn render_alert(frame: &mut Frame<'_>, area: Rect, message: &str, theme: &Theme) {
    let lines = vec![
        Line::from(Span::styled(message, Style::default().fg(theme.text))),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] OK",
            Style::default().fg(theme.text_muted),
        )),
    ];
    let rect = centered_box(56, 6, area);
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines)
            .block(modal_block(" Error ".to_string(), theme.error, theme))
            .wrap(Wrap { trim: true }),
        rect,
    );
}

#[cfg(test)]
mod tests {
    use engine::ReferenceMap;
    use serde_json::json;

    use super::*;

    #[test]
    fn selections_show_resolved_names() {
        let mut refs = ReferenceMaps::new();
        refs.insert(
            EntityKind::Vendor,
            ReferenceMap::build(EntityKind::Vendor, &[json!({ "id": 3, "name": "Acme" })]),
        );
        let vendor = FieldInput::Reference(EntityKind::Vendor);
        assert_eq!(display_value(vendor, "3", &refs), "Acme");
        assert_eq!(display_value(vendor, "9", &refs), "#9");
        assert_eq!(display_value(vendor, "", &refs), "(choose)");
        assert_eq!(display_value(FieldInput::Group, "MEAT", &refs), "MEAT");
        assert_eq!(display_value(FieldInput::Text, "", &refs), "");
    }

    #[test]
    fn centered_box_fits_small_areas() {
        let area = Rect::new(0, 0, 40, 5);
        let rect = centered_box(60, 10, area);
        assert!(rect.width <= 40 && rect.height <= 5);
    }
}
