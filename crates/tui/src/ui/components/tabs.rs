use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{app::Section, ui::theme::Theme};

/// Renders the section tabs, each prefixed with its number key.
pub fn render_tabs(frame: &mut Frame<'_>, area: Rect, active: Section, theme: &Theme) {
    let mut spans = vec![Span::raw(" ")];

    for (i, section) in Section::ALL.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let key = format!("{} ", section.key());
        if section == active {
            spans.push(Span::styled(key, Style::default().fg(theme.accent)));
            spans.push(Span::styled("[", Style::default().fg(theme.accent)));
            spans.push(Span::styled(
                section.label(),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled("]", Style::default().fg(theme.accent)));
        } else {
            spans.push(Span::styled(key, Style::default().fg(theme.text_muted)));
            spans.push(Span::styled(
                section.label(),
                Style::default().fg(theme.text_muted),
            ));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
