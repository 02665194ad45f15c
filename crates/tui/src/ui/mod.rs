pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Section};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    let theme = Theme::default();

    // info bar, tabs, content, hint bar
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    components::tabs::render_tabs(frame, layout[1], state.section, &theme);

    let content = layout[2];
    match state.section {
        Section::Items => screens::table::render(frame, content, &state.items, &theme),
        Section::Categories => screens::table::render(frame, content, &state.categories, &theme),
        Section::Units => screens::table::render(frame, content, &state.units, &theme),
        Section::Vendors => screens::table::render(frame, content, &state.vendors, &theme),
        Section::Warehouses => screens::table::render(frame, content, &state.warehouses, &theme),
    }

    render_bottom_bar(frame, layout[3], state, &theme);
    if let Some(alert) = &state.alert {
        components::modal::render_alert(frame, area, alert, &theme);
    }
    components::toast::render(frame, area, state.toast.as_ref(), &theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let refresh = state
        .last_refresh
        .map(|at| at.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    let line = Line::from(vec![
        Span::styled(" Server", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled("Refresh", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {refresh}")),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = vec![
        Span::styled("1-5", Style::default().fg(theme.accent)),
        Span::raw(" section"),
    ];

    let hints = components::hints::context_hints(state);
    if !hints.is_empty() {
        parts.push(components::hints::hint_separator(theme));
        parts.extend(components::hints::hints_to_spans(&hints, theme));
    }

    parts.push(components::hints::hint_separator(theme));
    parts.push(Span::styled("q", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" quit"));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
