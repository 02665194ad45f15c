use engine::{CategoryRow, ItemRow, LoadState, UnitRow, VendorRow, WarehouseRow};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::{
    app::{Screen, ScreenState},
    ui::{components::modal, theme::Theme},
};

/// How a row kind lays itself out as a table.
pub trait Columns: Screen {
    const HEADERS: &'static [&'static str];
    const WIDTHS: &'static [Constraint];

    fn cells(&self) -> Vec<String>;
}

fn active(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

impl Columns for ItemRow {
    const HEADERS: &'static [&'static str] = &[
        "ID", "Code", "Name", "Category", "Unit", "Vendor", "Price", "Expiry",
    ];
    const WIDTHS: &'static [Constraint] = &[
        Constraint::Length(6),
        Constraint::Length(10),
        Constraint::Min(16),
        Constraint::Length(14),
        Constraint::Length(6),
        Constraint::Length(14),
        Constraint::Length(10),
        Constraint::Length(10),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.code.clone().unwrap_or_default(),
            self.name.clone(),
            self.category.label(),
            self.unit.label(),
            self.vendor.label(),
            self.unit_price.map(|price| price.to_string()).unwrap_or_default(),
            self.expiry_date.clone().unwrap_or_default(),
        ]
    }
}

impl Columns for CategoryRow {
    const HEADERS: &'static [&'static str] = &["ID", "Group", "Name", "Active"];
    const WIDTHS: &'static [Constraint] = &[
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Length(7),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.category_id.to_string(),
            self.group.clone(),
            self.category_name.clone(),
            active(self.is_active),
        ]
    }
}

impl Columns for UnitRow {
    const HEADERS: &'static [&'static str] = &["ID", "Code", "Name", "Active"];
    const WIDTHS: &'static [Constraint] = &[
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Min(20),
        Constraint::Length(7),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.unit_id.to_string(),
            self.code.clone(),
            self.name.clone(),
            active(self.is_active),
        ]
    }
}

impl Columns for VendorRow {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Manager", "Contact", "Address"];
    const WIDTHS: &'static [Constraint] = &[
        Constraint::Length(6),
        Constraint::Min(16),
        Constraint::Length(12),
        Constraint::Length(18),
        Constraint::Min(20),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.vendor_id.to_string(),
            self.name.clone(),
            self.manager.clone().unwrap_or_default(),
            self.contact.clone().unwrap_or_default(),
            self.address.clone().unwrap_or_default(),
        ]
    }
}

impl Columns for WarehouseRow {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Location", "Created"];
    const WIDTHS: &'static [Constraint] = &[
        Constraint::Length(6),
        Constraint::Min(16),
        Constraint::Min(16),
        Constraint::Length(17),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.warehouse_id.to_string(),
            self.name.clone(),
            self.location.clone(),
            self.created_label(),
        ]
    }
}

pub fn render<E: Columns>(frame: &mut Frame<'_>, area: Rect, screen: &ScreenState<E>, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    render_status(frame, layout[0], screen, theme);
    render_rows(frame, layout[1], screen, theme);

    if let Some(form) = &screen.form {
        modal::render_form(
            frame,
            area,
            E::KIND,
            form,
            &screen.refs,
            screen.submit.is_loading(),
            theme,
        );
    }
    if screen.gate.is_open() {
        modal::render_gate(frame, area, E::KIND, &screen.gate, theme);
    }
}

fn render_status<E: Columns>(frame: &mut Frame<'_>, area: Rect, screen: &ScreenState<E>, theme: &Theme) {
    let mut spans = match screen.list.state() {
        LoadState::Idle => vec![Span::styled(" -", Style::default().fg(theme.text_muted))],
        LoadState::Loading => vec![Span::styled(" Loading...", Style::default().fg(theme.warning))],
        LoadState::Ready => vec![Span::styled(
            format!(" {} records", screen.list.rows().len()),
            Style::default().fg(theme.text_muted),
        )],
        LoadState::Failed(message) => vec![Span::styled(
            format!(" {message}"),
            Style::default().fg(theme.error),
        )],
    };

    if screen.filter.editing || !screen.filter.applied.is_empty() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled("Location", Style::default().fg(theme.text_muted)));
        let shown = if screen.filter.editing {
            format!(": {}_", screen.filter.input)
        } else {
            format!(": {}", screen.filter.applied)
        };
        spans.push(Span::styled(shown, Style::default().fg(theme.accent)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_rows<E: Columns>(frame: &mut Frame<'_>, area: Rect, screen: &ScreenState<E>, theme: &Theme) {
    let header = Row::new(E::HEADERS.iter().map(|title| Cell::from(*title))).style(
        Style::default()
            .fg(theme.text_muted)
            .add_modifier(Modifier::BOLD),
    );
    let rows = screen
        .list
        .rows()
        .iter()
        .map(|row| Row::new(row.cells()));

    let mut table_state = TableState::default();
    if !screen.list.rows().is_empty() {
        table_state.select(Some(screen.selected));
    }

    let table = Table::new(rows, E::WIDTHS.iter().copied())
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .title(format!(" {} ", E::SECTION.label())),
        )
        .row_highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(table, area, &mut table_state);
}
