use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{
    app::{ToastLevel, ToastState},
    ui::theme::Theme,
};

/// Draws the toast in the bottom-right corner, above the hint bar.
pub fn render(frame: &mut Frame<'_>, area: Rect, toast: Option<&ToastState>, theme: &Theme) {
    let Some(toast) = toast else {
        return;
    };
    let (marker, color) = match toast.level {
        ToastLevel::Info => ("i", theme.text),
        ToastLevel::Success => ("ok", theme.positive),
    };
    let text_width = toast.message.chars().count() + marker.len() + 1;
    let width = u16::try_from(text_width + 4)
        .unwrap_or(u16::MAX)
        .min(area.width);
    let height = 3u16.min(area.height);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width),
        y: area.y + area.height.saturating_sub(height + 1),
        width,
        height,
    };

    let style = Style::default().fg(color);
    let line = Line::from(vec![
        Span::styled(marker, style),
        Span::raw(" "),
        Span::styled(toast.message.as_str(), Style::default().fg(theme.text)),
    ]);
    let block = Block::default().borders(Borders::ALL).border_style(style);
    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(line).block(block), rect);
}
