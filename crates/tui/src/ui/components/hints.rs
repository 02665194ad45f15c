use engine::{CategoryRow, ItemRow, UnitRow, VendorRow, WarehouseRow};
use ratatui::{style::Style, text::Span};

use crate::{
    app::{AppState, Screen, Section},
    ui::theme::Theme,
};

/// A key and what it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

const fn hint(key: &'static str, action: &'static str) -> KeyHint {
    KeyHint { key, action }
}

pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }
    spans
}

pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

/// Hints for whatever currently has focus.
pub fn context_hints(state: &AppState) -> Vec<KeyHint> {
    if state.alert.is_some() {
        return vec![hint("Enter", "dismiss")];
    }
    match state.section {
        Section::Items => screen_hints::<ItemRow>(state),
        Section::Categories => screen_hints::<CategoryRow>(state),
        Section::Units => screen_hints::<UnitRow>(state),
        Section::Vendors => screen_hints::<VendorRow>(state),
        Section::Warehouses => screen_hints::<WarehouseRow>(state),
    }
}

fn screen_hints<E: Screen>(state: &AppState) -> Vec<KeyHint> {
    let screen = E::state(state);
    if screen.gate.is_open() {
        return vec![hint("type name", "confirm"), hint("Enter", "delete"), hint("Esc", "cancel")];
    }
    if screen.form.is_some() {
        return vec![
            hint("Tab", "next"),
            hint("←→", "choose"),
            hint("Enter", "save"),
            hint("Esc", "cancel"),
        ];
    }
    if screen.filter.editing {
        return vec![hint("Enter", "apply"), hint("Esc", "cancel")];
    }

    let mut hints = vec![hint("↑↓", "select"), hint("r", "reload"), hint("n", "new")];
    if E::KIND.supports_edit() {
        hints.push(hint("e", "edit"));
    }
    if E::KIND.supports_delete() {
        hints.push(hint("d", "delete"));
    }
    if E::SECTION == Section::Warehouses {
        hints.push(hint("/", "location"));
    }
    hints
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_only_sections_hide_edit_and_delete() {
        let state = AppState {
            section: Section::Vendors,
            ..AppState::default()
        };
        let keys: Vec<_> = context_hints(&state).iter().map(|hint| hint.key).collect();
        assert!(keys.contains(&"n"));
        assert!(!keys.contains(&"e"));
        assert!(!keys.contains(&"d"));
    }

    #[test]
    fn alert_takes_over_the_hints() {
        let state = AppState {
            alert: Some("Delete failed".to_string()),
            ..AppState::default()
        };
        assert_eq!(context_hints(&state), vec![hint("Enter", "dismiss")]);
    }
}
