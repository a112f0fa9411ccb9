//! Field rendering utilities for forms

use crate::state::{FieldStatus, FieldValue, FormField};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Field height in rows (top border + value + bottom border)
pub const FIELD_HEIGHT: u16 = 3;

fn border_color(status: FieldStatus, is_active: bool) -> Color {
    match status {
        FieldStatus::Invalid => Color::Red,
        FieldStatus::Valid => Color::Green,
        FieldStatus::Untouched if is_active => Color::Cyan,
        FieldStatus::Untouched => Color::DarkGray,
    }
}

/// Draw a form field. Its error, once touched, is shown on the bottom border.
pub fn draw_field(frame: &mut Frame, area: Rect, field: &FormField, is_active: bool) {
    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };

    let mut border_style = Style::default().fg(border_color(field.status(), is_active));
    if is_active {
        border_style = border_style.add_modifier(Modifier::BOLD);
    }

    let display_value = field.display_value();
    let display_str = match &field.value {
        FieldValue::Checkbox(_) => format!("{display_value} {}", field.label),
        _ if display_value.is_empty() && !is_active => "(empty)".to_string(),
        _ => display_value,
    };

    // Only text fields take typed input
    let cursor = if is_active && matches!(field.value, FieldValue::Text(_)) {
        "▌"
    } else {
        ""
    };

    let content = Paragraph::new(Line::from(vec![
        Span::styled(display_str, style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]));

    let mut block = Block::default()
        .title(format!(" {} ", field.label))
        .borders(Borders::ALL)
        .border_style(border_style);

    if let Some(error) = field.visible_error() {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {error} "),
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(content.block(block), area);
}
