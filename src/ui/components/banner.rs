//! Inline alert banner

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Banner height in rows
pub const BANNER_HEIGHT: u16 = 3;

/// Render a red alert banner across `area`
pub fn render_error_banner(frame: &mut Frame, area: Rect, message: &str) {
    let paragraph = Paragraph::new(message)
        .style(
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )
        .wrap(Wrap { trim: true });
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    frame.render_widget(paragraph.block(block), area);
}
