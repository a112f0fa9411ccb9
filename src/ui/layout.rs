//! Layout components (content area, status bar)

use crate::app::App;
use crate::platform::SUBMIT_SHORTCUT;
use crate::state::View;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into the content area and a one-line status bar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1])
}

fn key_help(view: View) -> Vec<(&'static str, &'static str)> {
    match view {
        View::Register => vec![
            ("Tab", "next"),
            ("←/→", "country"),
            ("Space", "terms"),
            (SUBMIT_SHORTCUT, "submit"),
            ("Esc", "cancel"),
        ],
        View::Login => vec![("r", "register"), ("q", "quit")],
        View::Dashboard => vec![("q", "quit")],
    }
}

/// Draw the status bar: pending message, otherwise key help
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let line = if let Some(message) = &app.state.status_message {
        Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(Color::Green),
        ))
    } else {
        let mut spans = vec![Span::styled(
            format!(" {} ", app.state.current_view.title()),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        )];
        for (key, action) in key_help(app.state.current_view) {
            spans.push(Span::styled(
                format!(" {key}"),
                Style::default().fg(Color::Cyan),
            ));
            spans.push(Span::styled(
                format!(" {action}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        Line::from(spans)
    };

    frame.render_widget(Paragraph::new(line), area);
}
