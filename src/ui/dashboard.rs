//! Signed-in view

use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn row<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<10}"), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
    ])
}

/// Draw the current user's details
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Dashboard ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let Some(user) = app.current_user() else {
        let paragraph = Paragraph::new("No user signed in.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("Bienvenido, {}", user.display_name()),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        row("Email", user.email.clone()),
    ];
    if let Some(mobile) = &user.mobile {
        let code = user.country_code.as_deref().unwrap_or("");
        lines.push(row("Mobile", format!("{code} {mobile}").trim().to_string()));
    }
    lines.push(row("User ID", user.id.to_string()));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
