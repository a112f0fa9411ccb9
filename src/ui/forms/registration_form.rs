//! Registration form rendering

use super::field_renderer::{draw_field, FIELD_HEIGHT};
use crate::app::App;
use crate::state::{Form, FormButton, RegistrationForm};
use crate::ui::components::{render_button, render_error_banner, BANNER_HEIGHT, BUTTON_HEIGHT};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const SPINNER: [&str; 4] = ["⠋", "⠙", "⠹", "⠸"];

/// Tab-order indices of the fields in the left column
const LEFT_COLUMN: std::ops::Range<usize> = 0..5;
const PASSWORD_INDEX: usize = 5;

pub const PASSWORD_HINT: &str =
    "Use 8 or more characters with a mix of letters, numbers & symbols.";

/// Draw the registration form
pub fn draw_registration(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Registro ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let status = app.controller.status();
    let banner_height = if status.is_some() { BANNER_HEIGHT } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),             // Heading
            Constraint::Length(banner_height), // Failure banner
            Constraint::Min(0),                // Fields
        ])
        .horizontal_margin(1)
        .split(inner);

    draw_heading(frame, chunks[0]);
    if let Some(message) = status {
        render_error_banner(frame, chunks[1], message);
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .spacing(1)
        .split(chunks[2]);

    draw_identity_column(frame, columns[0], app);
    draw_credentials_column(frame, columns[1], app);
}

fn draw_heading(frame: &mut Frame, area: Rect) {
    let heading = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("NU ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                "Pay",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Rgb(0x0b, 0xee, 0xa6))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" FINANCE"),
        ]),
        Line::from(Span::styled(
            "Gracias por elegirnos",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(heading, area);
}

/// Draw the field at tab index `index`, if any
fn draw_field_at(frame: &mut Frame, area: Rect, form: &RegistrationForm, index: usize) {
    if let Some(field) = form.get_field(index) {
        let is_active = form.active_field_name() == Some(field.name);
        draw_field(frame, area, field, is_active);
    }
}

/// Name, email and phone fields
fn draw_identity_column(frame: &mut Frame, area: Rect, app: &App) {
    let form = app.controller.form();

    let mut constraints: Vec<Constraint> = LEFT_COLUMN
        .map(|_| Constraint::Length(FIELD_HEIGHT))
        .collect();
    constraints.push(Constraint::Min(0));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (row, index) in rows.iter().zip(LEFT_COLUMN) {
        draw_field_at(frame, *row, form, index);
    }
}

/// Passwords, terms and the action buttons
fn draw_credentials_column(frame: &mut Frame, area: Rect, app: &App) {
    let form = app.controller.form();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FIELD_HEIGHT),  // Password
            Constraint::Length(2),             // Hint
            Constraint::Length(FIELD_HEIGHT),  // Confirmation
            Constraint::Length(FIELD_HEIGHT),  // Terms
            Constraint::Length(BUTTON_HEIGHT), // Buttons
            Constraint::Min(0),
        ])
        .split(area);

    draw_field_at(frame, rows[0], form, PASSWORD_INDEX);

    let hint = Paragraph::new(Span::styled(
        PASSWORD_HINT,
        Style::default().fg(Color::DarkGray),
    ))
    .wrap(ratatui::widgets::Wrap { trim: true });
    frame.render_widget(hint, rows[1]);

    draw_field_at(frame, rows[2], form, PASSWORD_INDEX + 1);
    draw_field_at(frame, rows[3], form, PASSWORD_INDEX + 2);

    draw_buttons(frame, rows[4], app);
}

fn draw_buttons(frame: &mut Frame, area: Rect, app: &App) {
    let controller = &app.controller;
    let on_buttons = controller.form().is_buttons_row_active();
    let selected = controller.selected_button();

    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let submit_label = if controller.is_in_flight() {
        format!("Por favor espere... {}", SPINNER[app.tick % SPINNER.len()])
    } else {
        "Enviar".to_string()
    };

    render_button(
        frame,
        buttons[0],
        &submit_label,
        on_buttons && selected == FormButton::Submit,
        controller.can_submit(),
        Color::Green,
    );
    render_button(
        frame,
        buttons[1],
        "Cancel",
        on_buttons && selected == FormButton::Cancel,
        true,
        Color::Gray,
    );
}
