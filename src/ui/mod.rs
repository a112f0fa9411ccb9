//! UI module for rendering the TUI

mod components;
mod dashboard;
mod forms;
mod layout;
mod login;

use crate::app::App;
use crate::state::View;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (main_area, status_area) = layout::create_layout(frame.area());

    match app.state.current_view {
        View::Register => forms::draw_registration(frame, main_area, app),
        View::Login => login::draw(frame, main_area),
        View::Dashboard => dashboard::draw(frame, main_area, app),
    }

    layout::draw_status_bar(frame, status_area, app);
}
