//! Application state and core logic

use crate::auth::{AuthClientTrait, User};
use crate::controller::{run_submission, AttemptId, FormController};
use crate::session::SessionStore;
use crate::state::{AppState, FieldName, FieldValue, FormButton, SubmissionOutcome, View};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

/// Main application struct
pub struct App {
    /// Shell state (view, status line)
    pub state: AppState,
    /// Registration form controller
    pub controller: FormController,
    auth: Arc<dyn AuthClientTrait>,
    store: Arc<dyn SessionStore>,
    /// Outcomes of spawned submissions, tagged with their attempt
    outcome_tx: UnboundedSender<(AttemptId, SubmissionOutcome)>,
    outcome_rx: UnboundedReceiver<(AttemptId, SubmissionOutcome)>,
    /// Whether the app should quit
    quit: bool,
    /// Animation frame counter, advanced by the event loop
    pub tick: usize,
}

impl App {
    /// Create a new App instance
    pub fn new(auth: Arc<dyn AuthClientTrait>, store: Arc<dyn SessionStore>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::default(),
            controller: FormController::new(),
            auth,
            store,
            outcome_tx,
            outcome_rx,
            quit: false,
            tick: 0,
        }
    }

    /// The signed-in user, as held by the session store
    pub fn current_user(&self) -> Option<User> {
        self.store.current_user()
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Handle a key event for the current view
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Clear any status messages on key press
        self.state.status_message = None;

        match self.state.current_view {
            View::Register => self.handle_register_key(key),
            View::Login => self.handle_login_key(key),
            View::Dashboard => self.handle_dashboard_key(key),
        }
        Ok(())
    }

    /// Handle keys in the registration form
    fn handle_register_key(&mut self, key: KeyEvent) {
        let form = self.controller.form();
        let on_buttons = form.is_buttons_row_active();
        let active = form.active_field_name();
        let on_country = active == Some(FieldName::CountryCode);

        match key.code {
            KeyCode::Tab | KeyCode::Down => self.controller.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.controller.prev_field(),
            KeyCode::Esc => self.cancel(),
            // Keyboard shortcut (works from anywhere)
            KeyCode::Char('s')
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    || key.modifiers.contains(crate::platform::SUBMIT_MODIFIER) =>
            {
                self.submit();
            }
            KeyCode::Left | KeyCode::Right if on_buttons => self.controller.toggle_button(),
            KeyCode::Enter if on_buttons => match self.controller.selected_button() {
                FormButton::Submit => {
                    self.submit();
                }
                FormButton::Cancel => self.cancel(),
            },
            KeyCode::Left if on_country => self.cycle_country(false),
            KeyCode::Right if on_country => self.cycle_country(true),
            KeyCode::Enter => self.controller.next_field(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(name) = active {
                    if let Some(value) = self.controller.form().field(name).with_char(c) {
                        self.controller.update_field(name, value);
                    }
                }
            }
            KeyCode::Backspace => {
                if let Some(name) = active {
                    if let Some(value) = self.controller.form().field(name).with_backspace() {
                        self.controller.update_field(name, value);
                    }
                }
            }
            _ => {}
        }
    }

    fn cycle_country(&mut self, forward: bool) {
        let current = self.controller.form().country_code.as_country();
        let next = if forward { current.next() } else { current.prev() };
        self.controller
            .update_field(FieldName::CountryCode, FieldValue::Country(next));
    }

    /// Handle keys on the login placeholder
    fn handle_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') => {
                self.controller.reset();
                self.state.current_view = View::Register;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            _ => {}
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
            self.quit = true;
        }
    }

    /// Start a submission on a background task. Returns false when the
    /// submit gate is closed.
    pub fn submit(&mut self) -> bool {
        let Some((attempt, values)) = self.controller.begin_submit() else {
            return false;
        };
        info!(attempt, "Submitting registration");

        let auth = Arc::clone(&self.auth);
        let store = Arc::clone(&self.store);
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let outcome = run_submission(auth.as_ref(), store.as_ref(), values).await;
            if tx.send((attempt, outcome)).is_err() {
                debug!("App closed before the submission finished");
            }
        });
        true
    }

    /// Leave for the login view, discarding the form. A running submission
    /// keeps going and still blocks a new one until it reports.
    fn cancel(&mut self) {
        self.controller.reset();
        self.state.current_view = View::Login;
    }

    /// Apply outcomes of finished submissions without blocking
    pub fn poll_submissions(&mut self) {
        while let Ok((attempt, outcome)) = self.outcome_rx.try_recv() {
            self.apply_outcome(attempt, outcome);
        }
    }

    fn apply_outcome(&mut self, attempt: AttemptId, outcome: SubmissionOutcome) {
        let succeeded = match &outcome {
            SubmissionOutcome::Succeeded { session, user } => {
                debug!(?session, "Session established");
                Some(user.display_name())
            }
            _ => None,
        };
        if !self.controller.finish(attempt, outcome) {
            return;
        }
        // The session and user are already stored; hand over to the shell
        // even if the form was cancelled meanwhile
        if let Some(name) = succeeded {
            self.state.status_message = Some(format!("Bienvenido, {name}"));
            self.state.current_view = View::Dashboard;
            self.controller.reset();
        }
    }

    /// Wait for the next submission outcome and apply it
    #[cfg(test)]
    async fn wait_for_submission(&mut self) {
        if let Some((attempt, outcome)) = self.outcome_rx.recv().await {
            self.apply_outcome(attempt, outcome);
        }
    }
}
