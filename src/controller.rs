//! Registration form controller
//!
//! Owns the form, the submission lifecycle and the status banner. The remote
//! part of a submission runs in [`run_submission`], a two-stage pipeline
//! (register, then fetch the user by token) whose outcome is handed back
//! through [`FormController::finish`]. Each attempt carries an id so an
//! outcome is only ever applied to the attempt that produced it.

use crate::auth::{AuthClientTrait, AuthError, Session, User};
use crate::session::SessionStore;
use crate::state::{
    FieldName, FieldValue, Form, FormButton, RegistrationForm, RegistrationValues,
    SubmissionOutcome, REGISTRATION_FAILED_MESSAGE,
};
use tracing::{debug, info, warn};

/// Identifies one submission attempt
pub type AttemptId = u64;

#[derive(Debug, Default)]
pub struct FormController {
    form: RegistrationForm,
    outcome: SubmissionOutcome,
    status: Option<String>,
    /// Attempt whose pipeline is still running; survives `reset`
    outstanding: Option<AttemptId>,
    attempts: AttemptId,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    /// Failure banner, if the last attempt failed
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// True while any pipeline is running, including one started from a
    /// form that has since been discarded
    pub fn is_in_flight(&self) -> bool {
        self.outstanding.is_some()
    }

    /// Single gate for both the submit guard and the disabled button
    pub fn can_submit(&self) -> bool {
        !self.is_in_flight() && self.form.is_valid() && self.form.accepted_terms()
    }

    /// Set a field value, mark it touched and revalidate
    pub fn update_field(&mut self, name: FieldName, value: FieldValue) -> bool {
        let accepted = self.form.update_field(name, value);
        if !accepted {
            warn!(field = ?name, "Ignoring value of the wrong kind");
        }
        accepted
    }

    pub fn next_field(&mut self) {
        self.form.next_field();
    }

    pub fn prev_field(&mut self) {
        self.form.prev_field();
    }

    pub fn toggle_button(&mut self) {
        self.form.selected_button = self.form.selected_button.toggle();
    }

    pub fn selected_button(&self) -> FormButton {
        self.form.selected_button
    }

    /// Start a submission. Returns the attempt id and the values to send,
    /// or `None` when the gate is closed (in flight, invalid, or terms not
    /// accepted).
    pub fn begin_submit(&mut self) -> Option<(AttemptId, RegistrationValues)> {
        if !self.can_submit() {
            debug!(
                in_flight = self.is_in_flight(),
                valid = self.form.is_valid(),
                "Submit ignored"
            );
            return None;
        }
        self.attempts += 1;
        self.outstanding = Some(self.attempts);
        self.outcome = SubmissionOutcome::InFlight;
        self.status = None;
        Some((self.attempts, self.form.values()))
    }

    /// Apply the outcome of the pipeline started as `attempt`. Returns false
    /// when the outcome does not belong to the outstanding attempt.
    ///
    /// If the form was reset while the attempt ran, the attempt is released
    /// but its outcome is not shown on the fresh form.
    pub fn finish(&mut self, attempt: AttemptId, outcome: SubmissionOutcome) -> bool {
        if self.outstanding != Some(attempt) {
            debug!(attempt, "Dropping outcome for a submission that is no longer tracked");
            return false;
        }
        if !outcome.is_terminal() {
            warn!(attempt, outcome = ?outcome, "Ignoring a non-terminal outcome");
            return false;
        }
        self.outstanding = None;
        if !self.outcome.is_in_flight() {
            debug!(attempt, "Submission finished after its form was discarded");
            return true;
        }
        if let SubmissionOutcome::Failed(message) = &outcome {
            self.status = Some(message.clone());
        }
        self.outcome = outcome;
        true
    }

    /// Discard all field state. A running attempt stays tracked so no second
    /// one can start before it reports.
    pub fn reset(&mut self) {
        *self = Self {
            outstanding: self.outstanding,
            attempts: self.attempts,
            ..Self::default()
        };
    }
}

/// Register, save the session, fetch the user by token, then commit the user.
/// Any failure clears the session and yields the generic failure message.
pub async fn run_submission(
    auth: &dyn AuthClientTrait,
    store: &dyn SessionStore,
    values: RegistrationValues,
) -> SubmissionOutcome {
    match register_and_fetch(auth, store, &values).await {
        Ok((session, user)) => {
            store.set_current_user(Some(user.clone()));
            info!(user_id = user.id, "Registration complete");
            SubmissionOutcome::Succeeded { session, user }
        }
        Err(e) => {
            warn!(error = %e, "Registration failed");
            store.save(None);
            SubmissionOutcome::Failed(REGISTRATION_FAILED_MESSAGE.to_string())
        }
    }
}

async fn register_and_fetch(
    auth: &dyn AuthClientTrait,
    store: &dyn SessionStore,
    values: &RegistrationValues,
) -> Result<(Session, User), AuthError> {
    let session = auth
        .register(
            &values.email,
            &values.full_name,
            &values.last_name,
            &values.password,
            &values.password_confirmation,
            values.country_code,
            &values.mobile_number,
            values.accept_terms,
            &values.profile_picture,
        )
        .await?;
    // The token lookup depends on the saved session
    store.save(Some(session.clone()));
    let user = auth.get_user_by_token(&session.api_token).await?;
    Ok((session, user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MockAuthClientTrait;
    use crate::session::MockSessionStore;
    use crate::state::CountryCode;
    use mockall::Sequence;

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    fn test_user() -> User {
        User {
            id: 42,
            email: "ana@example.com".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Ruiz".to_string(),
            country_code: Some("+57".to_string()),
            mobile: Some("3001234567".to_string()),
            profile_picture: None,
        }
    }

    fn fill(controller: &mut FormController) {
        controller.update_field(FieldName::FullName, text("Ana"));
        controller.update_field(FieldName::LastName, text("Ruiz"));
        controller.update_field(FieldName::Email, text("ana@example.com"));
        controller.update_field(FieldName::CountryCode, FieldValue::Country(CountryCode::Colombia));
        controller.update_field(FieldName::MobileNumber, text("3001234567"));
        controller.update_field(FieldName::Password, text("Abc12345!"));
        controller.update_field(FieldName::PasswordConfirmation, text("Abc12345!"));
        controller.update_field(FieldName::AcceptTerms, FieldValue::Checkbox(true));
    }

    /// Controller filled with the reference registration
    fn filled_controller() -> FormController {
        let mut controller = FormController::new();
        fill(&mut controller);
        controller
    }

    fn rejected() -> AuthError {
        AuthError::Rejected {
            status: 422,
            message: "Email already taken".to_string(),
        }
    }

    mod gate {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_reference_registration_enables_submit() {
            let controller = filled_controller();
            assert!(controller.form().is_valid());
            assert!(controller.can_submit());
        }

        #[test]
        fn test_fresh_form_cannot_submit() {
            let mut controller = FormController::new();
            assert!(!controller.can_submit());
            assert!(controller.begin_submit().is_none());
            assert_eq!(&controller.outcome, &SubmissionOutcome::Idle);
        }

        #[test]
        fn test_unaccepted_terms_block_submit() {
            let mut controller = filled_controller();
            controller.update_field(FieldName::AcceptTerms, FieldValue::Checkbox(false));
            assert!(!controller.can_submit());
            assert!(controller.begin_submit().is_none());
        }

        #[test]
        fn test_mismatched_confirmation_blocks_submit() {
            let mut controller = filled_controller();
            controller.update_field(FieldName::PasswordConfirmation, text("Abc12345"));
            assert!(!controller.can_submit());
        }

        #[test]
        fn test_any_cleared_field_blocks_submit() {
            for name in [
                FieldName::FullName,
                FieldName::LastName,
                FieldName::Email,
                FieldName::MobileNumber,
                FieldName::Password,
                FieldName::PasswordConfirmation,
            ] {
                let mut controller = filled_controller();
                controller.update_field(name, text(""));
                assert!(!controller.can_submit(), "{name:?}");
            }
        }

        #[test]
        fn test_second_begin_while_in_flight_is_noop() {
            let mut controller = filled_controller();
            assert!(controller.begin_submit().is_some());
            assert!(controller.is_in_flight());
            assert!(!controller.can_submit());
            assert!(controller.begin_submit().is_none());
        }

        #[test]
        fn test_begin_submit_snapshots_values() {
            let mut controller = filled_controller();
            let (_, values) = controller.begin_submit().unwrap();
            assert_eq!(
                values,
                RegistrationValues {
                    full_name: "Ana".to_string(),
                    last_name: "Ruiz".to_string(),
                    email: "ana@example.com".to_string(),
                    country_code: CountryCode::Colombia,
                    mobile_number: "3001234567".to_string(),
                    password: "Abc12345!".to_string(),
                    password_confirmation: "Abc12345!".to_string(),
                    accept_terms: true,
                    profile_picture: String::new(),
                }
            );
        }
    }

    mod lifecycle {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_failed_outcome_sets_banner_and_clears_in_flight() {
            let mut controller = filled_controller();
            let (attempt, _) = controller.begin_submit().unwrap();
            assert!(controller.finish(
                attempt,
                SubmissionOutcome::Failed(REGISTRATION_FAILED_MESSAGE.to_string()),
            ));
            assert!(!controller.is_in_flight());
            assert_eq!(controller.status(), Some(REGISTRATION_FAILED_MESSAGE));
            // The form can be retried by hand
            assert!(controller.can_submit());
        }

        #[test]
        fn test_new_attempt_clears_banner() {
            let mut controller = filled_controller();
            let (attempt, _) = controller.begin_submit().unwrap();
            controller.finish(
                attempt,
                SubmissionOutcome::Failed(REGISTRATION_FAILED_MESSAGE.to_string()),
            );
            let (next, _) = controller.begin_submit().unwrap();
            assert_ne!(next, attempt);
            assert!(controller.status().is_none());
        }

        #[test]
        fn test_finish_without_submission_is_ignored() {
            let mut controller = FormController::new();
            assert!(!controller.finish(1, SubmissionOutcome::Failed("late".to_string())));
            assert_eq!(&controller.outcome, &SubmissionOutcome::Idle);
            assert!(controller.status().is_none());
        }

        #[test]
        fn test_non_terminal_outcome_keeps_attempt_running() {
            let mut controller = filled_controller();
            let (attempt, _) = controller.begin_submit().unwrap();
            assert!(!controller.finish(attempt, SubmissionOutcome::InFlight));
            assert!(controller.is_in_flight());
        }

        #[test]
        fn test_reset_keeps_running_attempt_tracked() {
            let mut controller = filled_controller();
            let (first, _) = controller.begin_submit().unwrap();
            controller.reset();
            fill(&mut controller);

            // The discarded form's pipeline is still running
            assert!(controller.is_in_flight());
            assert!(!controller.can_submit());
            assert!(controller.begin_submit().is_none());

            // Its failure releases the gate without flagging the new form
            assert!(controller.finish(
                first,
                SubmissionOutcome::Failed(REGISTRATION_FAILED_MESSAGE.to_string()),
            ));
            assert!(!controller.is_in_flight());
            assert!(controller.status().is_none());
            assert_eq!(&controller.outcome, &SubmissionOutcome::Idle);
            assert!(controller.can_submit());
        }

        #[test]
        fn test_stale_outcome_does_not_finish_newer_attempt() {
            let mut controller = filled_controller();
            let (first, _) = controller.begin_submit().unwrap();
            controller.finish(
                first,
                SubmissionOutcome::Failed(REGISTRATION_FAILED_MESSAGE.to_string()),
            );
            let (second, _) = controller.begin_submit().unwrap();

            // A duplicate report of the first attempt arrives late
            assert!(!controller.finish(
                first,
                SubmissionOutcome::Failed(REGISTRATION_FAILED_MESSAGE.to_string()),
            ));
            assert!(controller.is_in_flight());
            assert!(controller.status().is_none());
            assert!(!controller.can_submit());

            assert!(controller.finish(
                second,
                SubmissionOutcome::Failed(REGISTRATION_FAILED_MESSAGE.to_string()),
            ));
            assert!(!controller.is_in_flight());
        }

        #[test]
        fn test_reset_discards_fields() {
            let mut controller = filled_controller();
            controller.next_field();
            controller.reset();
            assert_eq!(controller.form().values(), RegistrationValues::default());
            assert_eq!(controller.form().active_field_index, 0);
            assert!(!controller.form().email.touched);
        }

        #[test]
        fn test_toggle_button() {
            let mut controller = FormController::new();
            assert_eq!(controller.selected_button(), FormButton::Submit);
            controller.toggle_button();
            assert_eq!(controller.selected_button(), FormButton::Cancel);
        }
    }

    mod pipeline {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_success_saves_session_then_user() {
            let mut seq = Sequence::new();
            let mut auth = MockAuthClientTrait::new();
            let mut store = MockSessionStore::new();

            auth.expect_register()
                .withf(
                    |email, full_name, last_name, password, confirmation, country, mobile, terms, picture| {
                        email == "ana@example.com"
                            && full_name == "Ana"
                            && last_name == "Ruiz"
                            && password == "Abc12345!"
                            && confirmation == "Abc12345!"
                            && *country == CountryCode::Colombia
                            && mobile == "3001234567"
                            && *terms
                            && picture.is_empty()
                    },
                )
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _, _, _, _, _, _, _, _| Ok(Session::new("tok-123")));
            store
                .expect_save()
                .withf(|session| session.as_ref().is_some_and(|s| s.api_token == "tok-123"))
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());
            auth.expect_get_user_by_token()
                .withf(|token| token == "tok-123")
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(test_user()));
            store
                .expect_set_current_user()
                .withf(|user| user.as_ref().is_some_and(|u| u.id == 42))
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());

            let mut controller = filled_controller();
            let (attempt, values) = controller.begin_submit().unwrap();
            let outcome = run_submission(&auth, &store, values).await;
            assert!(controller.finish(attempt, outcome));

            assert_eq!(
                &controller.outcome,
                &SubmissionOutcome::Succeeded {
                    session: Session::new("tok-123"),
                    user: test_user(),
                }
            );
            assert!(controller.status().is_none());
            assert!(!controller.is_in_flight());
        }

        #[tokio::test]
        async fn test_register_rejection_clears_session() {
            let mut auth = MockAuthClientTrait::new();
            let mut store = MockSessionStore::new();

            auth.expect_register()
                .times(1)
                .returning(|_, _, _, _, _, _, _, _, _| Err(rejected()));
            auth.expect_get_user_by_token().never();
            store
                .expect_save()
                .withf(|session| session.is_none())
                .times(1)
                .return_const(());
            store.expect_set_current_user().never();

            let mut controller = filled_controller();
            let (attempt, values) = controller.begin_submit().unwrap();
            let outcome = run_submission(&auth, &store, values).await;
            assert!(controller.finish(attempt, outcome));

            assert_eq!(controller.status(), Some("The registration details are incorrect"));
            assert!(!controller.is_in_flight());
            assert!(matches!(&controller.outcome, SubmissionOutcome::Failed(_)));
        }

        #[tokio::test]
        async fn test_user_fetch_failure_clears_saved_session() {
            let mut seq = Sequence::new();
            let mut auth = MockAuthClientTrait::new();
            let mut store = MockSessionStore::new();

            auth.expect_register()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _, _, _, _, _, _, _, _| Ok(Session::new("tok-123")));
            store
                .expect_save()
                .withf(|session| session.is_some())
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());
            auth.expect_get_user_by_token()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| {
                    Err(AuthError::MalformedResponse(
                        "missing field `id`".to_string(),
                    ))
                });
            store
                .expect_save()
                .withf(|session| session.is_none())
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());
            store.expect_set_current_user().never();

            let outcome = run_submission(&auth, &store, filled_controller().form().values()).await;
            assert_eq!(
                outcome,
                SubmissionOutcome::Failed(REGISTRATION_FAILED_MESSAGE.to_string())
            );
        }

        #[tokio::test]
        async fn test_submitted_values_are_trimmed() {
            let mut auth = MockAuthClientTrait::new();
            let mut store = MockSessionStore::new();
            auth.expect_register()
                .withf(|email, full_name, _, _, _, _, mobile, _, _| {
                    email == "ana@example.com" && full_name == "Ana" && mobile == "3001234567"
                })
                .times(1)
                .returning(|_, _, _, _, _, _, _, _, _| Err(rejected()));
            store.expect_save().return_const(());

            let mut controller = filled_controller();
            controller.update_field(FieldName::FullName, text("  Ana"));
            controller.update_field(FieldName::Email, text(" ana@example.com "));
            controller.update_field(FieldName::MobileNumber, text(" 3001234567 "));
            assert!(controller.can_submit());

            let (_, values) = controller.begin_submit().unwrap();
            run_submission(&auth, &store, values).await;
        }

        #[tokio::test]
        async fn test_failure_message_hides_cause() {
            for error in [
                rejected(),
                AuthError::MalformedResponse("eof".to_string()),
                AuthError::Rejected {
                    status: 503,
                    message: "maintenance".to_string(),
                },
            ] {
                let mut error = Some(error);
                let mut auth = MockAuthClientTrait::new();
                let mut store = MockSessionStore::new();
                auth.expect_register()
                    .returning(move |_, _, _, _, _, _, _, _, _| Err(error.take().unwrap()));
                store.expect_save().return_const(());

                let outcome =
                    run_submission(&auth, &store, filled_controller().form().values()).await;
                assert_eq!(
                    outcome,
                    SubmissionOutcome::Failed(REGISTRATION_FAILED_MESSAGE.to_string())
                );
            }
        }
    }
}
