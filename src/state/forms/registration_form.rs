//! Registration form state

use super::country::CountryCode;
use super::field::{FieldName, FieldValue, FormField};
use super::validation::{validate, ValidationResult};

/// Index of the Submit/Cancel buttons row in tab order
pub const BUTTONS_ROW: usize = FieldName::ALL.len();

/// Buttons on the actions row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormButton {
    #[default]
    Submit,
    Cancel,
}

impl FormButton {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Submit => Self::Cancel,
            Self::Cancel => Self::Submit,
        }
    }
}

/// Trait for common form navigation
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField>;
}

/// Plain snapshot of the form values, in the shape the validator and
/// the auth client consume
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationValues {
    pub full_name: String,
    pub last_name: String,
    pub email: String,
    pub country_code: CountryCode,
    pub mobile_number: String,
    pub password: String,
    pub password_confirmation: String,
    pub accept_terms: bool,
    pub profile_picture: String,
}

#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub full_name: FormField,
    pub last_name: FormField,
    pub email: FormField,
    pub country_code: FormField,
    pub mobile_number: FormField,
    pub password: FormField,
    pub password_confirmation: FormField,
    pub accept_terms: FormField,
    /// Not editable from the form; always forwarded to the API
    pub profile_picture: String,
    pub active_field_index: usize,
    pub selected_button: FormButton,
    validation: ValidationResult,
}

impl RegistrationForm {
    pub fn new() -> Self {
        let mut form = Self {
            full_name: FormField::text(FieldName::FullName),
            last_name: FormField::text(FieldName::LastName),
            email: FormField::text(FieldName::Email),
            country_code: FormField::country(FieldName::CountryCode, CountryCode::default()),
            mobile_number: FormField::text(FieldName::MobileNumber),
            password: FormField::secret(FieldName::Password),
            password_confirmation: FormField::secret(FieldName::PasswordConfirmation),
            accept_terms: FormField::checkbox(FieldName::AcceptTerms),
            profile_picture: String::new(),
            active_field_index: 0,
            selected_button: FormButton::default(),
            validation: ValidationResult::default(),
        };
        form.revalidate();
        form
    }

    pub fn field(&self, name: FieldName) -> &FormField {
        match name {
            FieldName::FullName => &self.full_name,
            FieldName::LastName => &self.last_name,
            FieldName::Email => &self.email,
            FieldName::CountryCode => &self.country_code,
            FieldName::MobileNumber => &self.mobile_number,
            FieldName::Password => &self.password,
            FieldName::PasswordConfirmation => &self.password_confirmation,
            FieldName::AcceptTerms => &self.accept_terms,
        }
    }

    fn field_mut(&mut self, name: FieldName) -> &mut FormField {
        match name {
            FieldName::FullName => &mut self.full_name,
            FieldName::LastName => &mut self.last_name,
            FieldName::Email => &mut self.email,
            FieldName::CountryCode => &mut self.country_code,
            FieldName::MobileNumber => &mut self.mobile_number,
            FieldName::Password => &mut self.password,
            FieldName::PasswordConfirmation => &mut self.password_confirmation,
            FieldName::AcceptTerms => &mut self.accept_terms,
        }
    }

    /// Set a field, mark it touched and revalidate the whole form so
    /// cross-field rules (password confirmation) stay current.
    /// Returns false when the value kind does not fit the field.
    pub fn update_field(&mut self, name: FieldName, value: FieldValue) -> bool {
        let field = self.field_mut(name);
        if !field.set_value(value) {
            return false;
        }
        field.touched = true;
        self.revalidate();
        true
    }

    fn revalidate(&mut self) {
        self.validation = validate(&self.values());
        for name in FieldName::ALL {
            let error = self.validation.error(name).map(str::to_string);
            self.field_mut(name).error = error;
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validation.is_valid()
    }

    pub fn accepted_terms(&self) -> bool {
        self.accept_terms.is_checked()
    }

    /// Snapshot of what gets validated and sent. Names, email and mobile
    /// are trimmed; passwords are taken verbatim.
    pub fn values(&self) -> RegistrationValues {
        RegistrationValues {
            full_name: self.full_name.as_text().trim().to_string(),
            last_name: self.last_name.as_text().trim().to_string(),
            email: self.email.as_text().trim().to_string(),
            country_code: self.country_code.as_country(),
            mobile_number: self.mobile_number.as_text().trim().to_string(),
            password: self.password.as_text().to_string(),
            password_confirmation: self.password_confirmation.as_text().to_string(),
            accept_terms: self.accept_terms.is_checked(),
            profile_picture: self.profile_picture.clone(),
        }
    }

    /// Returns true if the buttons row is currently active
    pub fn is_buttons_row_active(&self) -> bool {
        self.active_field_index == BUTTONS_ROW
    }

    /// Name of the focused field, `None` on the buttons row
    pub fn active_field_name(&self) -> Option<FieldName> {
        FieldName::ALL.get(self.active_field_index).copied()
    }
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for RegistrationForm {
    fn field_count(&self) -> usize {
        BUTTONS_ROW + 1 // fields + buttons
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(BUTTONS_ROW);
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        FieldName::ALL.get(index).map(|name| self.field(*name))
    }
}
