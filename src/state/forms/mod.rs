//! Form domain layer
//!
//! Type-safe field state, the registration form and its validation schema.

mod country;
mod field;
mod registration_form;
mod validation;

pub use country::CountryCode;
pub use field::{FieldName, FieldStatus, FieldValue, FormField};
pub use registration_form::{Form, FormButton, RegistrationForm, RegistrationValues};
