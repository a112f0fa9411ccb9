//! Registration validation schema
//!
//! A pure function from the form values to per-field messages. Each field
//! reports only its first failing rule.

use super::country::CountryCode;
use super::field::FieldName;
use super::registration_form::RegistrationValues;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

const NAME_MIN: usize = 3;
const TEXT_MAX: usize = 50;
const PASSWORD_MIN: usize = 8;

// Compiled once; validation runs on every keystroke
static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());
static COLOMBIA_MOBILE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(CountryCode::Colombia.mobile_pattern()).ok());
static USA_MOBILE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(CountryCode::Usa.mobile_pattern()).ok());
static UK_MOBILE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(CountryCode::Uk.mobile_pattern()).ok());

fn mobile_regex(country: CountryCode) -> Option<&'static Regex> {
    let re = match country {
        CountryCode::Colombia => &COLOMBIA_MOBILE_RE,
        CountryCode::Usa => &USA_MOBILE_RE,
        CountryCode::Uk => &UK_MOBILE_RE,
    };
    (**re).as_ref()
}

/// Per-field messages plus the aggregate verdict
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: BTreeMap<FieldName, String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: FieldName) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    #[cfg(test)]
    pub fn errors(&self) -> &BTreeMap<FieldName, String> {
        &self.errors
    }
}

/// Validate every field of the form
pub fn validate(values: &RegistrationValues) -> ValidationResult {
    let checks = [
        (
            FieldName::FullName,
            check_name(&values.full_name, "First name is required"),
        ),
        (
            FieldName::LastName,
            check_name(&values.last_name, "Last name is required"),
        ),
        (FieldName::Email, check_email(&values.email)),
        (FieldName::MobileNumber, check_mobile(values)),
        (FieldName::Password, check_password(&values.password)),
        (
            FieldName::PasswordConfirmation,
            check_confirmation(&values.password, &values.password_confirmation),
        ),
        (FieldName::AcceptTerms, check_terms(values.accept_terms)),
    ];

    let errors = checks
        .into_iter()
        .filter_map(|(field, result)| result.err().map(|msg| (field, msg)))
        .collect();

    ValidationResult { errors }
}

fn check_length(value: &str) -> Result<(), String> {
    let len = value.chars().count();
    if len < NAME_MIN {
        return Err(format!("Minimum {NAME_MIN} symbols"));
    }
    if len > TEXT_MAX {
        return Err(format!("Maximum {TEXT_MAX} symbols"));
    }
    Ok(())
}

fn check_name(value: &str, required: &str) -> Result<(), String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(required.to_string());
    }
    check_length(value)
}

pub fn valid_email(email: &str) -> bool {
    (*EMAIL_RE).as_ref().is_some_and(|re| re.is_match(email))
}

fn check_email(value: &str) -> Result<(), String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("Email is required".to_string());
    }
    if !valid_email(value) {
        return Err("Wrong email format".to_string());
    }
    check_length(value)
}

fn check_mobile(values: &RegistrationValues) -> Result<(), String> {
    let mobile = values.mobile_number.trim();
    if mobile.is_empty() {
        return Err("Mobile number is required".to_string());
    }
    let country = values.country_code;
    let matches = mobile_regex(country).is_some_and(|re| re.is_match(mobile));
    if !matches {
        return Err(format!(
            "Invalid mobile number for {} ({})",
            country.label(),
            country.code()
        ));
    }
    Ok(())
}

fn check_password(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("Password is required".to_string());
    }
    let len = value.chars().count();
    if len < PASSWORD_MIN {
        return Err(format!("Minimum {PASSWORD_MIN} symbols"));
    }
    if len > TEXT_MAX {
        return Err(format!("Maximum {TEXT_MAX} symbols"));
    }
    let has_letter = value.chars().any(char::is_alphabetic);
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    let has_symbol = value
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());
    if !(has_letter && has_digit && has_symbol) {
        return Err("Use a mix of letters, numbers & symbols".to_string());
    }
    Ok(())
}

fn check_confirmation(password: &str, confirmation: &str) -> Result<(), String> {
    if confirmation.is_empty() {
        return Err("Password confirmation is required".to_string());
    }
    if confirmation != password {
        return Err("Password and Confirm Password didn't match".to_string());
    }
    Ok(())
}

fn check_terms(accepted: bool) -> Result<(), String> {
    if accepted {
        Ok(())
    } else {
        Err("You must accept the terms and conditions".to_string())
    }
}
