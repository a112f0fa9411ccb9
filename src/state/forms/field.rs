//! Form field value objects

use super::country::CountryCode;

/// Identifies one field of the registration form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldName {
    FullName,
    LastName,
    Email,
    CountryCode,
    MobileNumber,
    Password,
    PasswordConfirmation,
    AcceptTerms,
}

impl FieldName {
    /// Fields in tab order
    pub const ALL: [FieldName; 8] = [
        FieldName::FullName,
        FieldName::LastName,
        FieldName::Email,
        FieldName::CountryCode,
        FieldName::MobileNumber,
        FieldName::Password,
        FieldName::PasswordConfirmation,
        FieldName::AcceptTerms,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::FullName => "Nombre completo",
            Self::LastName => "Apellidos",
            Self::Email => "Email",
            Self::CountryCode => "País",
            Self::MobileNumber => "Número de móvil",
            Self::Password => "Password",
            Self::PasswordConfirmation => "Password confirmation",
            Self::AcceptTerms => "I Accept the Terms",
        }
    }
}

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Country(CountryCode),
    Checkbox(bool),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    fn same_kind(&self, other: &FieldValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// How a field should be decorated after validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    Untouched,
    Valid,
    Invalid,
}

/// A single form field with its value, touched flag and current error
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: FieldName,
    pub label: &'static str,
    pub value: FieldValue,
    /// Render the value masked
    pub is_secret: bool,
    pub touched: bool,
    pub error: Option<String>,
}

impl FormField {
    fn new(name: FieldName, value: FieldValue, is_secret: bool) -> Self {
        Self {
            name,
            label: name.label(),
            value,
            is_secret,
            touched: false,
            error: None,
        }
    }

    /// Create a new text field
    pub fn text(name: FieldName) -> Self {
        Self::new(name, FieldValue::Text(String::new()), false)
    }

    /// Create a new masked text field
    pub fn secret(name: FieldName) -> Self {
        Self::new(name, FieldValue::Text(String::new()), true)
    }

    pub fn country(name: FieldName, code: CountryCode) -> Self {
        Self::new(name, FieldValue::Country(code), false)
    }

    pub fn checkbox(name: FieldName) -> Self {
        Self::new(name, FieldValue::Checkbox(false), false)
    }

    /// Get the text value (empty for non-text fields)
    pub fn as_text(&self) -> &str {
        match &self.value {
            FieldValue::Text(s) => s,
            _ => "",
        }
    }

    /// Get the country value (default country for non-country fields)
    pub fn as_country(&self) -> CountryCode {
        match &self.value {
            FieldValue::Country(c) => *c,
            _ => CountryCode::default(),
        }
    }

    /// Get the checkbox value (false for non-checkbox fields)
    pub fn is_checked(&self) -> bool {
        matches!(self.value, FieldValue::Checkbox(true))
    }

    /// Replace the value. Returns false, leaving the field untouched,
    /// when the new value is of a different kind.
    pub fn set_value(&mut self, value: FieldValue) -> bool {
        if !self.value.same_kind(&value) {
            return false;
        }
        self.value = value;
        true
    }

    /// Value after typing `c`, if the field accepts characters
    pub fn with_char(&self, c: char) -> Option<FieldValue> {
        match &self.value {
            FieldValue::Text(s) => {
                let mut s = s.clone();
                s.push(c);
                Some(FieldValue::Text(s))
            }
            FieldValue::Checkbox(checked) if c == ' ' => Some(FieldValue::Checkbox(!checked)),
            _ => None,
        }
    }

    /// Value after a backspace, if the field holds text
    pub fn with_backspace(&self) -> Option<FieldValue> {
        match &self.value {
            FieldValue::Text(s) => {
                let mut s = s.clone();
                s.pop();
                Some(FieldValue::Text(s))
            }
            _ => None,
        }
    }

    /// Status used for border colouring; untouched fields are never flagged
    pub fn status(&self) -> FieldStatus {
        if !self.touched {
            FieldStatus::Untouched
        } else if self.error.is_some() {
            FieldStatus::Invalid
        } else {
            FieldStatus::Valid
        }
    }

    /// Error to show inline, only once the user has touched the field
    pub fn visible_error(&self) -> Option<&str> {
        if self.touched {
            self.error.as_deref()
        } else {
            None
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(s) if self.is_secret => "•".repeat(s.chars().count()),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Country(c) => format!("◂ {c} ▸"),
            FieldValue::Checkbox(true) => "[x]".to_string(),
            FieldValue::Checkbox(false) => "[ ]".to_string(),
        }
    }
}
