//! Country dialling codes offered by the mobile number selector

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported country codes for the mobile number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CountryCode {
    #[default]
    #[serde(rename = "+57")]
    Colombia,
    #[serde(rename = "+1")]
    Usa,
    #[serde(rename = "+44")]
    Uk,
}

impl CountryCode {
    /// Selector order
    pub const ALL: [CountryCode; 3] = [CountryCode::Colombia, CountryCode::Usa, CountryCode::Uk];

    /// Dialling prefix as sent to the API
    pub fn code(&self) -> &'static str {
        match self {
            Self::Colombia => "+57",
            Self::Usa => "+1",
            Self::Uk => "+44",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Colombia => "Colombia",
            Self::Usa => "USA",
            Self::Uk => "UK",
        }
    }

    /// Pattern a national mobile number must match for this country
    pub fn mobile_pattern(&self) -> &'static str {
        match self {
            // Colombian mobiles are 10 digits starting with 3
            Self::Colombia => r"^3\d{9}$",
            // NANP: area code and exchange cannot start with 0 or 1
            Self::Usa => r"^[2-9]\d{2}[2-9]\d{6}$",
            // UK mobiles without the trunk 0
            Self::Uk => r"^7\d{9}$",
        }
    }

    fn position(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.position() + len - 1) % len]
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.label())
    }
}
