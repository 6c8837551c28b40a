//! Company code and name validation
//!
//! Codes are user-supplied primary keys: letters, digits, hyphens and
//! underscores, starting with a letter or digit.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Maximum length for company codes
const MAX_CODE_LEN: usize = 32;

/// Maximum length for company names
const MAX_NAME_LEN: usize = 128;

static CODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("invalid company code regex")
});

/// Validated company code (primary key of `companies`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompanyCode(String);

impl CompanyCode {
    /// Create a new company code, validating its format.
    ///
    /// # Example
    /// ```
    /// use biztime_server::models::CompanyCode;
    ///
    /// assert!(CompanyCode::new("apple").is_ok());
    /// assert!(CompanyCode::new("ibm_2").is_ok());
    /// assert!(CompanyCode::new("big co").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "company code" });
        }

        if s.len() > MAX_CODE_LEN {
            return Err(ValidationError::TooLong {
                field: "company code",
                max: MAX_CODE_LEN,
            });
        }

        if !CODE_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "company code",
                reason: "must be letters, digits, hyphens or underscores, starting with a letter or digit",
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Validate an optional field taken from a request body.
    pub fn required(s: Option<&str>) -> Result<Self, ValidationError> {
        Self::new(s.unwrap_or_default())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CompanyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated company display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyName(String);

impl CompanyName {
    /// Create a company name. Surrounding whitespace is trimmed.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "company name" });
        }

        if s.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "company name",
                max: MAX_NAME_LEN,
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn required(s: Option<&str>) -> Result<Self, ValidationError> {
        Self::new(s.unwrap_or_default())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
