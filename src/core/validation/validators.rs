//! Reusable field validators
//!
//! The `not_blank` and `email_address` functions plug into
//! `#[validate(custom(function = ...))]`; the rest are called directly.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::OnceLock;
use validator::Validate;

use crate::core::error::{ValidationError, WizardError};
use crate::core::order::Customer;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Prefix every uploaded image payload must carry
pub const IMAGE_PAYLOAD_PREFIX: &str = "data:image/";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"))
}

pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value)
}

/// Validator: value has at least one non-whitespace character
pub fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("required")
            .with_message(Cow::Borrowed("must not be empty")));
    }
    Ok(())
}

/// Validator: value looks like `local@domain.tld`
pub fn email_address(value: &str) -> Result<(), validator::ValidationError> {
    if !is_valid_email(value) {
        return Err(validator::ValidationError::new("email")
            .with_message(Cow::Borrowed("must be a valid email address")));
    }
    Ok(())
}

/// Trim an order title, rejecting empty ones
pub fn validate_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::field("title", "must not be empty"));
    }
    Ok(trimmed.to_string())
}

pub fn validate_customer(customer: &Customer) -> Result<(), WizardError> {
    customer.validate()?;
    Ok(())
}

/// An image encoded as a data URL
///
/// Only the MIME prefix is checked; the content is stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImagePayload(String);

impl ImagePayload {
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if !value.starts_with(IMAGE_PAYLOAD_PREFIX) {
            return Err(ValidationError::field(
                "payload",
                format!("must start with '{}'", IMAGE_PAYLOAD_PREFIX),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ImagePayload {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ImagePayload> for String {
    fn from(payload: ImagePayload) -> Self {
        payload.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("coach@team.org"));
        assert!(!is_valid_email("coach@team"));
        assert!(!is_valid_email("coach team@x.org"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_title_is_trimmed() {
        assert_eq!(validate_title("  Team A ").unwrap(), "Team A");
        assert!(validate_title("   ").is_err());
    }

    #[test]
    fn test_customer_validation_reports_fields() {
        let err = validate_customer(&Customer::new(" ", "nope")).unwrap_err();
        match err {
            WizardError::Validation(v) => assert_eq!(v.fields(), vec!["email", "full_name"]),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(validate_customer(&Customer::new("Jo Coach", "jo@club.com")).is_ok());
    }

    #[test]
    fn test_image_payload_prefix() {
        assert!(ImagePayload::parse("data:image/png;base64,AAAA").is_ok());
        assert!(ImagePayload::parse("data:text/plain;base64,AAAA").is_err());

        let parsed: Result<ImagePayload, _> = serde_json::from_str("\"https://x/y.png\"");
        assert!(parsed.is_err());
    }
}
