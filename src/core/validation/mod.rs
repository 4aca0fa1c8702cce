//! Input validation for the order wizard
//!
//! Validation happens at the point of input. The store itself never rejects
//! a title or a customer; callers run these checks first and simply do not
//! proceed when they fail.

pub mod extractor;
pub mod validators;

pub use extractor::ValidatedJson;
pub use validators::{
    ImagePayload, email_address, is_valid_email, not_blank, validate_customer, validate_title,
};
