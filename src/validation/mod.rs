//! Declarative validation of checkout input.
//!
//! The backend declares *what* to check ([`RuleDeclaration`](crate::fields::RuleDeclaration)
//! entries on each field); [`factory`] compiles those declarations into the
//! closed [`ValidationRule`] set; [`FieldValidator`] executes them. Outcomes
//! are data ([`ValidationResult`]), never errors, and never logged with the
//! value that failed.

pub mod factory;
pub mod result;
pub mod rules;
pub mod validator;

pub use result::{ErrorMessageId, ValidationFailure, ValidationResult};
pub use rules::ValidationRule;
pub use validator::FieldValidator;
