//! Validation outcomes as plain data.
//!
//! Failing a rule is a normal, expected outcome of checkout input handling,
//! so failures travel as values rather than errors. Each failure pairs the
//! field id with a stable message id equal to the rule's wire type name,
//! which merchant UIs map to localized copy.

use serde::{Deserialize, Serialize};

/// Stable identifier describing why a value was rejected.
///
/// The serialized form is the rule's wire type name, plus the distinguished
/// `required` id for empty required fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorMessageId {
    /// Mod-10 checksum failed.
    Luhn,
    /// IBAN structure or mod-97 check failed.
    Iban,
    /// Expiration date malformed, in the past, or implausibly far out.
    ExpirationDate,
    /// Declared pattern did not match the full value.
    RegularExpression,
    /// Not a plausible email address.
    EmailAddress,
    /// Terms were not accepted.
    TermsAndConditions,
    /// Value is not one of the allowed entries.
    FixedList,
    /// Character count outside the declared bounds.
    Length,
    /// Numeric value outside the declared bounds.
    Range,
    /// Required field left empty. Suppresses every other failure for the
    /// field.
    Required,
}

impl ErrorMessageId {
    /// The wire name, identical to the serde representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Luhn => "luhn",
            Self::Iban => "iban",
            Self::ExpirationDate => "expirationDate",
            Self::RegularExpression => "regularExpression",
            Self::EmailAddress => "emailAddress",
            Self::TermsAndConditions => "termsAndConditions",
            Self::FixedList => "fixedList",
            Self::Length => "length",
            Self::Range => "range",
            Self::Required => "required",
        }
    }
}

impl std::fmt::Display for ErrorMessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rejected value: which field, and which check rejected it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    /// Id of the field that failed.
    pub field_id: String,
    /// Which check failed.
    pub error_message_id: ErrorMessageId,
}

impl ValidationFailure {
    /// Creates a failure record.
    pub fn new(field_id: impl Into<String>, error_message_id: ErrorMessageId) -> Self {
        Self { field_id: field_id.into(), error_message_id }
    }
}

/// Aggregated outcome of validating one field or a whole request.
///
/// Failures appear in execution order: fields in registration order, rules in
/// declaration order within a field.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationResult {
    failures: Vec<ValidationFailure>,
}

impl ValidationResult {
    /// `true` when nothing failed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// Every failure, in execution order.
    #[must_use]
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    /// Consumes the result, yielding the failure list.
    #[must_use]
    pub fn into_failures(self) -> Vec<ValidationFailure> {
        self.failures
    }

    pub(crate) fn extend(&mut self, failures: Vec<ValidationFailure>) {
        self.failures.extend(failures);
    }
}

impl From<Vec<ValidationFailure>> for ValidationResult {
    fn from(failures: Vec<ValidationFailure>) -> Self {
        Self { failures }
    }
}
