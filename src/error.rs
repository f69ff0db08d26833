//! Error types for checkout field handling and payload encryption.
//!
//! All fallible operations in this crate return [`Result`], which wraps
//! [`VaultError`]. Validation outcomes are deliberately *not* errors: a value
//! failing its declared rules is reported as data through
//! [`ValidationResult`](crate::validation::ValidationResult), while
//! [`VaultError`] is reserved for misconfiguration, misuse, and encryption
//! failures.
//!
//! Error messages never carry field values or key material.

use thiserror::Error;

use crate::validation::ValidationFailure;

/// Errors produced while configuring fields, assembling payloads, or
/// encrypting checkout data.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum VaultError {
    /// A mask template could not be parsed.
    ///
    /// Raised while registering a field whose template contains unbalanced
    /// `{{`/`}}` delimiters. This is a configuration defect in the field
    /// definition and fails registration immediately.
    #[error("invalid mask template: {0}")]
    MaskTemplate(String),

    /// A validator declaration of a known type carried malformed attributes.
    ///
    /// Missing or mistyped attributes, an uncompilable pattern, or inverted
    /// bounds all land here. Unknown validator *types* are not an error; they
    /// degrade to "no rule" with a warning.
    #[error("invalid `{rule_type}` validator declaration: {reason}")]
    RuleDeclaration {
        /// Wire name of the offending validator type.
        rule_type: String,
        /// Human-readable cause, safe to log.
        reason: String,
    },

    /// A field id was used that no registered field carries.
    #[error("no field registered with id `{0}`")]
    UnknownField(String),

    /// A field id was registered twice on the same request.
    #[error("field `{0}` is already registered")]
    DuplicateField(String),

    /// Session details failed their sanity checks.
    #[error("invalid session details: {0}")]
    InvalidSession(String),

    /// The payment request did not pass validation, so no payload was
    /// assembled and nothing was encrypted.
    ///
    /// Carries every accumulated [`ValidationFailure`] in field-registration
    /// order. Surface these to the user, fix the input, and retry.
    #[error("payment request failed validation with {} failure(s)", .0.len())]
    RequestInvalid(Vec<ValidationFailure>),

    /// The public key source could not produce a key.
    ///
    /// # Recovery
    ///
    /// Usually transient: the embedding application's key fetch failed.
    /// Retry the fetch or refresh the session.
    #[error("public key unavailable: {0}")]
    KeyUnavailable(String),

    /// Key material was delivered but could not be decoded or loaded.
    ///
    /// The base64 body was malformed or the decoded DER is not an RSA public
    /// key. Not retryable with the same key.
    #[error("malformed encryption key: {0}")]
    InvalidKey(String),

    /// The JOSE engine failed to produce a compact serialization.
    ///
    /// The message is opaque by design; it never echoes the payload or the
    /// key.
    #[error("JOSE encryption failed: {0}")]
    EncryptionFailed(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VaultError>;
