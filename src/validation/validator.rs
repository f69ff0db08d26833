//! Per-field rule execution.

use crate::error::Result;
use crate::fields::FieldDefinition;
use crate::validation::factory;
use crate::validation::result::{ErrorMessageId, ValidationFailure};
use crate::validation::rules::ValidationRule;

/// Runs one field's compiled rules against unmasked values.
///
/// Execution semantics:
///
/// - an empty value on a required field reports exactly one `required`
///   failure and nothing else;
/// - an empty value on an optional field is valid;
/// - a non-empty value runs *every* rule in declaration order and reports a
///   failure for each rule that rejects — there is no short-circuit, so a UI
///   can show the user everything wrong with an input at once.
///
/// Validation is read-only; a validator can be run any number of times.
#[derive(Debug, Clone)]
pub struct FieldValidator {
    field_id: String,
    required: bool,
    rules: Vec<ValidationRule>,
}

impl FieldValidator {
    /// Compiles a validator from a backend field definition.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::RuleDeclaration`](crate::VaultError::RuleDeclaration)
    /// when a declaration of a known type carries malformed attributes.
    pub fn from_definition(definition: &FieldDefinition) -> Result<Self> {
        let rules = factory::compile_all(&definition.data_restrictions.validators)?;
        Ok(Self {
            field_id: definition.id.clone(),
            required: definition.data_restrictions.is_required,
            rules,
        })
    }

    /// The field this validator belongs to.
    #[must_use]
    pub fn field_id(&self) -> &str {
        &self.field_id
    }

    /// Whether an empty value fails with `required`.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// The compiled rules, in execution order.
    #[must_use]
    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    /// Validates an unmasked value, returning every failure in rule order.
    #[must_use]
    pub fn validate(&self, unmasked: &str) -> Vec<ValidationFailure> {
        if unmasked.is_empty() {
            if self.required {
                return vec![ValidationFailure::new(
                    self.field_id.clone(),
                    ErrorMessageId::Required,
                )];
            }
            return Vec::new();
        }

        self.rules
            .iter()
            .filter(|rule| !rule.validate(unmasked))
            .map(|rule| ValidationFailure::new(self.field_id.clone(), rule.error_message_id()))
            .collect()
    }
}
