//! The payment request: registered fields plus the values typed into them.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;
use zeroize::Zeroize;

use crate::error::{Result, VaultError};
use crate::fields::{FieldDefinition, MaskTemplate, PaymentProduct};
use crate::validation::{FieldValidator, ValidationResult};

/// One registered field: its compiled validator and optional display mask.
#[derive(Debug, Clone)]
struct Field {
    validator: FieldValidator,
    mask: Option<MaskTemplate>,
}

/// Everything collected for one payment attempt.
///
/// Fields register in declaration order, and that order is observable
/// everywhere downstream: validation failures, payload key order. Values are
/// stored in their *display* (masked) form; the unmasked form is derived on
/// demand and never kept at rest. Stored values are wiped on drop.
///
/// # Examples
///
/// ```
/// use checkout_vault::{FieldDefinition, PaymentRequest, RuleDeclaration};
/// use serde_json::json;
///
/// # fn main() -> checkout_vault::Result<()> {
/// let mut request = PaymentRequest::new(1);
/// request.register_field(
///     FieldDefinition::new("cardNumber")
///         .with_mask("{{9999}} {{9999}} {{9999}} {{9999}}")
///         .with_required(true)
///         .with_validator(RuleDeclaration::new("luhn", json!({}))),
/// )?;
///
/// request.set_value("cardNumber", "4111 1111 1111 1111")?;
/// assert_eq!(request.unmasked_value("cardNumber")?, "4111111111111111");
/// assert!(request.validate().is_valid());
/// # Ok(())
/// # }
/// ```
pub struct PaymentRequest {
    payment_product_id: u32,
    fields: Vec<Field>,
    values: HashMap<String, String>,
    tokenize: bool,
    account_on_file_id: Option<String>,
}

impl PaymentRequest {
    /// Creates an empty request for a payment product.
    #[must_use]
    pub fn new(payment_product_id: u32) -> Self {
        Self {
            payment_product_id,
            fields: Vec::new(),
            values: HashMap::new(),
            tokenize: false,
            account_on_file_id: None,
        }
    }

    /// Creates a request with every field of a product already registered.
    ///
    /// # Errors
    ///
    /// Propagates the first registration failure (bad mask template, bad
    /// validator declaration, duplicate field id).
    pub fn for_product(product: PaymentProduct) -> Result<Self> {
        let mut request = Self::new(product.id);
        for definition in product.fields {
            request.register_field(definition)?;
        }
        Ok(request)
    }

    /// Registers a field, compiling its mask and rules.
    ///
    /// Configuration problems surface here, before any user input exists.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::MaskTemplate`] or [`VaultError::RuleDeclaration`]
    /// for malformed definitions and [`VaultError::DuplicateField`] when the
    /// id is already registered.
    pub fn register_field(&mut self, definition: FieldDefinition) -> Result<()> {
        if self.field(&definition.id).is_some() {
            return Err(VaultError::DuplicateField(definition.id));
        }

        let mask = match definition.mask() {
            Some(template) => Some(MaskTemplate::parse(template)?),
            None => None,
        };
        let validator = FieldValidator::from_definition(&definition)?;

        debug!(field_id = %definition.id, rules = validator.rules().len(), "registered field");
        self.fields.push(Field { validator, mask });
        Ok(())
    }

    /// Backend id of the product this request is for.
    #[must_use]
    pub const fn payment_product_id(&self) -> u32 {
        self.payment_product_id
    }

    /// Registered field ids, in registration order.
    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.validator.field_id())
    }

    /// Stores a field's display value (the string produced by the UI mask).
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::UnknownField`] for an unregistered id.
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for setter methods"
    )]
    pub fn set_value(&mut self, field_id: &str, value: impl Into<String>) -> Result<()> {
        if self.field(field_id).is_none() {
            return Err(VaultError::UnknownField(field_id.to_owned()));
        }
        if let Some(mut previous) = self.values.insert(field_id.to_owned(), value.into()) {
            previous.zeroize();
        }
        Ok(())
    }

    /// The stored display value, if any.
    #[must_use]
    pub fn value(&self, field_id: &str) -> Option<&str> {
        self.values.get(field_id).map(String::as_str)
    }

    /// Derives the unmasked (raw) value for a field.
    ///
    /// Recomputed on every call from the stored display string; an unset
    /// field yields the empty string. Callers holding the result are
    /// responsible for its lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::UnknownField`] for an unregistered id.
    pub fn unmasked_value(&self, field_id: &str) -> Result<String> {
        let field = self
            .field(field_id)
            .ok_or_else(|| VaultError::UnknownField(field_id.to_owned()))?;
        Ok(self.unmasked_for(field))
    }

    /// The display value re-normalized through the field's mask
    /// (strip, then apply), so a value stored raw still renders grouped.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::UnknownField`] for an unregistered id.
    pub fn masked_value(&self, field_id: &str) -> Result<String> {
        let field = self
            .field(field_id)
            .ok_or_else(|| VaultError::UnknownField(field_id.to_owned()))?;
        let stored = self.stored(field);
        Ok(match &field.mask {
            Some(template) => {
                let mut raw = template.strip(stored);
                let masked = template.apply(&raw);
                raw.zeroize();
                masked
            }
            None => stored.to_owned(),
        })
    }

    /// Formats raw input through the field's mask; identity when the field
    /// has none.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::UnknownField`] for an unregistered id.
    pub fn apply_mask(&self, field_id: &str, raw: &str) -> Result<String> {
        let field = self
            .field(field_id)
            .ok_or_else(|| VaultError::UnknownField(field_id.to_owned()))?;
        Ok(field.mask.as_ref().map_or_else(|| raw.to_owned(), |template| template.apply(raw)))
    }

    /// The field's parsed mask template, if it declares one.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::UnknownField`] for an unregistered id.
    pub fn mask_template(&self, field_id: &str) -> Result<Option<&MaskTemplate>> {
        let field = self
            .field(field_id)
            .ok_or_else(|| VaultError::UnknownField(field_id.to_owned()))?;
        Ok(field.mask.as_ref())
    }

    /// Whether the encrypted payload asks the backend to store the payment
    /// details for reuse. Defaults to `false`.
    #[must_use]
    pub const fn tokenize(&self) -> bool {
        self.tokenize
    }

    /// Sets the tokenize flag.
    pub fn set_tokenize(&mut self, tokenize: bool) {
        self.tokenize = tokenize;
    }

    /// The stored account-on-file id, when paying with saved details.
    #[must_use]
    pub fn account_on_file_id(&self) -> Option<&str> {
        self.account_on_file_id.as_deref()
    }

    /// Selects a stored account-on-file for this payment.
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for setter methods"
    )]
    pub fn set_account_on_file_id(&mut self, id: impl Into<String>) {
        self.account_on_file_id = Some(id.into());
    }

    /// Validates every registered field, in registration order.
    ///
    /// All failures are collected; nothing short-circuits and nothing is
    /// mutated, so this is safe to call on every keystroke.
    #[must_use]
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();
        for field in &self.fields {
            let mut unmasked = self.unmasked_for(field);
            result.extend(field.validator.validate(&unmasked));
            unmasked.zeroize();
        }
        result
    }

    /// Validates a single field.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::UnknownField`] for an unregistered id.
    pub fn validate_field(&self, field_id: &str) -> Result<ValidationResult> {
        let field = self
            .field(field_id)
            .ok_or_else(|| VaultError::UnknownField(field_id.to_owned()))?;
        let mut unmasked = self.unmasked_for(field);
        let failures = field.validator.validate(&unmasked);
        unmasked.zeroize();
        Ok(failures.into())
    }

    /// Shorthand for `validate().is_valid()`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_valid()
    }

    fn field(&self, field_id: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.validator.field_id() == field_id)
    }

    fn stored<'a>(&'a self, field: &Field) -> &'a str {
        self.values.get(field.validator.field_id()).map_or("", String::as_str)
    }

    fn unmasked_for(&self, field: &Field) -> String {
        let stored = self.stored(field);
        match &field.mask {
            Some(template) => template.strip(stored),
            None => stored.to_owned(),
        }
    }
}

impl fmt::Debug for PaymentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentRequest")
            .field("payment_product_id", &self.payment_product_id)
            .field("fields", &self.field_ids().collect::<Vec<_>>())
            .field("values", &"<redacted>")
            .field("tokenize", &self.tokenize)
            .field("account_on_file_id", &self.account_on_file_id)
            .finish()
    }
}

impl Drop for PaymentRequest {
    fn drop(&mut self) {
        for value in self.values.values_mut() {
            value.zeroize();
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::fields::RuleDeclaration;
    use crate::validation::ErrorMessageId;

    fn card_request() -> PaymentRequest {
        let product: PaymentProduct = serde_json::from_str(
            r#"{
                "id": 1,
                "fields": [
                    {
                        "id": "cardNumber",
                        "displayHints": {"mask": "{{9999}} {{9999}} {{9999}} {{9999}}"},
                        "dataRestrictions": {
                            "isRequired": true,
                            "validators": {
                                "luhn": {},
                                "length": {"minLength": 12, "maxLength": 19}
                            }
                        }
                    },
                    {
                        "id": "expiryDate",
                        "displayHints": {"mask": "{{99}}/{{99}}"},
                        "dataRestrictions": {
                            "isRequired": true,
                            "validators": {"expirationDate": {}}
                        }
                    },
                    {
                        "id": "companyName",
                        "dataRestrictions": {
                            "isRequired": false,
                            "validators": {"length": {"minLength": 2, "maxLength": 40}}
                        }
                    }
                ]
            }"#,
        )
        .expect("product JSON deserializes");
        PaymentRequest::for_product(product).expect("product registers")
    }

    #[test]
    fn test_registration_keeps_declaration_order() {
        let request = card_request();
        let ids: Vec<&str> = request.field_ids().collect();
        assert_eq!(ids, ["cardNumber", "expiryDate", "companyName"]);
        assert_eq!(request.payment_product_id(), 1);
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut request = card_request();
        let err = request
            .register_field(FieldDefinition::new("cardNumber"))
            .expect_err("duplicate id must fail");
        assert!(matches!(err, VaultError::DuplicateField(id) if id == "cardNumber"));
    }

    #[test]
    fn test_bad_mask_template_fails_registration() {
        let mut request = PaymentRequest::new(1);
        let err = request
            .register_field(FieldDefinition::new("broken").with_mask("{{99"))
            .expect_err("bad template must fail");
        assert!(matches!(err, VaultError::MaskTemplate(_)));
    }

    #[test]
    fn test_set_value_requires_registration() {
        let mut request = card_request();
        let err = request.set_value("cvv", "123").expect_err("unknown field must fail");
        assert!(matches!(err, VaultError::UnknownField(id) if id == "cvv"));
    }

    #[test]
    fn test_unmasked_value_strips_display_formatting() {
        let mut request = card_request();
        request.set_value("cardNumber", "4111 1111 1111 1111").expect("field exists");
        assert_eq!(
            request.unmasked_value("cardNumber").expect("field exists"),
            "4111111111111111"
        );
    }

    #[test]
    fn test_unset_field_is_empty() {
        let request = card_request();
        assert_eq!(request.unmasked_value("cardNumber").expect("field exists"), "");
        assert_eq!(request.value("cardNumber"), None);
    }

    #[test]
    fn test_masked_value_normalizes_raw_input() {
        let mut request = card_request();
        request.set_value("cardNumber", "4111111111111111").expect("field exists");
        assert_eq!(
            request.masked_value("cardNumber").expect("field exists"),
            "4111 1111 1111 1111"
        );
    }

    #[test]
    fn test_apply_mask_is_identity_without_template() {
        let request = card_request();
        assert_eq!(
            request.apply_mask("companyName", "ACME Corp").expect("field exists"),
            "ACME Corp"
        );
        assert_eq!(
            request.apply_mask("expiryDate", "1230").expect("field exists"),
            "12/30"
        );
    }

    #[test]
    fn test_mask_template_accessor() {
        let request = card_request();
        let template =
            request.mask_template("cardNumber").expect("field exists").expect("mask declared");
        assert_eq!(template.wildcard(), "**** **** **** ****");
        assert!(request.mask_template("companyName").expect("field exists").is_none());
    }

    #[test]
    fn test_validate_aggregates_in_registration_order() {
        let mut request = card_request();
        request.set_value("cardNumber", "4111 1111 1111 1112").expect("field exists");
        // expiryDate left empty, companyName optional and empty.

        let result = request.validate();
        let ids: Vec<(&str, ErrorMessageId)> = result
            .failures()
            .iter()
            .map(|failure| (failure.field_id.as_str(), failure.error_message_id))
            .collect();
        assert_eq!(
            ids,
            [
                ("cardNumber", ErrorMessageId::Luhn),
                ("expiryDate", ErrorMessageId::Required),
            ]
        );
    }

    #[test]
    fn test_validate_field_scopes_to_one_field() {
        let mut request = card_request();
        request.set_value("cardNumber", "4111 1111 1111 1112").expect("field exists");

        let result = request.validate_field("cardNumber").expect("field exists");
        assert_eq!(result.failures().len(), 1);
        assert!(request.validate_field("missing").is_err());
    }

    #[test]
    fn test_validate_is_side_effect_free() {
        let mut request = card_request();
        request.set_value("cardNumber", "4111 1111 1111 1111").expect("field exists");

        let first = request.validate();
        let second = request.validate();
        assert_eq!(first.failures(), second.failures());
        assert_eq!(request.value("cardNumber"), Some("4111 1111 1111 1111"));
    }

    #[test]
    fn test_tokenize_and_account_on_file_round_trip() {
        let mut request = card_request();
        assert!(!request.tokenize());
        assert_eq!(request.account_on_file_id(), None);

        request.set_tokenize(true);
        request.set_account_on_file_id("aof-42");
        assert!(request.tokenize());
        assert_eq!(request.account_on_file_id(), Some("aof-42"));
    }

    #[test]
    fn test_debug_output_redacts_values() {
        let mut request = card_request();
        request.set_value("cardNumber", "4111 1111 1111 1111").expect("field exists");
        let rendered = format!("{request:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("4111"));
    }
}
