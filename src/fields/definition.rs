//! Wire types for backend-declared payment product fields.
//!
//! A payments backend describes each product as an ordered list of input
//! fields; every field carries data restrictions (required flag plus an
//! ordered set of validator declarations) and, optionally, a display mask.
//! These types deserialize that JSON shape directly. Declaration order of the
//! `validators` object is preserved because rule execution order follows it.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// A payment product: its backend id plus the ordered fields it declares.
///
/// Only the parts of the product document this crate consumes are modeled;
/// unknown keys in the JSON are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentProduct {
    /// Backend product identifier.
    pub id: u32,
    /// Input fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// One declared input field.
///
/// Built either by deserializing the backend JSON or programmatically through
/// the builder methods:
///
/// ```
/// use checkout_vault::{FieldDefinition, RuleDeclaration};
/// use serde_json::json;
///
/// let field = FieldDefinition::new("cvv")
///     .with_mask("{{999}}")
///     .with_required(true)
///     .with_validator(RuleDeclaration::new(
///         "regularExpression",
///         json!({"regularExpression": "^[0-9]{3,4}$"}),
///     ));
///
/// assert_eq!(field.mask(), Some("{{999}}"));
/// assert!(field.data_restrictions.is_required);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Field identifier, also the key used in the encrypted payload.
    pub id: String,
    /// Backend type tag (`numericstring`, `expirydate`, ...). Informational.
    #[serde(rename = "type", default)]
    pub field_type: String,
    /// Required flag and ordered validator declarations.
    #[serde(default)]
    pub data_restrictions: DataRestrictions,
    #[serde(default)]
    mask: Option<String>,
    #[serde(default)]
    display_hints: Option<DisplayHints>,
}

impl FieldDefinition {
    /// Creates an empty definition for the given field id.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_type: String::new(),
            data_restrictions: DataRestrictions::default(),
            mask: None,
            display_hints: None,
        }
    }

    /// Sets the display mask template.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_mask(mut self, mask: impl Into<String>) -> Self {
        self.mask = Some(mask.into());
        self
    }

    /// Marks the field required or optional.
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.data_restrictions.is_required = required;
        self
    }

    /// Appends a validator declaration, keeping declaration order.
    #[must_use]
    pub fn with_validator(mut self, declaration: RuleDeclaration) -> Self {
        self.data_restrictions.validators.push(declaration);
        self
    }

    /// The field's mask template, wherever the document put it.
    ///
    /// Backend documents nest the mask under `displayHints`; programmatic
    /// definitions set it top-level. The top-level value wins when both are
    /// present.
    #[must_use]
    pub fn mask(&self) -> Option<&str> {
        self.mask
            .as_deref()
            .or_else(|| self.display_hints.as_ref().and_then(|hints| hints.mask.as_deref()))
    }
}

/// Restrictions the backend places on a field's value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRestrictions {
    /// Whether an empty value fails validation.
    #[serde(default)]
    pub is_required: bool,
    /// Validator declarations in the order the backend listed them.
    #[serde(default, deserialize_with = "deserialize_validator_map")]
    pub validators: Vec<RuleDeclaration>,
}

/// One validator declaration: its wire type name plus raw attributes.
///
/// Compilation into an executable rule happens in
/// [`validation::factory`](crate::validation::factory).
#[derive(Debug, Clone, Deserialize)]
pub struct RuleDeclaration {
    /// Wire name of the rule (`luhn`, `length`, `expirationDate`, ...).
    #[serde(rename = "type")]
    pub rule_type: String,
    /// Raw attribute object; `null` for parameterless rules.
    #[serde(default)]
    pub attributes: serde_json::Value,
}

impl RuleDeclaration {
    /// Creates a declaration from a type name and attribute object.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn new(rule_type: impl Into<String>, attributes: serde_json::Value) -> Self {
        Self { rule_type: rule_type.into(), attributes }
    }
}

/// The slice of `displayHints` this crate reads. Labels, logos, and tooltips
/// are presentation concerns and stay out of the data model.
#[derive(Debug, Clone, Deserialize)]
struct DisplayHints {
    #[serde(default)]
    mask: Option<String>,
}

/// Deserializes the backend's `validators` object (one entry per rule type)
/// into declarations, preserving document order.
fn deserialize_validator_map<'de, D>(deserializer: D) -> Result<Vec<RuleDeclaration>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ValidatorMapVisitor;

    impl<'de> Visitor<'de> for ValidatorMapVisitor {
        type Value = Vec<RuleDeclaration>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of validator declarations keyed by rule type")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut declarations = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((rule_type, attributes)) =
                map.next_entry::<String, serde_json::Value>()?
            {
                declarations.push(RuleDeclaration { rule_type, attributes });
            }
            Ok(declarations)
        }
    }

    deserializer.deserialize_map(ValidatorMapVisitor)
}
