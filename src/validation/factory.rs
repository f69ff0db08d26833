//! Compiles wire validator declarations into executable rules.
//!
//! The mapping from declaration to rule is total and closed: every type name
//! the protocol knows gets exactly one [`ValidationRule`] variant, and a type
//! name this build does not know yields *no* rule with a warning rather than
//! an error, so newer backend deployments degrade gracefully on older
//! clients. Malformed attributes on a known type are a configuration defect
//! and fail immediately.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{Result, VaultError};
use crate::fields::RuleDeclaration;
use crate::validation::rules::ValidationRule;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LengthAttributes {
    min_length: usize,
    max_length: usize,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RangeAttributes {
    min_value: i64,
    max_value: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PatternAttributes {
    regular_expression: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FixedListAttributes {
    allowed_values: Vec<String>,
}

/// Compiles one declaration.
///
/// Returns `Ok(None)` for an unrecognized rule type (after logging a
/// warning); the caller keeps the field's remaining rules.
///
/// # Errors
///
/// Returns [`VaultError::RuleDeclaration`] when a known type carries
/// malformed attributes: missing or mistyped values, a pattern that does not
/// compile, or inverted bounds.
pub fn compile(declaration: &RuleDeclaration) -> Result<Option<ValidationRule>> {
    let rule = match declaration.rule_type.as_str() {
        "luhn" => ValidationRule::Luhn,
        "iban" => ValidationRule::Iban,
        "expirationDate" => ValidationRule::ExpirationDate,
        "emailAddress" => ValidationRule::EmailAddress,
        "termsAndConditions" => ValidationRule::TermsAndConditions,
        "length" => {
            let attributes: LengthAttributes = parse_attributes(declaration)?;
            if attributes.min_length > attributes.max_length {
                return Err(declaration_error(declaration, "minLength exceeds maxLength"));
            }
            ValidationRule::Length {
                min_length: attributes.min_length,
                max_length: attributes.max_length,
            }
        }
        "range" => {
            let attributes: RangeAttributes = parse_attributes(declaration)?;
            if attributes.min_value > attributes.max_value {
                return Err(declaration_error(declaration, "minValue exceeds maxValue"));
            }
            ValidationRule::Range {
                min_value: attributes.min_value,
                max_value: attributes.max_value,
            }
        }
        "regularExpression" => {
            let attributes: PatternAttributes = parse_attributes(declaration)?;
            let anchored = format!("^(?:{})$", attributes.regular_expression);
            let pattern = regex::Regex::new(&anchored)
                .map_err(|e| declaration_error(declaration, &e.to_string()))?;
            ValidationRule::RegularExpression(pattern)
        }
        "fixedList" => {
            let attributes: FixedListAttributes = parse_attributes(declaration)?;
            ValidationRule::FixedList { allowed_values: attributes.allowed_values }
        }
        unknown => {
            warn!(rule_type = unknown, "ignoring unrecognized validation rule type");
            return Ok(None);
        }
    };

    Ok(Some(rule))
}

/// Compiles a declaration list, dropping unknown types and keeping order.
///
/// # Errors
///
/// Propagates the first [`VaultError::RuleDeclaration`] encountered.
pub fn compile_all(declarations: &[RuleDeclaration]) -> Result<Vec<ValidationRule>> {
    let mut rules = Vec::with_capacity(declarations.len());
    for declaration in declarations {
        if let Some(rule) = compile(declaration)? {
            rules.push(rule);
        }
    }
    Ok(rules)
}

fn parse_attributes<T: DeserializeOwned>(declaration: &RuleDeclaration) -> Result<T> {
    serde_json::from_value(declaration.attributes.clone())
        .map_err(|e| declaration_error(declaration, &e.to_string()))
}

fn declaration_error(declaration: &RuleDeclaration, reason: &str) -> VaultError {
    VaultError::RuleDeclaration {
        rule_type: declaration.rule_type.clone(),
        reason: reason.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::result::ErrorMessageId;

    #[test]
    fn test_compiles_parameterless_rules() {
        for rule_type in ["luhn", "iban", "expirationDate", "emailAddress", "termsAndConditions"]
        {
            let declaration = RuleDeclaration::new(rule_type, json!({}));
            let rule = compile(&declaration)
                .expect("declaration compiles")
                .expect("known type yields a rule");
            assert_eq!(rule.error_message_id().as_str(), rule_type);
        }
    }

    #[test]
    fn test_compiles_length_with_bounds() {
        let declaration =
            RuleDeclaration::new("length", json!({"minLength": 2, "maxLength": 5}));
        let rule = compile(&declaration)
            .expect("declaration compiles")
            .expect("length yields a rule");

        assert!(rule.validate("abc"));
        assert!(!rule.validate("a"));
    }

    #[test]
    fn test_compiles_anchored_pattern() {
        let declaration = RuleDeclaration::new(
            "regularExpression",
            json!({"regularExpression": "[0-9]{3}"}),
        );
        let rule = compile(&declaration)
            .expect("declaration compiles")
            .expect("pattern yields a rule");

        assert!(rule.validate("123"));
        assert!(!rule.validate("1234"));
    }

    #[test]
    fn test_compiles_fixed_list() {
        let declaration =
            RuleDeclaration::new("fixedList", json!({"allowedValues": ["0", "1", "2"]}));
        let rule = compile(&declaration)
            .expect("declaration compiles")
            .expect("fixed list yields a rule");

        assert!(rule.validate("1"));
        assert!(!rule.validate("3"));
    }

    #[test]
    fn test_unknown_type_yields_no_rule() {
        let declaration = RuleDeclaration::new("boletoBancarioRequiredness", json!({}));
        let compiled = compile(&declaration).expect("unknown type is not an error");
        assert!(compiled.is_none());
    }

    #[test]
    fn test_missing_attributes_fail_fast() {
        let declaration = RuleDeclaration::new("length", json!({"minLength": 2}));
        let err = compile(&declaration).expect_err("missing maxLength must fail");
        assert!(matches!(
            err,
            VaultError::RuleDeclaration { ref rule_type, .. } if rule_type == "length"
        ));
    }

    #[test]
    fn test_inverted_bounds_fail_fast() {
        let declaration =
            RuleDeclaration::new("length", json!({"minLength": 9, "maxLength": 2}));
        assert!(compile(&declaration).is_err());

        let declaration =
            RuleDeclaration::new("range", json!({"minValue": 10, "maxValue": 1}));
        assert!(compile(&declaration).is_err());
    }

    #[test]
    fn test_bad_pattern_fails_fast() {
        let declaration = RuleDeclaration::new(
            "regularExpression",
            json!({"regularExpression": "([0-9]{3}"}),
        );
        assert!(compile(&declaration).is_err());
    }

    #[test]
    fn test_compile_all_keeps_declared_order_and_drops_unknown() {
        let declarations = vec![
            RuleDeclaration::new("luhn", json!({})),
            RuleDeclaration::new("someFutureRule", json!({"weight": 3})),
            RuleDeclaration::new("length", json!({"minLength": 12, "maxLength": 19})),
        ];
        let rules = compile_all(&declarations).expect("list compiles");

        let ids: Vec<ErrorMessageId> =
            rules.iter().map(ValidationRule::error_message_id).collect();
        assert_eq!(ids, [ErrorMessageId::Luhn, ErrorMessageId::Length]);
    }
}
