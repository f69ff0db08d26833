//! Executable validation rules.
//!
//! The rule set is a closed enumeration: every type the wire protocol can
//! declare has a variant here, and dispatch is a plain `match`. Rules are
//! pure predicates over the unmasked value; they carry no state, touch no
//! clock other than the expiration check, and never fail — a value either
//! passes or it does not.

use std::sync::LazyLock;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;

use crate::validation::result::ErrorMessageId;

/// Local-part and domain with at least one domain dot; no leading, trailing,
/// or consecutive dots on either side.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\.]+(\.[^@\.]+)*@([^@\.]+\.)*[^@\.]+\.[^@\.]+$")
        .expect("the email pattern is a valid regex")
});

/// A compiled checkout validation rule.
///
/// Instances come out of [`factory::compile`](crate::validation::factory::compile);
/// the attribute-carrying variants hold their bounds already checked, and the
/// pattern variant holds its regex already compiled and anchored.
#[derive(Debug, Clone)]
pub enum ValidationRule {
    /// Mod-10 checksum over a digit string (card numbers).
    Luhn,
    /// ISO 13616 IBAN check: structure plus mod-97 remainder 1.
    Iban,
    /// `MMYY` or `MMYYYY` card expiry, not in the past, at most 25 years out.
    ExpirationDate,
    /// Plausible `local@domain` email address.
    EmailAddress,
    /// Literal `true`, used for terms-acceptance checkboxes.
    TermsAndConditions,
    /// Character count within inclusive bounds.
    Length {
        /// Minimum accepted length; zero accepts the empty string.
        min_length: usize,
        /// Maximum accepted length.
        max_length: usize,
    },
    /// Numeric value within inclusive bounds.
    Range {
        /// Minimum accepted value.
        min_value: i64,
        /// Maximum accepted value.
        max_value: i64,
    },
    /// Full-string match against a declared pattern.
    RegularExpression(Regex),
    /// Exact, case-sensitive membership in a declared list.
    FixedList {
        /// The accepted values.
        allowed_values: Vec<String>,
    },
}

impl ValidationRule {
    /// Checks a value against this rule.
    ///
    /// The empty string fails every rule except a `Length` whose lower bound
    /// is zero. Orchestration normally filters empties out beforehand (empty
    /// optional fields are simply skipped, empty required fields report
    /// `required`), so this only matters when rules are driven directly.
    #[must_use]
    pub fn validate(&self, value: &str) -> bool {
        if value.is_empty() {
            return matches!(self, Self::Length { min_length: 0, .. });
        }

        match self {
            Self::Luhn => luhn_valid(value),
            Self::Iban => iban_valid(value),
            Self::ExpirationDate => {
                expiration_date_valid(value, Local::now().date_naive())
            }
            Self::EmailAddress => EMAIL_PATTERN.is_match(value),
            Self::TermsAndConditions => value == "true",
            Self::Length { min_length, max_length } => {
                let count = value.chars().count();
                (*min_length..=*max_length).contains(&count)
            }
            Self::Range { min_value, max_value } => value
                .trim()
                .parse::<f64>()
                .is_ok_and(|number| {
                    #[allow(
                        clippy::cast_precision_loss,
                        reason = "declared bounds are well below 2^53"
                    )]
                    let (min, max) = (*min_value as f64, *max_value as f64);
                    min <= number && number <= max
                }),
            Self::RegularExpression(pattern) => pattern.is_match(value),
            Self::FixedList { allowed_values } => {
                allowed_values.iter().any(|allowed| allowed == value)
            }
        }
    }

    /// The message id reported when this rule rejects a value.
    #[must_use]
    pub const fn error_message_id(&self) -> ErrorMessageId {
        match self {
            Self::Luhn => ErrorMessageId::Luhn,
            Self::Iban => ErrorMessageId::Iban,
            Self::ExpirationDate => ErrorMessageId::ExpirationDate,
            Self::EmailAddress => ErrorMessageId::EmailAddress,
            Self::TermsAndConditions => ErrorMessageId::TermsAndConditions,
            Self::Length { .. } => ErrorMessageId::Length,
            Self::Range { .. } => ErrorMessageId::Range,
            Self::RegularExpression(_) => ErrorMessageId::RegularExpression,
            Self::FixedList { .. } => ErrorMessageId::FixedList,
        }
    }
}

/// Standard Luhn mod-10 check. Any non-digit character fails.
fn luhn_valid(value: &str) -> bool {
    let mut sum = 0_u32;
    let mut double = false;

    for c in value.chars().rev() {
        let Some(mut digit) = c.to_digit(10) else {
            return false;
        };
        if double {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
        double = !double;
    }

    sum % 10 == 0
}

/// ISO 13616 IBAN check.
///
/// Embedded whitespace and dashes are stripped and the value uppercased
/// before checking, matching how users paste IBANs. The mod-97 remainder is
/// computed incrementally so arbitrarily long input needs no bignum.
fn iban_valid(value: &str) -> bool {
    let cleaned: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_uppercase();

    if !(15..=34).contains(&cleaned.len()) {
        return false;
    }
    if !cleaned.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return false;
    }

    let bytes = cleaned.as_bytes();
    let structure_ok = bytes[0].is_ascii_alphabetic()
        && bytes[1].is_ascii_alphabetic()
        && bytes[2].is_ascii_digit()
        && bytes[3].is_ascii_digit();
    if !structure_ok {
        return false;
    }

    // Country code and check digits move to the end; A..Z map to 10..35.
    let rearranged = format!("{}{}", &cleaned[4..], &cleaned[..4]);
    let mut remainder = 0_u32;
    for c in rearranged.chars() {
        let Some(digit) = c.to_digit(36) else {
            return false;
        };
        remainder = if digit >= 10 {
            (remainder * 100 + digit) % 97
        } else {
            (remainder * 10 + digit) % 97
        };
    }

    remainder == 1
}

/// Expiry check against a reference date.
///
/// Separator characters are stripped, leaving `MMYY` or `MMYYYY` digits; any
/// other digit count fails. A card is accepted through the end of its expiry
/// month. Two-digit years resolve into the reference date's century, and
/// years more than 25 ahead are rejected as typos.
fn expiration_date_valid(value: &str, today: NaiveDate) -> bool {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    let (month_part, year_part) = match digits.len() {
        4 | 6 => digits.split_at(2),
        _ => return false,
    };

    let Ok(month) = month_part.parse::<u32>() else {
        return false;
    };
    if !(1..=12).contains(&month) {
        return false;
    }

    let Ok(mut year) = year_part.parse::<i32>() else {
        return false;
    };
    if year < 100 {
        year += today.year() - today.year() % 100;
    }
    if year > today.year() + 25 {
        return false;
    }

    year > today.year() || (year == today.year() && month >= today.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 22).expect("valid reference date")
    }

    #[test]
    fn test_luhn_accepts_known_good_numbers() {
        assert!(luhn_valid("79927398713"));
        assert!(luhn_valid("4111111111111111"));
        assert!(luhn_valid("4532015112830366"));
        assert!(luhn_valid("0"));
    }

    #[test]
    fn test_luhn_rejects_checksum_and_shape_errors() {
        assert!(!luhn_valid("79927398712"));
        assert!(!luhn_valid("4111111111111112"));
        assert!(!luhn_valid("4111 1111 1111 1111"));
        assert!(!luhn_valid("411111111111111a"));
    }

    #[test]
    fn test_luhn_via_rule_rejects_empty() {
        assert!(!ValidationRule::Luhn.validate(""));
    }

    #[test]
    fn test_iban_accepts_known_good_accounts() {
        assert!(iban_valid("DE89370400440532013000"));
        assert!(iban_valid("GB82WEST12345698765432"));
        assert!(iban_valid("FR1420041010050500013M02606"));
    }

    #[test]
    fn test_iban_tolerates_spacing_and_case() {
        assert!(iban_valid("DE89 3704 0044 0532 0130 00"));
        assert!(iban_valid("de89370400440532013000"));
        assert!(iban_valid("GB82-WEST-1234-5698-7654-32"));
    }

    #[test]
    fn test_iban_rejects_corruption() {
        assert!(!iban_valid("DE89370400440532013001"));
        assert!(!iban_valid("XX00370400440532013000"));
        assert!(!iban_valid("D189370400440532013000"));
        assert!(!iban_valid("DE8937040044053201300£"));
        assert!(!iban_valid("DE89"));
        assert!(!iban_valid(""));
    }

    #[test]
    fn test_length_bounds_are_inclusive() {
        let rule = ValidationRule::Length { min_length: 2, max_length: 5 };
        assert!(rule.validate("ab"));
        assert!(rule.validate("abcde"));
        assert!(!rule.validate("a"));
        assert!(!rule.validate("abcdef"));
        assert!(!rule.validate(""));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let rule = ValidationRule::Length { min_length: 2, max_length: 2 };
        assert!(rule.validate("éé"));
    }

    #[test]
    fn test_length_with_zero_minimum_accepts_empty() {
        let rule = ValidationRule::Length { min_length: 0, max_length: 5 };
        assert!(rule.validate(""));
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let rule = ValidationRule::Range { min_value: 2, max_value: 5 };
        assert!(rule.validate("2"));
        assert!(rule.validate("5"));
        assert!(rule.validate("3"));
        assert!(!rule.validate("1"));
        assert!(!rule.validate("6"));
    }

    #[test]
    fn test_range_accepts_decimal_notation() {
        let rule = ValidationRule::Range { min_value: 2, max_value: 5 };
        assert!(rule.validate("2.5"));
        assert!(rule.validate(" 4 "));
    }

    #[test]
    fn test_range_rejects_non_numeric_input() {
        let rule = ValidationRule::Range { min_value: 2, max_value: 5 };
        assert!(!rule.validate("abc"));
        assert!(!rule.validate("2x"));
        assert!(!rule.validate(""));
    }

    #[test]
    fn test_regular_expression_requires_full_match() {
        let pattern = Regex::new("^(?:[0-9]{3})$").expect("test pattern compiles");
        let rule = ValidationRule::RegularExpression(pattern);
        assert!(rule.validate("123"));
        assert!(!rule.validate("12"));
        assert!(!rule.validate("1234"));
        assert!(!rule.validate("12a"));
        assert!(!rule.validate(""));
    }

    #[test]
    fn test_fixed_list_is_exact_and_case_sensitive() {
        let rule = ValidationRule::FixedList {
            allowed_values: vec!["VISA".to_owned(), "MASTERCARD".to_owned()],
        };
        assert!(rule.validate("VISA"));
        assert!(!rule.validate("visa"));
        assert!(!rule.validate("AMEX"));
        assert!(!rule.validate(""));
    }

    #[test]
    fn test_terms_and_conditions_accepts_only_literal_true() {
        let rule = ValidationRule::TermsAndConditions;
        assert!(rule.validate("true"));
        assert!(!rule.validate("TRUE"));
        assert!(!rule.validate("false"));
        assert!(!rule.validate("yes"));
        assert!(!rule.validate(""));
    }

    #[test]
    fn test_email_accepts_plausible_addresses() {
        let rule = ValidationRule::EmailAddress;
        assert!(rule.validate("a@b.co"));
        assert!(rule.validate("user.name@example.com"));
        assert!(rule.validate("user@mail.example.com"));
    }

    #[test]
    fn test_email_rejects_dot_and_at_misuse() {
        let rule = ValidationRule::EmailAddress;
        assert!(!rule.validate("a@b"));
        assert!(!rule.validate("a..b@example.com"));
        assert!(!rule.validate(".a@example.com"));
        assert!(!rule.validate("a.@example.com"));
        assert!(!rule.validate("a@.example.com"));
        assert!(!rule.validate("a@example.com."));
        assert!(!rule.validate("a@exa..mple.com"));
        assert!(!rule.validate("a@b@example.com"));
        assert!(!rule.validate("example.com"));
        assert!(!rule.validate(""));
    }

    #[test]
    fn test_expiration_accepts_current_month() {
        assert!(expiration_date_valid("0826", reference_date()));
    }

    #[test]
    fn test_expiration_accepts_future_dates() {
        assert!(expiration_date_valid("0926", reference_date()));
        assert!(expiration_date_valid("1230", reference_date()));
        assert!(expiration_date_valid("122030", reference_date()));
        assert!(expiration_date_valid("0127", reference_date()));
    }

    #[test]
    fn test_expiration_rejects_past_dates() {
        assert!(!expiration_date_valid("0726", reference_date()));
        assert!(!expiration_date_valid("1225", reference_date()));
        assert!(!expiration_date_valid("111999", reference_date()));
    }

    #[test]
    fn test_expiration_rejects_malformed_input() {
        assert!(!expiration_date_valid("12345", reference_date()));
        assert!(!expiration_date_valid("1", reference_date()));
        assert!(!expiration_date_valid("0026", reference_date()));
        assert!(!expiration_date_valid("1326", reference_date()));
        assert!(!expiration_date_valid("abcd", reference_date()));
    }

    #[test]
    fn test_expiration_strips_separators() {
        assert!(expiration_date_valid("12/30", reference_date()));
        assert!(!expiration_date_valid("07/26", reference_date()));
    }

    #[test]
    fn test_expiration_caps_far_future_years() {
        assert!(expiration_date_valid("122051", reference_date()));
        assert!(!expiration_date_valid("122052", reference_date()));
        assert!(!expiration_date_valid("0199", reference_date()));
    }

    #[test]
    fn test_expiration_through_public_rule_uses_today() {
        let today = Local::now().date_naive();
        let current_month = format!("{:02}{:02}", today.month(), today.year() % 100);
        assert!(ValidationRule::ExpirationDate.validate(&current_month));
        assert!(!ValidationRule::ExpirationDate.validate("0119"));
    }

    #[test]
    fn test_error_message_ids_map_one_to_one() {
        assert_eq!(ValidationRule::Luhn.error_message_id(), ErrorMessageId::Luhn);
        assert_eq!(ValidationRule::Iban.error_message_id(), ErrorMessageId::Iban);
        assert_eq!(
            ValidationRule::ExpirationDate.error_message_id(),
            ErrorMessageId::ExpirationDate
        );
        assert_eq!(
            ValidationRule::Length { min_length: 0, max_length: 1 }.error_message_id(),
            ErrorMessageId::Length
        );
        assert_eq!(
            ValidationRule::Range { min_value: 0, max_value: 1 }.error_message_id(),
            ErrorMessageId::Range
        );
    }
}
