//! Field declarations and display masking.
//!
//! [`definition`] models the JSON the backend uses to declare a product's
//! input fields; [`mask`] turns a field's template into the progressive
//! apply / defensive strip / wildcard transformations the UI layer needs.

pub mod definition;
pub mod mask;

pub use definition::{DataRestrictions, FieldDefinition, PaymentProduct, RuleDeclaration};
pub use mask::MaskTemplate;
