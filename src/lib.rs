//! Checkout Vault
//!
//! Client-side primitives for taking card-style payment input, validating it
//! against server-delivered product definitions, and sealing it into a JWE
//! blob that only the payment backend can open.
//!
//! # Overview
//!
//! A checkout flows through three stages, each owned by one part of this
//! crate:
//!
//! - **Collect** — [`PaymentRequest`] registers the fields of a
//!   [`PaymentProduct`] and stores what the customer types, in display
//!   (masked) form. [`MaskTemplate`] converts between display and raw values.
//! - **Validate** — every field carries declarative rules
//!   ([`ValidationRule`]) compiled from the product definition; validation
//!   collects all failures instead of stopping at the first.
//! - **Seal** — [`Encryptor`] assembles the unmasked values into an
//!   [`EncryptionPayload`] and encrypts it under the backend's RSA public
//!   key (`RSA-OAEP-256` + `A256GCM`, compact JWE serialization).
//!
//! Raw card data never leaves the process unencrypted: unmasked values are
//! derived on demand, and intermediate buffers are wiped after sealing.
//!
//! # Examples
//!
//! ```no_run
//! use checkout_vault::{
//!     DeviceInformation, EncryptionKey, Encryptor, FieldDefinition, PaymentRequest,
//!     RuleDeclaration, StaticDeviceInformationSource, StaticKeySource,
//! };
//! use serde_json::json;
//!
//! # async fn example() -> checkout_vault::Result<()> {
//! // Field definitions normally arrive inside a payment product fetched
//! // from the client API; built by hand here for brevity.
//! let mut request = PaymentRequest::new(1);
//! request.register_field(
//!     FieldDefinition::new("cardNumber")
//!         .with_mask("{{9999}} {{9999}} {{9999}} {{9999}}")
//!         .with_required(true)
//!         .with_validator(RuleDeclaration::new("luhn", json!({}))),
//! )?;
//! request.set_value("cardNumber", "4111 1111 1111 1111")?;
//!
//! let encryptor = Encryptor::new(
//!     "b4e4350f5c474fa18d551cbcbdd96c63",
//!     StaticKeySource::new(EncryptionKey::new("key-1", "<base64 DER public key>")),
//!     StaticDeviceInformationSource::new(DeviceInformation::new("en-GB", 0)),
//! );
//!
//! let sealed = encryptor.encrypt(&request).await?;
//! // Hand `sealed` to the merchant backend as the encrypted customer input.
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from josekit"
)]

pub mod device;
pub mod encryption;
pub mod error;
pub mod fields;
pub mod request;
pub mod session;
pub mod validation;

pub use device::{
    BrowserData, DeviceInformation, DeviceInformationSource, StaticDeviceInformationSource,
};
pub use encryption::{
    EncryptionEngine, EncryptionKey, EncryptionPayload, Encryptor, JoseEngine, PaymentValue,
    PublicKeySource, StaticKeySource,
};
pub use error::{Result, VaultError};
pub use fields::{DataRestrictions, FieldDefinition, MaskTemplate, PaymentProduct, RuleDeclaration};
pub use request::PaymentRequest;
pub use session::SessionDetails;
pub use validation::{
    ErrorMessageId, FieldValidator, ValidationFailure, ValidationResult, ValidationRule,
};
