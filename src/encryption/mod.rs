//! Payload assembly and JWE sealing.
//!
//! The flow is deliberately one-way: a [`PaymentRequest`](crate::PaymentRequest)
//! is validated and flattened into an [`EncryptionPayload`], the payload is
//! serialized once, sealed by an [`EncryptionEngine`] under a key from a
//! [`PublicKeySource`], and the plaintext is wiped. Nothing in this module
//! can decrypt what it produced; only the backend holds the private key.

pub mod encryptor;
pub mod key;
pub mod payload;

pub use encryptor::{Encryptor, PublicKeySource, StaticKeySource};
pub use key::{EncryptionEngine, EncryptionKey, JoseEngine};
pub use payload::{EncryptionPayload, PaymentValue};
