//! Public encryption keys and the JOSE engine that seals payloads with them.

use josekit::jwe::{JweHeader, RSA_OAEP_256};

use crate::error::{Result, VaultError};

/// A public key as served by the client API.
///
/// `public_key` is the base64-encoded DER (SPKI) form of an RSA public key;
/// `key_id` travels in the JWE header so the backend can pick the matching
/// private key.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionKey {
    /// Identifier of the key pair, echoed in the JWE `kid` header.
    pub key_id: String,
    /// Base64-encoded DER of the RSA public key.
    pub public_key: String,
}

impl EncryptionKey {
    /// Creates a key from its id and base64-encoded DER.
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for constructor arguments"
    )]
    #[must_use]
    pub fn new(key_id: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            public_key: public_key.into(),
        }
    }
}

/// Seals serialized payload bytes under a public key.
///
/// The production implementation is [`JoseEngine`]; tests substitute
/// capturing engines to observe the plaintext that would be sealed.
pub trait EncryptionEngine: Send + Sync {
    /// Encrypts `payload` under `key`, returning the compact serialization.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidKey`] when the key cannot be loaded and
    /// [`VaultError::EncryptionFailed`] when sealing itself fails.
    fn encrypt(&self, payload: &[u8], key: &EncryptionKey) -> Result<String>;
}

/// JWE compact serialization with `RSA-OAEP-256` key wrapping and `A256GCM`
/// content encryption.
///
/// The content-encryption key and IV are generated fresh inside the JOSE
/// layer on every call, so two encryptions of the same payload never produce
/// the same ciphertext.
#[derive(Debug, Clone, Copy, Default)]
pub struct JoseEngine;

impl EncryptionEngine for JoseEngine {
    fn encrypt(&self, payload: &[u8], key: &EncryptionKey) -> Result<String> {
        let der = base64::Engine::decode(
            &base64::engine::general_purpose::STANDARD,
            key.public_key.trim(),
        )
        .map_err(|e| VaultError::InvalidKey(format!("public key is not valid base64: {e}")))?;

        let encrypter = RSA_OAEP_256
            .encrypter_from_der(&der)
            .map_err(|e| VaultError::InvalidKey(format!("failed to load RSA public key: {e}")))?;

        let mut header = JweHeader::new();
        header.set_algorithm("RSA-OAEP-256");
        header.set_content_encryption("A256GCM");
        header.set_key_id(&key.key_id);

        josekit::jwe::serialize_compact(payload, &header, &encrypter)
            .map_err(|e| VaultError::EncryptionFailed(format!("JWE encryption failed: {e}")))
    }
}
