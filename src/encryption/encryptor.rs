//! The encryptor: validate, assemble, fetch the key, seal.

use std::fmt;
use std::future::Future;

use tracing::{debug, info, instrument};
use zeroize::Zeroize;

use crate::device::DeviceInformationSource;
use crate::encryption::key::{EncryptionEngine, EncryptionKey, JoseEngine};
use crate::encryption::payload::EncryptionPayload;
use crate::error::Result;
use crate::request::PaymentRequest;
use crate::session::SessionDetails;

/// Produces the public key a payload is sealed under.
///
/// Implementations typically fetch `GET /crypto/publickey` from the client
/// API; anything async and fallible fits (a cache, a test stub, a remote
/// call).
pub trait PublicKeySource: Send + Sync {
    /// Resolves the current public encryption key.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::KeyUnavailable`](crate::VaultError::KeyUnavailable)
    /// when no key can be produced.
    fn public_key<'a>(&'a self) -> impl Future<Output = Result<EncryptionKey>> + Send + 'a;
}

/// A key source that always yields the same pre-fetched key.
#[derive(Debug, Clone)]
pub struct StaticKeySource {
    key: EncryptionKey,
}

impl StaticKeySource {
    /// Wraps an already-obtained key.
    #[must_use]
    pub const fn new(key: EncryptionKey) -> Self {
        Self { key }
    }
}

impl PublicKeySource for StaticKeySource {
    fn public_key<'a>(&'a self) -> impl Future<Output = Result<EncryptionKey>> + Send + 'a {
        async move { Ok(self.key.clone()) }
    }
}

/// Turns a validated [`PaymentRequest`] into an encrypted blob for the
/// server API.
///
/// The pipeline is fixed: validate and assemble first, then fetch the key,
/// then seal. A request that fails validation is rejected before any network
/// traffic happens.
///
/// # Examples
///
/// ```
/// use checkout_vault::{
///     DeviceInformation, EncryptionKey, Encryptor, StaticDeviceInformationSource,
///     StaticKeySource,
/// };
///
/// let encryptor = Encryptor::new(
///     "b4e4350f5c474fa18d551cbcbdd96c63",
///     StaticKeySource::new(EncryptionKey::new("key-1", "…base64 DER…")),
///     StaticDeviceInformationSource::new(DeviceInformation::new("en-GB", 0)),
/// );
/// # let _ = encryptor;
/// ```
pub struct Encryptor<K, D, E = JoseEngine> {
    client_session_id: String,
    key_source: K,
    device_source: D,
    engine: E,
}

impl<K, D> Encryptor<K, D>
where
    K: PublicKeySource,
    D: DeviceInformationSource,
{
    /// Creates an encryptor bound to a client session, using the JOSE engine.
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for constructor arguments"
    )]
    #[must_use]
    pub fn new(client_session_id: impl Into<String>, key_source: K, device_source: D) -> Self {
        Self {
            client_session_id: client_session_id.into(),
            key_source,
            device_source,
            engine: JoseEngine,
        }
    }

    /// Creates an encryptor from validated session details.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidSession`](crate::VaultError::InvalidSession)
    /// when the session details are unusable.
    pub fn for_session(session: &SessionDetails, key_source: K, device_source: D) -> Result<Self> {
        session.validate()?;
        Ok(Self::new(session.client_session_id.clone(), key_source, device_source))
    }
}

impl<K, D, E> Encryptor<K, D, E>
where
    K: PublicKeySource,
    D: DeviceInformationSource,
    E: EncryptionEngine,
{
    /// Replaces the sealing engine, keeping session, key and device sources.
    #[must_use]
    pub fn with_engine<E2: EncryptionEngine>(self, engine: E2) -> Encryptor<K, D, E2> {
        Encryptor {
            client_session_id: self.client_session_id,
            key_source: self.key_source,
            device_source: self.device_source,
            engine,
        }
    }

    /// Encrypts a payment request into the compact JWE the server API accepts.
    ///
    /// The serialized plaintext is wiped from memory as soon as sealing
    /// finishes, whether or not it succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::RequestInvalid`](crate::VaultError::RequestInvalid)
    /// before any key fetch when validation fails, and propagates key-source
    /// and engine errors otherwise.
    #[instrument(
        skip(self, request),
        fields(payment_product_id = request.payment_product_id())
    )]
    pub async fn encrypt(&self, request: &PaymentRequest) -> Result<String> {
        let payload = EncryptionPayload::assemble(
            &self.client_session_id,
            request,
            self.device_source.collect(),
        )?;

        let key = self.key_source.public_key().await?;
        debug!(key_id = %key.key_id, "fetched public encryption key");

        let mut json = payload.to_json()?;
        let sealed = self.engine.encrypt(json.as_bytes(), &key);
        json.zeroize();
        let sealed = sealed?;

        info!(
            payment_values = payload.payment_values().len(),
            "sealed payment request payload"
        );
        Ok(sealed)
    }
}

impl<K, D, E> fmt::Debug for Encryptor<K, D, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encryptor")
            .field("client_session_id", &self.client_session_id)
            .finish_non_exhaustive()
    }
}
