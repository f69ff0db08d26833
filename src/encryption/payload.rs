//! Assembly of the plaintext payload that gets sealed into a JWE.

use std::fmt;

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::device::DeviceInformation;
use crate::error::{Result, VaultError};
use crate::request::PaymentRequest;

// Reserved by the wire contract as payload metadata; a field registered
// under this id is never serialized as a payment value.
const RESERVED_LENGTH_ID: &str = "length";

/// One `key`/`value` pair inside the payload, always unmasked.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct PaymentValue {
    /// The field id the value was collected under.
    pub key: String,
    /// The unmasked value.
    pub value: String,
}

impl fmt::Debug for PaymentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentValue")
            .field("key", &self.key)
            .field("value", &"<redacted>")
            .finish()
    }
}

/// The plaintext structure sealed by the [`Encryptor`](crate::Encryptor).
///
/// Assembly is the last gate before encryption: it re-validates the request
/// and refuses to build a payload from invalid input. Every payload gets a
/// fresh nonce, so two payloads for the same request are never identical.
/// Payment values are wiped on drop.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionPayload {
    client_session_id: String,
    nonce: String,
    payment_product_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    account_on_file_id: Option<String>,
    tokenize: bool,
    payment_values: Vec<PaymentValue>,
    collected_device_information: DeviceInformation,
}

impl EncryptionPayload {
    /// Builds the payload for a validated request.
    ///
    /// Payment values carry the *unmasked* form of every non-empty field, in
    /// registration order. Empty fields and the reserved `length` id are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::RequestInvalid`] carrying every validation
    /// failure when the request does not validate.
    pub fn assemble(
        client_session_id: &str,
        request: &PaymentRequest,
        device_information: DeviceInformation,
    ) -> Result<Self> {
        let result = request.validate();
        if !result.is_valid() {
            warn!(
                payment_product_id = request.payment_product_id(),
                failures = result.failures().len(),
                "refusing to assemble payload for invalid request"
            );
            return Err(VaultError::RequestInvalid(result.into_failures()));
        }

        let mut payment_values = Vec::new();
        for field_id in request.field_ids() {
            if field_id == RESERVED_LENGTH_ID {
                continue;
            }
            let unmasked = request.unmasked_value(field_id)?;
            if unmasked.is_empty() {
                continue;
            }
            payment_values.push(PaymentValue {
                key: field_id.to_owned(),
                value: unmasked,
            });
        }

        Ok(Self {
            client_session_id: client_session_id.to_owned(),
            nonce: fresh_nonce(),
            payment_product_id: request.payment_product_id(),
            account_on_file_id: request.account_on_file_id().map(str::to_owned),
            tokenize: request.tokenize(),
            payment_values,
            collected_device_information: device_information,
        })
    }

    /// The single-use nonce minted for this payload.
    #[must_use]
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// The assembled payment values, in registration order.
    #[must_use]
    pub fn payment_values(&self) -> &[PaymentValue] {
        &self.payment_values
    }

    /// Serializes the payload to the JSON the backend decrypts.
    pub(crate) fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| VaultError::EncryptionFailed(format!("payload serialization failed: {e}")))
    }
}

impl fmt::Debug for EncryptionPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionPayload")
            .field("client_session_id", &self.client_session_id)
            .field("nonce", &self.nonce)
            .field("payment_product_id", &self.payment_product_id)
            .field("account_on_file_id", &self.account_on_file_id)
            .field("tokenize", &self.tokenize)
            .field("payment_values", &self.payment_values)
            .finish_non_exhaustive()
    }
}

impl Drop for EncryptionPayload {
    fn drop(&mut self) {
        for payment_value in &mut self.payment_values {
            payment_value.value.zeroize();
        }
    }
}

fn fresh_nonce() -> String {
    Uuid::new_v4().simple().to_string()
}
