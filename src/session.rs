//! Checkout session details handed over by the merchant backend.

use serde::Deserialize;

use crate::error::{Result, VaultError};

/// The server-created session a checkout runs inside.
///
/// Merchants create sessions server-side and pass the result to the client
/// verbatim, so this mirrors the session-creation response body.
///
/// # Examples
///
/// ```
/// use checkout_vault::SessionDetails;
///
/// let details: SessionDetails = serde_json::from_str(
///     r#"{
///         "clientSessionId": "b4e4350f5c474fa18d551cbcbdd96c63",
///         "customerId": "cust-8841",
///         "clientApiUrl": "https://ams1.api.example.com/client/v1"
///     }"#,
/// )?;
/// assert!(details.validate().is_ok());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetails {
    /// Identifies this checkout towards the client API; travels inside every
    /// encrypted payload.
    pub client_session_id: String,
    /// The customer this session was created for.
    #[serde(default)]
    pub customer_id: String,
    /// Base URL of the client API endpoint assigned to this session.
    #[serde(default)]
    pub client_api_url: Option<String>,
    /// Base URL for static assets (payment product logos and the like).
    #[serde(default)]
    pub asset_url: Option<String>,
}

impl SessionDetails {
    /// Creates session details from the two identifiers every session has.
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for constructor arguments"
    )]
    #[must_use]
    pub fn new(client_session_id: impl Into<String>, customer_id: impl Into<String>) -> Self {
        Self {
            client_session_id: client_session_id.into(),
            customer_id: customer_id.into(),
            client_api_url: None,
            asset_url: None,
        }
    }

    /// Checks the details are usable for a checkout.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidSession`] when the client session id is
    /// blank, which would otherwise surface much later as a rejected payload.
    pub fn validate(&self) -> Result<()> {
        if self.client_session_id.trim().is_empty() {
            return Err(VaultError::InvalidSession(
                "client session id must not be blank".to_owned(),
            ));
        }
        Ok(())
    }
}
