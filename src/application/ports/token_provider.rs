use std::fmt;

use async_trait::async_trait;

/// Short-lived credential for the remote document store. The secret is only
/// reachable through [`BearerToken::secret`] and is redacted from `Debug`
/// output so it cannot leak into logs or error bodies.
#[derive(Clone)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(..)")
    }
}

#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Acquire a bearer token for the given scopes without user interaction.
    async fn acquire(&self, scopes: &[&str]) -> Result<BearerToken, AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("MS_TENANT_ID / MS_CLIENT_ID not configured")]
    MissingConfiguration,
    #[error("no cached account; run the `authorize` binary to sign in first")]
    NoCachedAccount,
    #[error("device flow could not be started: {0}")]
    DeviceFlowInit(String),
    #[error("token acquisition failed: {0}")]
    AcquisitionFailed(String),
    #[error("identity request failed: {0}")]
    Request(String),
}
