use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::application::ports::{AuthError, BearerToken, TokenProvider};

use super::token_cache::{CachedAccount, FileTokenCache};

const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// OAuth2 broker for the Microsoft identity platform.
///
/// The request path only ever refreshes silently from the cached account and
/// fails fast when there is none; the blocking device-authorization flow is
/// reachable only through [`DeviceCodeBroker::acquire_interactive`], which
/// the `authorize` binary drives before the service starts serving.
pub struct DeviceCodeBroker {
    http: reqwest::Client,
    authority_host: String,
    tenant_id: String,
    client_id: String,
    // also serializes the read-then-rewrite of the on-disk cache blob
    cache: Mutex<FileTokenCache>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    id_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Deserialize)]
struct DeviceCodeResponse {
    device_code: Option<String>,
    user_code: Option<String>,
    verification_uri: Option<String>,
    interval: Option<u64>,
    expires_in: Option<u64>,
}

impl DeviceCodeBroker {
    /// Construction never fails: a broker with missing tenant/client ids is
    /// valid and rejects every acquisition with `MissingConfiguration`, so
    /// the service can boot and serve transcription without identity
    /// configuration.
    pub fn new(tenant_id: &str, client_id: &str, cache_path: PathBuf) -> Self {
        Self::with_authority_host(DEFAULT_AUTHORITY_HOST, tenant_id, client_id, cache_path)
    }

    /// Authority host override so tests can point the broker at an
    /// in-process identity stub.
    pub fn with_authority_host(
        host: &str,
        tenant_id: &str,
        client_id: &str,
        cache_path: PathBuf,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            authority_host: host.trim_end_matches('/').to_string(),
            tenant_id: tenant_id.to_string(),
            client_id: client_id.to_string(),
            cache: Mutex::new(FileTokenCache::load(cache_path)),
        }
    }

    fn check_configuration(&self) -> Result<(), AuthError> {
        if self.tenant_id.is_empty() || self.client_id.is_empty() {
            return Err(AuthError::MissingConfiguration);
        }
        Ok(())
    }

    fn token_endpoint(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host, self.tenant_id
        )
    }

    fn device_code_endpoint(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/devicecode",
            self.authority_host, self.tenant_id
        )
    }

    /// Refresh a token from the first cached account without interaction.
    pub async fn acquire_silent(&self, scopes: &[&str]) -> Result<BearerToken, AuthError> {
        self.check_configuration()?;

        let mut cache = self.cache.lock().await;
        let account = cache
            .first_account()
            .cloned()
            .ok_or(AuthError::NoCachedAccount)?;

        tracing::debug!(username = %account.username, "Attempting silent token refresh");

        let scope = scope_param(scopes);
        let response = self
            .http
            .post(self.token_endpoint())
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("grant_type", "refresh_token"),
                ("refresh_token", account.refresh_token.as_str()),
                ("scope", scope.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        if let Some(error) = &token.error {
            return Err(AuthError::AcquisitionFailed(format!(
                "{}: {}",
                error,
                token.error_description.as_deref().unwrap_or("")
            )));
        }

        let access_token = token.access_token.ok_or_else(|| {
            AuthError::AcquisitionFailed("response carried no access token".to_string())
        })?;

        if let Some(rotated) = token.refresh_token {
            cache.store_account(CachedAccount {
                username: account.username,
                refresh_token: rotated,
            });
        }
        persist_cache(&mut cache);

        Ok(BearerToken::new(access_token))
    }

    /// Interactive device-authorization flow. Prints the verification URL
    /// and code, then blocks until the user completes sign-in, the provider
    /// rejects the flow, or the flow expires. Never called on a request
    /// path.
    pub async fn acquire_interactive(&self, scopes: &[&str]) -> Result<BearerToken, AuthError> {
        self.check_configuration()?;

        let scope = scope_param(scopes);
        let response = self
            .http
            .post(self.device_code_endpoint())
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("scope", scope.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        let flow: DeviceCodeResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        let (Some(device_code), Some(user_code), Some(verification_uri)) =
            (flow.device_code, flow.user_code, flow.verification_uri)
        else {
            return Err(AuthError::DeviceFlowInit(
                "provider did not issue a device code (check tenant/client ids)".to_string(),
            ));
        };

        println!("\n=== Microsoft Sign-in ===");
        println!("Visit: {}", verification_uri);
        println!("Enter code: {}\n", user_code);

        let interval = Duration::from_secs(flow.interval.unwrap_or(5));
        let deadline = Instant::now() + Duration::from_secs(flow.expires_in.unwrap_or(900));

        loop {
            tokio::time::sleep(interval).await;
            if Instant::now() >= deadline {
                return Err(AuthError::AcquisitionFailed(
                    "device flow expired before sign-in completed".to_string(),
                ));
            }

            let response = self
                .http
                .post(self.token_endpoint())
                .form(&[
                    ("client_id", self.client_id.as_str()),
                    (
                        "grant_type",
                        "urn:ietf:params:oauth:grant-type:device_code",
                    ),
                    ("device_code", device_code.as_str()),
                ])
                .send()
                .await
                .map_err(|e| AuthError::Request(e.to_string()))?;

            let token: TokenResponse = response
                .json()
                .await
                .map_err(|e| AuthError::Request(e.to_string()))?;

            match token.error.as_deref() {
                Some("authorization_pending") | Some("slow_down") => continue,
                Some(error) => {
                    return Err(AuthError::AcquisitionFailed(format!(
                        "{}: {}",
                        error,
                        token.error_description.as_deref().unwrap_or("")
                    )));
                }
                None => {}
            }

            let access_token = token.access_token.ok_or_else(|| {
                AuthError::AcquisitionFailed("response carried no access token".to_string())
            })?;

            if let Some(refresh_token) = token.refresh_token {
                let username = token
                    .id_token
                    .as_deref()
                    .and_then(id_token_username)
                    .unwrap_or_else(|| "unknown".to_string());
                let mut cache = self.cache.lock().await;
                cache.store_account(CachedAccount {
                    username,
                    refresh_token,
                });
                persist_cache(&mut cache);
            }

            return Ok(BearerToken::new(access_token));
        }
    }
}

#[async_trait]
impl TokenProvider for DeviceCodeBroker {
    async fn acquire(&self, scopes: &[&str]) -> Result<BearerToken, AuthError> {
        self.acquire_silent(scopes).await
    }
}

fn persist_cache(cache: &mut FileTokenCache) {
    // a cache-write failure must not discard a successfully acquired token
    if let Err(e) = cache.save_if_changed() {
        tracing::warn!(error = %e, "Failed to persist token cache");
    }
}

fn scope_param(scopes: &[&str]) -> String {
    let mut all: Vec<&str> = scopes.to_vec();
    // offline_access is what makes the provider hand back a refresh token;
    // openid is required for the id_token that labels the cached account
    for extra in ["offline_access", "openid"] {
        if !all.contains(&extra) {
            all.push(extra);
        }
    }
    all.join(" ")
}

/// Pull `preferred_username` out of the id-token payload. No signature
/// verification: the token came straight from the provider over TLS and is
/// only used to label the cached account.
fn id_token_username(id_token: &str) -> Option<String> {
    let payload = id_token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    claims
        .get("preferred_username")
        .and_then(|v| v.as_str())
        .map(String::from)
}
