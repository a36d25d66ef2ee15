//! OneMap access token caching.
//!
//! Tokens last a few days. One token is shared by every request; it is
//! refreshed shortly before expiry, and only one task refreshes at a time.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use super::error::OneMapError;
use super::types::{TokenRequest, TokenResponse};

/// Refresh this long before the provider's stated expiry.
pub const REFRESH_BUFFER: Duration = Duration::from_secs(300);

/// A bearer token and when it stops being valid.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Whether the token can still be used at `now`, leaving `buffer` spare.
    pub fn is_fresh(&self, now: DateTime<Utc>, buffer: Duration) -> bool {
        chrono::Duration::from_std(buffer)
            .ok()
            .and_then(|buffer| self.expires_at.checked_sub_signed(buffer))
            .is_some_and(|refresh_at| now < refresh_at)
    }
}

/// Something that can issue a new access token.
pub trait TokenSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<AccessToken, OneMapError>> + Send;
}

/// Issues tokens from the OneMap auth endpoint using account credentials.
#[derive(Debug, Clone)]
pub struct PasswordTokenSource {
    http: reqwest::Client,
    url: String,
    email: String,
    password: String,
}

impl PasswordTokenSource {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            http,
            url: format!("{base_url}/api/auth/post/getToken"),
            email: email.into(),
            password: password.into(),
        }
    }
}

impl TokenSource for PasswordTokenSource {
    async fn fetch(&self) -> Result<AccessToken, OneMapError> {
        let response = self
            .http
            .post(&self.url)
            .json(&TokenRequest {
                email: &self.email,
                password: &self.password,
            })
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(OneMapError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OneMapError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| OneMapError::Json {
            message: e.to_string(),
            body: None,
        })?;

        let expires_at = token
            .expiry_secs()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| OneMapError::InvalidExpiry(token.expiry_timestamp.to_string()))?;

        Ok(AccessToken {
            value: token.access_token,
            expires_at,
        })
    }
}

/// A single cached token guarded for concurrent use.
///
/// Readers take the fast path under a read lock. On a miss, the refresh
/// mutex is taken and freshness checked again, so concurrent misses cause a
/// single fetch.
pub struct TokenCache<S> {
    source: S,
    token: RwLock<Option<AccessToken>>,
    refresh: Mutex<()>,
    buffer: Duration,
}

impl<S: TokenSource> TokenCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            token: RwLock::new(None),
            refresh: Mutex::new(()),
            buffer: REFRESH_BUFFER,
        }
    }

    /// Get a usable token value, refreshing if needed.
    pub async fn get(&self) -> Result<String, OneMapError> {
        if let Some(value) = self.fresh().await {
            return Ok(value);
        }

        let _guard = self.refresh.lock().await;

        // Another task may have refreshed while we waited
        if let Some(value) = self.fresh().await {
            return Ok(value);
        }

        debug!("refreshing OneMap access token");
        match self.source.fetch().await {
            Ok(token) => {
                debug!(expires_at = %token.expires_at, "OneMap access token refreshed");
                let value = token.value.clone();
                *self.token.write().await = Some(token);
                Ok(value)
            }
            Err(e) => {
                warn!(error = %e, "OneMap token refresh failed");
                *self.token.write().await = None;
                Err(e)
            }
        }
    }

    /// Drop the cached token so the next call refreshes.
    pub async fn invalidate(&self) {
        *self.token.write().await = None;
    }

    async fn fresh(&self) -> Option<String> {
        let token = self.token.read().await;
        token
            .as_ref()
            .filter(|t| t.is_fresh(Utc::now(), self.buffer))
            .map(|t| t.value.clone())
    }
}
