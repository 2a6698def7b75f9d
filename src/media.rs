use crate::error::AppError;

use async_trait::async_trait;
use tracing::{debug, error};

/// Boundary for retrieving platform-hosted media bytes.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Issue a single authenticated GET and return the raw body.  No retry,
    /// no content-type validation; the caller decides what the bytes are.
    async fn fetch_media(&self, url: &str) -> Result<Vec<u8>, AppError>;
}

/// Fetches media from Twilio's media endpoints with HTTP basic auth.
pub struct TwilioMediaFetcher {
    http_client: reqwest::Client,
    account_sid: String,
    auth_token: String,
}

impl TwilioMediaFetcher {
    pub fn new(http_client: reqwest::Client, account_sid: String, auth_token: String) -> Self {
        Self {
            http_client,
            account_sid,
            auth_token,
        }
    }
}

#[async_trait]
impl MediaFetcher for TwilioMediaFetcher {
    async fn fetch_media(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let resp = self
            .http_client
            .get(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .send()
            .await
            .map_err(|e| {
                error!(error=%e, "failed to fetch media from twilio");
                AppError::Fetch(e)
            })?;
        let bytes = resp.bytes().await.map_err(|e| {
            error!(error=%e, "failed to read media response body");
            AppError::Fetch(e)
        })?;
        debug!(len = bytes.len(), "fetched media payload");
        Ok(bytes.to_vec())
    }
}
