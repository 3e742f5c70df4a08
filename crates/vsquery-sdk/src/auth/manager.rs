//! Token management with expiry-aware caching
//!
//! The TokenManager turns an [`AuthContext`] into a usable access token:
//! a still-valid cached token is returned as-is, otherwise the full
//! authorize + token exchange runs and the result is cached.

use super::oauth_flow::AuthorizationClient;
use super::types::{AuthContext, AuthResult, CacheKeyScope, CachedToken};
use crate::cache::CacheError;
use chrono::Utc;
use tracing::{debug, info, warn};

/// Obtains access tokens, reusing cached ones while they are valid
pub struct TokenManager {
    client: Box<dyn AuthorizationClient>,
}

impl TokenManager {
    /// Create a new token manager on top of the given authorization client
    pub fn new(client: Box<dyn AuthorizationClient>) -> Self {
        Self { client }
    }

    /// Get a valid access token
    ///
    /// No retries: any failure of the authorize or token request aborts the
    /// whole flow and is returned unchanged.
    pub async fn get_access_token(&self, ctx: &AuthContext) -> AuthResult<String> {
        // 1. Check cache for valid token
        if let Some(cached) = self.cached_token(ctx).await? {
            let now = Utc::now().timestamp();
            if !cached.is_valid_at(now) {
                debug!("Cached token expired at {}", cached.expires_at);
            } else if cached.client_id != ctx.client_id
                && ctx.cache_scope() == CacheKeyScope::PerClient
            {
                // Sanitized keys can collide, the record must belong to this client
                warn!(
                    "Ignoring cached token of client {} under the key of {}",
                    cached.client_id, ctx.client_id
                );
            } else {
                if cached.client_id != ctx.client_id {
                    warn!(
                        "Cached token was issued to client {}, not {}",
                        cached.client_id, ctx.client_id
                    );
                }
                debug!("Using cached token, {}s left", cached.seconds_until_expiry(now));
                return Ok(cached.access_token);
            }
        }

        // 2. Authorize, then 3. exchange
        info!("No valid cached token, starting authorization flow");
        let code = self.client.authorize_code(ctx).await?;
        let response = self.client.access_token(&code, ctx).await?;

        // 4. Store
        let record =
            CachedToken::from_response(&ctx.client_id, &response, Utc::now().timestamp());
        self.store_token(ctx, &record).await?;

        Ok(response.access_token)
    }

    /// Read the stored token record without touching the network
    ///
    /// A record that no longer parses is treated as absent so the next
    /// authorization overwrites it.
    pub async fn cached_token(&self, ctx: &AuthContext) -> AuthResult<Option<CachedToken>> {
        let Some(cache) = ctx.cache() else {
            return Ok(None);
        };

        let key = ctx.cache_key();
        if !cache.has(&key).await {
            debug!("No cached token under {}", key);
            return Ok(None);
        }

        let payload = match cache.get(&key).await {
            Ok(payload) => payload,
            Err(CacheError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<CachedToken>(&payload) {
            Ok(token) => Ok(Some(token)),
            Err(e) => {
                warn!("Ignoring unreadable cached token under {}: {}", key, e);
                Ok(None)
            }
        }
    }

    /// Remove the stored token record
    ///
    /// Returns whether a record existed.
    pub async fn clear_cached_token(&self, ctx: &AuthContext) -> AuthResult<bool> {
        let Some(cache) = ctx.cache() else {
            return Ok(false);
        };

        let key = ctx.cache_key();
        match cache.delete(&key).await {
            Ok(()) => {
                info!("Cleared cached token {}", key);
                Ok(true)
            }
            Err(CacheError::NotFound(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn store_token(&self, ctx: &AuthContext, record: &CachedToken) -> AuthResult<()> {
        let Some(cache) = ctx.cache() else {
            return Ok(());
        };

        let payload = serde_json::to_string(record)?;
        cache.set(&ctx.cache_key(), &payload).await?;

        debug!("Cached token until {}", record.expires_at);
        Ok(())
    }
}
