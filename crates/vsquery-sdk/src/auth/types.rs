//! Authentication-related types and data structures
//!
//! This module defines the types shared by the PKCE generator, the
//! authorization client and the token manager: the per-invocation context,
//! the persisted token record, the token endpoint response and the error
//! type.

use super::pkce::generate_code_verifier;
use crate::cache::{CacheError, CacheStorage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use vsquery_common::{CACHE_AUTH_TOKEN_KEY, TOKEN_EXPIRY_MARGIN_SECS};

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

/// How the token cache key is derived from the requesting client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheKeyScope {
    /// One key for every client id. A token obtained for one client id is
    /// returned to another client id sharing the same cache directory.
    #[default]
    Shared,
    /// Key suffixed with the client id
    PerClient,
}

impl fmt::Display for CacheKeyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKeyScope::Shared => write!(f, "shared"),
            CacheKeyScope::PerClient => write!(f, "per-client"),
        }
    }
}

impl FromStr for CacheKeyScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shared" => Ok(CacheKeyScope::Shared),
            "per-client" => Ok(CacheKeyScope::PerClient),
            other => Err(format!(
                "unknown cache scope '{other}', expected 'shared' or 'per-client'"
            )),
        }
    }
}

/// Everything one invocation needs to authenticate
///
/// The PKCE code verifier is generated once when the context is built and
/// is reused for both the authorize and the token request.
#[derive(Clone)]
pub struct AuthContext {
    /// Account username (sent as HTTP Basic credentials)
    pub username: String,
    /// Account password
    pub password: String,
    /// OAuth client ID
    pub client_id: String,
    /// Redirect URI registered for the client
    pub redirect_uri: String,
    code_verifier: String,
    cache: Option<Arc<dyn CacheStorage>>,
    cache_scope: CacheKeyScope,
}

impl AuthContext {
    /// Create a context with a freshly generated code verifier and no cache
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            code_verifier: generate_code_verifier(),
            cache: None,
            cache_scope: CacheKeyScope::default(),
        }
    }

    /// Attach a token cache
    pub fn with_cache(mut self, cache: Arc<dyn CacheStorage>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Choose how the cache key is derived
    pub fn with_cache_scope(mut self, scope: CacheKeyScope) -> Self {
        self.cache_scope = scope;
        self
    }

    /// Replace the generated verifier with a known one
    pub fn with_code_verifier(mut self, verifier: impl Into<String>) -> Self {
        self.code_verifier = verifier.into();
        self
    }

    pub fn code_verifier(&self) -> &str {
        &self.code_verifier
    }

    pub fn cache(&self) -> Option<&Arc<dyn CacheStorage>> {
        self.cache.as_ref()
    }

    pub fn cache_scope(&self) -> CacheKeyScope {
        self.cache_scope
    }

    /// Key under which this context's token record lives
    pub fn cache_key(&self) -> String {
        match self.cache_scope {
            CacheKeyScope::Shared => CACHE_AUTH_TOKEN_KEY.to_string(),
            CacheKeyScope::PerClient => {
                let client: String = self
                    .client_id
                    .chars()
                    .map(|c| {
                        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                            c
                        } else {
                            '_'
                        }
                    })
                    .collect();
                format!("{}_{}", CACHE_AUTH_TOKEN_KEY, client)
            }
        }
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("redirect_uri", &self.redirect_uri)
            .field("has_cache", &self.cache.is_some())
            .field("cache_scope", &self.cache_scope)
            .finish()
    }
}

/// Token endpoint response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

/// Persisted token record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
    pub client_id: String,
    pub access_token: String,
    /// Always empty; the refresh grant is not used
    #[serde(default)]
    pub refresh_token: String,
    /// Unix timestamp (seconds) after which the token must not be reused
    pub expires_at: i64,
}

impl CachedToken {
    /// Build the record stored after a successful token exchange
    ///
    /// The expiry is pulled in by one minute so the token is renewed before
    /// the provider rejects it.
    pub fn from_response(client_id: &str, response: &AccessTokenResponse, issued_at: i64) -> Self {
        Self {
            client_id: client_id.to_string(),
            access_token: response.access_token.clone(),
            refresh_token: String::new(),
            expires_at: issued_at
                .saturating_add(response.expires_in)
                .saturating_sub(TOKEN_EXPIRY_MARGIN_SECS),
        }
    }

    pub fn is_valid_at(&self, now: i64) -> bool {
        self.expires_at > now
    }

    /// Seconds left at `now`, zero once expired
    pub fn seconds_until_expiry(&self, now: i64) -> i64 {
        self.expires_at.saturating_sub(now).max(0)
    }
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Request could not be sent or the response could not be read
    #[error("Network error: {0}")]
    Transport(String),

    /// Response lacked the expected redirect/code or had an unusable body
    #[error("Invalid OAuth response: {0}")]
    Protocol(String),

    /// Token cache read/write/delete failed
    #[error("Token storage error: {0}")]
    Cache(#[from] CacheError),

    /// Cache record could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid endpoint or client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AuthError {
    pub fn is_transport(&self) -> bool {
        matches!(self, AuthError::Transport(_))
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, AuthError::Protocol(_))
    }

    pub fn is_cache(&self) -> bool {
        matches!(self, AuthError::Cache(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cached_token_round_trip() {
        let token = CachedToken {
            client_id: "client-1".to_string(),
            access_token: "tok1".to_string(),
            refresh_token: String::new(),
            expires_at: 1_700_003_540,
        };

        let json = serde_json::to_string(&token).unwrap();
        let decoded: CachedToken = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, token);
    }

    #[test]
    fn test_cached_token_wire_format() {
        let token = CachedToken {
            client_id: "c".to_string(),
            access_token: "a".to_string(),
            refresh_token: String::new(),
            expires_at: 42,
        };

        let value = serde_json::to_value(&token).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "client_id": "c",
                "access_token": "a",
                "refresh_token": "",
                "expires_at": 42
            })
        );
    }

    #[test]
    fn test_expiry_margin_applied() {
        let response = AccessTokenResponse {
            access_token: "tok1".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
        };

        let token = CachedToken::from_response("client", &response, 1_000);
        assert_eq!(token.expires_at, 1_000 + 3_540);
        assert!(token.refresh_token.is_empty());
        assert!(token.is_valid_at(1_000 + 3_539));
        assert!(!token.is_valid_at(1_000 + 3_540));
        assert_eq!(token.seconds_until_expiry(1_000), 3_540);
        assert_eq!(token.seconds_until_expiry(5_000), 0);
    }

    #[test]
    fn test_expiry_saturates_on_huge_lifetime() {
        let response = AccessTokenResponse {
            access_token: "tok1".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: i64::MAX,
        };

        let token = CachedToken::from_response("client", &response, 1_700_000_000);
        assert_eq!(token.expires_at, i64::MAX - 60);
        assert!(token.is_valid_at(1_700_000_000));
        assert_eq!(token.seconds_until_expiry(-1_000), i64::MAX);
    }

    #[test]
    fn test_expiry_saturates_on_negative_lifetime() {
        let response = AccessTokenResponse {
            access_token: "tok1".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: i64::MIN,
        };

        let token = CachedToken::from_response("client", &response, 1_700_000_000);
        assert_eq!(token.expires_at, i64::MIN + 1_700_000_000 - 60);
        assert!(!token.is_valid_at(1_700_000_000));
        assert_eq!(token.seconds_until_expiry(1_700_000_000), 0);
    }

    #[test]
    fn test_cache_key_scopes() {
        let ctx = AuthContext::new("user", "pass", "my client/1", "http://localhost:4200/");
        assert_eq!(ctx.cache_key(), "vs_auth_token");

        let ctx = ctx.with_cache_scope(CacheKeyScope::PerClient);
        assert_eq!(ctx.cache_key(), "vs_auth_token_my_client_1");
    }

    #[test]
    fn test_cache_scope_parsing() {
        assert_eq!("shared".parse::<CacheKeyScope>(), Ok(CacheKeyScope::Shared));
        assert_eq!(
            "per-client".parse::<CacheKeyScope>(),
            Ok(CacheKeyScope::PerClient)
        );
        assert!("global".parse::<CacheKeyScope>().is_err());
        assert_eq!(CacheKeyScope::PerClient.to_string(), "per-client");
    }

    #[test]
    fn test_debug_redacts_password() {
        let ctx = AuthContext::new("user", "hunter2", "client", "http://localhost:4200/");
        let rendered = format!("{:?}", ctx);
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains(ctx.code_verifier()));
    }

    #[test]
    fn test_context_generates_verifier_once() {
        let ctx = AuthContext::new("user", "pass", "client", "http://localhost:4200/");
        let cloned = ctx.clone();
        assert_eq!(ctx.code_verifier(), cloned.code_verifier());
        assert_eq!(ctx.code_verifier().len(), 51);
    }
}
