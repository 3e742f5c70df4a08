//! OAuth 2.0 authorization code flow with PKCE against the Viessmann IAM
//!
//! The authorization code is captured from the `Location` header of the
//! authorize response, so the HTTP client used here must not follow
//! redirects (see [`crate::client::build_http_client`]).

use super::pkce::derive_code_challenge;
use super::types::{AccessTokenResponse, AuthContext, AuthError, AuthResult};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::Client;
use tracing::{debug, info};
use url::Url;
use vsquery_common::{AUTHORIZE_PATH, OAUTH_SCOPE, TOKEN_PATH};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// The two round-trips of the authorization code flow
///
/// The token manager depends on this trait only, so tests can substitute
/// a double for the real identity provider.
#[async_trait]
pub trait AuthorizationClient: Send + Sync {
    /// Obtain an authorization code for the context's credentials
    async fn authorize_code(&self, ctx: &AuthContext) -> AuthResult<String>;

    /// Exchange an authorization code for an access token
    async fn access_token(&self, code: &str, ctx: &AuthContext) -> AuthResult<AccessTokenResponse>;
}

/// HTTP implementation of [`AuthorizationClient`]
#[derive(Debug, Clone)]
pub struct IamClient {
    http_client: Client,
    base_url: String,
}

impl IamClient {
    /// Create a client for the identity provider at `base_url`
    ///
    /// `http_client` must have redirect following disabled.
    pub fn new(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, path: &str) -> AuthResult<Url> {
        let raw = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|e| AuthError::Config(format!("Invalid IAM endpoint {raw}: {e}")))
    }

    /// Build the authorize URL carrying the PKCE challenge
    pub fn authorize_url(&self, ctx: &AuthContext) -> AuthResult<Url> {
        let challenge = derive_code_challenge(ctx.code_verifier());
        let mut url = self.endpoint(AUTHORIZE_PATH)?;

        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &ctx.client_id)
            .append_pair("redirect_uri", &ctx.redirect_uri)
            .append_pair("scope", OAUTH_SCOPE)
            .append_pair("code_challenge", &challenge)
            .append_pair("code_challenge_method", "S256");

        Ok(url)
    }

    /// Build the token URL carrying the code and its verifier
    pub fn token_url(&self, code: &str, ctx: &AuthContext) -> AuthResult<Url> {
        let mut url = self.endpoint(TOKEN_PATH)?;

        url.query_pairs_mut()
            .append_pair("grant_type", "authorization_code")
            .append_pair("code_verifier", ctx.code_verifier())
            .append_pair("client_id", &ctx.client_id)
            .append_pair("redirect_uri", &ctx.redirect_uri)
            .append_pair("code", code);

        Ok(url)
    }

    /// Pull the `code` query parameter out of a redirect target
    ///
    /// Relative targets are resolved against the IAM base URL.
    fn extract_code(&self, location: &str) -> AuthResult<String> {
        let redirect = match Url::parse(location) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => self
                .endpoint("/")?
                .join(location)
                .map_err(|e| AuthError::Protocol(format!("Malformed redirect location: {e}")))?,
            Err(e) => {
                return Err(AuthError::Protocol(format!(
                    "Malformed redirect location: {e}"
                )))
            }
        };

        let mut code = None;
        let mut error = None;
        for (key, value) in redirect.query_pairs() {
            match key.as_ref() {
                "code" => code = Some(value.into_owned()),
                "error" => error = Some(value.into_owned()),
                _ => {}
            }
        }

        match code {
            Some(code) if !code.is_empty() => Ok(code),
            _ => Err(AuthError::Protocol(match error {
                Some(error) => format!("Authorization rejected: {error}"),
                None => "Redirect location carries no authorization code".to_string(),
            })),
        }
    }
}

#[async_trait]
impl AuthorizationClient for IamClient {
    async fn authorize_code(&self, ctx: &AuthContext) -> AuthResult<String> {
        let url = self.authorize_url(ctx)?;
        debug!("POST {}{}", self.base_url, AUTHORIZE_PATH);

        let response = self
            .http_client
            .post(url)
            .basic_auth(&ctx.username, Some(&ctx.password))
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| AuthError::Transport(format!("Authorization request failed: {e}")))?;

        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        // Drain the body so the connection goes back to the pool
        let _ = response.bytes().await;

        let location = location.ok_or_else(|| {
            AuthError::Protocol(format!(
                "Authorize response (HTTP {status}) has no redirect location"
            ))
        })?;

        let code = self.extract_code(&location)?;
        debug!("Authorization code received");
        Ok(code)
    }

    async fn access_token(&self, code: &str, ctx: &AuthContext) -> AuthResult<AccessTokenResponse> {
        let url = self.token_url(code, ctx)?;
        debug!("POST {}{}", self.base_url, TOKEN_PATH);

        let response = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| AuthError::Transport(format!("Token request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Transport(format!("Failed to read token response: {e}")))?;

        if !status.is_success() {
            return Err(AuthError::Protocol(format!(
                "Token exchange failed with HTTP {status}: {body}"
            )));
        }

        let token: AccessTokenResponse = serde_json::from_str(&body)
            .map_err(|e| AuthError::Protocol(format!("Failed to parse token response: {e}")))?;

        info!(
            "Token exchange completed, token expires in {}s",
            token.expires_in
        );
        Ok(token)
    }
}
