//! HTTP client for the Viessmann platform
//!
//! [`ViessmannClient`] bundles the token manager with bearer-authenticated
//! GETs against the resource API. Response bodies are handed back verbatim;
//! the platform reports errors as JSON bodies and callers print them as-is.
//!
//! # Usage
//!
//! ```rust,no_run
//! use vsquery_sdk::{AuthContext, ClientBuilder};
//!
//! # async fn example() -> vsquery_sdk::Result<()> {
//! let client = ClientBuilder::default()
//!     .iam_base_url("https://iam.viessmann.com")
//!     .api_base_url("https://api.viessmann-platform.io")
//!     .build()?;
//!
//! let ctx = AuthContext::new("user", "pass", "client-id", "http://localhost:4200/");
//! let token = client.authenticate(&ctx).await?;
//! println!("{}", client.get_installations(&token).await?);
//! # Ok(())
//! # }
//! ```

use crate::{
    auth::{AuthContext, AuthorizationClient, IamClient, TokenManager},
    error::Result,
    types::{Endpoints, FeatureQuery},
};
use reqwest::header::AUTHORIZATION;
use std::time::Duration;
use tracing::{debug, warn};

const INSTALLATIONS_PATH: &str = "/iot/v1/equipment/installations";

/// Build the HTTP client shared by the IAM and the resource API
///
/// Redirects are never followed: the authorization code is read from the
/// `Location` header of the authorize response.
pub fn build_http_client(
    timeout: Option<Duration>,
) -> std::result::Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none());
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

/// HTTP client for interacting with the Viessmann API
pub struct ViessmannClient {
    http_client: reqwest::Client,
    api_base_url: String,
    token_manager: TokenManager,
}

impl ViessmannClient {
    /// Create a new client (private - use ClientBuilder instead)
    fn new(
        http_client: reqwest::Client,
        api_base_url: impl Into<String>,
        token_manager: TokenManager,
    ) -> Self {
        Self {
            http_client,
            api_base_url: api_base_url.into(),
            token_manager,
        }
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn token_manager(&self) -> &TokenManager {
        &self.token_manager
    }

    /// Get an access token for `ctx`, from the cache when still valid
    pub async fn authenticate(&self, ctx: &AuthContext) -> Result<String> {
        Ok(self.token_manager.get_access_token(ctx).await?)
    }

    // ===== Resources =====

    /// List the installations of the account, gateways included
    pub async fn get_installations(&self, token: &str) -> Result<String> {
        self.get_raw(INSTALLATIONS_PATH, &[("includeGateways", "true")], token)
            .await
    }

    /// List the features of one device
    pub async fn get_features(&self, token: &str, query: &FeatureQuery) -> Result<String> {
        self.get_raw(&query.path(), &[], token).await
    }

    // ===== Private Helper Methods =====

    /// GET with bearer authentication, returning the body whatever the status
    async fn get_raw(&self, path: &str, query: &[(&str, &str)], token: &str) -> Result<String> {
        let url = format!("{}{}", self.api_base_url.trim_end_matches('/'), path);
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .query(query)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("GET {} returned HTTP {}", path, status);
        }

        Ok(body)
    }
}

/// Builder for constructing a ViessmannClient with custom configuration
#[derive(Default)]
pub struct ClientBuilder {
    endpoints: Endpoints,
    timeout: Option<Duration>,
    authorization_client: Option<Box<dyn AuthorizationClient>>,
}

impl ClientBuilder {
    /// Create a new builder pointing at the production endpoints
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identity provider base URL
    pub fn iam_base_url(mut self, url: impl Into<String>) -> Self {
        self.endpoints.iam_base_url = url.into();
        self
    }

    /// Set the resource API base URL
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.endpoints.api_base_url = url.into();
        self
    }

    /// Set both base URLs at once
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Set the request timeout (none by default)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replace the IAM client used by the token manager
    pub fn authorization_client(mut self, client: Box<dyn AuthorizationClient>) -> Self {
        self.authorization_client = Some(client);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ViessmannClient> {
        let http_client = build_http_client(self.timeout)?;

        let authorization_client = match self.authorization_client {
            Some(client) => client,
            None => Box::new(IamClient::new(
                http_client.clone(),
                self.endpoints.iam_base_url,
            )),
        };

        Ok(ViessmannClient::new(
            http_client,
            self.endpoints.api_base_url,
            TokenManager::new(authorization_client),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AccessTokenResponse, AuthResult};
    use crate::error::ApiError;
    use async_trait::async_trait;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct FixedTokenClient;

    #[async_trait]
    impl AuthorizationClient for FixedTokenClient {
        async fn authorize_code(&self, _ctx: &AuthContext) -> AuthResult<String> {
            Ok("code".to_string())
        }

        async fn access_token(
            &self,
            _code: &str,
            _ctx: &AuthContext,
        ) -> AuthResult<AccessTokenResponse> {
            Ok(AccessTokenResponse {
                access_token: "fixed".to_string(),
                token_type: "Bearer".to_string(),
                expires_in: 3600,
            })
        }
    }

    #[tokio::test]
    async fn test_get_installations() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/iot/v1/equipment/installations"))
            .and(query_param("includeGateways", "true"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "id": 12345, "gateways": [] }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ClientBuilder::default()
            .api_base_url(mock_server.uri())
            .build()
            .unwrap();
        let body = client.get_installations("test-token").await.unwrap();

        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["data"][0]["id"], 12345);
    }

    #[tokio::test]
    async fn test_get_features() {
        let mock_server = MockServer::start().await;
        let body = r#"{"data":[{"feature":"heating.boiler.sensors.temperature.main"}]}"#;

        Mock::given(method("GET"))
            .and(path(
                "/iot/v2/features/installations/12345/gateways/7571381573112225/devices/0/features",
            ))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ClientBuilder::default()
            .api_base_url(format!("{}/", mock_server.uri()))
            .build()
            .unwrap();
        let query = FeatureQuery::new("12345", "7571381573112225", "0");

        assert_eq!(
            client.get_features("test-token", &query).await.unwrap(),
            body
        );
    }

    #[tokio::test]
    async fn test_error_status_returns_body() {
        let mock_server = MockServer::start().await;
        let body = r#"{"viErrorId":"abc","statusCode":401,"errorType":"EXPIRED TOKEN"}"#;

        Mock::given(method("GET"))
            .and(path("/iot/v1/equipment/installations"))
            .respond_with(ResponseTemplate::new(401).set_body_string(body))
            .mount(&mock_server)
            .await;

        let client = ClientBuilder::default()
            .api_base_url(mock_server.uri())
            .build()
            .unwrap();

        assert_eq!(client.get_installations("stale").await.unwrap(), body);
    }

    #[tokio::test]
    async fn test_unreachable_api_is_http_client_error() {
        let client = ClientBuilder::default()
            .api_base_url("http://127.0.0.1:1")
            .build()
            .unwrap();

        let err = client.get_installations("token").await.unwrap_err();
        assert!(matches!(err, ApiError::HttpClient(_)));
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_authenticate_uses_injected_client() {
        let client = ClientBuilder::default()
            .authorization_client(Box::new(FixedTokenClient))
            .build()
            .unwrap();
        let ctx = AuthContext::new("user", "pass", "client", "http://localhost:4200/");

        assert_eq!(client.authenticate(&ctx).await.unwrap(), "fixed");
    }

    #[test]
    fn test_builder_defaults() {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap();
        assert_eq!(client.api_base_url(), "https://api.viessmann-platform.io");
    }
}
