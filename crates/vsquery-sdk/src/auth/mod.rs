//! Authentication module for the Viessmann IAM
//!
//! Implements the OAuth 2.0 authorization code flow with PKCE, where the
//! authorization code is captured from the authorize redirect instead of a
//! browser callback, plus expiry-aware token caching.

pub mod manager;
pub mod oauth_flow;
pub mod pkce;
pub mod types;

pub use manager::TokenManager;
pub use oauth_flow::{AuthorizationClient, IamClient};
pub use pkce::{derive_code_challenge, generate_code_verifier};
pub use types::{
    AccessTokenResponse, AuthContext, AuthError, AuthResult, CacheKeyScope, CachedToken,
};
