//! Viessmann platform defaults for vsquery
//!
//! These constants are compiled into the binary so the CLI works without
//! any configuration file. Base URLs, the redirect URI and the cache directory
//! can be overridden through configuration or flags.

/// Identity provider (IAM) base URL
pub const IAM_BASE_URL: &str = "https://iam.viessmann.com";

/// IoT resource API base URL
pub const API_BASE_URL: &str = "https://api.viessmann-platform.io";

/// Authorize endpoint path on the identity provider
pub const AUTHORIZE_PATH: &str = "/idp/v2/authorize";

/// Token endpoint path on the identity provider
pub const TOKEN_PATH: &str = "/idp/v2/token";

/// OAuth scope requested during authorization
pub const OAUTH_SCOPE: &str = "IoT User";

/// Redirect URI registered for the vsquery client by default
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:4200/";

/// Directory holding token cache files by default
pub const DEFAULT_CACHE_DIR: &str = "/tmp";

/// Cache key under which the access token record is stored
pub const CACHE_AUTH_TOKEN_KEY: &str = "vs_auth_token";

/// Seconds subtracted from the provider-reported lifetime before a cached
/// token is considered expired
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;
