//! # Viessmann SDK
//!
//! Client library for the Viessmann IoT platform: obtains access tokens from
//! the Viessmann IAM and queries installations and device features.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vsquery_sdk::{AuthContext, ClientBuilder, FileCacheStorage, FeatureQuery};
//!
//! # async fn example() -> vsquery_sdk::Result<()> {
//! let client = ClientBuilder::default().build()?;
//! let ctx = AuthContext::new("user@example.com", "secret", "client-id", "http://localhost:4200/")
//!     .with_cache(Arc::new(FileCacheStorage::new("/tmp")));
//!
//! let token = client.authenticate(&ctx).await?;
//! let installations = client.get_installations(&token).await?;
//! let features = client
//!     .get_features(&token, &FeatureQuery::new("12345", "7571381573112225", "0"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cache;
pub mod client;
pub mod error;
pub mod types;

pub use auth::{AuthContext, AuthError, CacheKeyScope, CachedToken, TokenManager};
pub use cache::{CacheError, CacheStorage, FileCacheStorage, MemoryCacheStorage, NoopCacheStorage};
pub use client::{build_http_client, ClientBuilder, ViessmannClient};
pub use error::{ApiError, Result};
pub use types::{Endpoints, FeatureQuery};
