//! Authentication handlers for the vsquery CLI

use crate::cli::commands::{CacheLocation, CommonOptions, LogoutOptions};
use crate::config::{expand_path, CliConfig};
use crate::error::Result;
use crate::output::{compress_path, print_info, print_success};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use vsquery_sdk::{AuthContext, CacheKeyScope, ClientBuilder, FileCacheStorage, ViessmannClient};

/// Build the SDK client and obtain an access token
pub async fn login(
    options: &CommonOptions,
    config: &CliConfig,
) -> Result<(ViessmannClient, String)> {
    let client = build_client(config)?;
    let ctx = auth_context(options, config);

    let token = client.authenticate(&ctx).await?;
    Ok((client, token))
}

/// Handle logout command - remove the cached token for a client
pub async fn handle_logout(options: LogoutOptions, config: &CliConfig) -> Result<()> {
    let client = build_client(config)?;
    let dir = cache_dir(&options.cache, config);

    // Credentials play no part in locating the cache record
    let ctx = AuthContext::new("", "", options.client.as_str(), config.auth.redirect_uri.as_str())
        .with_cache(Arc::new(FileCacheStorage::new(&dir)))
        .with_cache_scope(cache_scope(&options.cache, config));

    if client.token_manager().clear_cached_token(&ctx).await? {
        print_success(&format!(
            "Removed cached token {} from {}",
            ctx.cache_key(),
            compress_path(&dir)
        ));
    } else {
        print_info(&format!("No cached token found in {}", compress_path(&dir)));
    }

    Ok(())
}

fn build_client(config: &CliConfig) -> Result<ViessmannClient> {
    Ok(ClientBuilder::default()
        .endpoints(config.endpoints())
        .build()?)
}

/// Merge flags over configuration into an authentication context
pub(crate) fn auth_context(options: &CommonOptions, config: &CliConfig) -> AuthContext {
    let redirect_uri = options
        .redirect
        .clone()
        .unwrap_or_else(|| config.auth.redirect_uri.clone());

    let ctx = AuthContext::new(
        options.user.as_str(),
        options.pass.as_str(),
        options.client.as_str(),
        redirect_uri,
    );

    if options.use_cache || config.cache.enabled {
        let dir = cache_dir(&options.cache, config);
        debug!("Token cache enabled in {}", dir.display());
        ctx.with_cache(Arc::new(FileCacheStorage::new(dir)))
            .with_cache_scope(cache_scope(&options.cache, config))
    } else {
        ctx
    }
}

pub(crate) fn cache_dir(location: &CacheLocation, config: &CliConfig) -> PathBuf {
    match &location.cache_path {
        Some(path) => expand_path(path),
        None => config.cache.path.clone(),
    }
}

pub(crate) fn cache_scope(location: &CacheLocation, config: &CliConfig) -> CacheKeyScope {
    location.cache_scope.unwrap_or(config.cache.scope)
}
