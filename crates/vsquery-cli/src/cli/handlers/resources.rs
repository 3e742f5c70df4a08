//! Handlers for the installations and features commands

use super::auth::login;
use crate::cli::commands::{CommonOptions, FeatureOptions};
use crate::config::CliConfig;
use crate::error::Result;
use crate::output;
use tracing::debug;
use vsquery_sdk::FeatureQuery;

/// Print the installations JSON
pub async fn handle_installations(options: CommonOptions, config: &CliConfig) -> Result<()> {
    let (client, token) = login(&options, config).await?;

    let body = client.get_installations(&token).await?;
    output::print_body(&body);
    Ok(())
}

/// Print the features JSON of one device
pub async fn handle_features(
    options: CommonOptions,
    device: FeatureOptions,
    config: &CliConfig,
) -> Result<()> {
    let (client, token) = login(&options, config).await?;

    let query = FeatureQuery::new(device.installation_id, device.gateway_id, device.device_id);
    debug!(
        "Fetching features of installation {} gateway {} device {}",
        query.installation_id, query.gateway_id, query.device_id
    );

    let body = client.get_features(&token, &query).await?;
    output::print_body(&body);
    Ok(())
}
