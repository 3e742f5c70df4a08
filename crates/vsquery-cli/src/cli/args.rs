use crate::cli::{commands::Commands, handlers};
use crate::config::CliConfig;
use crate::error::Result;
use clap::Parser;
use clap_verbosity_flag::{OffLevel, Verbosity};
use std::path::PathBuf;

/// vsquery - Viessmann API Query Tool
#[derive(Parser, Debug)]
#[command(
    name = "vsquery",
    version,
    about = "Viessmann API Query Tool",
    long_about = "Query the Viessmann IoT platform and print the raw JSON responses.

EXAMPLES:
  vsquery installations -u <user> -p <pass> -c <client>
  vsquery features -u <user> -p <pass> -c <client> -i <installation> -g <gateway>
  vsquery installations -C -P ~/.cache/vsquery ...   # reuse the access token
  vsquery logout -c <client>                         # forget the cached token

Credentials can also be passed as VSQUERY_USER, VSQUERY_PASS and VSQUERY_CLIENT."
)]
pub struct Args {
    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub verbosity: Verbosity<OffLevel>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Args {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        if let Commands::Version = self.command {
            handlers::version::handle_version();
            return Ok(());
        }

        let config = CliConfig::load(self.config.as_deref())?;

        match self.command {
            Commands::Installations { options } => {
                handlers::resources::handle_installations(options, &config).await
            }
            Commands::Features { options, device } => {
                handlers::resources::handle_features(options, device, &config).await
            }
            Commands::Logout { options } => handlers::auth::handle_logout(options, &config).await,
            Commands::Version => Ok(()),
        }
    }
}
