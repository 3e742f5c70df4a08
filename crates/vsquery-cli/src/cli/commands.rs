use clap::Subcommand;
use std::path::PathBuf;
use vsquery_sdk::CacheKeyScope;

/// Main CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Get installations JSON
    Installations {
        #[command(flatten)]
        options: CommonOptions,
    },

    /// Get features JSON of one device
    Features {
        #[command(flatten)]
        options: CommonOptions,

        #[command(flatten)]
        device: FeatureOptions,
    },

    /// Remove the cached access token
    Logout {
        #[command(flatten)]
        options: LogoutOptions,
    },

    /// Print the version number
    Version,
}

/// Credentials and token cache options shared by the query commands
#[derive(clap::Args, Debug, Clone)]
pub struct CommonOptions {
    /// Username
    #[arg(short, long, env = "VSQUERY_USER")]
    pub user: String,

    /// Password
    #[arg(short, long, env = "VSQUERY_PASS", hide_env_values = true)]
    pub pass: String,

    /// Client ID
    #[arg(short, long, env = "VSQUERY_CLIENT")]
    pub client: String,

    /// Redirect URI [default: http://localhost:4200/]
    #[arg(short, long)]
    pub redirect: Option<String>,

    /// Use cache
    #[arg(short = 'C', long)]
    pub use_cache: bool,

    #[command(flatten)]
    pub cache: CacheLocation,
}

/// Where the token record lives
#[derive(clap::Args, Debug, Clone, Default)]
pub struct CacheLocation {
    /// Cache path [default: /tmp]
    #[arg(short = 'P', long)]
    pub cache_path: Option<PathBuf>,

    /// Cache key scope: shared or per-client [default: shared]
    #[arg(long)]
    pub cache_scope: Option<CacheKeyScope>,
}

/// Device selection for the features command
#[derive(clap::Args, Debug, Clone)]
pub struct FeatureOptions {
    /// Gateway ID
    #[arg(short, long = "gate")]
    pub gateway_id: String,

    /// Installation ID
    #[arg(short, long = "inst")]
    pub installation_id: String,

    /// Device ID
    #[arg(short, long = "dev", default_value = "0")]
    pub device_id: String,
}

/// Options for removing a cached token
#[derive(clap::Args, Debug, Clone)]
pub struct LogoutOptions {
    /// Client ID
    #[arg(short, long, env = "VSQUERY_CLIENT")]
    pub client: String,

    #[command(flatten)]
    pub cache: CacheLocation,
}
