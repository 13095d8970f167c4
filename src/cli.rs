//! Command line arguments.

use clap::Parser;

use files_core::config::AppConfig;
use files_core::result::AppResult;

/// Files Manager process options.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Args {
    /// Configuration overlay loaded after `config/default.toml`.
    #[arg(long, env = "FILES_ENV", default_value = "development")]
    pub env: String,
}

impl Args {
    /// Load the configuration selected by these arguments.
    pub fn load_config(&self) -> AppResult<AppConfig> {
        AppConfig::load(&self.env)
    }
}
