use clap::{Parser, Subcommand};
use core_config::hacker_news::HackerNewsConfig;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "hn-mcp")]
#[command(about = "Browse Hacker News from an MCP host or the shell", version)]
pub struct Cli {
    /// Hacker News API root (overrides HN_API_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds (overrides HN_REQUEST_TIMEOUT_SECS)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Commands {
    /// Serve MCP over stdin/stdout (default)
    Serve,

    /// Run one command and print the result, e.g. `call top --5`
    Call {
        /// latest, top, best, history, or comments
        command: String,

        /// Optional parameter such as --10 or --12345678
        #[arg(allow_hyphen_values = true)]
        param: Option<String>,
    },
}

impl Cli {
    /// Apply command-line overrides on top of the environment configuration
    pub fn apply_overrides(&self, mut config: HackerNewsConfig) -> HackerNewsConfig {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        config
    }
}
