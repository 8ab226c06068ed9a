//! Hacker News MCP Server
//!
//! Wires configuration, the HTTP item store, the session listing and the MCP
//! handler together.
//!
//! ## Architecture
//!
//! ```text
//! MCP host (stdin/stdout, JSON-RPC lines)
//!   ↓
//! McpHandler  ── tool "hn" {command, param?}
//!   ↓
//! Dispatcher ── SessionState (last listing)
//!   ↓ (join-all fan-out)
//! HackerNewsClient<Ready>
//!   ↓
//! hacker-news.firebaseio.com/v0
//! ```

mod cli;
mod stdio;

use clap::Parser;
use core_config::hacker_news::HackerNewsConfig;
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use eyre::{Result, WrapErr};
use hn_mcp::{Dispatcher, HackerNewsClient, McpHandler, SessionState, render};
use std::sync::Arc;
use tracing::info;

pub use cli::{Cli, Commands};

/// Run the server
///
/// 1. Installs color-eyre and tracing (stderr only)
/// 2. Loads `HackerNewsConfig` from the environment, then applies CLI overrides
/// 3. Builds one dispatcher with a fresh session listing
/// 4. Serves stdio, or executes a single `call` and prints the rendered text
///
/// # Errors
///
/// Returns an error if configuration is invalid, the HTTP client cannot be
/// built, stdio fails, or a one-shot `call` is rejected.
pub async fn run() -> Result<()> {
    install_color_eyre();
    let environment = Environment::from_env();
    init_tracing(&environment);

    let cli = Cli::parse();
    let config = HackerNewsConfig::from_env().wrap_err("Failed to load Hacker News configuration")?;
    let config = cli.apply_overrides(config);

    info!(
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.base_url,
        timeout_secs = config.request_timeout.as_secs(),
        "Starting Hacker News MCP server"
    );

    let dispatcher = build_dispatcher(&config)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let handler = McpHandler::new(dispatcher);
            stdio::serve(&handler, tokio::io::stdin(), tokio::io::stdout()).await
        }
        Commands::Call { command, param } => {
            let output = dispatcher
                .dispatch(&command, param.as_deref())
                .await
                .wrap_err_with(|| format!("Command '{}' failed", command))?;
            println!("{}", render(&output));
            Ok(())
        }
    }
}

fn build_dispatcher(config: &HackerNewsConfig) -> Result<Dispatcher<HackerNewsClient<hn_mcp::Ready>>> {
    let client = HackerNewsClient::new()
        .with_base_url(config.base_url.as_str())
        .with_timeout(config.request_timeout)
        .with_user_agent(config.user_agent.as_str())
        .init()
        .wrap_err("Failed to build HTTP client")?;

    Ok(Dispatcher::new(Arc::new(client), Arc::new(SessionState::new())))
}
