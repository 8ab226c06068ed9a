//! Hacker News MCP Server - Entry Point
//!
//! Serves the `hn` tool over stdio, or runs a single command from the shell.

#[tokio::main]
async fn main() -> eyre::Result<()> {
    hn_mcp_server::run().await
}
