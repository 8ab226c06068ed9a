//! Hacker News MCP Server
//!
//! An MCP (Model Context Protocol) server core for browsing Hacker News.
//! - Typestate HTTP client behind the `ItemStore` seam
//! - Join-all fan-out that degrades by omission
//! - Session listing so callers can say "comments of story 3"
//! - Command dispatcher with fail-fast validation

mod client;
mod dispatcher;
mod error;
mod fetcher;
mod mcp;
mod render;
mod session;
mod store;
mod text;
mod types;

pub use client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HackerNewsClient, Ready, Uninitialized};
pub use dispatcher::{
    Command, CommandName, CommandOutput, DEFAULT_LISTING_COUNT, Dispatcher, MAX_LISTING_COUNT,
    PARAM_MARKER, StoryRef,
};
pub use error::{Error, Result};
pub use fetcher::fetch_many;
pub use mcp::{McpHandler, McpRequest, McpResponse, PROTOCOL_VERSION, Tool, ToolOutput, codes};
pub use render::render;
pub use session::{SessionListing, SessionState};
pub use store::ItemStore;
pub use text::{clean_html, format_timestamp};
pub use types::{
    Comment, CommentView, Feed, Item, ItemId, ListingEntry, Story, StoryDetail, WireItem,
};
