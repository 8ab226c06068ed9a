//! Error handling with context pattern
//!
//! Caller mistakes (unknown command, missing or malformed parameter, unknown
//! story) are surfaced as typed errors. Upstream failures (`Fetch`, `Decode`)
//! never leave the item store boundary: they are logged there and degrade to
//! empty or partial results.

use thiserror::Error;

use crate::types::ItemId;

/// Result type alias for Hacker News MCP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Hacker News MCP operations
#[derive(Debug, Error)]
pub enum Error {
    /// Command name is not one of latest, top, best, history, comments
    #[error("Unknown command: {command}. Available commands: latest, top, best, history, comments")]
    UnknownCommand { command: String },

    /// A command that needs a parameter received none
    #[error("Command '{command}' requires a parameter (usage: {usage})")]
    MissingParameter {
        command: &'static str,
        usage: &'static str,
    },

    /// Parameter present but not a positive `--<number>` literal
    #[error("Invalid parameter '{value}' for command '{command}' (usage: {usage})")]
    InvalidParameter {
        command: &'static str,
        value: String,
        usage: &'static str,
    },

    /// The resolved story ID does not exist upstream
    #[error("No story found with ID {id}")]
    NotFound { id: ItemId },

    /// Transport failure talking to the item store
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with a body that is not the expected JSON
    #[error("Unexpected response from {url}: {details}")]
    Decode { url: String, details: String },

    /// Invalid MCP request
    #[error("Invalid MCP request: {message}")]
    InvalidRequest { message: String },

    /// Unknown tool requested
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    /// Serialization/deserialization error
    #[error("Serialization error in {context}: {source}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Whether the error was caused by the caller rather than the upstream store
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Error::UnknownCommand { .. }
                | Error::MissingParameter { .. }
                | Error::InvalidParameter { .. }
                | Error::NotFound { .. }
                | Error::InvalidRequest { .. }
                | Error::UnknownTool { .. }
        )
    }
}

/// Extension trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn with_context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ErrorContext<T> for std::result::Result<T, reqwest::Error> {
    fn with_context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Fetch {
            url: context.into(),
            source: e,
        })
    }
}

impl<T> ErrorContext<T> for std::result::Result<T, serde_json::Error> {
    fn with_context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Serialization {
            context: context.into(),
            source: e,
        })
    }
}
