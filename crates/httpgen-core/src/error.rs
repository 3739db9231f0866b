//! Error handling for the httpgen conversion library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. Every failure terminates the
//! conversion run; nothing here is recovered from internally.
//!
//! # Examples
//!
//! ```
//! use httpgen_core::error::{Error, Result};
//!
//! fn might_fail(servers: &[String]) -> Result<&String> {
//!     servers.first().ok_or(Error::NoEndpointResolved)
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type for httpgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for httpgen operations
#[derive(Debug, Error)]
pub enum Error {
    /// The local source file does not exist
    #[error("source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Network-level failure or non-success status while fetching a remote spec
    #[error("failed to fetch OpenAPI spec from {url}: {message}")]
    FetchFailed { url: String, message: String },

    /// The remote fetch did not complete within the configured timeout
    #[error("timed out after {}s fetching OpenAPI spec from {url}", .timeout.as_secs_f64())]
    FetchTimedOut { url: String, timeout: Duration },

    /// The document has structural errors and errors are not being ignored
    #[error("OpenAPI document failed validation:\n{}", format_messages(.errors))]
    ValidationFailed { errors: Vec<String> },

    /// No endpoint override was given and the document declares no servers
    #[error("no endpoint resolved: pass --endpoint or declare a server in the document")]
    NoEndpointResolved,

    /// Content could not be parsed into a document at all
    #[error("parse error: {0}")]
    Parse(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Template engine error
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Self::Parse(msg.into())
    }
}

fn format_messages(messages: &[String]) -> String {
    messages
        .iter()
        .map(|m| format!("  - {m}"))
        .collect::<Vec<_>>()
        .join("\n")
}
