//! Configuration for a single httpgen conversion run.
//!
//! This module defines the `Config` struct describing where the OpenAPI
//! document comes from, where the `.http` file goes, and how validation
//! problems are treated. A config can be created programmatically or loaded
//! from a YAML file.
//!
//! # Examples
//!
//! ```no_run
//! use httpgen_core::config::Config;
//!
//! let mut config = Config::new("https://petstore3.swagger.io/api/v3/openapi.json");
//! config.endpoint = Some("http://localhost:8080".to_string());
//! config.ignore_errors = true;
//! ```

// Internal imports (std, crate)
use std::path::{Path, PathBuf};
use std::time::Duration;

// External imports (alphabetized)
use serde::Deserialize;
use tokio::fs;

/// Default network fetch timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for one OpenAPI to `.http` conversion
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Local file path or http(s) URL of the OpenAPI document
    #[serde(default)]
    pub source: String,

    /// Base URL overriding the servers declared in the document
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Output file path; derived from the source name when absent
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Proceed even if the document has validation errors
    #[serde(default)]
    pub ignore_errors: bool,

    /// Surface diagnostics and request counts
    #[serde(default)]
    pub verbose: bool,

    /// Network fetch timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// How the document loader reacts to validation errors.
///
/// Derived from the ignore and verbose flags so that every combination of
/// the two maps onto exactly one behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// Abort on any validation error
    Fail,
    /// Report errors and warnings, then continue
    WarnAndProceed,
    /// Continue without reporting
    Proceed,
}

impl ValidationPolicy {
    pub fn from_flags(ignore_errors: bool, verbose: bool) -> Self {
        match (ignore_errors, verbose) {
            (false, _) => Self::Fail,
            (true, true) => Self::WarnAndProceed,
            (true, false) => Self::Proceed,
        }
    }
}

impl Config {
    /// Create a new Config with default values
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            endpoint: None,
            output: None,
            ignore_errors: false,
            verbose: false,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Validation policy implied by the ignore and verbose flags
    pub fn policy(&self) -> ValidationPolicy {
        ValidationPolicy::from_flags(self.ignore_errors, self.verbose)
    }

    /// Fetch timeout for remote sources
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Endpoint override, if one was given and is non-empty
    pub fn endpoint_override(&self) -> Option<&str> {
        self.endpoint.as_deref().filter(|e| !e.trim().is_empty())
    }

    /// Load configuration from a YAML file. Missing fields take their
    /// defaults, so a file may hold only the settings it wants to pin.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
