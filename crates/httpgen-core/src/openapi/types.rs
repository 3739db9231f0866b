//! Document object model handed from the loader to the renderer.
//!
//! Only the parts of an OpenAPI document that matter for request
//! collections are kept. Everything here is built once per run and never
//! mutated afterwards.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Parsed OpenAPI document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub title: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub servers: Vec<Server>,
    /// Paths keyed by their template; iteration order is lexicographic
    pub paths: BTreeMap<String, PathItem>,
    /// Document-wide security requirements
    pub security: Vec<serde_json::Value>,
}

impl Document {
    /// Total number of (path, method) pairs
    pub fn operation_count(&self) -> usize {
        self.paths.values().map(|item| item.operations.len()).sum()
    }

    pub fn has_security(&self) -> bool {
        !self.security.is_empty()
    }
}

/// A server entry, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    pub description: Option<String>,
}

/// Operations declared on one path, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathItem {
    pub operations: Vec<(HttpMethod, Operation)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Operation {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub operation_id: Option<String>,
    /// Whether the request body carries a JSON media type
    pub json_request_body: bool,
    pub security: Vec<serde_json::Value>,
    pub parameters: Vec<Parameter>,
}

impl Operation {
    pub fn has_security(&self) -> bool {
        !self.security.is_empty()
    }
}

/// A parameter reference kept for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
}

/// HTTP method of an operation.
///
/// Declaration order of the variants is the rendering priority; anything
/// not in the list is `Other` and sorts after all of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
    Other(String),
}

impl HttpMethod {
    pub fn parse(method: &str) -> Self {
        match method.to_ascii_lowercase().as_str() {
            "get" => Self::Get,
            "post" => Self::Post,
            "put" => Self::Put,
            "patch" => Self::Patch,
            "delete" => Self::Delete,
            "head" => Self::Head,
            "options" => Self::Options,
            "trace" => Self::Trace,
            other => Self::Other(other.to_string()),
        }
    }

    /// Position in the rendering order; unlisted methods share the last rank
    pub fn priority(&self) -> usize {
        match self {
            Self::Get => 0,
            Self::Post => 1,
            Self::Put => 2,
            Self::Patch => 3,
            Self::Delete => 4,
            Self::Head => 5,
            Self::Options => 6,
            Self::Trace => 7,
            Self::Other(_) => 8,
        }
    }

    pub fn is_standard(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Methods that get a request body placeholder
    pub fn takes_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
            Self::Head => "head",
            Self::Options => "options",
            Self::Trace => "trace",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}
