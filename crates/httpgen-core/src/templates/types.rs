//! Serializable contexts fed to the request collection template

use serde::Serialize;

/// Everything the `.http` template needs for one document
#[derive(Clone, Debug, Serialize)]
pub struct CollectionContext {
    /// Document title, already comment-formatted
    pub title: String,
    /// Optional banner lines below the title (description, version, source)
    pub banner: Vec<String>,
    /// Generation timestamp, `yyyy-MM-dd HH:mm:ss`
    pub generated_at: String,
    /// Comment shown above the endpoint variable
    pub endpoint_comment: String,
    pub endpoint: String,
    pub requests: Vec<RequestContext>,
}

/// One rendered request block
#[derive(Clone, Debug, Serialize)]
pub struct RequestContext {
    pub comment: String,
    /// Upper-cased HTTP method
    pub method: String,
    /// Raw path template, `{param}` placeholders untouched
    pub path: String,
    pub json_body: bool,
    pub secured: bool,
    pub body_placeholder: bool,
}
