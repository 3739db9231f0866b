//! Request collection rendering.
//!
//! The renderer walks a [`Document`] in a fixed order (paths
//! lexicographically, methods by priority) and feeds the resulting contexts
//! through the embedded `requests.http.tera` template.
//!
//! # Examples
//!
//! ```
//! use httpgen_core::templates::format_as_comment;
//!
//! assert_eq!(format_as_comment("L1\nL2"), "L1\n# L2");
//! ```

pub mod types;

pub use types::{CollectionContext, RequestContext};

// Internal imports (std, crate)
use crate::openapi::{Document, HttpMethod, Operation, PathItem};
use crate::source::SourceDescriptor;

// External imports (alphabetized)
use chrono::{Local, NaiveDateTime};
use tera::{Context, Tera};

const TEMPLATE_NAME: &str = "requests.http";
const TEMPLATE_SOURCE: &str = include_str!("requests.http.tera");

const DEFAULT_TITLE: &str = "API";
const DEFAULT_ENDPOINT_COMMENT: &str = "API Endpoint";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders documents into `.http` request collections
pub struct RequestRenderer {
    tera: Tera,
}

impl RequestRenderer {
    pub fn new() -> crate::Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_template(TEMPLATE_NAME, TEMPLATE_SOURCE)?;
        Ok(Self { tera })
    }

    /// Render `document` against `endpoint`, stamped with the current local time
    pub fn render(
        &self,
        document: &Document,
        endpoint: &str,
        source: &SourceDescriptor,
    ) -> crate::Result<String> {
        self.render_at(document, endpoint, source, Local::now().naive_local())
    }

    /// Render with an explicit generation timestamp
    pub fn render_at(
        &self,
        document: &Document,
        endpoint: &str,
        source: &SourceDescriptor,
        generated_at: NaiveDateTime,
    ) -> crate::Result<String> {
        let collection = build_context(document, endpoint, source, generated_at);
        log::debug!(
            "Rendering {} request(s) for '{}'",
            collection.requests.len(),
            collection.title
        );
        let context = Context::from_serialize(&collection)?;
        Ok(self.tera.render(TEMPLATE_NAME, &context)?)
    }
}

/// Build the template context for a whole document
pub fn build_context(
    document: &Document,
    endpoint: &str,
    source: &SourceDescriptor,
    generated_at: NaiveDateTime,
) -> CollectionContext {
    let title = document.title.as_deref().unwrap_or(DEFAULT_TITLE);

    let mut banner = Vec::new();
    if let Some(description) = document.description.as_deref().filter(|d| *d != title) {
        banner.push(format_as_comment(description));
    }
    if let Some(version) = &document.version {
        banner.push(format!("Version: {version}"));
    }
    if source.is_url() {
        banner.push(format!("Source: {}", source.raw));
    }

    let endpoint_comment = document
        .servers
        .first()
        .and_then(|server| server.description.as_deref())
        .unwrap_or(DEFAULT_ENDPOINT_COMMENT);

    let requests = document
        .paths
        .iter()
        .flat_map(|(path, item)| {
            order_operations(item)
                .into_iter()
                .map(move |(method, operation)| {
                    request_context(document, path, method, operation)
                })
        })
        .collect();

    CollectionContext {
        title: format_as_comment(title),
        banner,
        generated_at: generated_at.format(TIMESTAMP_FORMAT).to_string(),
        endpoint_comment: format_as_comment(endpoint_comment),
        endpoint: endpoint.to_string(),
        requests,
    }
}

fn request_context(
    document: &Document,
    path: &str,
    method: &HttpMethod,
    operation: &Operation,
) -> RequestContext {
    let json_body = operation.json_request_body;
    RequestContext {
        comment: format_as_comment(&request_comment(path, method, operation)),
        method: method.to_string(),
        path: path.to_string(),
        json_body,
        secured: operation.has_security() || document.has_security(),
        body_placeholder: json_body && method.takes_body(),
    }
}

/// Comment line for a request: summary, then the first description line,
/// then the operationId, then `METHOD path`
pub fn request_comment(path: &str, method: &HttpMethod, operation: &Operation) -> String {
    if let Some(summary) = &operation.summary {
        return summary.clone();
    }
    if let Some(first_line) = operation
        .description
        .as_deref()
        .and_then(|d| d.lines().map(str::trim).find(|l| !l.is_empty()))
    {
        return first_line.to_string();
    }
    if let Some(id) = &operation.operation_id {
        return id.clone();
    }
    format!("{method} {path}")
}

/// Operations of a path in rendering order.
///
/// Sorting is stable, so methods outside the priority list keep their
/// declaration order after all listed ones.
pub fn order_operations(item: &PathItem) -> Vec<(&HttpMethod, &Operation)> {
    let mut operations: Vec<_> = item.operations.iter().map(|(m, op)| (m, op)).collect();
    operations.sort_by_key(|(method, _)| method.priority());
    operations
}

/// Number of request blocks a document renders to
pub fn count_requests(document: &Document) -> usize {
    document.operation_count()
}

/// Prefix every line after the first with `# ` so multi-line text stays
/// inside a comment
pub fn format_as_comment(text: &str) -> String {
    let mut lines = text.lines().map(str::trim_end);
    let first = lines.next().unwrap_or_default().to_string();
    lines.fold(first, |mut acc, line| {
        if line.is_empty() {
            acc.push_str("\n#");
        } else {
            acc.push_str("\n# ");
            acc.push_str(line);
        }
        acc
    })
}
