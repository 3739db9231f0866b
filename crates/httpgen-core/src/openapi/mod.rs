//! OpenAPI document loading.
//!
//! Raw text (JSON or YAML) is parsed into a JSON value, validated into
//! [`Diagnostics`], and lowered into the [`Document`] model the renderer
//! works from. Lowering is lenient so that documents with validation errors
//! can still be converted when errors are ignored.
//!
//! # Examples
//!
//! ```
//! use httpgen_core::openapi;
//! use httpgen_core::source::SourceDescriptor;
//!
//! # fn main() -> httpgen_core::Result<()> {
//! let text = r#"{"openapi": "3.0.0", "info": {"title": "T", "version": "1"}, "paths": {}}"#;
//! let loaded = openapi::load(text, &SourceDescriptor::classify("spec.json"))?;
//! assert_eq!(loaded.document.title.as_deref(), Some("T"));
//! # Ok(())
//! # }
//! ```

pub mod diagnostics;
pub mod types;

pub use diagnostics::{validate, Diagnostics, SpecVersion};
pub use types::{Document, HttpMethod, Operation, Parameter, PathItem, Server};

// Internal imports (std, crate)
use std::collections::BTreeMap;

use crate::source::SourceDescriptor;
use crate::Error;

// External imports (alphabetized)
use serde_json::{Map as JsonMap, Value as JsonValue};
use url::Url;

/// Path-item fields that never hold an operation
const RESERVED_PATH_FIELDS: &[&str] = &[
    "summary",
    "description",
    "servers",
    "parameters",
    "$ref",
    "additionalOperations",
];

/// A parsed document together with the diagnostics found while loading it
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document: Document,
    pub diagnostics: Diagnostics,
}

/// Parse and validate `text`.
///
/// Fails only when the text is not a JSON or YAML mapping at all; structural
/// problems are reported in the returned diagnostics.
pub fn load(text: &str, source: &SourceDescriptor) -> crate::Result<LoadedDocument> {
    let json = parse_content(text)?;
    let diagnostics = validate(&json);
    log::debug!(
        "Validated {}: {} error(s), {} warning(s)",
        source.raw,
        diagnostics.errors.len(),
        diagnostics.warnings.len()
    );

    let base = source
        .is_url()
        .then(|| Url::parse(&source.raw).ok())
        .flatten();
    let document = lower_document(&json, base.as_ref());
    Ok(LoadedDocument {
        document,
        diagnostics,
    })
}

/// Parse content as either JSON or YAML
pub fn parse_content(content: &str) -> crate::Result<JsonValue> {
    let json = match serde_json::from_str::<JsonValue>(content) {
        Ok(json) => json,
        Err(_) => serde_yaml::from_str::<JsonValue>(content)
            .map_err(|e| Error::parse(format!("content is neither valid JSON nor YAML: {e}")))?,
    };

    if !json.is_object() {
        return Err(Error::parse("document root must be a mapping"));
    }
    Ok(json)
}

/// Operations of a path item in declaration order.
pub(crate) fn operation_entries(item: &JsonMap<String, JsonValue>) -> Vec<(HttpMethod, &JsonValue)> {
    let mut operations: Vec<_> = item
        .iter()
        .filter(|(key, value)| {
            !RESERVED_PATH_FIELDS.contains(&key.as_str())
                && !key.starts_with("x-")
                && value.is_object()
        })
        .map(|(key, value)| (HttpMethod::parse(key), value))
        .collect();

    if let Some(additional) = item.get("additionalOperations").and_then(JsonValue::as_object) {
        operations.extend(
            additional
                .iter()
                .filter(|(_, value)| value.is_object())
                .map(|(key, value)| (HttpMethod::parse(key), value)),
        );
    }
    operations
}

fn lower_document(json: &JsonValue, base: Option<&Url>) -> Document {
    let info = json.get("info");
    let paths: BTreeMap<String, PathItem> = json
        .get("paths")
        .and_then(JsonValue::as_object)
        .map(|paths| {
            paths
                .iter()
                .filter_map(|(path, item)| {
                    let item = item.as_object()?;
                    Some((path.clone(), lower_path_item(json, item)))
                })
                .collect()
        })
        .unwrap_or_default();

    Document {
        title: info.and_then(|i| text_field(i, "title")),
        description: info.and_then(|i| text_field(i, "description")),
        version: info.and_then(|i| scalar_field(i, "version")),
        servers: extract_servers(json, base),
        paths,
        security: array_field(json, "security"),
    }
}

fn lower_path_item(root: &JsonValue, item: &JsonMap<String, JsonValue>) -> PathItem {
    let shared_parameters = item
        .get("parameters")
        .map(|p| extract_parameters(root, p))
        .unwrap_or_default();

    let operations = operation_entries(item)
        .into_iter()
        .map(|(method, operation)| {
            let lowered = lower_operation(root, operation, &shared_parameters);
            (method, lowered)
        })
        .collect();

    PathItem { operations }
}

fn lower_operation(root: &JsonValue, operation: &JsonValue, shared: &[Parameter]) -> Operation {
    let own = operation
        .get("parameters")
        .map(|p| extract_parameters(root, p))
        .unwrap_or_default();

    // Operation-level parameters override path-level ones with the same (name, in)
    let mut parameters: Vec<Parameter> = shared
        .iter()
        .filter(|p| !own.iter().any(|o| o.name == p.name && o.location == p.location))
        .cloned()
        .collect();
    parameters.extend(own);

    Operation {
        summary: text_field(operation, "summary"),
        description: text_field(operation, "description"),
        operation_id: text_field(operation, "operationId"),
        json_request_body: has_json_body(root, operation, &parameters),
        security: array_field(operation, "security"),
        parameters,
    }
}

fn has_json_body(root: &JsonValue, operation: &JsonValue, parameters: &[Parameter]) -> bool {
    if let Some(body) = operation.get("requestBody") {
        let body = resolve_ref(root, body).unwrap_or(body);
        return body
            .get("content")
            .and_then(JsonValue::as_object)
            .is_some_and(|content| content.keys().any(|media| is_json_media_type(media)));
    }

    // Swagger 2.0: a body parameter, consumed as JSON unless declared otherwise
    if parameters.iter().any(|p| p.location == "body") {
        let consumes = operation
            .get("consumes")
            .or_else(|| root.get("consumes"))
            .and_then(JsonValue::as_array);
        return match consumes {
            Some(types) => types
                .iter()
                .filter_map(JsonValue::as_str)
                .any(is_json_media_type),
            None => true,
        };
    }
    false
}

/// `application/json` or any `+json` structured syntax suffix
pub fn is_json_media_type(media_type: &str) -> bool {
    let essence = media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

fn extract_parameters(root: &JsonValue, parameters: &JsonValue) -> Vec<Parameter> {
    parameters
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|param| {
                    let param = resolve_ref(root, param).unwrap_or(param);
                    serde_json::from_value(param.clone()).ok()
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Follow a local `$ref` one level, if `value` is a reference
fn resolve_ref<'a>(root: &'a JsonValue, value: &JsonValue) -> Option<&'a JsonValue> {
    let reference = value.get("$ref").and_then(JsonValue::as_str)?;
    let pointer = reference.strip_prefix('#')?;
    root.pointer(pointer)
}

fn extract_servers(json: &JsonValue, base: Option<&Url>) -> Vec<Server> {
    if let Some(servers) = json.get("servers").and_then(JsonValue::as_array) {
        return servers
            .iter()
            .filter_map(|server| {
                let url = server.get("url").and_then(JsonValue::as_str)?;
                let url = substitute_variables(url, server.get("variables"));
                Some(Server {
                    url: absolutize(&url, base),
                    description: text_field(server, "description"),
                })
            })
            .collect();
    }

    // Fall back to Swagger 2.0 host + basePath format
    let Some(host) = json.get("host").and_then(JsonValue::as_str) else {
        return Vec::new();
    };
    let base_path = json
        .get("basePath")
        .and_then(JsonValue::as_str)
        .unwrap_or("");
    let scheme = match json.get("schemes").and_then(JsonValue::as_array) {
        Some(schemes) if schemes.iter().any(|s| s.as_str() == Some("https")) => "https",
        Some(schemes) => schemes.first().and_then(JsonValue::as_str).unwrap_or("https"),
        None => "https",
    };
    vec![Server {
        url: format!("{scheme}://{host}{base_path}"),
        description: None,
    }]
}

/// Replace `{name}` placeholders with the variable's default value
fn substitute_variables(url: &str, variables: Option<&JsonValue>) -> String {
    let Some(variables) = variables.and_then(JsonValue::as_object) else {
        return url.to_string();
    };
    variables.iter().fold(url.to_string(), |acc, (name, variable)| {
        match variable.get("default").and_then(JsonValue::as_str) {
            Some(default) => acc.replace(&format!("{{{name}}}"), default),
            None => acc,
        }
    })
}

/// Resolve a relative server URL against the document's own URL
fn absolutize(url: &str, base: Option<&Url>) -> String {
    if Url::parse(url).is_ok() {
        return url.to_string();
    }
    match base.and_then(|b| b.join(url).ok()) {
        Some(joined) => joined.to_string().trim_end_matches('/').to_string(),
        None => url.to_string(),
    }
}

fn text_field(value: &JsonValue, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(JsonValue::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Like [`text_field`] but also accepts numbers, as YAML reads `1.0` as a float
fn scalar_field(value: &JsonValue, key: &str) -> Option<String> {
    match value.get(key)? {
        JsonValue::Number(n) => Some(n.to_string()),
        _ => text_field(value, key),
    }
}

fn array_field(value: &JsonValue, key: &str) -> Vec<JsonValue> {
    value
        .get(key)
        .and_then(JsonValue::as_array)
        .cloned()
        .unwrap_or_default()
}
