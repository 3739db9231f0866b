//! Structural validation of raw OpenAPI documents.
//!
//! Validation never fails by itself; it collects [`Diagnostics`] and the
//! caller decides what to do with them through a [`ValidationPolicy`].

use std::collections::HashSet;

use serde_json::Value as JsonValue;

use super::operation_entries;
use crate::config::ValidationPolicy;
use crate::Error;

/// Errors and warnings found in a document, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Diagnostics {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Surface the diagnostics according to `policy`, failing with
    /// [`Error::ValidationFailed`] when errors are not being ignored.
    pub fn apply(&self, policy: ValidationPolicy) -> crate::Result<()> {
        match policy {
            ValidationPolicy::Fail => {
                for warning in &self.warnings {
                    log::warn!("{warning}");
                }
                if self.has_errors() {
                    return Err(Error::ValidationFailed {
                        errors: self.errors.clone(),
                    });
                }
            }
            ValidationPolicy::WarnAndProceed => {
                for error in &self.errors {
                    log::warn!("validation error (ignored): {error}");
                }
                for warning in &self.warnings {
                    log::warn!("{warning}");
                }
            }
            ValidationPolicy::Proceed => {
                for message in self.errors.iter().chain(&self.warnings) {
                    log::debug!("{message}");
                }
            }
        }
        Ok(())
    }
}

/// OpenAPI family a document claims to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecVersion {
    Swagger2,
    OpenApi30,
    OpenApi3x,
    Unknown,
}

impl SpecVersion {
    /// Read the `openapi` (or legacy `swagger`) field. Unquoted YAML versions
    /// such as `swagger: 2.0` arrive as numbers and are read as their text.
    pub fn detect(json: &JsonValue) -> Option<(Self, String)> {
        if let Some(version) = json.get("openapi").and_then(scalar_text) {
            let kind = if version.starts_with("3.0") {
                Self::OpenApi30
            } else if version.starts_with("3.") {
                Self::OpenApi3x
            } else {
                Self::Unknown
            };
            return Some((kind, version));
        }
        json.get("swagger").and_then(scalar_text).map(|version| {
            let kind = if version.starts_with("2.") {
                Self::Swagger2
            } else {
                Self::Unknown
            };
            (kind, version)
        })
    }
}

pub(crate) fn scalar_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Collect diagnostics for a raw document.
pub fn validate(json: &JsonValue) -> Diagnostics {
    let mut diagnostics = Diagnostics::default();

    let version = SpecVersion::detect(json);
    match &version {
        None => diagnostics.error("missing required field 'openapi'"),
        Some((SpecVersion::Swagger2, v)) => diagnostics.warning(format!(
            "Swagger {v} document; converting on a best-effort basis"
        )),
        Some((SpecVersion::OpenApi3x, v)) => diagnostics.warning(format!(
            "OpenAPI {v} is newer than 3.0; schema-level validation skipped"
        )),
        Some((SpecVersion::Unknown, v)) => {
            diagnostics.warning(format!("unrecognised OpenAPI version '{v}'"))
        }
        Some((SpecVersion::OpenApi30, _)) => {}
    }

    validate_info(json, &mut diagnostics);
    validate_servers(json, &mut diagnostics);
    validate_paths(json, &mut diagnostics);

    if !diagnostics.has_errors() && matches!(version, Some((SpecVersion::OpenApi30, _))) {
        if let Err(e) = serde_json::from_value::<openapiv3::OpenAPI>(stringify_versions(json)) {
            diagnostics.error(format!("document does not conform to OpenAPI 3.0: {e}"));
        }
    }

    diagnostics
}

/// Copy of `json` with numeric `openapi` and `info.version` turned into
/// strings, which is how the typed model expects them.
fn stringify_versions(json: &JsonValue) -> JsonValue {
    let mut json = json.clone();
    for pointer in ["/openapi", "/info/version"] {
        if let Some(field) = json.pointer_mut(pointer) {
            if field.is_number() {
                *field = JsonValue::String(field.to_string());
            }
        }
    }
    json
}

fn validate_info(json: &JsonValue, diagnostics: &mut Diagnostics) {
    let Some(info) = json.get("info").and_then(JsonValue::as_object) else {
        diagnostics.error("missing required field 'info'");
        return;
    };
    if info.get("title").and_then(JsonValue::as_str).is_none() {
        diagnostics.error("missing required field 'info.title'");
    }
    if !info
        .get("version")
        .is_some_and(|v| v.is_string() || v.is_number())
    {
        diagnostics.error("missing required field 'info.version'");
    }
}

fn validate_servers(json: &JsonValue, diagnostics: &mut Diagnostics) {
    let declared = json
        .get("servers")
        .and_then(JsonValue::as_array)
        .is_some_and(|servers| !servers.is_empty())
        || json.get("host").and_then(JsonValue::as_str).is_some();
    if !declared {
        diagnostics.warning("no servers declared; an endpoint override will be required");
    }
}

fn validate_paths(json: &JsonValue, diagnostics: &mut Diagnostics) {
    let Some(paths) = json.get("paths").and_then(JsonValue::as_object) else {
        diagnostics.error("missing required field 'paths'");
        return;
    };

    let mut operation_ids = HashSet::new();
    for (path, item) in paths {
        if !path.starts_with('/') {
            diagnostics.error(format!("path '{path}' must begin with '/'"));
        }
        let Some(item) = item.as_object() else {
            diagnostics.error(format!("path '{path}' is not an object"));
            continue;
        };
        if item.contains_key("$ref") {
            diagnostics.warning(format!("path '{path}' uses $ref, which is not followed"));
        }

        let operations = operation_entries(item);
        if operations.is_empty() && !item.contains_key("$ref") {
            diagnostics.warning(format!("path '{path}' declares no operations"));
        }
        for (method, operation) in operations {
            if !method.is_standard() {
                diagnostics.warning(format!(
                    "non-standard method '{}' on path '{path}'",
                    method.as_str()
                ));
            }
            if operation.get("responses").is_none() {
                diagnostics.error(format!(
                    "operation {method} {path} is missing required field 'responses'"
                ));
            }
            if let Some(id) = operation.get("operationId").and_then(JsonValue::as_str) {
                if !operation_ids.insert(id.to_string()) {
                    diagnostics.error(format!("duplicate operationId '{id}'"));
                }
            }
        }
    }
}
