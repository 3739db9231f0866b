//! Base endpoint selection.

use crate::openapi::Document;
use crate::Error;

/// Pick the base URL requests are sent to.
///
/// A non-empty override always wins; otherwise the first declared server is
/// used. With neither, the run cannot proceed.
pub fn resolve_endpoint(document: &Document, endpoint_override: Option<&str>) -> crate::Result<String> {
    if let Some(endpoint) = endpoint_override.map(str::trim).filter(|e| !e.is_empty()) {
        log::debug!("Using endpoint override {endpoint}");
        return Ok(endpoint.to_string());
    }

    document
        .servers
        .first()
        .map(|server| server.url.clone())
        .ok_or(Error::NoEndpointResolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::Server;

    fn document(urls: &[&str]) -> Document {
        Document {
            servers: urls
                .iter()
                .map(|url| Server {
                    url: url.to_string(),
                    description: None,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_override_wins() {
        let doc = document(&["https://a.example"]);
        assert_eq!(
            resolve_endpoint(&doc, Some("https://b.example")).unwrap(),
            "https://b.example"
        );
    }

    #[test]
    fn test_first_server_is_used() {
        let doc = document(&["https://a.example", "https://c.example"]);
        assert_eq!(resolve_endpoint(&doc, None).unwrap(), "https://a.example");
        assert_eq!(resolve_endpoint(&doc, Some("")).unwrap(), "https://a.example");
    }

    #[test]
    fn test_no_servers_and_no_override_fails() {
        let err = resolve_endpoint(&document(&[]), None).unwrap_err();
        assert!(matches!(err, Error::NoEndpointResolved));
    }
}
