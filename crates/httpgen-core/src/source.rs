//! Source resolution: deciding whether a source string names a local file or
//! a remote document, loading its text, and deriving a name for the output.
//!
//! # Examples
//!
//! ```
//! use httpgen_core::source::{derive_source_name, SourceDescriptor, SourceKind};
//!
//! let source = SourceDescriptor::classify("https://x.io/v1/my-api.json");
//! assert_eq!(source.kind, SourceKind::Url);
//! assert_eq!(derive_source_name(&source.raw), "my-api");
//! ```

// Internal imports (std, crate)
use std::path::Path;
use std::time::Duration;

use crate::Error;

// External imports (alphabetized)
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::fs;
use url::Url;

/// Name used whenever nothing better can be derived from the source
pub const FALLBACK_NAME: &str = "openapi";

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Where an OpenAPI document is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    File,
    Url,
}

/// A classified source string. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub raw: String,
    pub kind: SourceKind,
}

impl SourceDescriptor {
    /// Classify `source` without touching the file system or network.
    ///
    /// Absolute URIs with an `http` or `https` scheme are URLs; anything else
    /// is a file path (including Windows drive paths like `C:\spec.json`).
    pub fn classify(source: impl Into<String>) -> Self {
        let raw = source.into();
        let kind = match Url::parse(&raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => SourceKind::Url,
            _ => SourceKind::File,
        };
        Self { raw, kind }
    }

    pub fn is_url(&self) -> bool {
        self.kind == SourceKind::Url
    }

    /// Human-readable name used for the default output file
    pub fn name(&self) -> String {
        match self.kind {
            SourceKind::Url => derive_source_name(&self.raw),
            SourceKind::File => file_source_name(&self.raw),
        }
    }
}

/// Classify `source` and, for file sources, check that the file exists.
pub fn resolve(source: &str) -> crate::Result<SourceDescriptor> {
    let descriptor = SourceDescriptor::classify(source);
    if descriptor.kind == SourceKind::File && !Path::new(&descriptor.raw).exists() {
        return Err(Error::SourceNotFound(descriptor.raw.into()));
    }
    log::debug!("Resolved source {} as {:?}", descriptor.raw, descriptor.kind);
    Ok(descriptor)
}

/// Read the raw document text for a resolved source.
pub async fn read_source(source: &SourceDescriptor, timeout: Duration) -> crate::Result<String> {
    match source.kind {
        SourceKind::Url => fetch(&source.raw, timeout).await,
        SourceKind::File => {
            let path = Path::new(&source.raw);
            fs::read_to_string(path).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::SourceNotFound(path.to_path_buf())
                } else {
                    Error::Io(e)
                }
            })
        }
    }
}

/// Download a remote document, bounded by `timeout`.
///
/// Exceeding the timeout yields [`Error::FetchTimedOut`]; connection errors
/// and non-success statuses yield [`Error::FetchFailed`]. No retries.
pub async fn fetch(url: &str, timeout: Duration) -> crate::Result<String> {
    log::info!("Downloading OpenAPI spec from {} (timeout {:?})", url, timeout);

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| fetch_error(url, timeout, e))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| fetch_error(url, timeout, e))?;

    if !response.status().is_success() {
        return Err(Error::FetchFailed {
            url: url.to_string(),
            message: format!("HTTP {}", response.status()),
        });
    }

    response
        .text()
        .await
        .map_err(|e| fetch_error(url, timeout, e))
}

fn fetch_error(url: &str, timeout: Duration, e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::FetchTimedOut {
            url: url.to_string(),
            timeout,
        }
    } else {
        Error::FetchFailed {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

/// Derive an output name from a URL source.
///
/// Uses the last path segment when it looks like a file name (contains a
/// `.`), minus its extension. Otherwise uses the host without a leading
/// `www.`. Falls back to `openapi` when the URL does not parse or the result
/// is empty.
pub fn derive_source_name(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return FALLBACK_NAME.to_string();
    };

    let last_segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| segment.contains('.'));

    if let Some(segment) = last_segment {
        let stem = segment
            .rsplit_once('.')
            .map_or(segment, |(stem, _)| stem);
        return sanitize_filename(stem);
    }

    match parsed.host_str() {
        Some(host) => sanitize_filename(host.strip_prefix("www.").unwrap_or(host)),
        None => FALLBACK_NAME.to_string(),
    }
}

/// Make `name` safe to use as a file name on any platform.
///
/// Trims surrounding whitespace, turns inner whitespace runs into `_`, and
/// replaces characters illegal in file names with `_`. Idempotent; an empty
/// result becomes `openapi`.
pub fn sanitize_filename(name: &str) -> String {
    let collapsed = WHITESPACE_RE.replace_all(name.trim(), "_");
    let sanitized: String = collapsed
        .chars()
        .map(|c| if is_illegal_filename_char(c) { '_' } else { c })
        .collect();

    if sanitized.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        sanitized
    }
}

fn is_illegal_filename_char(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || c.is_control()
}

fn file_source_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_NAME)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_classify() {
        assert!(SourceDescriptor::classify("https://api.example.com/spec.json").is_url());
        assert!(SourceDescriptor::classify("http://localhost:8080/openapi").is_url());
        assert!(!SourceDescriptor::classify("ftp://example.com/spec.json").is_url());
        assert!(!SourceDescriptor::classify("specs/openapi.yaml").is_url());
        assert!(!SourceDescriptor::classify(r"C:\specs\openapi.yaml").is_url());
    }

    #[test]
    fn test_derive_source_name_from_file_segment() {
        assert_eq!(derive_source_name("https://x.io/v1/my-api.json"), "my-api");
        assert_eq!(
            derive_source_name("https://petstore3.swagger.io/api/v3/openapi.json"),
            "openapi"
        );
        assert_eq!(derive_source_name("https://x.io/specs/v2.1.yaml"), "v2.1");
        assert_eq!(derive_source_name("https://x.io/v1/.json"), FALLBACK_NAME);
    }

    #[test]
    fn test_derive_source_name_from_host() {
        assert_eq!(derive_source_name("https://api.github.com/"), "api.github.com");
        assert_eq!(derive_source_name("https://www.example.com/api/docs"), "example.com");
    }

    #[test]
    fn test_derive_source_name_fallback() {
        assert_eq!(derive_source_name("not a url"), FALLBACK_NAME);
    }

    #[test]
    fn test_file_source_name() {
        let source = SourceDescriptor::classify("specs/petstore.v3.yaml");
        assert_eq!(source.name(), "petstore.v3");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename(""), "openapi");
        assert_eq!(sanitize_filename("   "), "openapi");
        assert_eq!(sanitize_filename(" my  api "), "my_api");
        assert_eq!(sanitize_filename("a:b/c?d"), "a_b_c_d");
    }

    #[test]
    fn test_sanitize_filename_is_idempotent() {
        let inputs = ["", " x ", "a\tb\nc", "<>:\"/\\|?*", "pet store:v2", "___", "ok"];
        for input in inputs {
            let once = sanitize_filename(input);
            assert_eq!(sanitize_filename(&once), once, "input {input:?}");
        }
    }

    #[test]
    fn test_resolve_missing_file() {
        let err = resolve("definitely/not/here/openapi.json").unwrap_err();
        assert!(matches!(err, Error::SourceNotFound(_)));
    }

    #[tokio::test]
    async fn test_read_file_source() -> crate::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("spec.json");
        tokio::fs::write(&path, "{}").await?;

        let source = resolve(path.to_str().unwrap())?;
        let text = read_source(&source, Duration::from_secs(1)).await?;
        assert_eq!(text, "{}");
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_times_out() -> crate::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Ok((socket, _)) = listener.accept().await {
                // Hold the connection open without answering
                tokio::time::sleep(Duration::from_secs(5)).await;
                drop(socket);
            }
        });

        let url = format!("http://{addr}/openapi.json");
        let err = fetch(&url, Duration::from_millis(200)).await.unwrap_err();
        assert!(matches!(err, Error::FetchTimedOut { .. }), "got {err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_not_found_is_fetch_failure() -> crate::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(b"HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                    .await;
            }
        });

        let url = format!("http://{addr}/missing.json");
        let err = fetch(&url, Duration::from_secs(5)).await.unwrap_err();
        match err {
            Error::FetchFailed { message, .. } => assert!(message.contains("404")),
            other => panic!("expected FetchFailed, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_success() -> crate::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let body = r#"{"openapi":"3.0.0"}"#;
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });

        let url = format!("http://{addr}/openapi.json");
        let text = fetch(&url, Duration::from_secs(5)).await?;
        assert_eq!(text, r#"{"openapi":"3.0.0"}"#);
        Ok(())
    }
}
