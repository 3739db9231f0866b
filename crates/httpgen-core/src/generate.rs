//! The conversion pipeline: source, document, endpoint, render, write.

use std::path::PathBuf;

use crate::{
    config::Config,
    endpoint::resolve_endpoint,
    error::Result,
    openapi::{self, Diagnostics},
    output::write_output,
    source,
    templates::{count_requests, RequestRenderer},
};

/// Outcome of a successful conversion
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub output_path: PathBuf,
    pub request_count: usize,
    pub diagnostics: Diagnostics,
}

/// Main entry point for conversion
pub async fn generate(config: &Config) -> Result<GenerationReport> {
    // 1. Resolve and read the source
    let source = source::resolve(&config.source)?;
    let text = source::read_source(&source, config.timeout()).await?;

    // 2. Parse, validate and apply the error policy
    let loaded = openapi::load(&text, &source)?;
    loaded.diagnostics.apply(config.policy())?;
    let document = loaded.document;

    // 3. Pick the base endpoint
    let endpoint = resolve_endpoint(&document, config.endpoint_override())?;
    log::info!("Resolved endpoint {endpoint}");

    for (path, item) in &document.paths {
        for (method, operation) in &item.operations {
            log::debug!(
                "{method} {path}: {} parameter(s)",
                operation.parameters.len()
            );
        }
    }

    // 4. Render entirely in memory so a failure never leaves a partial file
    let rendered = RequestRenderer::new()?.render(&document, &endpoint, &source)?;

    // 5. Write
    let output_path = write_output(config.output.as_deref(), &source.name(), &rendered).await?;

    Ok(GenerationReport {
        output_path,
        request_count: count_requests(&document),
        diagnostics: loaded.diagnostics,
    })
}
