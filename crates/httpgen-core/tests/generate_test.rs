//! End-to-end tests for the conversion pipeline

use std::path::{Path, PathBuf};

use httpgen_core::{generate, Config, Error};
use tempfile::tempdir;

fn fixture(name: &str) -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let base_path = Path::new(manifest_dir).parent().unwrap().parent().unwrap();
    base_path
        .join("tests/fixtures/openapi")
        .join(name)
        .to_str()
        .unwrap()
        .to_string()
}

fn config_for(name: &str, output: PathBuf) -> Config {
    let mut config = Config::new(fixture(name));
    config.output = Some(output);
    config
}

/// Split rendered output into request blocks (everything after each `###`)
fn request_blocks(output: &str) -> Vec<&str> {
    output.split("### ").skip(1).collect()
}

#[tokio::test]
async fn test_petstore_scenario() -> httpgen_core::Result<()> {
    let dir = tempdir()?;
    let output_path = dir.path().join("petstore.http");
    let config = config_for("petstore.yaml", output_path.clone());

    let report = generate(&config).await?;
    assert_eq!(report.output_path, output_path);
    assert_eq!(report.request_count, 5);
    assert!(report.diagnostics.errors.is_empty());

    let output = tokio::fs::read_to_string(&output_path).await?;
    assert!(output.contains("@endpoint = https://petstore.swagger.io/v2\n"));
    assert!(output.contains("# Production server\n@endpoint"));
    assert!(output.contains("# Swagger Petstore\n# A sample pet store server.\n# Used to exercise"));
    assert!(output.contains("# Version: 1.0.7\n"));
    assert!(!output.contains("# Source:"));
    assert_eq!(output.matches("Content-Type: application/json").count(), 2);

    let blocks = request_blocks(&output);
    assert_eq!(blocks.len(), 5);

    let request_lines: Vec<&str> = blocks
        .iter()
        .map(|block| block.lines().nth(1).unwrap_or_default())
        .collect();
    assert_eq!(
        request_lines,
        vec![
            "GET {{endpoint}}/pets",
            "POST {{endpoint}}/pets",
            "GET {{endpoint}}/pets/{petId}",
            "PUT {{endpoint}}/pets/{petId}",
            "DELETE {{endpoint}}/pets/{petId}",
        ]
    );

    let comments: Vec<&str> = blocks
        .iter()
        .map(|block| block.lines().next().unwrap_or_default())
        .collect();
    assert_eq!(
        comments,
        vec![
            "List all pets",
            "Add a new pet to the store",
            "Returns a single pet.",
            "Update an existing pet",
            "deletePet",
        ]
    );

    // Only the POST declares security
    assert!(blocks[1].contains("# Authorization: Bearer {{token}}"));
    assert!(blocks[1].contains("# X-API-Key: {{apiKey}}"));
    assert!(!blocks[0].contains("Authorization"));
    assert!(!blocks[2].contains("Authorization"));

    // Body placeholders for POST and PUT only
    assert_eq!(output.matches("// Add your request body here").count(), 2);
    assert!(blocks[3].contains("{\n  // Add your request body here\n}"));
    Ok(())
}

#[tokio::test]
async fn test_validation_errors_fail_without_writing() -> httpgen_core::Result<()> {
    let dir = tempdir()?;
    let output_path = dir.path().join("broken.http");
    let config = config_for("invalid.json", output_path.clone());

    let err = generate(&config).await.unwrap_err();
    match err {
        Error::ValidationFailed { errors } => {
            assert!(errors.iter().any(|e| e.contains("info.version")));
            assert!(errors.iter().any(|e| e.contains("GET /items")));
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
    assert!(!output_path.exists());
    Ok(())
}

#[tokio::test]
async fn test_ignore_errors_still_writes_output() -> httpgen_core::Result<()> {
    let dir = tempdir()?;
    let output_path = dir.path().join("broken.http");

    for verbose in [false, true] {
        let mut config = config_for("invalid.json", output_path.clone());
        config.ignore_errors = true;
        config.verbose = verbose;

        let report = generate(&config).await?;
        assert_eq!(report.request_count, 2);
        assert_eq!(report.diagnostics.errors.len(), 2);

        let output = tokio::fs::read_to_string(&output_path).await?;
        assert!(output.contains("@endpoint = https://broken.example.com\n"));
        assert!(output.contains("### Create item\nPOST {{endpoint}}/items\nContent-Type: application/json\n"));
    }
    Ok(())
}

#[tokio::test]
async fn test_missing_servers_require_override() -> httpgen_core::Result<()> {
    let dir = tempdir()?;
    let output_path = dir.path().join("status.http");

    let config = config_for("no_servers.json", output_path.clone());
    let err = generate(&config).await.unwrap_err();
    assert!(matches!(err, Error::NoEndpointResolved));
    assert!(!output_path.exists());

    let mut config = config_for("no_servers.json", output_path.clone());
    config.endpoint = Some("http://localhost:8080".into());
    let report = generate(&config).await?;
    assert_eq!(report.request_count, 1);

    let output = tokio::fs::read_to_string(&output_path).await?;
    assert!(output.contains("# API Endpoint\n@endpoint = http://localhost:8080\n"));
    assert!(output.contains("### getStatus\nGET {{endpoint}}/status\n"));
    Ok(())
}

#[tokio::test]
async fn test_override_beats_declared_server() -> httpgen_core::Result<()> {
    let dir = tempdir()?;
    let output_path = dir.path().join("petstore.http");
    let mut config = config_for("petstore.yaml", output_path.clone());
    config.endpoint = Some("https://staging.example.com".into());

    generate(&config).await?;
    let output = tokio::fs::read_to_string(&output_path).await?;
    assert!(output.contains("@endpoint = https://staging.example.com\n"));
    assert!(!output.contains("@endpoint = https://petstore.swagger.io/v2"));
    Ok(())
}

#[tokio::test]
async fn test_missing_source_file() {
    let config = Config::new("does/not/exist.yaml");
    let err = generate(&config).await.unwrap_err();
    assert!(matches!(err, Error::SourceNotFound(_)));
}
