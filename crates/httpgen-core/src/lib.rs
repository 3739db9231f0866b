//! httpgen Core Library
//!
//! This library converts OpenAPI (Swagger) documents, read from a local file
//! or an http(s) URL, into `.http` request collections for editor-integrated
//! HTTP clients.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod generate;
pub mod openapi;
pub mod output;
pub mod source;
pub mod templates;

pub use crate::{
    config::{Config, ValidationPolicy},
    error::{Error, Result},
    generate::{generate, GenerationReport},
    openapi::{Diagnostics, Document},
    source::{SourceDescriptor, SourceKind},
    templates::RequestRenderer,
};
