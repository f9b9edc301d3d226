//! # ucdmerge - Unicode Character Database merge engine
//!
//! Merges several UCD source files into one normalized record per codepoint.
//!
//! ucdmerge provides:
//! - A canonical per-codepoint record model ([`CodepointRecord`])
//! - A repertoire loader for the flattened UCD XML export
//! - Enrichers for `Index.txt`, `NamesList.txt` and `ScriptExtensions.txt`
//! - Keyed-map JSON and newline-delimited JSON persistence
//! - An emoji table built from `emoji-test.txt` and `emoji-data.txt`

use std::path::PathBuf;

pub mod codepoint;
pub mod map;
pub mod diagnostics;
pub mod repertoire;
pub mod enrich;
pub mod storage;
pub mod pipeline;
pub mod emoji;
pub mod output;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use codepoint::{CaseKind, CodepointRecord};
pub use map::{CodepointMap, MapStats};
pub use diagnostics::{Diagnostics, RecordingDiagnostics, TracingDiagnostics};
pub use repertoire::{RawChar, RepertoireLoader};
pub use enrich::{EnrichStats, Enricher, EnricherPipeline};
pub use pipeline::{Pipeline, PipelinePaths, RunSummary};

/// Result type alias for ucdmerge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for ucdmerge operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Source file does not exist: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("Invalid codepoint: {0}")]
    InvalidCode(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Malformed name-alias: {0}")]
    MalformedAlias(String),
}
