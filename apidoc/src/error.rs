//! Typed failures raised below the CLI layer.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocsError {
    /// A plain module name appeared in the TOC before the first group marker.
    #[error("module `{name}` is listed before any group in the manifest")]
    ModuleOutsideGroup { name: String },

    #[error("extractor command is empty")]
    EmptyExtractorCommand,

    #[error("failed to run extractor `{program}`")]
    ExtractorSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("extractor exited with {status} for {}: {stderr}", entry.display())]
    ExtractorFailed {
        entry: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    #[error("malformed documentation metadata for {}", entry.display())]
    MalformedMetadata {
        entry: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
