//! Boundary to the external documentation extractor.

use crate::error::DocsError;
use crate::metadata::Comment;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Produces documentation metadata for a package entry file.
///
/// `Ok(None)` means the extractor ran but returned nothing for the file.
pub trait Extractor {
    fn extract(&mut self, entry: &Path) -> Result<Option<Vec<Comment>>, DocsError>;
}

/// Runs an external command with the entry file appended as the last
/// argument and decodes the JSON array it prints on stdout.
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    program: String,
    args: Vec<String>,
}

impl CommandExtractor {
    /// Build from a whitespace-separated command line such as
    /// `npx documentation build --shallow --format json`.
    pub fn parse(command: &str) -> Result<Self, DocsError> {
        let mut words = command.split_whitespace().map(str::to_string);
        let program = words.next().ok_or(DocsError::EmptyExtractorCommand)?;
        Ok(Self {
            program,
            args: words.collect(),
        })
    }
}

impl Extractor for CommandExtractor {
    fn extract(&mut self, entry: &Path) -> Result<Option<Vec<Comment>>, DocsError> {
        debug!("running {} {:?} {}", self.program, self.args, entry.display());
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(entry)
            .output()
            .map_err(|source| DocsError::ExtractorSpawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DocsError::ExtractorFailed {
                entry: entry.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        decode(entry, &output.stdout)
    }
}

/// Decode extractor stdout. Blank output is "no result", not an error.
pub fn decode(entry: &Path, stdout: &[u8]) -> Result<Option<Vec<Comment>>, DocsError> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(stdout)
        .map(Some)
        .map_err(|source| DocsError::MalformedMetadata {
            entry: entry.to_path_buf(),
            source,
        })
}
