//! Package discovery: one `package.json` per library component, with the
//! entry file that sits next to it.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// `name` from the descriptor, e.g. `@turf/along`
    pub name: String,
    /// Entry file handed to the extractor
    pub entry: PathBuf,
}

#[derive(Deserialize)]
struct Descriptor {
    name: String,
}

/// Expand `pattern` and load every matching descriptor. Results come back in
/// glob (lexical) order. A directory the glob cannot read is an error, not a
/// silently missing package.
pub fn discover(pattern: &str, entry_file: &str) -> Result<Vec<Package>> {
    let mut descriptors = Vec::new();
    for matched in
        glob::glob(pattern).with_context(|| format!("invalid glob pattern: {}", pattern))?
    {
        let path = matched.context("failed to expand package glob")?;
        if path.is_file() {
            descriptors.push(path);
        }
    }
    descriptors.sort();

    if descriptors.is_empty() {
        warn!("no package descriptors matched: {}", pattern);
    }

    descriptors
        .iter()
        .map(|path| load(path, entry_file))
        .collect()
}

fn load(descriptor: &Path, entry_file: &str) -> Result<Package> {
    let content = fs::read_to_string(descriptor)
        .with_context(|| format!("failed to read {}", descriptor.display()))?;
    let Descriptor { name } = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", descriptor.display()))?;

    let dir = descriptor.parent().unwrap_or_else(|| Path::new("."));
    let entry = dir.join(entry_file);
    debug!("found package {} ({})", name, entry.display());
    Ok(Package { name, entry })
}
