//! Table-of-contents manifest (`documentation.yml`).
//!
//! ```yaml
//! toc:
//!   - name: Measurement
//!   - along
//!   - area
//! paths:
//!   Feature: https://tools.ietf.org/html/rfc7946#section-3.2
//! ```

use crate::error::DocsError;
use crate::output::{Group, ModuleEntry, SiteConfig};
use crate::render::Links;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub toc: Vec<TocEntry>,
    #[serde(default)]
    pub paths: BTreeMap<String, String>,
}

/// A group marker (`- name: Measurement`) or a module reference (`- along`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TocEntry {
    Group { name: String },
    Module(String),
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Output skeleton: every group with placeholder entries, in TOC order.
    pub fn skeleton(&self) -> Result<SiteConfig, DocsError> {
        let mut config = SiteConfig::default();
        for entry in &self.toc {
            match entry {
                TocEntry::Group { name } => config.modules.push(Group {
                    group: name.clone(),
                    modules: Vec::new(),
                }),
                TocEntry::Module(name) => {
                    let group = config
                        .modules
                        .last_mut()
                        .ok_or_else(|| DocsError::ModuleOutsideGroup { name: name.clone() })?;
                    group.modules.push(ModuleEntry::placeholder(name.as_str()));
                }
            }
        }

        let mut seen = HashSet::new();
        for entry in config.entries() {
            if !seen.insert(entry.name.as_str()) {
                warn!(
                    "module `{}` is listed more than once; only the first entry is filled",
                    entry.name
                );
            }
        }
        Ok(config)
    }

    pub fn links(&self) -> Links {
        Links::new(self.paths.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}
