//! Site configuration model and the writer that persists it.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Root of `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub modules: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub group: String,
    pub modules: Vec<ModuleEntry>,
}

/// One documented symbol. `docs` stays `None` until the normalizer finds
/// metadata for `name`, and the entry then serializes as just
/// `{ name, hidden }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub name: String,
    pub hidden: bool,
    #[serde(flatten)]
    pub docs: Option<ModuleDocs>,
}

impl ModuleEntry {
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hidden: false,
            docs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDocs {
    pub parent: String,
    pub description: String,
    pub snippet: OrFalse<String>,
    pub example: OrFalse<String>,
    #[serde(rename = "hasMap")]
    pub has_map: bool,
    pub package: String,
    pub returns: OrFalse<Vec<OrFalse<TypedText>>>,
    pub params: OrFalse<Vec<OrFalse<ParamRow>>>,
    /// `null` when parameters exist but none is named `options`
    pub options: Option<OrFalse<Vec<OptionRow>>>,
    pub throws: OrFalse<Vec<OrFalse<TypedText>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedText {
    #[serde(rename = "type")]
    pub ty: OrFalse<String>,
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParamRow {
    pub argument: String,
    #[serde(rename = "Type")]
    pub ty: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OptionRow {
    pub prop: String,
    #[serde(rename = "Type")]
    pub ty: OrFalse<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub description: String,
}

/// A value, or the JSON literal `false` standing in for "not documented".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrFalse<T> {
    Value(T),
    False(False),
}

impl<T> From<Option<T>> for OrFalse<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => OrFalse::Value(v),
            None => OrFalse::False(False),
        }
    }
}

/// Unit type that only round-trips through the JSON literal `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct False;

impl Serialize for False {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(false)
    }
}

impl<'de> Deserialize<'de> for False {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match bool::deserialize(deserializer)? {
            false => Ok(False),
            true => Err(serde::de::Error::custom("expected `false`")),
        }
    }
}

impl SiteConfig {
    /// First entry named `name`, across all groups.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut ModuleEntry> {
        self.modules
            .iter_mut()
            .flat_map(|group| group.modules.iter_mut())
            .find(|module| module.name == name)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ModuleEntry> {
        self.modules.iter().flat_map(|group| group.modules.iter())
    }
}

/// Write the config as pretty JSON. The document goes to a temporary file in
/// the destination directory first and is renamed into place, so readers
/// never see a half-written file.
pub fn write(config: &SiteConfig, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory: {}", dir.display()))?;

    let tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, config)
            .with_context(|| format!("failed to serialize {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    tmp.persist(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
