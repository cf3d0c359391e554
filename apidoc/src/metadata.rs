//! Documentation metadata as emitted by the extractor — one `Comment` per
//! exported symbol.
//!
//! Node kinds are closed enums tagged by their `type` field, so an unknown
//! kind fails decoding instead of being rendered as garbage.

use serde::Deserialize;

/// Documentation for a single exported symbol.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub name: String,
    #[serde(default)]
    pub description: Option<Description>,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub returns: Vec<Returned>,
    #[serde(default)]
    pub throws: Vec<Returned>,
}

/// A markdown tree. Only the inline children of the first block are ever
/// rendered, so later blocks are kept undecoded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Description {
    #[serde(default)]
    pub children: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Block {
    #[serde(default)]
    children: Vec<Inline>,
}

impl Description {
    /// Decode the inline nodes of the first block.
    pub fn first_block(&self) -> Result<Vec<Inline>, serde_json::Error> {
        match self.children.first() {
            Some(block) => Ok(Block::deserialize(block)?.children),
            None => Ok(Vec::new()),
        }
    }
}

/// Inline node inside a description block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inline {
    #[serde(alias = "inlineCode")]
    Text { value: String },
    Link {
        #[serde(default)]
        url: Option<String>,
        /// Set for `{@link Symbol}` references to other documented symbols
        #[serde(default)]
        jsdoc: bool,
        #[serde(default)]
        children: Vec<Inline>,
    },
}

impl Inline {
    /// Visible text of the node.
    pub fn text(&self) -> String {
        match self {
            Inline::Text { value } => value.clone(),
            Inline::Link { children, .. } => children.iter().map(Inline::text).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Example {
    #[serde(default)]
    pub description: String,
}

/// A `@param` entry, or a documented property of one (`options.units`).
#[derive(Debug, Clone, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "lineNumber", default)]
    pub line_number: usize,
    #[serde(default)]
    pub description: Option<Description>,
    #[serde(rename = "type", default)]
    pub ty: Option<TypeExpr>,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub properties: Vec<Param>,
}

/// A `@returns` or `@throws` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Returned {
    #[serde(default)]
    pub description: Option<Description>,
    #[serde(rename = "type", default)]
    pub ty: Option<TypeExpr>,
}

/// Type expression node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum TypeExpr {
    NameExpression { name: String },
    UnionType { elements: Vec<TypeExpr> },
    OptionalType { expression: Box<TypeExpr> },
    TypeApplication {
        expression: Box<TypeExpr>,
        applications: Vec<TypeExpr>,
    },
}

impl TypeExpr {
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeExpr::NameExpression { name } => Some(name),
            _ => None,
        }
    }
}
