//! Rendering of type expressions and description trees into display strings,
//! with optional hyperlinks resolved through the manifest's `paths` table.

use crate::metadata::{Description, Inline, TypeExpr};
use crate::output::OrFalse;
use std::collections::HashMap;

/// Type applications nested deeper than this render as their bare base name.
const MAX_TYPE_DEPTH: usize = 2;

/// Marker phrase documentation uses to introduce the options table.
const OPTIONAL_PARAMETERS: &str = "Optional parameters";

/// Symbol name → reference URL, matched case-insensitively.
#[derive(Debug, Default, Clone)]
pub struct Links {
    exact: HashMap<String, String>,
    upper: HashMap<String, String>,
}

impl Links {
    pub fn new<I, K, V>(paths: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut links = Links::default();
        for (name, url) in paths {
            let (name, url) = (name.into(), url.into());
            links
                .upper
                .entry(name.to_uppercase())
                .or_insert_with(|| url.clone());
            links.exact.insert(name, url);
        }
        links
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.exact
            .get(name)
            .or_else(|| self.upper.get(&name.to_uppercase()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }
}

/// Whether rendered output may contain hyperlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    Plain,
    Hyperlink,
}

pub struct Renderer<'a> {
    links: &'a Links,
}

impl<'a> Renderer<'a> {
    pub fn new(links: &'a Links) -> Self {
        Self { links }
    }

    /// Render a type, `false` when the metadata declares none.
    pub fn render_type(&self, ty: Option<&TypeExpr>, mode: LinkMode) -> OrFalse<String> {
        ty.map(|ty| self.type_string(ty, mode, 0)).into()
    }

    fn type_string(&self, ty: &TypeExpr, mode: LinkMode, depth: usize) -> String {
        match ty {
            TypeExpr::UnionType { elements } => {
                let members: Vec<String> = elements
                    .iter()
                    .map(|member| self.type_string(member, mode, depth + 1))
                    .collect();
                format!("({})", members.join(" | "))
            }
            TypeExpr::OptionalType { expression } => match expression.name() {
                Some(name) => format!("Optional: {}", name),
                None => format!(
                    "Optional: {}",
                    self.type_string(expression, LinkMode::Plain, depth + 1)
                ),
            },
            TypeExpr::NameExpression { name } => self.linked(name, mode),
            TypeExpr::TypeApplication {
                expression,
                applications,
            } => {
                let base = match expression.name() {
                    Some(name) => name.to_string(),
                    None => self.type_string(expression, LinkMode::Plain, depth + 1),
                };
                if depth >= MAX_TYPE_DEPTH {
                    return base;
                }
                let args: Vec<String> = applications
                    .iter()
                    .map(|arg| self.type_string(arg, mode, depth + 1))
                    .collect();
                format!("{} <{}>", base, args.join(", "))
            }
        }
    }

    fn linked(&self, name: &str, mode: LinkMode) -> String {
        match (mode, self.links.get(name)) {
            (LinkMode::Hyperlink, Some(url)) => anchor(url, name),
            _ => name.to_string(),
        }
    }

    /// Render the first block of a description. A missing description
    /// renders as the empty string.
    pub fn render_description(
        &self,
        description: Option<&Description>,
        mode: LinkMode,
    ) -> Result<String, serde_json::Error> {
        let Some(description) = description else {
            return Ok(String::new());
        };
        let fragments: Vec<String> = description
            .first_block()?
            .iter()
            .map(|node| self.inline(node, mode))
            .collect();

        let mut text = fragments.join(" ");
        if let Some(head) = text.strip_suffix(" .") {
            text = format!("{}.", head);
        }
        if text == OPTIONAL_PARAMETERS {
            text.push_str(": see below");
        }
        Ok(text)
    }

    fn inline(&self, node: &Inline, mode: LinkMode) -> String {
        let text = node.text();
        match (node, mode) {
            (Inline::Text { value }, _) => value.clone(),
            (Inline::Link { .. }, LinkMode::Plain) => text,
            (Inline::Link { url, jsdoc, .. }, LinkMode::Hyperlink) => {
                let target = if *jsdoc {
                    self.links.get(&text).or(url.as_deref())
                } else {
                    url.as_deref()
                };
                match target {
                    Some(target) => anchor(target, &text),
                    None => text,
                }
            }
        }
    }
}

fn anchor(url: &str, text: &str) -> String {
    format!("<a target=\"_blank\" href=\"{}\">{}</a>", url, text)
}
