//! Normalization of extracted metadata into site config entries.

use crate::error::DocsError;
use crate::metadata::{Comment, Param, Returned};
use crate::output::{False, ModuleDocs, OptionRow, OrFalse, ParamRow, SiteConfig, TypedText};
use crate::packages::Package;
use crate::render::{LinkMode, Links, Renderer};
use tracing::{debug, warn};

/// Examples split into a short snippet and the full text at this marker.
pub const MAP_MARKER: &str = "//addToMap";

const OPTIONS_PARAM: &str = "options";
const OPTIONS_PREFIX: &str = "options.";

pub struct Normalizer<'a> {
    renderer: Renderer<'a>,
}

impl<'a> Normalizer<'a> {
    pub fn new(links: &'a Links) -> Self {
        Self {
            renderer: Renderer::new(links),
        }
    }

    /// Fill the entries of `site` that match `comments`. Returns how many
    /// entries were filled; comments without an entry are dropped.
    ///
    /// Every entry is rendered before any is written, so a malformed comment
    /// leaves `site` untouched.
    pub fn apply(
        &self,
        site: &mut SiteConfig,
        package: &Package,
        comments: &[Comment],
    ) -> Result<usize, DocsError> {
        let parent = if comments.len() > 1 {
            package.name.as_str()
        } else {
            ""
        };

        let mut rendered = Vec::with_capacity(comments.len());
        for comment in comments {
            if !site.entries().any(|entry| entry.name == comment.name) {
                debug!("{}: `{}` is not in the manifest", package.name, comment.name);
                continue;
            }
            let docs = self
                .module_docs(package, parent, comment)
                .map_err(|source| DocsError::MalformedMetadata {
                    entry: package.entry.clone(),
                    source,
                })?;
            rendered.push((comment.name.as_str(), docs));
        }

        let filled = rendered.len();
        for (name, docs) in rendered {
            let Some(entry) = site.find_mut(name) else {
                continue;
            };
            if let Some(previous) = &entry.docs {
                warn!(
                    "`{}` from {} replaces the entry already filled by {}",
                    name, package.name, previous.package
                );
            }
            entry.docs = Some(docs);
        }
        Ok(filled)
    }

    fn module_docs(
        &self,
        package: &Package,
        parent: &str,
        comment: &Comment,
    ) -> Result<ModuleDocs, serde_json::Error> {
        let example = comment.examples.first().map(|e| e.description.as_str());

        Ok(ModuleDocs {
            parent: parent.to_string(),
            description: self
                .renderer
                .render_description(comment.description.as_ref(), LinkMode::Hyperlink)?,
            snippet: example.map(snippet).into(),
            example: example.map(str::to_string).into(),
            has_map: example.is_some_and(|e| e.contains(MAP_MARKER)),
            package: package.name.clone(),
            returns: self.typed_texts(&comment.returns)?,
            params: self.params(&comment.params)?,
            options: self.options(&comment.params)?,
            throws: self.typed_texts(&comment.throws)?,
        })
    }

    /// `@returns`/`@throws` rows; undescribed entries stay as `false`.
    fn typed_texts(
        &self,
        entries: &[Returned],
    ) -> Result<OrFalse<Vec<OrFalse<TypedText>>>, serde_json::Error> {
        if entries.is_empty() {
            return Ok(OrFalse::False(False));
        }
        let rows = entries
            .iter()
            .map(|entry| -> Result<OrFalse<TypedText>, serde_json::Error> {
                let desc = self
                    .renderer
                    .render_description(entry.description.as_ref(), LinkMode::Hyperlink)?;
                Ok(non_empty(desc)
                    .map(|desc| TypedText {
                        ty: self
                            .renderer
                            .render_type(entry.ty.as_ref(), LinkMode::Hyperlink),
                        desc,
                    })
                    .into())
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(OrFalse::Value(rows))
    }

    /// Typed parameters ordered by source line; untyped ones are skipped.
    fn params(
        &self,
        params: &[Param],
    ) -> Result<OrFalse<Vec<OrFalse<ParamRow>>>, serde_json::Error> {
        if params.is_empty() {
            return Ok(OrFalse::False(False));
        }
        let mut typed: Vec<&Param> = params.iter().filter(|p| p.ty.is_some()).collect();
        typed.sort_by_key(|p| p.line_number);

        let mut rows = Vec::with_capacity(typed.len());
        for param in typed {
            let description = self
                .renderer
                .render_description(param.description.as_ref(), LinkMode::Hyperlink)?;
            let ty = self
                .renderer
                .render_type(param.ty.as_ref(), LinkMode::Hyperlink);
            let row = match (non_empty(description), ty) {
                (Some(description), OrFalse::Value(ty)) => OrFalse::Value(ParamRow {
                    argument: param.name.clone(),
                    ty,
                    description,
                }),
                _ => OrFalse::False(False),
            };
            rows.push(row);
        }
        Ok(OrFalse::Value(rows))
    }

    /// Properties of the parameter named `options`. `None` (serialized as
    /// `null`) when parameters exist but none is named `options`.
    fn options(
        &self,
        params: &[Param],
    ) -> Result<Option<OrFalse<Vec<OptionRow>>>, serde_json::Error> {
        if params.is_empty() {
            return Ok(Some(OrFalse::False(False)));
        }
        let Some(options) = params.iter().find(|p| p.name == OPTIONS_PARAM) else {
            return Ok(None);
        };

        let rows = options
            .properties
            .iter()
            .map(|prop| -> Result<OptionRow, serde_json::Error> {
                Ok(OptionRow {
                    prop: prop
                        .name
                        .strip_prefix(OPTIONS_PREFIX)
                        .unwrap_or(&prop.name)
                        .to_string(),
                    ty: self.renderer.render_type(prop.ty.as_ref(), LinkMode::Plain),
                    default: prop.default.as_deref().map(unescape_default),
                    description: self
                        .renderer
                        .render_description(prop.description.as_ref(), LinkMode::Hyperlink)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(OrFalse::Value(rows)))
    }
}

/// Example text up to the map marker.
fn snippet(example: &str) -> String {
    match example.find(MAP_MARKER) {
        Some(at) => example[..at].to_string(),
        None => example.to_string(),
    }
}

/// Default values arrive as source literals (`'kilometers'`): drop the
/// quotes and one escaping backslash.
fn unescape_default(value: &str) -> String {
    value.replace('\'', "").replacen('\\', "", 1)
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{Group, ModuleEntry};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::path::PathBuf;

    fn site(names: &[&str]) -> SiteConfig {
        SiteConfig {
            modules: vec![Group {
                group: "Measurement".into(),
                modules: names.iter().map(|n| ModuleEntry::placeholder(*n)).collect(),
            }],
        }
    }

    fn package() -> Package {
        Package {
            name: "@turf/along".into(),
            entry: PathBuf::from("packages/turf-along/index.js"),
        }
    }

    fn text(value: &str) -> Value {
        json!({ "type": "root", "children": [{
            "type": "paragraph",
            "children": [{ "type": "text", "value": value }]
        }]})
    }

    fn name_type(name: &str) -> Value {
        json!({ "type": "NameExpression", "name": name })
    }

    fn comments(value: Value) -> Vec<Comment> {
        serde_json::from_value(value).unwrap()
    }

    fn normalize(links: &Links, site: &mut SiteConfig, comments: &[Comment]) -> usize {
        Normalizer::new(links).apply(site, &package(), comments).unwrap()
    }

    fn entry(site: &SiteConfig, name: &str) -> Value {
        let entry = site.entries().find(|e| e.name == name).unwrap();
        serde_json::to_value(entry).unwrap()
    }

    #[test]
    fn fills_matching_entry() {
        let links = Links::new([("FEATURE", "https://geojson.org/feature")]);
        let mut site = site(&["along", "area"]);
        let comments = comments(json!([{
            "name": "along",
            "description": text("Takes a line ."),
            "examples": [{ "description": "var along = turf.along(line, 200);\n//addToMap\nvar addToMap = [along];" }],
            "params": [
                {
                    "name": "options",
                    "lineNumber": 30,
                    "description": text("Optional parameters"),
                    "type": name_type("Object"),
                    "properties": [{
                        "name": "options.units",
                        "description": text("can be degrees, radians, miles, or kilometers"),
                        "type": name_type("string"),
                        "default": "'kilometers'"
                    }]
                },
                {
                    "name": "line",
                    "lineNumber": 28,
                    "description": text("input line"),
                    "type": name_type("Feature")
                },
                { "name": "distance", "lineNumber": 29, "type": name_type("number") },
                { "name": "untyped", "lineNumber": 1, "description": text("ignored") }
            ],
            "returns": [{ "description": text("Point along the line"), "type": name_type("Feature") }]
        }]));

        assert_eq!(normalize(&links, &mut site, &comments), 1);

        assert_eq!(
            entry(&site, "along"),
            json!({
                "name": "along",
                "hidden": false,
                "parent": "",
                "description": "Takes a line.",
                "snippet": "var along = turf.along(line, 200);\n",
                "example": "var along = turf.along(line, 200);\n//addToMap\nvar addToMap = [along];",
                "hasMap": true,
                "package": "@turf/along",
                "returns": [{
                    "type": "<a target=\"_blank\" href=\"https://geojson.org/feature\">Feature</a>",
                    "desc": "Point along the line"
                }],
                "params": [
                    {
                        "Argument": "line",
                        "Type": "<a target=\"_blank\" href=\"https://geojson.org/feature\">Feature</a>",
                        "Description": "input line"
                    },
                    false,
                    {
                        "Argument": "options",
                        "Type": "Object",
                        "Description": "Optional parameters: see below"
                    }
                ],
                "options": [{
                    "Prop": "units",
                    "Type": "string",
                    "Default": "kilometers",
                    "Description": "can be degrees, radians, miles, or kilometers"
                }],
                "throws": false
            })
        );
        assert_eq!(entry(&site, "area"), json!({ "name": "area", "hidden": false }));
    }

    #[test]
    fn unmatched_comment_is_dropped() {
        let links = Links::default();
        let mut site = site(&["area"]);
        let comments = comments(json!([{ "name": "bbox" }]));

        assert_eq!(normalize(&links, &mut site, &comments), 0);
        assert_eq!(entry(&site, "area"), json!({ "name": "area", "hidden": false }));
    }

    #[test]
    fn parent_set_for_multi_symbol_packages() {
        let links = Links::default();
        let mut site = site(&["along", "area"]);
        let comments = comments(json!([{ "name": "along" }, { "name": "area" }]));

        assert_eq!(normalize(&links, &mut site, &comments), 2);
        assert_eq!(entry(&site, "along")["parent"], json!("@turf/along"));
        assert_eq!(entry(&site, "area")["parent"], json!("@turf/along"));
    }

    #[test]
    fn bare_comment_uses_placeholders() {
        let links = Links::default();
        let mut site = site(&["along"]);
        normalize(&links, &mut site, &comments(json!([{ "name": "along" }])));

        let value = entry(&site, "along");
        assert_eq!(value["description"], json!(""));
        assert_eq!(value["snippet"], json!(false));
        assert_eq!(value["example"], json!(false));
        assert_eq!(value["hasMap"], json!(false));
        assert_eq!(value["returns"], json!(false));
        assert_eq!(value["params"], json!(false));
        assert_eq!(value["options"], json!(false));
        assert_eq!(value["throws"], json!(false));
    }

    #[test]
    fn options_null_without_options_param() {
        let links = Links::default();
        let mut site = site(&["area"]);
        normalize(
            &links,
            &mut site,
            &comments(json!([{
                "name": "area",
                "params": [{ "name": "geojson", "type": name_type("GeoJSON"), "description": text("input") }]
            }])),
        );
        assert_eq!(entry(&site, "area")["options"], json!(null));
    }

    #[test]
    fn example_without_marker() {
        let links = Links::default();
        let mut site = site(&["area"]);
        normalize(
            &links,
            &mut site,
            &comments(json!([{ "name": "area", "examples": [{ "description": "turf.area(poly);" }] }])),
        );
        let value = entry(&site, "area");
        assert_eq!(value["snippet"], json!("turf.area(poly);"));
        assert_eq!(value["hasMap"], json!(false));
    }

    #[test]
    fn undescribed_throws_stay_false() {
        let links = Links::default();
        let mut site = site(&["area"]);
        normalize(
            &links,
            &mut site,
            &comments(json!([{
                "name": "area",
                "throws": [
                    { "type": name_type("Error") },
                    { "description": text("if geojson is invalid"), "type": name_type("Error") }
                ]
            }])),
        );
        assert_eq!(
            entry(&site, "area")["throws"],
            json!([false, { "type": "Error", "desc": "if geojson is invalid" }])
        );
    }

    #[test]
    fn later_package_overwrites_entry() {
        let links = Links::default();
        let mut site = site(&["area"]);
        let other = Package {
            name: "@turf/other".into(),
            entry: PathBuf::from("packages/turf-other/index.js"),
        };
        let normalizer = Normalizer::new(&links);
        let area = comments(json!([{ "name": "area" }]));
        normalizer.apply(&mut site, &package(), &area).unwrap();
        normalizer.apply(&mut site, &other, &area).unwrap();

        assert_eq!(entry(&site, "area")["package"], json!("@turf/other"));
    }

    #[test]
    fn unknown_inline_node_is_malformed() {
        let links = Links::default();
        let mut site = site(&["area"]);
        let comments = comments(json!([{
            "name": "area",
            "description": { "children": [{ "type": "paragraph", "children": [{ "type": "emphasis" }] }] }
        }]));

        let err = Normalizer::new(&links)
            .apply(&mut site, &package(), &comments)
            .unwrap_err();
        assert!(matches!(err, DocsError::MalformedMetadata { .. }));
    }

    #[test]
    fn malformed_comment_leaves_site_untouched() {
        let links = Links::default();
        let mut site = site(&["along", "area"]);
        let comments = comments(json!([
            { "name": "along", "description": text("Takes a line.") },
            {
                "name": "area",
                "description": { "children": [{ "type": "paragraph", "children": [{ "type": "emphasis" }] }] }
            }
        ]));

        assert!(Normalizer::new(&links)
            .apply(&mut site, &package(), &comments)
            .is_err());
        assert_eq!(entry(&site, "along"), json!({ "name": "along", "hidden": false }));
    }

    #[test]
    fn snippet_cuts_at_marker() {
        assert_eq!(snippet("foo\n//addToMap\nbar"), "foo\n");
        assert_eq!(snippet("foo"), "foo");
    }

    #[test]
    fn default_unescaping() {
        assert_eq!(unescape_default("'kilometers'"), "kilometers");
        assert_eq!(unescape_default("\\'a\\b'"), "a\\b");
        assert_eq!(unescape_default("42"), "42");
    }
}
