//! Markup extractor: recovers sourced attributes from saved HTML.
//!
//! Each sourced field in the schema is one rule: a selector, plus what to
//! read from the first element it matches. Extraction never fails. A rule
//! that matches nothing leaves the field at its default, and a value that
//! does not coerce is recorded in [`Extraction::errors`] and likewise
//! falls back to the default.

use serde_json::{Map, Value};
use simple_blurb_syntax::{Fragment, Selector, SelectorError, SyntaxNode};

use crate::schema::{Coerced, CoercionError, Schema, SourceRead};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("attribute `{field}`: {source}")]
    Coercion {
        field: &'static str,
        #[source]
        source: CoercionError,
    },
    #[error("attribute `{field}`: {source}")]
    Selector {
        field: &'static str,
        #[source]
        source: SelectorError,
    },
}

impl ExtractError {
    pub fn field(&self) -> &'static str {
        match self {
            ExtractError::Coercion { field, .. } | ExtractError::Selector { field, .. } => field,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub values: Map<String, Value>,
    pub errors: Vec<ExtractError>,
}

impl Extraction {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Extract `schema`'s sourced fields from `markup`, starting from the
/// schema's default record.
pub fn extract(schema: &Schema, markup: &str) -> Extraction {
    let fragment = Fragment::parse(markup);
    if fragment.has_errors() {
        log::debug!("{}: saved markup is not well formed", schema.block_name());
    }
    extract_from(schema, fragment.syntax())
}

pub fn extract_from(schema: &Schema, root: &SyntaxNode) -> Extraction {
    let mut extraction = Extraction {
        values: schema.defaults(),
        errors: Vec::new(),
    };

    for field in schema.sourced_fields() {
        let Some(source) = field.source else {
            continue;
        };
        let selector: Selector = match source.selector.parse() {
            Ok(selector) => selector,
            Err(source) => {
                extraction.errors.push(ExtractError::Selector {
                    field: field.name,
                    source,
                });
                continue;
            }
        };
        let Some(element) = selector.select_first(root) else {
            continue;
        };
        let raw = match source.read {
            SourceRead::Attribute(name) => element.attribute(name),
            SourceRead::Text => Some(element.text_content()),
            SourceRead::Html => Some(element.inner_html()),
        };
        let Some(raw) = raw else {
            continue;
        };

        match crate::schema::coerce_markup(field.kind, &raw) {
            Ok(Coerced::Value(value)) => {
                extraction.values.insert(field.name.to_string(), value);
            }
            Ok(Coerced::Absent) => {}
            Err(source) => {
                log::warn!(
                    "{}: `{}` from `{selector}`: {source}; using default",
                    schema.block_name(),
                    field.name
                );
                extraction.errors.push(ExtractError::Coercion {
                    field: field.name,
                    source,
                });
            }
        }
    }

    extraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DefaultValue, FieldDef, FieldKind, Source};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const FIELDS: &[FieldDef] = &[
        FieldDef::new("src", FieldKind::String).source(Source::attribute(".card img", "src")),
        FieldDef::new("alt", FieldKind::String)
            .default(DefaultValue::Str(""))
            .source(Source::attribute(".card img", "alt")),
        FieldDef::new("width", FieldKind::Integer).source(Source::attribute(".card img", "width")),
        FieldDef::new("title", FieldKind::String).source(Source::text(".card > h3")),
        FieldDef::new("body", FieldKind::String)
            .default(DefaultValue::Str(""))
            .source(Source::html(".card > .body")),
        FieldDef::new("theme", FieldKind::String).default(DefaultValue::Str("light")),
    ];

    const SCHEMA: Schema = Schema::new("test/card", FIELDS);

    #[test]
    fn reads_each_source_kind() {
        let markup = r#"<div class="card"><img src="a.jpg" alt="An &amp; B" width="120"/><h3>Hello <em>there</em></h3><div class="body"><p>One</p> two</div></div>"#;
        let extraction = extract(&SCHEMA, markup);
        assert!(extraction.is_clean());
        assert_eq!(
            Value::Object(extraction.values),
            json!({
                "alt": "An & B",
                "body": "<p>One</p> two",
                "theme": "light",
                "src": "a.jpg",
                "width": 120,
                "title": "Hello there",
            })
        );
    }

    #[test]
    fn no_matches_yields_defaults() {
        let extraction = extract(&SCHEMA, "<section><p>unrelated</p></section>");
        assert!(extraction.is_clean());
        assert_eq!(extraction.values, SCHEMA.defaults());
    }

    #[test]
    fn malformed_value_falls_back_and_reports() {
        let extraction = extract(&SCHEMA, r#"<div class="card"><img src="a.jpg" width="abc"/></div>"#);
        assert_eq!(extraction.values.get("width"), None);
        assert_eq!(extraction.values["src"], json!("a.jpg"));
        assert_eq!(extraction.errors.len(), 1);
        assert_eq!(extraction.errors[0].field(), "width");
        assert_eq!(
            extraction.errors[0].to_string(),
            r#"attribute `width`: expected a non-negative integer, found "abc""#
        );
    }

    #[test]
    fn missing_attribute_keeps_default() {
        let extraction = extract(&SCHEMA, r#"<div class="card"><img src="a.jpg"/></div>"#);
        assert_eq!(extraction.values["alt"], json!(""));
    }

    #[test]
    fn bad_selector_is_reported() {
        const BROKEN: &[FieldDef] =
            &[FieldDef::new("x", FieldKind::String).source(Source::text("div >"))];
        let extraction = extract(&Schema::new("test/broken", BROKEN), "<div>x</div>");
        assert!(matches!(
            extraction.errors.as_slice(),
            [ExtractError::Selector { field: "x", .. }]
        ));
    }

    #[test]
    fn out_of_scope_elements_do_not_match() {
        let markup = r#"<div class="other"><img src="wrong.jpg"/></div><div class="card"></div>"#;
        let extraction = extract(&SCHEMA, markup);
        assert_eq!(extraction.values.get("src"), None);
    }
}
