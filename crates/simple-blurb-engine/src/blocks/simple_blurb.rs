//! `jc-blocks/simple-blurb`: the container hosting one blurb-content.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::blocks::policy::InnerBlocksPolicy;
use crate::blocks::{COLOR_FIELDS, block_class};
use crate::error::EngineError;
use crate::markup::{ClassNames, ElementNode, MarkupNode};
use crate::schema::{FieldDef, Schema};
use crate::style::{ColorAttributes, StyleContext};

pub const SIMPLE_BLURB: &str = "jc-blocks/simple-blurb";

const ROOT_CLASS: &str = "jc-simple-blurb";

const FIELDS: &[FieldDef] = &[COLOR_FIELDS[0], COLOR_FIELDS[1], COLOR_FIELDS[2], COLOR_FIELDS[3]];

pub const SCHEMA: Schema = Schema::new(SIMPLE_BLURB, FIELDS);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleBlurbAttributes {
    #[serde(flatten)]
    pub colors: ColorAttributes,
}

/// Render the container around already-serialized `inner` blocks.
///
/// Unlike blurb-content, the container carries both the classes and the
/// inline style of `style`.
pub fn save(style: &StyleContext, inner: &str) -> MarkupNode {
    let classes = ClassNames::new()
        .add(block_class(SIMPLE_BLURB))
        .add(ROOT_CLASS)
        .merge(&style.class_names);
    ElementNode::new("div")
        .class(&classes)
        .style(&style.style)
        .child(MarkupNode::Raw(inner.to_string()))
        .into()
}

impl SimpleBlurbAttributes {
    pub fn schema() -> Schema {
        SCHEMA
    }

    pub fn from_values(values: Map<String, Value>) -> Result<Self, EngineError> {
        serde_json::from_value(Value::Object(values)).map_err(|source| EngineError::Attributes {
            block: SIMPLE_BLURB,
            source,
        })
    }

    pub fn to_values(&self) -> Result<Map<String, Value>, EngineError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    pub fn delimiter_attributes(&self) -> Result<Map<String, Value>, EngineError> {
        Ok(SCHEMA.delimiter_attributes(&self.to_values()?))
    }

    pub fn style_context(&self) -> StyleContext {
        StyleContext::from_colors(&self.colors)
    }

    pub fn save(&self, inner: &str) -> MarkupNode {
        save(&self.style_context(), inner)
    }

    pub fn inner_blocks_policy(&self) -> InnerBlocksPolicy {
        InnerBlocksPolicy::simple_blurb()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{CustomColors, StyleAttribute};
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_container() {
        let markup = SimpleBlurbAttributes::default().save("<p>inner</p>");
        assert_snapshot!(markup.render(), @r#"<div class="wp-block-jc-blocks-simple-blurb jc-simple-blurb"><p>inner</p></div>"#);
    }

    #[test]
    fn container_carries_color_classes_and_style() {
        let attributes = SimpleBlurbAttributes {
            colors: ColorAttributes {
                background_color: Some("pale-pink".into()),
                style: Some(StyleAttribute {
                    color: Some(CustomColors {
                        text: Some("#333".into()),
                        ..Default::default()
                    }),
                }),
                ..Default::default()
            },
        };
        assert_snapshot!(attributes.save("").render(), @r#"<div class="wp-block-jc-blocks-simple-blurb jc-simple-blurb has-pale-pink-background-color has-text-color has-background" style="color:#333"></div>"#);
    }

    #[test]
    fn colors_live_in_the_delimiter() {
        let attributes = SimpleBlurbAttributes {
            colors: ColorAttributes {
                gradient: Some("cool-to-warm".into()),
                ..Default::default()
            },
        };
        let delimiter = attributes.delimiter_attributes().unwrap();
        assert_eq!(serde_json::to_string(&delimiter).unwrap(), r#"{"gradient":"cool-to-warm"}"#);
        assert_eq!(
            SimpleBlurbAttributes::from_values(delimiter).unwrap(),
            attributes
        );
    }

    #[test]
    fn empty_record_has_no_delimiter_attributes() {
        assert!(SimpleBlurbAttributes::default().delimiter_attributes().unwrap().is_empty());
    }
}
