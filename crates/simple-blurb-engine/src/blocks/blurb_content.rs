//! `jc-blocks/blurb-content`: the image + title + description block.
//!
//! Saved markup:
//!
//! ```text
//! <div class="wp-block-jc-blocks-blurb-content jc-blurb-content [has-text-align-*] [colors]" style="max-width:..">
//!   <div class="jc-blurb-image [jc-effect]">
//!     [<a href target rel>]<img width height src alt class="wp-image-<id>"/>[</a>]
//!   </div>
//!   <div class="jc-blurb-info">nested blocks</div>
//! </div>
//! ```
//!
//! (whitespace added for readability; the serializer emits none)

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::blocks::policy::InnerBlocksPolicy;
use crate::blocks::{COLOR_FIELDS, block_class};
use crate::document::serialize_blocks;
use crate::error::EngineError;
use crate::extract::{Extraction, extract};
use crate::length::Length;
use crate::markup::{ClassNames, ElementNode, InlineStyle, MarkupNode};
use crate::media::{MediaError, MediaItem};
use crate::schema::{DefaultValue, FieldDef, FieldKind, Schema, SchemaVersion, Source};
use crate::style::{ColorAttributes, StyleContext};

pub const BLURB_CONTENT: &str = "jc-blocks/blurb-content";

const ROOT_CLASS: &str = "jc-blurb-content";
const IMAGE_CLASS: &str = "jc-blurb-image";
const EFFECT_CLASS: &str = "jc-effect";
const INFO_CLASS: &str = "jc-blurb-info";

const IMAGE: &str = ".jc-blurb-content > .jc-blurb-image img";
const LINK: &str = ".jc-blurb-content > .jc-blurb-image > a";
const INFO: &str = ".jc-blurb-content > .jc-blurb-info";

const IMAGE_ALIGNMENTS: &[&str] = &["left", "center", "right"];
const BLOCK_ALIGNMENTS: &[&str] = &["left", "center", "right", "wide", "full"];

const FIELDS: &[FieldDef] = &[
    FieldDef::new("imageId", FieldKind::Integer),
    FieldDef::new("imageUrl", FieldKind::String).source(Source::attribute(IMAGE, "src")),
    FieldDef::new("imageSlug", FieldKind::String)
        .default(DefaultValue::Str("full"))
        .since(SchemaVersion::V2),
    FieldDef::new("alt", FieldKind::String)
        .default(DefaultValue::Str(""))
        .source(Source::attribute(IMAGE, "alt")),
    FieldDef::new("link", FieldKind::String)
        .source(Source::attribute(LINK, "href"))
        .since(SchemaVersion::V2),
    FieldDef::new("linkTarget", FieldKind::String)
        .source(Source::attribute(LINK, "target"))
        .since(SchemaVersion::V2),
    FieldDef::new("linkRel", FieldKind::String)
        .source(Source::attribute(LINK, "rel"))
        .since(SchemaVersion::V2),
    FieldDef::new("imageAlign", FieldKind::Enum(IMAGE_ALIGNMENTS)),
    FieldDef::new("imageHasEffect", FieldKind::Boolean)
        .default(DefaultValue::Bool(false))
        .since(SchemaVersion::V2),
    FieldDef::new("width", FieldKind::Integer)
        .source(Source::attribute(IMAGE, "width"))
        .since(SchemaVersion::V2),
    FieldDef::new("height", FieldKind::Integer)
        .source(Source::attribute(IMAGE, "height"))
        .since(SchemaVersion::V2),
    FieldDef::new("maxWidth", FieldKind::Length),
    FieldDef::new("allowBlocks", FieldKind::Boolean).default(DefaultValue::Bool(false)),
    FieldDef::new("align", FieldKind::Enum(BLOCK_ALIGNMENTS)),
    FieldDef::new("content", FieldKind::String)
        .default(DefaultValue::Str(""))
        .source(Source::html(INFO)),
    COLOR_FIELDS[0],
    COLOR_FIELDS[1],
    COLOR_FIELDS[2],
    COLOR_FIELDS[3],
];

pub const SCHEMA: Schema = Schema::new(BLURB_CONTENT, FIELDS);

/// Image alignment within the blurb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlurbContentAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub image_slug: String,
    pub alt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_rel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_align: Option<String>,
    pub image_has_effect: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<String>,
    pub allow_blocks: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    /// Serialized nested blocks, kept as an opaque blob.
    pub content: String,
    #[serde(flatten)]
    pub colors: ColorAttributes,
}

impl Default for BlurbContentAttributes {
    fn default() -> Self {
        Self {
            image_id: None,
            image_url: None,
            image_slug: crate::media::FULL_SIZE.to_string(),
            alt: String::new(),
            link: None,
            link_target: None,
            link_rel: None,
            image_align: None,
            image_has_effect: false,
            width: None,
            height: None,
            max_width: None,
            allow_blocks: false,
            align: None,
            content: String::new(),
            colors: ColorAttributes::default(),
        }
    }
}

/// A record that breaks one of the attribute invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeViolation {
    #[error("imageId {0} is set without an imageUrl")]
    ImageIdWithoutUrl(u64),
    #[error("link is set without an image to wrap")]
    LinkWithoutImage,
    #[error("maxWidth `{0}` is not a CSS length")]
    InvalidMaxWidth(String),
}

/// Outcome of a media selection: the new record plus a notice to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSelection {
    pub attributes: BlurbContentAttributes,
    pub notice: Option<MediaError>,
}

/// Render `attributes` to the block's saved markup.
///
/// `style` contributes classes only; the root's inline style is limited to
/// `max-width`.
pub fn save(attributes: &BlurbContentAttributes, style: &StyleContext) -> MarkupNode {
    let root_classes = ClassNames::new()
        .add(block_class(BLURB_CONTENT))
        .add_opt(attributes.block_alignment().map(|a| format!("align{a}")))
        .add(ROOT_CLASS)
        .add_opt(attributes.alignment().map(|a| format!("has-text-align-{a}")))
        .merge(&style.class_names);
    let mut root_style = InlineStyle::new();
    root_style.set_opt("max-width", attributes.max_width());

    let image_classes = ClassNames::new()
        .add(IMAGE_CLASS)
        .add_if(attributes.image_has_effect, EFFECT_CLASS);
    let image_region = ElementNode::new("div")
        .class(&image_classes)
        .child_opt(image_node(attributes));

    let info_region = ElementNode::new("div")
        .class(&ClassNames::new().add(INFO_CLASS))
        .child(MarkupNode::Raw(attributes.content.clone()));

    ElementNode::new("div")
        .class(&root_classes)
        .style(&root_style)
        .child(image_region)
        .child(info_region)
        .into()
}

fn image_node(attributes: &BlurbContentAttributes) -> Option<MarkupNode> {
    let url = attributes.image_url()?;
    let image = ElementNode::new("img")
        .attr_opt("width", attributes.width.map(|w| w.to_string()))
        .attr_opt("height", attributes.height.map(|h| h.to_string()))
        .attr("src", url)
        .attr("alt", attributes.alt.as_str())
        .attr_opt("class", attributes.image_id.map(|id| format!("wp-image-{id}")));

    let node = match attributes.link() {
        Some(link) => ElementNode::new("a")
            .attr("href", link)
            .attr_opt("target", attributes.link_target.as_deref())
            .attr_opt("rel", attributes.link_rel.as_deref())
            .child(image),
        None => image,
    };
    Some(node.into())
}

/// Recover sourced attributes from saved markup using the latest schema.
pub fn from_markup(markup: &str) -> Extraction {
    extract(&SCHEMA, markup)
}

/// Recover sourced attributes as `version` of the schema knew them.
pub fn from_markup_at(markup: &str, version: SchemaVersion) -> Extraction {
    extract(&SCHEMA.at(version), markup)
}

impl BlurbContentAttributes {
    pub fn schema() -> Schema {
        SCHEMA
    }

    /// Attributes of a freshly inserted block: defaults plus the
    /// heading/paragraph template as content.
    pub fn inserted() -> Self {
        let template: Vec<_> = InnerBlocksPolicy::blurb_content(false)
            .template
            .iter()
            .filter_map(|entry| entry.to_raw())
            .collect();
        Self {
            content: serialize_blocks(&template),
            ..Self::default()
        }
    }

    pub fn from_values(values: Map<String, Value>) -> Result<Self, EngineError> {
        serde_json::from_value(Value::Object(values)).map_err(|source| EngineError::Attributes {
            block: BLURB_CONTENT,
            source,
        })
    }

    pub fn to_values(&self) -> Result<Map<String, Value>, EngineError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    /// Attributes persisted in the block comment delimiter.
    pub fn delimiter_attributes(&self) -> Result<Map<String, Value>, EngineError> {
        Ok(SCHEMA.delimiter_attributes(&self.to_values()?))
    }

    pub fn style_context(&self) -> StyleContext {
        StyleContext::from_colors(&self.colors)
    }

    /// Saved markup with the block's own colors applied.
    pub fn save(&self) -> MarkupNode {
        save(self, &self.style_context())
    }

    pub fn inner_blocks_policy(&self) -> InnerBlocksPolicy {
        InnerBlocksPolicy::blurb_content(self.allow_blocks)
    }

    /// Image alignment if set to a recognised value.
    pub fn alignment(&self) -> Option<Alignment> {
        self.image_align.as_deref().and_then(Alignment::parse)
    }

    /// Alignment the editor shows: centered unless set.
    pub fn effective_alignment(&self) -> Alignment {
        self.alignment().unwrap_or(Alignment::Center)
    }

    fn block_alignment(&self) -> Option<&str> {
        self.align
            .as_deref()
            .filter(|a| BLOCK_ALIGNMENTS.contains(a))
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|u| !u.is_empty())
    }

    pub fn has_image(&self) -> bool {
        self.image_url().is_some()
    }

    /// Link target, only when there is an image to wrap.
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref().filter(|l| !l.is_empty() && self.has_image())
    }

    pub fn opens_in_new_tab(&self) -> bool {
        self.link_target.as_deref() == Some("_blank")
    }

    /// `max-width` value if it is a valid CSS length.
    pub fn max_width(&self) -> Option<&str> {
        self.max_width
            .as_deref()
            .filter(|w| w.parse::<Length>().is_ok())
    }

    /// Placeholder URL of an upload still in flight.
    pub fn is_temporary_image(&self) -> bool {
        self.image_id.is_none()
            && self
                .image_url
                .as_deref()
                .is_some_and(|u| u.starts_with("blob:"))
    }

    pub fn validate(&self) -> Vec<AttributeViolation> {
        let mut violations = Vec::new();
        if let Some(id) = self.image_id
            && !self.has_image()
        {
            violations.push(AttributeViolation::ImageIdWithoutUrl(id));
        }
        if self.link.as_deref().is_some_and(|l| !l.is_empty()) && !self.has_image() {
            violations.push(AttributeViolation::LinkWithoutImage);
        }
        if let Some(width) = &self.max_width
            && width.parse::<Length>().is_err()
        {
            violations.push(AttributeViolation::InvalidMaxWidth(width.clone()));
        }
        violations
    }

    pub fn select_media(&self, selection: Result<MediaItem, MediaError>) -> MediaSelection {
        let item = match selection {
            Ok(item) => item,
            Err(error) => {
                log::warn!("media selection failed: {error}");
                return MediaSelection {
                    attributes: self.remove_image(),
                    notice: Some(error),
                };
            }
        };
        let Some(url) = item.url_for(&self.image_slug).or_else(|| item.url()) else {
            return MediaSelection {
                attributes: self.remove_image(),
                notice: Some(MediaError::MissingUrl),
            };
        };
        MediaSelection {
            attributes: Self {
                image_id: item.id,
                image_url: Some(url.to_string()),
                alt: item.alt.clone(),
                ..self.clone()
            },
            notice: None,
        }
    }

    /// Image inserted from a URL rather than the library.
    pub fn select_url(&self, url: &str) -> Self {
        if url.is_empty() {
            return self.remove_image();
        }
        Self {
            image_id: None,
            image_url: Some(url.to_string()),
            alt: String::new(),
            ..self.clone()
        }
    }

    pub fn remove_image(&self) -> Self {
        Self {
            image_id: None,
            image_url: None,
            alt: String::new(),
            ..self.clone()
        }
    }

    /// Clear an image whose upload never completed.
    pub fn discard_temporary_image(&self) -> Self {
        if self.is_temporary_image() {
            self.remove_image()
        } else {
            self.clone()
        }
    }

    pub fn set_alt(&self, alt: &str) -> Self {
        Self {
            alt: alt.to_string(),
            ..self.clone()
        }
    }

    /// Point the image link at `url`. An empty URL unlinks.
    pub fn set_link(&self, url: &str, opens_in_new_tab: bool) -> Self {
        if url.is_empty() {
            return self.unlink();
        }
        Self {
            link: Some(url.to_string()),
            link_target: opens_in_new_tab.then(|| "_blank".to_string()),
            ..self.clone()
        }
    }

    pub fn set_link_rel(&self, rel: &str) -> Self {
        Self {
            link_rel: (!rel.is_empty()).then(|| rel.to_string()),
            ..self.clone()
        }
    }

    pub fn unlink(&self) -> Self {
        Self {
            link: None,
            link_target: None,
            link_rel: None,
            ..self.clone()
        }
    }

    pub fn set_alignment(&self, alignment: Option<Alignment>) -> Self {
        Self {
            image_align: alignment.map(|a| a.as_str().to_string()),
            ..self.clone()
        }
    }

    pub fn toggle_effect(&self) -> Self {
        Self {
            image_has_effect: !self.image_has_effect,
            ..self.clone()
        }
    }

    pub fn toggle_allow_blocks(&self) -> Self {
        Self {
            allow_blocks: !self.allow_blocks,
            ..self.clone()
        }
    }

    pub fn set_image_size(&self, width: Option<u64>, height: Option<u64>) -> Self {
        Self {
            width,
            height,
            ..self.clone()
        }
    }

    /// Apply raw input from the max-width control.
    pub fn set_max_width_input(&self, input: &str) -> Self {
        Self {
            max_width: Length::from_control_input(input).map(|l| l.to_string()),
            ..self.clone()
        }
    }

    /// Switch to the `slug` size variant of `item`. Unknown slugs leave the
    /// record unchanged.
    pub fn select_size(&self, item: &MediaItem, slug: &str) -> Self {
        let Some(url) = item.url_for(slug) else {
            log::debug!("media item has no `{slug}` size");
            return self.clone();
        };
        let size = item.size(slug);
        Self {
            image_url: Some(url.to_string()),
            image_slug: slug.to_string(),
            width: size.and_then(|s| s.width),
            height: size.and_then(|s| s.height),
            ..self.clone()
        }
    }
}
