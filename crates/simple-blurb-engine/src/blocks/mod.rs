//! The two block definitions and the policy governing what may be nested
//! inside them.

pub mod blurb_content;
pub mod policy;
pub mod simple_blurb;

pub use blurb_content::{
    Alignment, AttributeViolation, BLURB_CONTENT, BlurbContentAttributes, MediaSelection,
};
pub use policy::{InnerBlocksPolicy, TemplateBlock, TemplateLock};
pub use simple_blurb::{SIMPLE_BLURB, SimpleBlurbAttributes};

use crate::schema::{FieldDef, FieldKind};

/// Color fields shared by both blocks. They are persisted in the comment
/// delimiter, never in markup.
pub(crate) const COLOR_FIELDS: [FieldDef; 4] = [
    FieldDef::new("backgroundColor", FieldKind::String),
    FieldDef::new("textColor", FieldKind::String),
    FieldDef::new("gradient", FieldKind::String),
    FieldDef::new("style", FieldKind::Object),
];

/// Generated wrapper class for a block name: `jc-blocks/blurb-content`
/// becomes `wp-block-jc-blocks-blurb-content`.
pub fn block_class(name: &str) -> String {
    let name = name.strip_prefix("core/").unwrap_or(name);
    format!("wp-block-{}", name.replace('/', "-"))
}
