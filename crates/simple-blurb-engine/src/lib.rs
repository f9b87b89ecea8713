//! Attribute/markup contract for the Simple Blurb blocks.
//!
//! - [`schema`] declares each block's attributes and where saved markup
//!   carries them
//! - [`blocks`] renders attributes to markup and applies editor actions
//! - [`extract`] reads attributes back out of markup, table-driven by the schema
//! - [`document`] handles the block-comment format a post is stored in
//!
//! Serializing is a pure function of the attributes and a [`StyleContext`];
//! extraction never fails, falling back to defaults and reporting what it
//! could not read.

pub mod blocks;
pub mod document;
pub mod error;
pub mod extract;
pub mod length;
pub mod markup;
pub mod media;
pub mod schema;
pub mod style;

pub use blocks::{
    Alignment, AttributeViolation, BLURB_CONTENT, BlurbContentAttributes, InnerBlocksPolicy,
    MediaSelection, SIMPLE_BLURB, SimpleBlurbAttributes, TemplateBlock, TemplateLock,
};
pub use document::{
    Block, BlockDefinition, BlockRegistry, BlurbContent, Document, InnerPiece, RawBlock,
    SimpleBlurb, parse_blocks, serialize_block, serialize_blocks,
};
pub use error::EngineError;
pub use extract::{ExtractError, Extraction, extract};
pub use length::{Length, LengthUnit};
pub use markup::{ClassNames, ElementNode, InlineStyle, MarkupNode};
pub use media::{MediaCatalog, MediaError, MediaItem, MediaLibrary, MediaSize};
pub use schema::{FieldDef, FieldKind, Schema, SchemaVersion, Source, SourceRead};
pub use style::{ColorAttributes, StyleContext};
