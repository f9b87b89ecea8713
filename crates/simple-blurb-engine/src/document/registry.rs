use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::blocks::{
    BLURB_CONTENT, BlurbContentAttributes, InnerBlocksPolicy, SIMPLE_BLURB, SimpleBlurbAttributes,
    TemplateBlock, blurb_content, simple_blurb,
};
use crate::document::{InnerPiece, RawBlock, parse_blocks, serialize_blocks};
use crate::error::EngineError;
use crate::extract::{ExtractError, extract};
use crate::schema::{Schema, SchemaVersion};

#[derive(Debug, Clone, PartialEq)]
pub struct SimpleBlurb {
    pub attributes: SimpleBlurbAttributes,
    pub inner_blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlurbContent {
    pub attributes: BlurbContentAttributes,
}

/// A block with its attributes interpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    SimpleBlurb(SimpleBlurb),
    BlurbContent(BlurbContent),
    /// Any block this registry does not know, kept verbatim.
    Other(RawBlock),
}

impl Block {
    pub fn name(&self) -> Option<&str> {
        match self {
            Block::SimpleBlurb(_) => Some(SIMPLE_BLURB),
            Block::BlurbContent(_) => Some(BLURB_CONTENT),
            Block::Other(raw) => raw.name(),
        }
    }
}

/// A parsed post.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub blocks: Vec<Block>,
    /// Attribute values that could not be read and fell back to defaults.
    pub errors: Vec<ExtractError>,
}

/// State threaded through a document parse.
pub struct ParseContext<'a> {
    registry: &'a BlockRegistry,
    pub errors: Vec<ExtractError>,
}

impl<'a> ParseContext<'a> {
    pub fn new(registry: &'a BlockRegistry) -> Self {
        Self {
            registry,
            errors: Vec::new(),
        }
    }

    pub fn version(&self) -> SchemaVersion {
        self.registry.version
    }

    pub fn parse_block(&mut self, raw: &RawBlock) -> Block {
        let registry = self.registry;
        registry.parse_block(raw, self)
    }
}

pub trait BlockDefinition: Send + Sync {
    fn name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// A freshly inserted instance: defaults plus template content.
    fn create(&self, registry: &BlockRegistry) -> Block;

    fn parse(&self, raw: &RawBlock, cx: &mut ParseContext<'_>) -> Result<Block, EngineError>;

    fn serialize(&self, block: &Block, registry: &BlockRegistry) -> Result<RawBlock, EngineError>;
}

/// Block definitions by name.
pub struct BlockRegistry {
    definitions: HashMap<&'static str, Arc<dyn BlockDefinition>>,
    version: SchemaVersion,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self {
            definitions: HashMap::new(),
            version: SchemaVersion::LATEST,
        }
    }

    /// Registry knowing both blurb blocks.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(SimpleBlurbDefinition));
        registry.register(Arc::new(BlurbContentDefinition));
        registry
    }

    /// Read attributes as `version` of the schema knew them.
    pub fn with_version(mut self, version: SchemaVersion) -> Self {
        self.version = version;
        self
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    pub fn register(&mut self, definition: Arc<dyn BlockDefinition>) {
        self.definitions.insert(definition.name(), definition);
    }

    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn BlockDefinition>> {
        self.definitions.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn BlockDefinition>> {
        self.definitions.get(name)
    }

    pub fn create(&self, name: &str) -> Result<Block, EngineError> {
        self.get(name)
            .map(|definition| definition.create(self))
            .ok_or_else(|| EngineError::UnknownBlock(name.to_string()))
    }

    /// Instantiate a template entry; core blocks get their empty markup.
    pub fn instantiate(&self, entry: &TemplateBlock) -> Result<Block, EngineError> {
        if self.get(entry.name).is_some() {
            return self.create(entry.name);
        }
        entry
            .to_raw()
            .map(Block::Other)
            .ok_or_else(|| EngineError::UnknownBlock(entry.name.to_string()))
    }

    /// Interpret one raw block. A block that fails to interpret is kept
    /// verbatim.
    pub fn parse_block(&self, raw: &RawBlock, cx: &mut ParseContext<'_>) -> Block {
        let Some(definition) = raw.name().and_then(|name| self.get(name)) else {
            return Block::Other(raw.clone());
        };
        match definition.parse(raw, cx) {
            Ok(block) => block,
            Err(error) => {
                log::warn!("keeping `{}` verbatim: {error}", definition.name());
                Block::Other(raw.clone())
            }
        }
    }

    pub fn parse_document(&self, source: &str) -> Document {
        let mut cx = ParseContext::new(self);
        let blocks = parse_blocks(source)
            .iter()
            .map(|raw| cx.parse_block(raw))
            .collect();
        Document {
            blocks,
            errors: cx.errors,
        }
    }

    pub fn to_raw(&self, block: &Block) -> Result<RawBlock, EngineError> {
        match block {
            Block::Other(raw) => Ok(raw.clone()),
            _ => {
                let name = block.name().unwrap_or_default();
                let definition = self
                    .get(name)
                    .ok_or_else(|| EngineError::UnknownBlock(name.to_string()))?;
                definition.serialize(block, self)
            }
        }
    }

    pub fn serialize_blocks(&self, blocks: &[Block]) -> Result<String, EngineError> {
        let raws = blocks
            .iter()
            .map(|block| self.to_raw(block))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(serialize_blocks(&raws))
    }

    pub fn serialize_document(&self, document: &Document) -> Result<String, EngineError> {
        self.serialize_blocks(&document.blocks)
    }
}

/// Defaults, then delimiter attributes, errors collected into `cx`.
fn delimiter_values(schema: &Schema, raw: &RawBlock, cx: &mut ParseContext<'_>) -> Map<String, Value> {
    let mut values = schema.defaults();
    for (field, source) in schema.apply_delimiter(&raw.attrs, &mut values) {
        log::warn!("{}: `{field}`: {source}; using default", schema.block_name());
        cx.errors.push(ExtractError::Coercion { field, source });
    }
    values
}

fn unexpected(expected: &'static str, block: &Block) -> EngineError {
    EngineError::UnexpectedBlock {
        expected,
        found: block.name().unwrap_or("freeform").to_string(),
    }
}

struct SimpleBlurbDefinition;

impl BlockDefinition for SimpleBlurbDefinition {
    fn name(&self) -> &'static str {
        SIMPLE_BLURB
    }

    fn schema(&self) -> Schema {
        simple_blurb::SCHEMA.at(SchemaVersion::LATEST)
    }

    fn create(&self, registry: &BlockRegistry) -> Block {
        let inner_blocks = InnerBlocksPolicy::simple_blurb()
            .template
            .iter()
            .filter_map(|entry| registry.instantiate(entry).ok())
            .collect();
        Block::SimpleBlurb(SimpleBlurb {
            attributes: SimpleBlurbAttributes::default(),
            inner_blocks,
        })
    }

    fn parse(&self, raw: &RawBlock, cx: &mut ParseContext<'_>) -> Result<Block, EngineError> {
        let schema = simple_blurb::SCHEMA.at(cx.version());
        let values = delimiter_values(&schema, raw, cx);
        let attributes = SimpleBlurbAttributes::from_values(values)?;
        let policy = attributes.inner_blocks_policy();
        let inner_blocks = raw
            .inner_blocks
            .iter()
            .map(|inner| {
                if let Some(name) = inner.name()
                    && !policy.allows(name)
                {
                    log::warn!("{SIMPLE_BLURB} does not allow `{name}` inside it");
                }
                cx.parse_block(inner)
            })
            .collect();
        Ok(Block::SimpleBlurb(SimpleBlurb {
            attributes,
            inner_blocks,
        }))
    }

    fn serialize(&self, block: &Block, registry: &BlockRegistry) -> Result<RawBlock, EngineError> {
        let Block::SimpleBlurb(blurb) = block else {
            return Err(unexpected(SIMPLE_BLURB, block));
        };
        let rendered = blurb.attributes.save("").render();
        let open = rendered.strip_suffix("</div>").unwrap_or(&rendered);

        let mut raw = RawBlock::new(SIMPLE_BLURB, blurb.attributes.delimiter_attributes()?);
        raw.inner_content.push(InnerPiece::Html(format!("\n{open}")));
        for (i, inner) in blurb.inner_blocks.iter().enumerate() {
            if i > 0 {
                raw.inner_content.push(InnerPiece::Html("\n\n".to_string()));
            }
            raw.inner_blocks.push(registry.to_raw(inner)?);
            raw.inner_content.push(InnerPiece::Block);
        }
        raw.inner_content.push(InnerPiece::Html("</div>\n".to_string()));
        Ok(raw)
    }
}

struct BlurbContentDefinition;

impl BlockDefinition for BlurbContentDefinition {
    fn name(&self) -> &'static str {
        BLURB_CONTENT
    }

    fn schema(&self) -> Schema {
        blurb_content::SCHEMA.at(SchemaVersion::LATEST)
    }

    fn create(&self, _registry: &BlockRegistry) -> Block {
        Block::BlurbContent(BlurbContent {
            attributes: BlurbContentAttributes::inserted(),
        })
    }

    fn parse(&self, raw: &RawBlock, cx: &mut ParseContext<'_>) -> Result<Block, EngineError> {
        let schema = blurb_content::SCHEMA.at(cx.version());
        let mut values = delimiter_values(&schema, raw, cx);

        let extraction = extract(&schema, &raw.inner_source());
        for field in schema.sourced_fields() {
            match extraction.values.get(field.name) {
                Some(value) => values.insert(field.name.to_string(), value.clone()),
                None => values.remove(field.name),
            };
        }
        cx.errors.extend(extraction.errors);

        let attributes = BlurbContentAttributes::from_values(values)?;
        Ok(Block::BlurbContent(BlurbContent { attributes }))
    }

    fn serialize(&self, block: &Block, _registry: &BlockRegistry) -> Result<RawBlock, EngineError> {
        let Block::BlurbContent(blurb) = block else {
            return Err(unexpected(BLURB_CONTENT, block));
        };
        let markup = blurb.attributes.save().render();
        Ok(RawBlock::with_markup(
            BLURB_CONTENT,
            blurb.attributes.delimiter_attributes()?,
            &markup,
        ))
    }
}
