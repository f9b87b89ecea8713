use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};

use crate::blocks::{BLURB_CONTENT, block_class};
use crate::document::{InnerPiece, RawBlock};
use crate::markup::{ClassNames, ElementNode, MarkupNode};

/// Editing lock on a block's nested content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateLock {
    /// No insertion, removal or reordering of children.
    All,
    /// Children may be freely edited.
    Free,
}

impl Serialize for TemplateLock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TemplateLock::All => serializer.serialize_str("all"),
            TemplateLock::Free => serializer.serialize_bool(false),
        }
    }
}

/// One entry of a nested-content template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateBlock {
    pub name: &'static str,
    pub attributes: Map<String, Value>,
}

impl TemplateBlock {
    pub fn new(name: &'static str, attributes: Value) -> Self {
        let attributes = match attributes {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self { name, attributes }
    }

    fn class_name(&self) -> Option<&str> {
        self.attributes.get("className").and_then(Value::as_str)
    }

    /// Saved markup of an empty core block created from this entry, or
    /// `None` for blocks whose markup is not produced here.
    pub fn core_markup(&self) -> Option<MarkupNode> {
        let node = match self.name {
            "core/heading" => {
                let level = self
                    .attributes
                    .get("level")
                    .and_then(Value::as_u64)
                    .filter(|l| (1..=6).contains(l))
                    .unwrap_or(2);
                let classes = ClassNames::new()
                    .add(block_class(self.name))
                    .add_opt(self.class_name());
                ElementNode::new(format!("h{level}")).class(&classes)
            }
            "core/paragraph" => {
                ElementNode::new("p").class(&ClassNames::new().add_opt(self.class_name()))
            }
            "core/list" => ElementNode::new("ul").class(
                &ClassNames::new()
                    .add(block_class(self.name))
                    .add_opt(self.class_name()),
            ),
            _ => return None,
        };
        Some(node.into())
    }

    /// Raw block for a core template entry.
    pub fn to_raw(&self) -> Option<RawBlock> {
        let markup = self.core_markup()?;
        Some(RawBlock {
            name: Some(self.name.to_string()),
            attrs: self.attributes.clone(),
            inner_blocks: Vec::new(),
            inner_content: vec![InnerPiece::Html(format!("\n{}\n", markup.render()))],
        })
    }
}

/// What the editor may place inside a block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InnerBlocksPolicy {
    pub allowed_blocks: Vec<&'static str>,
    pub template: Vec<TemplateBlock>,
    pub template_lock: TemplateLock,
}

impl InnerBlocksPolicy {
    /// Title heading plus description paragraph. Locked unless the block
    /// opts in to free editing.
    pub fn blurb_content(allow_blocks: bool) -> Self {
        Self {
            allowed_blocks: vec!["core/paragraph", "core/list"],
            template: vec![
                TemplateBlock::new(
                    "core/heading",
                    json!({"className": "jc-blurb-title", "level": 4, "placeholder": "Blurb Title"}),
                ),
                TemplateBlock::new(
                    "core/paragraph",
                    json!({"className": "jc-blurb-description", "placeholder": "Blurb Content"}),
                ),
            ],
            template_lock: if allow_blocks {
                TemplateLock::Free
            } else {
                TemplateLock::All
            },
        }
    }

    /// Exactly one blurb-content child.
    pub fn simple_blurb() -> Self {
        Self {
            allowed_blocks: vec![BLURB_CONTENT],
            template: vec![TemplateBlock::new(BLURB_CONTENT, json!({}))],
            template_lock: TemplateLock::All,
        }
    }

    pub fn allows(&self, name: &str) -> bool {
        self.allowed_blocks.contains(&name)
    }

    /// Whether the editor may insert a new `name` child.
    pub fn permits_insert(&self, name: &str) -> bool {
        self.template_lock == TemplateLock::Free && self.allows(name)
    }
}
