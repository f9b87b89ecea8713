//! Block-comment document format.
//!
//! A post is a sequence of blocks delimited by HTML comments:
//!
//! ```text
//! <!-- wp:jc-blocks/simple-blurb {"textColor":"white"} -->
//! <div class="...">
//! <!-- wp:jc-blocks/blurb-content -->
//! <div class="...">...</div>
//! <!-- /wp:jc-blocks/blurb-content -->
//! </div>
//! <!-- /wp:jc-blocks/simple-blurb -->
//! ```
//!
//! Attributes without a markup source travel as JSON in the opening
//! delimiter. `core/` names are written without their namespace. Markup
//! outside any block becomes a freeform block with no name.

mod registry;

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

pub use registry::{
    Block, BlockDefinition, BlockRegistry, BlurbContent, Document, ParseContext, SimpleBlurb,
};

const CORE_NAMESPACE: &str = "core/";

fn delimiter_regex() -> &'static Regex {
    static DELIMITER_REGEX: OnceLock<Regex> = OnceLock::new();
    DELIMITER_REGEX.get_or_init(|| {
        Regex::new(
            r"(?s)<!--\s+(?P<closer>/)?wp:(?P<namespace>[a-z][a-z0-9_-]*/)?(?P<name>[a-z][a-z0-9_-]*)\s+(?P<attrs>\{(?:[^-]|-[^-])*?\}\s+)?(?P<void>/)?-->",
        )
        .expect("Invalid block delimiter regex")
    })
}

/// One piece of a block's inner content, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InnerPiece {
    Html(String),
    /// Position of the next entry of `inner_blocks`.
    Block,
}

/// A block as it appears in the document, before attribute interpretation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBlock {
    /// Fully qualified name; `None` for freeform markup.
    pub name: Option<String>,
    pub attrs: Map<String, Value>,
    pub inner_blocks: Vec<RawBlock>,
    pub inner_content: Vec<InnerPiece>,
}

impl RawBlock {
    pub fn new(name: impl Into<String>, attrs: Map<String, Value>) -> Self {
        Self {
            name: Some(name.into()),
            attrs,
            ..Self::default()
        }
    }

    pub fn freeform(html: impl Into<String>) -> Self {
        Self {
            inner_content: vec![InnerPiece::Html(html.into())],
            ..Self::default()
        }
    }

    /// A block wrapping saved markup the way the editor writes it, on its
    /// own lines between the delimiters.
    pub fn with_markup(name: impl Into<String>, attrs: Map<String, Value>, markup: &str) -> Self {
        Self {
            inner_content: vec![InnerPiece::Html(format!("\n{markup}\n"))],
            ..Self::new(name, attrs)
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_freeform(&self) -> bool {
        self.name.is_none()
    }

    fn push_html(&mut self, html: &str) {
        if !html.is_empty() {
            self.inner_content.push(InnerPiece::Html(html.to_string()));
        }
    }

    fn push_block(&mut self, block: RawBlock) {
        self.inner_blocks.push(block);
        self.inner_content.push(InnerPiece::Block);
    }

    /// Markup between the delimiters, inner blocks included.
    pub fn inner_source(&self) -> String {
        let mut out = String::new();
        let mut blocks = self.inner_blocks.iter();
        for piece in &self.inner_content {
            match piece {
                InnerPiece::Html(html) => out.push_str(html),
                InnerPiece::Block => {
                    if let Some(block) = blocks.next() {
                        out.push_str(&serialize_block(block));
                    }
                }
            }
        }
        out
    }

    /// Markup between the delimiters with inner blocks left out.
    pub fn inner_html(&self) -> String {
        self.inner_content
            .iter()
            .filter_map(|piece| match piece {
                InnerPiece::Html(html) => Some(html.as_str()),
                InnerPiece::Block => None,
            })
            .collect()
    }
}

/// Split a document into blocks.
///
/// Never fails: unclosed blocks close at end of input, a closer without a
/// matching opener is kept as markup, and attribute JSON that does not
/// parse is dropped with a warning.
pub fn parse_blocks(document: &str) -> Vec<RawBlock> {
    let mut output = Vec::new();
    let mut stack: Vec<RawBlock> = Vec::new();
    let mut cursor = 0;

    for captures in delimiter_regex().captures_iter(document) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        let name = qualified_name(&captures);
        let is_closer = captures.name("closer").is_some();

        if is_closer && !stack.iter().any(|b| b.name.as_deref() == Some(name.as_str())) {
            log::warn!("closing delimiter for `{name}` without an opener");
            continue;
        }

        let leading = &document[cursor..whole.start()];
        cursor = whole.end();
        match stack.last_mut() {
            Some(open) => open.push_html(leading),
            None => push_freeform(&mut output, leading),
        }

        if is_closer {
            while let Some(block) = stack.pop() {
                let done = block.name.as_deref() == Some(name.as_str());
                if !done {
                    log::warn!("`{}` implicitly closed by `{name}`", block.name().unwrap_or_default());
                }
                attach(&mut stack, &mut output, block);
                if done {
                    break;
                }
            }
            continue;
        }

        let block = RawBlock::new(name, parse_attrs(&captures));
        if captures.name("void").is_some() {
            attach(&mut stack, &mut output, block);
        } else {
            stack.push(block);
        }
    }

    let trailing = &document[cursor..];
    match stack.last_mut() {
        Some(open) => open.push_html(trailing),
        None => push_freeform(&mut output, trailing),
    }
    while let Some(block) = stack.pop() {
        log::warn!("`{}` is never closed", block.name().unwrap_or_default());
        attach(&mut stack, &mut output, block);
    }

    output
}

fn qualified_name(captures: &Captures<'_>) -> String {
    let namespace = captures
        .name("namespace")
        .map_or(CORE_NAMESPACE, |m| m.as_str());
    format!("{namespace}{}", &captures["name"])
}

fn parse_attrs(captures: &Captures<'_>) -> Map<String, Value> {
    let Some(attrs) = captures.name("attrs") else {
        return Map::new();
    };
    match serde_json::from_str::<Value>(attrs.as_str().trim_end()) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            log::warn!("ignoring malformed block attributes: {}", attrs.as_str().trim_end());
            Map::new()
        }
    }
}

fn attach(stack: &mut [RawBlock], output: &mut Vec<RawBlock>, block: RawBlock) {
    match stack.last_mut() {
        Some(parent) => parent.push_block(block),
        None => output.push(block),
    }
}

/// Whitespace around top-level blocks is layout, not content.
fn push_freeform(output: &mut Vec<RawBlock>, html: &str) {
    let html = html.trim();
    if !html.is_empty() {
        output.push(RawBlock::freeform(html));
    }
}

pub fn serialize_block(block: &RawBlock) -> String {
    let Some(name) = block.name() else {
        return block.inner_source();
    };
    let name = name.strip_prefix(CORE_NAMESPACE).unwrap_or(name);
    let attrs = if block.attrs.is_empty() {
        String::new()
    } else {
        format!("{} ", serialize_attributes(&block.attrs))
    };
    if block.inner_content.is_empty() {
        format!("<!-- wp:{name} {attrs}/-->")
    } else {
        format!(
            "<!-- wp:{name} {attrs}-->{}<!-- /wp:{name} -->",
            block.inner_source()
        )
    }
}

/// Top-level blocks separated by a blank line.
pub fn serialize_blocks(blocks: &[RawBlock]) -> String {
    blocks
        .iter()
        .map(serialize_block)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Compact JSON safe to embed in an HTML comment: `--`, `<`, `>`, `&` and
/// escaped quotes are written as unicode escapes.
pub fn serialize_attributes(attrs: &Map<String, Value>) -> String {
    let json = Value::Object(attrs.clone()).to_string();
    let mut out = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('"') => out.push_str("\\u0022"),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            '-' if chars.peek() == Some(&'-') => {
                chars.next();
                out.push_str("\\u002d\\u002d");
            }
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            _ => out.push(c),
        }
    }
    out
}
