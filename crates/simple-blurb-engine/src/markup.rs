//! Output side of the attribute/markup contract: a small element tree and
//! its deterministic HTML rendering.
//!
//! Attribute order is insertion order, class lists drop empties and
//! duplicates, and void elements render self-closed (`<img .../>`).

use std::fmt;

use html_escape::{encode_double_quoted_attribute, encode_text};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Element(ElementNode),
    /// Text content, escaped on render.
    Text(String),
    /// Pre-rendered markup emitted verbatim (nested block content).
    Raw(String),
}

impl MarkupNode {
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        match self {
            MarkupNode::Element(element) => element.write_to(out),
            MarkupNode::Text(text) => out.push_str(&encode_text(text)),
            MarkupNode::Raw(raw) => out.push_str(raw),
        }
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            MarkupNode::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl fmt::Display for MarkupNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<ElementNode> for MarkupNode {
    fn from(element: ElementNode) -> Self {
        MarkupNode::Element(element)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<MarkupNode>,
}

impl ElementNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing an earlier value of the same name in place.
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
        self
    }

    pub fn attr_opt(self, name: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    /// Set `class`; an empty list leaves the attribute off entirely.
    pub fn class(self, classes: &ClassNames) -> Self {
        if classes.is_empty() {
            self
        } else {
            self.attr("class", classes.to_string())
        }
    }

    /// Set `style`; an empty declaration list leaves the attribute off entirely.
    pub fn style(self, style: &InlineStyle) -> Self {
        if style.is_empty() {
            self
        } else {
            self.attr("style", style.to_string())
        }
    }

    pub fn child(mut self, node: impl Into<MarkupNode>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn child_opt(self, node: Option<impl Into<MarkupNode>>) -> Self {
        match node {
            Some(node) => self.child(node),
            None => self,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn children(&self) -> &[MarkupNode] {
        &self.children
    }

    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&encode_double_quoted_attribute(value));
            out.push('"');
        }
        if self.is_void() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_to(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

/// An ordered, duplicate-free class list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassNames(Vec<String>);

impl ClassNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, class: impl Into<String>) -> Self {
        self.push(class);
        self
    }

    pub fn add_if(self, condition: bool, class: impl Into<String>) -> Self {
        if condition { self.add(class) } else { self }
    }

    pub fn add_opt(self, class: Option<impl Into<String>>) -> Self {
        match class {
            Some(class) => self.add(class),
            None => self,
        }
    }

    pub fn push(&mut self, class: impl Into<String>) {
        let class = class.into();
        for part in class.split_whitespace() {
            if !self.0.iter().any(|c| c == part) {
                self.0.push(part.to_string());
            }
        }
    }

    pub fn merge(mut self, other: &ClassNames) -> Self {
        for class in &other.0 {
            self.push(class.as_str());
        }
        self
    }

    pub fn contains(&self, class: &str) -> bool {
        self.0.iter().any(|c| c == class)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ClassNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

impl<S: Into<String>> FromIterator<S> for ClassNames {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut classes = ClassNames::new();
        for class in iter {
            classes.push(class);
        }
        classes
    }
}

/// Ordered CSS declarations; setting a property twice keeps the first position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle(Vec<(String, String)>);

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, property: &str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter_mut().find(|(p, _)| p == property) {
            Some(slot) => slot.1 = value,
            None => self.0.push((property.to_string(), value)),
        }
    }

    pub fn set_opt(&mut self, property: &str, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.set(property, value);
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Overlay `other` onto `self`.
    pub fn merge(mut self, other: &InlineStyle) -> Self {
        for (property, value) in &other.0 {
            self.set(property, value.as_str());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (property, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{property}:{value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn renders_nested_elements_in_attribute_order() {
        let node: MarkupNode = ElementNode::new("div")
            .attr("class", "outer")
            .attr("data-x", "1")
            .child(ElementNode::new("span").child(MarkupNode::Text("hi".into())))
            .into();
        assert_snapshot!(node.render(), @r#"<div class="outer" data-x="1"><span>hi</span></div>"#);
    }

    #[test]
    fn void_elements_self_close() {
        let img: MarkupNode = ElementNode::new("img").attr("src", "a.jpg").attr("alt", "").into();
        assert_snapshot!(img.render(), @r#"<img src="a.jpg" alt=""/>"#);
    }

    #[test]
    fn escapes_attribute_values_and_text() {
        let node: MarkupNode = ElementNode::new("a")
            .attr("href", "/q?a=1&b=\"2\"")
            .child(MarkupNode::Text("1 < 2 & 3".into()))
            .into();
        assert_snapshot!(node.render(), @r#"<a href="/q?a=1&amp;b=&quot;2&quot;">1 &lt; 2 &amp; 3</a>"#);
    }

    #[test]
    fn raw_children_are_verbatim() {
        let node: MarkupNode = ElementNode::new("div")
            .child(MarkupNode::Raw("<p>already & rendered</p>".into()))
            .into();
        assert_snapshot!(node.render(), @"<div><p>already & rendered</p></div>");
    }

    #[test]
    fn empty_class_and_style_are_omitted() {
        let node: MarkupNode = ElementNode::new("div")
            .class(&ClassNames::new())
            .style(&InlineStyle::new())
            .into();
        assert_eq!(node.render(), "<div></div>");
    }

    #[test]
    fn attr_replaces_in_place() {
        let element = ElementNode::new("a").attr("href", "x").attr("rel", "r").attr("href", "y");
        let attrs: Vec<_> = element.attributes().collect();
        assert_eq!(attrs, vec![("href", "y"), ("rel", "r")]);
    }

    #[test]
    fn class_names_dedupe_and_split() {
        let classes = ClassNames::new()
            .add("a b")
            .add("")
            .add("b")
            .add_if(false, "c")
            .add_opt(Some("d"));
        assert_eq!(classes.to_string(), "a b d");
        assert!(classes.contains("d"));
        let merged = classes.merge(&["e", "a"].into_iter().collect());
        assert_eq!(merged.to_string(), "a b d e");
    }

    #[test]
    fn inline_style_merge_overlays() {
        let mut base = InlineStyle::new();
        base.set("max-width", "100px");
        base.set_opt("color", None::<String>);
        let mut overlay = InlineStyle::new();
        overlay.set("color", "#fff");
        overlay.set("max-width", "50%");
        let merged = base.merge(&overlay);
        assert_eq!(merged.to_string(), "max-width:50%;color:#fff");
        assert_eq!(merged.get("color"), Some("#fff"));
    }
}
