//! Typed views over the untyped CST.
//!
//! The tree built by [`parse`](crate::parse) is untyped: every node is a
//! `SyntaxNode` with a `SyntaxKind`. The wrappers here give the handful of
//! questions extraction asks - tag name, attribute value, classes, text,
//! inner markup - a typed answer. Casting is cheap; the wrappers hold the
//! same reference-counted node.

use crate::parser::parse;
use crate::syntax_kind::{SyntaxKind, SyntaxNode, SyntaxToken};

/// A parsed markup fragment (the ROOT node).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fragment(SyntaxNode);

impl Fragment {
    pub fn parse(source: &str) -> Self {
        Self(parse(source))
    }

    pub fn syntax(&self) -> &SyntaxNode {
        &self.0
    }

    /// Every element in document order.
    pub fn elements(&self) -> impl Iterator<Item = Element> + '_ {
        self.0.descendants().filter_map(Element::cast)
    }

    /// Top-level elements only.
    pub fn root_elements(&self) -> impl Iterator<Item = Element> + '_ {
        self.0.children().filter_map(Element::cast)
    }

    /// Whether the parser had to recover from malformed input.
    pub fn has_errors(&self) -> bool {
        self.0.descendants().any(|n| n.kind() == SyntaxKind::ERROR)
    }
}

/// An `ELEMENT` node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Element(SyntaxNode);

impl Element {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        (node.kind() == SyntaxKind::ELEMENT).then_some(Self(node))
    }

    pub fn syntax(&self) -> &SyntaxNode {
        &self.0
    }

    fn start_tag(&self) -> Option<SyntaxNode> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::START_TAG)
    }

    /// Tag name, ASCII-lowercased.
    pub fn name(&self) -> String {
        self.start_tag()
            .and_then(|tag| token_of(&tag, SyntaxKind::TAG_NAME))
            .map(|t| t.text().to_ascii_lowercase())
            .unwrap_or_default()
    }

    pub fn attributes(&self) -> impl Iterator<Item = Attribute> {
        self.start_tag()
            .into_iter()
            .flat_map(|tag| tag.children())
            .filter_map(Attribute::cast)
    }

    /// Entity-decoded value of the first attribute called `name`.
    ///
    /// A bare attribute (`<input disabled>`) has the value `""`.
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.attributes()
            .find(|a| a.name().eq_ignore_ascii_case(name))
            .map(|a| a.value())
    }

    pub fn classes(&self) -> Vec<String> {
        self.attribute("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| c == class)
    }

    pub fn id(&self) -> Option<String> {
        self.attribute("id")
    }

    pub fn parent_element(&self) -> Option<Element> {
        self.0.parent().and_then(Element::cast)
    }

    pub fn child_elements(&self) -> impl Iterator<Item = Element> {
        self.0.children().filter_map(Element::cast)
    }

    /// Descendant elements in document order, excluding `self`.
    pub fn descendants(&self) -> impl Iterator<Item = Element> {
        self.0.descendants().skip(1).filter_map(Element::cast)
    }

    /// Entity-decoded character data of all descendants.
    pub fn text_content(&self) -> String {
        let raw: String = self
            .0
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == SyntaxKind::TEXT)
            .map(|t| t.text().to_string())
            .collect();
        html_escape::decode_html_entities(&raw).into_owned()
    }

    /// Exact source between the start tag and the end tag.
    pub fn inner_html(&self) -> String {
        self.0
            .children_with_tokens()
            .filter(|e| !matches!(e.kind(), SyntaxKind::START_TAG | SyntaxKind::END_TAG))
            .map(|e| e.to_string())
            .collect()
    }

    pub fn outer_html(&self) -> String {
        self.0.text().to_string()
    }
}

/// An `ATTRIBUTE` node inside a start tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute(SyntaxNode);

impl Attribute {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        (node.kind() == SyntaxKind::ATTRIBUTE).then_some(Self(node))
    }

    /// Attribute name, ASCII-lowercased.
    pub fn name(&self) -> String {
        token_of(&self.0, SyntaxKind::ATTR_NAME)
            .map(|t| t.text().to_ascii_lowercase())
            .unwrap_or_default()
    }

    /// Value as written, without surrounding quotes and without decoding.
    pub fn raw_value(&self) -> Option<String> {
        token_of(&self.0, SyntaxKind::ATTR_VALUE).map(|t| unquote(t.text()).to_string())
    }

    /// Entity-decoded value; `""` for a bare attribute.
    pub fn value(&self) -> String {
        self.raw_value()
            .map(|raw| html_escape::decode_html_entities(&raw).into_owned())
            .unwrap_or_default()
    }
}

fn token_of(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

fn unquote(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn first(source: &str) -> Element {
        Fragment::parse(source).root_elements().next().unwrap()
    }

    #[test]
    fn element_name_is_lowercased() {
        assert_eq!(first("<DIV></DIV>").name(), "div");
    }

    #[test]
    fn attribute_values_are_unquoted_and_decoded() {
        let a = first(r#"<a href="https://y?a=1&amp;b=2" rel='noopener' target=_blank>x</a>"#);
        assert_eq!(a.attribute("href").as_deref(), Some("https://y?a=1&b=2"));
        assert_eq!(a.attribute("rel").as_deref(), Some("noopener"));
        assert_eq!(a.attribute("target").as_deref(), Some("_blank"));
        assert_eq!(a.attribute("missing"), None);
    }

    #[test]
    fn bare_attribute_is_empty_string() {
        let input = first("<input disabled>");
        assert_eq!(input.attribute("disabled").as_deref(), Some(""));
    }

    #[test]
    fn first_duplicate_attribute_wins() {
        let img = first(r#"<img alt="one" alt="two"/>"#);
        assert_eq!(img.attribute("alt").as_deref(), Some("one"));
    }

    #[test]
    fn classes_split_on_whitespace() {
        let div = first(r#"<div class=" jc-blurb-image  jc-effect "></div>"#);
        assert_eq!(div.classes(), vec!["jc-blurb-image", "jc-effect"]);
        assert!(div.has_class("jc-effect"));
        assert!(!div.has_class("jc-blurb"));
    }

    #[test]
    fn inner_html_is_exact_source() {
        let inner = "<!-- wp:paragraph -->\n<p>a &amp; b</p>\n<!-- /wp:paragraph -->";
        let div = first(&format!(r#"<div class="jc-blurb-info">{inner}</div>"#));
        assert_eq!(div.inner_html(), inner);
    }

    #[test]
    fn text_content_decodes_entities() {
        let div = first("<div><h4>Tom &amp; Jerry</h4><p> ok</p></div>");
        assert_eq!(div.text_content(), "Tom & Jerry ok");
    }

    #[test]
    fn parent_and_children() {
        let div = first("<div><a><img/></a><p></p></div>");
        let names: Vec<String> = div.child_elements().map(|e| e.name()).collect();
        assert_eq!(names, vec!["a", "p"]);

        let img = div.descendants().find(|e| e.name() == "img").unwrap();
        assert_eq!(img.parent_element().unwrap().name(), "a");
        assert_eq!(first("<p></p>").parent_element(), None);
    }

    #[test]
    fn fragment_elements_in_document_order() {
        let fragment = Fragment::parse("<div><a></a></div><img/><p><b></b></p>");
        let names: Vec<String> = fragment.elements().map(|e| e.name()).collect();
        assert_eq!(names, vec!["div", "a", "img", "p", "b"]);
        assert!(!fragment.has_errors());
    }

    #[test]
    fn fragment_reports_recovered_errors() {
        assert!(Fragment::parse("<div></span></div>").has_errors());
    }
}
