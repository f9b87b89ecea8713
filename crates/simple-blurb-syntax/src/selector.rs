//! # Selectors
//!
//! A small CSS selector subset, enough to address the nodes that carry
//! block attributes in saved markup:
//!
//! - type selectors: `img`, `*`
//! - class selectors: `.jc-blurb-image`, `div.jc-blurb-info`
//! - id selectors: `#hero`
//! - descendant (`a img`) and child (`.jc-blurb-image > a`) combinators
//!
//! Matching runs right to left, like a browser: the last compound must
//! match the candidate, then each combinator walks up through parents.
//!
//! ```
//! use simple_blurb_syntax::{Fragment, Selector};
//!
//! let fragment = Fragment::parse(r#"<div class="jc-blurb-image"><a href="https://y"><img/></a></div>"#);
//! let selector: Selector = ".jc-blurb-image > a".parse().unwrap();
//! let anchor = selector.select_first(fragment.syntax()).unwrap();
//! assert_eq!(anchor.attribute("href").as_deref(), Some("https://y"));
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::ast::Element;
use crate::syntax_kind::SyntaxNode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected {found:?} at offset {offset} in selector {selector:?}")]
    Unexpected {
        selector: String,
        offset: usize,
        found: char,
    },

    #[error("selector {0:?} ends with a combinator")]
    DanglingCombinator(String),
}

/// How a compound relates to the compound before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace: any ancestor
    Descendant,
    /// `>`: the direct parent
    Child,
}

/// A sequence of simple selectors with no combinator between them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl Compound {
    pub fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag
            && element.name() != *tag
        {
            return false;
        }
        if let Some(id) = &self.id
            && element.id().as_deref() != Some(id.as_str())
        {
            return false;
        }
        if self.classes.is_empty() {
            return true;
        }
        let classes = element.classes();
        self.classes.iter().all(|c| classes.contains(c))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    /// Relation to the previous step; ignored for the first step.
    combinator: Combinator,
    compound: Compound,
}

/// A parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    steps: Vec<Step>,
}

impl Selector {
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, element: &Element) -> bool {
        self.matches_step(self.steps.len() - 1, element)
    }

    fn matches_step(&self, index: usize, element: &Element) -> bool {
        let step = &self.steps[index];
        if !step.compound.matches(element) {
            return false;
        }
        if index == 0 {
            return true;
        }

        match step.combinator {
            Combinator::Child => element
                .parent_element()
                .is_some_and(|parent| self.matches_step(index - 1, &parent)),
            Combinator::Descendant => {
                let mut ancestor = element.parent_element();
                while let Some(candidate) = ancestor {
                    if self.matches_step(index - 1, &candidate) {
                        return true;
                    }
                    ancestor = candidate.parent_element();
                }
                false
            }
        }
    }

    /// First matching element under `root` in document order.
    ///
    /// If `root` is itself an element it is a candidate too.
    pub fn select_first(&self, root: &SyntaxNode) -> Option<Element> {
        root.descendants()
            .filter_map(Element::cast)
            .find(|e| self.matches(e))
    }

    /// All matching elements under `root` in document order.
    pub fn select_all(&self, root: &SyntaxNode) -> Vec<Element> {
        root.descendants()
            .filter_map(Element::cast)
            .filter(|e| self.matches(e))
            .collect()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let chars: Vec<(usize, char)> = source.char_indices().collect();
        let unexpected = |i: usize| SelectorError::Unexpected {
            selector: source.to_string(),
            offset: chars[i].0,
            found: chars[i].1,
        };

        let mut steps = Vec::new();
        let mut pending: Option<Combinator> = None;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i].1;
            if c.is_whitespace() {
                i += 1;
                continue;
            }
            if c == '>' {
                if steps.is_empty() || pending.is_some() {
                    return Err(unexpected(i));
                }
                pending = Some(Combinator::Child);
                i += 1;
                continue;
            }

            let (compound, next) = parse_compound(&chars, i);
            if next == i {
                return Err(unexpected(i));
            }
            steps.push(Step {
                combinator: pending.take().unwrap_or(Combinator::Descendant),
                compound,
            });
            i = next;
        }

        if pending.is_some() {
            return Err(SelectorError::DanglingCombinator(source.to_string()));
        }
        if steps.is_empty() {
            return Err(SelectorError::Empty);
        }

        Ok(Self {
            source: source.trim().to_string(),
            steps,
        })
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn read_ident(chars: &[(usize, char)], mut i: usize) -> (String, usize) {
    let mut ident = String::new();
    while i < chars.len() && is_ident_char(chars[i].1) {
        ident.push(chars[i].1);
        i += 1;
    }
    (ident, i)
}

/// Parse one compound starting at `i`. Returns the index after it; equal to
/// `i` when nothing could be consumed.
fn parse_compound(chars: &[(usize, char)], start: usize) -> (Compound, usize) {
    let mut compound = Compound::default();
    let mut i = start;

    if chars[i].1 == '*' {
        i += 1;
    } else if is_ident_char(chars[i].1) {
        let (tag, next) = read_ident(chars, i);
        compound.tag = Some(tag.to_ascii_lowercase());
        i = next;
    }

    while i < chars.len() {
        let marker = chars[i].1;
        if marker != '.' && marker != '#' {
            break;
        }
        let (ident, next) = read_ident(chars, i + 1);
        if ident.is_empty() {
            // Leave the marker unconsumed so the caller reports it
            break;
        }
        if marker == '.' {
            compound.classes.push(ident);
        } else {
            compound.id = Some(ident);
        }
        i = next;
    }

    (compound, i)
}
