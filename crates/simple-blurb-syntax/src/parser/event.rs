//! # Parser Events
//!
//! Events are the intermediate representation between parsing and tree
//! building. Instead of building the tree directly, the parser emits a
//! **flat sequence** of events that describe the tree structure:
//!
//! ```text
//! Start(ELEMENT)     ← Begin an ELEMENT node
//!   Start(START_TAG)
//!     Token(LT)
//!     Token(TAG_NAME)
//!     Token(GT)
//!   Finish
//!   Token(TEXT)
//!   ...
//! Finish             ← End the ELEMENT node
//! ```
//!
//! The Sink processes these in order, maintaining a stack of open nodes.
//! Start pushes, Finish pops.

use crate::syntax_kind::SyntaxKind;

/// An event emitted by the parser during tree construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Begin a new composite node.
    Start { kind: SyntaxKind },

    /// Add a token to the current node.
    ///
    /// The `kind` may differ from the lexer token: tag-position words are
    /// re-tagged, and runs of content tokens are grouped into one `TEXT`.
    /// `n_raw_tokens` says how many lexer tokens this event consumes.
    Token { kind: SyntaxKind, n_raw_tokens: u8 },

    /// Finish the current node.
    Finish,

    /// A placeholder that will be replaced by `Start`, or ignored by the
    /// Sink when its marker was abandoned.
    Placeholder,
}

impl Event {
    /// Create a start event.
    pub fn start(kind: SyntaxKind) -> Self {
        Event::Start { kind }
    }

    /// Create a token event for a single raw token.
    pub fn token(kind: SyntaxKind) -> Self {
        Event::Token {
            kind,
            n_raw_tokens: 1,
        }
    }
}
