//! Markup tokenizer and tree builder for Kotoba.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer**: normalizes line endings, strips comments and
//!   declarations, segments the input into tag and content fragments with a
//!   jumping scan, and classifies each fragment as data, open, close, solo or
//!   irregular tag.
//!   - `script`/`style` bodies are opaque raw text
//!   - attribute spans decompose into an insertion-ordered map
//!
//! - **Tree builder**: a single forward pass with an explicit stack of open
//!   elements, producing an arena [`kotoba_dom::DomTree`].
//!
//! # Not Implemented
//!
//! - Character encoding detection
//! - Entity and character reference decoding
//! - HTML5 error recovery (implied end tags, adoption agency)
//! - Namespaces

/// Static element definitions (void and raw-text elements).
pub mod definition;
/// Error kinds for tokenization and tree building.
pub mod error;
/// Tree construction.
pub mod parser;
/// Tokenization.
pub mod tokenizer;

use kotoba_dom::DomTree;

pub use error::{Error, ParseError, TokenizeError};
pub use parser::{ParseIssue, TreeBuilder, TreeOutline, parse, print_tree, tree_to_string};
pub use tokenizer::{MarkupTokenizer, TagData, Token, TokenKind, tokenize};

/// Tokenize and parse `input` with default settings.
///
/// # Errors
///
/// Returns [`Error::Tokenize`] on malformed attribute syntax and
/// [`Error::Parse`] on unbalanced markup.
pub fn parse_document(input: &str) -> Result<DomTree, Error> {
    let tokens = tokenize(input)?;
    Ok(parse(tokens)?)
}
